use super::*;

fn result(title: &str, snippet: &str, url: &str) -> NormalizedResult {
    NormalizedResult {
        title: title.to_owned(),
        snippet: snippet.to_owned(),
        url: url.to_owned(),
        has_local_script: true,
    }
}

fn strategy(name: &str) -> NameStrategy {
    *NAME_STRATEGIES
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("no strategy named {name}"))
}

// ---------------------------------------------------------------------------
// Whole-extractor scenarios
// ---------------------------------------------------------------------------

#[test]
fn creator_with_handle_in_snippet() {
    let r = result(
        "제이미 (@jamie.beauty) • Instagram",
        "제이미 - 뷰티 크리에이터 (@jamie.beauty) 협찬 문의 jamie.b@gmail.com",
        "https://instagram.com/jamie.beauty/",
    );
    let contact = extract(&r, Platform::Instagram, "뷰티").unwrap();
    assert_eq!(contact.email, "jamie.b@gmail.com");
    assert_eq!(contact.display_name, "제이미");
    assert_eq!(contact.source_platform, Platform::Instagram);
    assert_eq!(contact.category, "뷰티");
    assert_eq!(contact.source_url, "https://instagram.com/jamie.beauty/");
    assert_eq!(contact.raw_snippet, r.snippet);
    assert_eq!(contact.subscriber_count, 0);
}

#[test]
fn follower_count_lead_in_is_not_a_name() {
    let r = result(
        "제이미(@jamie.beauty) • Instagram 사진 및 동영상",
        "팔로워 1,234명, 팔로잉 56명, 게시물 789개 - 제이미(@jamie.beauty)님의 Instagram 사진 및 동영상 보기 협찬 문의 jamie.b@gmail.com",
        "https://www.instagram.com/jamie.beauty/",
    );
    let contact = extract(&r, Platform::Instagram, "뷰티").unwrap();
    assert_eq!(contact.display_name, "제이미");
}

#[test]
fn english_follower_count_lead_in_is_not_a_name() {
    let r = result(
        "Jamie (@jamie.beauty) • Instagram photos and videos",
        "1,234 Followers, 56 Following, 789 Posts - See Instagram photos and videos from Jamie (@jamie.beauty) collab jamie.b@gmail.com",
        "https://www.instagram.com/jamie.beauty/",
    );
    let contact = extract(&r, Platform::Instagram, "뷰티").unwrap();
    assert_eq!(contact.display_name, "Jamie");
}

#[test]
fn counts_only_lead_in_falls_back_to_handle() {
    let r = result(
        "",
        "팔로워 1.2만명, 게시물 30개 (@jamie.beauty) 문의 jamie.b@gmail.com",
        "",
    );
    assert_eq!(
        (strategy("snippet_handle").run)(&r, Platform::Instagram).as_deref(),
        Some("jamie.beauty")
    );
}

#[test]
fn count_boilerplate_only_strips_a_leading_run() {
    assert_eq!(strip_count_boilerplate("팔로워 56명, 팔로잉 7명 - 제이미"), "제이미");
    assert_eq!(strip_count_boilerplate("3.4K followers · Jamie"), "Jamie");
    assert_eq!(strip_count_boilerplate("제이미 팔로워 56명"), "제이미 팔로워 56명");
    assert_eq!(strip_count_boilerplate("2024 vlog"), "2024 vlog");
}

#[test]
fn snippet_without_email_yields_nothing() {
    let r = result(
        "제이미 (@jamie.beauty) • Instagram",
        "제이미 - 뷰티 크리에이터 (@jamie.beauty) 협찬은 DM 주세요",
        "https://instagram.com/jamie.beauty/",
    );
    assert!(extract(&r, Platform::Instagram, "뷰티").is_none());
}

#[test]
fn email_in_title_or_url_is_ignored() {
    let r = result(
        "contact: jamie.b@gmail.com",
        "제이미 뷰티 크리에이터",
        "https://instagram.com/jamie.b@gmail.com/",
    );
    assert!(extract(&r, Platform::Instagram, "뷰티").is_none());
}

#[test]
fn fails_only_when_snippet_has_no_email() {
    let cases = [
        ("", "a@b.co", "", true),
        ("", "", "", false),
        ("제이미", "연락처 없음", "https://instagram.com/jamie/", false),
        ("", "문의: first@x.com, second@y.com", "not a url", true),
        ("", "broken@domain", "", false),
        ("", "@handle only", "", false),
    ];
    for (title, snippet, url, expect_some) in cases {
        let got = extract(&result(title, snippet, url), Platform::TikTok, "기타");
        assert_eq!(got.is_some(), expect_some, "snippet {snippet:?}");
        if let Some(c) = got {
            assert!(!c.display_name.is_empty(), "name must never be empty");
        }
    }
}

#[test]
fn first_email_wins_and_is_lowercased() {
    let r = result("", "문의 Jamie.B@Gmail.COM / backup@naver.com", "");
    let contact = extract(&r, Platform::Instagram, "뷰티").unwrap();
    assert_eq!(contact.email, "jamie.b@gmail.com");
}

#[test]
fn placeholder_name_falls_back_to_local_part() {
    let r = result(
        "",
        "링크참고 (@x) 문의 hello.jamie@naver.com",
        "https://instagram.com/p/abc/",
    );
    let contact = extract(&r, Platform::Instagram, "뷰티").unwrap();
    assert_eq!(contact.display_name, "hello.jamie");
}

#[test]
fn name_that_cleans_to_nothing_falls_back_to_local_part() {
    let r = result(
        "Instagram photos and videos",
        "• Instagram 사진 및 동영상 (@__) dm me@jamie.kr",
        "https://instagram.com/reel/abc/",
    );
    let contact = extract(&r, Platform::Instagram, "뷰티").unwrap();
    assert_eq!(contact.display_name, "me");
}

// ---------------------------------------------------------------------------
// Individual strategies
// ---------------------------------------------------------------------------

#[test]
fn strategies_run_in_documented_order() {
    let names: Vec<_> = NAME_STRATEGIES.iter().map(|s| s.name).collect();
    assert_eq!(
        names,
        [
            "snippet_handle",
            "title_handle",
            "possessive_phrase",
            "url_segment",
            "email_local_part"
        ]
    );
}

#[test]
fn snippet_handle_prefers_readable_name() {
    let r = result("", "제이미 (@jamie.beauty) 뷰티", "");
    assert_eq!(
        (strategy("snippet_handle").run)(&r, Platform::Instagram).as_deref(),
        Some("제이미")
    );
}

#[test]
fn snippet_handle_uses_handle_when_no_lead_in() {
    let r = result("", "(@jamie.beauty) 협찬 문의", "");
    assert_eq!(
        (strategy("snippet_handle").run)(&r, Platform::Instagram).as_deref(),
        Some("jamie.beauty")
    );
}

#[test]
fn snippet_handle_lead_in_stops_at_email_and_sentence_break() {
    let r = result("", "문의 jamie.b@gmail.com 제이미 (@jamie)", "");
    assert_eq!(
        (strategy("snippet_handle").run)(&r, Platform::Instagram).as_deref(),
        Some("제이미")
    );

    let r = result("", "매일 메이크업 올려요. 제이미 (@jamie)", "");
    assert_eq!(
        (strategy("snippet_handle").run)(&r, Platform::Instagram).as_deref(),
        Some("제이미")
    );
}

#[test]
fn snippet_handle_skips_prose_lead_in() {
    let r = result(
        "",
        "오늘은 새로 나온 립스틱 컬러를 하나하나 발색해 보면서 솔직한 후기를 아주 길게 남겨봤어요 다들 참고하세요 (@jamie)",
        "",
    );
    assert_eq!(
        (strategy("snippet_handle").run)(&r, Platform::Instagram).as_deref(),
        Some("jamie")
    );
}

#[test]
fn title_handle_reads_title() {
    let r = result("뷰티제이미 (@jamie.beauty) • Instagram", "no handle here", "");
    assert_eq!(
        (strategy("snippet_handle").run)(&r, Platform::Instagram),
        None
    );
    assert_eq!(
        (strategy("title_handle").run)(&r, Platform::Instagram).as_deref(),
        Some("뷰티제이미")
    );
}

#[test]
fn possessive_phrase_both_orders() {
    let s = strategy("possessive_phrase");
    let leading = result("인스타그램의 제이미님", "", "");
    assert_eq!((s.run)(&leading, Platform::Instagram).as_deref(), Some("제이미"));

    let trailing = result("", "제이미님의 유튜브 채널입니다", "");
    assert_eq!((s.run)(&trailing, Platform::YouTube).as_deref(), Some("제이미"));
}

#[test]
fn possessive_phrase_ignores_other_platform_names() {
    let r = result("틱톡의 제이미님", "", "");
    assert_eq!((strategy("possessive_phrase").run)(&r, Platform::Instagram), None);
}

#[test]
fn url_segment_skips_reserved_routes() {
    let s = strategy("url_segment");
    let profile = result("", "", "https://www.instagram.com/jamie.beauty/");
    assert_eq!((s.run)(&profile, Platform::Instagram).as_deref(), Some("jamie.beauty"));

    let reel = result("", "", "https://www.instagram.com/reel/C1a2b3/");
    assert_eq!((s.run)(&reel, Platform::Instagram), None);

    let tiktok = result("", "", "https://www.tiktok.com/@jamie.b/video/7300000000");
    assert_eq!((s.run)(&tiktok, Platform::TikTok).as_deref(), Some("jamie.b"));
}

#[test]
fn url_segment_requires_platform_domain() {
    let r = result("", "", "https://blog.naver.com/jamie");
    assert_eq!((strategy("url_segment").run)(&r, Platform::Instagram), None);
}

#[test]
fn email_local_part_strategy_reads_snippet_email() {
    let r = result("", "문의 jamie_b@naver.com", "");
    assert_eq!(
        (strategy("email_local_part").run)(&r, Platform::Instagram).as_deref(),
        Some("jamie_b")
    );
}

// ---------------------------------------------------------------------------
// Cleanup
// ---------------------------------------------------------------------------

#[test]
fn cleanup_cuts_at_first_separator() {
    assert_eq!(clean_name("제이미 | 뷰티 • 일상", Platform::Instagram), "제이미");
    assert_eq!(clean_name("제이미 · 브이로그", Platform::YouTube), "제이미");
}

#[test]
fn cleanup_strips_platform_prefix() {
    assert_eq!(clean_name("인스타그램의 제이미", Platform::Instagram), "제이미");
    assert_eq!(clean_name("Instagram's Jamie", Platform::Instagram), "Jamie");
}

#[test]
fn cleanup_strips_trailing_decorations_repeatedly() {
    assert_eq!(
        clean_name("제이미 Instagram photos and videos", Platform::Instagram),
        "제이미"
    );
    assert_eq!(
        clean_name("제이미 인스타그램 사진 및 동영상", Platform::Instagram),
        "제이미"
    );
}

#[test]
fn cleanup_strips_honorifics_and_quotes() {
    assert_eq!(clean_name("\"제이미님의\"", Platform::Instagram), "제이미");
    assert_eq!(clean_name("'제이미 님'", Platform::TikTok), "제이미");
}

#[test]
fn cleanup_keeps_words_that_merely_end_like_decorations() {
    assert_eq!(clean_name("Rand", Platform::Instagram), "Rand");
    assert_eq!(clean_name("jamievideo", Platform::YouTube), "jamievideo");
}

#[test]
fn finalize_falls_back_on_placeholder_substring() {
    assert_eq!(
        finalize_name("프로필링크 확인", Platform::Instagram, "jamie@x.com"),
        "jamie"
    );
}

#[test]
fn find_email_normalizes() {
    assert_eq!(
        find_email("mail: Jamie.B@Gmail.com!").as_deref(),
        Some("jamie.b@gmail.com")
    );
    assert_eq!(find_email("nothing here"), None);
}
