use chrono::{TimeZone, Utc};
use glowup_core::{CreatorStatus, MergeOutcome, Platform};
use glowup_mailer::{PartnershipTemplate, SeedingTemplate};
use glowup_scraper::{Region, SubscriberRange};

use super::*;
use crate::collect::{clean_keywords, merge_all, search_budget_left, MergeTally};
use crate::creators::{clip, CreatorExport};
use crate::outreach::pending_recipients;

fn row(email: &str, status: &str) -> glowup_db::CreatorRow {
    glowup_db::CreatorRow {
        id: 1,
        public_id: uuid::Uuid::nil(),
        platform: "Instagram".to_string(),
        category: "뷰티".to_string(),
        display_name: "제이미".to_string(),
        email: email.to_string(),
        profile_url: "https://instagram.com/jamie".to_string(),
        subscriber_count: 0,
        description: "문의 jamie@naver.com".to_string(),
        collected_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        status: status.to_string(),
    }
}

// ---------------------------------------------------------------------------
// db
// ---------------------------------------------------------------------------

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["glowup", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["glowup", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["glowup"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

// ---------------------------------------------------------------------------
// collect
// ---------------------------------------------------------------------------

#[test]
fn collect_instagram_splits_keywords() {
    let cli = Cli::try_parse_from([
        "glowup",
        "collect",
        "instagram",
        "--keywords",
        "뷰티,메이크업",
        "--pages",
        "3",
    ])
    .unwrap();
    let Some(Commands::Collect {
        command: CollectCommands::Instagram { args },
    }) = cli.command
    else {
        panic!("expected collect instagram");
    };
    assert_eq!(args.keywords, ["뷰티", "메이크업"]);
    assert_eq!(args.pages, 3);
    assert!(args.category.is_none());
}

#[test]
fn collect_tiktok_defaults_to_one_page() {
    let cli = Cli::try_parse_from(["glowup", "collect", "tiktok", "--keywords", "먹방"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collect {
            command: CollectCommands::Tiktok { ref args }
        }) if args.pages == 1
    ));
}

#[test]
fn collect_requires_keywords() {
    assert!(Cli::try_parse_from(["glowup", "collect", "instagram"]).is_err());
}

#[test]
fn collect_youtube_defaults() {
    let cli = Cli::try_parse_from(["glowup", "collect", "youtube", "--keywords", "skincare"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collect {
            command: CollectCommands::Youtube {
                region: Region::Kr,
                range: SubscriberRange::All,
                max_results: 50,
                no_generative: false,
                ..
            }
        })
    ));
}

#[test]
fn collect_youtube_with_range_and_region() {
    let cli = Cli::try_parse_from([
        "glowup",
        "collect",
        "youtube",
        "--keywords",
        "vlog",
        "--region",
        "jp",
        "--range",
        "10k-50k",
        "--no-generative",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collect {
            command: CollectCommands::Youtube {
                region: Region::Jp,
                range: SubscriberRange::From10kTo50k,
                no_generative: true,
                ..
            }
        })
    ));
}

#[test]
fn collect_youtube_rejects_unknown_range() {
    assert!(Cli::try_parse_from([
        "glowup",
        "collect",
        "youtube",
        "--keywords",
        "vlog",
        "--range",
        "huge"
    ])
    .is_err());
}

#[test]
fn blank_keywords_are_dropped() {
    let raw = vec![" 뷰티 ".to_string(), String::new(), "  ".to_string(), "먹방".to_string()];
    assert_eq!(clean_keywords(&raw), ["뷰티", "먹방"]);
}

#[test]
fn merge_tally_counts_each_outcome() {
    let mut tally = MergeTally::default();
    for outcome in [
        MergeOutcome::Inserted,
        MergeOutcome::Inserted,
        MergeOutcome::SkippedDuplicate,
        MergeOutcome::UpdatedName,
    ] {
        tally.record(outcome);
    }
    assert_eq!(
        tally,
        MergeTally {
            inserted: 2,
            skipped: 1,
            renamed: 1,
            failed: 0
        }
    );
}

fn contact(email: &str) -> glowup_core::ExtractedContact {
    glowup_core::ExtractedContact {
        email: email.to_string(),
        display_name: "제이미".to_string(),
        source_url: "https://instagram.com/jamie".to_string(),
        source_platform: Platform::Instagram,
        category: "뷰티".to_string(),
        raw_snippet: format!("문의 {email}"),
        subscriber_count: 0,
    }
}

#[tokio::test]
async fn merge_failure_skips_only_that_contact() {
    let contacts = [contact("a@x.com"), contact("b@x.com"), contact("c@x.com")];

    let tally = merge_all(&contacts, |c| {
        let result = if c.email == "b@x.com" {
            Err(glowup_db::DbError::Sqlx(sqlx::Error::PoolTimedOut))
        } else {
            Ok(MergeOutcome::Inserted)
        };
        async move { result }
    })
    .await
    .expect("ordinary failures do not abort the run");

    assert_eq!(
        tally,
        MergeTally {
            inserted: 2,
            skipped: 0,
            renamed: 0,
            failed: 1
        }
    );
}

#[tokio::test]
async fn store_inconsistency_stops_the_merge() {
    let contacts = [contact("a@x.com"), contact("b@x.com"), contact("c@x.com")];
    let mut attempted = Vec::new();

    let result = merge_all(&contacts, |c| {
        attempted.push(c.email.clone());
        let result = if c.email == "b@x.com" {
            Err(glowup_db::DbError::StoreInconsistency("row vanished".to_string()))
        } else {
            Ok(MergeOutcome::Inserted)
        };
        async move { result }
    })
    .await;

    let err = result.expect_err("inconsistency aborts");
    assert!(err.to_string().contains("row vanished"));
    assert_eq!(attempted, ["a@x.com", "b@x.com"]);
}

#[test]
fn search_budget_stops_before_overdraw() {
    assert!(search_budget_left(0, 10_000));
    assert!(search_budget_left(9_900, 10_000));
    assert!(!search_budget_left(9_901, 10_000));
    assert!(!search_budget_left(i64::MAX, 10_000));
}

// ---------------------------------------------------------------------------
// creators
// ---------------------------------------------------------------------------

#[test]
fn creators_list_with_filters() {
    let cli = Cli::try_parse_from([
        "glowup", "creators", "list", "--platform", "youtube", "--status", "pending",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Creators {
            command: CreatorCommands::List {
                platform: Some(Platform::YouTube),
                status: Some(CreatorStatus::Pending),
                limit: 50
            }
        })
    ));
}

#[test]
fn creators_delete_takes_repeated_emails() {
    let cli = Cli::try_parse_from([
        "glowup", "creators", "delete", "--email", "a@x.com", "--email", "b@x.com",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Creators {
            command: CreatorCommands::Delete { ref emails }
        }) if emails == &["a@x.com", "b@x.com"]
    ));
}

#[test]
fn creators_delete_requires_an_email() {
    assert!(Cli::try_parse_from(["glowup", "creators", "delete"]).is_err());
}

#[test]
fn export_uses_public_id_and_all_fields() {
    let stored = row("jamie@naver.com", "pending");
    let json = serde_json::to_value(CreatorExport::from(&stored)).unwrap();
    assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
    assert_eq!(json["email"], "jamie@naver.com");
    assert_eq!(json["platform"], "Instagram");
    assert_eq!(json["status"], "pending");
    assert_eq!(json["subscriber_count"], 0);
    assert!(json.get("public_id").is_none());
}

#[test]
fn clip_marks_truncation_on_char_boundary() {
    assert_eq!(clip("짧은", 5), "짧은");
    assert_eq!(clip("가나다라마바", 3), "가나다...");
}

// ---------------------------------------------------------------------------
// outreach
// ---------------------------------------------------------------------------

#[test]
fn outreach_send_parses_template_and_limit() {
    let cli = Cli::try_parse_from([
        "glowup", "outreach", "send", "--template", "solv", "--limit", "10", "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Outreach {
            command: OutreachCommands::Send {
                template: SeedingTemplate::Solv,
                limit: Some(10),
                dry_run: true,
                platform: None,
                ..
            }
        })
    ));
}

#[test]
fn outreach_send_rejects_unknown_template() {
    assert!(Cli::try_parse_from(["glowup", "outreach", "send", "--template", "nope"]).is_err());
}

#[test]
fn outreach_preview_defaults() {
    let cli = Cli::try_parse_from(["glowup", "outreach", "preview"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Outreach {
            command: OutreachCommands::Preview {
                template: SeedingTemplate::Melv,
                email: None,
                name: None,
                ref output,
            }
        }) if output.as_os_str() == "preview.html"
    ));
}

#[test]
fn pending_recipients_skip_sent_and_respect_limit() {
    let rows = vec![
        row("a@x.com", "pending"),
        row("b@x.com", "sent"),
        row("c@x.com", "pending"),
        row("d@x.com", "pending"),
    ];
    let picked: Vec<String> = pending_recipients(rows.clone(), Some(2))
        .into_iter()
        .map(|r| r.email)
        .collect();
    assert_eq!(picked, ["a@x.com", "c@x.com"]);

    assert_eq!(pending_recipients(rows, None).len(), 3);
}

// ---------------------------------------------------------------------------
// brands and quota
// ---------------------------------------------------------------------------

#[test]
fn brands_send_requires_sender() {
    assert!(Cli::try_parse_from(["glowup", "brands", "send"]).is_err());

    let cli = Cli::try_parse_from([
        "glowup", "brands", "send", "--sender", "hs", "--template", "zero-cost",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Brands {
            command: BrandCommands::Send {
                template: PartnershipTemplate::ZeroCost,
                ref sender,
                limit: None,
                dry_run: false,
            }
        }) if sender == "hs"
    ));
}

#[test]
fn brands_list_unsent_flag() {
    let cli = Cli::try_parse_from(["glowup", "brands", "list", "--unsent"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Brands {
            command: BrandCommands::List { unsent: true }
        })
    ));
}

#[test]
fn brands_collect_splits_keywords() {
    let cli =
        Cli::try_parse_from(["glowup", "brands", "collect", "--keywords", "립밤,선크림"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Brands {
            command: BrandCommands::Collect { ref keywords, pages: 1 }
        }) if keywords == &["립밤", "선크림"]
    ));
}

#[test]
fn parses_quota_show() {
    let cli = Cli::try_parse_from(["glowup", "quota", "show"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Quota {
            command: QuotaCommands::Show
        })
    ));
}
