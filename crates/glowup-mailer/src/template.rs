//! Outreach templates.
//!
//! Seeding templates go to creators and carry product images; partnership
//! templates go to storefront owners and are signed by the chosen sender.
//! Every body references the sender's business card as `cid:biz_card`.

use std::fmt;
use std::str::FromStr;

use crate::MailError;

/// Content id of the inline business-card image.
pub const CARD_CONTENT_ID: &str = "biz_card";

/// Salutation used when a creator has no usable display name.
pub const FALLBACK_CREATOR_NAME: &str = "크리에이터";

const PARTNER_FORM_URL: &str = "https://forms.gle/Dte233GXJrR7nhpJ8";

/// A rendered email before addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html_body: String,
    /// Asset file names to attach, relative to the assets directory.
    pub attachments: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// Seeding (creators)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingTemplate {
    Melv,
    Solv,
    Uppr,
}

impl SeedingTemplate {
    pub const ALL: [SeedingTemplate; 3] = [Self::Melv, Self::Solv, Self::Uppr];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Melv => "melv",
            Self::Solv => "solv",
            Self::Uppr => "uppr",
        }
    }

    /// Product images shipped with this template.
    #[must_use]
    pub fn attachments(self) -> &'static [&'static str] {
        match self {
            Self::Melv => &["melv1.jpg", "melv2.jpg"],
            Self::Solv => &["solv1.jpg", "solv2.jpg"],
            Self::Uppr => &["uppr1.jpg", "uppr2.jpg"],
        }
    }

    /// Renders the template for one creator.
    #[must_use]
    pub fn render(self, creator_name: &str, sender_name: &str) -> RenderedEmail {
        let name = escape_html(salutation_name(creator_name));
        let sender = escape_html(sender_name);
        let (subject, content) = match self {
            Self::Melv => (
                format!("[MELV] {}님, 멜브 첫 공식 런칭 제품 시딩 제안드립니다 💖", salutation_name(creator_name)),
                melv_body(&name, &sender),
            ),
            Self::Solv => (
                format!("[SOLV] {}님, 솔브 첫 공식 런칭 에스테틱 모델링팩 시딩 제안드립니다 💖", salutation_name(creator_name)),
                solv_body(&name, &sender),
            ),
            Self::Uppr => (
                format!("[UPPR] {}님, 어퍼의 소두핏 코듀로이 볼캡 & 체크셔츠 시딩 제안드립니다 🧢", salutation_name(creator_name)),
                uppr_body(&name, &sender),
            ),
        };

        let html_body = format!(
            "<div style=\"font-family: 'Apple SD Gothic Neo', sans-serif; line-height: 1.6; color: #222;\">\n\
             {content}\
             감사합니다!<br><br>\n\
             <img src=\"cid:{CARD_CONTENT_ID}\" alt=\"{sender} 명함\" style=\"max-width: 400px; border: 1px solid #eaeaea; border-radius: 4px;\">\n\
             </div>"
        );

        RenderedEmail {
            subject,
            html_body,
            attachments: self.attachments().to_vec(),
        }
    }
}

impl fmt::Display for SeedingTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeedingTemplate {
    type Err = MailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "melv" => Ok(Self::Melv),
            "solv" => Ok(Self::Solv),
            "uppr" => Ok(Self::Uppr),
            other => Err(MailError::UnknownTemplate(other.to_owned())),
        }
    }
}

fn melv_body(name: &str, sender: &str) -> String {
    format!(
        "안녕하세요, {name}님!<br>\n\
         뷰티 브랜드 MELV(멜브) MD {sender}입니다. :)<br><br>\n\
         이번 MELV의 첫 공식 런칭으로, 브랜드 무드와 가장 잘 어울리는 크리에이터분들께만 제일 빠르게! 런칭 제품을 선물 드리고 싶어 연락드렸습니다! 💖<br><br>\n\
         <b>1. MELV 립시럽 (2종)</b><br>\n\
         기존 글로우 립의 요플레 현상과 끈적임을 확실하게 잡았습니다.<br>\n\
         특히 말랑한 물방울 실리콘 팁이 맑은 광택감을 온전히 살려주며, 호호바씨오일과 시어버터를 듬뿍 담아 단순히 겉광만 내는 것이 아니라 건조한 입술에 깊은 보습감까지 꽉 채워줍니다.<br><br>\n\
         <b>2. MELV 립타투 (3종)</b><br>\n\
         촌스러운 핑크 착색이 아닌, 감성적인 뮤티드 컬러로 뽑아낸 신개념 타투 립입니다.<br>\n\
         밥을 먹거나 물놀이를 해도 쉽게 지워지지 않는 강력한 지속력을 자랑하며, 보습 성분(콜라겐, 펩타이드)을 함유하여 떼어낼 때 자극이 적고 건조함 없이 편안하게 마무리됩니다.<br><br>\n\
         {name}님을 위해 아낌없이 전 컬러를 꽉 채워 보내드릴 예정입니다!<br>\n\
         본 키트는 제품 협찬으로, 수령 후 인스타그램 피드 또는 스토리에 공식 계정(@melv.kr) 태그와 함께 업로드가 가능하신 분들께만 한정적으로 발송해 드리고 있습니다. 🙏<br>\n\
         (선정된 소수의 분들께만 드리는 키트인 만큼, {name}님의 감각적인 후기를 꼭 보고 싶습니다...💖)<br><br>\n\
         진행이 가능하시다면 받아보실 <b>[성함 / 연락처 / 주소]</b>를 남겨주세요. 정성껏 포장해서 보내드리겠습니다.<br><br>\n"
    )
}

fn solv_body(name: &str, sender: &str) -> String {
    format!(
        "안녕하세요, {name}님!<br>\n\
         기초 뷰티 브랜드 SOLV(솔브) MD {sender}입니다. :)<br><br>\n\
         이번 SOLV의 첫 공식 런칭으로, 브랜드 무드와 가장 잘 어울리는 크리에이터분들께만 제일 빠르게! 런칭 제품을 선물 드리고 싶어 연락드렸습니다! 💖<br><br>\n\
         <b>&lt;SOLV 모델링팩(5개입)&gt;</b><br>\n\
         💧 <b>물 조절 실패 ZERO!</b><br>\n\
         기존 모델링팩의 단점인 가루 날림과 번거로운 물 조절은 이제 그만! 베이스와 세럼을 섞기만 하면 되는 간편한 방식으로, 떼어낸 후에도 건조함 없이 피부 위 윤광 코팅 효과를 선사합니다.<br><br>\n\
         ❄️ <b>에스테틱 급 쿨링 효과!</b><br>\n\
         시중 모델링팩 중 쿨링 성분을 최대치로 담아, 열감으로 넓어진 모공과 예민해진 피부를 즉각적으로 진정시켜 에스테틱에서 관리받은 듯한 최상의 컨디션을 만들어줍니다.<br><br>\n\
         💄 <b>화잘먹을 위한 필수템!</b><br>\n\
         피부 온도가 낮아지면 베이스 메이크업의 밀착력이 달라집니다. 홈케어로 피부결을 정돈해 메이크업 시간과 화장품 비용을 획기적으로 줄여보세요.<br><br>\n\
         본 제품은 협찬으로, 수령 후 인스타그램 피드 또는 스토리에 공식 계정(@solv.kr) 태그와 함께 업로드가 가능하신 분들께만 한정적으로 발송해 드리고 있습니다. 🙏<br>\n\
         (선정된 소수의 분들께만 드리는 이벤트인 만큼, {name}님의 감각적인 후기를 꼭 보고 싶습니다...💖)<br><br>\n\
         진행이 가능하시다면 받아보실 <b>[성함 / 연락처 / 주소]</b>를 남겨주세요. 정성껏 포장해서 보내드리겠습니다.<br><br>\n"
    )
}

fn uppr_body(name: &str, sender: &str) -> String {
    format!(
        "안녕하세요, {name}님!<br>\n\
         캐주얼 브랜드 UPPR(어퍼) MD {sender}입니다. :)<br><br>\n\
         평소 {name}님의 감각적인 무드를 눈여겨보다가, 이번에 새롭게 선보이는 UPPR의 시그니처 아이템들이 찰떡같이 어울리실 것 같아 가장 먼저 선물로 보내드리고 싶어 연락드렸습니다! 🧢<br><br>\n\
         <b>1. UPPR 코듀로이 볼캡 (소두핏 끝판왕)</b><br>\n\
         얇은 면이 아닌 탄탄하고 도톰한 피그먼트 워싱 코듀로이 원단으로 정수리 꺼짐 없이 핏을 꽉 잡아줍니다.<br>\n\
         특히 깊이감 있는 설계와 길고 넓은 챙이 광대를 자연스럽게 커버해 어떤 얼굴형이든 완벽한 '소두핏'을 연출해 줍니다.<br><br>\n\
         <b>2. UPPR 시그니처 체크셔츠</b><br>\n\
         트렌디한 미니 격자 패턴과 자연스럽게 떨어지는 오버핏 실루엣! 바쁜 아침 화장 없이 볼캡과 툭 걸치기만 해도 힙한 '꾸안꾸' 데일리 코디가 완성됩니다.<br><br>\n\
         본 제품은 협찬으로, 수령 후 리뷰 업로드가 가능하신 분들께만 한정적으로 발송해 드리고 있습니다. 🙏<br><br>\n\
         진행이 가능하시다면 받아보실 <b>[성함 / 연락처 / 주소 / 셔츠사이즈(M,L)]</b>를 남겨주세요. 정성껏 포장해서 보내드리겠습니다.<br><br>\n"
    )
}

// ---------------------------------------------------------------------------
// Partnership (storefronts)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnershipTemplate {
    Commerce,
    ZeroCost,
}

impl PartnershipTemplate {
    pub const ALL: [PartnershipTemplate; 2] = [Self::Commerce, Self::ZeroCost];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Commerce => "commerce",
            Self::ZeroCost => "zero-cost",
        }
    }

    #[must_use]
    pub fn render(self, sender_name: &str) -> RenderedEmail {
        let subject = match self {
            Self::Commerce => "[글로우업리즈] 117만 유튜버 채널 연계 - 입점 제안",
            Self::ZeroCost => "[글로우업리즈] 인플루언서 시딩 0원 - 입점 제안",
        };
        let sender = escape_html(sender_name);
        let html_body = format!(
            "<div style=\"font-family: 'Apple SD Gothic Neo', sans-serif; font-size: 14px; line-height: 1.6; color: #222;\">\
             대표님 안녕하세요. {sender}입니다.\
             <div style='background-color: #f8f9fa; padding: 20px; text-align: center; border: 1px solid #eee; margin: 20px 0;'>\
             <a href='{PARTNER_FORM_URL}' style='padding: 12px 24px; background: #1a73e8; color: white; text-decoration: none; border-radius: 6px;'>👉 입점 신청 폼 바로가기</a>\
             </div>\
             <p><b>글로우업리즈 {sender} 드림</b></p>\
             <img src='cid:{CARD_CONTENT_ID}' style='max-width: 400px;'>\
             </div>"
        );

        RenderedEmail {
            subject: subject.to_owned(),
            html_body,
            attachments: Vec::new(),
        }
    }
}

impl fmt::Display for PartnershipTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartnershipTemplate {
    type Err = MailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "commerce" => Ok(Self::Commerce),
            "zero-cost" | "zerocost" => Ok(Self::ZeroCost),
            other => Err(MailError::UnknownTemplate(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn salutation_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        FALLBACK_CREATOR_NAME
    } else {
        trimmed
    }
}

/// Scraped names are untrusted; they must not inject markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
