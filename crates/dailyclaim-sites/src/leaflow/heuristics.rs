//! String heuristics for pages whose markup changes without notice.
//!
//! Everything here works on the raw response body. Indicator matching is
//! case-insensitive; capture groups keep the original casing.

use regex::Regex;
use std::sync::OnceLock;

const ALREADY_CHECKED_IN: &[&str] = &[
    "already checked in",
    "今日已签到",
    "checked in today",
    "attendance recorded",
    "已完成签到",
    "completed today",
];

const CHECKIN_PAGE: &[&str] = &["check-in", "checkin", "签到", "attendance", "daily"];

const CHECKIN_SUCCESS: &[&str] = &[
    "check-in successful",
    "checkin successful",
    "签到成功",
    "attendance recorded",
    "earned reward",
    "获得奖励",
    "success",
    "成功",
    "completed",
];

const AUTHENTICATED: &[&str] = &["dashboard", "profile", "user", "logout", "welcome"];

fn contains_any(body: &str, needles: &[&str]) -> bool {
    let lower = body.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

pub fn already_checked_in(html: &str) -> bool {
    contains_any(html, ALREADY_CHECKED_IN)
}

pub fn is_checkin_page(html: &str) -> bool {
    contains_any(html, CHECKIN_PAGE)
}

pub fn looks_authenticated(html: &str) -> bool {
    contains_any(html, AUTHENTICATED)
}

fn csrf_patterns() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r#"(?i)name=["']_token["'][^>]*value=["']([^"']+)["']"#,
            r#"(?i)name=["']csrf_token["'][^>]*value=["']([^"']+)["']"#,
            r#"(?i)<meta[^>]*name=["']csrf-token["'][^>]*content=["']([^"']+)["']"#,
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
    })
}

fn reward_patterns() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r"(?i)获得奖励[^\d]*(\d+\.?\d*)\s*元",
            r"(?i)earned.*?(\d+\.?\d*)\s*(credits?|points?)",
            r"(?i)(\d+\.?\d*)\s*(credits?|points?|元)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
    })
}

/// First CSRF token found in a hidden input or a `csrf-token` meta tag.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    csrf_patterns()
        .iter()
        .find_map(|re| re.captures(html))
        .map(|c| c[1].to_string())
}

pub fn extract_reward(html: &str) -> Option<String> {
    reward_patterns()
        .iter()
        .find_map(|re| re.captures(html))
        .map(|c| c[1].to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub success: bool,
    pub message: String,
}

/// Judge a check-in response body.
pub fn check_checkin_response(html: &str) -> Verdict {
    if !contains_any(html, CHECKIN_SUCCESS) {
        return Verdict {
            success: false,
            message: "check-in response indicates failure".into(),
        };
    }
    let message = match extract_reward(html) {
        Some(reward) => format!("Check-in succeeded, earned {reward}"),
        None => "Check-in succeeded".to_string(),
    };
    Verdict {
        success: true,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_checked_in_is_case_insensitive() {
        assert!(already_checked_in("<p>You have ALREADY CHECKED IN</p>"));
        assert!(already_checked_in("<div>今日已签到</div>"));
        assert!(!already_checked_in("<div>please check in</div>"));
    }

    #[test]
    fn checkin_page_detection() {
        assert!(is_checkin_page("<button>Daily Check-In</button>"));
        assert!(is_checkin_page("<a>立即签到</a>"));
        assert!(!is_checkin_page("<h1>Pricing</h1>"));
    }

    #[test]
    fn csrf_from_hidden_input() {
        let html = r#"<form><input type="hidden" name="_token" value="abc123"></form>"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("abc123"));

        let html = r#"<input name='csrf_token' type='hidden' value='q-9'>"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("q-9"));
    }

    #[test]
    fn csrf_from_meta_tag() {
        let html = r#"<META NAME="csrf-token" CONTENT="MetaTok">"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("MetaTok"));
        assert_eq!(extract_csrf_token("<html></html>"), None);
    }

    #[test]
    fn hidden_input_wins_over_meta() {
        let html = r#"<meta name="csrf-token" content="meta"><input name="_token" value="input">"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("input"));
    }

    #[test]
    fn success_with_yuan_reward() {
        let v = check_checkin_response("<p>签到成功，获得奖励 0.5 元</p>");
        assert!(v.success);
        assert_eq!(v.message, "Check-in succeeded, earned 0.5");
    }

    #[test]
    fn success_with_points_reward() {
        let v = check_checkin_response("Check-in successful! You earned 15 points.");
        assert_eq!(v.message, "Check-in succeeded, earned 15");
    }

    #[test]
    fn success_without_reward() {
        let v = check_checkin_response(r#"{"status":"success"}"#);
        assert!(v.success);
        assert_eq!(v.message, "Check-in succeeded");
    }

    #[test]
    fn failure_body() {
        let v = check_checkin_response("<p>Please log in</p>");
        assert!(!v.success);
    }

    #[test]
    fn authenticated_markers() {
        assert!(looks_authenticated("<a href=/logout>Logout</a>"));
        assert!(!looks_authenticated("<h1>Sign in</h1>"));
    }
}
