//! RainYun cloud hosting: daily sign-in reward task.

use dailyclaim_core::config::mask;
use dailyclaim_core::http::{ensure_success, ClientOptions};
use dailyclaim_core::report::pause_after_account;
use dailyclaim_core::{AccountOutcome, AppError, RunReport};
use serde::{Deserialize, Serialize};

pub const API_BASE: &str = "https://api.v2.rainyun.com";
pub const DAILY_TASK: &str = "每日签到";
const SERVICE: &str = "RainYun";
const USER_AGENT: &str = "Apifox/1.0.0 (https://apifox.com)";

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Points")]
    pub points: i64,
}

#[derive(Deserialize)]
struct UserResponse {
    data: Option<UserInfo>,
}

#[derive(Serialize)]
struct TaskRequest<'a> {
    task_name: &'a str,
}

#[derive(Deserialize)]
struct TaskResponse {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimResult {
    pub accepted: bool,
    pub message: String,
}

pub struct RainYunClient {
    client: reqwest::Client,
    base: String,
}

impl RainYunClient {
    pub fn new(api_key: &str, dev_token: Option<&str>) -> Result<Self, AppError> {
        let mut options = ClientOptions::default()
            .user_agent(USER_AGENT)
            .header("x-api-key", api_key);
        if let Some(token) = dev_token.filter(|t| !t.trim().is_empty()) {
            options = options.header("rain-dev-token", token.trim());
        }
        Ok(Self {
            client: options.build()?,
            base: API_BASE.to_string(),
        })
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base = base.trim_end_matches('/').to_string();
        self
    }

    pub async fn user_info(&self) -> Result<UserInfo, AppError> {
        let resp = self
            .client
            .get(format!("{}/user/", self.base))
            .send()
            .await?;
        let resp = ensure_success(resp, SERVICE, "Get user").await?;
        let parsed: UserResponse = resp.json().await?;
        parsed
            .data
            .ok_or_else(|| AppError::Parse("user response has no 'data' field".into()))
    }

    /// Claim the daily sign-in task. A non-200 status is reported, not raised.
    pub async fn claim_daily(&self) -> Result<ClaimResult, AppError> {
        let resp = self
            .client
            .post(format!("{}/user/reward/tasks", self.base))
            .json(&TaskRequest {
                task_name: DAILY_TASK,
            })
            .send()
            .await?;

        let accepted = resp.status() == reqwest::StatusCode::OK;
        let text = resp.text().await?;
        tracing::debug!("Reward task response: {text}");
        let message = serde_json::from_str::<TaskResponse>(&text)
            .ok()
            .and_then(|r| r.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "unknown reason".to_string());

        Ok(ClaimResult { accepted, message })
    }

    /// Points before, claim, points after.
    pub async fn check_in(&self) -> Result<CheckIn, AppError> {
        let before = self.user_info().await?;
        tracing::info!(
            "RainYun user {} ({}) has {} points",
            before.name,
            before.id,
            before.points
        );
        let claim = self.claim_daily().await?;
        let after = self.user_info().await?;
        Ok(CheckIn {
            claim,
            points_before: before.points,
            user: after,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CheckIn {
    pub claim: ClaimResult,
    pub points_before: i64,
    pub user: UserInfo,
}

impl CheckIn {
    pub fn message(&self) -> String {
        let head = if self.claim.accepted {
            format!(
                "Check-in succeeded, earned {} points",
                self.user.points - self.points_before
            )
        } else {
            format!("Check-in failed: {}", self.claim.message)
        };
        format!(
            "{head} | user ID: {} | name: {} | points: {}",
            self.user.id, self.user.name, self.user.points
        )
    }
}

pub async fn run(
    api_keys: &[String],
    dev_token: Option<&str>,
    base: Option<&str>,
) -> Result<RunReport, AppError> {
    let mut report = RunReport::new(SERVICE);

    for (idx, key) in api_keys.iter().enumerate() {
        let account = format!("key {}", mask(key));
        tracing::info!("Processing RainYun account {} ({account})", idx + 1);

        let mut client = RainYunClient::new(key, dev_token)?;
        if let Some(base) = base {
            client = client.with_base(base);
        }

        let outcome = match client.check_in().await {
            Ok(check) if check.claim.accepted => AccountOutcome::ok(&account, check.message()),
            Ok(check) => AccountOutcome::failed(&account, check.message()),
            Err(e) => AccountOutcome::failed(&account, e.to_string()),
        };
        report.push(outcome);

        pause_after_account(idx, api_keys.len()).await;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(points: i64) -> UserInfo {
        UserInfo {
            id: 7,
            name: "rain".into(),
            points,
        }
    }

    #[test]
    fn success_message_reports_point_delta() {
        let check = CheckIn {
            claim: ClaimResult {
                accepted: true,
                message: "ok".into(),
            },
            points_before: 1000,
            user: user(1300),
        };
        assert_eq!(
            check.message(),
            "Check-in succeeded, earned 300 points | user ID: 7 | name: rain | points: 1300"
        );
    }

    #[test]
    fn failure_message_carries_reason() {
        let check = CheckIn {
            claim: ClaimResult {
                accepted: false,
                message: "今日已签到".into(),
            },
            points_before: 1000,
            user: user(1000),
        };
        assert!(check.message().starts_with("Check-in failed: 今日已签到"));
    }

    #[test]
    fn user_info_uses_capitalised_fields() {
        let parsed: UserResponse = serde_json::from_str(
            r#"{"code":200,"data":{"ID":12,"Name":"bob","Points":50,"Email":"x"}}"#,
        )
        .unwrap();
        let info = parsed.data.unwrap();
        assert_eq!((info.id, info.name.as_str(), info.points), (12, "bob", 50));
    }
}
