//! iPzan proxy provider: claim the daily wallet reward.

use dailyclaim_core::config::mask;
use dailyclaim_core::http::{ensure_success, ClientOptions};
use dailyclaim_core::report::pause_after_account;
use dailyclaim_core::{AccountOutcome, AppError, RunReport};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BASE_URL: &str = "https://service.ipzan.com";
pub const LOGIN_SOURCE: &str = "ipzan-home-one";
pub const CLAIMED: &str = "领取成功";
const SERVICE: &str = "iPzan";
const UNKNOWN_BALANCE: &str = "unknown";

#[derive(Serialize)]
struct LoginRequest<'a> {
    account: &'a str,
    source: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    data: Option<LoginData>,
}

#[derive(Deserialize)]
struct LoginData {
    token: Option<String>,
}

/// Reply of `/home/userWallet-receive`.
#[derive(Debug, Deserialize, Default)]
pub struct ReceiveResponse {
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignVerdict {
    Claimed,
    Rejected(String),
    Unexpected(String),
}

pub fn judge(resp: &ReceiveResponse) -> SignVerdict {
    if resp.status == Some(200) && resp.data.as_str() == Some(CLAIMED) {
        SignVerdict::Claimed
    } else if resp.code == Some(-1) {
        SignVerdict::Rejected(
            resp.message
                .clone()
                .unwrap_or_else(|| "unknown error".to_string()),
        )
    } else {
        SignVerdict::Unexpected(format!(
            "status={:?} code={:?} data={}",
            resp.status, resp.code, resp.data
        ))
    }
}

/// Balance may come back as a number or a string.
fn balance_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

pub struct IpzanClient {
    client: reqwest::Client,
    base: String,
    bearer: Option<String>,
}

impl IpzanClient {
    pub fn new() -> Result<Self, AppError> {
        let client = ClientOptions::default()
            .accept_invalid_certs(true)
            .build()?;
        Ok(Self {
            client,
            base: BASE_URL.to_string(),
            bearer: None,
        })
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base = base.trim_end_matches('/').to_string();
        self
    }

    pub async fn login(&mut self, account: &str) -> Result<(), AppError> {
        let resp = self
            .client
            .post(format!("{}/users-login", self.base))
            .json(&LoginRequest {
                account,
                source: LOGIN_SOURCE,
            })
            .send()
            .await?;
        let resp = ensure_success(resp, SERVICE, "Login").await?;
        let text = resp.text().await?;

        let token = serde_json::from_str::<LoginResponse>(&text)
            .ok()
            .and_then(|r| r.data)
            .and_then(|d| d.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Login(format!("no token in response: {text}")))?;

        self.bearer = Some(format!("Bearer {token}"));
        Ok(())
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let req = self.client.get(format!("{}{path}", self.base));
        match &self.bearer {
            Some(bearer) => req.header(AUTHORIZATION, bearer),
            None => req,
        }
    }

    async fn fetch_balance(&self) -> Result<String, AppError> {
        let resp = self.get("/home/userWallet-find").send().await?;
        let body: Value = resp.json().await?;
        balance_text(&body["data"]["balance"])
            .ok_or_else(|| AppError::Parse(format!("no balance in response: {body}")))
    }

    /// Current wallet balance, or "unknown" when it cannot be read.
    pub async fn balance(&self) -> String {
        match self.fetch_balance().await {
            Ok(balance) => balance,
            Err(e) => {
                tracing::warn!("Balance lookup failed: {e}");
                UNKNOWN_BALANCE.to_string()
            }
        }
    }

    pub async fn sign_in(&self) -> Result<SignVerdict, AppError> {
        let resp = self.get("/home/userWallet-receive").send().await?;
        let body: ReceiveResponse = resp.json().await?;
        Ok(judge(&body))
    }

    pub async fn process(&mut self, account: &str) -> AccountOutcome {
        let label = mask(account);
        if let Err(e) = self.login(account).await {
            return AccountOutcome::failed(label, e.to_string());
        }
        tracing::info!("Logged in, claiming daily reward");

        match self.sign_in().await {
            Ok(SignVerdict::Claimed) => {
                let balance = self.balance().await;
                AccountOutcome::ok(label, format!("Claimed | balance: {balance}"))
            }
            Ok(SignVerdict::Rejected(message)) => {
                let balance = self.balance().await;
                AccountOutcome::failed(label, format!("Claim failed: {message} | balance: {balance}"))
            }
            Ok(SignVerdict::Unexpected(raw)) => {
                AccountOutcome::failed(label, format!("Claim failed: {raw}"))
            }
            Err(e) => AccountOutcome::failed(label, format!("Claim failed: {e}")),
        }
    }
}

/// Title for the summary notification, dated with the local day.
pub fn notification_title(today: chrono::NaiveDate) -> String {
    format!("iPzan check-in - {}", today.format("%Y/%m/%d"))
}

/// Notification body: "N accounts, M succeeded" then one line per account.
pub fn notification_body(report: &RunReport) -> String {
    report.render_with_summary(&format!(
        "{} accounts, {} succeeded",
        report.total(),
        report.success_count()
    ))
}

pub async fn run(accounts: &[String], base: Option<&str>) -> Result<RunReport, AppError> {
    let mut report = RunReport::new(SERVICE);

    for (idx, account) in accounts.iter().enumerate() {
        tracing::info!("Processing iPzan account {}", idx + 1);
        let mut client = IpzanClient::new()?;
        if let Some(base) = base {
            client = client.with_base(base);
        }
        report.push(client.process(account).await);
        pause_after_account(idx, accounts.len()).await;
    }

    Ok(report)
}
