//! iKuuu portal: email/password login, daily check-in, traffic summary.

use dailyclaim_core::http::ClientOptions;
use dailyclaim_core::report::pause_after_account;
use dailyclaim_core::{AccountOutcome, AppError, RunReport};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const BASE_URL: &str = "https://ikuuu.one";
const SERVICE: &str = "iKuuu";
const UNAVAILABLE: &str = "unavailable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub password: String,
}

/// Pair up the email and password lists line by line.
pub fn pair_accounts(emails: &[String], passwords: &[String]) -> Result<Vec<Account>, AppError> {
    if emails.is_empty() {
        return Err(AppError::MissingEnv("IKUUU_EMAIL".into()));
    }
    if passwords.is_empty() {
        return Err(AppError::MissingEnv("IKUUU_PWD".into()));
    }
    if emails.len() != passwords.len() {
        return Err(AppError::AccountMismatch {
            emails: emails.len(),
            passwords: passwords.len(),
        });
    }
    Ok(emails
        .iter()
        .zip(passwords)
        .map(|(email, password)| Account {
            email: email.clone(),
            password: password.clone(),
        })
        .collect())
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    passwd: &'a str,
}

#[derive(Deserialize, Default)]
struct MsgResponse {
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traffic {
    pub used_today: String,
    pub remaining: String,
}

fn used_today_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"今日已用\s*[:：]\s*(.*?)</li>").expect("valid regex"))
}

fn remaining_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#">(.*?)</span>"?\s*([GM]B)"#).expect("valid regex"))
}

/// Scrape today's usage and the remaining quota from the user page.
pub fn parse_traffic(html: &str) -> Traffic {
    let used_today = used_today_re()
        .captures(html)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_else(|| UNAVAILABLE.to_string());
    let remaining = remaining_re()
        .captures(html)
        .map(|c| format!("{}{}", c[1].trim(), &c[2]))
        .unwrap_or_else(|| UNAVAILABLE.to_string());
    Traffic {
        used_today,
        remaining,
    }
}

/// One logged-in portal session. The session cookie lives in the client's
/// cookie store, so every account gets its own client.
pub struct IkuuuClient {
    client: reqwest::Client,
    base: String,
}

impl IkuuuClient {
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            client: ClientOptions::default().with_session().build()?,
            base: BASE_URL.to_string(),
        })
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base = base.trim_end_matches('/').to_string();
        self
    }

    /// Log in; succeeds once the portal has set a session cookie.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AppError> {
        let resp = self
            .client
            .post(format!("{}/auth/login", self.base))
            .json(&LoginRequest {
                email,
                passwd: password,
            })
            .send()
            .await?;

        let has_cookie = resp.cookies().next().is_some();
        let status = resp.status();
        let body: MsgResponse = resp.json().await.unwrap_or_default();

        if has_cookie && status.is_success() {
            return Ok(());
        }
        Err(AppError::Login(
            body.msg
                .unwrap_or_else(|| format!("no session cookie returned ({status})")),
        ))
    }

    pub async fn check_in(&self) -> Result<String, AppError> {
        let resp = self
            .client
            .post(format!("{}/user/checkin", self.base))
            .send()
            .await?;
        let status = resp.status();
        let body: MsgResponse = resp.json().await.unwrap_or_default();
        match body.msg {
            Some(msg) if status.is_success() => Ok(msg),
            Some(msg) => Err(AppError::api(SERVICE, format!("check-in failed: {msg}"))),
            None => Err(AppError::api(
                SERVICE,
                format!("check-in failed ({status}): no message"),
            )),
        }
    }

    pub async fn traffic(&self) -> Result<Traffic, AppError> {
        let html = self
            .client
            .get(format!("{}/user", self.base))
            .send()
            .await?
            .text()
            .await?;
        Ok(parse_traffic(&html))
    }

    pub async fn process(&self, account: &Account) -> AccountOutcome {
        if let Err(e) = self.login(&account.email, &account.password).await {
            return AccountOutcome::failed(&account.email, e.to_string());
        }

        let checkin = self.check_in().await;
        let traffic = match self.traffic().await {
            Ok(t) => format!(
                "used today: {} | remaining: {}",
                t.used_today, t.remaining
            ),
            Err(e) => {
                tracing::warn!("Traffic lookup failed for {}: {e}", account.email);
                "traffic info unavailable".to_string()
            }
        };

        match checkin {
            Ok(msg) => AccountOutcome::ok(&account.email, format!("{msg} | {traffic}")),
            Err(e) => AccountOutcome::failed(&account.email, format!("{e} | {traffic}")),
        }
    }
}

pub async fn run(accounts: &[Account], base: Option<&str>) -> Result<RunReport, AppError> {
    tracing::info!("{} iKuuu account(s) configured", accounts.len());

    let mut report = RunReport::new(SERVICE);
    for (idx, account) in accounts.iter().enumerate() {
        tracing::info!("Processing account {}: {}", idx + 1, account.email);
        let mut client = IkuuuClient::new()?;
        if let Some(base) = base {
            client = client.with_base(base);
        }
        report.push(client.process(account).await);
        pause_after_account(idx, accounts.len()).await;
    }
    Ok(report)
}
