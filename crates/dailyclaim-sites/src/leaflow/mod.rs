//! LeafLow hosting: cookie/token based daily check-in.
//!
//! There is no documented API. The bot probes a few pages to confirm the
//! session is alive, then tries the check-in page form followed by a list of
//! guessed endpoints until one of them answers with a success marker.

pub mod heuristics;
pub mod token;

use dailyclaim_core::http::ClientOptions;
use dailyclaim_core::report::pause_after_account;
use dailyclaim_core::{AccountOutcome, AppError, RunReport};
use heuristics::{
    already_checked_in, check_checkin_response, extract_csrf_token, is_checkin_page,
    looks_authenticated, Verdict,
};
use reqwest::header::LOCATION;
use reqwest::StatusCode;
use std::sync::Arc;

pub use token::{load_accounts, parse_token, LeafLowAccount, TokenData};

pub const MAIN_SITE: &str = "https://leaflow.net";
pub const CHECKIN_SITE: &str = "https://checkin.leaflow.net";
const SERVICE: &str = "LeafLow";

const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
    ("Accept-Language", "zh-CN,zh;q=0.9,en;q=0.8"),
    ("DNT", "1"),
    ("Upgrade-Insecure-Requests", "1"),
];

#[derive(Debug, Clone)]
pub struct Sites {
    pub main: String,
    pub checkin: String,
}

impl Default for Sites {
    fn default() -> Self {
        Self {
            main: MAIN_SITE.to_string(),
            checkin: CHECKIN_SITE.to_string(),
        }
    }
}

impl Sites {
    fn auth_probes(&self) -> Vec<String> {
        vec![
            format!("{}/dashboard", self.main),
            format!("{}/profile", self.main),
            format!("{}/user", self.main),
            self.checkin.clone(),
        ]
    }

    fn fallback_endpoints(&self) -> Vec<String> {
        vec![
            format!("{}/api/checkin", self.checkin),
            format!("{}/checkin", self.checkin),
            format!("{}/api/checkin", self.main),
            format!("{}/checkin", self.main),
        ]
    }
}

/// One authenticated browser-like session.
pub struct LeafLowSession {
    client: reqwest::Client,
    sites: Sites,
    name: String,
}

impl LeafLowSession {
    pub fn new(account: &LeafLowAccount, sites: Sites) -> Result<Self, AppError> {
        let mut options = ClientOptions::default();
        for (name, value) in BROWSER_HEADERS {
            options = options.header(name, value);
        }
        for (name, value) in &account.token.headers {
            options = options.header(name, value);
        }
        let jar = account.token.cookie_jar(&[sites.main.as_str(), sites.checkin.as_str()])?;
        options = options.cookie_jar(Arc::new(jar));

        Ok(Self {
            client: options.build()?,
            sites,
            name: account.name.clone(),
        })
    }

    /// Probe known pages until one proves the session is logged in.
    pub async fn test_authentication(&self) -> Result<(), AppError> {
        for url in self.sites.auth_probes() {
            let resp = self.client.get(&url).send().await?;
            let status = resp.status();
            tracing::debug!("[{}] probe {url}: {status}", self.name);

            if status == StatusCode::OK {
                // A redirect to the login page also ends in 200.
                if resp.url().as_str().to_lowercase().contains("login") {
                    continue;
                }
                let body = resp.text().await?;
                if looks_authenticated(&body) {
                    tracing::info!("[{}] authentication valid", self.name);
                    return Ok(());
                }
            } else if status.is_redirection() {
                let location = resp
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_lowercase();
                if !location.contains("login") {
                    tracing::info!("[{}] authentication valid (redirect)", self.name);
                    return Ok(());
                }
            }
        }
        Err(AppError::Login(
            "no page confirmed a logged-in session".into(),
        ))
    }

    /// Submit the check-in form found on `page_url`.
    async fn analyze_and_checkin(&self, html: &str, page_url: &str) -> Verdict {
        if already_checked_in(html) {
            return Verdict {
                success: true,
                message: "Already checked in today".into(),
            };
        }
        if !is_checkin_page(html) {
            return Verdict {
                success: false,
                message: "not a check-in page".into(),
            };
        }

        let mut form = vec![
            ("checkin", "1".to_string()),
            ("action", "checkin".to_string()),
            ("daily", "1".to_string()),
        ];
        if let Some(token) = extract_csrf_token(html) {
            form.push(("_token", token.clone()));
            form.push(("csrf_token", token));
        }

        match self.client.post(page_url).form(&form).send().await {
            Ok(resp) if resp.status() == StatusCode::OK => match resp.text().await {
                Ok(body) => return check_checkin_response(&body),
                Err(e) => tracing::debug!("[{}] reading check-in reply failed: {e}", self.name),
            },
            Ok(resp) => tracing::debug!("[{}] check-in POST returned {}", self.name, resp.status()),
            Err(e) => tracing::debug!("[{}] check-in POST failed: {e}", self.name),
        }
        Verdict {
            success: false,
            message: "submitting the check-in form failed".into(),
        }
    }

    async fn try_endpoint(&self, endpoint: &str) -> Result<Option<Verdict>, AppError> {
        let resp = self.client.get(endpoint).send().await?;
        if resp.status() == StatusCode::OK {
            let verdict = check_checkin_response(&resp.text().await?);
            if verdict.success {
                return Ok(Some(verdict));
            }
        }

        let resp = self
            .client
            .post(endpoint)
            .form(&[("checkin", "1")])
            .send()
            .await?;
        if resp.status() == StatusCode::OK {
            let verdict = check_checkin_response(&resp.text().await?);
            if verdict.success {
                return Ok(Some(verdict));
            }
        }
        Ok(None)
    }

    pub async fn perform_checkin(&self) -> Result<Verdict, AppError> {
        tracing::info!("[{}] starting check-in", self.name);

        let page_url = self.sites.checkin.clone();
        let resp = self.client.get(&page_url).send().await?;
        if resp.status() == StatusCode::OK {
            let html = resp.text().await?;
            let verdict = self.analyze_and_checkin(&html, &page_url).await;
            if verdict.success {
                return Ok(verdict);
            }
            tracing::debug!("[{}] check-in page: {}", self.name, verdict.message);
        }

        for endpoint in self.sites.fallback_endpoints() {
            match self.try_endpoint(&endpoint).await {
                Ok(Some(verdict)) => return Ok(verdict),
                Ok(None) => {}
                Err(e) => tracing::debug!("[{}] endpoint {endpoint} failed: {e}", self.name),
            }
        }

        Ok(Verdict {
            success: false,
            message: "all check-in methods failed".into(),
        })
    }
}

async fn check_in_account(account: &LeafLowAccount, sites: Sites) -> Result<Verdict, AppError> {
    let session = LeafLowSession::new(account, sites)?;
    session.test_authentication().await?;
    session.perform_checkin().await
}

pub async fn process(account: &LeafLowAccount, sites: Sites) -> AccountOutcome {
    match check_in_account(account, sites).await {
        Ok(v) if v.success => AccountOutcome::ok(&account.name, v.message),
        Ok(v) => AccountOutcome::failed(&account.name, v.message),
        Err(e) => AccountOutcome::failed(&account.name, e.to_string()),
    }
}

pub async fn run(accounts: &[LeafLowAccount], sites: Sites) -> Result<RunReport, AppError> {
    if accounts.is_empty() {
        return Err(AppError::MissingEnv("LEAFLOW_TOKENS".into()));
    }

    let mut report = RunReport::new(SERVICE);
    for (idx, account) in accounts.iter().enumerate() {
        tracing::info!("Processing {}...", account.name);
        report.push(process(account, sites.clone()).await);
        pause_after_account(idx, accounts.len()).await;
    }
    Ok(report)
}
