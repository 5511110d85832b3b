use crate::error::AppError;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(15);
pub const ACCOUNT_DELAY: Duration = Duration::from_secs(3);

pub const DEFAULT_PROXY_HOST: &str = "127.0.0.1";
pub const DEFAULT_PROXY_PORT: u16 = 10809;

/// Load `.env` from the working directory or one of its parents.
///
/// Returns the path that was loaded, or `None` when there is no file. Values
/// already present in the process environment win over the file.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("Ignoring unreadable .env file: {e}");
            None
        }
    }
}

/// Split a multi-account variable on any of the given separator characters.
/// Entries are trimmed and blank entries dropped.
pub fn split_accounts(raw: &str, separators: &[char]) -> Vec<String> {
    raw.split(|c| separators.contains(&c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Like [`split_accounts`] but fails with [`AppError::MissingEnv`] when no
/// account survives.
pub fn require_accounts(
    var: &str,
    raw: Option<&str>,
    separators: &[char],
) -> Result<Vec<String>, AppError> {
    let accounts = raw
        .map(|r| split_accounts(r, separators))
        .unwrap_or_default();
    if accounts.is_empty() {
        return Err(AppError::MissingEnv(var.to_string()));
    }
    Ok(accounts)
}

/// Plain HTTP proxy used for both http and https traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROXY_HOST, DEFAULT_PROXY_PORT)
    }
}

/// Mask a credential for log output, keeping a short prefix.
pub fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
