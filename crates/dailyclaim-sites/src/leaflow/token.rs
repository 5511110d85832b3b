use dailyclaim_core::AppError;
use reqwest::cookie::Jar;
use reqwest::Url;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Credentials captured from a logged-in browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenData {
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl TokenData {
    /// Build a cookie store holding the captured cookies for every site in
    /// `sites`. Cookies the server sets later are added to the same store.
    pub fn cookie_jar(&self, sites: &[&str]) -> Result<Jar, AppError> {
        let jar = Jar::default();
        for site in sites {
            let url = Url::parse(site)
                .map_err(|e| AppError::Parse(format!("bad site URL {site}: {e}")))?;
            for (name, value) in &self.cookies {
                jar.add_cookie_str(&format!("{name}={value}; Path=/"), &url);
            }
        }
        Ok(jar)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafLowAccount {
    pub name: String,
    pub token: TokenData,
}

fn parse_cookie_string(raw: &str, into: &mut BTreeMap<String, String>) {
    for pair in raw.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            into.insert(name.trim().to_string(), value.trim().to_string());
        }
    }
}

/// Parse one account entry. Three shapes are accepted:
/// a JSON object with `cookies`/`headers`, `cookie-string|Header: value`,
/// or a bare cookie string.
pub fn parse_token(raw: &str) -> Result<TokenData, AppError> {
    let raw = raw.trim();

    if raw.starts_with('{') {
        return serde_json::from_str(raw)
            .map_err(|e| AppError::InvalidAccount(format!("bad JSON token: {e}")));
    }

    let mut token = TokenData::default();
    if let Some((cookie_part, header_part)) = raw.split_once('|') {
        parse_cookie_string(cookie_part, &mut token.cookies);
        if let Some((name, value)) = header_part.trim().split_once(':') {
            token
                .headers
                .insert(name.trim().to_string(), value.trim().to_string());
        }
    } else {
        parse_cookie_string(raw, &mut token.cookies);
    }
    Ok(token)
}

/// Split `LEAFLOW_TOKENS` on `&` and parse every entry. Entries that fail to
/// parse are logged and skipped; numbering follows the position in the list.
pub fn load_accounts(raw: &str) -> Vec<LeafLowAccount> {
    let accounts: Vec<LeafLowAccount> = raw
        .split('&')
        .enumerate()
        .filter(|(_, entry)| !entry.trim().is_empty())
        .filter_map(|(idx, entry)| {
            let name = format!("account {}", idx + 1);
            match parse_token(entry) {
                Ok(token) => Some(LeafLowAccount { name, token }),
                Err(e) => {
                    tracing::error!("Skipping {name}: {e}");
                    None
                }
            }
        })
        .collect();
    tracing::info!("Loaded {} LeafLow account(s)", accounts.len());
    accounts
}
