//! TLine line service: register a fresh account through a proxy and report
//! its subscription links.

use dailyclaim_core::config::ProxyConfig;
use dailyclaim_core::http::{ensure_success, ClientOptions};
use dailyclaim_core::AppError;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

pub const DEFAULT_KEY: &str = "MLE!^Re4XcsrxBbR&!DvenL$";
pub const DEFAULT_EMAIL_DOMAIN: &str = "gmail.com";
const SERVICE: &str = "TLine";
const NOT_FOUND: &str = "not found";

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// 8 lowercase alphanumerics, starting with a letter.
pub fn generate_name<R: Rng>(rng: &mut R) -> String {
    let mut name = String::with_capacity(8);
    name.push(*LOWER.choose(rng).unwrap_or(&b'a') as char);
    let pool: Vec<u8> = LOWER.iter().chain(DIGITS).copied().collect();
    for _ in 1..8 {
        name.push(*pool.choose(rng).unwrap_or(&b'0') as char);
    }
    name
}

/// 12 alphanumerics with at least one digit, one lowercase and one uppercase letter.
pub fn generate_password<R: Rng>(rng: &mut R) -> String {
    let mut chars: Vec<char> = vec![
        *LOWER.choose(rng).unwrap_or(&b'a') as char,
        *UPPER.choose(rng).unwrap_or(&b'A') as char,
        *DIGITS.choose(rng).unwrap_or(&b'0') as char,
    ];
    chars.extend((0..9).map(|_| rng.sample(Alphanumeric) as char));
    chars.shuffle(rng);
    chars.into_iter().collect()
}

/// Request signature: hex MD5 of name, password and the shared key.
pub fn register_sign(name: &str, passwd: &str, key: &str) -> String {
    hex::encode(md5::compute(format!("{name}{passwd}{key}")).0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    pub clash: String,
    pub v2ray: String,
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s"'<>]+"#).expect("valid regex"))
}

/// Pick the Clash and V2Ray subscription URLs out of the user page.
pub fn extract_links(html: &str) -> Links {
    let urls: Vec<String> = url_re()
        .find_iter(html)
        .map(|m| m.as_str().replace("&amp;", "&"))
        .collect();
    let clash = urls
        .iter()
        .find(|u| u.to_lowercase().contains("clash"))
        .cloned()
        .unwrap_or_else(|| NOT_FOUND.to_string());
    let v2ray = urls
        .iter()
        .find(|u| {
            let lower = u.to_lowercase();
            !lower.contains("clash") && (lower.contains("v2ray") || lower.contains("sub="))
        })
        .cloned()
        .unwrap_or_else(|| NOT_FOUND.to_string());
    Links { clash, v2ray }
}

#[derive(Deserialize)]
struct RetResponse {
    ret: i64,
    #[serde(default)]
    msg: String,
}

#[derive(Debug, Clone)]
pub struct TLineSettings {
    pub base: String,
    pub key: String,
    pub email_domain: String,
    pub proxy: Option<ProxyConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub links: Option<Links>,
}

impl Registration {
    pub fn message(&self) -> String {
        let mut msg = format!(
            "Registered!\nUsername: {}\nEmail: {}\nPassword: {}\n",
            self.name, self.email, self.password
        );
        if let Some(links) = &self.links {
            msg.push_str(&format!(
                "\nClash subscription: {}\nV2Ray subscription: {}",
                links.clash, links.v2ray
            ));
        }
        msg
    }
}

pub struct TLineRegistrator {
    client: reqwest::Client,
    settings: TLineSettings,
}

impl TLineRegistrator {
    pub fn new(settings: TLineSettings) -> Result<Self, AppError> {
        if let Some(proxy) = &settings.proxy {
            tracing::info!("Routing TLine traffic through {}", proxy.url());
        }
        let client = ClientOptions::default()
            .proxy(settings.proxy.clone())
            .with_session()
            .build()?;
        Ok(Self { client, settings })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.settings.base.trim_end_matches('/'))
    }

    pub fn email_for(&self, name: &str) -> String {
        format!("{name}@{}", self.settings.email_domain)
    }

    pub async fn register(&self, name: &str, passwd: &str) -> Result<(), AppError> {
        let email = self.email_for(name);
        let sign = register_sign(name, passwd, &self.settings.key);
        let form = [
            ("name", name),
            ("email", email.as_str()),
            ("passwd", passwd),
            ("repasswd", passwd),
            ("code", ""),
            ("sign", sign.as_str()),
        ];
        let resp = self
            .client
            .post(self.url("/auth/register"))
            .form(&form)
            .send()
            .await?;
        let resp = ensure_success(resp, SERVICE, "Register").await?;
        let parsed: RetResponse = resp.json().await?;
        if parsed.ret != 1 {
            return Err(AppError::api(
                SERVICE,
                format!("registration rejected: {}", parsed.msg),
            ));
        }
        Ok(())
    }

    /// Log in and return the HTML of the user page.
    pub async fn login_and_fetch_user(&self, email: &str, passwd: &str) -> Result<String, AppError> {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .form(&[("email", email), ("passwd", passwd)])
            .send()
            .await?;
        if resp.cookies().next().is_none() {
            return Err(AppError::Login(format!("no session cookie ({})", resp.status())));
        }

        let resp = self
            .client
            .get(self.url("/user"))
            .send()
            .await?;
        let resp = ensure_success(resp, SERVICE, "Fetch user page").await?;
        Ok(resp.text().await?)
    }

    /// Register a random account, then try to collect its subscription links.
    pub async fn run(&self) -> Result<Registration, AppError> {
        let (name, password) = {
            let mut rng = rand::thread_rng();
            (generate_name(&mut rng), generate_password(&mut rng))
        };
        tracing::info!("Registering TLine account {name}");
        self.register(&name, &password).await?;

        let email = self.email_for(&name);
        let links = match self.login_and_fetch_user(&email, &password).await {
            Ok(html) => Some(extract_links(&html)),
            Err(e) => {
                tracing::warn!("Registered but could not load the user page: {e}");
                None
            }
        };

        Ok(Registration {
            name,
            email,
            password,
            links,
        })
    }
}
