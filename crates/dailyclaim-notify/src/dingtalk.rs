use crate::Notifier;
use async_trait::async_trait;
use base64::Engine;
use dailyclaim_core::config::NOTIFY_TIMEOUT;
use dailyclaim_core::http::{ensure_success, ClientOptions};
use dailyclaim_core::AppError;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

pub const ENDPOINT: &str = "https://oapi.dingtalk.com/robot/send";
const CHANNEL: &str = "DingTalk";

type HmacSha256 = Hmac<Sha256>;

/// Signature for a DingTalk robot with "additional signature" security.
///
/// HMAC-SHA256 keyed with `secret` over `"{timestamp_ms}\n{secret}"`, then
/// standard base64. The caller URL-encodes it when building the query.
pub fn sign(secret: &str, timestamp_ms: i64) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::notify(CHANNEL, format!("HMAC key: {e}")))?;
    mac.update(format!("{timestamp_ms}\n{secret}").as_bytes());
    let digest = mac.finalize().into_bytes();
    Ok(base64::engine::general_purpose::STANDARD.encode(digest))
}

#[derive(Serialize)]
struct MarkdownMessage<'a> {
    msgtype: &'static str,
    markdown: Markdown<'a>,
}

#[derive(Serialize)]
struct Markdown<'a> {
    title: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct RobotResponse {
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

pub struct DingTalk {
    client: reqwest::Client,
    token: String,
    secret: String,
    endpoint: String,
}

impl DingTalk {
    pub fn new(token: &str, secret: &str) -> Result<Self, AppError> {
        let client = ClientOptions::default().timeout(NOTIFY_TIMEOUT).build()?;
        Ok(Self {
            client,
            token: token.to_string(),
            secret: secret.to_string(),
            endpoint: ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Send with an explicit timestamp; `send` uses the current time.
    pub async fn send_at(
        &self,
        title: &str,
        content: &str,
        timestamp_ms: i64,
    ) -> Result<(), AppError> {
        let signature = sign(&self.secret, timestamp_ms)?;
        let timestamp = timestamp_ms.to_string();
        let body = MarkdownMessage {
            msgtype: "markdown",
            markdown: Markdown {
                title,
                text: content,
            },
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("access_token", self.token.as_str()),
                ("timestamp", timestamp.as_str()),
                ("sign", signature.as_str()),
            ])
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json;charset=utf-8"),
            )
            .body(serde_json::to_vec(&body)?)
            .send()
            .await?;
        let resp = ensure_success(resp, CHANNEL, "Robot send").await?;

        let parsed: RobotResponse = resp.json().await?;
        if parsed.errcode != 0 {
            return Err(AppError::notify(
                CHANNEL,
                format!("errcode {}: {}", parsed.errcode, parsed.errmsg),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for DingTalk {
    fn name(&self) -> &str {
        CHANNEL
    }

    async fn send(&self, title: &str, content: &str) -> Result<(), AppError> {
        self.send_at(title, content, chrono::Utc::now().timestamp_millis())
            .await
    }
}
