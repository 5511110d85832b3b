use crate::Notifier;
use async_trait::async_trait;
use dailyclaim_core::config::NOTIFY_TIMEOUT;
use dailyclaim_core::http::{ensure_success, ClientOptions};
use dailyclaim_core::AppError;
use serde::{Deserialize, Serialize};

pub const ENDPOINT: &str = "http://www.pushplus.plus/send";
const CHANNEL: &str = "PushPlus";

#[derive(Serialize)]
struct SendRequest<'a> {
    token: &'a str,
    title: &'a str,
    content: &'a str,
    template: &'static str,
}

#[derive(Deserialize)]
struct SendResponse {
    code: i64,
    #[serde(default)]
    msg: String,
}

pub struct PushPlus {
    client: reqwest::Client,
    token: String,
    endpoint: String,
}

impl PushPlus {
    pub fn new(token: &str) -> Result<Self, AppError> {
        let client = ClientOptions::default().timeout(NOTIFY_TIMEOUT).build()?;
        Ok(Self {
            client,
            token: token.to_string(),
            endpoint: ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

#[async_trait]
impl Notifier for PushPlus {
    fn name(&self) -> &str {
        CHANNEL
    }

    async fn send(&self, title: &str, content: &str) -> Result<(), AppError> {
        let body = SendRequest {
            token: &self.token,
            title,
            content,
            template: "html",
        };
        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        let resp = ensure_success(resp, CHANNEL, "Send").await?;

        let parsed: SendResponse = resp.json().await?;
        if parsed.code != 200 {
            return Err(AppError::notify(
                CHANNEL,
                format!("code {}: {}", parsed.code, parsed.msg),
            ));
        }
        Ok(())
    }
}
