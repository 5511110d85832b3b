use crate::config::{ProxyConfig, DEFAULT_USER_AGENT, REQUEST_TIMEOUT};
use crate::error::AppError;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;

/// Builder inputs for a per-site `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub user_agent: String,
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
    pub proxy: Option<ProxyConfig>,
    pub accept_invalid_certs: bool,
    /// Shared cookie store. Every cookie the server sets, including during
    /// redirects, is kept and sent back on later requests.
    pub cookies: Option<Arc<Jar>>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: REQUEST_TIMEOUT,
            headers: Vec::new(),
            proxy: None,
            accept_invalid_certs: false,
            cookies: None,
        }
    }
}

impl ClientOptions {
    pub fn user_agent(mut self, ua: &str) -> Self {
        self.user_agent = ua.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn proxy(mut self, proxy: Option<ProxyConfig>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Keep a session: use `jar` (possibly pre-seeded) as the cookie store.
    pub fn cookie_jar(mut self, jar: Arc<Jar>) -> Self {
        self.cookies = Some(jar);
        self
    }

    /// Keep a session starting from an empty cookie store.
    pub fn with_session(self) -> Self {
        self.cookie_jar(Arc::new(Jar::default()))
    }

    pub fn build(&self) -> Result<reqwest::Client, AppError> {
        let headers = header_map(&self.headers)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .default_headers(headers);

        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.url())?);
        }
        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(jar) = &self.cookies {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        Ok(builder.build()?)
    }
}

/// Convert `(name, value)` pairs into a `HeaderMap`, rejecting invalid names or values.
pub fn header_map(pairs: &[(String, String)]) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AppError::Header(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| AppError::Header(format!("{name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Turn a non-2xx response into `AppError::Api`, keeping status and body.
pub async fn ensure_success(
    resp: reqwest::Response,
    service: &str,
    action: &str,
) -> Result<reqwest::Response, AppError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(AppError::api(service, format!("{action} failed ({status}): {text}")))
}
