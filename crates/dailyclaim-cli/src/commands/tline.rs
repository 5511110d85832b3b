use crate::output;
use dailyclaim_core::config::ProxyConfig;
use dailyclaim_notify::NotifyHub;
use dailyclaim_sites::tline::{TLineRegistrator, TLineSettings};

pub struct TLineParams {
    pub base_url: String,
    pub key: String,
    pub email_domain: String,
    pub proxy_host: String,
    pub proxy_port: u16,
    pub no_proxy: bool,
}

/// Register one account. Every exit path produces a notification.
pub async fn run(hub: &NotifyHub, params: TLineParams) -> anyhow::Result<bool> {
    let proxy = (!params.no_proxy).then(|| ProxyConfig::new(params.proxy_host, params.proxy_port));
    let settings = TLineSettings {
        base: params.base_url,
        key: params.key,
        email_domain: params.email_domain,
        proxy,
    };

    let registrator = match TLineRegistrator::new(settings) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("Run error: {e}");
            output::error(&msg);
            hub.send("TLine run error", &msg).await;
            return Ok(false);
        }
    };

    match registrator.run().await {
        Ok(registration) => {
            let msg = registration.message();
            output::success(&msg);
            hub.send("TLine registration succeeded", &msg).await;
            Ok(true)
        }
        Err(e) => {
            let msg = format!("Registration failed: {e}");
            output::error(&msg);
            hub.send("TLine registration failed", &msg).await;
            Ok(false)
        }
    }
}
