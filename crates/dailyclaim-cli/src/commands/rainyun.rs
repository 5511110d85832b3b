use dailyclaim_core::config::require_accounts;
use dailyclaim_notify::NotifyHub;
use dailyclaim_sites::rainyun;

pub async fn run(hub: &NotifyHub, api_keys: &str, dev_token: Option<&str>) -> anyhow::Result<bool> {
    let keys = require_accounts("RAINYUN_API_KEY", Some(api_keys), &['&', '\n'])?;
    let report = rainyun::run(&keys, dev_token, None).await?;
    Ok(super::finish(hub, "RainYun check-in", &report).await)
}
