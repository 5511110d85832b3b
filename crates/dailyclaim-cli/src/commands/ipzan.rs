use dailyclaim_core::config::require_accounts;
use dailyclaim_notify::NotifyHub;
use dailyclaim_sites::ipzan;

pub async fn run(hub: &NotifyHub, accounts: &str) -> anyhow::Result<bool> {
    let accounts = require_accounts("pz_account", Some(accounts), &['@'])?;
    let report = ipzan::run(&accounts, None).await?;

    let title = ipzan::notification_title(chrono::Local::now().date_naive());
    let body = ipzan::notification_body(&report);
    Ok(super::finish_with_body(hub, &title, &body, &report).await)
}
