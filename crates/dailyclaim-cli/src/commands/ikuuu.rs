use anyhow::Context;
use dailyclaim_core::config::split_accounts;
use dailyclaim_notify::NotifyHub;
use dailyclaim_sites::ikuuu;

pub async fn run(hub: &NotifyHub, emails: &str, passwords: &str) -> anyhow::Result<bool> {
    let accounts = ikuuu::pair_accounts(
        &split_accounts(emails, &['\n']),
        &split_accounts(passwords, &['\n']),
    )
    .context("Invalid iKuuu account configuration")?;

    let report = ikuuu::run(&accounts, None).await?;
    Ok(super::finish(hub, "iKuuu check-in", &report).await)
}
