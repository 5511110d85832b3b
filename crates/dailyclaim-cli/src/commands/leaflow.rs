use dailyclaim_notify::NotifyHub;
use dailyclaim_sites::leaflow::{self, Sites};

pub async fn run(hub: &NotifyHub, tokens: &str) -> anyhow::Result<bool> {
    let accounts = leaflow::load_accounts(tokens);
    let report = leaflow::run(&accounts, Sites::default()).await?;
    Ok(super::finish(hub, "LeafLow check-in results", &report).await)
}
