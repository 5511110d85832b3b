use crate::output;
use anyhow::bail;
use dailyclaim_notify::NotifyHub;

pub async fn run(hub: &NotifyHub, title: &str, content: &str) -> anyhow::Result<bool> {
    if hub.is_empty() {
        bail!("No notification channel configured (set PUSH_PLUS_TOKEN or DD_BOT_TOKEN + DD_BOT_SECRET)");
    }

    let channels = hub.channel_names().len();
    let delivered = hub.send(title, content).await;
    if delivered == channels {
        output::success(&format!("Delivered to {delivered}/{channels} channel(s)."));
    } else {
        output::error(&format!("Delivered to {delivered}/{channels} channel(s)."));
    }
    Ok(delivered == channels)
}
