//! Notification channels.
//!
//! Every bot hands its final text to a [`NotifyHub`], which fans it out to
//! whichever channels have credentials configured. Delivery problems are
//! logged and never fail the bot run.

pub mod dingtalk;
pub mod pushplus;

use async_trait::async_trait;
use dailyclaim_core::AppError;
use futures::future::join_all;

pub use dingtalk::DingTalk;
pub use pushplus::PushPlus;

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, title: &str, content: &str) -> Result<(), AppError>;
}

/// Credentials for the built-in channels; empty strings mean "not configured".
#[derive(Debug, Clone, Default)]
pub struct NotifySettings {
    pub pushplus_token: String,
    pub dd_bot_token: String,
    pub dd_bot_secret: String,
}

fn has_value(s: &str) -> bool {
    !s.trim().is_empty()
}

#[derive(Default)]
pub struct NotifyHub {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifyHub {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    /// A hub with no channels; `send` only logs.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Register every channel whose credentials are complete.
    pub fn from_settings(settings: &NotifySettings) -> Result<Self, AppError> {
        let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();

        if has_value(&settings.pushplus_token) {
            notifiers.push(Box::new(PushPlus::new(settings.pushplus_token.trim())?));
        }

        match (
            has_value(&settings.dd_bot_token),
            has_value(&settings.dd_bot_secret),
        ) {
            (true, true) => notifiers.push(Box::new(DingTalk::new(
                settings.dd_bot_token.trim(),
                settings.dd_bot_secret.trim(),
            )?)),
            (true, false) | (false, true) => {
                tracing::warn!("DD_BOT_TOKEN and DD_BOT_SECRET must both be set; DingTalk disabled")
            }
            (false, false) => {}
        }

        if notifiers.is_empty() {
            tracing::info!("No notification channel configured");
        }
        Ok(Self { notifiers })
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Send to all channels concurrently. Returns how many accepted the message.
    pub async fn send(&self, title: &str, content: &str) -> usize {
        if content.trim().is_empty() {
            tracing::warn!("{title}: nothing to push");
            return 0;
        }

        let results = join_all(self.notifiers.iter().map(|n| async move {
            tracing::info!("{} notification starting", n.name());
            (n.name(), n.send(title, content).await)
        }))
        .await;

        let mut delivered = 0;
        for (name, result) in results {
            match result {
                Ok(()) => {
                    tracing::info!("{name} notification sent");
                    delivered += 1;
                }
                Err(e) => tracing::error!("{name} notification failed: {e}"),
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn send(&self, _title: &str, _content: &str) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AppError::notify("counting", "boom"))
            } else {
                Ok(())
            }
        }
    }

    fn hub(calls: &Arc<AtomicUsize>) -> NotifyHub {
        NotifyHub::new(vec![
            Box::new(Counting {
                calls: calls.clone(),
                fail: false,
            }),
            Box::new(Counting {
                calls: calls.clone(),
                fail: true,
            }),
        ])
    }

    #[tokio::test]
    async fn send_reaches_every_channel_and_counts_successes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let delivered = hub(&calls).send("title", "content").await;
        assert_eq!(delivered, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_content_is_not_sent() {
        let calls = Arc::new(AtomicUsize::new(0));
        assert_eq!(hub(&calls).send("title", "  ").await, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn settings_register_complete_channels_only() {
        let hub = NotifyHub::from_settings(&NotifySettings {
            pushplus_token: "pp".into(),
            dd_bot_token: "token-only".into(),
            dd_bot_secret: String::new(),
        })
        .unwrap();
        assert_eq!(hub.channel_names(), vec!["PushPlus"]);

        let hub = NotifyHub::from_settings(&NotifySettings {
            pushplus_token: String::new(),
            dd_bot_token: "t".into(),
            dd_bot_secret: "s".into(),
        })
        .unwrap();
        assert_eq!(hub.channel_names(), vec!["DingTalk"]);

        assert!(NotifyHub::from_settings(&NotifySettings::default())
            .unwrap()
            .is_empty());
    }
}
