use crate::config::ACCOUNT_DELAY;
use std::time::Duration;

/// Result of processing one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountOutcome {
    pub account: String,
    pub success: bool,
    pub message: String,
}

impl AccountOutcome {
    pub fn ok(account: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(account: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            success: false,
            message: message.into(),
        }
    }
}

/// Outcomes of one bot run, in account order.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub site: String,
    pub outcomes: Vec<AccountOutcome>,
}

impl RunReport {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: AccountOutcome) {
        if outcome.success {
            tracing::info!(account = %outcome.account, "{}", outcome.message);
        } else {
            tracing::error!(account = %outcome.account, "{}", outcome.message);
        }
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    /// An empty run does not count as a success.
    pub fn all_succeeded(&self) -> bool {
        !self.outcomes.is_empty() && self.success_count() == self.total()
    }

    pub fn summary_line(&self) -> String {
        format!("Done: {}/{} succeeded", self.success_count(), self.total())
    }

    /// Notification body: summary line, blank line, one status line per account.
    pub fn render(&self) -> String {
        self.render_with_summary(&self.summary_line())
    }

    /// Same as [`render`](Self::render) with a site-specific summary line.
    pub fn render_with_summary(&self, summary: &str) -> String {
        let mut lines = vec![summary.to_string(), String::new()];
        for o in &self.outcomes {
            let mark = if o.success { "✅" } else { "❌" };
            lines.push(format!("{mark} {}: {}", o.account, o.message));
        }
        lines.join("\n")
    }
}

/// Sleep between sequentially processed accounts; no pause after the last one.
pub async fn pause_between(index: usize, total: usize, delay: Duration) {
    if index + 1 < total && !delay.is_zero() {
        tracing::info!("Waiting {}s before the next account...", delay.as_secs());
        tokio::time::sleep(delay).await;
    }
}

/// Default pause used by every bot.
pub async fn pause_after_account(index: usize, total: usize) {
    pause_between(index, total, ACCOUNT_DELAY).await;
}
