pub mod ikuuu;
pub mod ipzan;
pub mod leaflow;
pub mod notify;
pub mod rainyun;
pub mod tline;

use crate::output;
use dailyclaim_core::RunReport;
use dailyclaim_notify::NotifyHub;

/// Print the report, push it to the configured channels and return whether
/// every account succeeded.
pub async fn finish(hub: &NotifyHub, title: &str, report: &RunReport) -> bool {
    finish_with_body(hub, title, &report.render(), report).await
}

/// Like [`finish`] with a site-specific notification body.
pub async fn finish_with_body(hub: &NotifyHub, title: &str, body: &str, report: &RunReport) -> bool {
    output::print_report(report);
    hub.send(title, body).await;
    report.all_succeeded()
}
