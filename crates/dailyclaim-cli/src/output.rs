use console::style;
use dailyclaim_core::RunReport;

/// Print one status line per account followed by the summary.
pub fn print_report(report: &RunReport) {
    println!();
    println!("  {}", style(&report.site).bold());
    println!("  {}", "-".repeat(60));
    for o in &report.outcomes {
        let mark = if o.success {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("  {mark} {:<20}  {}", o.account, o.message);
    }

    let summary = report.summary_line();
    if report.all_succeeded() {
        println!("\n  {}", style(summary).green());
    } else {
        println!("\n  {}", style(summary).yellow());
    }
}

pub fn success(msg: &str) {
    println!("{}", style(msg).green());
}

pub fn error(msg: &str) {
    eprintln!("{} {msg}", style("error:").red().bold());
}
