//! Display formatting for CLI output

use console::style;
use nxrm_client::{Outcome, Report, SkippedMember};

/// Print the outcome of a create, update or delete
pub fn report(report: &Report) {
    let icon = match report.outcome {
        Outcome::Created | Outcome::Updated | Outcome::Deleted => style("✓").green().bold(),
        Outcome::AlreadyExists => style("○").yellow(),
        Outcome::NotFound => style("⚠").yellow(),
    };
    println!("{} {}", icon, report);
}

/// Print group members left out of a membership change
pub fn skipped(members: &[SkippedMember]) {
    for member in members {
        println!("  {} {}", style("○").yellow(), member);
    }
}

/// Print a titled list of names followed by its size
pub fn names(title: &str, names: &[String]) {
    println!("{}", style(title).bold());
    for name in names {
        println!("  {}", name);
    }
    println!();
    println!("{} {}", style("Total:").dim(), names.len());
}

/// Print one aligned `label: value` line
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("{:<14} {}", style(format!("{}:", label)).dim(), value);
}

/// Print a section header
pub fn header(title: &str) {
    println!("{}", style(title).bold().cyan());
}
