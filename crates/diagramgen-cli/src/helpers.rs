//! Shared CLI helpers — banner and result printing.

use colored::Colorize;
use serde_json::Value;

/// Print a generated diagram to stdout.
pub fn print_diagram(code: &str) {
    println!();
    println!("{}", "📐 Diagram".cyan().bold());
    println!("{code}");
    println!();
}

/// Print a generation failure to stderr.
pub fn print_failure(summary: &str, details: &Value) {
    eprintln!();
    eprintln!("{} {}", "✗".red().bold(), summary.red());
    match details {
        Value::String(s) => eprintln!("  {}", s.dimmed()),
        other => eprintln!("  {}", other.to_string().dimmed()),
    }
    eprintln!();
}

/// Print the banner shown at server start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "📐 Diagramgen".cyan().bold(), version.dimmed());
    println!();
}
