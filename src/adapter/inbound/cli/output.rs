//! Terminal output for CLI handlers.
//!
//! Results go to stdout, warnings and errors to stderr, so command output
//! stays pipeable while logs are on.

use std::fmt::Display;

use owo_colors::OwoColorize;

/// Print a section header.
pub fn section(title: &str) {
    println!();
    println!("{}", title.bold());
}

/// Print a labelled value.
pub fn field(label: &str, value: impl Display) {
    println!("  {:<14} {}", label.dimmed(), value);
}

pub fn success(message: &str) {
    println!("  {} {}", "✓".green(), message);
}

pub fn warning(message: &str) {
    eprintln!("  {} {}", "⚠".yellow(), message);
}

pub fn error(message: &str) {
    eprintln!("  {} {}", "×".red(), message);
}
