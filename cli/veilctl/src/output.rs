//! Output formatting for CLI commands.

use colored::Colorize;
use tabled::{Table, Tabled};

/// Print rows as a table, or a dimmed placeholder when there are none.
pub fn print_table<T: Tabled>(rows: &[T]) {
    if rows.is_empty() {
        println!("{}", "No aliases found.".dimmed());
    } else {
        println!("{}", Table::new(rows));
    }
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "Info:".blue().bold(), message);
}
