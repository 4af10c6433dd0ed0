//! Error display for the CLI.
//!
//! The provisioning pipeline absorbs its own failures; what reaches
//! here is setup trouble — an unreadable cookie file, a bad search
//! pattern, an export path that cannot be written.

use colored::Colorize;

use veil_client::ClientError;

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    // Check for specific error types and provide hints
    if let Some(client_err) = err.downcast_ref::<ClientError>() {
        match client_err {
            ClientError::InvalidCookie => {
                eprintln!(
                    "\n{}",
                    "Hint: The cookie file does not contain a usable Cookie header. Re-export your session.".yellow()
                );
            }
            ClientError::Network(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check your network connection and VEIL_API_URL.".yellow()
                );
            }
        }
    } else if err.downcast_ref::<regex::Error>().is_some() {
        eprintln!(
            "\n{}",
            "Hint: --search takes a regular expression.".yellow()
        );
    }
}
