//! List command (render + export).
//!
//! Two independent consumers of one fetched dataset: the rendered
//! table is filtered by active flag and label pattern, the export file
//! always carries the full set.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, LocalResult, TimeZone};
use clap::Args;
use regex::Regex;
use tabled::Tabled;
use tracing::warn;

use veil_client::AliasRecord;

use crate::export;
use crate::output::{print_success, print_table};

use super::CommandContext;

/// List command.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Show inactive aliases instead of active ones.
    #[arg(long)]
    inactive: bool,

    /// Only display aliases whose label matches this regular expression.
    #[arg(long)]
    search: Option<String>,

    /// Export file path.
    #[arg(long, default_value = "emails.txt")]
    output: PathBuf,
}

impl Default for ListCommand {
    fn default() -> Self {
        Self {
            inactive: false,
            search: None,
            output: PathBuf::from("emails.txt"),
        }
    }
}

impl ListCommand {
    /// Fetch, render, export. Ctrl+C exits cleanly at any point.
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        tokio::select! {
            result = self.execute(ctx) => result,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    }

    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let pattern = self
            .search
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("Invalid search pattern")?;

        let client = ctx.client()?;

        let envelope = match client.list_aliases().await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "List call yielded no response");
                return Ok(());
            }
        };

        if !envelope.success {
            warn!(reason = %envelope.error_message(), "Failed to list aliases");
            return Ok(());
        }

        let Some(result) = envelope.result else {
            warn!("List succeeded but carried no result");
            return Ok(());
        };
        let records = result.hme_emails;

        print_table(&visible_rows(&records, !self.inactive, pattern.as_ref()));

        let rows = export_rows(&records);
        export::write(&self.output, &rows)?;
        print_success(&format!(
            "Wrote {} aliases to {} in format label;address;time;status",
            rows.len(),
            self.output.display()
        ));

        Ok(())
    }
}

/// One rendered table row.
#[derive(Debug, Clone, Tabled)]
struct AliasRow {
    #[tabled(rename = "Label")]
    label: String,

    #[tabled(rename = "Address")]
    address: String,

    #[tabled(rename = "Created")]
    created: String,

    #[tabled(rename = "Status")]
    status: String,
}

impl AliasRow {
    fn from_record(record: &AliasRecord) -> Self {
        Self {
            label: record.label.clone(),
            address: record.hme.clone(),
            created: format_created(record.create_timestamp),
            status: status_label(record.is_active).to_string(),
        }
    }

    fn export_line(&self) -> String {
        format!(
            "{};{};{};{}",
            self.label, self.address, self.created, self.status
        )
    }
}

fn status_label(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Inactive"
    }
}

/// Epoch milliseconds to the local `YYYY-MM-DD HH:MM` display format.
fn format_created(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms) {
        LocalResult::Single(created) => created.format("%Y-%m-%d %H:%M").to_string(),
        _ => "-".to_string(),
    }
}

/// Rows for the rendered table: the active flag must equal the filter,
/// and the label must match the pattern when one is given.
fn visible_rows(records: &[AliasRecord], active: bool, pattern: Option<&Regex>) -> Vec<AliasRow> {
    records
        .iter()
        .filter(|record| record.is_active == active)
        .filter(|record| pattern.map_or(true, |pattern| pattern.is_match(&record.label)))
        .map(AliasRow::from_record)
        .collect()
}

/// Rows for the export file: every record, in service order.
fn export_rows(records: &[AliasRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| AliasRow::from_record(record).export_line())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: &str, active: bool) -> AliasRecord {
        AliasRecord {
            label: label.to_string(),
            hme: format!("{label}@veil.example"),
            create_timestamp: 1_700_000_000_000,
            is_active: active,
        }
    }

    fn sample() -> Vec<AliasRecord> {
        vec![
            record("shopping-site", true),
            record("newsletter", false),
            record("old-forum", false),
        ]
    }

    #[test]
    fn active_filter_and_pattern_select_one_of_three() {
        let records = sample();
        let pattern = Regex::new("shop").unwrap();

        let visible = visible_rows(&records, true, Some(&pattern));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].label, "shopping-site");

        assert_eq!(export_rows(&records).len(), 3);
    }

    #[test]
    fn pattern_is_a_substring_search() {
        let records = sample();
        let pattern = Regex::new("letter").unwrap();

        let visible = visible_rows(&records, false, Some(&pattern));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].label, "newsletter");
    }

    #[test]
    fn no_pattern_keeps_every_matching_flag() {
        let records = sample();
        assert_eq!(visible_rows(&records, false, None).len(), 2);
        assert_eq!(visible_rows(&records, true, None).len(), 1);
    }

    #[test]
    fn export_is_independent_of_any_filter() {
        let records = sample();

        // Different rendered views, identical export contents.
        let _ = visible_rows(&records, true, Some(&Regex::new("shop").unwrap()));
        let first = export_rows(&records);
        let _ = visible_rows(&records, false, None);
        let second = export_rows(&records);

        assert_eq!(first, second);
        assert!(first[1].contains(";Inactive"));
    }

    #[test]
    fn export_line_joins_fields_with_semicolons() {
        let row = AliasRow::from_record(&record("shopping-site", true));
        let line = row.export_line();

        let fields: Vec<&str> = line.split(';').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], "shopping-site");
        assert_eq!(fields[1], "shopping-site@veil.example");
        assert_eq!(fields[3], "Active");
    }

    #[test]
    fn created_uses_the_fixed_display_format() {
        let created = format_created(1_700_000_000_000);
        let shape = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}$").unwrap();
        assert!(shape.is_match(&created), "unexpected format: {created}");
    }

    #[test]
    fn status_maps_from_the_active_flag() {
        assert_eq!(status_label(true), "Active");
        assert_eq!(status_label(false), "Inactive");
    }
}
