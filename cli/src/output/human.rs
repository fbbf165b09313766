//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::application::ports::CollectionView;
use crate::application::services::tasks::TaskReport;
use crate::application::services::workflow::WorkflowReport;
use crate::domain::{CollectionKey, CreatedDroplet, JobStatus, Record, ShellConfig};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render a collection as a numbered table.
    ///
    /// The `#` column is the one-based index the selector accepts.
    pub fn render_collection(&self, key: CollectionKey, records: &[Record]) {
        if records.is_empty() {
            self.ctx.info(&format!("No {key}."));
            return;
        }
        let table = format_table(key, records);
        println!();
        println!("  {}", key.as_str().to_uppercase().style(self.ctx.styles.header));
        println!("  {}", table.header.style(self.ctx.styles.bold));
        println!("  {}", table.rule.style(self.ctx.styles.dim));
        for row in &table.rows {
            println!("  {row}");
        }
        println!();
    }

    /// Render one status fetch of a remote job.
    pub fn render_event(&self, status: &JobStatus) {
        self.ctx.header(&format!("Event {}", status.id));
        self.ctx.kv(
            "status:    ",
            status.action_status.as_deref().unwrap_or("pending"),
        );
        self.ctx.kv("progress:  ", &format!("{}%", status.percentage));
        if let Some(droplet_id) = status.droplet_id {
            self.ctx.kv("droplet:   ", &droplet_id.to_string());
        }
        if let Some(type_id) = status.event_type_id {
            self.ctx.kv("event type:", &type_id.to_string());
        }
    }

    pub fn render_created(&self, droplet: &CreatedDroplet) {
        self.ctx.success(&format!(
            "Droplet '{}' created (id {})",
            droplet.name, droplet.id
        ));
    }

    pub fn render_workflow(&self, report: &WorkflowReport) {
        self.ctx.success(&format!(
            "Droplet {} retired in {} steps",
            report.droplet_id,
            report.steps.len()
        ));
    }

    /// Render the outcome of a background task the shell has collected.
    pub fn render_task_report(&self, report: &TaskReport) {
        match &report.result {
            Ok(outcome) => self.ctx.success(&format!(
                "{} finished after {} polls",
                report.label, outcome.polls
            )),
            Err(e) => self.ctx.error(&format!("{} failed: {e:#}", report.label)),
        }
    }

    /// Render the labels of background tasks still running.
    pub fn render_tasks(&self, labels: &[String]) {
        if labels.is_empty() {
            self.ctx.info("No background tasks.");
            return;
        }
        self.ctx.header("Background tasks:");
        for label in labels {
            if !self.ctx.quiet {
                println!("    {label}");
            }
        }
    }

    /// Render the current configuration. The API key is masked.
    pub fn render_config(&self, config: &ShellConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {:<24} {}", "api.url:", config.api.url);
        println!(
            "  {:<24} {}",
            "api.client_id:",
            or_unset(&config.api.client_id)
        );
        println!(
            "  {:<24} {}",
            "api.api_key:",
            or_unset(&mask_secret(&config.api.api_key))
        );
        println!(
            "  {:<24} {}",
            "polling.interval_secs:", config.polling.interval_secs
        );
        println!(
            "  {:<24} {}",
            "droplet.default_name:", config.droplet.default_name
        );
        println!(
            "  {:<24} {}",
            "snapshot.name_format:", config.snapshot.name_format
        );
        println!();
    }

    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("dosh {version}");
    }

    /// Print the interactive shell help text.
    pub fn render_help(&self, text: &str) {
        println!("{text}");
    }
}

impl CollectionView for HumanRenderer<'_> {
    fn show(&self, key: CollectionKey, records: &[Record]) {
        self.render_collection(key, records);
    }
}

/// Plain-text table lines, before styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLines {
    pub header: String,
    pub rule: String,
    pub rows: Vec<String>,
}

/// Lay out `records` under the columns of `key`, prefixed by a one-based
/// `#` column.
#[must_use]
pub fn format_table(key: CollectionKey, records: &[Record]) -> TableLines {
    let mut headings = vec!["#".to_string()];
    headings.extend(key.columns().iter().map(|c| column_title(c)));

    let cells: Vec<Vec<String>> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut row = vec![(i + 1).to_string()];
            row.extend(r.cells());
            row
        })
        .collect();

    let mut widths: Vec<usize> = headings.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header = join_row(&headings, &widths);
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    let rows = cells.iter().map(|row| join_row(row, &widths)).collect();
    TableLines { header, rule, rows }
}

fn join_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, w))| {
            if i == 0 {
                format!("{cell:>w$}")
            } else {
                format!("{cell:<w$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// `ip_address` → `Ip Address`.
#[must_use]
pub fn column_title(column: &str) -> String {
    column
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep the last four characters of a secret visible.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() { "(not set)" } else { value }
}
