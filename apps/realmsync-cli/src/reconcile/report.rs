//! Per-pass outcome tracking
//!
//! Each reconciler pass records what happened to every row (or, when
//! deleting, every remote object) so the run can be summarized at the end.

use serde::{Deserialize, Serialize};

/// What a pass did with a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Created,
    Updated,
    Deleted,
    /// The row or request failed; the pass moved on
    Failed,
    /// Nothing to do (e.g. a remote object without an id)
    Skipped,
}

/// Result for a single item of a pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    /// Row position in the sheet, or position in the remote listing (0-based)
    pub index: usize,
    pub name: String,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Follow-up steps (role or group wiring) that failed without failing the item
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ItemResult {
    fn new(index: usize, name: String, status: ItemStatus) -> Self {
        Self {
            index,
            name,
            status,
            error: None,
            warnings: Vec::new(),
        }
    }
}

/// Summary of one pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// e.g. `roles`, `groups`, `delete users`
    pub operation: String,
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub failed: usize,
    pub skipped: usize,
    pub items: Vec<ItemResult>,
}

impl ReconcileReport {
    pub fn new(operation: &str, total: usize) -> Self {
        Self {
            operation: operation.to_string(),
            total,
            created: 0,
            updated: 0,
            deleted: 0,
            failed: 0,
            skipped: 0,
            items: Vec::with_capacity(total),
        }
    }

    /// Record a row that was created or updated.
    pub fn record(&mut self, index: usize, outcome: RowOutcome) {
        match outcome.status {
            ItemStatus::Created => self.created += 1,
            ItemStatus::Updated => self.updated += 1,
            ItemStatus::Deleted => self.deleted += 1,
            ItemStatus::Failed => self.failed += 1,
            ItemStatus::Skipped => self.skipped += 1,
        }
        let mut item = ItemResult::new(index, outcome.name, outcome.status);
        item.warnings = outcome.warnings;
        self.items.push(item);
    }

    pub fn add_deleted(&mut self, index: usize, name: String) {
        self.deleted += 1;
        self.items
            .push(ItemResult::new(index, name, ItemStatus::Deleted));
    }

    pub fn add_failure(&mut self, index: usize, name: String, error: String) {
        self.failed += 1;
        let mut item = ItemResult::new(index, name, ItemStatus::Failed);
        item.error = Some(error);
        self.items.push(item);
    }

    pub fn add_skipped(&mut self, index: usize, name: String, reason: String) {
        self.skipped += 1;
        let mut item = ItemResult::new(index, name, ItemStatus::Skipped);
        item.error = Some(reason);
        self.items.push(item);
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn warning_count(&self) -> usize {
        self.items.iter().map(|i| i.warnings.len()).sum()
    }

    pub fn failed_items(&self) -> impl Iterator<Item = &ItemResult> {
        self.items
            .iter()
            .filter(|i| i.status == ItemStatus::Failed)
    }

    /// Print a per-item listing and a one-line summary to stdout.
    ///
    /// Colors are dropped when `NO_COLOR` is set.
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();
        print!("{}", self.render(use_color));
    }

    fn render(&self, use_color: bool) -> String {
        let paint = |color: &str, text: &str| {
            if use_color {
                format!("{color}{text}\x1b[0m")
            } else {
                text.to_string()
            }
        };

        let mut out = format!("{}:\n", capitalize(&self.operation));

        for item in &self.items {
            let (symbol, color, label) = match item.status {
                ItemStatus::Created => ("✓", "\x1b[32m", "Created"),
                ItemStatus::Updated => ("✓", "\x1b[32m", "Updated"),
                ItemStatus::Deleted => ("✓", "\x1b[32m", "Deleted"),
                ItemStatus::Failed => ("✗", "\x1b[31m", "Failed"),
                ItemStatus::Skipped => ("-", "\x1b[33m", "Skipped"),
            };

            out.push_str(&format!("  {} {label} {}", paint(color, symbol), item.name));
            if let Some(ref error) = item.error {
                out.push_str(&format!(" - {error}"));
            }
            out.push('\n');

            for warning in &item.warnings {
                out.push_str(&format!("      {} {warning}\n", paint("\x1b[33m", "!")));
            }
        }

        out.push_str(&format!("  {}\n\n", self.summary()));
        out
    }

    pub fn summary(&self) -> String {
        format!(
            "{} created, {} updated, {} deleted, {} failed, {} skipped ({} warning(s))",
            self.created,
            self.updated,
            self.deleted,
            self.failed,
            self.skipped,
            self.warning_count()
        )
    }
}

/// Successful handling of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub name: String,
    pub status: ItemStatus,
    pub warnings: Vec<String>,
}

impl RowOutcome {
    pub fn created(name: String) -> Self {
        Self {
            name,
            status: ItemStatus::Created,
            warnings: Vec::new(),
        }
    }

    pub fn updated(name: String) -> Self {
        Self {
            name,
            status: ItemStatus::Updated,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
