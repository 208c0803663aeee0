//! Migration records and their ordering.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)").expect("number prefix pattern is valid"));

/// One schema change unit: a forward and a reverse list of statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// File name, e.g. `1700000000_create_snippets.sql`
    pub id: String,
    pub up: Vec<String>,
    pub down: Vec<String>,
}

impl Migration {
    pub fn new(id: impl Into<String>, up: Vec<String>, down: Vec<String>) -> Self {
        Self {
            id: id.into(),
            up,
            down,
        }
    }
}

fn number_prefix(id: &str) -> Option<u128> {
    NUMBER_PREFIX
        .captures(id)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Order two migration ids.
///
/// Numeric prefixes are compared as numbers so `9_x.sql` sorts before
/// `10_y.sql`; ties and ids without a prefix fall back to plain string order.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (number_prefix(a), number_prefix(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

impl Ord for Migration {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_ids(&self.id, &other.id)
    }
}

impl PartialOrd for Migration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Row of the bookkeeping table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    pub id: String,
    pub applied_at: DateTime<Utc>,
}

/// A known migration and, when applied, the moment it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub id: String,
    pub applied_at: Option<DateTime<Utc>>,
}

impl MigrationStatus {
    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }
}
