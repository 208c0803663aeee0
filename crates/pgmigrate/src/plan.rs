//! Deciding which migrations to run.

use std::collections::HashSet;
use std::fmt;

use crate::error::{MigrateError, MigrateResult};
use crate::migration::{Migration, MigrationRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Select the migrations to run in `direction`, in execution order.
///
/// `migrations` must be sorted ascending. Up takes every unapplied migration;
/// Down takes the most recently applied ones, newest first. `max` caps the
/// result, `0` means no cap.
pub fn plan(
    migrations: Vec<Migration>,
    applied: &[MigrationRecord],
    direction: Direction,
    max: usize,
) -> MigrateResult<Vec<Migration>> {
    let known: HashSet<&str> = migrations.iter().map(|m| m.id.as_str()).collect();
    if let Some(unknown) = applied.iter().find(|r| !known.contains(r.id.as_str())) {
        return Err(MigrateError::UnknownMigration(unknown.id.clone()));
    }

    let applied: HashSet<&str> = applied.iter().map(|r| r.id.as_str()).collect();
    let selected: Vec<Migration> = match direction {
        Direction::Up => migrations
            .into_iter()
            .filter(|m| !applied.contains(m.id.as_str()))
            .collect(),
        Direction::Down => migrations
            .into_iter()
            .rev()
            .filter(|m| applied.contains(m.id.as_str()))
            .collect(),
    };

    Ok(match max {
        0 => selected,
        n => selected.into_iter().take(n).collect(),
    })
}
