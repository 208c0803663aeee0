//! Where migrations come from.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MigrateError, MigrateResult};
use crate::migration::Migration;
use crate::parser::parse_migration;

/// Content of a freshly created migration file.
pub const TEMPLATE: &str = "-- +migrate Up\n\n-- +migrate Down\n";

/// File extension of migration scripts.
pub const EXTENSION: &str = ".sql";

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("name pattern is valid"));

/// A collection of migration scripts.
pub trait MigrationSource: Send + Sync {
    /// Parse every migration, sorted ascending by id.
    fn find_migrations(&self) -> MigrateResult<Vec<Migration>>;
}

impl<T: MigrationSource + ?Sized> MigrationSource for Box<T> {
    fn find_migrations(&self) -> MigrateResult<Vec<Migration>> {
        (**self).find_migrations()
    }
}

/// Migrations held in memory, usually compiled into the binary with
/// `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from a static `(file name, content)` table.
    pub fn from_static(files: &[(&str, &str)]) -> Self {
        files
            .iter()
            .fold(Self::new(), |source, (name, content)| source.with_file(*name, *content))
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(name.into(), content.into());
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl MigrationSource for MemorySource {
    fn find_migrations(&self) -> MigrateResult<Vec<Migration>> {
        let mut migrations = self
            .files
            .iter()
            .filter(|(name, _)| is_migration_file(name))
            .map(|(name, content)| parse_migration(name, content))
            .collect::<MigrateResult<Vec<_>>>()?;

        migrations.sort();
        Ok(migrations)
    }
}

/// Migrations read from a directory on disk. Subdirectories are ignored.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl MigrationSource for DirSource {
    fn find_migrations(&self) -> MigrateResult<Vec<Migration>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| MigrateError::io(&self.dir, e))?;

        let mut migrations = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MigrateError::io(&self.dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !is_migration_file(name) {
                continue;
            }

            let content = fs::read_to_string(&path).map_err(|e| MigrateError::io(&path, e))?;
            migrations.push(parse_migration(name, &content)?);
        }

        migrations.sort();

        tracing::debug!(dir = %self.dir.display(), count = migrations.len(), "Loaded migrations");
        Ok(migrations)
    }
}

fn is_migration_file(name: &str) -> bool {
    name.ends_with(EXTENSION) && name.len() > EXTENSION.len()
}

/// Scaffold an empty migration `<unix_ts>_<name>.sql` in `dir`.
///
/// The directory is created when missing. An existing file is never
/// overwritten.
pub fn create(dir: impl AsRef<Path>, name: &str, now: DateTime<Utc>) -> MigrateResult<PathBuf> {
    if !NAME_PATTERN.is_match(name) {
        return Err(MigrateError::InvalidName(name.to_string()));
    }

    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| MigrateError::io(dir, e))?;

    let path = dir.join(format!("{}_{}{}", now.timestamp(), name, EXTENSION));
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .and_then(|mut file| std::io::Write::write_all(&mut file, TEMPLATE.as_bytes()))
        .map_err(|e| MigrateError::io(&path, e))?;

    tracing::info!(path = %path.display(), "Created migration");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_sorts_and_filters() {
        let source = MemorySource::from_static(&[
            ("10_b.sql", "-- +migrate Up\nSELECT 2;\n"),
            ("README.md", "not a migration"),
            ("9_a.sql", "-- +migrate Up\nSELECT 1;\n"),
        ]);
        assert_eq!(source.len(), 3);

        let ids: Vec<_> = source
            .find_migrations()
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["9_a.sql", "10_b.sql"]);
    }

    #[test]
    fn test_memory_source_propagates_parse_error() {
        let source = MemorySource::new()
            .with_file("1_ok.sql", "-- +migrate Up\nSELECT 1;\n")
            .with_file("2_bad.sql", "SELECT 1;\n");
        let err = source.find_migrations().unwrap_err();
        assert!(matches!(err, MigrateError::Parse { ref file, .. } if file == "2_bad.sql"));
    }

    #[test]
    fn test_empty_memory_source() {
        let source = MemorySource::new();
        assert!(source.is_empty());
        assert!(source.find_migrations().unwrap().is_empty());
    }

    #[test]
    fn test_is_migration_file() {
        assert!(is_migration_file("1_a.sql"));
        assert!(!is_migration_file(".sql"));
        assert!(!is_migration_file("1_a.sql.bak"));
    }
}
