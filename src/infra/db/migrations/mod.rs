//! Database migrations compiled into the binary.
//!
//! The SQL files live in the top-level `migrations/` directory. Files created
//! with `migrate create` must be added to `FILES` to be embedded.

use pgmigrate::MemorySource;

const FILES: &[(&str, &str)] = &[
    (
        "1700000000_create_snippets.sql",
        include_str!("../../../../migrations/1700000000_create_snippets.sql"),
    ),
    (
        "1700000100_index_snippets_expires_at.sql",
        include_str!("../../../../migrations/1700000100_index_snippets_expires_at.sql"),
    ),
];

/// Migrations shipped with the binary
pub fn embedded() -> MemorySource {
    MemorySource::from_static(FILES)
}

#[cfg(test)]
mod tests {
    use pgmigrate::MigrationSource;

    use super::*;

    #[test]
    fn test_embedded_migrations_parse() {
        let migrations = embedded().find_migrations().unwrap();
        let ids: Vec<_> = migrations.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "1700000000_create_snippets.sql",
                "1700000100_index_snippets_expires_at.sql"
            ]
        );
        assert!(migrations.iter().all(|m| !m.up.is_empty() && !m.down.is_empty()));
        assert!(migrations[0].up[0].contains("CREATE TABLE IF NOT EXISTS snippets"));
    }

    #[test]
    fn test_embedded_table_matches_directory() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
        let on_disk = pgmigrate::DirSource::new(dir).find_migrations().unwrap();
        assert_eq!(on_disk, embedded().find_migrations().unwrap());
    }
}
