//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Pagination
// =============================================================================

/// Maximum number of snippets returned by one list request.
/// A requested limit of 0 also falls back to this value.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Largest accepted list offset (SQL `OFFSET` is a signed 64-bit value)
pub const MAX_OFFSET: u64 = i64::MAX as u64;

// =============================================================================
// Snippets
// =============================================================================

/// How far in the future `expires_at` may be set
pub const MAX_EXPIRY_DAYS: i64 = 366;

// =============================================================================
// Authentication
// =============================================================================

/// Authorization scheme expected by the token middleware (case-insensitive)
pub const BEARER_SCHEME: &str = "Bearer";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:4040";

// =============================================================================
// Database
// =============================================================================

pub const DEFAULT_POSTGRES_HOST: &str = "localhost";
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;
pub const DEFAULT_POSTGRES_USER: &str = "postgres";
pub const DEFAULT_POSTGRES_DATABASE: &str = "postgres";
pub const DEFAULT_POSTGRES_TLS_MODE: &str = "disable";

/// Accepted values for `sslmode`
pub const POSTGRES_TLS_MODES: &[&str] = &[
    "disable",
    "allow",
    "prefer",
    "require",
    "verify-ca",
    "verify-full",
];

// =============================================================================
// Migrations
// =============================================================================

/// Directory `migrate create` writes new migration files to
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";
