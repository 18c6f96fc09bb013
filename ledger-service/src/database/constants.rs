//! Database defaults and migration metadata

/// Current database schema version
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Migration descriptions, indexed by version - 1
pub const MIGRATION_DESCRIPTIONS: &[&str] = &[
    "Events, participation records, audit ledger and role grants",
    "Event templates and contract deployments",
];

/// Database file used when DB_PATH is unset
pub const DEFAULT_DB_PATH: &str = "civic_ledger.db";

/// In-memory database marker accepted in DB_PATH
pub const MEMORY_DB_PATH: &str = ":memory:";

/// Page size of the admin transaction listing
pub const TRANSACTIONS_PAGE_SIZE: i64 = 50;
