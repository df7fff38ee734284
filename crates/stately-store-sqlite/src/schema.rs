//! SQL schema for the fun-fact store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per state code. The ordered fact list is stored as a JSON array
-- of strings; array order defines the public 1-based index.
CREATE TABLE IF NOT EXISTS fun_facts (
    state_code TEXT PRIMARY KEY,    -- two-letter USPS code, uppercase
    facts_json TEXT NOT NULL DEFAULT '[]'
);

PRAGMA user_version = 1;
";
