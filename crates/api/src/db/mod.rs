//! Shared database schema, migrations, and query builders.
//!
//! Builders return `(sql, values)` pairs for the SQLite backend; the server
//! binds the values and executes them inside its unit of work.

pub mod audit;
pub mod migrations;
pub mod notifications;
pub mod roster_users;
pub mod tables;
pub mod teams;
pub mod users;

// Re-export tables for convenience
pub use tables::*;

/// A built statement: SQL text plus its positional parameter values.
pub type Built = (String, sea_query::Values);
