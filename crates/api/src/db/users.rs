//! User / auth query builders.

use sea_query::{Expr, Query, SqliteQueryBuilder};

use super::Built;
use super::tables::User;

/// Find a user by API key (returns id, name, god).
pub fn get_by_api_key(api_key: &str) -> Built {
    Query::select()
        .columns([User::Id, User::Name, User::God])
        .from(User::Table)
        .and_where(Expr::col(User::ApiKey).eq(api_key))
        .build(SqliteQueryBuilder)
}
