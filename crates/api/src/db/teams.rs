//! Team authorization query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Query, SqliteQueryBuilder};

use super::Built;
use super::roster_users::team_id_of;
use super::tables::TeamAdmin;

/// Check if a user is an admin of the named team.
pub fn admin_exists(team: &str, user_id: i64) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(TeamAdmin::Table)
        .and_where(Expr::col(TeamAdmin::TeamId).in_subquery(team_id_of(team)))
        .and_where(Expr::col(TeamAdmin::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}
