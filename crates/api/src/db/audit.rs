//! Audit log query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::Built;
use super::tables::Audit;

/// INSERT one audit record. `context` is serialized JSON.
pub fn insert(owner: &str, team: &str, action: &str, context: &str, timestamp: i64) -> Built {
    Query::insert()
        .into_table(Audit::Table)
        .columns([
            Audit::OwnerName,
            Audit::TeamName,
            Audit::ActionName,
            Audit::Context,
            Audit::Timestamp,
        ])
        .values_panic([
            owner.into(),
            team.into(),
            action.into(),
            context.into(),
            timestamp.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// List a team's audit records (owner, action, context, timestamp), oldest first.
pub fn list_for_team(team: &str) -> Built {
    Query::select()
        .columns([
            Audit::OwnerName,
            Audit::ActionName,
            Audit::Context,
            Audit::Timestamp,
        ])
        .from(Audit::Table)
        .and_where(Expr::col(Audit::TeamName).eq(team))
        .order_by(Audit::Id, Order::Asc)
        .build(SqliteQueryBuilder)
}
