//! Notification subscription query builders.

use sea_query::{Expr, Query, SqliteQueryBuilder};

use super::Built;
use super::roster_users::{team_id_of, user_id_of};
use super::tables::{NotificationQueue, NotificationSetting};

/// DELETE a user's notification settings for a team.
pub fn setting_delete(team: &str, user: &str) -> Built {
    Query::delete()
        .from_table(NotificationSetting::Table)
        .and_where(Expr::col(NotificationSetting::TeamId).in_subquery(team_id_of(team)))
        .and_where(Expr::col(NotificationSetting::UserId).in_subquery(user_id_of(user)))
        .build(SqliteQueryBuilder)
}

/// DELETE a user's still-pending notifications for a team.
pub fn queue_delete_active(team: &str, user: &str) -> Built {
    Query::delete()
        .from_table(NotificationQueue::Table)
        .and_where(Expr::col(NotificationQueue::TeamId).in_subquery(team_id_of(team)))
        .and_where(Expr::col(NotificationQueue::UserId).in_subquery(user_id_of(user)))
        .and_where(Expr::col(NotificationQueue::Active).eq(1))
        .build(SqliteQueryBuilder)
}
