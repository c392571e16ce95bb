//! Notification subscriptions tied to team affiliation.

use oncall_api::{ServiceError, db};

use crate::storage::UnitOfWork;

/// Drop `user`'s notification settings and pending notifications for `team`.
///
/// Called once a user no longer has any affiliation with the team.
pub fn unsubscribe_notifications(
    uow: &UnitOfWork<'_>,
    team: &str,
    user: &str,
) -> Result<(), ServiceError> {
    let settings = uow.execute(
        db::notifications::setting_delete(team, user),
        "delete notification settings",
    )?;
    let queued = uow.execute(
        db::notifications::queue_delete_active(team, user),
        "delete queued notifications",
    )?;
    tracing::info!(team, user, settings, queued, "unsubscribed from team notifications");
    Ok(())
}
