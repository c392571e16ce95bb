//! Audit trail for roster mutations.

use oncall_api::{AuditAction, ServiceError, db};
use serde_json::Value;

use crate::storage::UnitOfWork;

/// Record `action` on `team` by `owner`, inside the caller's transaction.
///
/// The row commits or rolls back together with the mutation it describes.
pub fn create_audit(
    uow: &UnitOfWork<'_>,
    context: &Value,
    team: &str,
    action: AuditAction,
    owner: &str,
) -> Result<(), ServiceError> {
    let context =
        serde_json::to_string(context).map_err(ServiceError::from_db("encode audit context"))?;
    let timestamp = chrono::Utc::now().timestamp();
    uow.execute(
        db::audit::insert(owner, team, action.as_str(), &context, timestamp),
        "insert audit record",
    )?;
    tracing::debug!(team, owner, action = action.as_str(), "audit recorded");
    Ok(())
}
