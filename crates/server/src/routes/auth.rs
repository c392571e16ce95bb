use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use oncall_api::{ServiceError, db};

use crate::error::ApiErr;
use crate::storage::{self, Db};

// ---------------------------------------------------------------------------
// Auth extractor
// ---------------------------------------------------------------------------

/// Authenticated user extracted from the `Authorization: Bearer <api_key>` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub name: String,
    /// Superuser: may act for any team.
    pub god: bool,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Db: FromRef<S>,
{
    type Rejection = ApiErr;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let db = Db::from_ref(state);

        let api_key = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiErr::unauthorized("missing or invalid Authorization header"))?;

        let conn = db.conn();
        let user = storage::query_row(&conn, db::users::get_by_api_key(api_key), |row| {
            Ok(AuthUser {
                user_id: row.get(0)?,
                name: row.get(1)?,
                god: row.get::<_, i64>(2)? != 0,
            })
        })
        .map_err(|e| ApiErr::from(ServiceError::from_db("look up API key")(e)))?;

        user.ok_or_else(|| ApiErr::unauthorized("invalid API key"))
    }
}

// ---------------------------------------------------------------------------
// Team authorization
// ---------------------------------------------------------------------------

/// Allow `user` to act for `team` if they administer it or are a superuser.
///
/// Unknown teams are indistinguishable from teams the caller does not admin.
pub fn check_team_auth(db: &Db, team: &str, user: &AuthUser) -> Result<(), ServiceError> {
    if user.god {
        return Ok(());
    }

    let conn = db.conn();
    let is_admin = storage::query_row(&conn, db::teams::admin_exists(team, user.user_id), |row| {
        row.get::<_, i64>(0).map(|c| c > 0)
    })
    .map_err(ServiceError::from_db("check team admin"))?
    .unwrap_or(false);

    if is_admin {
        Ok(())
    } else {
        tracing::warn!(team, user = %user.name, "team action denied");
        Err(ServiceError::Forbidden(format!(
            "action not allowed for \"{}\"",
            user.name
        )))
    }
}
