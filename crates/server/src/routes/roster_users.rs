use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};

use oncall_api::{ListRosterMembersResponse, OkResponse, service};

use crate::error::ApiErr;
use crate::roster;
use crate::routes::auth::{AuthUser, check_team_auth};
use crate::storage::Db;

// ---------------------------------------------------------------------------
// List roster members
// ---------------------------------------------------------------------------

/// GET /api/teams/{team}/rosters/{roster}/users: list a roster's members.
pub async fn list_roster_users(
    State(db): State<Db>,
    _user: AuthUser,
    Path((team, roster)): Path<(String, String)>,
) -> Result<Json<ListRosterMembersResponse>, ApiErr> {
    let users = roster::list_members(&db, &team, &roster)?;
    Ok(Json(ListRosterMembersResponse { users }))
}

// ---------------------------------------------------------------------------
// Remove member from roster
// ---------------------------------------------------------------------------

/// DELETE /api/teams/{team}/rosters/{roster}/users/{user}: remove a user
/// from a roster (team admin only).
pub async fn remove_roster_user(
    State(db): State<Db>,
    user: AuthUser,
    Path((team, roster, name)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiErr> {
    check_team_auth(&db, &team, &user)?;
    roster::remove_member(&db, &user.name, &team, &roster, &name)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Put member into / out of rotation
// ---------------------------------------------------------------------------

/// PUT /api/teams/{team}/rosters/{roster}/users/{user}: set the member's
/// rotation flag from `{"in_rotation": ...}` (team admin only).
pub async fn edit_roster_user(
    State(db): State<Db>,
    user: AuthUser,
    Path((team, roster, name)): Path<(String, String, String)>,
    body: Bytes,
) -> Result<Json<OkResponse>, ApiErr> {
    check_team_auth(&db, &team, &user)?;
    let data = service::load_json_body(&body)?;
    let in_rotation = service::extract_in_rotation(&data)?;

    roster::set_rotation(&db, &user.name, &team, &roster, &name, in_rotation, &data)?;
    Ok(Json(OkResponse { ok: true }))
}
