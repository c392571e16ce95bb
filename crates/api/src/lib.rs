//! Shared API types, validation, and SQL builders for the on-call roster service.
//!
//! This crate is the **single source of truth** for request/response types and
//! the error taxonomy. The Axum server depends on it with the `backend` feature
//! to get the `db` query builders and migrations.

use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
pub mod db;
pub mod service;

// ─── Shared Enums ────────────────────────────────────────────────────────────

/// Kind of mutation recorded in the audit log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    RosterUserDeleted,
    RosterUserEdited,
}

/// Audit tag written when a user is removed from a roster.
pub const ROSTER_USER_DELETED: AuditAction = AuditAction::RosterUserDeleted;
/// Audit tag written when a roster member's rotation flag is edited.
pub const ROSTER_USER_EDITED: AuditAction = AuditAction::RosterUserEdited;

impl AuditAction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::RosterUserDeleted => "roster_user_deleted",
            Self::RosterUserEdited => "roster_user_edited",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Rosters ─────────────────────────────────────────────────────────────────

/// One member of a roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterMemberResponse {
    pub name: String,
    pub in_rotation: bool,
}

/// Returned by `GET /api/teams/{team}/rosters/{roster}/users`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListRosterMembersResponse {
    pub users: Vec<RosterMemberResponse>,
}

/// Generic success acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ─── Service Error ───────────────────────────────────────────────────────────

/// Framework-agnostic service error.
///
/// Route handlers map it to an HTTP status; nothing in here knows about HTTP
/// beyond the numeric code.
#[derive(Debug)]
pub enum ServiceError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ServiceError {
    /// HTTP status code as a `u16`.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Internal(m) => m,
        }
    }

    /// Build a closure that wraps a DB/IO error as `Internal`.
    pub fn from_db<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> Self + '_ {
        move |e| Self::Internal(format!("{context}: {e}"))
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ServiceError {}

// ─── Error (JSON shape) ──────────────────────────────────────────────────────

/// JSON error shape `{ "error": "..." }` returned by all error responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}
