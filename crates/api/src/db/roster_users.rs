//! Roster membership query builders.
//!
//! Teams, rosters and users are addressed by name; ids are resolved with
//! subqueries so each statement is a single round trip.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SelectStatement, SqliteQueryBuilder};

use super::Built;
use super::tables::{Roster, RosterUser, Team, TeamAdmin, TeamUser, User};

// ── Name resolution ───────────────────────────────────────────────────────

/// `SELECT team.id FROM team WHERE name = ?`
pub(crate) fn team_id_of(team: &str) -> SelectStatement {
    Query::select()
        .column(Team::Id)
        .from(Team::Table)
        .and_where(Expr::col(Team::Name).eq(team))
        .to_owned()
}

/// `SELECT user.id FROM user WHERE name = ?`
pub(crate) fn user_id_of(user: &str) -> SelectStatement {
    Query::select()
        .column(User::Id)
        .from(User::Table)
        .and_where(Expr::col(User::Name).eq(user))
        .to_owned()
}

/// The id of roster `roster` under team `team`.
fn roster_id_of(team: &str, roster: &str) -> SelectStatement {
    Query::select()
        .column((Roster::Table, Roster::Id))
        .from(Roster::Table)
        .inner_join(
            Team::Table,
            Expr::col((Team::Table, Team::Id)).equals((Roster::Table, Roster::TeamId)),
        )
        .and_where(Expr::col((Team::Table, Team::Name)).eq(team))
        .and_where(Expr::col((Roster::Table, Roster::Name)).eq(roster))
        .to_owned()
}

// ── Reads ─────────────────────────────────────────────────────────────────

/// Check if a roster exists under a team.
pub fn roster_exists(team: &str, roster: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Roster::Table)
        .and_where(Expr::col(Roster::Id).in_subquery(roster_id_of(team, roster)))
        .build(SqliteQueryBuilder)
}

/// List a roster's members (name, in_rotation) ordered by name.
pub fn list(team: &str, roster: &str) -> Built {
    Query::select()
        .column((User::Table, User::Name))
        .column((RosterUser::Table, RosterUser::InRotation))
        .from(RosterUser::Table)
        .inner_join(
            User::Table,
            Expr::col((User::Table, User::Id)).equals((RosterUser::Table, RosterUser::UserId)),
        )
        .and_where(
            Expr::col((RosterUser::Table, RosterUser::RosterId))
                .in_subquery(roster_id_of(team, roster)),
        )
        .order_by((User::Table, User::Name), Order::Asc)
        .build(SqliteQueryBuilder)
}

// ── Mutations ─────────────────────────────────────────────────────────────

/// DELETE one roster membership. Affects zero rows when the team, roster,
/// user or membership does not exist.
pub fn delete(team: &str, roster: &str, user: &str) -> Built {
    Query::delete()
        .from_table(RosterUser::Table)
        .and_where(Expr::col(RosterUser::RosterId).in_subquery(roster_id_of(team, roster)))
        .and_where(Expr::col(RosterUser::UserId).in_subquery(user_id_of(user)))
        .build(SqliteQueryBuilder)
}

/// UPDATE the rotation flag on every roster row of the named user.
///
/// Matches on user name only, across all rosters of all teams.
pub fn set_in_rotation(user: &str, in_rotation: i64) -> Built {
    Query::update()
        .table(RosterUser::Table)
        .value(RosterUser::InRotation, in_rotation)
        .and_where(Expr::col(RosterUser::UserId).in_subquery(user_id_of(user)))
        .build(SqliteQueryBuilder)
}

/// DELETE the derived team membership of `user` in `team` unless the user is
/// still on one of the team's rosters or is a team admin.
///
/// The check and the delete are one statement, so no other writer can slip a
/// roster change in between.
pub fn team_user_prune(team: &str, user: &str) -> Built {
    let still_rostered = Query::select()
        .column((RosterUser::Table, RosterUser::UserId))
        .from(RosterUser::Table)
        .inner_join(
            Roster::Table,
            Expr::col((Roster::Table, Roster::Id)).equals((RosterUser::Table, RosterUser::RosterId)),
        )
        .and_where(Expr::col((Roster::Table, Roster::TeamId)).in_subquery(team_id_of(team)))
        .to_owned();

    let admins = Query::select()
        .column((TeamAdmin::Table, TeamAdmin::UserId))
        .from(TeamAdmin::Table)
        .and_where(Expr::col((TeamAdmin::Table, TeamAdmin::TeamId)).in_subquery(team_id_of(team)))
        .to_owned();

    Query::delete()
        .from_table(TeamUser::Table)
        .and_where(Expr::col(TeamUser::TeamId).in_subquery(team_id_of(team)))
        .and_where(Expr::col(TeamUser::UserId).in_subquery(user_id_of(user)))
        .and_where(Expr::col(TeamUser::UserId).not_in_subquery(still_rostered))
        .and_where(Expr::col(TeamUser::UserId).not_in_subquery(admins))
        .build(SqliteQueryBuilder)
}
