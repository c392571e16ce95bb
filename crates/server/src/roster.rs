//! Roster membership: removing members and toggling their rotation flag.
//!
//! Every mutation runs through [`Db::unit_of_work`], so the roster change,
//! its audit record, and any team-affiliation cascade commit together or not
//! at all. Callers are expected to have run `check_team_auth` first.

use oncall_api::db::roster_users;
use oncall_api::service::rotation_flag;
use oncall_api::{ROSTER_USER_DELETED, ROSTER_USER_EDITED, RosterMemberResponse, ServiceError};
use serde_json::{Value, json};

use crate::audit::create_audit;
use crate::notifications::unsubscribe_notifications;
use crate::storage::{self, Db};

/// What a successful removal did beyond the roster row itself.
#[derive(Debug, PartialEq, Eq)]
pub struct Removal {
    /// The user lost their last affiliation with the team.
    pub left_team: bool,
}

/// Remove `user` from `roster` of `team`.
///
/// Fails with `NotFound` when the team, roster, user, or membership does not
/// exist; nothing is written in that case.
pub fn remove_member(
    db: &Db,
    owner: &str,
    team: &str,
    roster: &str,
    user: &str,
) -> Result<Removal, ServiceError> {
    db.unit_of_work(|uow| {
        let deleted = uow.execute(
            roster_users::delete(team, roster, user),
            "delete roster user",
        )?;
        if deleted == 0 {
            return Err(ServiceError::NotFound(format!(
                "user \"{user}\" is not on roster \"{roster}\" of team \"{team}\""
            )));
        }

        create_audit(
            uow,
            &json!({"roster": roster, "user": user}),
            team,
            ROSTER_USER_DELETED,
            owner,
        )?;

        let left_team = uow.execute(
            roster_users::team_user_prune(team, user),
            "remove team user",
        )? > 0;
        if left_team {
            unsubscribe_notifications(uow, team, user)?;
        }

        tracing::info!(team, roster, user, left_team, "removed roster member");
        Ok(Removal { left_team })
    })
}

/// Put `user` into or out of rotation.
///
/// The update matches every roster row of the user, not only `roster`. An
/// audit record is written even when no row matched. Returns the number of
/// roster rows updated.
pub fn set_rotation(
    db: &Db,
    owner: &str,
    team: &str,
    roster: &str,
    user: &str,
    in_rotation: bool,
    request_body: &Value,
) -> Result<usize, ServiceError> {
    db.unit_of_work(|uow| {
        let updated = uow.execute(
            roster_users::set_in_rotation(user, rotation_flag(in_rotation)),
            "update rotation flag",
        )?;
        if updated > 1 {
            tracing::warn!(
                team,
                roster,
                user,
                updated,
                "rotation flag changed on every roster of the user"
            );
        }

        create_audit(
            uow,
            &json!({"user": user, "roster": roster, "request_body": request_body}),
            team,
            ROSTER_USER_EDITED,
            owner,
        )?;
        Ok(updated)
    })
}

/// List the members of `roster` in `team`, ordered by name.
pub fn list_members(
    db: &Db,
    team: &str,
    roster: &str,
) -> Result<Vec<RosterMemberResponse>, ServiceError> {
    let conn = db.conn();

    let exists = storage::query_row(&conn, roster_users::roster_exists(team, roster), |row| {
        row.get::<_, i64>(0).map(|c| c > 0)
    })
    .map_err(ServiceError::from_db("check roster"))?
    .unwrap_or(false);
    if !exists {
        return Err(ServiceError::NotFound(format!(
            "roster \"{roster}\" not found in team \"{team}\""
        )));
    }

    storage::query_all(&conn, roster_users::list(team, roster), |row| {
        Ok(RosterMemberResponse {
            name: row.get(0)?,
            in_rotation: row.get::<_, i64>(1)? != 0,
        })
    })
    .map_err(ServiceError::from_db("list roster users"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{audit_actions, count, seeded_db};
    use std::sync::{Arc, Barrier};

    fn team_user(db: &Db, team: &str, user: &str) -> bool {
        count(
            db,
            &format!(
                "SELECT COUNT(*) FROM team_user tu \
                 JOIN team t ON t.id = tu.team_id JOIN user u ON u.id = tu.user_id \
                 WHERE t.name = '{team}' AND u.name = '{user}'"
            ),
        ) > 0
    }

    fn settings(db: &Db, team: &str, user: &str) -> i64 {
        count(
            db,
            &format!(
                "SELECT COUNT(*) FROM notification_setting ns \
                 JOIN team t ON t.id = ns.team_id JOIN user u ON u.id = ns.user_id \
                 WHERE t.name = '{team}' AND u.name = '{user}'"
            ),
        )
    }

    fn rostered(db: &Db, team: &str, roster: &str, user: &str) -> bool {
        list_members(db, team, roster)
            .unwrap()
            .iter()
            .any(|m| m.name == user)
    }

    #[test]
    fn test_remove_unknown_membership_is_not_found() {
        let db = seeded_db();
        let before = count(&db, "SELECT COUNT(*) FROM roster_user");
        for (team, roster, user) in [
            ("nope", "primary", "alice"),
            ("ops", "nope", "alice"),
            ("ops", "primary", "nobody"),
            ("ops", "secondary", "alice"),
        ] {
            let err = remove_member(&db, "bob", team, roster, user).unwrap_err();
            assert!(matches!(err, ServiceError::NotFound(_)), "{team}/{roster}/{user}");
        }
        assert_eq!(count(&db, "SELECT COUNT(*) FROM roster_user"), before);
        assert!(audit_actions(&db, "ops").is_empty());
        assert!(audit_actions(&db, "nope").is_empty());
    }

    #[test]
    fn test_remove_deletes_row_and_audits_once() {
        let db = seeded_db();
        remove_member(&db, "bob", "ops", "primary", "carol").unwrap();

        assert!(!rostered(&db, "ops", "primary", "carol"));
        assert!(rostered(&db, "ops", "secondary", "carol"));
        assert_eq!(count(&db, "SELECT COUNT(*) FROM roster_user"), 4);

        let audits = audit_actions(&db, "ops");
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].0, "bob");
        assert_eq!(audits[0].1, "roster_user_deleted");
        assert_eq!(audits[0].2, json!({"roster": "primary", "user": "carol"}));
    }

    #[test]
    fn test_remove_last_roster_drops_team_user_and_notifications() {
        let db = seeded_db();
        let removal = remove_member(&db, "bob", "ops", "primary", "alice").unwrap();

        assert_eq!(removal, Removal { left_team: true });
        assert!(!team_user(&db, "ops", "alice"));
        assert_eq!(settings(&db, "ops", "alice"), 0);
        // Only the active queue entry goes; the sent one is history.
        assert_eq!(
            count(&db, "SELECT COUNT(*) FROM notification_queue WHERE user_id = 1 AND team_id = 1"),
            1
        );
        // Affiliation with another team is untouched.
        assert!(team_user(&db, "infra", "alice"));
        assert_eq!(settings(&db, "infra", "alice"), 1);
    }

    #[test]
    fn test_remove_keeps_team_user_while_on_another_roster() {
        let db = seeded_db();
        let removal = remove_member(&db, "bob", "ops", "primary", "carol").unwrap();

        assert_eq!(removal, Removal { left_team: false });
        assert!(team_user(&db, "ops", "carol"));
        assert_eq!(settings(&db, "ops", "carol"), 1);
    }

    #[test]
    fn test_remove_keeps_team_user_for_admin() {
        let db = seeded_db();
        let removal = remove_member(&db, "root", "ops", "primary", "bob").unwrap();

        assert_eq!(removal, Removal { left_team: false });
        assert!(team_user(&db, "ops", "bob"));
        assert_eq!(settings(&db, "ops", "bob"), 1);
    }

    #[test]
    fn test_set_rotation_updates_every_roster_of_user() {
        let db = seeded_db();
        let body = json!({"in_rotation": 0});
        let updated = set_rotation(&db, "bob", "ops", "primary", "alice", false, &body).unwrap();

        assert_eq!(updated, 2);
        assert_eq!(
            count(&db, "SELECT COUNT(*) FROM roster_user WHERE user_id = 1 AND in_rotation = 0"),
            2
        );
        // Other users keep their flag.
        assert_eq!(
            count(&db, "SELECT COUNT(*) FROM roster_user WHERE user_id <> 1 AND in_rotation = 0"),
            0
        );

        let audits = audit_actions(&db, "ops");
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].1, "roster_user_edited");
        assert_eq!(
            audits[0].2,
            json!({"user": "alice", "roster": "primary", "request_body": {"in_rotation": 0}})
        );
    }

    #[test]
    fn test_set_rotation_audits_even_without_match() {
        let db = seeded_db();
        let body = json!({"in_rotation": true});
        let updated = set_rotation(&db, "bob", "ops", "primary", "mallory", true, &body).unwrap();

        assert_eq!(updated, 0);
        assert_eq!(audit_actions(&db, "ops").len(), 1);
    }

    #[test]
    fn test_list_members() {
        let db = seeded_db();
        let members = list_members(&db, "ops", "primary").unwrap();
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
        assert!(members.iter().all(|m| m.in_rotation));

        assert!(matches!(
            list_members(&db, "infra", "secondary"),
            Err(ServiceError::NotFound(_))
        ));
    }

    /// Remove `user` from both ops rosters concurrently, each through its own
    /// connection, and return whether the team affiliation survived.
    fn remove_concurrently(extra_seed: &str, user: &str) -> bool {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oncall.db");
        let db = Db::open_path(&path).unwrap();
        crate::testing::seed(&db);
        db.conn().execute_batch(extra_seed).unwrap();

        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = ["primary", "secondary"]
            .into_iter()
            .map(|roster| {
                let conn = Db::open_path(&path).unwrap();
                let barrier = Arc::clone(&barrier);
                let user = user.to_string();
                std::thread::spawn(move || {
                    barrier.wait();
                    remove_member(&conn, "bob", "ops", roster, &user).unwrap()
                })
            })
            .collect();
        let dropped_by = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|removal| removal.left_team)
            .count();

        let kept = team_user(&db, "ops", user);
        assert_eq!(dropped_by, if kept { 0 } else { 1 });
        assert_eq!(audit_actions(&db, "ops").len(), 2);
        kept
    }

    #[test]
    fn test_concurrent_removals_drop_team_user_once() {
        assert!(!remove_concurrently("", "carol"));
    }

    #[test]
    fn test_concurrent_removals_keep_team_user_for_third_roster() {
        // carol is also on a third roster, so she stays on the team.
        let kept = remove_concurrently(
            "INSERT INTO roster (id, team_id, name) VALUES (4, 1, 'tertiary');
             INSERT INTO roster_user (roster_id, user_id) VALUES (4, 3);",
            "carol",
        );
        assert!(kept);
    }
}
