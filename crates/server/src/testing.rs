//! Shared fixtures for unit tests.
//!
//! Teams: ops(1), infra(2). Users: alice(1), bob(2, admin of ops),
//! carol(3), root(4, god), mallory(5, no rosters).
//! Rosters: ops/primary(1), ops/secondary(2), infra/primary(3).

use serde_json::Value;

use crate::storage::Db;

const SEED: &str = "
    INSERT INTO team (id, name) VALUES (1, 'ops'), (2, 'infra');
    INSERT INTO user (id, name, api_key, god) VALUES
        (1, 'alice', 'key-alice', 0),
        (2, 'bob', 'key-bob', 0),
        (3, 'carol', 'key-carol', 0),
        (4, 'root', 'key-root', 1),
        (5, 'mallory', 'key-mallory', 0);
    INSERT INTO roster (id, team_id, name) VALUES
        (1, 1, 'primary'), (2, 1, 'secondary'), (3, 2, 'primary');
    INSERT INTO roster_user (roster_id, user_id) VALUES
        (1, 1), (1, 2), (1, 3), (2, 3), (3, 1);
    INSERT INTO team_user (team_id, user_id) VALUES (1, 1), (1, 2), (1, 3), (2, 1);
    INSERT INTO team_admin (team_id, user_id) VALUES (1, 2);
    INSERT INTO notification_setting (user_id, team_id, mode, time_before) VALUES
        (1, 1, 'email', 3600), (2, 1, 'email', 3600), (3, 1, 'sms', 600), (1, 2, 'email', 3600);
    INSERT INTO notification_queue (user_id, team_id, send_time, active) VALUES
        (1, 1, 1700000000, 1), (1, 1, 1600000000, 0);
";

pub fn seed(db: &Db) {
    db.conn().execute_batch(SEED).unwrap();
}

pub fn seeded_db() -> Db {
    let db = Db::open_in_memory().unwrap();
    seed(&db);
    db
}

pub fn count(db: &Db, sql: &str) -> i64 {
    db.conn().query_row(sql, [], |row| row.get(0)).unwrap()
}

/// `(owner, action, context)` of every audit row for `team`, oldest first.
pub fn audit_actions(db: &Db, team: &str) -> Vec<(String, String, Value)> {
    let conn = db.conn();
    crate::storage::query_all(&conn, oncall_api::db::audit::list_for_team(team), |row| {
        let context: String = row.get(2)?;
        Ok((
            row.get(0)?,
            row.get(1)?,
            serde_json::from_str(&context).unwrap(),
        ))
    })
    .unwrap()
}
