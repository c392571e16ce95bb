//! Compile-time–checked column identifiers for all tables.

use sea_query::Iden;

#[derive(Iden)]
pub enum Team {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
pub enum User {
    Table,
    Id,
    Name,
    ApiKey,
    God,
}

#[derive(Iden)]
pub enum Roster {
    Table,
    Id,
    TeamId,
    Name,
}

#[derive(Iden)]
pub enum RosterUser {
    Table,
    RosterId,
    UserId,
    InRotation,
}

#[derive(Iden)]
pub enum TeamUser {
    Table,
    TeamId,
    UserId,
}

#[derive(Iden)]
pub enum TeamAdmin {
    Table,
    TeamId,
    UserId,
}

#[derive(Iden)]
pub enum NotificationSetting {
    Table,
    UserId,
    TeamId,
}

#[derive(Iden)]
pub enum NotificationQueue {
    Table,
    UserId,
    TeamId,
    Active,
}

#[derive(Iden)]
pub enum Audit {
    Table,
    Id,
    OwnerName,
    TeamName,
    ActionName,
    Context,
    Timestamp,
}
