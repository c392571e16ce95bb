pub mod auth;
pub mod health;
pub mod roster_users;
