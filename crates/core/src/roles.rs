//! Well-known role name constants.
//!
//! These must match the seed data in `20260810000001_create_users_and_roles.sql`.

pub const ROLE_USER: &str = "user";
pub const ROLE_STREAMER: &str = "streamer";
pub const ROLE_ADMIN: &str = "admin";
