//! Shared types, errors, and constants for the streamgate platform.

pub mod error;
pub mod roles;
pub mod types;
