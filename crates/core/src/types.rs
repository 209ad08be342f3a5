/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Session identifiers are random 128-bit UUIDs generated at creation.
pub type SessionId = uuid::Uuid;
