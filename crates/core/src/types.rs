/// News rows are keyed by UUID (v4, assigned by the database).
pub type NewsId = uuid::Uuid;

/// Proposition identifiers come from the analytical warehouse as 64-bit ints.
pub type PropositionId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
