//! `SQLite` schema definitions for motionlog.

/// SQL statement to create the motion log table.
///
/// `timestamp` is declared without a type so `SQLite` applies no affinity
/// and stores each value in the class it was bound with.
pub const CREATE_MOTION_LOGS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS motion_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp NOT NULL
)
";

/// Pragmas applied once per database file. WAL mode persists in the file.
pub const FILE_PRAGMAS: &str = "PRAGMA journal_mode=WAL;";

/// Pragmas applied to every connection.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA synchronous=FULL;";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_MOTION_LOGS_TABLE];
