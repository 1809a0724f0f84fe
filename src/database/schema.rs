/// Relational schema for the monitoring store
///
/// Dates are `YYYY-MM-DD` text and times `HH:MM:SS` text, both UTC, so
/// `date || ' ' || time` sorts chronologically.
use rusqlite::Connection;

use crate::errors::StoreError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS installation (
    id_installation     INTEGER PRIMARY KEY AUTOINCREMENT,
    id_branch           INTEGER,
    name                TEXT    NOT NULL,
    installed_on        TEXT    NOT NULL,
    operational_status  TEXT    NOT NULL DEFAULT 'active'
                        CHECK (operational_status IN ('active', 'inactive')),
    description         TEXT,
    usage_type          TEXT    NOT NULL DEFAULT 'aquaculture'
                        CHECK (usage_type IN ('aquaculture', 'treatment', 'other')),
    created_at          TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

CREATE TABLE IF NOT EXISTS sensor_catalog (
    id_sensor           INTEGER PRIMARY KEY AUTOINCREMENT,
    sensor              TEXT    NOT NULL,
    description         TEXT    NOT NULL,
    model               TEXT,
    brand               TEXT,
    measurement_range   TEXT,
    unit                TEXT
);

CREATE TABLE IF NOT EXISTS sensor_installed (
    id_sensor_installed INTEGER PRIMARY KEY AUTOINCREMENT,
    id_installation     INTEGER NOT NULL REFERENCES installation(id_installation) ON DELETE CASCADE,
    id_sensor           INTEGER NOT NULL REFERENCES sensor_catalog(id_sensor),
    installed_on        TEXT    NOT NULL,
    description         TEXT    NOT NULL,
    id_reading          INTEGER REFERENCES reading(id_reading) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS reading (
    id_reading          INTEGER PRIMARY KEY AUTOINCREMENT,
    id_sensor_installed INTEGER NOT NULL REFERENCES sensor_installed(id_sensor_installed) ON DELETE CASCADE,
    value               REAL    NOT NULL,
    date                TEXT    NOT NULL,
    time                TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reading_sensor_taken
    ON reading(id_sensor_installed, date DESC, time DESC);

CREATE INDEX IF NOT EXISTS idx_sensor_installed_installation
    ON sensor_installed(id_installation);
";

/// Create all tables and indexes
pub fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    if !mode.eq_ignore_ascii_case("wal") {
        crate::logger::debug(
            crate::logger::LogTag::Database,
            &format!("journal_mode stayed '{}'", mode),
        );
    }

    conn.execute_batch(SCHEMA)?;
    Ok(())
}
