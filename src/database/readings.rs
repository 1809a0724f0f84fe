/// Reading persistence: the `ReadingStore` implementation for SQLite
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{conversion_error, ReadingStore, SqliteStore};
use crate::errors::StoreError;
use crate::readings::time::{DateParts, DATE_FORMAT, TIME_FORMAT};
use crate::readings::{NewReading, Reading, ReadingQuery, SensorContext};

const CONTEXT_SQL: &str = "
    SELECT si.id_sensor_installed, i.id_installation, i.name, sc.sensor, sc.unit
    FROM sensor_installed si
    JOIN installation i ON i.id_installation = si.id_installation
    JOIN sensor_catalog sc ON sc.id_sensor = si.id_sensor
    WHERE si.id_sensor_installed = ?1";

pub(crate) fn row_to_reading(row: &Row<'_>) -> rusqlite::Result<Reading> {
    let date: String = row.get(3)?;
    let time: String = row.get(4)?;
    Ok(Reading {
        id: row.get(0)?,
        sensor_installed_id: row.get(1)?,
        value: row.get(2)?,
        date: NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| conversion_error(3, e))?,
        time: NaiveTime::parse_from_str(&time, TIME_FORMAT).map_err(|e| conversion_error(4, e))?,
    })
}

/// `YYYY-MM-DD HH:MM:SS`, comparable with `date || ' ' || time`
fn bound_key(instant: DateTime<Utc>) -> String {
    let parts = DateParts::from_instant(instant);
    format!("{} {}", parts.date_string(), parts.time_string())
}

/// Stored times have whole seconds, so a fractional lower bound starts at
/// the next second.
fn lower_bound_key(instant: DateTime<Utc>) -> String {
    if instant.nanosecond() == 0 {
        bound_key(instant)
    } else {
        bound_key(instant + Duration::seconds(1))
    }
}

#[async_trait]
impl ReadingStore for SqliteStore {
    async fn get_context(
        &self,
        sensor_installed_id: i64,
    ) -> Result<Option<SensorContext>, StoreError> {
        self.with_read(move |conn| {
            let context = conn
                .query_row(CONTEXT_SQL, params![sensor_installed_id], |row| {
                    Ok(SensorContext {
                        sensor_installed_id: row.get(0)?,
                        installation_id: row.get(1)?,
                        installation_name: row.get(2)?,
                        sensor_type: row.get(3)?,
                        unit: row.get(4)?,
                    })
                })
                .optional()?;
            Ok(context)
        })
        .await
    }

    async fn insert_reading(&self, reading: NewReading) -> Result<Reading, StoreError> {
        self.with_write(move |conn| {
            let parts = DateParts {
                date: reading.date,
                time: reading.time,
            };
            conn.execute(
                "INSERT INTO reading (id_sensor_installed, value, date, time)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    reading.sensor_installed_id,
                    reading.value,
                    parts.date_string(),
                    parts.time_string()
                ],
            )?;
            Ok(Reading {
                id: conn.last_insert_rowid(),
                sensor_installed_id: reading.sensor_installed_id,
                value: reading.value,
                date: reading.date,
                time: reading.time,
            })
        })
        .await
    }

    async fn set_last_reading_pointer(
        &self,
        sensor_installed_id: i64,
        reading_id: i64,
    ) -> Result<(), StoreError> {
        self.with_write(move |conn| {
            let changed = conn.execute(
                "UPDATE sensor_installed SET id_reading = ?1 WHERE id_sensor_installed = ?2",
                params![reading_id, sensor_installed_id],
            )?;
            if changed == 0 {
                return Err(StoreError::MissingRow {
                    table: "sensor_installed",
                    id: sensor_installed_id,
                });
            }
            Ok(())
        })
        .await
    }

    async fn list_readings(&self, query: ReadingQuery) -> Result<Vec<Reading>, StoreError> {
        self.with_read(move |conn| {
            let from = query.from.map(lower_bound_key);
            let to = query.to.map(bound_key);
            let mut stmt = conn.prepare(
                "SELECT id_reading, id_sensor_installed, value, date, time
                 FROM reading
                 WHERE id_sensor_installed = ?1
                   AND (?2 IS NULL OR date || ' ' || time >= ?2)
                   AND (?3 IS NULL OR date || ' ' || time <= ?3)
                 ORDER BY date DESC, time DESC, id_reading DESC
                 LIMIT ?4",
            )?;
            let rows = stmt
                .query_map(
                    params![query.sensor_installed_id, from, to, query.limit],
                    row_to_reading,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }
}
