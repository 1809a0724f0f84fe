/// Reading domain types
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::time::{to_iso_millis, DateParts};

/// Denormalized context for a sensor installation, resolved at ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct SensorContext {
    pub sensor_installed_id: i64,
    pub installation_id: i64,
    pub installation_name: String,
    pub sensor_type: String,
    pub unit: Option<String>,
}

/// A reading about to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub sensor_installed_id: i64,
    pub value: f64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl NewReading {
    pub fn new(sensor_installed_id: i64, value: f64, parts: DateParts) -> Self {
        Self {
            sensor_installed_id,
            value,
            date: parts.date,
            time: parts.time,
        }
    }
}

/// A persisted reading
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub id: i64,
    pub sensor_installed_id: i64,
    pub value: f64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Reading {
    pub fn parts(&self) -> DateParts {
        DateParts {
            date: self.date,
            time: self.time,
        }
    }

    /// Instant rebuilt from the stored date and time
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.parts().to_instant()
    }
}

/// Inbound reading submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSubmission {
    pub sensor_installed_id: i64,
    pub value: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Public-facing reading representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingResponse {
    pub id: i64,
    pub sensor_installed_id: i64,
    pub value: f64,
    pub taken_at: String,
    pub date: String,
    pub time: String,
}

impl From<&Reading> for ReadingResponse {
    fn from(reading: &Reading) -> Self {
        let parts = reading.parts();
        Self {
            id: reading.id,
            sensor_installed_id: reading.sensor_installed_id,
            value: reading.value,
            taken_at: to_iso_millis(parts.to_instant()),
            date: parts.date_string(),
            time: parts.time_string(),
        }
    }
}

/// Broadcast form of a newly persisted reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingEvent {
    pub id: i64,
    pub sensor_installed_id: i64,
    pub installation_id: i64,
    pub installation_name: String,
    pub sensor_type: String,
    pub unit: Option<String>,
    pub taken_at: String,
    pub value: f64,
}

impl ReadingEvent {
    pub fn new(reading: &Reading, context: &SensorContext) -> Self {
        Self {
            id: reading.id,
            sensor_installed_id: reading.sensor_installed_id,
            installation_id: context.installation_id,
            installation_name: context.installation_name.clone(),
            sensor_type: context.sensor_type.clone(),
            unit: context.unit.clone(),
            taken_at: to_iso_millis(reading.taken_at()),
            value: reading.value,
        }
    }
}

/// History query for one sensor installation
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingQuery {
    pub sensor_installed_id: i64,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: i64,
}
