/// Catalog entities served by the CRUD routes
use serde::{Deserialize, Serialize};

/// A monitored site (pond, tank, raceway)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    pub id: i64,
    pub branch_id: Option<i64>,
    pub name: String,
    pub installed_on: String,
    pub operational_status: String,
    pub description: Option<String>,
    pub usage_type: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstallation {
    #[serde(default)]
    pub branch_id: Option<i64>,
    pub name: String,
    pub installed_on: String,
    #[serde(default)]
    pub operational_status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub usage_type: Option<String>,
}

/// Sensor catalog entry: what kind of sensor and its unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorType {
    pub id: i64,
    pub sensor: String,
    pub description: String,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub measurement_range: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSensorType {
    pub sensor: String,
    pub description: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub measurement_range: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// A catalog sensor mounted at an installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorInstallation {
    pub id: i64,
    pub installation_id: i64,
    pub sensor_id: i64,
    /// Catalog label, e.g. `temperature`
    pub sensor: String,
    pub unit: Option<String>,
    pub installed_on: String,
    pub description: String,
    pub last_reading_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSensorInstallation {
    pub installation_id: i64,
    pub sensor_id: i64,
    pub installed_on: String,
    pub description: String,
}

/// Limit/offset window for list queries, already clamped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}
