/// The reading store seam used by the ingestion service
use async_trait::async_trait;

use crate::errors::StoreError;
use crate::readings::{NewReading, Reading, ReadingQuery, SensorContext};

#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Installation id/name, sensor type and unit for a sensor installation
    async fn get_context(&self, sensor_installed_id: i64)
        -> Result<Option<SensorContext>, StoreError>;

    /// Persist a reading; the store assigns the id
    async fn insert_reading(&self, reading: NewReading) -> Result<Reading, StoreError>;

    /// Point the sensor installation at its most recent reading
    async fn set_last_reading_pointer(
        &self,
        sensor_installed_id: i64,
        reading_id: i64,
    ) -> Result<(), StoreError>;

    /// Reading history, newest first
    async fn list_readings(&self, query: ReadingQuery) -> Result<Vec<Reading>, StoreError>;
}
