/// Reading ingestion
///
/// Validate → resolve context → persist → move the last-reading pointer →
/// broadcast. Steps are strictly sequenced per call; nothing is written
/// before validation and context resolution succeed.
use chrono::Utc;
use std::sync::Arc;

use crate::{
    arguments::is_debug_ingest_enabled,
    database::ReadingStore,
    errors::IngestError,
    logger::{self, LogTag},
    webserver::ws::Broadcaster,
};

use super::time::{parse_timestamp, DateParts};
use super::types::{NewReading, ReadingEvent, ReadingResponse, ReadingSubmission};

pub struct IngestionService {
    store: Arc<dyn ReadingStore>,
    broadcaster: Arc<Broadcaster>,
}

impl IngestionService {
    pub fn new(store: Arc<dyn ReadingStore>, broadcaster: Arc<Broadcaster>) -> Self {
        Self { store, broadcaster }
    }

    pub async fn submit_reading(
        &self,
        submission: ReadingSubmission,
    ) -> Result<ReadingResponse, IngestError> {
        let sensor_installed_id = submission.sensor_installed_id;
        if sensor_installed_id < 1 {
            return Err(IngestError::InvalidInput(format!(
                "sensorInstalledId must be a positive integer, got {}",
                sensor_installed_id
            )));
        }
        if !submission.value.is_finite() {
            return Err(IngestError::InvalidInput(
                "value must be a finite number".to_string(),
            ));
        }

        let context = self
            .store
            .get_context(sensor_installed_id)
            .await?
            .ok_or(IngestError::NotFound(sensor_installed_id))?;

        let taken_at = match submission.timestamp.as_deref() {
            Some(raw) => parse_timestamp(raw).ok_or_else(|| {
                IngestError::InvalidInput(format!("timestamp '{}' is not a valid date/time", raw))
            })?,
            None => Utc::now(),
        };
        let parts = DateParts::from_instant(taken_at);

        let reading = self
            .store
            .insert_reading(NewReading::new(sensor_installed_id, submission.value, parts))
            .await?;

        if let Err(e) = self
            .store
            .set_last_reading_pointer(sensor_installed_id, reading.id)
            .await
        {
            logger::warning(
                LogTag::Ingest,
                &format!(
                    "Reading {} stored but last-reading pointer of sensor {} not updated: {}",
                    reading.id, sensor_installed_id, e
                ),
            );
        }

        let event = ReadingEvent::new(&reading, &context);
        self.broadcaster.publish(&event);

        if is_debug_ingest_enabled() {
            logger::debug(
                LogTag::Ingest,
                &format!(
                    "Reading {} accepted: sensor={} installation={} value={} at {}",
                    reading.id,
                    sensor_installed_id,
                    context.installation_id,
                    reading.value,
                    event.taken_at
                ),
            );
        }

        Ok(ReadingResponse::from(&reading))
    }
}
