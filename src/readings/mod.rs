//! Sensor readings: domain types, timestamp handling and the ingestion
//! service that persists a reading and fans it out to subscribers.

pub mod ingest;
pub mod time;
pub mod types;

pub use ingest::IngestionService;
pub use types::{
    NewReading, Reading, ReadingEvent, ReadingQuery, ReadingResponse, ReadingSubmission,
    SensorContext,
};
