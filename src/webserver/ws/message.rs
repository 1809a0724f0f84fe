/// Real-time channel message schema
///
/// Server frames are JSON objects tagged by `type`:
/// `reading.created` carries a reading event, `error` explains a refused
/// subscription and `pong` answers a client ping.
use serde::{Deserialize, Serialize};

use crate::readings::ReadingEvent;

// ============================================================================
// SERVER → CLIENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "reading.created")]
    ReadingCreated { data: ReadingEvent },

    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "pong")]
    Pong {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ============================================================================
// CLIENT → SERVER
// ============================================================================

/// The channel is receive-only apart from application-level pings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping {
        #[serde(default)]
        id: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reading_created_envelope() {
        let msg = ServerMessage::ReadingCreated {
            data: ReadingEvent {
                id: 41,
                sensor_installed_id: 7,
                installation_id: 3,
                installation_name: "Tank A".into(),
                sensor_type: "temperature".into(),
                unit: Some("°C".into()),
                taken_at: "2024-03-01T10:15:00.000Z".into(),
                value: 23.5,
            },
        };
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "reading.created",
                "data": {
                    "id": 41,
                    "sensorInstalledId": 7,
                    "installationId": 3,
                    "installationName": "Tank A",
                    "sensorType": "temperature",
                    "unit": "°C",
                    "takenAt": "2024-03-01T10:15:00.000Z",
                    "value": 23.5
                }
            })
        );
    }

    #[test]
    fn test_error_envelope() {
        let msg = ServerMessage::Error {
            message: "must supply sensorInstalledId or installationId".into(),
        };
        assert_eq!(
            msg.to_json().unwrap(),
            r#"{"type":"error","message":"must supply sensorInstalledId or installationId"}"#
        );
    }

    #[test]
    fn test_client_ping() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping","id":"abc"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Ping {
                id: Some("abc".into())
            }
        );
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"subscribe"}"#).is_err());
    }
}
