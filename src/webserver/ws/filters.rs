/// Subscription filters for the readings channel
///
/// A subscription watches exactly one dimension: a single sensor
/// installation or every sensor of an installation.
use std::fmt;

use crate::errors::FilterError;
use crate::readings::ReadingEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionFilter {
    SensorInstalled(i64),
    Installation(i64),
}

impl SubscriptionFilter {
    /// Build a filter from raw `sensorInstalledId` / `installationId` query
    /// values. Empty strings count as absent.
    pub fn from_params(
        sensor_installed_id: Option<&str>,
        installation_id: Option<&str>,
    ) -> Result<Self, FilterError> {
        let sensor = sensor_installed_id.map(str::trim).filter(|v| !v.is_empty());
        let installation = installation_id.map(str::trim).filter(|v| !v.is_empty());

        match (sensor, installation) {
            (None, None) => Err(FilterError::Missing),
            (Some(_), Some(_)) => Err(FilterError::Ambiguous),
            (Some(raw), None) => {
                parse_positive("sensorInstalledId", raw).map(SubscriptionFilter::SensorInstalled)
            }
            (None, Some(raw)) => {
                parse_positive("installationId", raw).map(SubscriptionFilter::Installation)
            }
        }
    }

    pub fn matches(&self, event: &ReadingEvent) -> bool {
        match *self {
            SubscriptionFilter::SensorInstalled(id) => event.sensor_installed_id == id,
            SubscriptionFilter::Installation(id) => event.installation_id == id,
        }
    }
}

impl fmt::Display for SubscriptionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionFilter::SensorInstalled(id) => write!(f, "sensorInstalledId={}", id),
            SubscriptionFilter::Installation(id) => write!(f, "installationId={}", id),
        }
    }
}

fn parse_positive(field: &'static str, raw: &str) -> Result<i64, FilterError> {
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(FilterError::InvalidValue {
            field,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(sensor_installed_id: i64, installation_id: i64) -> ReadingEvent {
        ReadingEvent {
            id: 1,
            sensor_installed_id,
            installation_id,
            installation_name: "Tank A".into(),
            sensor_type: "temperature".into(),
            unit: Some("°C".into()),
            taken_at: "2024-03-01T10:15:00.000Z".into(),
            value: 23.5,
        }
    }

    #[test]
    fn test_from_params_accepts_exactly_one_dimension() {
        assert_eq!(
            SubscriptionFilter::from_params(Some("7"), None),
            Ok(SubscriptionFilter::SensorInstalled(7))
        );
        assert_eq!(
            SubscriptionFilter::from_params(None, Some(" 3 ")),
            Ok(SubscriptionFilter::Installation(3))
        );
        assert_eq!(
            SubscriptionFilter::from_params(Some(""), Some("3")),
            Ok(SubscriptionFilter::Installation(3))
        );
    }

    #[test]
    fn test_from_params_rejections() {
        assert_eq!(
            SubscriptionFilter::from_params(None, None),
            Err(FilterError::Missing)
        );
        assert_eq!(
            SubscriptionFilter::from_params(Some(""), Some("")),
            Err(FilterError::Missing)
        );
        assert_eq!(
            SubscriptionFilter::from_params(Some("7"), Some("3")),
            Err(FilterError::Ambiguous)
        );
        for bad in ["abc", "0", "-4", "1.5"] {
            assert!(matches!(
                SubscriptionFilter::from_params(Some(bad), None),
                Err(FilterError::InvalidValue { field: "sensorInstalledId", .. })
            ));
        }
    }

    #[test]
    fn test_matching() {
        let e = event(7, 3);
        assert!(SubscriptionFilter::SensorInstalled(7).matches(&e));
        assert!(SubscriptionFilter::Installation(3).matches(&e));
        assert!(!SubscriptionFilter::SensorInstalled(3).matches(&e));
        assert!(!SubscriptionFilter::Installation(7).matches(&e));
    }
}
