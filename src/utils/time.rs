use chrono::{DateTime, Utc};

#[allow(unused)]
pub fn time_millis() -> i64 {
    let time: DateTime<chrono::Utc> = Utc::now();
    time.timestamp_millis()
}

/// Serialize a `Duration` as fractional milliseconds.
pub mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_nanos() as f64 / 1_000_000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = f64::deserialize(deserializer)?;
        if !millis.is_finite() || millis < 0.0 {
            return Err(D::Error::custom(format!("invalid duration: {}", millis)));
        }
        Duration::try_from_secs_f64(millis / 1000.0).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Timed {
        #[serde(with = "super::duration_millis")]
        duration: Duration,
    }

    #[test]
    fn test_duration_as_millis() {
        let text = serde_json::to_string(&Timed {
            duration: Duration::from_micros(1500),
        })
        .unwrap();
        assert_eq!(text, r#"{"duration":1.5}"#);

        let timed: Timed = serde_json::from_str(r#"{"duration":250}"#).unwrap();
        assert_eq!(timed.duration, Duration::from_millis(250));
    }

    #[test]
    fn test_negative_duration_rejected() {
        assert!(serde_json::from_str::<Timed>(r#"{"duration":-1}"#).is_err());
    }

    #[test]
    fn test_overflowing_duration_rejected() {
        assert!(serde_json::from_str::<Timed>(r#"{"duration":1e30}"#).is_err());
        assert!(serde_json::from_str::<Timed>(r#"{"duration":1e300}"#).is_err());
    }
}
