use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "timeSeen", with = "epoch_seconds")]
    pub observed_at: DateTime<Utc>,
    pub description: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl Animal {
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// `timeSeen` is a JSON number of seconds since the Unix epoch, possibly
/// fractional. ISO-8601 strings are rejected.
mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NANOS_PER_SEC: f64 = 1_000_000_000.0;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        if value.timestamp_subsec_nanos() == 0 {
            serializer.serialize_i64(value.timestamp())
        } else {
            let secs = value.timestamp() as f64
                + f64::from(value.timestamp_subsec_nanos()) / NANOS_PER_SEC;
            serializer.serialize_f64(secs)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let number = serde_json::Number::deserialize(deserializer)?;

        let parsed = if let Some(secs) = number.as_i64() {
            DateTime::from_timestamp(secs, 0)
        } else {
            let secs = number
                .as_f64()
                .ok_or_else(|| de::Error::custom(format!("invalid epoch seconds: {}", number)))?;
            let whole = secs.floor();
            let nanos = ((secs - whole) * NANOS_PER_SEC).round().min(NANOS_PER_SEC - 1.0) as u32;
            DateTime::from_timestamp(whole as i64, nanos)
        };

        parsed.ok_or_else(|| de::Error::custom(format!("epoch seconds out of range: {}", number)))
    }
}
