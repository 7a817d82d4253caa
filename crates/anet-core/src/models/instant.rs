//! Serde helper for server timestamps. Instants arrive as epoch milliseconds
//! from the API and as RFC 3339 strings from exports and fixtures; both decode
//! to `DateTime<Utc>`. Serialization stays RFC 3339.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInstant {
    Millis(i64),
    Float(f64),
    Text(String),
}

fn from_millis<E: serde::de::Error>(ms: i64) -> Result<DateTime<Utc>, E> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| E::custom(format!("timestamp {ms} is out of range")))
}

pub(crate) fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<RawInstant>::deserialize(deserializer)? {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let instant = match raw {
        RawInstant::Millis(ms) => from_millis(ms)?,
        RawInstant::Float(ms) => from_millis(ms as i64)?,
        RawInstant::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            match text.parse::<i64>() {
                Ok(ms) => from_millis(ms)?,
                Err(_) => DateTime::parse_from_rfc3339(text)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| D::Error::custom(format!("invalid timestamp '{text}': {e}")))?,
            }
        }
    };
    Ok(Some(instant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_opt")]
        at: Option<DateTime<Utc>>,
    }

    fn at(json: &str) -> Option<DateTime<Utc>> {
        serde_json::from_str::<Holder>(json).unwrap().at
    }

    #[test]
    fn epoch_millis_and_rfc3339_agree() {
        let expected = Utc.timestamp_millis_opt(1525261516596).unwrap();
        assert_eq!(at(r#"{"at":1525261516596}"#), Some(expected));
        assert_eq!(at(r#"{"at":"2018-05-02T11:45:16.596Z"}"#), Some(expected));
        assert_eq!(at(r#"{"at":"1525261516596"}"#), Some(expected));
    }

    #[test]
    fn null_missing_and_blank_are_none() {
        assert_eq!(at(r#"{"at":null}"#), None);
        assert_eq!(at(r#"{}"#), None);
        assert_eq!(at(r#"{"at":""}"#), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(serde_json::from_str::<Holder>(r#"{"at":"yesterday"}"#).is_err());
    }
}
