use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Numbers at or above this are read as milliseconds rather than seconds
const MILLIS_THRESHOLD: f64 = 1e12;

/// Custom deserializer for timestamps that accepts epoch numbers and RFC3339 strings
///
/// Both export formats are lenient here: `null`, unparseable strings and
/// out-of-range numbers all become `None` instead of failing the record.
/// Epoch numbers may carry a fractional part (ChatGPT writes `1718000000.123`).
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(timestamp_from_value(&value))
}

/// Interpret a JSON value as a timestamp, see [`deserialize_timestamp`]
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let raw = n.as_f64()?;
            if !raw.is_finite() {
                return None;
            }
            if raw.abs() >= MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(raw as i64)
            } else {
                let secs = raw.floor();
                let nanos = ((raw - secs) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
                DateTime::from_timestamp(secs as i64, nanos)
            }
        }
        Value::String(s) => s.trim().parse::<DateTime<Utc>>().ok(),
        _ => None,
    }
}

/// Treat an explicit `null` the same as a missing field
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use serde_json::json;

    use super::*;
    use crate::models::{ClaudeConversation, RawConversation};

    #[test]
    fn test_timestamp_epoch_seconds_with_fraction() {
        let ts = timestamp_from_value(&json!(1718000000.5)).unwrap();
        assert_eq!(ts.timestamp(), 1718000000);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_timestamp_epoch_millis() {
        let ts = timestamp_from_value(&json!(1762076480016_i64)).unwrap();
        assert_eq!(ts, DateTime::from_timestamp_millis(1762076480016).unwrap());
    }

    #[test]
    fn test_timestamp_rfc3339() {
        let ts = timestamp_from_value(&json!("2024-01-15T10:30:00.123456Z")).unwrap();
        assert_eq!(ts.timestamp(), 1705314600);
    }

    #[test]
    fn test_timestamp_garbage_is_none() {
        assert!(timestamp_from_value(&json!("yesterday")).is_none());
        assert!(timestamp_from_value(&json!(null)).is_none());
        assert!(timestamp_from_value(&json!(true)).is_none());
        assert!(timestamp_from_value(&json!({"t": 1})).is_none());
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let raw = r#"{"id":"conv-1","title":null,"mapping":null,"create_time":null}"#;
        let conv: RawConversation = serde_json::from_str(raw).unwrap();
        assert_eq!(conv.title, "");
        assert!(conv.mapping.is_empty());
        assert!(conv.create_time.is_none());
    }

    #[test]
    fn test_claude_conversation_with_missing_optionals() {
        let raw = r#"{"uuid":"c-1","created_at":"2024-03-01T08:00:00Z","chat_messages":null}"#;
        let conv: ClaudeConversation = serde_json::from_str(raw).unwrap();
        assert_eq!(conv.uuid, "c-1");
        assert_eq!(conv.name, "");
        assert!(conv.chat_messages.is_empty());
        assert!(conv.created_at.is_some());
        assert!(conv.updated_at.is_none());
    }
}
