use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Treats an empty query-string value as absent.
pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Patch semantics for a nullable column. Pair with `#[serde(default)]`:
/// an omitted field stays `None` (keep), `null` becomes `Some(None)` (clear)
/// and a value becomes `Some(Some(v))` (set).
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        student_id: Option<Uuid>,
    }

    #[test]
    fn test_empty_uuid_is_none() {
        let filter: Filter = serde_json::from_str(r#"{"student_id":""}"#).unwrap();
        assert!(filter.student_id.is_none());
    }

    #[test]
    fn test_valid_uuid() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"student_id":"{}"}}"#, id);
        let filter: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(filter.student_id, Some(id));
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        room: Option<Option<String>>,
    }

    #[test]
    fn test_nullable_distinguishes_absent_null_and_value() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.room, None);

        let cleared: Patch = serde_json::from_str(r#"{"room":null}"#).unwrap();
        assert_eq!(cleared.room, Some(None));

        let set: Patch = serde_json::from_str(r#"{"room":"B12"}"#).unwrap();
        assert_eq!(set.room, Some(Some("B12".to_string())));
    }

    #[test]
    fn test_invalid_uuid_is_error() {
        assert!(serde_json::from_str::<Filter>(r#"{"student_id":"nope"}"#).is_err());
    }
}
