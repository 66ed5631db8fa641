use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Query-string ids: absent, `null` and `""` all mean "no filter".
pub fn deserialize_optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<Uuid>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(|id| Some(T::from(id)))
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// RFC 3339 timestamp where an empty string clears the value.
pub fn deserialize_optional_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Query-string booleans: accepts `true`/`false`/`1`/`0`.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(matches!(opt.as_deref(), Some("true") | Some("1")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::CourseId;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        course_id: Option<CourseId>,
        #[serde(default, deserialize_with = "deserialize_optional_datetime")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_empty_values_become_none() {
        let filter: Filter = serde_json::from_str(r#"{"course_id": "", "at": ""}"#).unwrap();
        assert!(filter.course_id.is_none());
        assert!(filter.at.is_none());

        let filter: Filter = serde_json::from_str("{}").unwrap();
        assert!(filter.course_id.is_none());
    }

    #[test]
    fn test_present_values_parse() {
        let filter: Filter = serde_json::from_str(
            r#"{"course_id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff", "at": "2025-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(filter.course_id.is_some());
        assert!(filter.at.is_some());
    }

    #[test]
    fn test_bad_uuid_is_error() {
        let parsed: Result<Filter, _> = serde_json::from_str(r#"{"course_id": "nope"}"#);
        assert!(parsed.is_err());
    }
}
