// src/models/mod.rs

pub mod question;
pub mod quiz;
pub mod score;
pub mod subject;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Deserializes a select/number form field holding a row id.
///
/// Browsers submit an untouched field as `field=`; that, and anything that is
/// not an integer, becomes `None` so the `required` rule reports it as a field
/// error instead of the whole form failing to parse.
pub(crate) fn form_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse::<i64>().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct IdForm {
        #[serde(default, deserialize_with = "form_id")]
        id: Option<i64>,
    }

    fn parse(body: &str) -> Option<i64> {
        serde_json::from_str::<IdForm>(body).unwrap().id
    }

    #[test]
    fn empty_or_garbled_ids_are_missing() {
        assert_eq!(parse(r#"{"id": "12"}"#), Some(12));
        assert_eq!(parse(r#"{"id": " 7 "}"#), Some(7));
        assert_eq!(parse(r#"{"id": ""}"#), None);
        assert_eq!(parse(r#"{"id": "abc"}"#), None);
        assert_eq!(parse("{}"), None);
    }
}
