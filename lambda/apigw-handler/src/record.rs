use serde_json::Value;
use thiserror::Error;

pub(crate) const DEFAULT_TITLE: &str = "The Amazing Spider-Man 2";
pub(crate) const DEFAULT_YEAR: i64 = 2012;

/// The flat item written to the table on every successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Record {
    pub(crate) id: String,
    pub(crate) title: String,
    /// Numeric text, stored as an `N` attribute.
    pub(crate) year: String,
}

#[derive(Debug, Error)]
pub(crate) enum RecordError {
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
}

impl RecordError {
    pub(crate) fn error_type(&self) -> &'static str {
        match self {
            RecordError::InvalidJson(_) => "InvalidJson",
            RecordError::MissingField(_) => "MissingField",
        }
    }
}

impl Record {
    pub(crate) fn default_with_id(id: String) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            year: DEFAULT_YEAR.to_string(),
        }
    }

    /// Only presence is checked. Strings are taken verbatim; any other value
    /// is written as its JSON text, so `true` becomes `"true"` and `null`
    /// becomes `"null"`. Numbers keep the digits they were sent with.
    pub(crate) fn from_json(body: &[u8]) -> Result<Self, RecordError> {
        let payload: Value = serde_json::from_slice(body)?;
        let field = |name: &'static str| {
            payload
                .get(name)
                .map(coerce_to_text)
                .ok_or(RecordError::MissingField(name))
        };

        Ok(Self {
            year: field("year")?,
            title: field("title")?,
            id: field("id")?,
        })
    }
}

fn coerce_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_body() {
        let record = Record::from_json(
            br#"{"year": 2012, "title": "The Amazing Spider-Man 2", "id": "abc123"}"#,
        )
        .unwrap();

        assert_eq!(
            record,
            Record {
                id: "abc123".to_string(),
                title: "The Amazing Spider-Man 2".to_string(),
                year: "2012".to_string(),
            }
        );
    }

    #[test]
    fn coerces_non_string_values() {
        let record = Record::from_json(br#"{"year": "1999", "title": 42, "id": 7}"#).unwrap();
        assert_eq!(record.year, "1999");
        assert_eq!(record.title, "42");
        assert_eq!(record.id, "7");

        let record = Record::from_json(br#"{"year": 2012.5, "title": "t", "id": "i"}"#).unwrap();
        assert_eq!(record.year, "2012.5");
    }

    #[test]
    fn literals_use_json_text() {
        let record = Record::from_json(br#"{"year": true, "title": null, "id": "i"}"#).unwrap();
        assert_eq!(record.year, "true");
        assert_eq!(record.title, "null");
    }

    #[test]
    fn large_numbers_keep_every_digit() {
        let record = Record::from_json(
            br#"{"year": 123456789012345678901, "title": "t", "id": 98765432109876543210.125}"#,
        )
        .unwrap();
        assert_eq!(record.year, "123456789012345678901");
        assert_eq!(record.id, "98765432109876543210.125");
    }

    #[test]
    fn ignores_extra_fields() {
        let record =
            Record::from_json(br#"{"year": 1, "title": "t", "id": "i", "rating": 5}"#).unwrap();
        assert_eq!(record.id, "i");
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let err = Record::from_json(br#"{"year": 2012, "id": "abc123"}"#).unwrap_err();
        assert!(matches!(err, RecordError::MissingField("title")));
        assert_eq!(err.error_type(), "MissingField");
        assert_eq!(err.to_string(), "missing required field 'title'");
    }

    #[test]
    fn non_object_body_has_no_fields() {
        let err = Record::from_json(b"[2012, \"title\", \"id\"]").unwrap_err();
        assert!(matches!(err, RecordError::MissingField("year")));
    }

    #[test]
    fn malformed_body_is_invalid_json() {
        let err = Record::from_json(b"{not json").unwrap_err();
        assert_eq!(err.error_type(), "InvalidJson");
    }

    #[test]
    fn default_record_uses_canned_values() {
        let record = Record::default_with_id("fixed".to_string());
        assert_eq!(record.title, DEFAULT_TITLE);
        assert_eq!(record.year, "2012");
        assert_eq!(record.id, "fixed");
    }
}
