use crate::error::SchemaError;
use serde_json::Value;
use std::fmt::Display;

/// Physical type of a stream attribute, named after its tag on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    String,
    Numeric,
}

impl AttributeKind {
    pub fn tag(self) -> &'static str {
        match self {
            AttributeKind::String => "S",
            AttributeKind::Numeric => "N",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "S" => Some(AttributeKind::String),
            "N" => Some(AttributeKind::Numeric),
            _ => None,
        }
    }
}

impl Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A scalar from a NewImage, e.g. `{"N": "499.99"}`.
///
/// Numbers stay in their string form; callers parse them into the type
/// their field declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue {
    pub kind: AttributeKind,
    pub value: String,
}

impl AttributeValue {
    pub fn decode(field: &str, raw: &Value) -> Result<Self, SchemaError> {
        let malformed = |reason| SchemaError::MalformedAttribute {
            field: field.to_string(),
            reason,
        };

        let object = raw.as_object().ok_or_else(|| malformed("not an object"))?;
        let mut entries = object.iter();
        let (tag, value) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            (None, _) => return Err(malformed("no type tag")),
            (Some(_), Some(_)) => return Err(malformed("more than one type tag")),
        };

        let kind =
            AttributeKind::from_tag(tag).ok_or_else(|| SchemaError::UnsupportedAttributeType {
                field: field.to_string(),
                tag: tag.clone(),
            })?;
        let value = value
            .as_str()
            .ok_or_else(|| malformed("value is not a string"))?;

        Ok(AttributeValue {
            kind,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributeKind, AttributeValue};
    use crate::error::SchemaError;
    use serde_json::json;

    #[test]
    fn when_string_tag_should_decode_string_attribute() {
        let attribute = AttributeValue::decode("status", &json!({"S": "pending"})).unwrap();

        assert_eq!(attribute.kind, AttributeKind::String);
        assert_eq!(attribute.value, "pending");
    }

    #[test]
    fn when_numeric_tag_should_keep_string_form() {
        let attribute = AttributeValue::decode("price", &json!({"N": "12.50"})).unwrap();

        assert_eq!(attribute.kind, AttributeKind::Numeric);
        assert_eq!(attribute.value, "12.50");
    }

    #[test]
    fn when_unknown_tag_should_be_unsupported() {
        let result = AttributeValue::decode("flag", &json!({"BOOL": true}));

        match result {
            Err(SchemaError::UnsupportedAttributeType { field, tag }) => {
                assert_eq!(field, "flag");
                assert_eq!(tag, "BOOL");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn when_not_single_tagged_should_be_malformed() {
        for raw in [
            json!("plain"),
            json!({}),
            json!({"S": "a", "N": "1"}),
            json!({"N": 2}),
        ] {
            assert!(matches!(
                AttributeValue::decode("quantity", &raw),
                Err(SchemaError::MalformedAttribute { .. })
            ));
        }
    }

    #[test]
    fn tags_round_trip_through_kind() {
        for kind in [AttributeKind::String, AttributeKind::Numeric] {
            assert_eq!(AttributeKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(AttributeKind::from_tag("SS"), None);
    }
}
