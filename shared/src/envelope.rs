use crate::attribute::{AttributeKind, AttributeValue};
use crate::error::{DecodeError, RecordError, SchemaError};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Change events that carry an order worth flattening. Anything else is filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CdcEventType {
    Insert,
    Modify,
}

impl CdcEventType {
    pub fn from_event_name(event_name: &str) -> Option<Self> {
        match event_name {
            "INSERT" => Some(CdcEventType::Insert),
            "MODIFY" => Some(CdcEventType::Modify),
            _ => None,
        }
    }
}

/// Decoded stream record: `{"eventName": ..., "dynamodb": {"NewImage": {...}}}`.
#[derive(Debug, Clone)]
pub struct ChangeEnvelope {
    fields: Map<String, Value>,
}

impl ChangeEnvelope {
    pub fn parse(bytes: &[u8]) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_slice(bytes).map_err(DecodeError::Json)?;

        match value {
            Value::Object(fields) => Ok(ChangeEnvelope { fields }),
            other => Err(SchemaError::EnvelopeNotObject {
                found: json_type_name(&other),
            }
            .into()),
        }
    }

    pub fn event_name(&self) -> Option<&str> {
        self.fields.get("eventName").and_then(Value::as_str)
    }

    pub fn event_type(&self) -> Option<CdcEventType> {
        self.event_name().and_then(CdcEventType::from_event_name)
    }

    pub fn new_image(&self) -> Result<NewImage<'_>, SchemaError> {
        let dynamodb = self
            .fields
            .get("dynamodb")
            .and_then(Value::as_object)
            .ok_or(SchemaError::MissingPath("dynamodb"))?;

        dynamodb
            .get("NewImage")
            .and_then(Value::as_object)
            .map(|attributes| NewImage { attributes })
            .ok_or(SchemaError::MissingPath("dynamodb.NewImage"))
    }
}

/// Post-mutation row image. Only the fields that are read get decoded, so
/// unrelated attributes of any type are tolerated.
#[derive(Debug, Clone, Copy)]
pub struct NewImage<'a> {
    attributes: &'a Map<String, Value>,
}

impl<'a> NewImage<'a> {
    fn attribute(
        &self,
        field: &'static str,
        expected: AttributeKind,
    ) -> Result<AttributeValue, SchemaError> {
        let raw = self
            .attributes
            .get(field)
            .ok_or(SchemaError::MissingField(field))?;
        let attribute = AttributeValue::decode(field, raw)?;

        if attribute.kind != expected {
            return Err(SchemaError::UnexpectedAttributeType {
                field,
                expected,
                found: attribute.kind,
            });
        }
        Ok(attribute)
    }

    pub fn string(&self, field: &'static str) -> Result<String, SchemaError> {
        Ok(self.attribute(field, AttributeKind::String)?.value)
    }

    pub fn integer(&self, field: &'static str) -> Result<i64, SchemaError> {
        let value = self.attribute(field, AttributeKind::Numeric)?.value;

        value
            .trim()
            .parse::<i64>()
            .map_err(|source| SchemaError::InvalidInteger {
                field,
                value,
                source,
            })
    }

    /// Accepts plain (`499.99`) and scientific (`4.9999E+2`) notation.
    pub fn decimal(&self, field: &'static str) -> Result<Decimal, SchemaError> {
        let value = self.attribute(field, AttributeKind::Numeric)?.value;
        let trimmed = value.trim();

        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|source| SchemaError::InvalidDecimal {
                field,
                value,
                source,
            })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::{CdcEventType, ChangeEnvelope};
    use crate::error::{RecordError, SchemaError};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    fn parse_envelope(value: serde_json::Value) -> ChangeEnvelope {
        ChangeEnvelope::parse(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn when_event_name_is_insert_or_modify_should_be_relevant() {
        assert_eq!(
            parse_envelope(json!({"eventName": "INSERT"})).event_type(),
            Some(CdcEventType::Insert)
        );
        assert_eq!(
            parse_envelope(json!({"eventName": "MODIFY"})).event_type(),
            Some(CdcEventType::Modify)
        );
    }

    #[test]
    fn when_event_name_is_other_or_absent_should_be_filtered() {
        assert_eq!(parse_envelope(json!({"eventName": "REMOVE"})).event_type(), None);
        assert_eq!(parse_envelope(json!({"eventName": "insert"})).event_type(), None);
        assert_eq!(parse_envelope(json!({"eventName": 1})).event_type(), None);
        assert_eq!(parse_envelope(json!({})).event_type(), None);
    }

    #[test]
    fn when_not_json_should_be_decode_error() {
        let result = ChangeEnvelope::parse(b"not json");

        assert!(matches!(result, Err(RecordError::Decode(_))));
    }

    #[test]
    fn when_not_an_object_should_be_schema_error() {
        let result = ChangeEnvelope::parse(b"[1, 2, 3]");

        assert!(matches!(
            result,
            Err(RecordError::Schema(SchemaError::EnvelopeNotObject {
                found: "an array"
            }))
        ));
    }

    #[test]
    fn when_new_image_missing_should_name_the_path() {
        let no_dynamodb = parse_envelope(json!({"eventName": "INSERT"}));
        let no_image = parse_envelope(json!({"eventName": "INSERT", "dynamodb": {"Keys": {}}}));

        assert!(matches!(
            no_dynamodb.new_image(),
            Err(SchemaError::MissingPath("dynamodb"))
        ));
        assert!(matches!(
            no_image.new_image(),
            Err(SchemaError::MissingPath("dynamodb.NewImage"))
        ));
    }

    #[test]
    fn new_image_accessors_should_coerce_declared_types() {
        let envelope = parse_envelope(json!({
            "eventName": "MODIFY",
            "dynamodb": {"NewImage": {
                "status": {"S": "shipped"},
                "quantity": {"N": " 7 "},
                "price": {"N": "1.25E+1"},
                "tags": {"SS": ["a", "b"]}
            }}
        }));
        let image = envelope.new_image().unwrap();

        assert_eq!(image.string("status").unwrap(), "shipped");
        assert_eq!(image.integer("quantity").unwrap(), 7);
        assert_eq!(
            image.decimal("price").unwrap(),
            Decimal::from_str("12.5").unwrap()
        );
    }

    #[test]
    fn new_image_accessors_should_reject_bad_values() {
        let envelope = parse_envelope(json!({
            "dynamodb": {"NewImage": {
                "quantity": {"N": "2.5"},
                "price": {"N": "NaN"},
                "orderid": {"N": "4821"}
            }}
        }));
        let image = envelope.new_image().unwrap();

        assert!(matches!(
            image.integer("quantity"),
            Err(SchemaError::InvalidInteger { field: "quantity", .. })
        ));
        assert!(matches!(
            image.decimal("price"),
            Err(SchemaError::InvalidDecimal { field: "price", .. })
        ));
        assert!(matches!(
            image.string("orderid"),
            Err(SchemaError::UnexpectedAttributeType { field: "orderid", .. })
        ));
        assert!(matches!(
            image.string("status"),
            Err(SchemaError::MissingField("status"))
        ));
    }

    #[test]
    fn when_decimal_exceeds_precision_should_reject_rather_than_approximate() {
        let envelope = parse_envelope(json!({
            "dynamodb": {"NewImage": {
                "price": {"N": "1E-30"}
            }}
        }));
        let image = envelope.new_image().unwrap();

        assert!(matches!(
            image.decimal("price"),
            Err(SchemaError::InvalidDecimal { field: "price", .. })
        ));
    }
}
