use crate::attribute::AttributeKind;
use thiserror::Error;

/// The outer encoding or the JSON document could not be read.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("record data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("record data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The envelope is readable but does not carry a usable order image.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("change envelope must be a JSON object, found {found}")]
    EnvelopeNotObject { found: &'static str },
    #[error("change envelope is missing `{0}`")]
    MissingPath(&'static str),
    #[error("NewImage is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` is not a typed attribute: {reason}")]
    MalformedAttribute { field: String, reason: &'static str },
    #[error("field `{field}` uses unsupported attribute type `{tag}`")]
    UnsupportedAttributeType { field: String, tag: String },
    #[error("field `{field}` should be of type {expected} but is {found}")]
    UnexpectedAttributeType {
        field: &'static str,
        expected: AttributeKind,
        found: AttributeKind,
    },
    #[error("field `{field}` is not an integer")]
    InvalidInteger {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("field `{field}` is not a decimal")]
    InvalidDecimal {
        field: &'static str,
        value: String,
        #[source]
        source: rust_decimal::Error,
    },
    #[error("total_price overflows for the given price and quantity")]
    TotalPriceOverflow {
        price: rust_decimal::Decimal,
        quantity: i64,
    },
}

/// The flattened record could not be written out.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("failed to serialize business record: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

impl RecordError {
    /// Stable label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::Decode(_) => "decode",
            RecordError::Schema(_) => "schema",
            RecordError::Serialization(_) => "serialization",
        }
    }
}
