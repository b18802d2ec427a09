use crate::envelope::{CdcEventType, NewImage};
use crate::error::{RecordError, SchemaError, SerializationError};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

/// Turns one raw delivery-stream record into its outcome.
///
/// Implementations must not panic and must echo `record_id` back unchanged.
#[cfg_attr(any(test, feature = "mocks"), automock)]
pub trait RecordTransformer {
    fn transform(&self, record: &RawRecord) -> Outcome;
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_stream_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub records: Vec<RawRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub record_id: String,
    /// Base64 encoded change envelope.
    pub data: String,
}

impl RawRecord {
    pub fn new(record_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RecordResult {
    Ok,
    Dropped,
    ProcessingFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub record_id: String,
    pub result: RecordResult,
    pub data: String,
}

impl Outcome {
    pub fn ok(record: &RawRecord, data: String) -> Self {
        Self {
            record_id: record.record_id.clone(),
            result: RecordResult::Ok,
            data,
        }
    }

    pub fn dropped(record: &RawRecord) -> Self {
        Self::passthrough(record, RecordResult::Dropped)
    }

    pub fn processing_failed(record: &RawRecord) -> Self {
        Self::passthrough(record, RecordResult::ProcessingFailed)
    }

    fn passthrough(record: &RawRecord, result: RecordResult) -> Self {
        Self {
            record_id: record.record_id.clone(),
            result,
            data: record.data.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransformationResponse {
    pub records: Vec<Outcome>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub ok: usize,
    pub dropped: usize,
    pub failed: usize,
}

impl TransformationResponse {
    pub fn summary(&self) -> BatchSummary {
        self.records
            .iter()
            .fold(BatchSummary::default(), |mut summary, outcome| {
                match outcome.result {
                    RecordResult::Ok => summary.ok += 1,
                    RecordResult::Dropped => summary.dropped += 1,
                    RecordResult::ProcessingFailed => summary.failed += 1,
                }
                summary
            })
    }
}

/// Midpoint rule applied when `total_price` is cut to cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalPriceRounding {
    #[default]
    HalfAwayFromZero,
    HalfEven,
}

impl TotalPriceRounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            TotalPriceRounding::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
            TotalPriceRounding::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }

    pub fn round_cents(self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(2, self.strategy())
    }
}

/// Flattened order as delivered to the sink. Field order is the output key order;
/// decimals are written as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessRecord {
    pub orderid: String,
    pub product_name: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub customer_id: String,
    pub payment_method: String,
    pub status: String,
    pub order_timestamp: String,
    pub cdc_event_type: CdcEventType,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl BusinessRecord {
    pub fn from_new_image(
        image: &NewImage<'_>,
        event_type: CdcEventType,
        rounding: TotalPriceRounding,
    ) -> Result<Self, RecordError> {
        let quantity = image.integer("quantity")?;
        let price = image.decimal("price")?;
        let total_price = price
            .checked_mul(Decimal::from(quantity))
            .map(|total| rounding.round_cents(total))
            .ok_or(SchemaError::TotalPriceOverflow { price, quantity })?;

        Ok(BusinessRecord {
            orderid: image.string("orderid")?,
            product_name: image.string("product_name")?,
            quantity,
            price,
            customer_id: image.string("customer_id")?,
            payment_method: image.string("payment_method")?,
            status: image.string("status")?,
            order_timestamp: image.string("timestamp")?,
            cdc_event_type: event_type,
            total_price,
        })
    }

    /// One compact JSON object followed by a single newline.
    pub fn to_json_line(&self) -> Result<Vec<u8>, SerializationError> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}
