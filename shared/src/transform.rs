use crate::core::{BusinessRecord, Outcome, RawRecord, RecordTransformer, TotalPriceRounding};
use crate::envelope::ChangeEnvelope;
use crate::error::{DecodeError, RecordError};
use base64::{engine::general_purpose::STANDARD, Engine};

/// What a well-formed record turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Base64 encoded JSON line of the flattened order.
    Transformed(String),
    /// Event type outside INSERT/MODIFY.
    Filtered { event_name: Option<String> },
}

/// Flattens order change events into sink-ready JSON lines.
///
/// Holds no mutable state, so one instance can be shared across threads
/// and reused for any number of batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderRecordTransformer {
    rounding: TotalPriceRounding,
}

impl OrderRecordTransformer {
    pub fn new(rounding: TotalPriceRounding) -> Self {
        Self { rounding }
    }

    /// Checks run in a fixed order: base64, JSON, event filter, schema,
    /// serialization. A record that cannot be decoded is never filtered.
    pub fn process(&self, data: &str) -> Result<Classification, RecordError> {
        let payload = STANDARD.decode(data).map_err(DecodeError::Base64)?;
        let envelope = ChangeEnvelope::parse(&payload)?;

        let event_type = match envelope.event_type() {
            Some(event_type) => event_type,
            None => {
                return Ok(Classification::Filtered {
                    event_name: envelope.event_name().map(str::to_string),
                })
            }
        };

        let image = envelope.new_image()?;
        let record = BusinessRecord::from_new_image(&image, event_type, self.rounding)?;
        let line = record.to_json_line()?;

        Ok(Classification::Transformed(STANDARD.encode(line)))
    }
}

impl RecordTransformer for OrderRecordTransformer {
    fn transform(&self, record: &RawRecord) -> Outcome {
        match self.process(&record.data) {
            Ok(Classification::Transformed(data)) => Outcome::ok(record, data),
            Ok(Classification::Filtered { event_name }) => {
                tracing::debug!(
                    record_id = %record.record_id,
                    event_name = ?event_name,
                    "Dropping record with unsupported event type"
                );
                Outcome::dropped(record)
            }
            Err(e) => {
                tracing::warn!(
                    record_id = %record.record_id,
                    kind = e.kind(),
                    "Failed to transform record: {}",
                    e
                );
                Outcome::processing_failed(record)
            }
        }
    }
}

/// Transforms every record in input order. Never fails; an empty batch
/// yields an empty result.
pub fn transform_batch<T: RecordTransformer + ?Sized>(
    transformer: &T,
    records: &[RawRecord],
) -> Vec<Outcome> {
    records
        .iter()
        .map(|record| transformer.transform(record))
        .collect()
}
