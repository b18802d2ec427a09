use std::sync::Arc;

use lambda_runtime::{tracing, Error, LambdaEvent};
use shared::core::{RecordTransformer, TransformationEvent, TransformationResponse};
use shared::transform::transform_batch;

pub(crate) struct HandlerDeps<T: RecordTransformer> {
    pub transformer: Arc<T>,
    pub chunk_size: usize,
}

#[tracing::instrument(skip(deps, event), fields(
    records = event.payload.records.len(),
    invocation_id = event.payload.invocation_id.as_deref().unwrap_or_default(),
))]
pub(crate) async fn function_handler<T>(
    deps: &HandlerDeps<T>,
    event: LambdaEvent<TransformationEvent>,
) -> Result<TransformationResponse, Error>
where
    T: RecordTransformer + Send + Sync + 'static,
{
    let records = event.payload.records;
    let chunk_size = deps.chunk_size.max(1);

    let outcomes = if records.len() <= chunk_size {
        transform_batch(deps.transformer.as_ref(), &records)
    } else {
        let tasks: Vec<_> = records
            .chunks(chunk_size)
            .map(|chunk| {
                let transformer = Arc::clone(&deps.transformer);
                let chunk = chunk.to_vec();
                tokio::task::spawn_blocking(move || transform_batch(transformer.as_ref(), &chunk))
            })
            .collect();
        let results = futures::future::join_all(tasks).await; // Run chunks concurrently

        let mut outcomes = Vec::with_capacity(records.len());
        for result in results {
            outcomes.extend(result?);
        }
        outcomes
    };

    let response = TransformationResponse { records: outcomes };
    let summary = response.summary();
    tracing::info!(
        ok = summary.ok,
        dropped = summary.dropped,
        failed = summary.failed,
        "Transformed batch"
    );

    Ok(response)
}
