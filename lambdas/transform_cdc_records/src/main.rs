use std::sync::Arc;

use lambda_runtime::{run, service_fn, tracing, Error};
use shared::transform::OrderRecordTransformer;

use crate::event_handler::{function_handler, HandlerDeps};

mod config;
mod event_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let config = config::Config::load()?;
    tracing::info!(
        rounding = ?config.total_price_rounding,
        chunk_size = config.transform_chunk_size,
        "Loaded configuration"
    );

    let handler_deps = HandlerDeps {
        transformer: Arc::new(OrderRecordTransformer::new(config.total_price_rounding)),
        chunk_size: config.transform_chunk_size,
    };

    run(service_fn(|event| function_handler(&handler_deps, event))).await
}
