use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use shared::core::TotalPriceRounding;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Config {
    pub total_price_rounding: TotalPriceRounding,
    /// Batches above this size are split and transformed concurrently.
    pub transform_chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total_price_rounding: TotalPriceRounding::HalfAwayFromZero,
            transform_chunk_size: 500,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(&["TOTAL_PRICE_ROUNDING", "TRANSFORM_CHUNK_SIZE"]))
            .extract()
    }
}
