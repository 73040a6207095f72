pub mod predict_client;

use crate::{
    error::Result,
    models::{GenerationRequest, Prediction},
};
use async_trait::async_trait;

pub use predict_client::SkytellsClient;

/// The proxy only talks to the provider through this trait, so tests and
/// alternative backends can stand in for the real API.
#[async_trait]
pub trait PredictionService: Send + Sync {
    fn model(&self) -> &str;

    async fn predict(&self, request: &GenerationRequest) -> Result<Prediction>;
}
