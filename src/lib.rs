//! Skygen: prompt-to-image generation through the Skytells prediction API.

pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod proxy;
#[cfg(feature = "server")]
pub mod server;
pub mod skytells;

pub use client::{FormState, GenerateApi, HttpGenerateApi, PromptForm, UiState};
pub use config::{ClientConfig, Config, SkytellsConfig};
pub use error::{Result, SkygenError};
pub use models::{GenerationRequest, Prediction, EXAMPLE_PROMPTS};
pub use proxy::{GenerationProxy, ProxyReply};
pub use skytells::{PredictionService, SkytellsClient};
