//! Prompt submission form.
//!
//! [`state`] holds the pure reducer; [`PromptForm`] drives it against a
//! [`GenerateApi`], either over HTTP or straight into an in-process proxy.

pub mod form;
pub mod http;
pub mod state;

use crate::{
    error::Result,
    models::GenerationRequest,
    proxy::{GenerationProxy, ProxyReply},
};
use async_trait::async_trait;

pub use form::PromptForm;
pub use http::HttpGenerateApi;
pub use state::{reduce, Effect, FormEvent, FormState, UiState};

/// `Ok` carries whatever the endpoint answered, error statuses included;
/// `Err` means no answer could be read at all.
#[async_trait]
pub trait GenerateApi: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<ProxyReply>;
}

#[async_trait]
impl GenerateApi for GenerationProxy {
    async fn generate(&self, request: &GenerationRequest) -> Result<ProxyReply> {
        Ok(self.forward(request).await)
    }
}
