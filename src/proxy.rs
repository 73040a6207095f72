//! The generation endpoint, independent of any HTTP framework.
//!
//! [`GenerationProxy::handle`] takes the raw request body and always comes
//! back with a status code and a JSON body; errors never escape it.

use crate::{
    error::SkygenError,
    models::GenerationRequest,
    skytells::PredictionService,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub const PROMPT_REQUIRED: &str = "Prompt is required";

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyReply {
    pub status: u16,
    pub body: Value,
}

impl ProxyReply {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Clone)]
pub struct GenerationProxy {
    service: Arc<dyn PredictionService>,
}

impl GenerationProxy {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        Self { service }
    }

    pub fn model(&self) -> &str {
        self.service.model()
    }

    pub async fn handle(&self, raw_body: &[u8]) -> ProxyReply {
        let body: Value = match serde_json::from_slice(raw_body) {
            Ok(body) => body,
            Err(e) => {
                let err = SkygenError::from(e);
                log::error!("Error generating image: {}", err);
                return ProxyReply::error(500, err.user_message());
            }
        };

        match GenerationRequest::from_body(&body) {
            Some(request) => self.forward(&request).await,
            None => {
                let err = SkygenError::Validation(PROMPT_REQUIRED.to_string());
                log::warn!("Rejected generation request: {}", err);
                ProxyReply::error(400, err.user_message())
            }
        }
    }

    pub async fn forward(&self, request: &GenerationRequest) -> ProxyReply {
        match self.service.predict(request).await {
            Ok(prediction) => ProxyReply::ok(prediction.into_inner()),
            Err(e) => {
                log::error!("Error generating image: {}", e);
                ProxyReply::error(500, e.user_message())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::Prediction;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub(crate) struct ScriptedService {
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<String>>,
        outcome: fn() -> Result<Prediction>,
    }

    impl ScriptedService {
        pub(crate) fn new(outcome: fn() -> Result<Prediction>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                outcome,
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PredictionService for ScriptedService {
        fn model(&self) -> &str {
            "truefusion-pro"
        }

        async fn predict(&self, request: &GenerationRequest) -> Result<Prediction> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt.clone());
            (self.outcome)()
        }
    }

    pub(crate) fn output_prediction() -> Result<Prediction> {
        Ok(Prediction(json!({
            "id": "pred_1",
            "output": ["https://cdn.skytells.ai/pred_1.png"]
        })))
    }

    fn quota_error() -> Result<Prediction> {
        Err(SkygenError::Upstream {
            status: 429,
            message: "quota exceeded".into(),
        })
    }

    fn blank_error() -> Result<Prediction> {
        Err(SkygenError::Transport(String::new()))
    }

    #[tokio::test]
    async fn test_missing_prompt_is_rejected_without_calling_provider() {
        let service = ScriptedService::new(output_prediction);
        let proxy = GenerationProxy::new(service.clone());

        for body in [
            r#"{}"#,
            r#"{"prompt":""}"#,
            r#"{"prompt":null}"#,
            r#"{"prompt":"   "}"#,
        ] {
            let reply = proxy.handle(body.as_bytes()).await;
            assert_eq!(reply.status, 400);
            assert_eq!(reply.body, json!({ "error": "Prompt is required" }));
        }
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_prompt_relays_prediction_verbatim() {
        let service = ScriptedService::new(output_prediction);
        let proxy = GenerationProxy::new(service.clone());

        let reply = proxy.handle(br#"{"prompt":"a red fox"}"#).await;

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, output_prediction().unwrap().into_inner());
        assert_eq!(service.calls(), 1);
        assert_eq!(*service.prompts.lock().unwrap(), vec!["a red fox".to_string()]);
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_500() {
        let proxy = GenerationProxy::new(ScriptedService::new(quota_error));
        let reply = proxy.handle(br#"{"prompt":"a red fox"}"#).await;
        assert_eq!(reply, ProxyReply::error(500, "quota exceeded"));
    }

    #[tokio::test]
    async fn test_blank_failure_uses_fallback_message() {
        let proxy = GenerationProxy::new(ScriptedService::new(blank_error));
        let reply = proxy.handle(br#"{"prompt":"a red fox"}"#).await;
        assert_eq!(reply, ProxyReply::error(500, "Failed to generate image"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_500_json() {
        let service = ScriptedService::new(output_prediction);
        let proxy = GenerationProxy::new(service.clone());

        let reply = proxy.handle(b"prompt=hello").await;

        assert_eq!(reply.status, 500);
        assert!(reply.body["error"].as_str().is_some_and(|m| !m.is_empty()));
        assert_eq!(service.calls(), 0);
    }
}
