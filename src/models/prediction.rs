use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Option<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            None
        } else {
            Some(Self { prompt })
        }
    }

    /// Anything other than a non-blank string (missing, `null`, numbers,
    /// booleans, `""`) yields `None`.
    pub fn from_body(body: &Value) -> Option<Self> {
        body.get("prompt")
            .and_then(Value::as_str)
            .and_then(Self::new)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionRequest {
    pub model: String,
    pub input: PredictionInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionInput {
    pub prompt: String,
}

impl PredictionRequest {
    pub fn new(model: impl Into<String>, request: &GenerationRequest) -> Self {
        Self {
            model: model.into(),
            input: PredictionInput {
                prompt: request.prompt.clone(),
            },
        }
    }
}

/// The payload stays opaque so it can be relayed verbatim; only the fields
/// needed to locate the image are looked at.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction(pub Value);

impl Prediction {
    pub fn into_inner(self) -> Value {
        self.0
    }

    pub fn image_url(&self) -> Option<&str> {
        resolve_image_url(&self.0)
    }
}

/// `metadata.storage.files[0].url` wins over `output[0]`; empty strings count
/// as absent.
pub fn resolve_image_url(body: &Value) -> Option<&str> {
    let stored = body
        .pointer("/metadata/storage/files/0/url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty());

    stored.or_else(|| {
        body.pointer("/output/0")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    })
}

pub fn error_message(body: &Value) -> Option<&str> {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|msg| !msg.trim().is_empty())
}
