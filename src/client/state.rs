use crate::{
    models::{error_message, resolve_image_url, GenerationRequest},
    proxy::ProxyReply,
};
use serde_json::Value;

pub const PROMPT_MISSING: &str = "Please enter a prompt";
pub const NO_IMAGE: &str = "No image generated";
pub const REQUEST_FAILED: &str = "Failed to generate image";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";
pub const NO_DATA: &str = "No data available";

#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Idle,
    Generating,
    Succeeded { image: String, raw: Value },
    /// `raw` holds the endpoint body when one arrived.
    Failed { message: String, raw: Option<Value> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub status: UiState,
    pub validation_error: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            status: UiState::Idle,
            validation_error: None,
        }
    }
}

impl FormState {
    pub fn is_generating(&self) -> bool {
        matches!(self.status, UiState::Generating)
    }

    pub fn image(&self) -> Option<&str> {
        match &self.status {
            UiState::Succeeded { image, .. } => Some(image),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        if let Some(validation) = &self.validation_error {
            return Some(validation);
        }
        match &self.status {
            UiState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn raw_response(&self) -> Option<&Value> {
        match &self.status {
            UiState::Succeeded { raw, .. } => Some(raw),
            UiState::Failed { raw, .. } => raw.as_ref(),
            _ => None,
        }
    }

    pub fn raw_panel(&self) -> String {
        self.raw_response()
            .and_then(|raw| serde_json::to_string_pretty(raw).ok())
            .unwrap_or_else(|| NO_DATA.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Submit(String),
    Responded(ProxyReply),
    TransportFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Dispatch(GenerationRequest),
}

pub fn reduce(state: FormState, event: FormEvent) -> (FormState, Option<Effect>) {
    match event {
        FormEvent::Submit(_) if state.is_generating() => (state, None),
        FormEvent::Submit(prompt) => match GenerationRequest::new(prompt) {
            Some(request) => (
                FormState {
                    status: UiState::Generating,
                    validation_error: None,
                },
                Some(Effect::Dispatch(request)),
            ),
            None => (
                FormState {
                    validation_error: Some(PROMPT_MISSING.to_string()),
                    ..state
                },
                None,
            ),
        },
        FormEvent::Responded(_) | FormEvent::TransportFailed(_) if !state.is_generating() => {
            (state, None)
        }
        FormEvent::Responded(reply) => (settled(response_status(reply)), None),
        FormEvent::TransportFailed(message) => {
            let message = if message.trim().is_empty() {
                SOMETHING_WENT_WRONG.to_string()
            } else {
                message
            };
            (settled(UiState::Failed { message, raw: None }), None)
        }
    }
}

fn settled(status: UiState) -> FormState {
    FormState {
        status,
        validation_error: None,
    }
}

fn response_status(reply: ProxyReply) -> UiState {
    if !reply.is_success() {
        let message = error_message(&reply.body)
            .unwrap_or(REQUEST_FAILED)
            .to_string();
        return UiState::Failed {
            message,
            raw: Some(reply.body),
        };
    }

    match resolve_image_url(&reply.body).map(str::to_owned) {
        Some(image) => UiState::Succeeded {
            image,
            raw: reply.body,
        },
        None => UiState::Failed {
            message: NO_IMAGE.to_string(),
            raw: Some(reply.body),
        },
    }
}
