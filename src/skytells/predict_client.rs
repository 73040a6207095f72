use crate::{
    config::SkytellsConfig,
    error::{Result, SkygenError},
    logger,
    models::{GenerationRequest, Prediction, PredictionRequest},
    skytells::PredictionService,
};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, StatusCode,
};
use serde_json::Value;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct SkytellsClient {
    http: Client,
    config: SkytellsConfig,
}

impl SkytellsClient {
    pub fn new(config: SkytellsConfig) -> Result<Self> {
        let mut builder = Client::builder().default_headers(Self::build_headers(&config)?);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| SkygenError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SkytellsConfig {
        &self.config
    }

    async fn exchange(
        &self,
        url: &str,
        payload: &PredictionRequest,
    ) -> Result<(StatusCode, String)> {
        let response = self.http.post(url).json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    fn build_headers(config: &SkytellsConfig) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&config.api_key)
                .map_err(|e| SkygenError::Config(format!("Invalid API key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl PredictionService for SkytellsClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn predict(&self, request: &GenerationRequest) -> Result<Prediction> {
        let payload = PredictionRequest::new(self.config.model.as_str(), request);
        let url = self.config.predict_url();

        log::info!("Requesting prediction from model: {}", payload.model);
        log::debug!("Prediction prompt length: {} chars", request.prompt.len());

        let mut timer = logger::timer("skytells predict");
        let (status, body) = match self.exchange(&url, &payload).await {
            Ok(exchanged) => exchanged,
            Err(e) => {
                timer.fail(&e);
                return Err(e);
            }
        };
        timer.stop();

        if !status.is_success() {
            let message = upstream_message(status, &body);
            log::error!("Prediction failed with {}: {}", status, message);
            return Err(SkygenError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let prediction: Value = serde_json::from_str(&body)?;
        Ok(Prediction(prediction))
    }
}

fn upstream_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        [
            json.pointer("/error/message"),
            json.get("error"),
            json.get("message"),
            json.get("detail"),
        ]
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().filter(|s| !s.trim().is_empty()).map(str::to_owned))
    });

    from_json.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SkytellsClient {
        let config = SkytellsConfig::new()
            .with_api_key("sk-test")
            .with_base_url(format!("{}/v1", server.uri()));
        SkytellsClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_predict_sends_model_and_prompt() {
        let server = MockServer::start().await;
        let prediction = json!({
            "id": "pred_123",
            "status": "succeeded",
            "output": ["https://cdn.skytells.ai/pred_123.png"]
        });

        Mock::given(method("POST"))
            .and(path("/v1/predict"))
            .and(header("x-api-key", "sk-test"))
            .and(body_json(json!({
                "model": "truefusion-pro",
                "input": { "prompt": "a lighthouse in fog" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&prediction))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = GenerationRequest::new("a lighthouse in fog").unwrap();
        let result = client.predict(&request).await.unwrap();

        assert_eq!(result.into_inner(), prediction);
    }

    #[tokio::test]
    async fn test_predict_surfaces_provider_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/predict"))
            .respond_with(
                ResponseTemplate::new(402)
                    .set_body_json(json!({ "error": { "message": "quota exceeded" } })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = GenerationRequest::new("anything").unwrap();
        let err = client.predict(&request).await.unwrap_err();

        match err {
            SkygenError::Upstream { status, message } => {
                assert_eq!(status, 402);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_predict_rejects_non_json_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = GenerationRequest::new("anything").unwrap();
        let err = client.predict(&request).await.unwrap_err();
        assert!(matches!(err, SkygenError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_predict_transport_failure() {
        let config = SkytellsConfig::new().with_base_url("http://127.0.0.1:1/v1");
        let client = SkytellsClient::new(config).unwrap();
        let request = GenerationRequest::new("anything").unwrap();

        let err = client.predict(&request).await.unwrap_err();
        assert!(matches!(err, SkygenError::Transport(_)));
        assert!(!err.user_message().is_empty());
    }

    #[test]
    fn test_upstream_message_fallbacks() {
        assert_eq!(
            upstream_message(StatusCode::UNAUTHORIZED, r#"{"message":"Invalid API key"}"#),
            "Invalid API key"
        );
        assert_eq!(
            upstream_message(StatusCode::BAD_REQUEST, r#"{"error":"bad model"}"#),
            "bad model"
        );
        assert_eq!(
            upstream_message(StatusCode::SERVICE_UNAVAILABLE, "upstream down"),
            "Service Unavailable"
        );
    }
}
