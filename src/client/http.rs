use crate::{
    client::GenerateApi,
    error::{Result, SkygenError},
    models::GenerationRequest,
    proxy::ProxyReply,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

#[derive(Clone)]
pub struct HttpGenerateApi {
    http: Client,
    url: String,
}

impl HttpGenerateApi {
    pub fn new(endpoint: &str) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: &str) -> Self {
        Self {
            http,
            url: format!("{}/api/generate", endpoint.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl GenerateApi for HttpGenerateApi {
    async fn generate(&self, request: &GenerationRequest) -> Result<ProxyReply> {
        log::debug!("POST {}", self.url);

        let response = self.http.post(&self.url).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SkygenError::Transport(format!("Unreadable response: {}", e)))?;

        Ok(ProxyReply { status, body })
    }
}
