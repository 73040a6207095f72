use crate::{proxy::ProxyReply, server::AppState};
use actix_web::{http::StatusCode, web, HttpResponse};
use serde_json::json;

pub const MAX_BODY_BYTES: usize = 256 * 1024;

pub async fn generate(state: web::Data<AppState>, payload: web::Payload) -> HttpResponse {
    let reply = match payload.to_bytes_limited(MAX_BODY_BYTES).await {
        Ok(Ok(body)) => state.proxy.handle(&body).await,
        Ok(Err(e)) => {
            log::error!("Error reading request body: {}", e);
            ProxyReply::error(500, e.to_string())
        }
        Err(_) => {
            log::error!("Request body larger than {} bytes", MAX_BODY_BYTES);
            ProxyReply::error(
                500,
                format!("Request body exceeds {} bytes", MAX_BODY_BYTES),
            )
        }
    };
    json_reply(reply)
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "model": state.proxy.model(),
    }))
}

fn json_reply(reply: ProxyReply) -> HttpResponse {
    let status =
        StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(reply.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::{tests::ScriptedService, GenerationProxy};
    use crate::server::configure;
    use actix_web::{test, App};
    use serde_json::Value;

    macro_rules! app_with {
        ($service:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState {
                        proxy: GenerationProxy::new($service),
                    }))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_generate_route_relays_prediction() {
        let service = ScriptedService::new(crate::proxy::tests::output_prediction);
        let app = app_with!(service.clone());

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({ "prompt": "a red fox" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["output"][0], "https://cdn.skytells.ai/pred_1.png");
        assert_eq!(service.calls(), 1);
    }

    #[actix_web::test]
    async fn test_generate_route_requires_prompt() {
        let service = ScriptedService::new(crate::proxy::tests::output_prediction);
        let app = app_with!(service.clone());

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({ "prompt": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Prompt is required" }));
        assert_eq!(service.calls(), 0);
    }

    #[actix_web::test]
    async fn test_generate_route_reports_provider_failure() {
        use crate::{config::SkytellsConfig, skytells::SkytellsClient};
        use std::sync::Arc;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let provider = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/predict"))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(json!({ "message": "quota exceeded" })),
            )
            .expect(1)
            .mount(&provider)
            .await;

        let config = SkytellsConfig::new().with_base_url(format!("{}/v1", provider.uri()));
        let client = SkytellsClient::new(config).unwrap();
        let app = app_with!(Arc::new(client));

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({ "prompt": "a red fox" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "quota exceeded" }));
    }

    #[actix_web::test]
    async fn test_generate_route_rejects_oversized_body() {
        let service = ScriptedService::new(crate::proxy::tests::output_prediction);
        let app = app_with!(service.clone());

        let prompt = "a".repeat(300 * 1024);
        let req = test::TestRequest::post()
            .uri("/api/generate")
            .insert_header(("content-type", "application/json"))
            .set_payload(json!({ "prompt": prompt }).to_string())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
        assert_eq!(service.calls(), 0);
    }

    #[actix_web::test]
    async fn test_health_reports_model() {
        let service = ScriptedService::new(crate::proxy::tests::output_prediction);
        let app = app_with!(service.clone());

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, json!({ "status": "ok", "model": "truefusion-pro" }));
        assert_eq!(service.calls(), 0);
    }
}
