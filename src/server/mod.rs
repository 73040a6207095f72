pub mod handlers;

use crate::{
    config::Config,
    error::{Result, SkygenError},
    proxy::GenerationProxy,
    skytells::SkytellsClient,
};
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;

pub struct AppState {
    pub proxy: GenerationProxy,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/generate", web::post().to(handlers::generate))
            .route("/health", web::get().to(handlers::health)),
    );
}

pub async fn run(config: Config) -> Result<()> {
    let client = SkytellsClient::new(config.skytells.clone())?;
    let state = web::Data::new(AppState {
        proxy: GenerationProxy::new(Arc::new(client)),
    });

    crate::logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::new("%r %s %Dms"))
            .configure(configure)
    })
    .bind(config.bind_address())
    .map_err(|e| SkygenError::Config(format!("Failed to bind {}: {}", config.bind_address(), e)))?
    .run()
    .await?;

    Ok(())
}
