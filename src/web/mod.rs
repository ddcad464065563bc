use axum::{Router, http::Method, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::clients::cnes::CnesClient;
use crate::clients::ibge::IbgeClient;
use crate::clients::llm::{CompletionProvider, OpenAiClient};
use crate::clients::{ClientError, build_http_client};
use crate::config::{AppConfig, DataSourceKind};
use crate::services::{AnalysisService, FixtureSource, LiveSource, MarketDataSource};
use crate::web::routes::{analysis_routes, locality_routes, market_routes};

pub use error::AppError;

pub mod error;
pub mod models;
pub mod routes;
pub mod static_files;

pub struct AppState {
    pub source: Arc<dyn MarketDataSource>,
    pub analysis: AnalysisService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        provider: Arc<dyn CompletionProvider>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            source,
            analysis: AnalysisService::new(provider),
            config,
        }
    }

    /// Wires the data source and LLM client selected by `config`.
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self, ClientError> {
        let http = build_http_client()?;

        let source: Arc<dyn MarketDataSource> = match config.data_source {
            DataSourceKind::Mock => Arc::new(FixtureSource::new()),
            DataSourceKind::Live => Arc::new(LiveSource::new(
                IbgeClient::new(http.clone(), &config.ibge_base_url),
                CnesClient::new(
                    http.clone(),
                    &config.cnes_base_url,
                    config.cnes_page_size,
                    config.cnes_max_pages,
                ),
            )),
        };
        info!(data_source = source.kind().as_str(), "Market data source ready");

        let provider = Arc::new(OpenAiClient::new(
            http,
            &config.llm_base_url,
            config.llm_api_key.clone(),
            &config.llm_model,
        ));
        if config.llm_api_key.is_none() {
            info!("No LLM API key configured; the analysis endpoint will report itself unavailable.");
        }

        Ok(Self::new(source, provider, config))
    }
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health_check_handler))
        .merge(locality_routes::locality_router())
        .merge(market_routes::market_router())
        .merge(analysis_routes::analysis_router());

    Router::new()
        .nest("/api/v1", api)
        .fallback(static_files::static_handler)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
