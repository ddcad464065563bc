use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use std::sync::Arc;
use tracing::info;

use super::parse_ibge_code;
use crate::domain::models::MarketIntelligence;
use crate::web::models::ApiResponse;
use crate::web::{AppError, AppState};

async fn get_market_intelligence_handler(
    State(app_state): State<Arc<AppState>>,
    Path(raw_code): Path<String>,
) -> Result<Json<ApiResponse<MarketIntelligence>>, AppError> {
    let ibge_code = parse_ibge_code(&raw_code)?;
    let record = app_state.source.market_intelligence(ibge_code).await?;

    info!(
        ibge_code,
        source = app_state.source.kind().as_str(),
        "Market intelligence served"
    );
    Ok(Json(ApiResponse::success(
        record,
        "Dados de inteligência de mercado recuperados com sucesso.",
    )))
}

pub fn market_router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/market-intelligence/{ibge_code}",
        get(get_market_intelligence_handler),
    )
}
