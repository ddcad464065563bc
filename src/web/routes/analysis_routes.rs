use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use std::sync::Arc;

use super::parse_ibge_code;
use crate::web::models::AnalysisResponse;
use crate::web::{AppError, AppState};

async fn get_analysis_handler(
    State(app_state): State<Arc<AppState>>,
    Path(raw_code): Path<String>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let ibge_code = parse_ibge_code(&raw_code)?;
    let record = app_state.source.market_intelligence(ibge_code).await?;
    let analysis = app_state.analysis.analyze(&record).await?;
    Ok(Json(AnalysisResponse::success(
        analysis,
        "Análise gerada com sucesso.",
    )))
}

pub fn analysis_router() -> Router<Arc<AppState>> {
    Router::new().route("/analysis/{ibge_code}", get(get_analysis_handler))
}
