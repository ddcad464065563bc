use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use std::sync::Arc;

use crate::domain::models::{City, StateSummary};
use crate::domain::states::normalize_uf;
use crate::web::models::{ApiResponse, CitiesQuery};
use crate::web::{AppError, AppState};

async fn get_states_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<StateSummary>>>, AppError> {
    let states = app_state.source.states().await?;
    Ok(Json(ApiResponse::success(
        states,
        "Estados recuperados com sucesso.",
    )))
}

async fn get_cities_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<CitiesQuery>,
) -> Result<Json<ApiResponse<Vec<City>>>, AppError> {
    let uf = match params.uf.as_deref().filter(|uf| !uf.trim().is_empty()) {
        Some(raw) => Some(
            normalize_uf(raw).ok_or_else(|| AppError::InvalidInput(format!("UF inválida: {raw}")))?,
        ),
        None => None,
    };

    let cities = app_state.source.cities(uf.as_deref()).await?;
    Ok(Json(ApiResponse::success(
        cities,
        "Cidades recuperadas com sucesso.",
    )))
}

pub fn locality_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/states", get(get_states_handler))
        .route("/cities", get(get_cities_handler))
}
