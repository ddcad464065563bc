use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::services::{AnalysisError, SourceError};
use crate::web::models::ErrorResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Upstream error: {message} ({details})")]
    Upstream { message: String, details: String },
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Upstream { message, details } => {
                error!(error = %details, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message, Some(details))
            }
            AppError::InternalServerError(msg) => {
                error!(error = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
        };
        (status, Json(ErrorResponse::new(message, details))).into_response()
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::MunicipalityNotFound(_) => AppError::NotFound(err.to_string()),
            SourceError::Upstream(e) => AppError::Upstream {
                message: "Erro ao consultar as fontes de dados externas.".to_string(),
                details: e.to_string(),
            },
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Prompt(e) => AppError::InternalServerError(format!("Failed to render prompt: {e}")),
            AnalysisError::NotConfigured(_) => AppError::InternalServerError(
                "Análise indisponível: a integração com o modelo de linguagem não está configurada.".to_string(),
            ),
            AnalysisError::Provider(e) => AppError::Upstream {
                message: "Erro ao gerar a análise de inteligência de mercado.".to_string(),
                details: e.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalServerError(format!("JSON serialization/deserialization error: {err}"))
    }
}
