use serde::{Deserialize, Serialize};
use serde_json::Value;

const STATUS_SUCCESS: &str = "success";
const STATUS_ERROR: &str = "error";

/// `{ status: "success", data, message }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS,
            data,
            message: message.into(),
        }
    }
}

/// Same envelope as [`ApiResponse`], with the LLM answer under `analysis`.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub status: &'static str,
    pub analysis: Value,
    pub message: String,
}

impl AnalysisResponse {
    pub fn success(analysis: Value, message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS,
            analysis,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: String, details: Option<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            message,
            details,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CitiesQuery {
    pub uf: Option<String>,
}
