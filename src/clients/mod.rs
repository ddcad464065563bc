use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

pub mod cnes;
pub mod ibge;
pub mod llm;

const USER_AGENT: &str = concat!("HM-ITool/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("{service} returned non-success status: {status}. Body: {body}")]
    UnexpectedStatus {
        service: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("Unexpected response from {service}: {reason}")]
    UnexpectedResponse {
        service: &'static str,
        reason: String,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Shared HTTP client for all upstream services.
pub fn build_http_client() -> Result<Client, ClientError> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

/// Turns a non-2xx response into [`ClientError::UnexpectedStatus`], keeping the body for the logs.
async fn ensure_success(service: &'static str, response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    Err(ClientError::UnexpectedStatus {
        service,
        status,
        body,
    })
}

fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
