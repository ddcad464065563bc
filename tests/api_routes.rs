use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use hmi_tool::clients::ClientError;
use hmi_tool::clients::llm::CompletionProvider;
use hmi_tool::config::AppConfig;
use hmi_tool::domain::benchmarks::percentage;
use hmi_tool::services::FixtureSource;
use hmi_tool::web::{AppState, create_axum_router};

struct CannedProvider(Option<Value>);

#[async_trait]
impl CompletionProvider for CannedProvider {
    async fn complete_json(&self, _system_prompt: &str, _user_prompt: &str) -> Result<Value, ClientError> {
        self.0
            .clone()
            .ok_or_else(|| ClientError::InvalidConfiguration("LLM API key is not configured".to_string()))
    }
}

fn app_with(provider: CannedProvider) -> Router {
    let state = AppState::new(
        Arc::new(FixtureSource::new()),
        Arc::new(provider),
        Arc::new(AppConfig::default()),
    );
    create_axum_router(Arc::new(state))
}

fn app() -> Router {
    app_with(CannedProvider(None))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = response.into_body().collect().await.expect("body").to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let response = app()
        .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.expect("body").to_bytes();
    assert_eq!(std::str::from_utf8(&body).expect("utf8"), "OK");
}

#[tokio::test]
async fn test_states_are_listed() {
    let (status, body) = get_json(app(), "/api/v1/states").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let states = body["data"].as_array().expect("array");
    assert_eq!(states.len(), 10);
    assert_eq!(states[0]["sigla"], "BA");
    assert_eq!(states[0]["nome"], "Bahia");
    assert_eq!(states[0]["regiao"], "Nordeste");
}

#[tokio::test]
async fn test_cities_filtered_by_state_and_sorted() {
    let (status, body) = get_json(app(), "/api/v1/cities?uf=sp").await;
    assert_eq!(status, StatusCode::OK);

    let cities = body["data"].as_array().expect("array");
    assert_eq!(cities.len(), 8);
    assert!(cities.iter().all(|c| c["uf"] == "SP"));

    let names: Vec<&str> = cities.iter().filter_map(|c| c["nome"].as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Campinas",
            "Jundiaí",
            "Piracicaba",
            "Ribeirão Preto",
            "Santos",
            "São José dos Campos",
            "São Paulo",
            "Sorocaba",
        ]
    );
}

#[tokio::test]
async fn test_cities_without_filter_returns_every_fixture() {
    let (status, body) = get_json(app(), "/api/v1/cities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(46));
}

#[tokio::test]
async fn test_invalid_uf_is_rejected() {
    let (status, body) = get_json(app(), "/api/v1/cities?uf=S1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_market_intelligence_payload() {
    let (status, body) = get_json(app(), "/api/v1/market-intelligence/3550308").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Dados de inteligência de mercado recuperados com sucesso.");

    let data = &body["data"];
    assert_eq!(data["municipio_ibge"], 3550308);
    assert_eq!(data["nome_municipio"], "São Paulo");
    assert_eq!(data["uf_sigla"], "SP");
    assert_eq!(data["regiao"], "Sudeste");
    assert_eq!(data["fonte_dados"], "mock");
    assert!(data.get("estabelecimentos").is_none());

    let pop = &data["populacao"];
    let municipal = pop["municipal"].as_f64().expect("municipal");
    let uf = pop["uf"].as_f64().expect("uf");
    let brasil = pop["brasil"].as_f64().expect("brasil");
    let perc_uf = pop["perc_pop_uf"].as_f64().expect("perc_pop_uf");
    let perc_brasil = pop["perc_pop_brasil"].as_f64().expect("perc_pop_brasil");
    assert!((perc_uf - percentage(municipal, uf, 2)).abs() < 1e-9);
    assert!((perc_brasil - percentage(municipal, brasil, 4)).abs() < 1e-9);
    assert_eq!(pop["piramide_etaria"].as_array().map(Vec::len), Some(34));

    let saude = &data["saude"];
    let publicos = saude["leitos_publicos_perc"].as_f64().expect("public");
    let privados = saude["leitos_privados_perc"].as_f64().expect("private");
    assert!((publicos + privados - 100.0).abs() < 1e-9);
    assert_eq!(saude["top_5_estabelecimentos"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn test_market_intelligence_is_stable_across_requests() {
    let (_, first) = get_json(app(), "/api/v1/market-intelligence/3509502").await;
    let (_, second) = get_json(app(), "/api/v1/market-intelligence/3509502").await;
    assert_eq!(first["data"]["saude"], second["data"]["saude"]);
    assert_eq!(first["data"]["mercado_trabalho"], second["data"]["mercado_trabalho"]);
}

#[tokio::test]
async fn test_unknown_municipality_is_not_found() {
    let (status, body) = get_json(app(), "/api/v1/market-intelligence/1234567").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Dados não encontrados para o código IBGE: 1234567");
}

#[tokio::test]
async fn test_out_of_range_numeric_code_is_not_found() {
    let (status, body) = get_json(app(), "/api/v1/market-intelligence/99999999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Dados não encontrados para o código IBGE: 99999999999");
}

#[tokio::test]
async fn test_non_numeric_code_is_bad_request() {
    let (status, body) = get_json(app(), "/api/v1/market-intelligence/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_analysis_is_passed_through() {
    let answer = json!({
        "problemas_desafios": ["Fila para leitos de UTI"],
        "oportunidades": ["Clínicas de diagnóstico"],
        "fatos_tendencias": ["Envelhecimento da população"]
    });
    let (status, body) = get_json(app_with(CannedProvider(Some(answer.clone()))), "/api/v1/analysis/3550308").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["analysis"], answer);
}

#[tokio::test]
async fn test_analysis_without_llm_key_reports_error() {
    let (status, body) = get_json(app(), "/api/v1/analysis/3550308").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap_or_default().starts_with("Análise indisponível"));
}

#[tokio::test]
async fn test_analysis_for_unknown_municipality_is_not_found() {
    let (status, _) = get_json(app(), "/api/v1/analysis/1234567").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_api_route_is_json_not_found() {
    let (status, body) = get_json(app(), "/api/v1/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_frontend_is_served() {
    for uri in ["/", "/some/client/route"] {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).expect("content type");
        assert!(content_type.to_str().expect("ascii").starts_with("text/html"));
    }

    let response = app()
        .oneshot(Request::builder().uri("/app.js").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).expect("content type");
    assert!(content_type.to_str().expect("ascii").contains("javascript"));
}
