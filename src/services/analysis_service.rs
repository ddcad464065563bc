use serde_json::Value;
use std::sync::Arc;
use tera::{Context, Tera};
use thiserror::Error;
use tracing::{error, info};

use crate::clients::ClientError;
use crate::clients::llm::CompletionProvider;
use crate::domain::models::MarketIntelligence;

const SYSTEM_PROMPT: &str = "Você é um analista de inteligência de mercado especializado no setor de saúde \
brasileiro. Responda sempre em português e exclusivamente com um objeto JSON válido.";

const ANALYSIS_TEMPLATE: &str = r#"Analise o município de {{ nome_municipio }} ({{ uf_sigla }}), região {{ regiao }}, código IBGE {{ municipio_ibge }}.

População: {{ populacao.municipal }} habitantes ({{ populacao.perc_pop_uf }}% do estado, {{ populacao.perc_pop_brasil }}% do Brasil).
Razão de dependência: crianças/PEA {{ populacao.indices_demograficos.criancas_pea }}, idosos/PEA {{ populacao.indices_demograficos.idosos_pea }}.
Leitos: {{ saude.leitos_total }} no total, {{ saude.razao_leitos_por_mil }} por mil habitantes (estadual {{ saude.benchmarking.estadual }}, nacional {{ saude.benchmarking.nacional }}); {{ saude.leitos_publicos_perc }}% públicos e {{ saude.leitos_privados_perc }}% privados.
Planos de saúde: {{ planos_saude.beneficiarios }} beneficiários, cobertura de {{ planos_saude.cobertura_plano_saude_perc }}% (estadual {{ planos_saude.benchmarking.estadual }}%, nacional {{ planos_saude.benchmarking.nacional }}%).
Mercado de trabalho: salário médio de admissão R$ {{ mercado_trabalho.salario_medio_admissao }}, desemprego de {{ mercado_trabalho.taxa_desemprego }}%, estoque de {{ mercado_trabalho.estoque_empregos }} empregos, saldo mensal de {{ mercado_trabalho.saldo_empregos_mes }} e {{ mercado_trabalho.empresas_total }} empresas.
{% if estabelecimentos is defined %}Estabelecimentos de saúde no CNES: {{ estabelecimentos.total }}{% for tipo, quantidade in estabelecimentos.por_tipo %}; {{ tipo }}: {{ quantidade }}{% endfor %}.
{% endif %}
Responda com um objeto JSON com as chaves "problemas_desafios", "oportunidades" e "fatos_tendencias", cada uma contendo uma lista de 3 a 5 frases curtas."#;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to render prompt: {0}")]
    Prompt(#[from] tera::Error),
    #[error("LLM client is not configured: {0}")]
    NotConfigured(String),
    #[error("LLM request failed: {0}")]
    Provider(ClientError),
}

/// Builds the narrative prompt for a municipality and asks the LLM for it.
pub struct AnalysisService {
    provider: Arc<dyn CompletionProvider>,
}

impl AnalysisService {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub fn render_prompt(record: &MarketIntelligence) -> Result<String, AnalysisError> {
        let context = Context::from_serialize(record)?;
        Ok(Tera::one_off(ANALYSIS_TEMPLATE, &context, false)?)
    }

    /// Returns the model's JSON answer untouched.
    pub async fn analyze(&self, record: &MarketIntelligence) -> Result<Value, AnalysisError> {
        let prompt = Self::render_prompt(record)?;
        match self.provider.complete_json(SYSTEM_PROMPT, &prompt).await {
            Ok(analysis) => {
                info!(ibge_code = record.municipio_ibge, "Analysis generated");
                Ok(analysis)
            }
            Err(ClientError::InvalidConfiguration(msg)) => {
                error!(error = %msg, "Analysis requested but the LLM client is not configured.");
                Err(AnalysisError::NotConfigured(msg))
            }
            Err(e) => {
                error!(ibge_code = record.municipio_ibge, error = %e, "LLM request failed.");
                Err(AnalysisError::Provider(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{NATIONAL_REFERENCE, ProfileInput, profile, state_reference};
    use crate::domain::models::EstablishmentSummary;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    fn record() -> MarketIntelligence {
        let input = ProfileInput {
            ibge: 3550308,
            nome: "São Paulo",
            uf: "SP",
            regiao: "Sudeste",
            populacao: 12_396_372,
            populacao_uf: 46_649_132,
            populacao_brasil: NATIONAL_REFERENCE.populacao,
        };
        profile(&input, state_reference("SP").unwrap(), &NATIONAL_REFERENCE)
    }

    struct RecordingProvider {
        answer: Result<Value, ()>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionProvider for RecordingProvider {
        async fn complete_json(&self, _system_prompt: &str, user_prompt: &str) -> Result<Value, ClientError> {
            self.prompts.lock().unwrap().push(user_prompt.to_string());
            self.answer
                .clone()
                .map_err(|_| ClientError::InvalidConfiguration("no key".to_string()))
        }
    }

    #[test]
    fn test_prompt_mentions_municipality_figures() {
        let prompt = AnalysisService::render_prompt(&record()).unwrap();
        assert!(prompt.contains("São Paulo (SP)"));
        assert!(prompt.contains("12396372 habitantes"));
        assert!(prompt.contains("problemas_desafios"));
        assert!(!prompt.contains("CNES"));
    }

    #[test]
    fn test_prompt_includes_establishments_when_present() {
        let mut record = record();
        let mut summary = EstablishmentSummary::default();
        summary.total = 42;
        summary.por_tipo.insert("Hospital Geral".to_string(), 42);
        record.estabelecimentos = Some(summary);

        let prompt = AnalysisService::render_prompt(&record).unwrap();
        assert!(prompt.contains("Estabelecimentos de saúde no CNES: 42; Hospital Geral: 42."));
    }

    #[tokio::test]
    async fn test_analysis_is_returned_verbatim() {
        let answer = json!({
            "problemas_desafios": ["a"],
            "oportunidades": ["b"],
            "fatos_tendencias": ["c"],
            "extra": 1
        });
        let provider = Arc::new(RecordingProvider {
            answer: Ok(answer.clone()),
            prompts: Mutex::new(Vec::new()),
        });
        let service = AnalysisService::new(provider.clone());

        let analysis = service.analyze(&record()).await.unwrap();
        assert_eq!(analysis, answer);
        assert_eq!(provider.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_configuration_is_reported() {
        let provider = Arc::new(RecordingProvider {
            answer: Err(()),
            prompts: Mutex::new(Vec::new()),
        });
        let service = AnalysisService::new(provider);

        let result = service.analyze(&record()).await;
        assert!(matches!(result, Err(AnalysisError::NotConfigured(_))));
    }
}
