use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::DataSourceKind;

// --- Locality ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateSummary {
    pub sigla: String,
    pub nome: String,
    pub regiao: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct City {
    pub ibge: u32,
    pub nome: String,
    pub uf: String,
}

// --- Market intelligence payload ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BenchmarkStatus {
    Acima,
    Abaixo,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    Homens,
    Mulheres,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LegalNature {
    #[serde(rename = "Público")]
    Public,
    #[serde(rename = "Privado")]
    Private,
    #[serde(rename = "Filantrópico")]
    Philanthropic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgeBucket {
    pub sexo: Sex,
    pub idade_grupo: String,
    pub populacao: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemographicIndices {
    pub criancas_pea: f64,
    pub idosos_pea: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    pub municipal: u64,
    pub uf: u64,
    pub brasil: u64,
    pub perc_pop_uf: f64,
    pub perc_pop_brasil: f64,
    pub piramide_etaria: Vec<AgeBucket>,
    pub indices_demograficos: DemographicIndices,
}

/// Municipal value against the state and national references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benchmark {
    pub municipal: f64,
    pub estadual: f64,
    pub nacional: f64,
    pub status_estadual: BenchmarkStatus,
    pub status_nacional: BenchmarkStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEstablishment {
    pub nome: String,
    pub leitos: u64,
    pub natureza: LegalNature,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub leitos_total: u64,
    pub razao_leitos_por_mil: f64,
    pub leitos_publicos_perc: f64,
    pub leitos_privados_perc: f64,
    pub benchmarking: Benchmark,
    /// Illustrative ranking from the reference tables. Empty for live records,
    /// where CNES does not report beds per establishment.
    pub top_5_estabelecimentos: Vec<RankedEstablishment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPlans {
    pub beneficiarios: u64,
    pub cobertura_plano_saude_perc: f64,
    pub benchmarking: Benchmark,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaborBenchmark {
    pub salario_municipal: f64,
    pub salario_estadual: f64,
    pub salario_nacional: f64,
    pub desemprego_municipal: f64,
    pub desemprego_estadual: f64,
    pub desemprego_nacional: f64,
    pub status_salario_estadual: BenchmarkStatus,
    pub status_salario_nacional: BenchmarkStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaborMarket {
    pub salario_medio_admissao: f64,
    pub estoque_empregos: u64,
    pub saldo_empregos_mes: i64,
    pub taxa_desemprego: f64,
    pub empresas_total: u64,
    pub benchmarking: LaborBenchmark,
}

/// Registry identity attached to an establishment that reports a CNPJ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CnpjEnrichment {
    /// 14 digits, no punctuation.
    pub cnpj: String,
    pub razao_social: String,
}

/// A CNES establishment as kept in the dashboard highlights.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Establishment {
    pub codigo_cnes: u64,
    pub nome: String,
    pub tipo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnpj_enriquecido: Option<CnpjEnrichment>,
}

/// Merged CNES establishments for one municipality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstablishmentSummary {
    pub total: usize,
    pub por_tipo: BTreeMap<String, usize>,
    pub destaques: Vec<Establishment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aviso: Option<String>,
}

impl EstablishmentSummary {
    /// Zeroed summary used when the CNES fetch fails.
    pub fn unavailable(warning: impl Into<String>) -> Self {
        Self {
            aviso: Some(warning.into()),
            ..Default::default()
        }
    }
}

/// Dashboard record for one municipality.
///
/// In live mode identity, `populacao` and `estabelecimentos` come from IBGE
/// and CNES; beds, health-plan and labor figures are still modeled around the
/// state reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketIntelligence {
    pub municipio_ibge: u32,
    pub nome_municipio: String,
    pub uf_sigla: String,
    pub regiao: String,
    pub fonte_dados: String,
    pub gerado_em: DateTime<Utc>,
    pub populacao: Population,
    pub saude: Health,
    pub planos_saude: HealthPlans,
    pub mercado_trabalho: LaborMarket,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estabelecimentos: Option<EstablishmentSummary>,
}

impl MarketIntelligence {
    pub fn with_source(mut self, source: DataSourceKind) -> Self {
        self.fonte_dados = source.as_str().to_string();
        self
    }
}
