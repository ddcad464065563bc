//! CNES open-data establishments, fetched page by page per unit type.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

use super::{ClientError, ensure_success, trim_base_url};
use crate::domain::cnpj::normalize_cnpj;
use crate::domain::models::{CnpjEnrichment, Establishment, EstablishmentSummary};
use crate::domain::states::cnes_municipality_code;

const SERVICE: &str = "CNES";
const HIGHLIGHT_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CnesCategory {
    pub code: u32,
    pub label: &'static str,
}

/// Unit types queried for every municipality, in display order.
pub const CATEGORIES: &[CnesCategory] = &[
    CnesCategory { code: 5, label: "Hospital Geral" },
    CnesCategory { code: 7, label: "Hospital Especializado" },
    CnesCategory { code: 62, label: "Hospital Dia" },
    CnesCategory { code: 4, label: "Policlínica" },
    CnesCategory { code: 39, label: "Apoio Diagnose e Terapia (SADT)" },
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEstablishment {
    pub codigo_cnes: u64,
    #[serde(default)]
    pub nome_fantasia: Option<String>,
    #[serde(default)]
    pub nome_razao_social: Option<String>,
    // CNES sends these as strings or bare numbers depending on the record.
    #[serde(default)]
    pub numero_cnpj: Option<Value>,
    #[serde(default)]
    pub numero_cnpj_entidade: Option<Value>,
}

impl RawEstablishment {
    fn display_name(&self) -> String {
        [self.nome_fantasia.as_deref(), self.nome_razao_social.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
            .unwrap_or("Estabelecimento sem nome")
            .to_string()
    }

    /// Own CNPJ first, then the maintaining entity's, paired with the legal name.
    fn cnpj_enrichment(&self) -> Option<CnpjEnrichment> {
        let cnpj = [self.numero_cnpj.as_ref(), self.numero_cnpj_entidade.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|value| match value {
                Value::String(text) => normalize_cnpj(text),
                Value::Number(number) => normalize_cnpj(&number.to_string()),
                _ => None,
            })
            .next()?;
        let razao_social = self
            .nome_razao_social
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.display_name());
        Some(CnpjEnrichment { cnpj, razao_social })
    }
}

#[derive(Deserialize)]
struct EstablishmentPage {
    #[serde(default)]
    estabelecimentos: Vec<RawEstablishment>,
}

/// Merges per-category batches, keeping the first record seen for each CNES code.
pub fn merge_establishments(batches: &[(CnesCategory, Vec<RawEstablishment>)]) -> EstablishmentSummary {
    let mut seen = HashSet::new();
    let mut merged: Vec<(usize, Establishment)> = Vec::new();

    for (order, (category, records)) in batches.iter().enumerate() {
        for record in records {
            if !seen.insert(record.codigo_cnes) {
                continue;
            }
            merged.push((
                order,
                Establishment {
                    codigo_cnes: record.codigo_cnes,
                    nome: record.display_name(),
                    tipo: category.label.to_string(),
                    cnpj_enriquecido: record.cnpj_enrichment(),
                },
            ));
        }
    }

    let mut summary = EstablishmentSummary {
        total: merged.len(),
        ..Default::default()
    };
    for (_, establishment) in &merged {
        *summary.por_tipo.entry(establishment.tipo.clone()).or_insert(0) += 1;
    }

    merged.sort_by(|(a_order, a), (b_order, b)| a_order.cmp(b_order).then_with(|| a.nome.cmp(&b.nome)));
    summary.destaques = merged
        .into_iter()
        .take(HIGHLIGHT_COUNT)
        .map(|(_, establishment)| establishment)
        .collect();
    summary
}

pub struct CnesClient {
    client: Client,
    base_url: String,
    page_size: u32,
    max_pages: u32,
}

impl CnesClient {
    pub fn new(client: Client, base_url: &str, page_size: u32, max_pages: u32) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
            page_size,
            max_pages,
        }
    }

    async fn fetch_page(
        &self,
        municipality: u32,
        category: &CnesCategory,
        page: u32,
    ) -> Result<Vec<RawEstablishment>, ClientError> {
        let url = format!("{}/cnes/estabelecimentos", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("codigo_municipio", municipality.to_string()),
                ("codigo_tipo_unidade", category.code.to_string()),
                ("status", "1".to_string()),
                ("limit", self.page_size.to_string()),
                ("offset", (page * self.page_size).to_string()),
            ])
            .send()
            .await?;
        let body: EstablishmentPage = ensure_success(SERVICE, response).await?.json().await?;
        Ok(body.estabelecimentos)
    }

    /// Reads pages until a short page arrives, capped at `max_pages`.
    pub async fn fetch_category(
        &self,
        ibge_code: u32,
        category: &CnesCategory,
    ) -> Result<Vec<RawEstablishment>, ClientError> {
        let municipality = cnes_municipality_code(ibge_code);
        let mut records = Vec::new();
        for page in 0..self.max_pages {
            let batch = self.fetch_page(municipality, category, page).await?;
            let received = batch.len();
            records.extend(batch);
            debug!(municipality, category = category.code, page, received, "Fetched CNES page");
            if received < self.page_size as usize {
                break;
            }
        }
        Ok(records)
    }

    pub async fn fetch_establishments(&self, ibge_code: u32) -> Result<EstablishmentSummary, ClientError> {
        let mut batches = Vec::with_capacity(CATEGORIES.len());
        for category in CATEGORIES {
            let records = self.fetch_category(ibge_code, category).await?;
            batches.push((*category, records));
        }
        let summary = merge_establishments(&batches);
        info!(ibge_code, total = summary.total, "Merged CNES establishments");
        Ok(summary)
    }
}
