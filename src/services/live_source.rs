use async_trait::async_trait;
use tracing::{info, warn};

use super::cache::LookupCache;
use super::market_data::{MarketDataSource, SourceError, sort_cities_by_name};
use crate::clients::cnes::CnesClient;
use crate::clients::ibge::{IbgeClient, Locality, Municipality};
use crate::clients::ClientError;
use crate::config::DataSourceKind;
use crate::domain::fixtures::{self, NATIONAL_REFERENCE, ProfileInput};
use crate::domain::models::{City, EstablishmentSummary, MarketIntelligence, StateSummary};
use crate::domain::states::state_code_of_municipality;

const ALL_CITIES_KEY: &str = "*";

/// Aggregates IBGE and CNES data, memoizing the locality and population lookups.
pub struct LiveSource {
    ibge: IbgeClient,
    cnes: CnesClient,
    states_cache: LookupCache<(), Vec<StateSummary>>,
    cities_cache: LookupCache<String, Vec<City>>,
    municipality_cache: LookupCache<u32, Municipality>,
    population_cache: LookupCache<Locality, u64>,
}

impl LiveSource {
    pub fn new(ibge: IbgeClient, cnes: CnesClient) -> Self {
        Self {
            ibge,
            cnes,
            states_cache: LookupCache::new(),
            cities_cache: LookupCache::new(),
            municipality_cache: LookupCache::new(),
            population_cache: LookupCache::new(),
        }
    }

    async fn population(&self, locality: Locality) -> Result<u64, ClientError> {
        self.population_cache
            .get_or_try_insert_with(locality, || self.ibge.population(locality))
            .await
    }

    async fn establishments(&self, ibge_code: u32) -> EstablishmentSummary {
        match self.cnes.fetch_establishments(ibge_code).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(ibge_code, error = %e, "CNES fetch failed, returning empty establishment summary.");
                EstablishmentSummary::unavailable(format!(
                    "Não foi possível consultar os estabelecimentos no CNES: {e}"
                ))
            }
        }
    }
}

#[async_trait]
impl MarketDataSource for LiveSource {
    fn kind(&self) -> DataSourceKind {
        DataSourceKind::Live
    }

    async fn states(&self) -> Result<Vec<StateSummary>, SourceError> {
        let mut states = self
            .states_cache
            .get_or_try_insert_with((), || self.ibge.states())
            .await?;
        states.sort_by(|a, b| a.sigla.cmp(&b.sigla));
        Ok(states)
    }

    async fn cities(&self, uf: Option<&str>) -> Result<Vec<City>, SourceError> {
        let key = uf.unwrap_or(ALL_CITIES_KEY).to_string();
        let mut cities = self
            .cities_cache
            .get_or_try_insert_with(key, || async {
                match uf {
                    Some(uf) => self.ibge.municipalities_by_state(uf).await,
                    None => self.ibge.municipalities().await,
                }
            })
            .await?;
        sort_cities_by_name(&mut cities);
        Ok(cities)
    }

    async fn market_intelligence(&self, ibge_code: u32) -> Result<MarketIntelligence, SourceError> {
        let municipality = self
            .municipality_cache
            .get_or_try_insert_with(ibge_code, || self.ibge.municipality(ibge_code))
            .await
            .map_err(|e| match e {
                ClientError::NotFound(_) => SourceError::MunicipalityNotFound(ibge_code),
                other => SourceError::Upstream(other),
            })?;

        let state_code = state_code_of_municipality(ibge_code);
        let (municipal, state, country, establishments) = tokio::join!(
            self.population(Locality::Municipality(ibge_code)),
            self.population(Locality::State(state_code)),
            self.population(Locality::Country),
            self.establishments(ibge_code),
        );
        let (municipal, state, country) = (municipal?, state?, country?);

        info!(
            ibge_code,
            uf = %municipality.uf,
            population = municipal,
            establishments = establishments.total,
            "Aggregated live market data"
        );

        let state_reference = fixtures::state_reference(&municipality.uf).unwrap_or(&NATIONAL_REFERENCE);
        let input = ProfileInput {
            ibge: municipality.ibge,
            nome: &municipality.nome,
            uf: &municipality.uf,
            regiao: &municipality.regiao,
            populacao: municipal,
            populacao_uf: state,
            populacao_brasil: country,
        };
        let mut record = fixtures::profile(&input, state_reference, &NATIONAL_REFERENCE).with_source(self.kind());
        record.saude.top_5_estabelecimentos.clear();
        record.estabelecimentos = Some(establishments);
        Ok(record)
    }
}
