use async_trait::async_trait;
use tracing::debug;

use super::market_data::{MarketDataSource, SourceError, sort_cities_by_name};
use crate::config::DataSourceKind;
use crate::domain::fixtures::{self, NATIONAL_REFERENCE, ProfileInput};
use crate::domain::models::{City, MarketIntelligence, StateSummary};
use crate::domain::states::{self, STATES};

/// Serves everything from the compiled-in reference tables.
#[derive(Default)]
pub struct FixtureSource;

impl FixtureSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MarketDataSource for FixtureSource {
    fn kind(&self) -> DataSourceKind {
        DataSourceKind::Mock
    }

    async fn states(&self) -> Result<Vec<StateSummary>, SourceError> {
        let mut covered: Vec<StateSummary> = STATES
            .iter()
            .filter(|s| fixtures::FIXTURE_CITIES.iter().any(|c| c.uf == s.uf))
            .map(|s| StateSummary {
                sigla: s.uf.to_string(),
                nome: s.name.to_string(),
                regiao: s.region.to_string(),
            })
            .collect();
        covered.sort_by(|a, b| a.sigla.cmp(&b.sigla));
        Ok(covered)
    }

    async fn cities(&self, uf: Option<&str>) -> Result<Vec<City>, SourceError> {
        let mut cities: Vec<City> = fixtures::FIXTURE_CITIES
            .iter()
            .filter(|c| uf.map_or(true, |uf| c.uf == uf))
            .map(|c| City {
                ibge: c.ibge,
                nome: c.nome.to_string(),
                uf: c.uf.to_string(),
            })
            .collect();
        sort_cities_by_name(&mut cities);
        Ok(cities)
    }

    async fn market_intelligence(&self, ibge_code: u32) -> Result<MarketIntelligence, SourceError> {
        let city = fixtures::find_city(ibge_code).ok_or(SourceError::MunicipalityNotFound(ibge_code))?;
        let state_reference = fixtures::state_reference(city.uf).unwrap_or(&NATIONAL_REFERENCE);
        let region = states::find_by_uf(city.uf).map(|s| s.region).unwrap_or_default();

        debug!(ibge_code, uf = city.uf, "Building fixture profile");
        let input = ProfileInput {
            ibge: city.ibge,
            nome: city.nome,
            uf: city.uf,
            regiao: region,
            populacao: city.populacao,
            populacao_uf: state_reference.populacao,
            populacao_brasil: NATIONAL_REFERENCE.populacao,
        };
        Ok(fixtures::profile(&input, state_reference, &NATIONAL_REFERENCE).with_source(self.kind()))
    }
}
