use async_trait::async_trait;
use thiserror::Error;

use crate::clients::ClientError;
use crate::config::DataSourceKind;
use crate::domain::models::{City, MarketIntelligence, StateSummary};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Dados não encontrados para o código IBGE: {0}")]
    MunicipalityNotFound(u32),
    #[error("Upstream error: {0}")]
    Upstream(#[from] ClientError),
}

/// Backend for the locality lists and the dashboard payload.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    fn kind(&self) -> DataSourceKind;

    async fn states(&self) -> Result<Vec<StateSummary>, SourceError>;

    /// Cities of `uf` (an uppercase sigla), or every known city when `None`.
    async fn cities(&self, uf: Option<&str>) -> Result<Vec<City>, SourceError>;

    async fn market_intelligence(&self, ibge_code: u32) -> Result<MarketIntelligence, SourceError>;
}

/// Folds Portuguese diacritics so "Águas" sorts next to "Aguaí" rather than after "Z".
pub fn collation_key(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
            'ç' | 'Ç' => 'c',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

pub fn sort_cities_by_name(cities: &mut [City]) {
    cities.sort_by_cached_key(|city| (collation_key(&city.nome), city.ibge));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(ibge: u32, nome: &str) -> City {
        City {
            ibge,
            nome: nome.to_string(),
            uf: "SP".to_string(),
        }
    }

    #[test]
    fn test_collation_key_folds_accents() {
        assert_eq!(collation_key("São José"), "sao jose");
        assert_eq!(collation_key("ÁGUAS DE LINDÓIA"), "aguas de lindoia");
    }

    #[test]
    fn test_sort_is_accent_insensitive() {
        let mut cities = vec![
            city(3, "Zacarias"),
            city(1, "Águas de São Pedro"),
            city(2, "Bauru"),
            city(4, "Sorocaba"),
            city(5, "São Paulo"),
        ];
        sort_cities_by_name(&mut cities);
        let names: Vec<&str> = cities.iter().map(|c| c.nome.as_str()).collect();
        assert_eq!(names, vec!["Águas de São Pedro", "Bauru", "São Paulo", "Sorocaba", "Zacarias"]);
    }
}
