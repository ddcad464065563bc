//! IBGE locality and population aggregates.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use super::{ClientError, ensure_success, trim_base_url};
use crate::domain::models::{City, StateSummary};

const SERVICE: &str = "IBGE";

// Aggregate 6579 = estimated resident population, variable 9324 = people.
const POPULATION_AGGREGATE: &str = "v3/agregados/6579/periodos/-1/variaveis/9324";

/// Geographic level accepted by the aggregates API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locality {
    Municipality(u32),
    State(u8),
    Country,
}

impl Locality {
    pub fn query_value(&self) -> String {
        match self {
            Locality::Municipality(code) => format!("N6[{code}]"),
            Locality::State(code) => format!("N3[{code}]"),
            Locality::Country => "N1[all]".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Municipality {
    pub ibge: u32,
    pub nome: String,
    pub uf: String,
    pub regiao: String,
}

impl From<Municipality> for City {
    fn from(m: Municipality) -> Self {
        City {
            ibge: m.ibge,
            nome: m.nome,
            uf: m.uf,
        }
    }
}

#[derive(Deserialize)]
struct IbgeRegion {
    nome: String,
}

#[derive(Deserialize)]
struct IbgeState {
    sigla: String,
    nome: String,
    regiao: IbgeRegion,
}

#[derive(Deserialize)]
struct AggregateVariable {
    #[serde(default)]
    resultados: Vec<AggregateResult>,
}

#[derive(Deserialize)]
struct AggregateResult {
    #[serde(default)]
    series: Vec<AggregateSeries>,
}

#[derive(Deserialize)]
struct AggregateSeries {
    serie: BTreeMap<String, String>,
}

/// Reads a municipality out of the locality API's nested JSON.
///
/// Recent municipalities have `microrregiao: null`, so the state is looked up
/// through the immediate-region hierarchy as a fallback.
pub fn parse_municipality(value: &Value) -> Option<Municipality> {
    let ibge = value.get("id")?.as_u64()? as u32;
    let nome = value.get("nome")?.as_str()?.to_string();
    let uf = value
        .pointer("/microrregiao/mesorregiao/UF")
        .filter(|v| !v.is_null())
        .or_else(|| value.pointer("/regiao-imediata/regiao-intermediaria/UF"))?;
    Some(Municipality {
        ibge,
        nome,
        uf: uf.get("sigla")?.as_str()?.to_string(),
        regiao: uf
            .pointer("/regiao/nome")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Most recent value of the first series; IBGE uses "-" or "..." for missing data.
fn latest_population(variables: &[AggregateVariable]) -> Option<u64> {
    let series = variables.first()?.resultados.first()?.series.first()?;
    series.serie.values().rev().find_map(|v| v.trim().parse().ok())
}

pub struct IbgeClient {
    client: Client,
    base_url: String,
}

impl IbgeClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Requesting IBGE");
        let response = self.client.get(&url).query(query).send().await?;
        let response = ensure_success(SERVICE, response).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn states(&self) -> Result<Vec<StateSummary>, ClientError> {
        let states: Vec<IbgeState> = self
            .get_json("v1/localidades/estados", &[("orderBy", "nome".to_string())])
            .await?;
        Ok(states
            .into_iter()
            .map(|s| StateSummary {
                sigla: s.sigla,
                nome: s.nome,
                regiao: s.regiao.nome,
            })
            .collect())
    }

    pub async fn municipalities_by_state(&self, uf: &str) -> Result<Vec<City>, ClientError> {
        let path = format!("v1/localidades/estados/{uf}/municipios");
        let raw: Vec<Value> = self.get_json(&path, &[("orderBy", "nome".to_string())]).await?;
        Ok(raw
            .iter()
            .filter_map(|v| {
                let ibge = v.get("id")?.as_u64()? as u32;
                let nome = v.get("nome")?.as_str()?.to_string();
                Some(City {
                    ibge,
                    nome,
                    uf: uf.to_string(),
                })
            })
            .collect())
    }

    pub async fn municipalities(&self) -> Result<Vec<City>, ClientError> {
        let raw: Vec<Value> = self
            .get_json("v1/localidades/municipios", &[("orderBy", "nome".to_string())])
            .await?;
        Ok(raw
            .iter()
            .filter_map(parse_municipality)
            .map(City::from)
            .collect())
    }

    pub async fn municipality(&self, ibge_code: u32) -> Result<Municipality, ClientError> {
        let url = format!("{}/v1/localidades/municipios/{ibge_code}", self.base_url);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("municipality {ibge_code}")));
        }
        let value: Value = ensure_success(SERVICE, response).await?.json().await?;

        // Unknown codes come back as an empty array rather than a 404.
        let value = match value {
            Value::Array(items) => match items.into_iter().next() {
                Some(first) => first,
                None => return Err(ClientError::NotFound(format!("municipality {ibge_code}"))),
            },
            other => other,
        };

        parse_municipality(&value).ok_or_else(|| ClientError::UnexpectedResponse {
            service: SERVICE,
            reason: format!("could not read municipality {ibge_code}"),
        })
    }

    pub async fn population(&self, locality: Locality) -> Result<u64, ClientError> {
        let variables: Vec<AggregateVariable> = self
            .get_json(POPULATION_AGGREGATE, &[("localidades", locality.query_value())])
            .await?;
        latest_population(&variables).ok_or_else(|| ClientError::UnexpectedResponse {
            service: SERVICE,
            reason: format!("no population value for {}", locality.query_value()),
        })
    }
}
