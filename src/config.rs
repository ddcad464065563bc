use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Where market-intelligence records come from.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// In-memory reference tables, no outbound calls.
    #[default]
    Mock,
    /// IBGE locality/population API plus the CNES open-data API.
    Live,
}

impl DataSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::Mock => "mock",
            DataSourceKind::Live => "live",
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default)]
    pub data_source: DataSourceKind,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_ibge_base_url")]
    pub ibge_base_url: String,

    #[serde(default = "default_cnes_base_url")]
    pub cnes_base_url: String,

    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,

    #[serde(default)]
    pub llm_api_key: Option<String>,

    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    #[serde(default = "default_cnes_page_size")]
    pub cnes_page_size: u32,

    #[serde(default = "default_cnes_max_pages")]
    pub cnes_max_pages: u32,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialAppConfig {
    listen_addr: Option<String>,
    data_source: Option<DataSourceKind>,
    log_dir: Option<String>,
    ibge_base_url: Option<String>,
    cnes_base_url: Option<String>,
    llm_base_url: Option<String>,
    llm_api_key: Option<String>,
    openai_api_key: Option<String>,
    llm_model: Option<String>,
    cnes_page_size: Option<u32>,
    cnes_max_pages: Option<u32>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_ibge_base_url() -> String {
    "https://servicodados.ibge.gov.br/api".to_string()
}

fn default_cnes_base_url() -> String {
    "https://apidadosabertos.saude.gov.br".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_cnes_page_size() -> u32 {
    20
}

fn default_cnes_max_pages() -> u32 {
    10
}

// An empty `LLM_API_KEY=` line must not shadow a key from another layer.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::merge(PartialAppConfig::default(), PartialAppConfig::default())
    }
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config: PartialAppConfig = if let Some(path_str) = config_path {
            let path = Path::new(path_str);
            if path.exists() {
                let contents = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
                toml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))?
            } else {
                return Err(format!("Config file not found at {path:?}"));
            }
        } else {
            PartialAppConfig::default()
        };

        // 2. Load from environment variables
        let env_config: PartialAppConfig = envy::from_env::<PartialAppConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        // 3. Merge: environment overrides file
        let config = Self::merge(env_config, file_config);
        config.validate()?;
        Ok(config)
    }

    fn merge(env_config: PartialAppConfig, file_config: PartialAppConfig) -> Self {
        AppConfig {
            listen_addr: env_config.listen_addr.or(file_config.listen_addr)
                .unwrap_or_else(default_listen_addr),
            data_source: env_config.data_source.or(file_config.data_source)
                .unwrap_or_default(),
            log_dir: env_config.log_dir.or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
            ibge_base_url: env_config.ibge_base_url.or(file_config.ibge_base_url)
                .unwrap_or_else(default_ibge_base_url),
            cnes_base_url: env_config.cnes_base_url.or(file_config.cnes_base_url)
                .unwrap_or_else(default_cnes_base_url),
            llm_base_url: env_config.llm_base_url.or(file_config.llm_base_url)
                .unwrap_or_else(default_llm_base_url),
            llm_api_key: non_blank(env_config.llm_api_key)
                .or_else(|| non_blank(env_config.openai_api_key))
                .or_else(|| non_blank(file_config.llm_api_key)),
            llm_model: env_config.llm_model.or(file_config.llm_model)
                .unwrap_or_else(default_llm_model),
            cnes_page_size: env_config.cnes_page_size.or(file_config.cnes_page_size)
                .unwrap_or_else(default_cnes_page_size),
            cnes_max_pages: env_config.cnes_max_pages.or(file_config.cnes_max_pages)
                .unwrap_or_else(default_cnes_max_pages),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.cnes_page_size == 0 {
            return Err("CNES_PAGE_SIZE must be greater than zero".to_string());
        }
        if self.cnes_max_pages == 0 {
            return Err("CNES_MAX_PAGES must be greater than zero".to_string());
        }
        Ok(())
    }
}
