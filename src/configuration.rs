use std::path::PathBuf;

use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub crawler: CrawlerSettings,
    pub storage: StorageSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct CrawlerSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_ms: u64,
    pub client_identifier: String,
    #[serde(default)]
    pub proxy_pool: Vec<String>,
}

#[derive(serde::Deserialize, Clone)]
pub struct StorageSettings {
    pub questions_dir: PathBuf,
    pub mongo_uri: Option<String>,
    pub mongo_database: String,
}

impl CrawlerSettings {
    pub fn question_url(&self, qid: &str) -> String {
        format!("{}/question/{}", self.base_url, qid)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    let settings = config::Config::builder()
        .add_source(config::File::from(base_path.join("configuration.yaml")))
        .add_source(
            config::Environment::with_prefix("QUARRY")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
