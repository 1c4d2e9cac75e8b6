use std::collections::BTreeMap;

use config::{Config, File};
use serde::Deserialize;

use crate::data::query::Params;
use crate::data::ResponseFormat;

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub client: ClientSettings,
    pub request: Option<RequestSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_analytics_url")]
    pub analytics_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            analytics_url: default_analytics_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// The single request the binary runs.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestSettings {
    pub function: String,
    #[serde(default = "default_format")]
    pub format: ResponseFormat,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub decode_csv: bool,
}

impl RequestSettings {
    pub fn params(&self) -> Params {
        self.params.iter().collect()
    }
}

fn default_base_url() -> String {
    "https://www.alphavantage.co/query".to_string()
}

fn default_analytics_url() -> String {
    "https://alphavantageapi.co/timeseries".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_format() -> ResponseFormat {
    ResponseFormat::Json
}

fn default_output_dir() -> String {
    "data/raw".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::from_file("config")
    }

    pub fn from_file(name: &str) -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let s = Config::builder()
            .add_source(File::with_name(name).required(false))
            // APP__CLIENT__API_KEY, APP__REQUEST__FUNCTION, ...
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::from_file("does-not-exist-alphaquery").unwrap();
        assert_eq!(settings.client.base_url, "https://www.alphavantage.co/query");
        assert_eq!(settings.client.timeout_secs, 30);
    }

    #[test]
    fn test_reads_request_section() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[client]
timeout_secs = 5

[request]
function = "RSI"
format = "csv"

[request.params]
symbol = "IBM"
time_period = "20"
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.client.timeout_secs, 5);

        let request = settings.request.unwrap();
        assert_eq!(request.function, "RSI");
        assert_eq!(request.format, ResponseFormat::Csv);
        assert_eq!(request.output_dir, "data/raw");
        assert!(!request.decode_csv);
        let params = request.params();
        assert_eq!(params.get("symbol"), Some("IBM"));
        assert_eq!(params.get("time_period"), Some("20"));
    }
}
