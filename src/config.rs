//! Process configuration and the operator-supplied settings document.
//!
//! Two layers, loaded once at startup and read-only afterwards:
//! - [`AppConfig`]: where to listen and where the settings file lives,
//!   merged from environment variables and CLI arguments.
//! - [`FileSettings`]: the JSON settings document holding the zone map, the
//!   purge timeout, and the CDN provider credentials. Exposed to the purge
//!   core through the [`Settings`] trait (`has`/`get` by key) so the
//!   validator's lookup order stays observable in tests.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use serde_json::Value;
use std::{env, fs, path::Path};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub settings_path: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "CDN cache purge webhook for object-storage change notifications")]
pub struct Args {
    /// Host to bind to (overrides CDN_PURGE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides CDN_PURGE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Path to the JSON settings file (overrides CDN_PURGE_SETTINGS)
    #[arg(long)]
    pub settings: Option<String>,

    /// Validate the settings file and exit
    #[arg(long)]
    pub check_config: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the
    /// check-config flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("CDN_PURGE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("CDN_PURGE_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing CDN_PURGE_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading CDN_PURGE_PORT"),
        };
        let env_settings =
            env::var("CDN_PURGE_SETTINGS").unwrap_or_else(|_| "./config/settings.json".into());

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            settings_path: args.settings.unwrap_or(env_settings),
        };

        Ok((cfg, args.check_config))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read-only key/value view over the settings document.
///
/// The purge validator checks key presence in a declared order before reading
/// values; keeping that behind a trait lets tests observe the order with a
/// recording double.
pub trait Settings: Send + Sync {
    /// Whether `key` exists at the top level of the document.
    fn has(&self, key: &str) -> bool;

    /// Value at `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;
}

/// Settings backed by a JSON document loaded from disk.
#[derive(Debug, Clone)]
pub struct FileSettings {
    values: serde_json::Map<String, Value>,
}

impl FileSettings {
    /// Load the settings document from `path`.
    ///
    /// Only requires the document to be a JSON object; which keys must exist
    /// is decided by the consumers (the validator for `zone_map` and
    /// `purge_timeout`, [`ProviderConfig::from_settings`] for `provider`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let document: Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing settings file {}", path.display()))?;

        match document {
            Value::Object(values) => Ok(Self { values }),
            other => anyhow::bail!(
                "settings file {} must be a JSON object, got {}",
                path.display(),
                json_type_name(&other)
            ),
        }
    }

    /// Build settings directly from a JSON object. Test and wiring helper.
    pub fn from_object(values: serde_json::Map<String, Value>) -> Self {
        Self { values }
    }
}

impl Settings for FileSettings {
    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

/// CDN provider credentials and endpoint, consumed only by the CDN client
/// adapter. Lives under the `provider` key of the settings document.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Account alias the provider scopes zones under.
    pub company_alias: String,

    /// API key.
    pub key: String,

    /// API secret.
    pub secret: String,
}

fn default_api_url() -> String {
    "https://rws.maxcdn.com".to_string()
}

impl ProviderConfig {
    /// Extract the `provider` section from the settings document.
    pub fn from_settings(settings: &dyn Settings) -> Result<Self> {
        let value = settings
            .get("provider")
            .context("settings file is missing the `provider` section")?;
        serde_json::from_value(value).context("parsing the `provider` section")
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(json: &Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();
        file
    }

    #[test]
    fn loads_document_and_answers_has_get() {
        let file = write_settings(&serde_json::json!({
            "zone_map": [{ "bucket": "assets", "zone_id": 42 }],
            "purge_timeout": 120
        }));

        let settings = FileSettings::load(file.path()).unwrap();
        assert!(settings.has("zone_map"));
        assert!(settings.has("purge_timeout"));
        assert!(!settings.has("provider"));
        assert_eq!(
            settings.get("purge_timeout"),
            Some(serde_json::json!(120))
        );
        assert_eq!(settings.get("missing"), None);
    }

    #[test]
    fn rejects_non_object_document() {
        let file = write_settings(&serde_json::json!([1, 2, 3]));
        let err = FileSettings::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
    }

    #[test]
    fn parses_provider_section_with_default_api_url() {
        let file = write_settings(&serde_json::json!({
            "provider": {
                "company_alias": "acme",
                "key": "k",
                "secret": "s"
            }
        }));

        let settings = FileSettings::load(file.path()).unwrap();
        let provider = ProviderConfig::from_settings(&settings).unwrap();
        assert_eq!(provider.company_alias, "acme");
        assert_eq!(provider.api_url, "https://rws.maxcdn.com");
    }

    #[test]
    fn provider_section_is_required_for_serving() {
        let file = write_settings(&serde_json::json!({ "zone_map": [] }));
        let settings = FileSettings::load(file.path()).unwrap();
        let err = ProviderConfig::from_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("provider"));
    }
}
