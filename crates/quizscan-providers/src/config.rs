//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use quizscan_core::traits::VisionProvider;

use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single vision provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    OpenAI {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
}

impl ProviderConfig {
    fn api_key_mut(&mut self) -> &mut String {
        match self {
            ProviderConfig::Gemini { api_key, .. } | ProviderConfig::OpenAI { api_key, .. } => {
                api_key
            }
        }
    }

    fn empty_for(name: &str) -> Option<Self> {
        match name {
            "gemini" => Some(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
                model: None,
            }),
            "openai" => Some(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                model: None,
            }),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (kind, base_url, model) = match self {
            ProviderConfig::Gemini {
                base_url, model, ..
            } => ("Gemini", base_url, model),
            ProviderConfig::OpenAI {
                base_url, model, ..
            } => ("OpenAI", base_url, model),
        };
        f.debug_struct(kind)
            .field("api_key", &"***")
            .field("base_url", base_url)
            .field("model", model)
            .finish()
    }
}

/// Top-level quizscan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizscanConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used for scanning and grading.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Per-request timeout for provider calls.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Where students and quiz records are stored.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default)]
    pub temperature: f64,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_timeout() -> u64 {
    60
}
fn default_data_path() -> PathBuf {
    PathBuf::from("quizscan-data.json")
}

impl Default for QuizscanConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            request_timeout_secs: default_timeout(),
            data_path: default_data_path(),
            temperature: 0.0,
        }
    }
}

impl QuizscanConfig {
    /// Build the named provider, or the default one.
    ///
    /// A known provider with no configuration entry is still built with an
    /// empty key; it reports the missing credential on first use.
    pub fn provider(&self, name: Option<&str>) -> Result<Box<dyn VisionProvider>> {
        let name = name.unwrap_or(self.default_provider.as_str());
        let config = match self.providers.get(name) {
            Some(config) => config.clone(),
            None => ProviderConfig::empty_for(name)
                .with_context(|| format!("unknown provider: {name}"))?,
        };
        Ok(create_provider(&config, self))
    }
}

/// Written by `quizscan init`.
pub const SAMPLE_CONFIG: &str = r#"# quizscan configuration

default_provider = "gemini"
request_timeout_secs = 60
data_path = "quizscan-data.json"
temperature = 0.0

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"
model = "gemini-2.0-flash"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"
model = "gpt-4o-mini"
"#;

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    let resolve_opt = |v: &Option<String>| v.as_deref().map(resolve_env_vars);
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_opt(base_url),
            model: resolve_opt(model),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            model,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_opt(base_url),
            model: resolve_opt(model),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizscan.toml` in the current directory
/// 2. `~/.config/quizscan/config.toml`
///
/// Environment variable overrides: `QUIZSCAN_GEMINI_KEY` (or `GEMINI_API_KEY`)
/// and `QUIZSCAN_OPENAI_KEY` (or `OPENAI_API_KEY`).
pub fn load_config() -> Result<QuizscanConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizscanConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizscan.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizscanConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizscanConfig::default(),
    };
    debug!(path = ?config_path, "loaded configuration");

    // Resolve env vars in all provider configs
    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    // Apply env var overrides
    for (name, vars) in [
        ("gemini", ["QUIZSCAN_GEMINI_KEY", "GEMINI_API_KEY"]),
        ("openai", ["QUIZSCAN_OPENAI_KEY", "OPENAI_API_KEY"]),
    ] {
        let Some(key) = vars
            .iter()
            .filter_map(|v| std::env::var(v).ok())
            .find(|k| !k.trim().is_empty())
        else {
            continue;
        };
        if !config.providers.contains_key(name) {
            if let Some(empty) = ProviderConfig::empty_for(name) {
                config.providers.insert(name.to_string(), empty);
            }
        }
        if let Some(provider) = config.providers.get_mut(name) {
            *provider.api_key_mut() = key;
        }
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizscan"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig, settings: &QuizscanConfig) -> Box<dyn VisionProvider> {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => Box::new(
            GeminiProvider::new(api_key, base_url.clone(), model.clone())
                .with_timeout(settings.request_timeout_secs)
                .with_temperature(settings.temperature),
        ),
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            model,
        } => Box::new(
            OpenAiProvider::new(api_key, base_url.clone(), model.clone())
                .with_timeout(settings.request_timeout_secs)
                .with_temperature(settings.temperature),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZSCAN_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZSCAN_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZSCAN_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_QUIZSCAN_TEST_VAR");
    }

    #[test]
    fn unterminated_reference_is_left_alone() {
        assert_eq!(resolve_env_vars("${NOPE"), "${NOPE");
    }

    #[test]
    fn default_config() {
        let config = QuizscanConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.data_path, PathBuf::from("quizscan-data.json"));
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "openai"
request_timeout_secs = 30

[providers.gemini]
type = "gemini"
api_key = "g-test"

[providers.openai]
type = "openai"
api_key = "sk-openai"
model = "gpt-4o"
"#;
        let config: QuizscanConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(matches!(
            config.providers.get("openai"),
            Some(ProviderConfig::OpenAI { model: Some(m), .. }) if m == "gpt-4o"
        ));
    }

    #[test]
    fn sample_config_parses() {
        let config: QuizscanConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.providers.len(), 2);
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizscan.toml");
        std::fs::write(
            &path,
            "data_path = \"grades.json\"\n[providers.gemini]\ntype = \"gemini\"\napi_key = \"k\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.data_path, PathBuf::from("grades.json"));
        assert!(config.providers.contains_key("gemini"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn debug_masks_api_key() {
        let config = ProviderConfig::Gemini {
            api_key: "super-secret".into(),
            base_url: None,
            model: None,
        };
        let shown = format!("{config:?}");
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("***"));
    }

    #[test]
    fn unconfigured_known_provider_still_builds() {
        let config = QuizscanConfig::default();
        let provider = config.provider(None).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert!(config.provider(Some("nonesuch")).is_err());
    }
}
