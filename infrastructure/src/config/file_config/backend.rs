//! Backend configuration from TOML (`[backend]` section)

use crew_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Which decision backend drives participants and the model selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendProvider {
    /// OpenAI-compatible chat completions endpoint
    #[default]
    OpenAi,
    /// Offline, deterministic script (no network)
    Scripted,
}

impl BackendProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendProvider::OpenAi => "openai",
            BackendProvider::Scripted => "scripted",
        }
    }
}

impl std::fmt::Display for BackendProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw backend configuration from TOML
///
/// # Example
///
/// ```toml
/// [backend]
/// provider = "openai"             # "openai" or "scripted"
/// model = "gpt-4o"
/// base_url = "https://api.openai.com/v1"
/// api_key_env = "OPENAI_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    pub provider: String,
    pub model: String,
    /// Base URL of the API (can point at any OpenAI-compatible server)
    pub base_url: String,
    /// Environment variable name for the API key
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead)
    pub api_key: Option<String>,
    /// Sampling temperature; omit to use the server default
    pub temperature: Option<f32>,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            temperature: None,
        }
    }
}

impl FileBackendConfig {
    /// Parse provider string into BackendProvider, returning warnings on failure.
    pub fn parse_provider(&self) -> (BackendProvider, Vec<ConfigIssue>) {
        match self.provider.to_lowercase().as_str() {
            "openai" => (BackendProvider::OpenAi, vec![]),
            "scripted" | "offline" => (BackendProvider::Scripted, vec![]),
            _ => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "backend.provider".to_string(),
                        value: self.provider.clone(),
                        valid_values: vec!["openai".to_string(), "scripted".to_string()],
                    },
                    format!(
                        "backend.provider: unknown value '{}', falling back to 'openai'",
                        self.provider
                    ),
                );
                (BackendProvider::OpenAi, vec![issue])
            }
        }
    }

    /// Resolve the API key: the explicit value wins, then the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Issues that only matter when the networked backend is in use.
    pub fn validate_for(&self, provider: BackendProvider) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if provider == BackendProvider::OpenAi && self.resolve_api_key().is_none() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingApiKey {
                    env: self.api_key_env.clone(),
                },
                format!(
                    "backend: no API key found in ${} (use --offline for the scripted backend)",
                    self.api_key_env
                ),
            ));
        }
        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "backend.model".to_string(),
                },
                "backend.model cannot be empty",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        let mut config = FileBackendConfig::default();
        assert_eq!(config.parse_provider().0, BackendProvider::OpenAi);

        config.provider = "Scripted".to_string();
        assert_eq!(config.parse_provider(), (BackendProvider::Scripted, vec![]));

        config.provider = "carrier-pigeon".to_string();
        let (provider, issues) = config.parse_provider();
        assert_eq!(provider, BackendProvider::OpenAi);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = FileBackendConfig {
            api_key: Some("sk-test".to_string()),
            api_key_env: "CREW_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-test"));
        assert!(config.validate_for(BackendProvider::OpenAi).is_empty());
    }

    #[test]
    fn test_missing_key_ignored_for_scripted() {
        let config = FileBackendConfig {
            api_key_env: "CREW_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..Default::default()
        };
        assert!(config.validate_for(BackendProvider::Scripted).is_empty());
        let issues = config.validate_for(BackendProvider::OpenAi);
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::MissingApiKey { .. }
        ));
    }
}
