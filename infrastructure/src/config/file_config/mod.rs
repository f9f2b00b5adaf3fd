//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! ([`EngineParams`]) after validation.

mod backend;
mod engine;
mod logging;
mod output;
mod selection;
mod termination;

pub use backend::{BackendProvider, FileBackendConfig};
pub use engine::FileEngineConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use selection::{FileSelectionConfig, SelectionStrategyKind};
pub use termination::FileTerminationConfig;

use crew_application::EngineParams;
use crew_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("configuration has {} error(s); first: {}", .0.len(), .0[0].message)]
    Invalid(Vec<ConfigIssue>),
}

impl ConfigValidationError {
    pub fn issues(&self) -> &[ConfigIssue] {
        match self {
            ConfigValidationError::Invalid(issues) => issues,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Turn loop settings
    pub engine: FileEngineConfig,
    /// Stop conditions
    pub termination: FileTerminationConfig,
    /// Decision backend settings
    pub backend: FileBackendConfig,
    /// Fallback speaker selection
    pub selection: FileSelectionConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Transcript and diagnostics files
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// `offline` skips the checks that only apply to the networked backend.
    pub fn validate(&self, offline: bool) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Numeric bounds and keyword sanity
        issues.extend(self.engine.validate());
        issues.extend(self.termination.validate());
        issues.extend(self.selection.validate());

        // 2. Enum parse validation
        issues.extend(self.engine.parse_count_scope().1);
        issues.extend(self.selection.parse_strategy().1);
        let (provider, provider_issues) = self.backend.parse_provider();
        issues.extend(provider_issues);

        // 3. Backend credentials
        let provider = if offline {
            BackendProvider::Scripted
        } else {
            provider
        };
        issues.extend(self.backend.validate_for(provider));

        issues
    }

    /// Like [`validate`](Self::validate), but fails when any issue is an error.
    ///
    /// Returns the remaining warnings on success.
    pub fn check(&self, offline: bool) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate(offline).into_iter().partition(|i| i.is_error());
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError::Invalid(errors))
        }
    }

    /// Render the merged configuration as TOML (for `--show-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Application-layer view of the `[engine]` and `[termination]` sections.
    pub fn to_engine_params(&self) -> EngineParams {
        EngineParams::default()
            .with_max_messages(self.engine.max_messages)
            .with_count_scope(self.engine.parse_count_scope().0)
            .with_allow_repeated_speaker(self.engine.allow_repeated_speaker)
            .with_history_window(self.engine.history_window)
            .with_backend_timeout(self.engine.timeout_seconds.map(Duration::from_secs))
            .with_success_keywords(self.termination.keywords.clone())
            .with_escalate_keywords(self.termination.escalate_keywords.clone())
            .with_use_status(self.termination.use_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_domain::{ConfigIssueCode, CountScope, OutputFormat};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[engine]
max_messages = 12
count_scope = "task"
history_window = 8
timeout_seconds = 30

[termination]
keywords = ["DONE"]
use_status = false

[backend]
provider = "scripted"
model = "gpt-4o-mini"

[selection]
strategy = "delegation"

[output]
format = "json"
color = false

[logging]
transcript = "run.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.max_messages, 12);
        assert_eq!(config.backend.parse_provider().0, BackendProvider::Scripted);
        assert_eq!(
            config.selection.parse_strategy().0,
            SelectionStrategyKind::Delegation
        );
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert_eq!(
            config.logging.transcript.as_deref(),
            Some(std::path::Path::new("run.jsonl"))
        );
        // Unset fields keep their defaults
        assert_eq!(config.termination.escalate_keywords, vec!["ESCALATE"]);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[engine]
max_messages = 3
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.max_messages, 3);
        assert!(config.engine.allow_repeated_speaker);
        assert_eq!(config.backend.model, "gpt-4o");
        assert!(config.output.color);
    }

    #[test]
    fn test_to_engine_params() {
        let mut config = FileConfig::default();
        config.engine.count_scope = "task".to_string();
        config.engine.timeout_seconds = Some(45);
        config.termination.keywords = vec!["DONE".to_string()];

        let params = config.to_engine_params();
        assert_eq!(params.max_messages, 6);
        assert_eq!(params.count_scope, CountScope::Task);
        assert_eq!(params.backend_timeout, Some(Duration::from_secs(45)));
        assert_eq!(params.success_keywords, vec!["DONE"]);
        assert_eq!(params.escalate_keywords, vec!["ESCALATE"]);
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = FileConfig::default();
        config.engine.history_window = Some(10);
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[engine]"));
        let parsed: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_offline_default_config() {
        let config = FileConfig::default();
        assert!(config.validate(true).is_empty());
    }

    #[test]
    fn test_check_rejects_errors() {
        let mut config = FileConfig::default();
        config.engine.max_messages = 0;
        config.selection.strategy = "dice".to_string();

        let err = config.check(true).unwrap_err();
        let ConfigValidationError::Invalid(errors) = err;
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].code, ConfigIssueCode::ZeroValue { .. }));
    }

    #[test]
    fn test_check_returns_warnings() {
        let mut config = FileConfig::default();
        config.selection.strategy = "dice".to_string();
        let warnings = config.check(true).unwrap();
        assert_eq!(warnings.len(), 1);
    }
}
