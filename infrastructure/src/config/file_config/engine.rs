//! Engine configuration from TOML (`[engine]` section)

use crew_domain::{ConfigIssue, ConfigIssueCode, CountScope};
use serde::{Deserialize, Serialize};

/// Raw engine configuration from TOML
///
/// # Example
///
/// ```toml
/// [engine]
/// max_messages = 6                 # safety bound on the message count
/// count_scope = "run"              # "run" or "task"
/// allow_repeated_speaker = true
/// history_window = 20              # omit to show the whole history
/// timeout_seconds = 120            # omit for no backend timeout
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    /// Message-count safety bound
    pub max_messages: usize,
    /// Which messages count toward the bound: "run" or "task"
    pub count_scope: String,
    /// Whether the fallback strategy may pick the previous speaker again
    pub allow_repeated_speaker: bool,
    /// Most recent messages shown to participants and the selector
    pub history_window: Option<usize>,
    /// Timeout for every backend call, in seconds
    pub timeout_seconds: Option<u64>,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        Self {
            max_messages: 6,
            count_scope: "run".to_string(),
            allow_repeated_speaker: true,
            history_window: None,
            timeout_seconds: None,
        }
    }
}

impl FileEngineConfig {
    /// Parse count_scope string into CountScope, returning warnings on failure.
    pub fn parse_count_scope(&self) -> (CountScope, Vec<ConfigIssue>) {
        match self.count_scope.to_lowercase().as_str() {
            "run" => (CountScope::Run, vec![]),
            "task" => (CountScope::Task, vec![]),
            _ => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "engine.count_scope".to_string(),
                        value: self.count_scope.clone(),
                        valid_values: vec!["run".to_string(), "task".to_string()],
                    },
                    format!(
                        "engine.count_scope: unknown value '{}', falling back to 'run'",
                        self.count_scope
                    ),
                );
                (CountScope::Run, vec![issue])
            }
        }
    }

    /// Check numeric bounds
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.max_messages == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "engine.max_messages".to_string(),
                },
                "engine.max_messages must be at least 1",
            ));
        }
        if self.history_window == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "engine.history_window".to_string(),
                },
                "engine.history_window must be at least 1 (omit it to show the whole history)",
            ));
        }
        if self.timeout_seconds == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "engine.timeout_seconds".to_string(),
                },
                "engine.timeout_seconds must be at least 1 (omit it to disable the timeout)",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_scope() {
        let mut config = FileEngineConfig::default();
        assert_eq!(config.parse_count_scope(), (CountScope::Run, vec![]));

        config.count_scope = "Task".to_string();
        assert_eq!(config.parse_count_scope().0, CountScope::Task);

        config.count_scope = "forever".to_string();
        let (scope, issues) = config.parse_count_scope();
        assert_eq!(scope, CountScope::Run);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_zero_values_are_errors() {
        let config = FileEngineConfig {
            max_messages: 0,
            history_window: Some(0),
            timeout_seconds: Some(0),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.is_error()));
    }
}
