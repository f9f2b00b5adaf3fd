//! Selection configuration from TOML (`[selection]` section)

use crew_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Fallback strategy used when the leader override defers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionStrategyKind {
    /// Ask the decision backend with the selector prompt
    #[default]
    Model,
    /// Follow the leader's numbered assignment lines
    Delegation,
    /// Cycle through the candidates in roster order
    RoundRobin,
}

impl SelectionStrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategyKind::Model => "model",
            SelectionStrategyKind::Delegation => "delegation",
            SelectionStrategyKind::RoundRobin => "round_robin",
        }
    }
}

impl std::fmt::Display for SelectionStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw selection configuration from TOML
///
/// # Example
///
/// ```toml
/// [selection]
/// strategy = "model"      # "model", "delegation" or "round_robin"
/// selector_prompt = "..." # must contain {roles}, {history} and {participants}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSelectionConfig {
    pub strategy: String,
    /// Override of the built-in selector prompt template
    pub selector_prompt: Option<String>,
}

impl Default for FileSelectionConfig {
    fn default() -> Self {
        Self {
            strategy: "model".to_string(),
            selector_prompt: None,
        }
    }
}

impl FileSelectionConfig {
    /// Parse strategy string into SelectionStrategyKind, returning warnings on failure.
    pub fn parse_strategy(&self) -> (SelectionStrategyKind, Vec<ConfigIssue>) {
        match self.strategy.to_lowercase().replace('-', "_").as_str() {
            "model" | "selector" => (SelectionStrategyKind::Model, vec![]),
            "delegation" | "plan" => (SelectionStrategyKind::Delegation, vec![]),
            "round_robin" => (SelectionStrategyKind::RoundRobin, vec![]),
            _ => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "selection.strategy".to_string(),
                        value: self.strategy.clone(),
                        valid_values: vec![
                            "model".to_string(),
                            "delegation".to_string(),
                            "round_robin".to_string(),
                        ],
                    },
                    format!(
                        "selection.strategy: unknown value '{}', falling back to 'model'",
                        self.strategy
                    ),
                );
                (SelectionStrategyKind::Model, vec![issue])
            }
        }
    }

    /// Check that a custom selector prompt keeps its placeholders.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let Some(template) = &self.selector_prompt else {
            return vec![];
        };
        ["{roles}", "{history}", "{participants}"]
            .iter()
            .filter(|placeholder| !template.contains(*placeholder))
            .map(|placeholder| {
                ConfigIssue::warning(
                    ConfigIssueCode::MissingPlaceholder {
                        field: "selection.selector_prompt".to_string(),
                        placeholder: placeholder.to_string(),
                    },
                    format!(
                        "selection.selector_prompt: missing placeholder {}",
                        placeholder
                    ),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy() {
        let mut config = FileSelectionConfig::default();
        assert_eq!(config.parse_strategy().0, SelectionStrategyKind::Model);

        config.strategy = "round-robin".to_string();
        assert_eq!(config.parse_strategy().0, SelectionStrategyKind::RoundRobin);

        config.strategy = "Delegation".to_string();
        assert_eq!(config.parse_strategy().0, SelectionStrategyKind::Delegation);

        config.strategy = "dice".to_string();
        let (kind, issues) = config.parse_strategy();
        assert_eq!(kind, SelectionStrategyKind::Model);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_selector_prompt_placeholders() {
        let config = FileSelectionConfig {
            selector_prompt: Some("Roles: {roles}. Pick one.".to_string()),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("{history}"));
    }
}
