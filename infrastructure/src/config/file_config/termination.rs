//! Termination configuration from TOML (`[termination]` section)

use crew_domain::termination::{ESCALATE_KEYWORD, TERMINATE_KEYWORD};
use crew_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw termination configuration from TOML
///
/// # Example
///
/// ```toml
/// [termination]
/// keywords = ["TERMINATE"]          # successful completion
/// escalate_keywords = ["ESCALATE"]  # hand-off to a human supervisor
/// use_status = true                 # honor structured message status
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTerminationConfig {
    pub keywords: Vec<String>,
    pub escalate_keywords: Vec<String>,
    pub use_status: bool,
}

impl Default for FileTerminationConfig {
    fn default() -> Self {
        Self {
            keywords: vec![TERMINATE_KEYWORD.to_string()],
            escalate_keywords: vec![ESCALATE_KEYWORD.to_string()],
            use_status: true,
        }
    }
}

impl FileTerminationConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let all = self.keywords.iter().chain(&self.escalate_keywords);
        if all.clone().any(|k| k.trim().is_empty()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::BlankKeyword,
                "termination: stop keywords cannot be blank (a blank keyword matches every message)",
            ));
        }
        if all.count() == 0 && !self.use_status {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::CountBoundOnly,
                "termination: no keywords and use_status = false; tasks only stop at engine.max_messages",
            ));
        }
        issues
    }
}
