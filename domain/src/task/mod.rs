//! Task value object
//!
//! A task is the seed of a new user message. The expected-output text is
//! advisory: it is embedded in the prompt and never checked against what
//! the participants produce.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One prompt submitted to the engine (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    name: String,
    prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expected_output: Option<String>,
}

impl Task {
    /// Create a task, rejecting a blank prompt
    pub fn try_new(name: impl Into<String>, prompt: impl Into<String>) -> Result<Self, DomainError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(DomainError::InvalidTask("prompt cannot be empty".to_string()));
        }
        Ok(Self {
            name: name.into(),
            prompt,
            expected_output: None,
        })
    }

    pub fn with_expected_output(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.expected_output = (!description.trim().is_empty()).then_some(description);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn expected_output(&self) -> Option<&str> {
        self.expected_output.as_deref()
    }

    /// The text of the user message that opens this task.
    pub fn render(&self) -> String {
        match &self.expected_output {
            Some(expected) => format!("{}\nExpected output: {}", self.prompt, expected),
            None => self.prompt.clone(),
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_expected_output() {
        let task = Task::try_new("collect_info", "Collect information from HCW #90.")
            .unwrap()
            .with_expected_output("A JSON format with ID, Name, Specialty");

        assert_eq!(task.name(), "collect_info");
        assert_eq!(
            task.render(),
            "Collect information from HCW #90.\nExpected output: A JSON format with ID, Name, Specialty"
        );
    }

    #[test]
    fn test_render_without_expected_output() {
        let task = Task::try_new("t", "Do it").unwrap().with_expected_output("  ");
        assert!(task.expected_output().is_none());
        assert_eq!(task.render(), "Do it");
    }

    #[test]
    fn test_blank_prompt_rejected() {
        assert!(matches!(
            Task::try_new("t", "   "),
            Err(DomainError::InvalidTask(_))
        ));
    }
}
