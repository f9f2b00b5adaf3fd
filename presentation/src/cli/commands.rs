//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Live colored transcript followed by a summary
    Text,
    /// A single JSON report on stdout
    Json,
}

impl From<OutputFormat> for crew_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => crew_domain::OutputFormat::Text,
            OutputFormat::Json => crew_domain::OutputFormat::Json,
        }
    }
}

/// Fallback speaker selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Ask the decision backend with the selector prompt
    Model,
    /// Follow the leader's numbered assignment lines
    Delegation,
    /// Cycle through the team in roster order
    RoundRobin,
}

impl StrategyArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyArg::Model => "model",
            StrategyArg::Delegation => "delegation",
            StrategyArg::RoundRobin => "round_robin",
        }
    }
}

/// CLI arguments for crew-relay
#[derive(Parser, Debug)]
#[command(name = "crew-relay")]
#[command(author, version, about = "Leader-driven turn scheduling for a team of agents")]
#[command(long_about = r#"
crew-relay runs a care team (a planning agent and three robots) through an
ordered list of tasks on one shared conversation history.

Each task goes through the same loop:
1. The leader speaks first and after every other participant
2. Otherwise a selection strategy picks who goes next
3. A participant may invoke one tool, then reflect on its result
4. The task stops on TERMINATE, ESCALATE or the message limit

Configuration files are loaded from (in priority order):
1. CREW_* environment variables   e.g. CREW_ENGINE__MAX_MESSAGES=10
2. --config <path>                Explicit config file
3. ./crew.toml                    Project-level config
4. ~/.config/crew-relay/config.toml   Global config

Example:
  crew-relay --offline
  crew-relay --task navigate_HCW --task reflection -v
  crew-relay --output json --transcript run.jsonl
"#)]
pub struct Cli {
    /// Run only these tasks (in run order; can be specified multiple times)
    #[arg(short, long, value_name = "NAME")]
    pub task: Vec<String>,

    /// List the available tasks and exit
    #[arg(long)]
    pub list_tasks: bool,

    /// Use the scripted offline backend (no network, no API key)
    #[arg(long)]
    pub offline: bool,

    /// Override the message-count safety bound
    #[arg(long, value_name = "N")]
    pub max_messages: Option<usize>,

    /// Override the fallback selection strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write the conversation transcript as JSONL
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "crew-relay",
            "--offline",
            "-t",
            "navigate_HCW",
            "--task",
            "reflection",
            "--max-messages",
            "10",
            "--strategy",
            "round-robin",
            "-o",
            "json",
            "-vv",
        ]);
        assert!(cli.offline);
        assert_eq!(cli.task, vec!["navigate_HCW", "reflection"]);
        assert_eq!(cli.max_messages, Some(10));
        assert_eq!(cli.strategy, Some(StrategyArg::RoundRobin));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["crew-relay"]);
        assert!(cli.task.is_empty());
        assert!(cli.output.is_none());
        assert!(cli.strategy.is_none());
        assert_eq!(cli.verbose, 0);
    }
}
