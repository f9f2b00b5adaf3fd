//! CLI entrypoint for crew-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use crew_application::{
    CompositeObserver, ConversationEngine, ConversationObserver, DecisionBackend,
    ModelSelectionStrategy, RunTasksUseCase, SelectionStrategy,
};
use crew_domain::SelectorPrompt;
use crew_infrastructure::{
    BackendProvider, CareTeamPreset, CareToolExecutor, ConfigLoader, DelegationStrategy,
    FileConfig, JsonlConversationLogger, OpenAiBackend, RoundRobinStrategy, SelectionStrategyKind,
    TracingRunHooks,
};
use crew_presentation::{
    Cli, ConsoleObserver, OutputConfig, ProgressReporter, SimpleProgress, StrategyArg,
    formatter_for,
};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.list_tasks {
        for task in CareTeamPreset::tasks()? {
            println!("{}", task.name());
        }
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources();
        println!();
        println!("{}", config.to_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let (provider, _) = config.backend.parse_provider();
    let offline = cli.offline || provider == BackendProvider::Scripted;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&cli, &config)?;
    info!("Starting crew-relay");

    match config.check(offline) {
        Ok(warnings) => {
            for issue in warnings {
                warn!("{}", issue);
                if !cli.quiet {
                    eprintln!("{}", issue);
                }
            }
        }
        Err(err) => {
            for issue in err.issues() {
                eprintln!("{}", issue);
            }
            bail!("Invalid configuration");
        }
    }

    let output = OutputConfig::default()
        .with_format(config.output.format)
        .with_format(cli.output.map(Into::into))
        .with_color(config.output.color && !cli.no_color)
        .with_show_progress(config.output.show_progress && !cli.quiet)
        .with_verbose(cli.verbose > 0);
    if !output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let roster = Arc::new(CareTeamPreset::roster()?);
    let tasks = CareTeamPreset::select_tasks(&cli.task)?;

    let backend: Arc<dyn DecisionBackend> = if offline {
        info!("Using the scripted offline backend");
        Arc::new(CareTeamPreset::script())
    } else {
        let api_key = config.backend.resolve_api_key().with_context(|| {
            format!(
                "No API key: set {} or backend.api_key",
                config.backend.api_key_env
            )
        })?;
        Arc::new(
            OpenAiBackend::new(&config.backend.base_url, api_key, &config.backend.model)
                .with_temperature(config.backend.temperature),
        )
    };

    let mut params = config.to_engine_params();
    if let Some(max_messages) = cli.max_messages {
        params = params.with_max_messages(max_messages);
    }

    let strategy = build_strategy(&cli, &config, offline, Arc::clone(&backend), &params)?;

    let mut engine = ConversationEngine::new(
        Arc::clone(&roster),
        backend,
        Arc::new(CareToolExecutor::new()),
        strategy,
        params,
    );

    let transcript = cli.transcript.as_ref().or(config.logging.transcript.as_ref());
    if let Some(path) = transcript {
        let logger = JsonlConversationLogger::create(path)
            .with_context(|| format!("Failed to create transcript {}", path.display()))?;
        engine = engine.with_logger(Arc::new(logger));
    }

    // Ctrl-C lets the in-flight turn finish and stops before the next one;
    // completed tasks are still reported
    let token = engine.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let mut use_case = RunTasksUseCase::new(engine).with_hooks(Arc::new(TracingRunHooks::new()));

    // === Observers ===
    let console = ConsoleObserver::new(roster.leader().clone()).with_verbose(output.verbose);
    let spinner = ProgressReporter::new();
    let mut delegates: Vec<&dyn ConversationObserver> = Vec::new();
    if output.spinner() {
        if std::io::stderr().is_terminal() {
            delegates.push(&spinner);
        } else {
            delegates.push(&SimpleProgress);
        }
    }
    if output.live_transcript() {
        delegates.push(&console);
    }
    let observer = CompositeObserver::new(delegates);

    let formatter = formatter_for(output.format);
    match use_case.execute_with_observer(&tasks, &observer).await {
        Ok(report) => {
            println!("{}", formatter.format(&report));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}", formatter.format_failure(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Pick the fallback selection strategy: CLI flag, then config. Offline
/// runs default to delegation since there is no model to ask.
fn build_strategy(
    cli: &Cli,
    config: &FileConfig,
    offline: bool,
    backend: Arc<dyn DecisionBackend>,
    params: &crew_application::EngineParams,
) -> Result<Arc<dyn SelectionStrategy>> {
    let kind = match cli.strategy {
        Some(StrategyArg::Model) => SelectionStrategyKind::Model,
        Some(StrategyArg::Delegation) => SelectionStrategyKind::Delegation,
        Some(StrategyArg::RoundRobin) => SelectionStrategyKind::RoundRobin,
        None if offline => SelectionStrategyKind::Delegation,
        None => config.selection.parse_strategy().0,
    };
    info!("Selection strategy: {}", kind);

    let strategy: Arc<dyn SelectionStrategy> = match kind {
        SelectionStrategyKind::Model => {
            let mut model = ModelSelectionStrategy::new(backend)
                .with_history_window(params.history_window)
                .with_timeout(params.backend_timeout);
            if let Some(template) = &config.selection.selector_prompt {
                model = model.with_prompt(SelectorPrompt::new(template.clone()));
            }
            Arc::new(model)
        }
        SelectionStrategyKind::Delegation => Arc::new(DelegationStrategy::new()),
        SelectionStrategyKind::RoundRobin => Arc::new(RoundRobinStrategy::new()),
    };
    Ok(strategy)
}

/// Initialize `tracing` from the verbosity flag. Diagnostics go to the log
/// file when one is configured, otherwise to stderr.
fn init_logging(cli: &Cli, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let log_file = cli.log_file.as_ref().or(config.logging.file.as_ref());
    match log_file {
        Some(path) => {
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let directory = directory.unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path {}", path.display()))?;
            std::fs::create_dir_all(directory)?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}
