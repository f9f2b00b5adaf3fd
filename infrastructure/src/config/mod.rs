//! Configuration file loading for crew-relay
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CREW_` environment variables (`CREW_ENGINE__MAX_MESSAGES=10`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./crew.toml` or `./.crew.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/crew-relay/config.toml`
//! 5. Fallback: `~/.config/crew-relay/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    BackendProvider, ConfigValidationError, FileBackendConfig, FileConfig, FileEngineConfig,
    FileLoggingConfig, FileOutputConfig, FileSelectionConfig, FileTerminationConfig,
    SelectionStrategyKind,
};
pub use loader::ConfigLoader;
