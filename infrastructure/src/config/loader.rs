//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "crew-relay";
const PROJECT_FILES: [&str; 2] = ["crew.toml", ".crew.toml"];
const ENV_PREFIX: &str = "CREW_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CREW_` environment variables, `__` separating section and key
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./crew.toml` or `./.crew.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/crew-relay/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut files = Vec::new();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                files.push(global_path);
            }
        }
        if let Some(project_path) = Self::project_config_path() {
            files.push(project_path);
        }
        if let Some(path) = config_path {
            files.push(path.clone());
        }

        Self::figment_for(&files)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Load defaults merged with the given files only, in order.
    ///
    /// Later files win. Environment variables are not consulted.
    pub fn load_files(files: &[PathBuf]) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment_for(files).extract().map_err(Box::new)
    }

    fn figment_for(files: &[PathBuf]) -> Figment {
        files.iter().fold(
            Figment::new().merge(Serialized::defaults(FileConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/crew-relay/config.toml if set,
    /// otherwise falls back to ~/.config/crew-relay/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Environment: {}<SECTION>__<KEY>", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./crew.toml or ./.crew.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.engine.max_messages, 6);
        assert_eq!(config.termination.keywords, vec!["TERMINATE"]);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("crew-relay"));
    }

    #[test]
    fn test_later_files_win() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("crew.toml");
        fs::write(&global, "[engine]\nmax_messages = 10\ncount_scope = \"task\"\n").unwrap();
        fs::write(&project, "[engine]\nmax_messages = 4\n").unwrap();

        let config = ConfigLoader::load_files(&[global, project]).unwrap();
        assert_eq!(config.engine.max_messages, 4);
        // Keys absent from the later file survive from the earlier one
        assert_eq!(config.engine.count_scope, "task");
        assert!(config.engine.allow_repeated_speaker);
    }

    #[test]
    fn test_invalid_type_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crew.toml");
        fs::write(&path, "[engine]\nmax_messages = \"lots\"\n").unwrap();

        assert!(ConfigLoader::load_files(&[path]).is_err());
    }

    #[test]
    fn test_sample_config_is_valid() {
        let sample = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../crew.example.toml");
        let config = ConfigLoader::load_files(&[sample]).unwrap();

        let (scope, issues) = config.engine.parse_count_scope();
        assert_eq!(scope, crew_domain::CountScope::Task);
        assert!(issues.is_empty());
        assert_eq!(config.engine.max_messages, 6);
        assert!(config.check(true).is_ok());
    }

    #[test]
    fn test_project_config_lookup() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::project_config_in(dir.path()).is_none());

        fs::write(dir.path().join(".crew.toml"), "").unwrap();
        assert_eq!(
            ConfigLoader::project_config_in(dir.path()),
            Some(dir.path().join(".crew.toml"))
        );

        fs::write(dir.path().join("crew.toml"), "").unwrap();
        assert_eq!(
            ConfigLoader::project_config_in(dir.path()),
            Some(dir.path().join("crew.toml"))
        );
    }
}
