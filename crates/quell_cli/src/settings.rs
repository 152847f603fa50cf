//! Configuration discovery for subcommands.

use std::path::{Path, PathBuf};

use quell_config::{find_config, load_config, QuellConfig, SkipList};

use crate::GlobalArgs;

/// Loaded configuration and the directory relative paths resolve against.
pub struct Settings {
    /// The parsed configuration, or defaults when no file was found.
    pub config: QuellConfig,
    /// Directory containing the configuration file, or the working directory.
    pub base_dir: PathBuf,
}

impl Settings {
    /// Loads `--config` if given, otherwise the nearest `quell.toml` above
    /// the working directory, otherwise defaults.
    pub fn load(global: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let cwd = std::env::current_dir()?;
        let path = match &global.config {
            Some(explicit) => Some(PathBuf::from(explicit)),
            None => find_config(&cwd),
        };
        Self::from_path(path.as_deref(), cwd)
    }

    fn from_path(path: Option<&Path>, cwd: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let Some(path) = path else {
            tracing::debug!("no quell.toml found, using defaults");
            return Ok(Self {
                config: QuellConfig::default(),
                base_dir: cwd,
            });
        };
        let config = load_config(path)?;
        tracing::debug!("loaded configuration from {}", path.display());
        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or(cwd, Path::to_path_buf);
        Ok(Self { config, base_dir })
    }

    /// The suppression file: `cli_file` if given, else the configured one.
    pub fn suppress_file(&self, cli_file: Option<&str>) -> Option<PathBuf> {
        cli_file
            .map(PathBuf::from)
            .or_else(|| self.config.suppress.file_in(&self.base_dir))
    }

    /// The skip list: `cli_patterns` if any, else the configured patterns.
    pub fn skip_list(&self, cli_patterns: &[String]) -> Result<SkipList, Box<dyn std::error::Error>> {
        let patterns: &[String] = if cli_patterns.is_empty() {
            &self.config.skip.patterns
        } else {
            cli_patterns
        };
        Ok(SkipList::parse(patterns)?)
    }
}
