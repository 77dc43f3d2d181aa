use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use masscrc_core::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PipelineSettings {
    /// Number of parallel reads
    pub jobs: usize,
    /// Capacity of the list-ahead path queue
    pub list_ahead: usize,
    /// Size of reads in KiB
    pub read_size_kb: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        let defaults = PipelineConfig::default();
        Self {
            jobs: defaults.workers,
            list_ahead: defaults.list_ahead,
            read_size_kb: defaults.read_size_kb,
        }
    }
}

impl AppConfig {
    /// Apply CLI argument overrides to the configuration
    pub fn apply_cli_overrides(
        &mut self,
        jobs: Option<usize>,
        list_ahead: Option<usize>,
        read_size_kb: Option<usize>,
    ) {
        if let Some(jobs) = jobs {
            self.pipeline.jobs = jobs;
        }
        if let Some(list_ahead) = list_ahead {
            self.pipeline.list_ahead = list_ahead;
        }
        if let Some(read_size_kb) = read_size_kb {
            self.pipeline.read_size_kb = read_size_kb;
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            workers: self.pipeline.jobs,
            list_ahead: self.pipeline.list_ahead,
            read_size_kb: self.pipeline.read_size_kb,
        }
    }
}

/// Configuration manager handling XDG-compliant paths and layered loading
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path (for testing)
    #[allow(dead_code)]
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("masscrc/config.toml")
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    /// (CLI overrides are applied afterwards by the caller)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new();

        figment = figment.merge(Serialized::defaults(AppConfig::default()));

        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        figment = figment.merge(Env::prefixed("MASSCRC_").split("__"));

        figment.extract().context("Failed to load configuration")
    }
}
