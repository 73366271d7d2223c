// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::ingest::{IngestionSpec, PREVIEW_ROWS};

pub const DEFAULT_CONFIG: &str = "ingest.yaml";

/// One CSV → table mapping.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Relative paths are resolved against `Settings::raw_dir`.
    pub source: PathBuf,
    pub schema: String,
    pub table: String,
    /// Drop and reload instead of skipping an existing table.
    #[serde(default)]
    pub refresh: bool,
}

/// Paths and jobs shared by every run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Defaults to `<data_dir>/raw`.
    #[serde(default)]
    pub raw_dir: Option<PathBuf>,
    #[serde(default = "default_database_file")]
    pub database_file: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_database_file() -> String {
    "bronze.duckdb".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_preview_rows() -> usize {
    PREVIEW_ROWS
}

impl Settings {
    /// Read settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("invalid settings YAML")
    }

    /// Apply `BRONZE_*` environment variables on top of the file values.
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BRONZE_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("BRONZE_RAW_DIR") {
            self.raw_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("BRONZE_DATABASE_FILE") {
            self.database_file = v;
        }
        if let Some(v) = lookup("BRONZE_LOG_LEVEL") {
            self.log_level = v;
        }
        self
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.raw_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("raw"))
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    /// Build the ingestion spec for `job`, resolving its source path.
    pub fn spec_for(&self, job: &JobConfig) -> IngestionSpec {
        let source = if job.source.is_absolute() {
            job.source.clone()
        } else {
            self.raw_dir().join(&job.source)
        };
        IngestionSpec::new(source, job.schema.clone(), job.table.clone())
    }
}
