use crate::convert::ConvertOptions;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "log4j-to-slf4j.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub convert: ConvertOptions,
    pub files: FileOptions,
}

#[derive(Debug, Clone)]
pub struct FileOptions {
    /// Extensions collected when a directory is given.
    pub extensions: Vec<String>,
    /// Appended to a file name to form its backup name.
    pub backup_suffix: String,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["java".into()],
            backup_suffix: ".orig".into(),
        }
    }
}

// --- Raw TOML structures ---
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    convert: Option<ConvertToml>,
    files: Option<FilesToml>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConvertToml {
    logger_names: Option<Vec<String>>,
    levels: Option<Vec<String>>,
    target_imports: Option<Vec<String>>,
    factory_call: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FilesToml {
    extensions: Option<Vec<String>>,
    backup_suffix: Option<String>,
}

impl AppConfig {
    /// Load from an explicit path, else `./log4j-to-slf4j.toml` when present,
    /// else the built-in defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Self::from_toml(ConfigToml::default());
                }
                default
            }
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: ConfigToml = toml::from_str(content).context("failed to parse config")?;
        Self::from_toml(raw)
    }

    fn from_toml(raw: ConfigToml) -> Result<Self> {
        let defaults = ConvertOptions::default();
        let convert = match raw.convert {
            Some(c) => ConvertOptions {
                logger_names: c.logger_names.unwrap_or(defaults.logger_names),
                levels: c.levels.unwrap_or(defaults.levels),
                target_imports: c.target_imports.unwrap_or(defaults.target_imports),
                factory_call: c.factory_call.unwrap_or(defaults.factory_call),
            },
            None => defaults,
        };

        let file_defaults = FileOptions::default();
        let files = match raw.files {
            Some(f) => FileOptions {
                extensions: f
                    .extensions
                    .unwrap_or(file_defaults.extensions)
                    .into_iter()
                    .map(|e| e.trim_start_matches('.').to_string())
                    .collect(),
                backup_suffix: f.backup_suffix.unwrap_or(file_defaults.backup_suffix),
            },
            None => file_defaults,
        };

        if convert.logger_names.iter().all(|n| n.trim().is_empty()) {
            bail!("convert.logger_names must not be empty");
        }
        if convert.levels.iter().all(|l| l.trim().is_empty()) {
            bail!("convert.levels must not be empty");
        }
        if convert.factory_call.trim().is_empty() {
            bail!("convert.factory_call must not be empty");
        }
        if files.backup_suffix.is_empty() {
            bail!("files.backup_suffix must not be empty");
        }

        Ok(Self { convert, files })
    }
}
