//! 配置加载
//!
//! 优先级：默认值 → TOML 配置文件 → 环境变量 / 命令行参数

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::generator::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

const APP_DIR: &str = "lumina";

/// 命令行参数
#[derive(Debug, Default, Parser)]
#[command(name = "lumina", version, about = "Terminal blog with an admin editor")]
pub struct CliArgs {
    /// Route to open on start, e.g. `/admin` or `/post/2`.
    #[arg(value_name = "ROUTE", default_value = "/")]
    pub route: String,

    /// Path to a TOML configuration file.
    #[arg(long, env = "LUMINA_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the post collection and the log file.
    #[arg(long, env = "LUMINA_DATA_DIR", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// API key for the text-generation provider.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Log filter directive, e.g. `info` or `lumina=debug`.
    #[arg(long, env = "LUMINA_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<String>,
}

/// 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub data_dir: Option<PathBuf>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("unable to determine a data directory; pass --data-dir")]
    NoDataDir,
}

/// 默认配置文件路径 (~/.config/lumina/config.toml)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

fn read_file_settings(path: &Path) -> Result<FileSettings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Settings {
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => read_file_settings(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_file_settings(&path)?,
                _ => FileSettings::default(),
            },
        };
        let default_data_dir = dirs::data_dir().map(|dir| dir.join(APP_DIR));
        Self::merge(file, cli, default_data_dir)
    }

    /// 合并配置文件与命令行参数，命令行优先
    pub fn merge(
        file: FileSettings,
        cli: &CliArgs,
        default_data_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let data_dir = cli
            .data_dir
            .clone()
            .or(file.data_dir)
            .or(default_data_dir)
            .ok_or(ConfigError::NoDataDir)?;

        Ok(Self {
            data_dir,
            api_key: cli.api_key.clone().or(file.api_key),
            model: file.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: file.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            log_level: cli
                .log_level
                .clone()
                .or(file.log_level)
                .unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings =
            Settings::merge(FileSettings::default(), &CliArgs::default(), Some("/d".into())).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/d"));
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_cli_overrides_file() {
        let file: FileSettings = toml::from_str(
            r#"
            data_dir = "/from/file"
            api_key = "file-key"
            model = "gemini-pro"
            log_level = "warn"
            "#,
        )
        .unwrap();
        let cli = CliArgs {
            api_key: Some("cli-key".to_string()),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };

        let settings = Settings::merge(file, &cli, None).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/from/file"));
        assert_eq!(settings.api_key.as_deref(), Some("cli-key"));
        assert_eq!(settings.model, "gemini-pro");
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_missing_data_dir() {
        let err = Settings::merge(FileSettings::default(), &CliArgs::default(), None).unwrap_err();
        assert!(matches!(err, ConfigError::NoDataDir));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "apikey = \"typo\"\n").unwrap();
        assert!(matches!(read_file_settings(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_cli_parses_route_and_flags() {
        let cli = CliArgs::try_parse_from(["lumina", "/admin", "--data-dir", "/tmp/x"]).unwrap();
        assert_eq!(cli.route, "/admin");
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }
}
