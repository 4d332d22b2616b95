//! Configuration management for the notebook server

use std::env;
use std::path::PathBuf;

use crate::notebook::pipeline::DEFAULT_DPI;
use crate::notebook::pool::DEFAULT_WORKERS;

/// Accepted rasterization resolutions
pub const DPI_RANGE: std::ops::RangeInclusive<u32> = 36..=600;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub notebook: NotebookConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit in MiB
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone)]
pub struct NotebookConfig {
    /// Worker pool capacity shared by file and page fan-out
    pub workers: usize,
    pub render_dpi: u32,
    /// Parent directory for per-request workspaces
    pub work_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    NotANumber { key: &'static str, value: String },

    #[error("{key} is out of range: {reason}")]
    OutOfRange { key: &'static str, reason: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                max_upload_mb: 512,
            },
            notebook: NotebookConfig {
                workers: DEFAULT_WORKERS,
                render_dpi: DEFAULT_DPI,
                work_dir: env::temp_dir(),
            },
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset keys take defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let config = Config {
            server: ServerConfig {
                host: lookup("NOTEBOOK_HOST").unwrap_or(defaults.server.host),
                port: number(&lookup, "NOTEBOOK_PORT", defaults.server.port)?,
                max_upload_mb: number(&lookup, "NOTEBOOK_MAX_UPLOAD_MB", defaults.server.max_upload_mb)?,
            },
            notebook: NotebookConfig {
                workers: number(&lookup, "NOTEBOOK_WORKERS", defaults.notebook.workers)?,
                render_dpi: number(&lookup, "NOTEBOOK_RENDER_DPI", defaults.notebook.render_dpi)?,
                work_dir: lookup("NOTEBOOK_WORK_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.notebook.work_dir),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notebook.workers == 0 {
            return Err(ConfigError::OutOfRange {
                key: "NOTEBOOK_WORKERS",
                reason: "must be at least 1".to_string(),
            });
        }
        if !DPI_RANGE.contains(&self.notebook.render_dpi) {
            return Err(ConfigError::OutOfRange {
                key: "NOTEBOOK_RENDER_DPI",
                reason: format!(
                    "{} not in {}..={}",
                    self.notebook.render_dpi,
                    DPI_RANGE.start(),
                    DPI_RANGE.end()
                ),
            });
        }
        if self.server.max_upload_mb == 0 {
            return Err(ConfigError::OutOfRange {
                key: "NOTEBOOK_MAX_UPLOAD_MB",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn number<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::NotANumber { key, value }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.max_upload_bytes(), 512 * 1024 * 1024);
        assert_eq!(config.notebook.workers, 4);
        assert_eq!(config.notebook.render_dpi, 96);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("NOTEBOOK_HOST", "127.0.0.1"),
            ("NOTEBOOK_PORT", "9001"),
            ("NOTEBOOK_WORKERS", " 8 "),
            ("NOTEBOOK_RENDER_DPI", "150"),
            ("NOTEBOOK_WORK_DIR", "/var/tmp/notebooks"),
            ("NOTEBOOK_MAX_UPLOAD_MB", "64"),
        ]))
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.max_upload_mb, 64);
        assert_eq!(config.notebook.workers, 8);
        assert_eq!(config.notebook.render_dpi, 150);
        assert_eq!(config.notebook.work_dir, PathBuf::from("/var/tmp/notebooks"));
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let err = Config::from_lookup(lookup(&[("NOTEBOOK_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::NotANumber { key: "NOTEBOOK_PORT", .. }));

        let err = Config::from_lookup(lookup(&[("NOTEBOOK_WORKERS", "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::NotANumber { key: "NOTEBOOK_WORKERS", .. }));
    }

    #[test]
    fn test_rejects_out_of_range() {
        for (key, value) in [
            ("NOTEBOOK_WORKERS", "0"),
            ("NOTEBOOK_RENDER_DPI", "20"),
            ("NOTEBOOK_RENDER_DPI", "1200"),
            ("NOTEBOOK_MAX_UPLOAD_MB", "0"),
        ] {
            let err = Config::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert!(
                matches!(err, ConfigError::OutOfRange { key: k, .. } if k == key),
                "{key}={value}"
            );
        }
    }
}
