//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::notebook::{create_shared_pool, NotebookError, NotebookPipeline, PoolStats};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to start worker pool: {0}")]
    WorkerPoolInit(#[from] NotebookError),

    #[error("Work directory {path} is unusable: {source}")]
    WorkDir {
        path: String,
        source: std::io::Error,
    },
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: NotebookPipeline,
}

impl AppState {
    /// Create a new application state
    ///
    /// Starts the worker pool and makes sure the work directory exists.
    pub fn new(config: Config) -> Result<Self, StateError> {
        std::fs::create_dir_all(&config.notebook.work_dir).map_err(|source| StateError::WorkDir {
            path: config.notebook.work_dir.display().to_string(),
            source,
        })?;

        let pool = create_shared_pool(config.notebook.workers)?;
        let pipeline = NotebookPipeline::new(pool, config.notebook.render_dpi);

        tracing::info!(
            workers = config.notebook.workers,
            dpi = config.notebook.render_dpi,
            work_dir = %config.notebook.work_dir.display(),
            "Notebook pipeline ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the conversion pipeline
    pub fn pipeline(&self) -> &NotebookPipeline {
        &self.inner.pipeline
    }

    /// Get worker pool statistics
    pub fn pool_stats(&self) -> PoolStats {
        self.inner.pipeline.pool().stats()
    }
}
