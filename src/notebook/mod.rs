//! Notebook conversion
//!
//! Turns each page of an uploaded PDF into a notebook page: the canvas is
//! doubled along one axis, the original page is placed in one half and the
//! other half receives a note-taking pattern.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐   ┌──────────┐
//! │ SourceDocument│──►│   geometry    │──►│   compose     │──►│  writer  │
//! │  (MuPDF)      │   │  (page 0 size │   │ (per page,    │   │ (lopdf)  │
//! │ rasterize     │   │   → layout)   │   │  pattern +    │   │          │
//! └───────────────┘   └───────────────┘   │  slide)       │   └────┬─────┘
//!                                         └───────────────┘        │
//!                          WorkerPool (rayon) bounds both           ▼
//!                          document and page fan-out          archive::bundle
//! ```

pub mod archive;
pub mod compose;
pub mod error;
pub mod geometry;
pub mod pattern;
pub mod pipeline;
pub mod pool;
pub mod source;
pub mod types;
pub mod writer;

#[cfg(test)]
pub(crate) mod fixtures;

pub use archive::{bundle, Bundle};
pub use error::{NotebookError, NotebookResult};
pub use geometry::{resolve, CanvasLayout};
pub use pipeline::NotebookPipeline;
pub use pool::{create_shared_pool, PoolStats, SharedWorkerPool, WorkerPool};
pub use source::SourceDocument;
pub use types::{
    NotebookOptions, OutputDocument, PageSize, PatternStyle, Placement, Rect, Spacing,
};
