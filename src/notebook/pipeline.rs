//! Batch pipeline
//!
//! Rasterize → compose → merge, for every uploaded document.
//!
//! Documents of one request fan out over the shared [`WorkerPool`]; inside
//! each document, page composition fans out over the same pool. Results are
//! gathered by index, so output order always equals input order no matter
//! which worker finishes first.

use std::time::Instant;

use rayon::prelude::*;

use super::compose::{check_pixel_budget, compose_page};
use super::error::{NotebookError, NotebookResult};
use super::geometry::{resolve, CanvasLayout};
use super::pool::SharedWorkerPool;
use super::source::SourceDocument;
use super::types::{NotebookOptions, OutputDocument, OutputPage, PageImage};
use super::writer::write_document;

/// Default rasterization resolution
pub const DEFAULT_DPI: u32 = 96;

/// Notebook conversion pipeline bound to a worker pool
#[derive(Clone)]
pub struct NotebookPipeline {
    pool: SharedWorkerPool,
    dpi: u32,
}

impl NotebookPipeline {
    pub fn new(pool: SharedWorkerPool, dpi: u32) -> Self {
        Self { pool, dpi }
    }

    pub fn pool(&self) -> &SharedWorkerPool {
        &self.pool
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Convert one document
    ///
    /// Any page failure aborts the document; no partial output is produced.
    pub fn process_document(
        &self,
        source: &SourceDocument,
        options: &NotebookOptions,
    ) -> NotebookResult<OutputDocument> {
        self.pool.install(|| self.run_document(source, options))
    }

    /// Convert several documents concurrently
    ///
    /// Result `i` belongs to `sources[i]`. A failing document does not stop
    /// its siblings.
    pub fn process_batch(
        &self,
        sources: &[SourceDocument],
        options: &NotebookOptions,
    ) -> Vec<NotebookResult<OutputDocument>> {
        tracing::info!(
            documents = sources.len(),
            placement = %options.placement,
            style = %options.style,
            spacing = %options.spacing,
            workers = self.pool.capacity(),
            "Starting notebook batch"
        );

        let results: Vec<_> = self.pool.install(|| {
            sources
                .par_iter()
                .map(|source| self.run_document(source, options))
                .collect()
        });

        let stats = self.pool.stats();
        tracing::debug!(
            documents = results.len(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            utilization = stats.utilization(),
            completed_tasks = stats.completed,
            "Notebook batch finished"
        );

        results
    }

    /// Per-document steps; must run on a pool thread
    fn run_document(
        &self,
        source: &SourceDocument,
        options: &NotebookOptions,
    ) -> NotebookResult<OutputDocument> {
        let started = Instant::now();
        let name = source.name();

        // 1-2. validate and size the canvas once, from page 0
        let page_size = source.page_size()?;
        let layout = resolve(page_size, options.placement);
        check_pixel_budget(layout.canvas, self.dpi, 1)?;

        // 3. rasterize
        let images = {
            let _task = self.pool.track();
            source.rasterize_pages(self.dpi)?
        };

        // 4-5. compose in parallel, collected in page order, fail fast
        let pages = self.compose_pages(&images, &layout, options).map_err(|e| {
            tracing::warn!(name = %name, error = %e, "Page composition failed");
            e
        })?;
        drop(images);

        if pages.len() != source.page_count() {
            return Err(NotebookError::CompositionFailure {
                page: pages.len() + 1,
                reason: format!(
                    "expected {} pages, composed {}",
                    source.page_count(),
                    pages.len()
                ),
            });
        }

        // 6. merge
        let bytes = write_document(name, &pages)?;

        tracing::info!(
            name = %name,
            pages = pages.len(),
            canvas_width = layout.canvas.width,
            canvas_height = layout.canvas.height,
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Notebook document complete"
        );

        Ok(OutputDocument {
            name: name.to_string(),
            page_count: pages.len(),
            bytes,
        })
    }

    /// Compose pages in parallel, in page order; the first failure wins
    fn compose_pages(
        &self,
        images: &[PageImage],
        layout: &CanvasLayout,
        options: &NotebookOptions,
    ) -> NotebookResult<Vec<OutputPage>> {
        images
            .par_iter()
            .map(|image| {
                let _task = self.pool.track();
                compose_page(image, layout, options, self.dpi)
            })
            .collect()
    }
}
