//! Source documents for the notebook pipeline
//!
//! Wraps an uploaded PDF and rasterizes its pages with MuPDF.
//!
//! # Design
//!
//! MuPDF documents are not thread-safe. This wrapper:
//!
//! 1. Stores the document data (bytes or staged path)
//! 2. Opens a fresh document for each operation
//! 3. Uses `parking_lot::Mutex` to serialize access to one document
//!
//! Different documents rasterize concurrently; pages of one document are
//! rendered in order inside a single operation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbImage;
use mupdf::{Colorspace, Document, Matrix};
use parking_lot::Mutex;

use super::compose::check_pixel_budget;
use super::error::{NotebookError, NotebookResult};
use super::types::{PageImage, PageSize};

const PDF_MIME: &str = "application/pdf";

/// PDF user space resolution (points per inch)
pub const POINTS_PER_INCH: f32 = 72.0;

/// Source data for a document
#[derive(Clone)]
pub enum DocumentSource {
    /// Document loaded from owned bytes
    Bytes(Arc<Vec<u8>>),
    /// Document staged on disk
    Path(PathBuf),
}

impl DocumentSource {
    /// Create source from bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::Bytes(Arc::new(data))
    }

    /// Create source from path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }
}

/// An uploaded PDF, validated and ready to rasterize
pub struct SourceDocument {
    /// Document source data
    source: DocumentSource,
    /// Base file name, reused for the output document
    name: String,
    /// Cached page count
    page_count: usize,
    /// Size of page 0, absent for empty documents
    first_page: Option<PageSize>,
    /// Mutex for serializing access
    _lock: Mutex<()>,
}

impl SourceDocument {
    /// Create a SourceDocument from bytes
    pub fn from_bytes(data: Vec<u8>, name: impl Into<String>) -> NotebookResult<Self> {
        Self::open(DocumentSource::from_bytes(data), name.into())
    }

    /// Create a SourceDocument from a staged file
    pub fn from_path<P: AsRef<Path>>(path: P, name: impl Into<String>) -> NotebookResult<Self> {
        Self::open(DocumentSource::from_path(path), name.into())
    }

    fn open(source: DocumentSource, name: String) -> NotebookResult<Self> {
        let doc = open_source(&source).map_err(|e| invalid_document(&name, e))?;
        let page_count = doc.page_count().map_err(|e| invalid_document(&name, e))? as usize;

        let first_page = if page_count > 0 {
            let bounds = doc
                .load_page(0)
                .and_then(|page| page.bounds())
                .map_err(|e| invalid_document(&name, e))?;
            Some(PageSize::new(bounds.x1 - bounds.x0, bounds.y1 - bounds.y0))
        } else {
            None
        };

        tracing::debug!(
            name = %name,
            page_count,
            first_page = ?first_page,
            "Opened source document"
        );

        Ok(Self {
            source,
            name,
            page_count,
            first_page,
            _lock: Mutex::new(()),
        })
    }

    /// Get the document name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of pages
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Size of the first page, which sizes the whole document's canvas
    pub fn page_size(&self) -> NotebookResult<PageSize> {
        self.first_page
            .ok_or_else(|| NotebookError::EmptyDocument(self.name.clone()))
    }

    /// Execute a closure with a freshly opened document
    ///
    /// Access is serialized via mutex; the document is dropped afterward.
    pub fn with_doc<F, R>(&self, f: F) -> NotebookResult<R>
    where
        F: FnOnce(&Document) -> NotebookResult<R>,
    {
        let _guard = self._lock.lock();
        let doc = open_source(&self.source).map_err(|e| invalid_document(&self.name, e))?;
        f(&doc)
    }

    /// Rasterize every page at `dpi`, in page order
    ///
    /// Stops at the first page that fails or whose bitmap would exceed the
    /// pixel budget; that page is never rendered.
    pub fn rasterize_pages(&self, dpi: u32) -> NotebookResult<Vec<PageImage>> {
        if self.page_count == 0 {
            return Err(NotebookError::EmptyDocument(self.name.clone()));
        }

        self.with_doc(|doc| {
            (0..self.page_count)
                .map(|index| rasterize_page(doc, index, dpi))
                .collect()
        })
    }
}

fn open_source(source: &DocumentSource) -> Result<Document, mupdf::Error> {
    match source {
        DocumentSource::Bytes(data) => Document::from_bytes(data, PDF_MIME),
        DocumentSource::Path(path) => {
            let path_str = path.to_string_lossy();
            Document::open(&*path_str)
        }
    }
}

fn invalid_document(name: &str, err: mupdf::Error) -> NotebookError {
    NotebookError::InvalidDocument {
        name: name.to_string(),
        reason: err.to_string(),
    }
}

fn rasterize_page(doc: &Document, index: usize, dpi: u32) -> NotebookResult<PageImage> {
    let failure = |e: mupdf::Error| NotebookError::CompositionFailure {
        page: index + 1,
        reason: format!("rasterization failed: {}", e),
    };

    let page = doc.load_page(index as i32).map_err(failure)?;
    let bounds = page.bounds().map_err(failure)?;
    check_pixel_budget(
        PageSize::new(bounds.x1 - bounds.x0, bounds.y1 - bounds.y0),
        dpi,
        index + 1,
    )?;

    let scale = dpi as f32 / POINTS_PER_INCH;
    let matrix = Matrix::new_scale(scale, scale);
    let pixmap = page
        .to_pixmap(&matrix, &Colorspace::device_rgb(), false, true)
        .map_err(failure)?;

    Ok(PageImage {
        index,
        image: pixmap_to_rgb(&pixmap),
    })
}

/// Copy an RGB(A) pixmap into an opaque RGB buffer
fn pixmap_to_rgb(pixmap: &mupdf::Pixmap) -> RgbImage {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    RgbImage::from_fn(width, height, |x, y| {
        let offset = (y as usize * width as usize + x as usize) * n;
        let r = samples.get(offset).copied().unwrap_or(255);
        let g = samples.get(offset + 1).copied().unwrap_or(255);
        let b = samples.get(offset + 2).copied().unwrap_or(255);
        image::Rgb([r, g, b])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_document_source_from_bytes() {
        let data = vec![1, 2, 3, 4];
        let source = DocumentSource::from_bytes(data.clone());

        match source {
            DocumentSource::Bytes(arc_data) => assert_eq!(*arc_data, data),
            _ => panic!("Expected Bytes variant"),
        }
    }

    #[test]
    fn test_open_reads_first_page_size() {
        let pdf = fixtures::pdf_with_pages(&[(600.0, 800.0), (300.0, 200.0)]);
        let doc = SourceDocument::from_bytes(pdf, "deck.pdf").unwrap();

        assert_eq!(doc.name(), "deck.pdf");
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page_size().unwrap(), PageSize::new(600.0, 800.0));
    }

    #[test]
    fn test_empty_document() {
        let doc = SourceDocument::from_bytes(fixtures::empty_pdf(), "blank.pdf").unwrap();

        assert_eq!(doc.page_count(), 0);
        assert!(matches!(doc.page_size(), Err(NotebookError::EmptyDocument(n)) if n == "blank.pdf"));
        assert!(matches!(doc.rasterize_pages(96), Err(NotebookError::EmptyDocument(_))));
    }

    #[test]
    fn test_garbage_is_invalid_document() {
        let result = SourceDocument::from_bytes(b"definitely not a pdf".to_vec(), "notes.pdf");
        assert!(matches!(result, Err(NotebookError::InvalidDocument { .. })));
    }

    #[test]
    fn test_rasterize_at_dpi() {
        let pdf = fixtures::pdf_with_pages(&[(72.0, 144.0), (72.0, 144.0), (72.0, 144.0)]);
        let doc = SourceDocument::from_bytes(pdf, "deck.pdf").unwrap();

        let pages = doc.rasterize_pages(96).unwrap();
        assert_eq!(pages.len(), 3);

        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.index, i);
            assert_eq!(page.image.dimensions(), (96, 192));
        }
    }

    #[test]
    fn test_open_from_staged_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("staged.pdf");
        std::fs::write(&path, fixtures::pdf_with_pages(&[(100.0, 100.0)])).unwrap();

        let doc = SourceDocument::from_path(&path, "staged.pdf").unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.rasterize_pages(72).unwrap()[0].image.dimensions(), (100, 100));
    }

    #[test]
    fn test_oversized_later_page_not_rendered() {
        let pdf = fixtures::pdf_with_pages(&[(100.0, 100.0), (12000.0, 12000.0), (100.0, 100.0)]);
        let doc = SourceDocument::from_bytes(pdf, "poster.pdf").unwrap();

        let err = doc.rasterize_pages(72).unwrap_err();
        assert!(matches!(err, NotebookError::CompositionFailure { page: 2, .. }));
    }
}
