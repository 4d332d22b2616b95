//! Notebook error types
//!
//! Unified error handling for option parsing, rasterization, composition
//! and output assembly.

use thiserror::Error;

/// Unified notebook error type
#[derive(Debug, Error)]
pub enum NotebookError {
    /// Request carried no PDF file
    #[error("No PDF file uploaded")]
    NoFileSupplied,

    /// Input document has no pages
    #[error("Document has no pages: {0}")]
    EmptyDocument(String),

    /// Placement outside left/right/top/bottom
    #[error("Invalid placement '{0}', must be one of left, right, top, bottom")]
    InvalidPlacement(String),

    /// Style outside lines/dots/squares
    #[error("Unknown style '{0}', must be one of lines, dots, squares")]
    UnknownStyle(String),

    /// Spacing that is not a positive integer
    #[error("Invalid spacing '{0}', must be a positive integer")]
    InvalidSpacing(String),

    /// Input that MuPDF cannot open as a PDF
    #[error("Invalid document {name}: {reason}")]
    InvalidDocument { name: String, reason: String },

    /// Failure while rasterizing or composing a single page
    #[error("Composition failed on page {page}: {reason}")]
    CompositionFailure { page: usize, reason: String },

    /// Failure while serializing the output PDF
    #[error("PDF write error: {0}")]
    PdfWrite(String),

    /// Failure while packaging several outputs
    #[error("Archive error: {0}")]
    Archive(String),

    /// Worker pool could not be created
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// Malformed upload request
    #[error("Upload error: {0}")]
    Upload(String),

    /// IO error (std::io::Error)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl NotebookError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NoFileSupplied => StatusCode::BAD_REQUEST,
            Self::EmptyDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidPlacement(_) => StatusCode::BAD_REQUEST,
            Self::UnknownStyle(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSpacing(_) => StatusCode::BAD_REQUEST,
            Self::InvalidDocument { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::CompositionFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PdfWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Archive(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::WorkerPool(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upload(_) => StatusCode::BAD_REQUEST,
            Self::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoFileSupplied => "NO_FILE_SUPPLIED",
            Self::EmptyDocument(_) => "EMPTY_DOCUMENT",
            Self::InvalidPlacement(_) => "INVALID_PLACEMENT",
            Self::UnknownStyle(_) => "UNKNOWN_STYLE",
            Self::InvalidSpacing(_) => "INVALID_SPACING",
            Self::InvalidDocument { .. } => "INVALID_DOCUMENT",
            Self::CompositionFailure { .. } => "COMPOSITION_FAILURE",
            Self::PdfWrite(_) => "PDF_WRITE_ERROR",
            Self::Archive(_) => "ARCHIVE_ERROR",
            Self::WorkerPool(_) => "WORKER_POOL_ERROR",
            Self::Upload(_) => "UPLOAD_ERROR",
            Self::IoError(_) => "IO_ERROR",
        }
    }
}

/// Result type alias for notebook operations
pub type NotebookResult<T> = std::result::Result<T, NotebookError>;

impl From<lopdf::Error> for NotebookError {
    fn from(err: lopdf::Error) -> Self {
        NotebookError::PdfWrite(err.to_string())
    }
}

impl From<zip::result::ZipError> for NotebookError {
    fn from(err: zip::result::ZipError) -> Self {
        NotebookError::Archive(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for NotebookError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        NotebookError::WorkerPool(err.to_string())
    }
}
