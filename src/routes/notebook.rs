//! Notebook conversion endpoint
//!
//! - POST /upload - Convert one or more PDFs, returning a PDF or a zip

use std::path::Path;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::notebook::{
    bundle, Bundle, NotebookError, NotebookOptions, NotebookPipeline, NotebookResult,
    SourceDocument,
};
use crate::state::AppState;
use crate::workspace::{base_name, RequestWorkspace};

// ============================================================================
// Error Response
// ============================================================================

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl IntoResponse for NotebookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "Notebook request failed: {}", self);
        } else {
            tracing::warn!(code = self.code(), "Notebook request rejected: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_notebook))
        .layer(DefaultBodyLimit::max(body_limit))
}

// ============================================================================
// Handlers
// ============================================================================

/// One uploaded file, held in memory until staged
struct Upload {
    name: String,
    data: Vec<u8>,
}

/// POST /upload
///
/// Multipart fields: `pdf` (alias `file`, repeatable), and optional
/// `placement`, `style`, `spacing`.
async fn upload_notebook(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, NotebookError> {
    let request_id = Uuid::new_v4();
    let mut uploads: Vec<Upload> = Vec::new();
    let mut placement = None;
    let mut style = None;
    let mut spacing = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| NotebookError::Upload(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pdf" | "file" => {
                let index = uploads.len();
                let file_name = base_name(field.file_name().unwrap_or(""), index);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| NotebookError::Upload(format!("Failed to read {}: {}", file_name, e)))?;

                tracing::debug!(
                    request_id = %request_id,
                    index,
                    file_name = %file_name,
                    bytes = data.len(),
                    "Received upload"
                );

                uploads.push(Upload {
                    name: file_name,
                    data: data.to_vec(),
                });
            }
            "placement" | "style" | "spacing" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| NotebookError::Upload(format!("Failed to read {}: {}", name, e)))?;
                match name.as_str() {
                    "placement" => placement = Some(value),
                    "style" => style = Some(value),
                    _ => spacing = Some(value),
                }
            }
            other => {
                tracing::debug!(request_id = %request_id, field = %other, "Ignoring multipart field");
            }
        }
    }

    if uploads.is_empty() {
        return Err(NotebookError::NoFileSupplied);
    }

    // Reject bad options before any document is touched
    let options = NotebookOptions::parse(placement.as_deref(), style.as_deref(), spacing.as_deref())?;

    tracing::info!(
        request_id = %request_id,
        files = uploads.len(),
        placement = %options.placement,
        style = %options.style,
        spacing = %options.spacing,
        "Notebook conversion requested"
    );

    let pipeline = state.pipeline().clone();
    let work_dir = state.config().notebook.work_dir.clone();

    let bundle = tokio::task::spawn_blocking(move || {
        convert(&pipeline, &work_dir, request_id, uploads, &options)
    })
    .await
    .map_err(|e| NotebookError::WorkerPool(format!("Conversion task failed: {}", e)))??;

    tracing::info!(
        request_id = %request_id,
        file_name = %bundle.file_name,
        bytes = bundle.bytes.len(),
        "Notebook conversion complete"
    );

    Ok(attachment(bundle))
}

/// Stage, convert and package one request's uploads
///
/// The workspace lives for the duration of this call only.
fn convert(
    pipeline: &NotebookPipeline,
    work_dir: &Path,
    request_id: Uuid,
    uploads: Vec<Upload>,
    options: &NotebookOptions,
) -> NotebookResult<Bundle> {
    let workspace = RequestWorkspace::create(work_dir, request_id)?;

    let sources = uploads
        .into_iter()
        .enumerate()
        .map(|(index, upload)| {
            let path = workspace.stage_input(index, &upload.name, &upload.data)?;
            SourceDocument::from_path(path, upload.name)
        })
        .collect::<NotebookResult<Vec<_>>>()?;

    // First failure in upload order decides the response
    let documents = pipeline
        .process_batch(&sources, options)
        .into_iter()
        .collect::<NotebookResult<Vec<_>>>()?;

    bundle(documents)
}

fn attachment(bundle: Bundle) -> Response {
    let disposition = content_disposition(&bundle.file_name);

    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(bundle.content_type))],
        bundle.bytes,
    )
        .into_response();

    if let Ok(value) = HeaderValue::from_str(&disposition) {
        response.headers_mut().insert(header::CONTENT_DISPOSITION, value);
    }

    response
}

/// `attachment` header with an ASCII fallback and an RFC 5987 UTF-8 name
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}
