//! Per-request working directory
//!
//! Every conversion request stages its uploads in its own temporary
//! directory. The directory and everything in it is deleted when the
//! [`RequestWorkspace`] is dropped, whichever way the request ends.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

const DIR_PREFIX: &str = "notebook-";

/// Uniquely named scratch directory owned by one request
#[derive(Debug)]
pub struct RequestWorkspace {
    id: Uuid,
    dir: TempDir,
}

impl RequestWorkspace {
    /// Create a fresh workspace below `root`
    pub fn create(root: &Path, id: Uuid) -> io::Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(DIR_PREFIX)
            .tempdir_in(root)?;

        tracing::debug!(request_id = %id, path = %dir.path().display(), "Workspace created");

        Ok(Self { id, dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write an uploaded file into the workspace
    ///
    /// Only the base name of `name` is used, prefixed by the upload index so
    /// that repeated names never overwrite each other. The staged file always
    /// ends in `.pdf`, whatever the client called it, since MuPDF picks its
    /// document handler from the extension.
    pub fn stage_input(&self, index: usize, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let mut file_name = format!("{:03}-{}", index, base_name(name, index));
        if !file_name.to_ascii_lowercase().ends_with(".pdf") {
            file_name.push_str(".pdf");
        }
        let path = self.dir.path().join(file_name);
        fs::write(&path, bytes)?;

        tracing::debug!(
            request_id = %self.id,
            index,
            bytes = bytes.len(),
            path = %path.display(),
            "Staged upload"
        );

        Ok(path)
    }
}

impl Drop for RequestWorkspace {
    fn drop(&mut self) {
        tracing::debug!(request_id = %self.id, "Workspace removed");
    }
}

/// Final path component of a client-supplied file name
///
/// Handles both `/` and `\` separators; falls back to `document-N.pdf`
/// when nothing usable remains.
pub fn base_name(name: &str, index: usize) -> String {
    let base = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        format!("document-{}.pdf", index + 1)
    } else {
        base.to_string()
    }
}
