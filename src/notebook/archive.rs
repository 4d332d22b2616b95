//! Response packaging
//!
//! One converted document is returned as-is; several are zipped together.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::error::{NotebookError, NotebookResult};
use super::types::OutputDocument;

/// File name of the multi-document archive
pub const ARCHIVE_NAME: &str = "notebooks.zip";

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// A finished response body
#[derive(Debug)]
pub struct Bundle {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Package converted documents, in the order given
pub fn bundle(mut documents: Vec<OutputDocument>) -> NotebookResult<Bundle> {
    match documents.len() {
        0 => Err(NotebookError::NoFileSupplied),
        1 => {
            let doc = documents.remove(0);
            Ok(Bundle {
                file_name: doc.name,
                content_type: PDF_CONTENT_TYPE,
                bytes: doc.bytes,
            })
        }
        _ => Ok(Bundle {
            file_name: ARCHIVE_NAME.to_string(),
            content_type: ZIP_CONTENT_TYPE,
            bytes: zip_documents(&documents)?,
        }),
    }
}

fn zip_documents(documents: &[OutputDocument]) -> NotebookResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut taken = HashSet::new();
    for doc in documents {
        let entry = unique_name(&doc.name, &mut taken);
        zip.start_file(entry.as_str(), options)?;
        zip.write_all(&doc.bytes)?;
        tracing::debug!(entry = %entry, bytes = doc.bytes.len(), "Added archive entry");
    }

    Ok(zip.finish()?.into_inner())
}

/// `name`, or `stem (n).ext` for the first free `n` when already used
fn unique_name(name: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.to_string()) {
        return name.to_string();
    }

    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };

    let mut n = 2;
    loop {
        let candidate = format!("{} ({}){}", stem, n, ext);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
