//! Input acquisition: turn a path, URL or in-memory upload into lecture text.
//!
//! Only `.txt`, `.pdf` and `.mp3` files are accepted; the extension decides
//! how the bytes are decoded:
//!
//! | Format | Decoding |
//! |--------|----------|
//! | Text   | UTF-8, invalid sequences dropped |
//! | Pdf    | pdfium text layer ([`super::extract`]), else as Text |
//! | Audio  | as Text; no transcription is performed |

use crate::error::NotesError;
use crate::output::SourceInfo;
use crate::pipeline::extract;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Accepted lecture file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    Text,
    Pdf,
    Audio,
}

impl InputFormat {
    /// Detect the format from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "txt" => Some(InputFormat::Text),
            "pdf" => Some(InputFormat::Pdf),
            "mp3" => Some(InputFormat::Audio),
            _ => None,
        }
    }
}

/// Decoded lecture content from exactly one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContent {
    pub file_name: String,
    pub format: InputFormat,
    pub text: String,
}

impl SourceContent {
    pub fn info(&self) -> SourceInfo {
        SourceInfo {
            file_name: self.file_name.clone(),
            format: self.format,
            content_len: self.text.len(),
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve a local path or HTTP/HTTPS URL to decoded lecture content.
pub async fn acquire(input: &str, timeout_secs: u64) -> Result<SourceContent, NotesError> {
    let (bytes, file_name) = if is_url(input) {
        download_url(input, timeout_secs).await?
    } else {
        read_local(input).await?
    };
    acquire_bytes(bytes, &file_name).await
}

/// Decode an in-memory upload. `file_name` only supplies the extension.
pub async fn acquire_bytes(bytes: Vec<u8>, file_name: &str) -> Result<SourceContent, NotesError> {
    let format = detect_format(file_name)?;

    let text = match format {
        InputFormat::Text => decode_lossy(&bytes),
        InputFormat::Pdf => extract::pdf_text(bytes).await,
        InputFormat::Audio => {
            warn!(
                "'{}' is audio; transcription is not supported, decoding bytes as text",
                file_name
            );
            decode_lossy(&bytes)
        }
    };

    info!(
        "Acquired '{}' ({:?}, {} bytes of text)",
        file_name,
        format,
        text.len()
    );

    Ok(SourceContent {
        file_name: file_name.to_string(),
        format,
        text,
    })
}

/// Decode bytes as UTF-8, silently dropping invalid sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

fn detect_format(file_name: &str) -> Result<InputFormat, NotesError> {
    InputFormat::from_file_name(file_name).ok_or_else(|| NotesError::UnsupportedFormat {
        name: file_name.to_string(),
    })
}

/// Read a local lecture file, validating its extension first.
async fn read_local(path_str: &str) -> Result<(Vec<u8>, String), NotesError> {
    let path = PathBuf::from(path_str);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path_str.to_string());
    detect_format(&file_name)?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => NotesError::FileNotFound { path: path.clone() },
        std::io::ErrorKind::PermissionDenied => NotesError::PermissionDenied { path: path.clone() },
        _ => NotesError::Internal(format!("Failed to read '{}': {}", path.display(), e)),
    })?;

    debug!("Read local lecture file: {}", path.display());
    Ok((bytes, file_name))
}

/// Download a URL into memory and return its bytes and file name.
async fn download_url(url: &str, timeout_secs: u64) -> Result<(Vec<u8>, String), NotesError> {
    let file_name = extract_filename(url).ok_or_else(|| NotesError::UnsupportedFormat {
        name: url.to_string(),
    })?;
    detect_format(&file_name)?;

    info!("Downloading lecture from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| NotesError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let map_err = |e: reqwest::Error| {
        if e.is_timeout() {
            NotesError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            NotesError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let response = client.get(url).send().await.map_err(map_err)?;

    if !response.status().is_success() {
        return Err(NotesError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response.bytes().await.map_err(map_err)?;
    info!("Downloaded {} bytes", bytes.len());

    Ok((bytes.to_vec(), file_name))
}

/// Last non-empty path segment of the URL, if it names a file.
fn extract_filename(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if last.is_empty() || !last.contains('.') {
        return None;
    }
    Some(last.to_string())
}
