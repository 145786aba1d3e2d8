//! PDF text extraction via pdfium.
//!
//! pdfium is bound at runtime: `PDFIUM_LIB_PATH` if set, otherwise the
//! system library search path. When the library is missing, the document
//! is unreadable, or it has no text layer (scanned slides), the raw bytes
//! are decoded like a text file instead so the run still proceeds.
//!
//! pdfium is not async-safe, so extraction runs inside `spawn_blocking`.

use crate::pipeline::input::decode_lossy;
#[cfg(feature = "pdf")]
use std::sync::Arc;
use tracing::warn;

/// Separator placed between the text of consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Extract the text layer of a PDF, falling back to lossy UTF-8 decoding.
#[cfg(feature = "pdf")]
pub async fn pdf_text(bytes: Vec<u8>) -> String {
    let shared = Arc::new(bytes);
    let task_bytes = Arc::clone(&shared);

    let extracted = tokio::task::spawn_blocking(move || extract_blocking(&task_bytes))
        .await
        .map_err(|e| format!("extraction task panicked: {e}"))
        .and_then(|r| r);

    match extracted {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("PDF has no text layer; decoding raw bytes instead");
            decode_lossy(&shared)
        }
        Err(e) => {
            warn!("PDF text extraction failed ({}); decoding raw bytes instead", e);
            decode_lossy(&shared)
        }
    }
}

/// Without the `pdf` feature PDFs are decoded like text files.
#[cfg(not(feature = "pdf"))]
pub async fn pdf_text(bytes: Vec<u8>) -> String {
    warn!("Built without the `pdf` feature; decoding PDF bytes as text");
    decode_lossy(&bytes)
}

#[cfg(feature = "pdf")]
fn extract_blocking(bytes: &[u8]) -> Result<String, String> {
    use pdfium_render::prelude::*;
    use tracing::debug;

    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) if !path.is_empty() => Pdfium::bind_to_library(path),
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| format!("pdfium unavailable: {e:?}"))?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| format!("cannot open PDF: {e:?}"))?;

    let mut pages = Vec::new();
    for (idx, page) in document.pages().iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| format!("page {}: {e:?}", idx + 1))?
            .all();
        debug!("Extracted page {} → {} chars", idx + 1, text.len());
        pages.push(text);
    }

    Ok(pages.join(PAGE_SEPARATOR))
}
