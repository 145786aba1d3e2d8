//! Pipeline stages for lecture-to-notes generation.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ compose ──▶ llm ──▶ export
//! (path/URL) (text)    (prompt)    (LLM)   (DOCX)
//! ```
//!
//! 1. [`input`]: resolve a path, URL or in-memory upload to bytes and
//!    decode them to text
//! 2. [`extract`]: pull real text out of PDF uploads via pdfium
//! 3. [`compose`]: fill the fixed template for one output kind
//! 4. [`llm`]: send the prompt to the backend; the only stage that talks
//!    to the model
//! 5. [`export`]: write the aggregated text as a one-paragraph-per-line DOCX

pub mod compose;
pub mod export;
pub mod extract;
pub mod input;
pub mod llm;
