//! # lecture2notes
//!
//! Turn lecture material into exam-oriented study notes with a
//! text-generation model, then package the result as a DOCX document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! lecture (.txt / .pdf / .mp3, path or URL)
//!  │
//!  ├─ 1. Input    read or download, decode to text (pdfium for PDFs)
//!  ├─ 2. Compose  fill the fixed template for each requested output kind
//!  ├─ 3. LLM      one backend call per kind (gemini-2.0-flash by default)
//!  ├─ 4. Collect  concatenate sections in canonical order, errors included
//!  └─ 5. Export   one DOCX paragraph per line
//! ```
//!
//! Output kinds always run in the order exam notes → MCQs → revision,
//! whatever order they were requested in. A failed backend call never stops
//! the run: its error message takes the section's place in the notes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lecture2notes::{generate_notes, write_docx, NotesConfig, OutputKind, SubjectMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY from the environment.
//!     let config = NotesConfig::builder()
//!         .subject(SubjectMode::Theory)
//!         .outputs([OutputKind::ExamNotes, OutputKind::Revision])
//!         .build()?;
//!     let output = generate_notes("lecture.txt", &config).await?;
//!     println!("{}", output.text);
//!     write_docx("exam_notes.docx", &output.text).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `lecture2notes` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `pdf`   | on      | Extracts PDF text through pdfium instead of decoding raw bytes |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod notes;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{NotesConfig, NotesConfigBuilder, OutputKind, OutputSelection, SubjectMode};
pub use error::{GenerationError, NotesError};
pub use notes::{
    aggregate, aggregate_with, generate_notes, generate_notes_from_bytes, generate_notes_sync,
    generate_notes_to_file, generate_section, write_docx,
};
pub use output::{Generation, NotesOutput, NotesStats, Section, SectionOutcome, SourceInfo};
pub use pipeline::compose::{compose, ComposedPrompt};
pub use pipeline::export::{export, DEFAULT_FILE_NAME};
pub use pipeline::input::{InputFormat, SourceContent};
pub use pipeline::llm::{GenerationClient, ProviderGenerator, TextGenerator};
pub use progress::{NoopProgressCallback, NotesProgressCallback, ProgressCallback};
pub use stream::{notes_stream, section_stream, SectionStream};
