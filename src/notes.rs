//! Aggregation and the eager entry points.
//!
//! [`aggregate`] is the core: for each requested kind, in canonical order,
//! compose the prompt, call the backend, and append the section text (or
//! the error text) followed by a blank line. A failed section never stops
//! the others.
//!
//! The `generate_notes*` functions wrap it with input acquisition, client
//! construction and DOCX export. Use [`crate::stream::notes_stream`] to
//! receive sections one at a time instead.

use crate::config::{NotesConfig, OutputKind, OutputSelection, SubjectMode};
use crate::error::NotesError;
use crate::output::{NotesOutput, NotesStats, Section, SectionOutcome};
use crate::pipeline::compose::compose;
use crate::pipeline::export;
use crate::pipeline::input::{self, SourceContent};
use crate::pipeline::llm::GenerationClient;
use crate::progress::ProgressCallback;
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Generate every selected section over `content`, one at a time.
///
/// Returns empty output, without calling the backend, when `selection` is
/// empty.
pub async fn aggregate(
    client: &GenerationClient,
    selection: &OutputSelection,
    content: &str,
    subject: SubjectMode,
) -> NotesOutput {
    let start = Instant::now();
    let sections = run_sections(client, selection, content, subject, 1, None).await;
    NotesOutput::from_sections(sections, start.elapsed().as_millis() as u64)
}

/// [`aggregate`] driven by `config`: its selection, subject, concurrency and
/// progress callback.
pub async fn aggregate_with(
    client: &GenerationClient,
    content: &str,
    config: &NotesConfig,
) -> NotesOutput {
    let start = Instant::now();
    let progress = config.progress_callback.as_ref();
    let total = config.outputs.len();

    if let Some(cb) = progress {
        cb.on_run_start(total);
    }

    let sections = run_sections(
        client,
        &config.outputs,
        content,
        config.subject,
        config.concurrency,
        progress,
    )
    .await;

    let output = NotesOutput::from_sections(sections, start.elapsed().as_millis() as u64);

    if let Some(cb) = progress {
        cb.on_run_complete(total, output.stats.generated_sections);
    }
    output
}

/// Compose and generate a single section.
pub async fn generate_section(
    client: &GenerationClient,
    kind: OutputKind,
    content: &str,
    subject: SubjectMode,
) -> Section {
    let prompt = compose(kind, content, subject);
    let start = Instant::now();
    let outcome = match client.generate(&prompt).await {
        Ok(generation) => SectionOutcome::Generated(generation),
        Err(e) => SectionOutcome::Failed(e),
    };
    Section {
        kind,
        outcome,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Run the selected kinds with up to `concurrency` calls in flight.
///
/// `buffered` yields results in input order, so the sections come back in
/// canonical order whatever order the calls finish in.
async fn run_sections(
    client: &GenerationClient,
    selection: &OutputSelection,
    content: &str,
    subject: SubjectMode,
    concurrency: usize,
    progress: Option<&ProgressCallback>,
) -> Vec<Section> {
    let kinds = selection.in_canonical_order();
    let total = kinds.len();
    debug!("Generating {} sections: {:?}", total, kinds);

    stream::iter(kinds.into_iter().enumerate().map(|(i, kind)| async move {
        let index = i + 1;
        if let Some(cb) = progress {
            cb.on_section_start(kind, index, total);
        }
        let section = generate_section(client, kind, content, subject).await;
        if let Some(cb) = progress {
            match &section.outcome {
                SectionOutcome::Generated(g) => {
                    cb.on_section_complete(kind, index, total, g.text.len())
                }
                SectionOutcome::Failed(e) => cb.on_section_error(kind, index, total, &e.to_string()),
            }
        }
        section
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await
}

/// Acquire a lecture file or URL and generate the configured sections.
///
/// # Errors
/// Only fatal input errors (missing file, unsupported extension, failed
/// download). Backend failures end up inside the output as failed sections.
pub async fn generate_notes(
    input_str: impl AsRef<str>,
    config: &NotesConfig,
) -> Result<NotesOutput, NotesError> {
    let input_str = input_str.as_ref();
    info!("Starting notes generation: {}", input_str);
    let source = input::acquire(input_str, config.download_timeout_secs).await?;
    Ok(generate_for_source(source, config).await)
}

/// Same as [`generate_notes`] for an in-memory upload.
///
/// `file_name` supplies the extension that decides how `bytes` are decoded.
pub async fn generate_notes_from_bytes(
    bytes: Vec<u8>,
    file_name: &str,
    config: &NotesConfig,
) -> Result<NotesOutput, NotesError> {
    let source = input::acquire_bytes(bytes, file_name).await?;
    Ok(generate_for_source(source, config).await)
}

/// Generate notes and write them as DOCX to `output_path`.
///
/// Nothing is written when no output kinds are selected.
pub async fn generate_notes_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &NotesConfig,
) -> Result<NotesStats, NotesError> {
    let output = generate_notes(input_str, config).await?;
    if output.is_empty() {
        warn!("No output kinds selected; nothing to write");
        return Ok(output.stats);
    }
    write_docx(output_path, &output.text).await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`generate_notes`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_notes_sync(
    input_str: impl AsRef<str>,
    config: &NotesConfig,
) -> Result<NotesOutput, NotesError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| NotesError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate_notes(input_str, config))
}

/// Export `text` as DOCX and write it to `path`.
///
/// Uses atomic write (temp file in the same directory + rename) to prevent
/// partial files.
pub async fn write_docx(path: impl AsRef<Path>, text: &str) -> Result<(), NotesError> {
    let path = path.as_ref().to_path_buf();
    let bytes = export::export(text)?;

    tokio::task::spawn_blocking(move || {
        let write_err = |source: std::io::Error| NotesError::OutputWriteFailed {
            path: path.clone(),
            source,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => std::path::PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    })
    .await
    .map_err(|e| NotesError::Internal(format!("Write task panicked: {}", e)))?
}

async fn generate_for_source(source: SourceContent, config: &NotesConfig) -> NotesOutput {
    let client = GenerationClient::from_config(config);
    let mut output = aggregate_with(&client, &source.text, config).await;

    info!(
        "Generated {}/{} sections in {}ms",
        output.stats.generated_sections,
        output.stats.requested_sections,
        output.stats.total_duration_ms
    );

    output.source = Some(source.info());
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::output::Generation;
    use crate::pipeline::llm::TextGenerator;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Records every request and answers `out1`, `out2`, … in call order.
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for Recorder {
        async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(prompt.to_string());
            Ok(Generation::text(format!("out{}", calls.len())))
        }
    }

    fn recorder() -> Arc<Recorder> {
        Arc::new(Recorder {
            calls: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn empty_selection_makes_no_calls() {
        let rec = recorder();
        let client = GenerationClient::new(rec.clone());
        let out = aggregate(&client, &OutputSelection::empty(), "x", SubjectMode::Theory).await;
        assert_eq!(out.text, "");
        assert!(out.sections.is_empty());
        assert!(rec.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sections_follow_canonical_order() {
        let rec = recorder();
        let client = GenerationClient::new(rec.clone());
        let selection: OutputSelection = [OutputKind::Revision, OutputKind::ExamNotes]
            .into_iter()
            .collect();

        let out = aggregate(&client, &selection, "light", SubjectMode::Theory).await;

        let kinds: Vec<_> = out.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![OutputKind::ExamNotes, OutputKind::Revision]);
        assert_eq!(out.text, "out1\n\nout2\n\n");

        let calls = rec.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            compose(OutputKind::ExamNotes, "light", SubjectMode::Theory).combined()
        );
        assert_eq!(
            calls[1],
            compose(OutputKind::Revision, "light", SubjectMode::Theory).combined()
        );
    }

    #[tokio::test]
    async fn unusable_client_still_aggregates() {
        let err = GenerationError::ProviderNotConfigured {
            provider: "gemini".into(),
            hint: "Set GEMINI_API_KEY.".into(),
        };
        let client = GenerationClient::unusable(err.clone());
        let selection: OutputSelection = [OutputKind::Mcqs].into_iter().collect();

        let out = aggregate(&client, &selection, "x", SubjectMode::ComputerScience).await;

        assert_eq!(out.text, format!("{err}\n\n"));
        assert_eq!(out.stats.failed_sections, 1);
    }

    #[test]
    fn sync_wrapper_reports_missing_file() {
        let config = NotesConfig::default();
        let err = generate_notes_sync("/no/such/lecture.txt", &config).unwrap_err();
        assert!(matches!(err, NotesError::FileNotFound { .. }));
    }

    #[test]
    fn write_docx_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/exam_notes.docx");
        tokio_test::block_on(write_docx(&path, "a\n\nb")).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
