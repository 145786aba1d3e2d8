//! Streaming API: emit sections as they are generated.
//!
//! Unlike [`crate::notes::generate_notes`], which returns after every
//! section is done, [`notes_stream`] yields each [`Section`] as soon as it
//! and all sections before it are ready. Order is always canonical, even
//! with `concurrency > 1`.

use crate::config::{NotesConfig, OutputSelection, SubjectMode};
use crate::error::NotesError;
use crate::notes::generate_section;
use crate::output::Section;
use crate::pipeline::input;
use crate::pipeline::llm::GenerationClient;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of generated sections.
pub type SectionStream = Pin<Box<dyn Stream<Item = Section> + Send>>;

/// Stream the sections for `selection` over `content`.
pub fn section_stream(
    client: GenerationClient,
    selection: &OutputSelection,
    content: impl Into<Arc<str>>,
    subject: SubjectMode,
    concurrency: usize,
) -> SectionStream {
    let content: Arc<str> = content.into();
    let s = stream::iter(selection.in_canonical_order())
        .map(move |kind| {
            let client = client.clone();
            let content = Arc::clone(&content);
            async move { generate_section(&client, kind, &content, subject).await }
        })
        .buffered(concurrency.max(1));

    Box::pin(s)
}

/// Acquire a lecture file or URL and stream its configured sections.
///
/// # Returns
/// - `Ok(SectionStream)`: one item per selected kind, in canonical order
/// - `Err(NotesError)`: fatal input error (file not found, unsupported type, …)
pub async fn notes_stream(
    input_str: impl AsRef<str>,
    config: &NotesConfig,
) -> Result<SectionStream, NotesError> {
    let input_str = input_str.as_ref();
    info!("Starting streaming generation: {}", input_str);

    let source = input::acquire(input_str, config.download_timeout_secs).await?;
    let client = GenerationClient::from_config(config);

    Ok(section_stream(
        client,
        &config.outputs,
        source.text,
        config.subject,
        config.concurrency,
    ))
}
