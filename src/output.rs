//! Result types produced by the notes pipeline.

use crate::config::OutputKind;
use crate::error::GenerationError;
use crate::pipeline::input::InputFormat;
use serde::{Deserialize, Serialize};

/// Separator appended after every section in the aggregated text.
pub const SECTION_SEPARATOR: &str = "\n\n";

/// Text returned by the backend for one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    /// Backend text, verbatim.
    pub text: String,
    /// Prompt tokens reported by the provider (0 when unknown).
    pub input_tokens: usize,
    /// Completion tokens reported by the provider (0 when unknown).
    pub output_tokens: usize,
}

impl Generation {
    /// A generation without token accounting.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            input_tokens: 0,
            output_tokens: 0,
        }
    }
}

/// Outcome of generating one section: the model's answer or why the call failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionOutcome {
    Generated(Generation),
    Failed(GenerationError),
}

/// One generated section of the notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: OutputKind,
    pub outcome: SectionOutcome,
    /// Wall-clock time spent on the backend call.
    pub duration_ms: u64,
}

impl Section {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SectionOutcome::Generated(_))
    }

    /// The text that goes into the aggregated notes: the generated text, or
    /// the error message in its place.
    pub fn display_text(&self) -> String {
        match &self.outcome {
            SectionOutcome::Generated(g) => g.text.clone(),
            SectionOutcome::Failed(e) => e.to_string(),
        }
    }

    pub fn error(&self) -> Option<&GenerationError> {
        match &self.outcome {
            SectionOutcome::Failed(e) => Some(e),
            SectionOutcome::Generated(_) => None,
        }
    }
}

/// Where the lecture content came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub file_name: String,
    pub format: InputFormat,
    /// Decoded content length in bytes.
    pub content_len: usize,
}

/// Aggregate numbers for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesStats {
    pub requested_sections: usize,
    pub generated_sections: usize,
    pub failed_sections: usize,
    pub total_input_tokens: usize,
    pub total_output_tokens: usize,
    pub total_duration_ms: u64,
}

/// Full result of a run: the concatenated notes plus per-section detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesOutput {
    /// Every section's display text followed by [`SECTION_SEPARATOR`], in
    /// canonical order. Empty when no kinds were requested.
    pub text: String,
    pub sections: Vec<Section>,
    /// `None` when aggregation ran on raw content with no acquired file.
    pub source: Option<SourceInfo>,
    pub stats: NotesStats,
}

impl NotesOutput {
    /// Build the output from sections already in canonical order.
    pub fn from_sections(sections: Vec<Section>, total_duration_ms: u64) -> Self {
        let text = assemble_text(&sections);
        let stats = NotesStats {
            requested_sections: sections.len(),
            generated_sections: sections.iter().filter(|s| s.is_success()).count(),
            failed_sections: sections.iter().filter(|s| !s.is_success()).count(),
            total_input_tokens: sections.iter().map(|s| section_tokens(s).0).sum(),
            total_output_tokens: sections.iter().map(|s| section_tokens(s).1).sum(),
            total_duration_ms,
        };
        Self {
            text,
            sections,
            source: None,
            stats,
        }
    }

    /// True when nothing was requested, so there is nothing to export.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Concatenate section texts, each followed by the blank-line separator.
pub fn assemble_text(sections: &[Section]) -> String {
    let mut text = String::new();
    for section in sections {
        text.push_str(&section.display_text());
        text.push_str(SECTION_SEPARATOR);
    }
    text
}

fn section_tokens(section: &Section) -> (usize, usize) {
    match &section.outcome {
        SectionOutcome::Generated(g) => (g.input_tokens, g.output_tokens),
        SectionOutcome::Failed(_) => (0, 0),
    }
}
