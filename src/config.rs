//! Configuration types for lecture-to-notes generation.
//!
//! All run behaviour is controlled through [`NotesConfig`], built via its
//! [`NotesConfigBuilder`]. The config is constructed once at start-up and
//! handed to [`crate::pipeline::llm::GenerationClient::from_config`]; there
//! is no process-wide client.

use crate::error::NotesError;
use crate::pipeline::llm::TextGenerator;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Highest number of sections generated at once.
pub const MAX_CONCURRENCY: usize = 3;

/// Provider used when none is configured.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Model identifier used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for one notes-generation run.
///
/// Built via [`NotesConfig::builder()`] or using [`NotesConfig::default()`].
///
/// # Example
/// ```rust
/// use lecture2notes::{NotesConfig, OutputKind, SubjectMode};
///
/// let config = NotesConfig::builder()
///     .subject(SubjectMode::Theory)
///     .outputs([OutputKind::ExamNotes, OutputKind::Mcqs])
///     .model("gemini-2.0-flash")
///     .build()
///     .unwrap();
/// assert_eq!(config.outputs.len(), 2);
/// ```
#[derive(Clone)]
pub struct NotesConfig {
    /// Subject style applied to exam notes. Default: [`SubjectMode::ComputerScience`].
    pub subject: SubjectMode,

    /// Output kinds to generate. Default: exam notes only.
    pub outputs: OutputSelection,

    /// LLM provider name (e.g. "gemini", "openai", "ollama"). Default: "gemini".
    pub provider_name: String,

    /// LLM model identifier. Default: "gemini-2.0-flash".
    pub model: String,

    /// Pre-constructed generation backend. Takes precedence over
    /// `provider_name` / `model`.
    pub generator: Option<Arc<dyn TextGenerator>>,

    /// Sampling temperature. `None` leaves the provider default in place.
    pub temperature: Option<f32>,

    /// Maximum tokens per generated section. `None` leaves the provider default.
    pub max_tokens: Option<usize>,

    /// Number of sections generated at once, 1 to [`MAX_CONCURRENCY`].
    /// Default: 1 (sequential).
    ///
    /// Output order is canonical whatever the value.
    pub concurrency: usize,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-section progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            subject: SubjectMode::default(),
            outputs: OutputSelection::default(),
            provider_name: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            generator: None,
            temperature: None,
            max_tokens: None,
            concurrency: 1,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for NotesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotesConfig")
            .field("subject", &self.subject)
            .field("outputs", &self.outputs)
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("generator", &self.generator.as_ref().map(|_| "<dyn TextGenerator>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("concurrency", &self.concurrency)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl NotesConfig {
    /// Create a new builder for `NotesConfig`.
    pub fn builder() -> NotesConfigBuilder {
        NotesConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`NotesConfig`].
#[derive(Debug)]
pub struct NotesConfigBuilder {
    config: NotesConfig,
}

impl NotesConfigBuilder {
    pub fn subject(mut self, subject: SubjectMode) -> Self {
        self.config.subject = subject;
        self
    }

    pub fn outputs(mut self, kinds: impl IntoIterator<Item = OutputKind>) -> Self {
        self.config.outputs = kinds.into_iter().collect();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<NotesConfig, NotesError> {
        let c = &self.config;
        if c.concurrency == 0 || c.concurrency > MAX_CONCURRENCY {
            return Err(NotesError::InvalidConfig(format!(
                "Concurrency must be 1–{MAX_CONCURRENCY}, got {}",
                c.concurrency
            )));
        }
        if let Some(t) = c.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(NotesError::InvalidConfig(format!(
                    "Temperature must be 0.0–2.0, got {t}"
                )));
            }
        }
        if c.max_tokens == Some(0) {
            return Err(NotesError::InvalidConfig(
                "max_tokens must be ≥ 1 when set".into(),
            ));
        }
        if c.provider_name.trim().is_empty() || c.model.trim().is_empty() {
            return Err(NotesError::InvalidConfig(
                "Provider and model must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Subject style that tunes the exam-notes instructions.
///
/// Only [`OutputKind::ExamNotes`] is affected; MCQs and revision sheets use
/// the same template for every subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubjectMode {
    /// Technical accuracy in simple language, examples only when useful. (default)
    #[default]
    ComputerScience,
    /// Definitions, structured explanations, formal academic tone.
    Theory,
}

/// One kind of study material the pipeline can produce.
///
/// Variant order is the canonical processing order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum OutputKind {
    /// Structured exam notes with definitions and likely questions.
    ExamNotes,
    /// Four-option multiple-choice questions with answers.
    Mcqs,
    /// Last-day revision bullet sheet.
    Revision,
}

impl OutputKind {
    /// Canonical processing order: ExamNotes → Mcqs → Revision.
    pub const CANONICAL: [OutputKind; 3] =
        [OutputKind::ExamNotes, OutputKind::Mcqs, OutputKind::Revision];

    /// Human-readable label, as shown in selection lists.
    pub fn label(self) -> &'static str {
        match self {
            OutputKind::ExamNotes => "Exam Notes",
            OutputKind::Mcqs => "MCQs",
            OutputKind::Revision => "Last-Day Revision",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The set of output kinds requested for a run.
///
/// Selection order and duplicates are irrelevant: iteration always follows
/// [`OutputKind::CANONICAL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSelection(BTreeSet<OutputKind>);

impl Default for OutputSelection {
    fn default() -> Self {
        Self::from_iter([OutputKind::ExamNotes])
    }
}

impl OutputSelection {
    /// A selection with no kinds; aggregating it yields empty output.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Every kind.
    pub fn all() -> Self {
        Self::from_iter(OutputKind::CANONICAL)
    }

    pub fn contains(&self, kind: OutputKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selected kinds in canonical order.
    pub fn in_canonical_order(&self) -> Vec<OutputKind> {
        OutputKind::CANONICAL
            .into_iter()
            .filter(|k| self.contains(*k))
            .collect()
    }
}

impl FromIterator<OutputKind> for OutputSelection {
    fn from_iter<I: IntoIterator<Item = OutputKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = NotesConfig::default();
        assert_eq!(c.model, "gemini-2.0-flash");
        assert_eq!(c.provider_name, "gemini");
        assert_eq!(c.concurrency, 1);
        assert_eq!(c.subject, SubjectMode::ComputerScience);
        assert_eq!(c.outputs.in_canonical_order(), vec![OutputKind::ExamNotes]);
    }

    #[test]
    fn builder_rejects_zero_concurrency() {
        let err = NotesConfig::builder().concurrency(0).build().unwrap_err();
        assert!(err.to_string().contains("Concurrency"));
    }

    #[test]
    fn builder_caps_concurrency() {
        assert!(NotesConfig::builder().concurrency(3).build().is_ok());
        let err = NotesConfig::builder().concurrency(4).build().unwrap_err();
        assert!(matches!(err, NotesError::InvalidConfig(_)));
        assert!(err.to_string().contains("got 4"));
    }

    #[test]
    fn builder_rejects_out_of_range_temperature() {
        assert!(NotesConfig::builder().temperature(2.5).build().is_err());
        assert!(NotesConfig::builder().temperature(0.7).build().is_ok());
    }

    #[test]
    fn builder_rejects_zero_max_tokens() {
        assert!(NotesConfig::builder().max_tokens(0).build().is_err());
    }

    #[test]
    fn selection_iterates_in_canonical_order() {
        let sel: OutputSelection = [OutputKind::Revision, OutputKind::ExamNotes, OutputKind::Revision]
            .into_iter()
            .collect();
        assert_eq!(sel.len(), 2);
        assert_eq!(
            sel.in_canonical_order(),
            vec![OutputKind::ExamNotes, OutputKind::Revision]
        );
    }

    #[test]
    fn empty_selection() {
        let sel = OutputSelection::empty();
        assert!(sel.is_empty());
        assert!(sel.in_canonical_order().is_empty());
    }
}
