//! Prompt composition: pick the template for an output kind and fill it.
//!
//! Composition is a pure function of its inputs. The lecture text is
//! substituted verbatim, with no escaping or truncation, and is never
//! re-scanned for placeholders.

use crate::config::{OutputKind, SubjectMode};
use crate::prompts::{
    COMPUTER_SCIENCE_FRAGMENT, CONTENT_PLACEHOLDER, EXAM_NOTES_PROMPT, MCQ_PROMPT,
    REVISION_PROMPT, SYSTEM_PROMPT, THEORY_FRAGMENT,
};
use serde::{Deserialize, Serialize};

/// The instructions for one backend call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedPrompt {
    pub system: String,
    pub user: String,
}

impl ComposedPrompt {
    /// The single request text sent to the backend: system and user
    /// instructions joined by a blank line.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Build the prompt for `kind` over `content`.
///
/// `subject` only changes [`OutputKind::ExamNotes`], whose filled template is
/// followed by the subject's style fragment.
pub fn compose(kind: OutputKind, content: &str, subject: SubjectMode) -> ComposedPrompt {
    let mut user = fill(user_template(kind), content);
    if kind == OutputKind::ExamNotes {
        user.push_str(subject_fragment(subject));
    }
    ComposedPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

/// User template for each output kind.
pub fn user_template(kind: OutputKind) -> &'static str {
    match kind {
        OutputKind::ExamNotes => EXAM_NOTES_PROMPT,
        OutputKind::Mcqs => MCQ_PROMPT,
        OutputKind::Revision => REVISION_PROMPT,
    }
}

/// Style fragment for each subject.
pub fn subject_fragment(subject: SubjectMode) -> &'static str {
    match subject {
        SubjectMode::ComputerScience => COMPUTER_SCIENCE_FRAGMENT,
        SubjectMode::Theory => THEORY_FRAGMENT,
    }
}

fn fill(template: &str, content: &str) -> String {
    // `str::replace` walks the template once, so placeholder-like text inside
    // `content` stays literal.
    template.replace(CONTENT_PLACEHOLDER, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHOTO: &str = "Photosynthesis converts light to energy.";

    #[test]
    fn compose_is_deterministic() {
        for kind in OutputKind::CANONICAL {
            for subject in [SubjectMode::ComputerScience, SubjectMode::Theory] {
                assert_eq!(compose(kind, PHOTO, subject), compose(kind, PHOTO, subject));
            }
        }
    }

    #[test]
    fn content_appears_as_contiguous_substring() {
        let content = "Line one\n  indented {braces} and ünïcödé\n\ttab";
        for kind in OutputKind::CANONICAL {
            let p = compose(kind, content, SubjectMode::Theory);
            assert!(p.user.contains(content), "{kind}: content missing");
            assert!(!p.user.contains(CONTENT_PLACEHOLDER));
        }
    }

    #[test]
    fn theory_exam_notes_end_with_theory_fragment() {
        let p = compose(OutputKind::ExamNotes, PHOTO, SubjectMode::Theory);
        assert!(p.user.contains(PHOTO));
        assert!(p.user.ends_with(THEORY_FRAGMENT));
        let content_at = p.user.find(PHOTO).unwrap();
        let fragment_at = p.user.len() - THEORY_FRAGMENT.len();
        assert!(content_at < fragment_at);
    }

    #[test]
    fn subject_only_affects_exam_notes() {
        for kind in [OutputKind::Mcqs, OutputKind::Revision] {
            assert_eq!(
                compose(kind, PHOTO, SubjectMode::Theory),
                compose(kind, PHOTO, SubjectMode::ComputerScience)
            );
            let p = compose(kind, PHOTO, SubjectMode::ComputerScience);
            assert!(!p.user.ends_with(COMPUTER_SCIENCE_FRAGMENT));
        }
        assert_ne!(
            compose(OutputKind::ExamNotes, PHOTO, SubjectMode::Theory),
            compose(OutputKind::ExamNotes, PHOTO, SubjectMode::ComputerScience)
        );
    }

    #[test]
    fn empty_content_is_passed_through() {
        let p = compose(OutputKind::Mcqs, "", SubjectMode::Theory);
        assert_eq!(p.user, MCQ_PROMPT.replace(CONTENT_PLACEHOLDER, ""));
    }

    #[test]
    fn placeholder_inside_content_is_not_expanded() {
        let p = compose(OutputKind::Revision, "see {content}", SubjectMode::Theory);
        assert!(p.user.contains("see {content}"));
        assert_eq!(p.user.matches(CONTENT_PLACEHOLDER).count(), 1);
    }

    #[test]
    fn combined_joins_with_blank_line() {
        let p = compose(OutputKind::Mcqs, PHOTO, SubjectMode::Theory);
        let combined = p.combined();
        assert!(combined.starts_with(SYSTEM_PROMPT));
        assert_eq!(combined, format!("{}\n\n{}", SYSTEM_PROMPT, p.user));
    }
}
