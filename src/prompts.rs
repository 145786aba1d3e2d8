//! Instruction templates sent to the text-generation backend.
//!
//! Every template lives here so a wording change touches exactly one file
//! and unit tests can inspect the prompts without a live model.
//!
//! The per-kind user templates carry a single [`CONTENT_PLACEHOLDER`] that
//! [`crate::pipeline::compose`] replaces with the lecture text.

/// Marker replaced by the lecture content in every user template.
pub const CONTENT_PLACEHOLDER: &str = "{content}";

/// System instruction shared by every output kind.
pub const SYSTEM_PROMPT: &str = r#"You are an experienced university professor and examiner.

Your task is to convert lecture content into HIGH-SCORING, EXAM-ORIENTED NOTES.

Focus on:
- Frequently asked exam topics
- Clear definitions
- Short and long questions
- Important headings
- Simple language for average students

Ignore unnecessary stories, jokes, repetition, and filler content.

The output must be clean, structured, and easy to revise before exams.

"#;

/// User template for structured exam notes.
pub const EXAM_NOTES_PROMPT: &str = r#"
Convert the following lecture content into EXAM-ORIENTED NOTES.

Rules:
1. Use clear headings and subheadings
2. Highlight important terms and definitions
3. Focus on what is most likely to be asked in exams
4. Keep explanations concise but complete
5. Use bullet points where possible
6. Do NOT add information not present in the lecture

Output Format:

Title: <Topic Name>

1. Important Concepts
- …

2. Key Definitions
- Term: Definition

3. Exam-Important Points
- …

4. Short Questions (2–3 marks)
- …

5. Long Questions (5–10 marks)
- …

Lecture Content:
{content}

"#;

/// User template for multiple-choice questions.
pub const MCQ_PROMPT: &str = r#"Based ONLY on the lecture content below, generate EXAM-STYLE MCQs.

Rules:
- Each MCQ must have 4 options
- Clearly mark the correct answer
- Questions should match university exam difficulty
- Do NOT add information outside the content

Output Format:

Q1. Question?
A)
B)
C)
D)
Correct Answer: X

Lecture Content:
{content}

"#;

/// User template for last-day revision sheets.
pub const REVISION_PROMPT: &str = r#"Create LAST-DAY REVISION NOTES from the content below.

Rules:
- Extremely concise
- Bullet points only
- No explanation longer than 1–2 lines
- Focus only on high-yield exam points

Output Format:

🔹 Key Points
- …

🔹 Definitions
- …

🔹 Formulas / Facts
- …

🔹 Common Exam Questions
- …

Content:
{content}

"#;

/// Style fragment appended to exam notes for computer-science lectures.
pub const COMPUTER_SCIENCE_FRAGMENT: &str = r#"
Explain concepts with technical accuracy but simple language.
Use examples only when they improve understanding.
Avoid unnecessary theory.

"#;

/// Style fragment appended to exam notes for theory-heavy lectures.
pub const THEORY_FRAGMENT: &str = r#"Focus on definitions, structured explanations, and answers suitable for written exams.
Use formal academic tone.
.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_user_template_has_exactly_one_placeholder() {
        for t in [EXAM_NOTES_PROMPT, MCQ_PROMPT, REVISION_PROMPT] {
            assert_eq!(t.matches(CONTENT_PLACEHOLDER).count(), 1);
        }
    }

    #[test]
    fn system_prompt_and_fragments_have_no_placeholder() {
        for t in [SYSTEM_PROMPT, COMPUTER_SCIENCE_FRAGMENT, THEORY_FRAGMENT] {
            assert!(!t.contains(CONTENT_PLACEHOLDER));
        }
    }

    #[test]
    fn mcq_template_asks_for_four_options() {
        assert!(MCQ_PROMPT.contains("4 options"));
        assert!(MCQ_PROMPT.contains("Correct Answer: X"));
    }
}
