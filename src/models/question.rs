// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::utils::html::decode_entities;

/// Slot letters of a multiple-choice question, in display order.
pub const CHOICE_LETTERS: [&str; 4] = ["A", "B", "C", "D"];

/// One row of the imported question bank table.
/// Column names come from the lecture CSV import and are mapped to field
/// names here so the rest of the crate never touches raw row shapes.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PoolQuestion {
    /// The prompt text. Mapped from the import column 'Text đáp án'.
    #[sqlx(rename = "Text đáp án")]
    pub prompt: String,

    #[sqlx(rename = "Lựa chọn A")]
    pub choice_a: String,

    #[sqlx(rename = "Lựa chọn B")]
    pub choice_b: String,

    #[sqlx(rename = "Lựa chọn C")]
    pub choice_c: String,

    #[sqlx(rename = "Lựa chọn D")]
    pub choice_d: String,

    /// The correct option's slot letter (A-D) as assigned in the bank.
    #[sqlx(rename = "Đáp án đúng")]
    pub correct: String,

    /// Point value as imported ('Điểm'). Carried through verbatim; grading
    /// uses the fixed per-question weight.
    #[sqlx(rename = "Điểm")]
    pub points: String,
}

impl PoolQuestion {
    /// Choice texts in slot order A, B, C, D.
    pub fn choices(&self) -> [&str; 4] {
        [&self.choice_a, &self.choice_b, &self.choice_c, &self.choice_d]
    }

    /// Text of the option stored at `letter`, if the letter is valid.
    pub fn choice_text(&self, letter: &str) -> Option<&str> {
        match letter {
            "A" => Some(&self.choice_a),
            "B" => Some(&self.choice_b),
            "C" => Some(&self.choice_c),
            "D" => Some(&self.choice_d),
            _ => None,
        }
    }

    /// Decode HTML entities in prompt and all four choices. The bank import
    /// escapes these; the exam must show literal characters.
    pub fn decoded(self) -> Self {
        Self {
            prompt: decode_entities(&self.prompt),
            choice_a: decode_entities(&self.choice_a),
            choice_b: decode_entities(&self.choice_b),
            choice_c: decode_entities(&self.choice_c),
            choice_d: decode_entities(&self.choice_d),
            correct: self.correct,
            points: self.points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> PoolQuestion {
        PoolQuestion {
            prompt: "What is &quot;entropy&quot;?".to_string(),
            choice_a: "a &amp; b".to_string(),
            choice_b: "x &lt; y".to_string(),
            choice_c: "&nbsp;kept".to_string(),
            choice_d: "plain".to_string(),
            correct: "B".to_string(),
            points: "0.25".to_string(),
        }
    }

    #[test]
    fn decoded_rewrites_prompt_and_choices() {
        let q = question().decoded();
        assert_eq!(q.prompt, "What is \"entropy\"?");
        assert_eq!(q.choice_a, "a & b");
        assert_eq!(q.choice_b, "x < y");
        assert_eq!(q.choice_c, "&nbsp;kept");
        assert_eq!(q.choice_d, "plain");
        assert_eq!(q.correct, "B");
    }

    #[test]
    fn choice_text_by_letter() {
        let q = question();
        assert_eq!(q.choice_text("A"), Some("a &amp; b"));
        assert_eq!(q.choice_text("D"), Some("plain"));
        assert_eq!(q.choice_text("E"), None);
    }
}
