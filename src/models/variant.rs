// src/models/variant.rs

use serde::{Deserialize, Serialize};

/// A choice as shown on the exam form: display slot letter plus text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayChoice {
    pub letter: String,
    pub text: String,
}

/// A question as it appears inside one exam version: display number,
/// prompt, the four display choices, and both correct letters. When choice
/// shuffling is off the two letters are identical; when it is on,
/// `correct` is the slot whose text equals the originally-correct text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantQuestion {
    /// Position within the version, 1..=40, shown to the student.
    pub number: u8,
    pub prompt: String,
    pub choices: Vec<DisplayChoice>,
    pub original_correct: String,
    pub correct: String,
}

/// One of the four fixed 40-question exams derived from the question pool.
/// Immutable once built; cached for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestVersion {
    pub version: u32,
    pub questions: Vec<VariantQuestion>,
}

/// DTO for sending a question to the exam-taking client (excludes both
/// correct letters; grading happens server side at submit).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub number: u8,
    pub prompt: String,
    pub choices: Vec<DisplayChoice>,
}

impl From<&VariantQuestion> for PublicQuestion {
    fn from(q: &VariantQuestion) -> Self {
        Self {
            number: q.number,
            prompt: q.prompt.clone(),
            choices: q.choices.clone(),
        }
    }
}

/// DTO for a whole version, answers stripped.
#[derive(Debug, Serialize)]
pub struct PublicTestVersion {
    pub version: u32,
    pub questions: Vec<PublicQuestion>,
}

impl From<&TestVersion> for PublicTestVersion {
    fn from(v: &TestVersion) -> Self {
        Self {
            version: v.version,
            questions: v.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}
