pub mod bank;
pub mod source;

pub use bank::{InMemoryQuestionBank, QuestionFilter, QuestionRecord, QuestionRepository};
pub use source::{QuestionSource, SourceRequest};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Mixed,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    Technical,
    Behavioral,
    Coding,
    SystemDesign,
    MultipleChoice,
}

impl QuestionKind {
    /// Open-ended kinds are judged qualitatively (AI path with fallback);
    /// everything else is scored against the question's own answer key.
    pub fn is_open_ended(&self) -> bool {
        !matches!(self, QuestionKind::MultipleChoice)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Question {
    pub id: String,
    pub content: String,
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    pub category: String,
    /// Hints in reveal order.
    #[serde(default)]
    pub hints: Vec<String>,
    pub suggested_answer: Option<String>,
    pub explanation: Option<String>,
    /// Answer key for closed-form kinds. Compared case-insensitively after
    /// trimming; absent means the question awards participation credit.
    pub correct_answer: Option<String>,
    pub is_ai_generated: bool,
}

impl Question {
    /// Applies the closed-form correctness predicate, if the question has one.
    /// Returns None when there is no answer key to check against.
    pub fn check_answer(&self, answer_text: &str) -> Option<bool> {
        self.correct_answer
            .as_ref()
            .map(|key| sanitize(answer_text) == sanitize(key))
    }
}

fn sanitize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A question as attached to a session: AI-generated questions are ephemeral
/// and carried inline, bank questions are carried by id and resolved through
/// the repository at read time.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "ref", rename_all = "kebab-case")]
pub enum QuestionRef {
    Ephemeral { question: Question },
    Persisted { id: String },
}

impl QuestionRef {
    pub fn question_id(&self) -> &str {
        match self {
            QuestionRef::Ephemeral { question } => &question.id,
            QuestionRef::Persisted { id } => id,
        }
    }
}

/// Client-facing projection of a question. Hidden fields (answer key,
/// suggested answer, explanation) are never echoed; hints are revealed one at
/// a time, so only the count is exposed here.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PublicQuestion {
    pub id: String,
    pub content: String,
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    pub category: String,
    pub hint_count: usize,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        PublicQuestion {
            id: q.id.clone(),
            content: q.content.clone(),
            kind: q.kind,
            difficulty: q.difficulty,
            category: q.category.clone(),
            hint_count: q.hints.len(),
        }
    }
}
