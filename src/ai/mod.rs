pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::questions::{Difficulty, Question, QuestionKind};

/// Qualitative judgment attached to an AI-scored answer.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AiEvaluation {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Raw result of an AI answer judgment. Missing fields are filled with
/// documented defaults by the evaluator, not here.
#[derive(Clone, Debug, Default)]
pub struct JudgedAnswer {
    pub score: Option<u8>,
    pub feedback: Option<String>,
    pub evaluation: AiEvaluation,
}

/// Parameters for an AI question-generation request.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub kind: Option<QuestionKind>,
    pub difficulty: Difficulty,
    pub company: String,
    pub role: String,
    pub count: u32,
}

/// Generates interview questions. Failures are absorbed by the caller, which
/// falls back to the persisted question bank.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<Vec<Question>>;
}

/// Judges one free-text answer against its question. Failures are absorbed by
/// the caller, which falls back to a deterministic score.
#[async_trait]
pub trait AnswerJudge: Send + Sync {
    async fn judge(&self, question: &Question, answer_text: &str) -> anyhow::Result<JudgedAnswer>;
}
