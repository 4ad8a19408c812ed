pub mod manager;
pub mod store;

pub use manager::SessionManager;
pub use store::SessionStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ai::AiEvaluation;
use crate::feedback::SessionFeedback;
use crate::questions::{Difficulty, PublicQuestion, QuestionRef};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SessionType {
    Technical,
    Behavioral,
    SystemDesign,
    Mixed,
    CompanySpecific,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

/// One scored answer. Appended exactly once per question, never mutated.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Answer {
    pub question_id: String,
    pub answer_text: String,
    pub time_spent_seconds: u32,
    /// None means correctness is not applicable for this question kind.
    pub is_correct: Option<bool>,
    /// Always within 0..=100.
    pub score: u8,
    pub feedback_text: String,
    pub ai_evaluation: Option<AiEvaluation>,
    pub hints_used: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub session_type: SessionType,
    pub company: Option<String>,
    pub role: Option<String>,
    pub difficulty: Difficulty,
    /// Fixed once the session starts.
    pub questions: Vec<QuestionRef>,
    /// Grows by exactly one per submission, in question order.
    pub answers: Vec<Answer>,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_activity_at: DateTime<Utc>,
    pub overall_score: Option<u8>,
    pub confidence_score: Option<u8>,
    pub feedback: Option<SessionFeedback>,
    /// Hints revealed for the question currently being answered. Folded into
    /// the next Answer on submit, then reset.
    pub hints_revealed: u32,
}

impl Session {
    pub fn is_finished(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.answers.len()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Validate)]
pub struct StartSessionRequest {
    pub user_id: String,
    pub session_type: SessionType,
    pub company: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[validate(range(min = 1))]
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    #[serde(default = "default_true")]
    pub use_ai: bool,
}

fn default_question_count() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone, Debug, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, message = "answer text must not be empty"))]
    pub answer_text: String,
    pub time_spent_seconds: u32,
    #[serde(default = "default_true")]
    pub use_ai: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StartedSession {
    pub session_id: String,
    pub total_questions: usize,
    pub first_question: PublicQuestion,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CurrentQuestion {
    pub question_index: usize,
    pub total_questions: usize,
    pub elapsed_seconds: i64,
    pub question: PublicQuestion,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SessionSummary {
    pub session_id: String,
    pub total_questions: usize,
    pub overall_score: u8,
    pub confidence_score: u8,
    pub feedback: SessionFeedback,
    pub completed_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AnswerOutcome {
    pub is_correct: Option<bool>,
    pub score: u8,
    pub feedback: String,
    pub ai_evaluation: Option<AiEvaluation>,
    pub session_complete: bool,
    pub session_summary: Option<SessionSummary>,
    pub next_question: Option<PublicQuestion>,
}

/// Read-only session snapshot for any status. Question contents are not
/// included; progress and results only.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SessionView {
    pub session_id: String,
    pub user_id: String,
    pub session_type: SessionType,
    pub difficulty: Difficulty,
    pub status: SessionStatus,
    pub total_questions: usize,
    pub answered: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub overall_score: Option<u8>,
    pub confidence_score: Option<u8>,
    pub feedback: Option<SessionFeedback>,
}

impl From<&Session> for SessionView {
    fn from(s: &Session) -> Self {
        SessionView {
            session_id: s.id.clone(),
            user_id: s.user_id.clone(),
            session_type: s.session_type,
            difficulty: s.difficulty,
            status: s.status,
            total_questions: s.questions.len(),
            answered: s.answers.len(),
            started_at: s.started_at,
            completed_at: s.completed_at,
            overall_score: s.overall_score,
            confidence_score: s.confidence_score,
            feedback: s.feedback.clone(),
        }
    }
}

/// Aggregates across one user's completed sessions.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UserStats {
    pub total_sessions: usize,
    pub completed_sessions: usize,
    pub questions_answered: usize,
    pub average_overall_score: f64,
    pub average_confidence_score: f64,
    pub total_time_spent_seconds: u64,
}
