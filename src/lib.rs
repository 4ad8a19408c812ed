pub mod ai;
pub mod analytics;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod feedback;
pub mod questions;
pub mod scoring;
pub mod session;

pub use ai::{AnswerJudge, OpenAiClient, QuestionGenerator};
pub use analytics::{AnalyticsRecorder, LogRecorder, SessionEvent};
pub use config::EngineSettings;
pub use error::{EngineError, Result};
pub use evaluation::AnswerEvaluator;
pub use feedback::{FeedbackGenerator, SessionFeedback};
pub use questions::{
    Difficulty, InMemoryQuestionBank, PublicQuestion, Question, QuestionKind, QuestionRecord,
    QuestionRepository, QuestionSource,
};
pub use scoring::{ScoreAggregator, SessionScores};
pub use session::{
    AnswerOutcome, SessionManager, SessionStatus, SessionType, StartSessionRequest,
    SubmitAnswerRequest, UserStats,
};
