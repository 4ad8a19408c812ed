use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::ai::{AiEvaluation, AnswerJudge};
use crate::questions::Question;

/// Score at or above which an open-ended answer counts as correct.
const PASSING_SCORE: u8 = 70;
/// Deterministic score used whenever the AI judge is unavailable.
const FALLBACK_SCORE: u8 = 70;

const GENERIC_FEEDBACK: &str =
    "Good answer. Keep practicing to add more depth and concrete examples.";

/// Outcome of scoring one answer. All scores are clamped to 0..=100.
#[derive(Clone, Debug)]
pub struct ScoredAnswer {
    pub score: u8,
    pub is_correct: Option<bool>,
    pub feedback_text: String,
    pub ai_evaluation: Option<AiEvaluation>,
}

/// Scores one answer, dispatching on question kind: open-ended kinds go
/// through the AI judge with a deterministic fallback, closed-form kinds are
/// checked against the question's own answer key.
pub struct AnswerEvaluator {
    open_ended: OpenEndedScoring,
    closed_form: ClosedFormScoring,
}

impl AnswerEvaluator {
    pub fn new(judge: Option<Arc<dyn AnswerJudge>>, ai_timeout: Duration) -> Self {
        Self {
            open_ended: OpenEndedScoring { judge, ai_timeout },
            closed_form: ClosedFormScoring,
        }
    }

    pub async fn evaluate(
        &self,
        question: &Question,
        answer_text: &str,
        time_spent_seconds: u32,
        use_ai: bool,
    ) -> ScoredAnswer {
        let scored = if question.kind.is_open_ended() {
            self.open_ended
                .evaluate(question, answer_text, time_spent_seconds, use_ai)
                .await
        } else {
            self.closed_form
                .evaluate(question, answer_text, time_spent_seconds, use_ai)
                .await
        };
        debug_assert!(scored.score <= 100);
        scored
    }
}

#[async_trait]
trait EvaluationStrategy: Send + Sync {
    async fn evaluate(
        &self,
        question: &Question,
        answer_text: &str,
        time_spent_seconds: u32,
        use_ai: bool,
    ) -> ScoredAnswer;
}

struct OpenEndedScoring {
    judge: Option<Arc<dyn AnswerJudge>>,
    ai_timeout: Duration,
}

impl OpenEndedScoring {
    fn fallback(&self) -> ScoredAnswer {
        ScoredAnswer {
            score: FALLBACK_SCORE,
            is_correct: Some(true),
            feedback_text: GENERIC_FEEDBACK.to_string(),
            ai_evaluation: None,
        }
    }
}

#[async_trait]
impl EvaluationStrategy for OpenEndedScoring {
    async fn evaluate(
        &self,
        question: &Question,
        answer_text: &str,
        time_spent_seconds: u32,
        use_ai: bool,
    ) -> ScoredAnswer {
        let judge = match (&self.judge, use_ai) {
            (Some(judge), true) => judge,
            _ => return self.fallback(),
        };

        let judged = match timeout(self.ai_timeout, judge.judge(question, answer_text)).await {
            Ok(Ok(judged)) => judged,
            Ok(Err(e)) => {
                warn!("AI evaluation failed, using fallback score: {}", e);
                return self.fallback();
            }
            Err(_) => {
                warn!(
                    "AI evaluation timed out after {:?}, using fallback score",
                    self.ai_timeout
                );
                return self.fallback();
            }
        };

        let mut score = judged.score.unwrap_or(FALLBACK_SCORE).min(100);
        // Reward fast, strong answers.
        if score >= 80 && time_spent_seconds < 120 {
            score = (score + 10).min(100);
        }

        info!("🧠 AI scored answer at {}/100", score);

        ScoredAnswer {
            score,
            is_correct: Some(score >= PASSING_SCORE),
            feedback_text: judged.feedback.unwrap_or_else(|| GENERIC_FEEDBACK.to_string()),
            ai_evaluation: Some(judged.evaluation),
        }
    }
}

struct ClosedFormScoring;

#[async_trait]
impl EvaluationStrategy for ClosedFormScoring {
    async fn evaluate(
        &self,
        question: &Question,
        answer_text: &str,
        time_spent_seconds: u32,
        _use_ai: bool,
    ) -> ScoredAnswer {
        // Questions without an answer key award participation credit. Kept as
        // observed product behavior pending confirmation it is intentional.
        let is_correct = question.check_answer(answer_text).unwrap_or(true);

        let score = if is_correct {
            let bonus: u32 = if time_spent_seconds < 60 {
                10
            } else if time_spent_seconds < 120 {
                5
            } else {
                0
            };
            (100u32 + bonus).min(100) as u8
        } else {
            0
        };

        let feedback_text = question
            .explanation
            .clone()
            .or_else(|| question.suggested_answer.clone())
            .unwrap_or_else(|| {
                if is_correct {
                    "Correct!".to_string()
                } else {
                    "That is not the expected answer. Review this topic and try again.".to_string()
                }
            });

        ScoredAnswer {
            score,
            is_correct: Some(is_correct),
            feedback_text,
            ai_evaluation: None,
        }
    }
}
