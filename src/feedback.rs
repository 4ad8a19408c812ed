use serde::{Deserialize, Serialize};

use crate::session::Answer;

/// Qualitative session feedback. Rule-based on purpose: it stays
/// deterministic even when the AI provider is degraded.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SessionFeedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
}

pub struct FeedbackGenerator;

impl FeedbackGenerator {
    pub fn generate(answers: &[Answer]) -> SessionFeedback {
        let mut feedback = SessionFeedback::default();
        if answers.is_empty() {
            return feedback;
        }

        let total = answers.len() as f64;
        let correct = answers
            .iter()
            .filter(|a| a.is_correct == Some(true))
            .count() as f64;
        let accuracy = 100.0 * correct / total;
        let avg_time = answers
            .iter()
            .map(|a| a.time_spent_seconds as f64)
            .sum::<f64>()
            / total;
        let used_hints = answers.iter().any(|a| a.hints_used > 0);

        if accuracy >= 80.0 {
            feedback
                .strengths
                .push("High accuracy across the session".to_string());
        } else if accuracy >= 60.0 {
            feedback
                .strengths
                .push("Good understanding of the material".to_string());
        } else {
            feedback
                .improvements
                .push("Focus on answer accuracy".to_string());
        }

        if avg_time < 120.0 {
            feedback
                .strengths
                .push("Efficient time management".to_string());
        } else if avg_time > 300.0 {
            feedback
                .improvements
                .push("Work on time management - answers took a while".to_string());
        }

        if accuracy < 70.0 {
            feedback
                .recommendations
                .push("Review the fundamentals before your next session".to_string());
        }
        if used_hints {
            feedback
                .recommendations
                .push("Try attempting questions without hints to build confidence".to_string());
        }

        feedback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(is_correct: bool, time_spent_seconds: u32, hints_used: u32) -> Answer {
        Answer {
            question_id: "q".to_string(),
            answer_text: "a".to_string(),
            time_spent_seconds,
            is_correct: Some(is_correct),
            score: 0,
            feedback_text: String::new(),
            ai_evaluation: None,
            hints_used,
        }
    }

    #[test]
    fn strong_fast_session_gets_two_strengths() {
        let answers = vec![answer(true, 60, 0), answer(true, 90, 0)];
        let feedback = FeedbackGenerator::generate(&answers);
        assert_eq!(feedback.strengths.len(), 2);
        assert!(feedback.improvements.is_empty());
        assert!(feedback.recommendations.is_empty());
    }

    #[test]
    fn weak_session_gets_improvement_and_recommendation() {
        let answers = vec![answer(false, 400, 0), answer(false, 400, 0), answer(true, 400, 0)];
        let feedback = FeedbackGenerator::generate(&answers);
        assert!(feedback
            .improvements
            .iter()
            .any(|s| s.contains("accuracy")));
        assert!(feedback
            .improvements
            .iter()
            .any(|s| s.contains("time management")));
        assert!(feedback
            .recommendations
            .iter()
            .any(|s| s.contains("fundamentals")));
    }

    #[test]
    fn mid_accuracy_is_a_strength_not_an_improvement() {
        // 2/3 correct = 67%: "good understanding", but still below the 70%
        // fundamentals threshold.
        let answers = vec![answer(true, 100, 0), answer(true, 100, 0), answer(false, 100, 0)];
        let feedback = FeedbackGenerator::generate(&answers);
        assert!(feedback
            .strengths
            .iter()
            .any(|s| s.contains("Good understanding")));
        assert!(feedback
            .recommendations
            .iter()
            .any(|s| s.contains("fundamentals")));
    }

    #[test]
    fn hint_usage_triggers_recommendation() {
        let answers = vec![answer(true, 60, 2), answer(true, 60, 0)];
        let feedback = FeedbackGenerator::generate(&answers);
        assert!(feedback
            .recommendations
            .iter()
            .any(|s| s.contains("without hints")));
    }

    #[test]
    fn empty_answers_yield_empty_feedback() {
        let feedback = FeedbackGenerator::generate(&[]);
        assert!(feedback.strengths.is_empty());
        assert!(feedback.improvements.is_empty());
        assert!(feedback.recommendations.is_empty());
    }
}
