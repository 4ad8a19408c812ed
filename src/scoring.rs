use serde::{Deserialize, Serialize};

use crate::session::Answer;

/// Session-level scores derived from the full answer list.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct SessionScores {
    /// Raw accuracy: percentage of answers marked correct.
    pub overall: u8,
    /// Time- and hint-penalized accuracy.
    pub confidence: u8,
}

pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Both scores are 0 for an empty answer list. Completion requires a full
    /// answer set, so that case is defensive only.
    pub fn aggregate(answers: &[Answer]) -> SessionScores {
        if answers.is_empty() {
            return SessionScores {
                overall: 0,
                confidence: 0,
            };
        }

        let total = answers.len() as f64;
        let correct = answers
            .iter()
            .filter(|a| a.is_correct == Some(true))
            .count() as f64;
        let overall = (100.0 * correct / total).round() as u8;

        let final_sum: i64 = answers.iter().map(final_score).sum();
        // Time bonuses can push the ratio past 1; clamp to the documented range.
        let confidence = (100.0 * final_sum as f64 / (100.0 * total)).round().min(100.0) as u8;

        SessionScores {
            overall,
            confidence,
        }
    }
}

/// Per-answer confidence contribution: correctness base, small bonus for a
/// timely answer, 5-point penalty per hint, floored at zero.
fn final_score(answer: &Answer) -> i64 {
    let base: i64 = if answer.is_correct == Some(true) { 100 } else { 0 };
    let time_bonus: i64 = if answer.time_spent_seconds < 300 { 10 } else { 0 };
    let hint_penalty = 5 * answer.hints_used as i64;
    (base + time_bonus - hint_penalty).max(0)
}
