use log::{info, warn};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use super::{Difficulty, QuestionFilter, QuestionKind, QuestionRef, QuestionRepository};
use crate::ai::{GenerationRequest, QuestionGenerator};
use crate::error::{EngineError, Result};
use crate::session::SessionType;

/// AI generation is the expensive, rate-limited path; never ask it for more
/// than this many questions in one session.
const AI_GENERATION_CAP: u32 = 8;

/// Resolves the question list for a new session: AI generation first when it
/// is available and the request is specific enough, otherwise a random draw
/// from the persisted bank.
pub struct QuestionSource {
    generator: Option<Arc<dyn QuestionGenerator>>,
    repository: Arc<dyn QuestionRepository>,
    ai_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct SourceRequest {
    pub session_type: SessionType,
    pub difficulty: Difficulty,
    pub company: Option<String>,
    pub role: Option<String>,
    pub count: u32,
    pub use_ai: bool,
}

fn kind_for(session_type: SessionType) -> Option<QuestionKind> {
    match session_type {
        SessionType::Technical => Some(QuestionKind::Technical),
        SessionType::Behavioral => Some(QuestionKind::Behavioral),
        SessionType::SystemDesign => Some(QuestionKind::SystemDesign),
        // Mixed and company-specific sessions draw across all kinds.
        SessionType::Mixed | SessionType::CompanySpecific => None,
    }
}

impl QuestionSource {
    pub fn new(
        generator: Option<Arc<dyn QuestionGenerator>>,
        repository: Arc<dyn QuestionRepository>,
        ai_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            repository,
            ai_timeout,
        }
    }

    /// Returns 1..=count questions or `NoQuestionsAvailable`. Never errors on
    /// AI failure; that path just falls through to the bank.
    pub async fn resolve(&self, request: &SourceRequest) -> Result<Vec<QuestionRef>> {
        if request.use_ai {
            if let Some(questions) = self.try_generate(request).await {
                return Ok(questions);
            }
        }

        let drawn = self.draw_from_bank(request).await;
        if drawn.is_empty() {
            return Err(EngineError::NoQuestionsAvailable);
        }
        Ok(drawn)
    }

    /// AI path: requires a configured generator plus both company and role,
    /// so the generated questions have enough context to be worth the cost.
    async fn try_generate(&self, request: &SourceRequest) -> Option<Vec<QuestionRef>> {
        let generator = self.generator.as_ref()?;
        let (company, role) = match (&request.company, &request.role) {
            (Some(c), Some(r)) => (c.clone(), r.clone()),
            _ => return None,
        };

        let generation = GenerationRequest {
            kind: kind_for(request.session_type),
            difficulty: request.difficulty,
            company,
            role,
            count: request.count.min(AI_GENERATION_CAP),
        };

        match timeout(self.ai_timeout, generator.generate(&generation)).await {
            Ok(Ok(questions)) if !questions.is_empty() => {
                // Providers do not reliably honor the requested count; enforce
                // it here so the session never exceeds what was asked for.
                let refs: Vec<QuestionRef> = questions
                    .into_iter()
                    .take(generation.count as usize)
                    .map(|mut q| {
                        q.is_ai_generated = true;
                        QuestionRef::Ephemeral { question: q }
                    })
                    .collect();
                info!("✅ Using {} AI-generated questions", refs.len());
                Some(refs)
            }
            Ok(Ok(_)) => {
                warn!("AI generator returned no questions, falling back to question bank");
                None
            }
            Ok(Err(e)) => {
                warn!("AI question generation failed, falling back to question bank: {}", e);
                None
            }
            Err(_) => {
                warn!(
                    "AI question generation timed out after {:?}, falling back to question bank",
                    self.ai_timeout
                );
                None
            }
        }
    }

    async fn draw_from_bank(&self, request: &SourceRequest) -> Vec<QuestionRef> {
        let filter = QuestionFilter {
            kind: kind_for(request.session_type),
            difficulty: request.difficulty,
            company: request.company.clone(),
            role: request.role.clone(),
        };

        let candidates = match self.repository.find_matching(&filter).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Question bank lookup failed: {}", e);
                return Vec::new();
            }
        };

        let mut rng = rand::thread_rng();
        candidates
            .choose_multiple(&mut rng, request.count as usize)
            .map(|q| QuestionRef::Persisted { id: q.id.clone() })
            .collect()
    }
}
