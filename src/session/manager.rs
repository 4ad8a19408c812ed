use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

use super::{
    Answer, AnswerOutcome, CurrentQuestion, Session, SessionStatus, SessionSummary, SessionView,
    SessionStore, StartSessionRequest, StartedSession, SubmitAnswerRequest, UserStats,
};
use crate::ai::{AnswerJudge, QuestionGenerator};
use crate::analytics::{self, AnalyticsRecorder, SessionEvent};
use crate::config::EngineSettings;
use crate::error::{EngineError, Result};
use crate::evaluation::AnswerEvaluator;
use crate::feedback::FeedbackGenerator;
use crate::questions::{
    PublicQuestion, Question, QuestionRef, QuestionRepository, QuestionSource, SourceRequest,
};
use crate::scoring::ScoreAggregator;

/// Owns session lifecycle: question progression, answer ingestion and the
/// completion transition. All collaborators are injected so tests can run
/// against deterministic fakes.
pub struct SessionManager {
    store: Arc<SessionStore>,
    source: QuestionSource,
    evaluator: AnswerEvaluator,
    repository: Arc<dyn QuestionRepository>,
    analytics: Arc<dyn AnalyticsRecorder>,
}

impl SessionManager {
    pub fn new(
        repository: Arc<dyn QuestionRepository>,
        generator: Option<Arc<dyn QuestionGenerator>>,
        judge: Option<Arc<dyn AnswerJudge>>,
        analytics: Arc<dyn AnalyticsRecorder>,
        settings: &EngineSettings,
    ) -> Self {
        let ai_timeout = settings.ai_timeout();
        Self {
            store: Arc::new(SessionStore::new()),
            source: QuestionSource::new(generator, Arc::clone(&repository), ai_timeout),
            evaluator: AnswerEvaluator::new(judge, ai_timeout),
            repository,
            analytics,
        }
    }

    pub async fn start_session(&self, request: StartSessionRequest) -> Result<StartedSession> {
        request
            .validate()
            .map_err(|e| EngineError::InvalidRequest(e.to_string()))?;

        info!(
            "🎬 Starting {:?} session for user {} ({} questions requested)",
            request.session_type, request.user_id, request.question_count
        );

        let questions = self
            .source
            .resolve(&SourceRequest {
                session_type: request.session_type,
                difficulty: request.difficulty,
                company: request.company.clone(),
                role: request.role.clone(),
                count: request.question_count,
                use_ai: request.use_ai,
            })
            .await?;

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: request.user_id.clone(),
            session_type: request.session_type,
            company: request.company,
            role: request.role,
            difficulty: request.difficulty,
            questions,
            answers: Vec::new(),
            status: SessionStatus::InProgress,
            started_at: now,
            completed_at: None,
            last_activity_at: now,
            overall_score: None,
            confidence_score: None,
            feedback: None,
            hints_revealed: 0,
        };

        let first_question = self.resolve_ref(&session.questions[0]).await?;
        let total_questions = session.questions.len();
        let session_id = session.id.clone();

        self.store.insert(session);

        info!("✅ Session {} started with {} questions", session_id, total_questions);
        analytics::emit(
            &self.analytics,
            SessionEvent::Started {
                session_id: session_id.clone(),
                user_id: request.user_id,
                total_questions,
                at: now,
            },
        );

        Ok(StartedSession {
            session_id,
            total_questions,
            first_question: PublicQuestion::from(&first_question),
        })
    }

    pub async fn get_current_question(&self, session_id: &str) -> Result<CurrentQuestion> {
        let entry = self.entry(session_id)?;
        let mut session = entry.lock().await;

        if session.is_finished() {
            return Err(EngineError::SessionAlreadyComplete);
        }
        if session.status != SessionStatus::InProgress {
            return Err(EngineError::NotFound(session_id.to_string()));
        }

        let index = session.current_index();
        let question = self.resolve_ref(&session.questions[index]).await?;
        session.last_activity_at = Utc::now();

        Ok(CurrentQuestion {
            question_index: index,
            total_questions: session.questions.len(),
            elapsed_seconds: (Utc::now() - session.started_at).num_seconds(),
            question: PublicQuestion::from(&question),
        })
    }

    pub async fn submit_answer(
        &self,
        session_id: &str,
        request: SubmitAnswerRequest,
    ) -> Result<AnswerOutcome> {
        request
            .validate()
            .map_err(|e| EngineError::InvalidRequest(e.to_string()))?;
        if request.answer_text.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "answer text must not be empty".to_string(),
            ));
        }

        let entry = self.entry(session_id)?;
        // Held across the evaluation await on purpose: one submission per
        // session at a time, so the answer list index cannot race.
        let mut session = entry.lock().await;

        if session.is_finished() {
            return Err(EngineError::SessionAlreadyComplete);
        }
        if session.status != SessionStatus::InProgress {
            return Err(EngineError::NotFound(session_id.to_string()));
        }

        let index = session.current_index();
        let question = self.resolve_ref(&session.questions[index]).await?;

        info!(
            "📝 Scoring answer {}/{} for session {}",
            index + 1,
            session.questions.len(),
            session_id
        );

        let scored = self
            .evaluator
            .evaluate(
                &question,
                &request.answer_text,
                request.time_spent_seconds,
                request.use_ai,
            )
            .await;

        let answer = Answer {
            question_id: question.id.clone(),
            answer_text: request.answer_text,
            time_spent_seconds: request.time_spent_seconds,
            is_correct: scored.is_correct,
            score: scored.score,
            feedback_text: scored.feedback_text.clone(),
            ai_evaluation: scored.ai_evaluation.clone(),
            hints_used: session.hints_revealed,
        };
        session.answers.push(answer);
        session.hints_revealed = 0;
        session.last_activity_at = Utc::now();

        analytics::emit(
            &self.analytics,
            SessionEvent::Answered {
                session_id: session_id.to_string(),
                question_index: index,
                score: scored.score,
                at: session.last_activity_at,
            },
        );

        if session.is_finished() {
            let summary = self.complete(&mut session);
            return Ok(AnswerOutcome {
                is_correct: scored.is_correct,
                score: scored.score,
                feedback: scored.feedback_text,
                ai_evaluation: scored.ai_evaluation,
                session_complete: true,
                session_summary: Some(summary),
                next_question: None,
            });
        }

        let next = self
            .resolve_ref(&session.questions[session.current_index()])
            .await?;
        Ok(AnswerOutcome {
            is_correct: scored.is_correct,
            score: scored.score,
            feedback: scored.feedback_text,
            ai_evaluation: scored.ai_evaluation,
            session_complete: false,
            session_summary: None,
            next_question: Some(PublicQuestion::from(&next)),
        })
    }

    /// Reveals the next hint for the active question, in authored order.
    /// Returns None once all hints are spent. Revealed hints feed the
    /// confidence penalty when the answer is submitted.
    pub async fn reveal_hint(&self, session_id: &str) -> Result<Option<String>> {
        let entry = self.entry(session_id)?;
        let mut session = entry.lock().await;

        if session.is_finished() {
            return Err(EngineError::SessionAlreadyComplete);
        }
        if session.status != SessionStatus::InProgress {
            return Err(EngineError::NotFound(session_id.to_string()));
        }

        let index = session.current_index();
        let question = self.resolve_ref(&session.questions[index]).await?;
        let revealed = session.hints_revealed as usize;

        session.last_activity_at = Utc::now();
        match question.hints.get(revealed) {
            Some(hint) => {
                session.hints_revealed += 1;
                Ok(Some(hint.clone()))
            }
            None => Ok(None),
        }
    }

    pub async fn get_session(&self, session_id: &str) -> Result<SessionView> {
        let entry = self.entry(session_id)?;
        let session = entry.lock().await;
        Ok(SessionView::from(&*session))
    }

    /// Plain arithmetic over the user's stored sessions; averages cover
    /// completed sessions only.
    pub async fn get_user_stats(&self, user_id: &str) -> UserStats {
        let sessions = self.store.snapshots().await;
        let mine: Vec<&Session> = sessions.iter().filter(|s| s.user_id == user_id).collect();
        let completed: Vec<&&Session> = mine
            .iter()
            .filter(|s| s.status == SessionStatus::Completed)
            .collect();

        let mut stats = UserStats {
            total_sessions: mine.len(),
            completed_sessions: completed.len(),
            questions_answered: mine.iter().map(|s| s.answers.len()).sum(),
            total_time_spent_seconds: mine
                .iter()
                .flat_map(|s| s.answers.iter())
                .map(|a| a.time_spent_seconds as u64)
                .sum(),
            ..UserStats::default()
        };

        if !completed.is_empty() {
            let n = completed.len() as f64;
            stats.average_overall_score = completed
                .iter()
                .filter_map(|s| s.overall_score)
                .map(f64::from)
                .sum::<f64>()
                / n;
            stats.average_confidence_score = completed
                .iter()
                .filter_map(|s| s.confidence_score)
                .map(f64::from)
                .sum::<f64>()
                / n;
        }

        stats
    }

    /// Housekeeping: marks long-idle in-progress sessions abandoned without
    /// touching their recorded answers. Called out-of-band, never from
    /// request paths. Returns the number of sessions swept.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        let threshold = chrono::Duration::from_std(max_idle)
            .unwrap_or_else(|_| chrono::Duration::days(365));
        let now = Utc::now();
        let mut swept = 0;

        for entry in self.store.entries() {
            let mut session = entry.lock().await;
            if session.status == SessionStatus::InProgress
                && now - session.last_activity_at > threshold
            {
                session.status = SessionStatus::Abandoned;
                swept += 1;
                warn!("🧹 Session {} abandoned after idling", session.id);
            }
        }

        if swept > 0 {
            info!("🧹 Swept {} idle sessions", swept);
        }
        swept
    }

    fn entry(&self, session_id: &str) -> Result<Arc<tokio::sync::Mutex<Session>>> {
        self.store
            .get(session_id)
            .ok_or_else(|| EngineError::NotFound(session_id.to_string()))
    }

    async fn resolve_ref(&self, question_ref: &QuestionRef) -> Result<Question> {
        match question_ref {
            QuestionRef::Ephemeral { question } => Ok(question.clone()),
            QuestionRef::Persisted { id } => match self.repository.get(id).await {
                Ok(Some(question)) => Ok(question),
                Ok(None) => Err(EngineError::NotFound(format!("question {}", id))),
                Err(e) => {
                    warn!("Question lookup failed for {}: {}", id, e);
                    Err(EngineError::NotFound(format!("question {}", id)))
                }
            },
        }
    }

    /// Completion transition: aggregate scores, generate feedback, stamp the
    /// completion time. Caller holds the session lock.
    fn complete(&self, session: &mut Session) -> SessionSummary {
        let scores = ScoreAggregator::aggregate(&session.answers);
        let feedback = FeedbackGenerator::generate(&session.answers);
        let now = Utc::now();

        session.status = SessionStatus::Completed;
        session.completed_at = Some(now);
        session.overall_score = Some(scores.overall);
        session.confidence_score = Some(scores.confidence);
        session.feedback = Some(feedback.clone());

        info!(
            "🏁 Session {} completed: overall {} confidence {}",
            session.id, scores.overall, scores.confidence
        );
        analytics::emit(
            &self.analytics,
            SessionEvent::Completed {
                session_id: session.id.clone(),
                overall_score: scores.overall,
                confidence_score: scores.confidence,
                at: now,
            },
        );

        SessionSummary {
            session_id: session.id.clone(),
            total_questions: session.questions.len(),
            overall_score: scores.overall,
            confidence_score: scores.confidence,
            feedback,
            completed_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiEvaluation, GenerationRequest, JudgedAnswer};
    use crate::questions::{
        Difficulty, InMemoryQuestionBank, QuestionKind, QuestionRecord,
    };
    use crate::session::SessionType;
    use async_trait::async_trait;
    use parking_lot::Mutex as SyncMutex;

    struct CapturingRecorder {
        events: SyncMutex<Vec<SessionEvent>>,
    }

    #[async_trait]
    impl AnalyticsRecorder for CapturingRecorder {
        async fn record(&self, event: SessionEvent) -> anyhow::Result<()> {
            self.events.lock().push(event);
            Ok(())
        }
    }

    struct FailingRecorder;

    #[async_trait]
    impl AnalyticsRecorder for FailingRecorder {
        async fn record(&self, _event: SessionEvent) -> anyhow::Result<()> {
            anyhow::bail!("analytics endpoint down")
        }
    }

    struct FixedJudge(u8);

    #[async_trait]
    impl AnswerJudge for FixedJudge {
        async fn judge(&self, _q: &Question, _a: &str) -> anyhow::Result<JudgedAnswer> {
            Ok(JudgedAnswer {
                score: Some(self.0),
                feedback: Some("Solid answer".to_string()),
                evaluation: AiEvaluation {
                    strengths: vec!["clear".to_string()],
                    improvements: vec![],
                    suggestions: vec![],
                },
            })
        }
    }

    struct FixedGenerator(Vec<Question>);

    #[async_trait]
    impl QuestionGenerator for FixedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<Vec<Question>> {
            Ok(self.0.iter().take(request.count as usize).cloned().collect())
        }
    }

    fn question(id: &str, kind: QuestionKind, correct: Option<&str>, hints: &[&str]) -> Question {
        Question {
            id: id.to_string(),
            content: format!("Question {}", id),
            kind,
            difficulty: Difficulty::Medium,
            category: "general".to_string(),
            hints: hints.iter().map(|s| s.to_string()).collect(),
            suggested_answer: None,
            explanation: None,
            correct_answer: correct.map(String::from),
            is_ai_generated: false,
        }
    }

    fn bank_with(questions: Vec<Question>) -> Arc<InMemoryQuestionBank> {
        let bank = InMemoryQuestionBank::new();
        for q in questions {
            bank.insert(QuestionRecord {
                question: q,
                company: None,
                role: None,
                is_active: true,
            });
        }
        Arc::new(bank)
    }

    fn manager(
        bank: Arc<InMemoryQuestionBank>,
        judge: Option<Arc<dyn AnswerJudge>>,
    ) -> SessionManager {
        SessionManager::new(
            bank,
            None,
            judge,
            Arc::new(FailingRecorder),
            &EngineSettings::default(),
        )
    }

    fn start_request(count: u32) -> StartSessionRequest {
        StartSessionRequest {
            user_id: "user-1".to_string(),
            session_type: SessionType::Technical,
            company: None,
            role: None,
            difficulty: Difficulty::Medium,
            question_count: count,
            use_ai: false,
        }
    }

    fn submit(text: &str, secs: u32) -> SubmitAnswerRequest {
        SubmitAnswerRequest {
            answer_text: text.to_string(),
            time_spent_seconds: secs,
            use_ai: false,
        }
    }

    #[tokio::test]
    async fn session_completes_on_last_answer_and_not_before() {
        let bank = bank_with(vec![
            question("q1", QuestionKind::Technical, None, &[]),
            question("q2", QuestionKind::Technical, None, &[]),
            question("q3", QuestionKind::Technical, None, &[]),
        ]);
        let mgr = manager(bank, None);

        let started = mgr.start_session(start_request(3)).await.unwrap();
        assert_eq!(started.total_questions, 3);

        let first = mgr.submit_answer(&started.session_id, submit("a", 30)).await.unwrap();
        assert!(!first.session_complete);
        assert!(first.next_question.is_some());

        let second = mgr.submit_answer(&started.session_id, submit("b", 30)).await.unwrap();
        assert!(!second.session_complete);
        let view = mgr.get_session(&started.session_id).await.unwrap();
        assert_eq!(view.status, SessionStatus::InProgress);

        let third = mgr.submit_answer(&started.session_id, submit("c", 30)).await.unwrap();
        assert!(third.session_complete);
        assert!(third.session_summary.is_some());
        assert!(third.next_question.is_none());

        let view = mgr.get_session(&started.session_id).await.unwrap();
        assert_eq!(view.status, SessionStatus::Completed);
        assert!(view.overall_score.is_some());
        assert!(view.confidence_score.is_some());
        assert!(view.feedback.is_some());
        assert_eq!(view.answered, view.total_questions);
    }

    #[tokio::test]
    async fn two_question_scenario_with_closed_form_cap() {
        // Mixed session so the multiple-choice question passes the kind filter.
        let bank = bank_with(vec![
            question("mc", QuestionKind::MultipleChoice, Some("blue"), &[]),
            question("open", QuestionKind::Behavioral, None, &[]),
        ]);
        let mgr = manager(bank, None);

        let mut request = start_request(2);
        request.session_type = SessionType::Mixed;
        let started = mgr.start_session(request).await.unwrap();
        assert_eq!(started.total_questions, 2);

        // Answer both in drawn order; the draw is random so check by id.
        let mut complete = false;
        let mut saw_capped_mc = false;
        let mut next_id = Some(started.first_question.id.clone());
        for _ in 0..2 {
            let id = next_id.take().unwrap();
            let outcome = if id == "mc" {
                // Correct at 55s: 100 base + 10 bonus must cap at 100.
                let outcome = mgr.submit_answer(&started.session_id, submit("Blue", 55)).await.unwrap();
                assert_eq!(outcome.score, 100);
                assert_eq!(outcome.is_correct, Some(true));
                saw_capped_mc = true;
                outcome
            } else {
                mgr.submit_answer(&started.session_id, submit("I led the migration", 80)).await.unwrap()
            };
            complete = outcome.session_complete;
            next_id = outcome.next_question.map(|q| q.id);
        }

        assert!(saw_capped_mc);
        assert!(complete);
        let view = mgr.get_session(&started.session_id).await.unwrap();
        assert_eq!(view.status, SessionStatus::Completed);
        assert!(view.overall_score.is_some());
        assert!(view.confidence_score.is_some());
        assert!(view.feedback.is_some());
    }

    #[tokio::test]
    async fn invalid_requests_are_rejected() {
        let bank = bank_with(vec![question("q1", QuestionKind::Technical, None, &[])]);
        let mgr = manager(bank, None);

        let err = mgr.start_session(start_request(0)).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));

        let started = mgr.start_session(start_request(1)).await.unwrap();
        let err = mgr
            .submit_answer(&started.session_id, submit("   ", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn large_question_count_is_accepted_and_capped_by_the_bank() {
        // No upper bound on the request; the draw just can't exceed the
        // matching set.
        let bank = bank_with(vec![
            question("q1", QuestionKind::Technical, None, &[]),
            question("q2", QuestionKind::Technical, None, &[]),
        ]);
        let mgr = manager(bank, None);
        let started = mgr.start_session(start_request(100)).await.unwrap();
        assert_eq!(started.total_questions, 2);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let bank = bank_with(vec![]);
        let mgr = manager(bank, None);
        let err = mgr.get_current_question("nope").await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
        let err = mgr.submit_answer("nope", submit("a", 1)).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_bank_is_no_questions_available() {
        let mgr = manager(bank_with(vec![]), None);
        let err = mgr.start_session(start_request(3)).await.unwrap_err();
        assert!(matches!(err, EngineError::NoQuestionsAvailable));
    }

    #[tokio::test]
    async fn completed_session_rejects_further_questions() {
        let bank = bank_with(vec![question("q1", QuestionKind::Technical, None, &[])]);
        let mgr = manager(bank, None);
        let started = mgr.start_session(start_request(1)).await.unwrap();
        mgr.submit_answer(&started.session_id, submit("done", 10)).await.unwrap();

        let err = mgr.get_current_question(&started.session_id).await.unwrap_err();
        assert!(matches!(err, EngineError::SessionAlreadyComplete));
        let err = mgr
            .submit_answer(&started.session_id, submit("again", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::SessionAlreadyComplete));
    }

    #[tokio::test]
    async fn hints_penalize_confidence() {
        let bank = bank_with(vec![question(
            "q1",
            QuestionKind::Technical,
            None,
            &["hint one", "hint two"],
        )]);
        let mgr = manager(bank, None);
        let started = mgr.start_session(start_request(1)).await.unwrap();

        assert_eq!(
            mgr.reveal_hint(&started.session_id).await.unwrap(),
            Some("hint one".to_string())
        );
        assert_eq!(
            mgr.reveal_hint(&started.session_id).await.unwrap(),
            Some("hint two".to_string())
        );
        assert_eq!(mgr.reveal_hint(&started.session_id).await.unwrap(), None);

        let outcome = mgr.submit_answer(&started.session_id, submit("answer", 30)).await.unwrap();
        let summary = outcome.session_summary.unwrap();
        // Fallback answer is correct: 100 + 10 - 2*5 = 100 contribution.
        assert_eq!(summary.confidence_score, 100);
        assert!(summary
            .feedback
            .recommendations
            .iter()
            .any(|s| s.contains("without hints")));
    }

    #[tokio::test]
    async fn ai_generated_sessions_use_ephemeral_questions() {
        let generated = vec![
            question("g1", QuestionKind::Technical, None, &[]),
            question("g2", QuestionKind::Technical, None, &[]),
        ];
        let mgr = SessionManager::new(
            bank_with(vec![]),
            Some(Arc::new(FixedGenerator(generated))),
            Some(Arc::new(FixedJudge(85))),
            Arc::new(FailingRecorder),
            &EngineSettings::default(),
        );

        let mut request = start_request(2);
        request.company = Some("Acme".to_string());
        request.role = Some("SWE".to_string());
        request.use_ai = true;
        let started = mgr.start_session(request).await.unwrap();
        assert_eq!(started.total_questions, 2);

        // Judge scores 85 and the answer is fast: 85 + 10 bonus.
        let outcome = mgr
            .submit_answer(
                &started.session_id,
                SubmitAnswerRequest {
                    answer_text: "detailed answer".to_string(),
                    time_spent_seconds: 60,
                    use_ai: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome.score, 95);
        assert!(outcome.ai_evaluation.is_some());
    }

    #[tokio::test]
    async fn idle_sessions_are_swept_without_losing_answers() {
        let bank = bank_with(vec![
            question("q1", QuestionKind::Technical, None, &[]),
            question("q2", QuestionKind::Technical, None, &[]),
        ]);
        let mgr = manager(bank, None);
        let started = mgr.start_session(start_request(2)).await.unwrap();
        mgr.submit_answer(&started.session_id, submit("first", 20)).await.unwrap();

        // Zero threshold: everything in-progress is idle.
        let swept = mgr.sweep_idle(Duration::from_secs(0)).await;
        assert_eq!(swept, 1);

        let view = mgr.get_session(&started.session_id).await.unwrap();
        assert_eq!(view.status, SessionStatus::Abandoned);
        assert_eq!(view.answered, 1);

        let err = mgr.get_current_question(&started.session_id).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn user_stats_aggregate_completed_sessions() {
        let bank = bank_with(vec![question("q1", QuestionKind::Technical, None, &[])]);
        let mgr = manager(bank, None);

        let s1 = mgr.start_session(start_request(1)).await.unwrap();
        mgr.submit_answer(&s1.session_id, submit("a", 100)).await.unwrap();
        let s2 = mgr.start_session(start_request(1)).await.unwrap();

        let stats = mgr.get_user_stats("user-1").await;
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.completed_sessions, 1);
        assert_eq!(stats.questions_answered, 1);
        assert_eq!(stats.total_time_spent_seconds, 100);
        assert_eq!(stats.average_overall_score, 100.0);

        let stats = mgr.get_user_stats("someone-else").await;
        assert_eq!(stats.total_sessions, 0);

        // s2 left in progress on purpose.
        let view = mgr.get_session(&s2.session_id).await.unwrap();
        assert_eq!(view.status, SessionStatus::InProgress);
    }

    #[tokio::test]
    async fn analytics_events_are_emitted_best_effort() {
        let recorder = Arc::new(CapturingRecorder {
            events: SyncMutex::new(Vec::new()),
        });
        let bank = bank_with(vec![question("q1", QuestionKind::Technical, None, &[])]);
        let mgr = SessionManager::new(
            bank,
            None,
            None,
            Arc::clone(&recorder) as Arc<dyn AnalyticsRecorder>,
            &EngineSettings::default(),
        );

        let started = mgr.start_session(start_request(1)).await.unwrap();
        mgr.submit_answer(&started.session_id, submit("a", 10)).await.unwrap();

        // Events are emitted on spawned tasks; give them a moment to land.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let events = recorder.events.lock();
        assert_eq!(events.len(), 3);
        assert!(events.iter().any(|e| matches!(e, SessionEvent::Started { .. })));
        assert!(events.iter().any(|e| matches!(e, SessionEvent::Answered { .. })));
        assert!(events.iter().any(|e| matches!(e, SessionEvent::Completed { .. })));
    }
}
