use std::io::{self, BufRead, Write};
use std::sync::Arc;

use log::info;

use prepmate::questions::{InMemoryQuestionBank, QuestionRecord};
use prepmate::{
    AnswerJudge, Difficulty, EngineSettings, LogRecorder, OpenAiClient, Question, QuestionGenerator,
    QuestionKind, SessionManager, SessionType, StartSessionRequest, SubmitAnswerRequest,
};

fn seed_questions() -> Vec<QuestionRecord> {
    let questions = vec![
        Question {
            id: "seed-ownership".to_string(),
            content: "Explain ownership and borrowing, and why the compiler enforces them."
                .to_string(),
            kind: QuestionKind::Technical,
            difficulty: Difficulty::Medium,
            category: "language-fundamentals".to_string(),
            hints: vec![
                "Think about who frees the memory".to_string(),
                "One mutable reference or many shared ones".to_string(),
            ],
            suggested_answer: None,
            explanation: None,
            correct_answer: None,
            is_ai_generated: false,
        },
        Question {
            id: "seed-complexity".to_string(),
            content: "What is the average-case lookup complexity of a hash map?".to_string(),
            kind: QuestionKind::MultipleChoice,
            difficulty: Difficulty::Easy,
            category: "data-structures".to_string(),
            hints: vec!["Buckets, not comparisons".to_string()],
            suggested_answer: None,
            explanation: Some("Hashing gives amortized constant-time lookups.".to_string()),
            correct_answer: Some("O(1)".to_string()),
            is_ai_generated: false,
        },
        Question {
            id: "seed-deadline".to_string(),
            content: "Tell me about a time you had to ship under a hard deadline.".to_string(),
            kind: QuestionKind::Behavioral,
            difficulty: Difficulty::Medium,
            category: "delivery".to_string(),
            hints: vec![],
            suggested_answer: None,
            explanation: None,
            correct_answer: None,
            is_ai_generated: false,
        },
    ];

    questions
        .into_iter()
        .map(|question| QuestionRecord {
            question,
            company: None,
            role: None,
            is_active: true,
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let settings = EngineSettings::from_env().unwrap_or_default();
    let ai_client = OpenAiClient::from_settings(&settings)?;
    let use_ai = ai_client.is_some();

    let bank = Arc::new(InMemoryQuestionBank::new());
    bank.seed(seed_questions());

    let manager = SessionManager::new(
        bank,
        ai_client
            .clone()
            .map(|c| Arc::new(c) as Arc<dyn QuestionGenerator>),
        ai_client.map(|c| Arc::new(c) as Arc<dyn AnswerJudge>),
        Arc::new(LogRecorder),
        &settings,
    );

    println!("=== PrepMate practice session ===");
    if !use_ai {
        println!("(no API key configured - running with deterministic scoring)");
    }

    let started = manager
        .start_session(StartSessionRequest {
            user_id: "local".to_string(),
            session_type: SessionType::Mixed,
            company: None,
            role: None,
            difficulty: Difficulty::Mixed,
            question_count: 3,
            use_ai,
        })
        .await?;

    info!("Session {} started", started.session_id);

    let stdin = io::stdin();
    let mut question = Some(started.first_question);
    let mut number = 1;

    while let Some(current) = question.take() {
        println!("\nQuestion {}/{}: {}", number, started.total_questions, current.content);
        print!("> ");
        io::stdout().flush()?;

        let mut answer = String::new();
        stdin.lock().read_line(&mut answer)?;
        let answer = answer.trim().to_string();
        if answer.is_empty() {
            println!("(skipping empty answer, try again)");
            question = Some(current);
            continue;
        }

        let outcome = manager
            .submit_answer(
                &started.session_id,
                SubmitAnswerRequest {
                    answer_text: answer,
                    time_spent_seconds: 60,
                    use_ai,
                },
            )
            .await?;

        println!("Score: {}/100 - {}", outcome.score, outcome.feedback);

        if let Some(summary) = outcome.session_summary {
            println!("\n=== Session complete ===");
            println!("Overall score:    {}", summary.overall_score);
            println!("Confidence score: {}", summary.confidence_score);
            for s in &summary.feedback.strengths {
                println!("  + {}", s);
            }
            for s in &summary.feedback.improvements {
                println!("  - {}", s);
            }
            for s in &summary.feedback.recommendations {
                println!("  * {}", s);
            }
        }
        question = outcome.next_question;
        number += 1;
    }

    Ok(())
}
