use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::{AiEvaluation, AnswerJudge, GenerationRequest, JudgedAnswer, QuestionGenerator};
use crate::config::EngineSettings;
use crate::questions::{Difficulty, Question, QuestionKind};

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// OpenAI-backed question generator and answer judge.
///
/// Every request carries the configured timeout; callers additionally treat
/// any error from this client as a signal to fall back, so a degraded
/// provider can never fail a session.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, settings: &EngineSettings) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(settings.ai_timeout()).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: settings.openai_base_url.clone(),
            model: settings.openai_model.clone(),
        })
    }

    /// Builds a client from settings if an API key is configured.
    pub fn from_settings(settings: &EngineSettings) -> anyhow::Result<Option<Self>> {
        match &settings.openai_api_key {
            Some(key) => Ok(Some(Self::new(key.clone(), settings)?)),
            None => Ok(None),
        }
    }

    async fn chat(&self, prompt: &str, max_tokens: u32) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI API error ({}): {}", status, error_text);
            anyhow::bail!("OpenAI API error: {}", status);
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("No response choices from OpenAI"))?;
        Ok(content)
    }
}

fn kind_label(kind: Option<QuestionKind>) -> &'static str {
    match kind {
        Some(QuestionKind::Technical) => "technical",
        Some(QuestionKind::Behavioral) => "behavioral",
        Some(QuestionKind::Coding) => "coding",
        Some(QuestionKind::SystemDesign) => "system design",
        Some(QuestionKind::MultipleChoice) => "multiple choice",
        None => "mixed (technical and behavioral)",
    }
}

fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "easy",
        Difficulty::Medium => "medium",
        Difficulty::Hard => "hard",
        Difficulty::Mixed => "mixed",
    }
}

#[async_trait]
impl QuestionGenerator for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<Vec<Question>> {
        info!(
            "🤖 Requesting {} AI-generated questions for {} at {}",
            request.count, request.role, request.company
        );

        let prompt = format!(
            "Generate {count} {kind} interview questions ({difficulty} difficulty) \
             for a {role} position at {company}.\n\
             Return a JSON array where each element has fields: \
             \"content\", \"category\", \"hints\" (array of strings), \
             \"suggested_answer\". Return only the JSON array.",
            count = request.count,
            kind = kind_label(request.kind),
            difficulty = difficulty_label(request.difficulty),
            role = request.role,
            company = request.company,
        );

        let body = self.chat(&prompt, 2000).await?;
        let items: Vec<serde_json::Value> = serde_json::from_str(&body)?;

        let kind = request.kind.unwrap_or(QuestionKind::Technical);
        let difficulty = match request.difficulty {
            Difficulty::Mixed => Difficulty::Medium,
            other => other,
        };

        let questions: Vec<Question> = items
            .into_iter()
            .filter_map(|item| {
                let content = item["content"].as_str()?.to_string();
                Some(Question {
                    id: Uuid::new_v4().to_string(),
                    content,
                    kind,
                    difficulty,
                    category: item["category"].as_str().unwrap_or("general").to_string(),
                    hints: item["hints"]
                        .as_array()
                        .map(|arr| {
                            arr.iter()
                                .filter_map(|v| v.as_str().map(String::from))
                                .collect()
                        })
                        .unwrap_or_default(),
                    suggested_answer: item["suggested_answer"].as_str().map(String::from),
                    explanation: None,
                    correct_answer: None,
                    is_ai_generated: true,
                })
            })
            .collect();

        info!("✅ Generated {} questions", questions.len());
        Ok(questions)
    }
}

#[async_trait]
impl AnswerJudge for OpenAiClient {
    async fn judge(&self, question: &Question, answer_text: &str) -> anyhow::Result<JudgedAnswer> {
        let prompt = format!(
            "Evaluate this interview answer.\n\n\
             Question: {}\n\
             Answer: {}\n\n\
             Respond as JSON with fields: \"score\" (0-100), \"feedback\" (string), \
             \"strengths\", \"improvements\", \"suggestions\" (arrays of strings). \
             Return only the JSON object.",
            question.content, answer_text
        );

        let body = self.chat(&prompt, 600).await?;

        // Providers occasionally return prose instead of JSON; treat that as
        // feedback-only rather than an error.
        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => Ok(JudgedAnswer {
                score: json["score"].as_u64().map(|s| s.min(100) as u8),
                feedback: json["feedback"].as_str().map(String::from),
                evaluation: AiEvaluation {
                    strengths: string_array(&json["strengths"]),
                    improvements: string_array(&json["improvements"]),
                    suggestions: string_array(&json["suggestions"]),
                },
            }),
            Err(_) => {
                warn!("AI evaluation was not valid JSON, using raw text as feedback");
                Ok(JudgedAnswer {
                    score: None,
                    feedback: Some(body),
                    evaluation: AiEvaluation::default(),
                })
            }
        }
    }
}

fn string_array(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
