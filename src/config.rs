use config::{Config, ConfigError, Environment};
use log::warn;
use serde::Deserialize;
use std::time::Duration;

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_ai_timeout_secs() -> u64 {
    20
}

fn default_question_count() -> u32 {
    10
}

fn default_idle_minutes() -> u64 {
    120
}

/// Engine settings, loaded from `PREPMATE_`-prefixed environment variables
/// (e.g. `PREPMATE_OPENAI_API_KEY`, `PREPMATE_AI_TIMEOUT_SECS`).
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    pub openai_api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_model")]
    pub openai_model: String,
    #[serde(default = "default_ai_timeout_secs")]
    pub ai_timeout_secs: u64,
    #[serde(default = "default_question_count")]
    pub default_question_count: u32,
    /// In-progress sessions idle longer than this are eligible for the
    /// abandoned-session sweep.
    #[serde(default = "default_idle_minutes")]
    pub session_idle_minutes: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: default_base_url(),
            openai_model: default_model(),
            ai_timeout_secs: default_ai_timeout_secs(),
            default_question_count: default_question_count(),
            session_idle_minutes: default_idle_minutes(),
        }
    }
}

impl EngineSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings: EngineSettings = Config::builder()
            .add_source(Environment::with_prefix("PREPMATE"))
            .build()?
            .try_deserialize()?;

        if settings.openai_api_key.is_none() {
            warn!("No OpenAI API key configured - AI features will fall back to deterministic behavior");
        }

        Ok(settings)
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = EngineSettings::default();
        assert_eq!(settings.ai_timeout(), Duration::from_secs(20));
        assert_eq!(settings.default_question_count, 10);
        assert!(settings.openai_api_key.is_none());
    }
}
