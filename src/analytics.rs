use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session lifecycle events for external reporting.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SessionEvent {
    Started {
        session_id: String,
        user_id: String,
        total_questions: usize,
        at: DateTime<Utc>,
    },
    Answered {
        session_id: String,
        question_index: usize,
        score: u8,
        at: DateTime<Utc>,
    },
    Completed {
        session_id: String,
        overall_score: u8,
        confidence_score: u8,
        at: DateTime<Utc>,
    },
}

#[async_trait]
pub trait AnalyticsRecorder: Send + Sync {
    async fn record(&self, event: SessionEvent) -> anyhow::Result<()>;
}

/// Default recorder: logs events locally. Deployments swap in a real sink.
pub struct LogRecorder;

#[async_trait]
impl AnalyticsRecorder for LogRecorder {
    async fn record(&self, event: SessionEvent) -> anyhow::Result<()> {
        debug!("📊 Session event: {}", serde_json::to_string(&event)?);
        Ok(())
    }
}

/// Fire-and-forget emit. Recorder failures are logged and dropped; they can
/// never block or fail the request that produced the event.
pub fn emit(recorder: &Arc<dyn AnalyticsRecorder>, event: SessionEvent) {
    let recorder = Arc::clone(recorder);
    tokio::spawn(async move {
        if let Err(e) = recorder.record(event).await {
            warn!("Analytics recorder failed (ignored): {}", e);
        }
    });
}
