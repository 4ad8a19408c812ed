use async_trait::async_trait;
use log::info;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Difficulty, Question, QuestionKind};

/// A persisted question plus the targeting metadata used when drawing
/// questions for a session. Company/role are optional on purpose: a record
/// without them matches every company/role filter.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QuestionRecord {
    pub question: Question,
    pub company: Option<String>,
    pub role: Option<String>,
    pub is_active: bool,
}

#[derive(Clone, Debug, Default)]
pub struct QuestionFilter {
    pub kind: Option<QuestionKind>,
    pub difficulty: Difficulty,
    pub company: Option<String>,
    pub role: Option<String>,
}

impl QuestionFilter {
    fn matches(&self, record: &QuestionRecord) -> bool {
        if !record.is_active {
            return false;
        }
        if let Some(kind) = self.kind {
            if record.question.kind != kind {
                return false;
            }
        }
        // A mixed-difficulty session accepts any concrete difficulty.
        if self.difficulty != Difficulty::Mixed && record.question.difficulty != self.difficulty {
            return false;
        }
        loose_match(self.company.as_deref(), record.company.as_deref())
            && loose_match(self.role.as_deref(), record.role.as_deref())
    }
}

/// Case-insensitive substring match where an absent record field matches
/// any filter value.
fn loose_match(filter: Option<&str>, field: Option<&str>) -> bool {
    match (filter, field) {
        (None, _) | (_, None) => true,
        (Some(wanted), Some(actual)) => actual.to_lowercase().contains(&wanted.to_lowercase()),
    }
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn find_matching(&self, filter: &QuestionFilter) -> anyhow::Result<Vec<Question>>;
    async fn get(&self, id: &str) -> anyhow::Result<Option<Question>>;
}

/// In-memory question bank. Durable storage is an integration concern; this
/// implementation backs tests and the demo binary.
#[derive(Default)]
pub struct InMemoryQuestionBank {
    records: RwLock<HashMap<String, QuestionRecord>>,
}

impl InMemoryQuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: QuestionRecord) {
        let mut records = self.records.write();
        records.insert(record.question.id.clone(), record);
    }

    pub fn seed(&self, records: impl IntoIterator<Item = QuestionRecord>) {
        let mut count = 0;
        for record in records {
            self.insert(record);
            count += 1;
        }
        info!("📚 Seeded question bank with {} questions", count);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionBank {
    async fn find_matching(&self, filter: &QuestionFilter) -> anyhow::Result<Vec<Question>> {
        let records = self.records.read();
        Ok(records
            .values()
            .filter(|r| filter.matches(r))
            .map(|r| r.question.clone())
            .collect())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Question>> {
        let records = self.records.read();
        Ok(records.get(id).map(|r| r.question.clone()))
    }
}
