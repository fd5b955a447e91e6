//! # Draft Cache
//!
//! Keeps a user's unsubmitted answers per feedback category so they can be
//! resumed later. Drafts never expire; they are overwritten on every save
//! and removed once feedback for the category is submitted.
//!
//! ## Format
//!
//! Drafts are stored as a JSON object (`{"question": "answer"}`), so
//! questions and answers may contain any character. Values written by older
//! clients in the `question:answer;question:answer` form are still read;
//! segments that do not split into exactly two parts are dropped.

use crate::client::error::ClientResult;
use crate::client::local_store::{KeyValueStore, KEY_DRAFT_PREFIX};
use crate::shared::{FeedbackTemplate, SharedError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Answers keyed by question text
pub type DraftAnswers = BTreeMap<String, String>;

#[derive(Clone)]
pub struct DraftCache {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for DraftCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftCache").finish_non_exhaustive()
    }
}

impl DraftCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn save_draft(&self, category: &str, answers: &DraftAnswers) -> ClientResult<()> {
        let encoded = serde_json::to_string(answers)?;
        self.store.set(&draft_key(category), &encoded).await?;
        tracing::debug!("Saved draft for category [{}]: {} answers", category, answers.len());
        Ok(())
    }

    /// Stored answers for `category`; empty when nothing was saved
    pub async fn load_draft(&self, category: &str) -> ClientResult<DraftAnswers> {
        let draft = match self.store.get(&draft_key(category)).await? {
            Some(raw) => decode_draft(&raw),
            None => DraftAnswers::new(),
        };
        tracing::debug!("Loaded draft for category [{}]: {} answers", category, draft.len());
        Ok(draft)
    }

    pub async fn clear_draft(&self, category: &str) -> ClientResult<()> {
        self.store.remove(&draft_key(category)).await?;
        tracing::debug!("Cleared draft for category [{}]", category);
        Ok(())
    }
}

fn draft_key(category: &str) -> String {
    format!("{}{}", KEY_DRAFT_PREFIX, category)
}

/// Decode a stored draft, JSON first, legacy separator form otherwise
pub fn decode_draft(raw: &str) -> DraftAnswers {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
        return map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(answer) => Some((key, answer)),
                _ => None,
            })
            .collect();
    }

    raw.split(';')
        .filter_map(|segment| {
            let parts: Vec<&str> = segment.split(':').collect();
            if parts.len() == 2 {
                Some((parts[0].to_string(), parts[1].to_string()))
            } else {
                None
            }
        })
        .collect()
}

/// Join the answers that belong to `template` into one feedback text
///
/// Answers to questions the template does not contain are ignored. The
/// result reads `question: answer; question: answer` in template order.
pub fn compose_feedback_text(
    template: &FeedbackTemplate,
    answers: &DraftAnswers,
) -> Result<String, SharedError> {
    let parts: Vec<String> = template
        .question_texts()
        .filter_map(|question| {
            answers
                .get(question)
                .filter(|answer| !answer.trim().is_empty())
                .map(|answer| format!("{}: {}", question, answer))
        })
        .collect();

    if parts.is_empty() {
        return Err(SharedError::validation(
            "answers",
            format!("No answers for the questions of category '{}'", template.category),
        ));
    }
    Ok(parts.join("; "))
}
