use finlit_core::model::IntentTable;
use rand::seq::IndexedRandom;
use storage::{DataSource, StorageError, load_intents};
use tracing::debug;

/// Reply used when no intent matches.
pub const FALLBACK_RESPONSE: &str =
    "Sorry, I didn't understand that. Try asking about saving, investing, or budgeting.";

/// Answers a free-text finance question.
pub trait ResponseEngine: Send + Sync {
    fn respond(&self, text: &str) -> String;
}

/// Keyword-containment chatbot backed by an intent table.
#[derive(Debug, Clone)]
pub struct IntentResponder {
    table: IntentTable,
    fallback: String,
}

impl IntentResponder {
    #[must_use]
    pub fn new(table: IntentTable) -> Self {
        Self {
            table,
            fallback: FALLBACK_RESPONSE.to_owned(),
        }
    }

    /// Build a responder from an intent rule file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the rule file cannot be read or parsed.
    pub async fn from_source(source: &dyn DataSource) -> Result<Self, StorageError> {
        Ok(Self::new(load_intents(source).await?))
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    #[must_use]
    pub fn table(&self) -> &IntentTable {
        &self.table
    }
}

impl ResponseEngine for IntentResponder {
    fn respond(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return self.fallback.clone();
        }
        let Some(intent) = self.table.find(text) else {
            debug!("no intent matched");
            return self.fallback.clone();
        };
        debug!(tag = intent.tag(), "intent matched");
        intent
            .responses()
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
