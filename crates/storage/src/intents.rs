use finlit_core::model::{IntentDraft, IntentTable};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::repository::{DataSource, StorageError};

#[derive(Debug, Deserialize)]
struct IntentFile {
    intents: Vec<serde_json::Value>,
}

/// Parse a chatbot rule file shaped `{"intents": [{"tag", "patterns", "responses"}]}`.
///
/// Unusable intents are dropped with a warning.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the document itself is not valid.
pub fn parse_intents(raw: &str) -> Result<IntentTable, StorageError> {
    let file: IntentFile =
        serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;

    let mut intents = Vec::with_capacity(file.intents.len());
    for (index, value) in file.intents.into_iter().enumerate() {
        let draft = match serde_json::from_value::<IntentDraft>(value) {
            Ok(draft) => draft,
            Err(err) => {
                warn!(index, "skipping malformed intent: {err}");
                continue;
            }
        };
        match draft.validate() {
            Ok(intent) => intents.push(intent),
            Err(err) => warn!(index, "skipping intent: {err}"),
        }
    }
    Ok(IntentTable::new(intents))
}

/// Read and parse an intent table from `source`.
///
/// # Errors
///
/// Returns `StorageError` if the source cannot be read or parsed.
pub async fn load_intents(source: &dyn DataSource) -> Result<IntentTable, StorageError> {
    let raw = source.read().await?;
    let table = parse_intents(&raw)?;
    debug!(source = %source.key(), count = table.intents().len(), "intents loaded");
    Ok(table)
}
