use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IntentError {
    #[error("intent {tag:?} has no trigger phrases")]
    NoPatterns { tag: String },

    #[error("intent {tag:?} has no responses")]
    NoResponses { tag: String },
}

/// Intent as stored in the chatbot rule file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntentDraft {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub responses: Vec<String>,
}

impl IntentDraft {
    /// Lowercase trigger phrases and drop empty ones. Surrounding spaces are
    /// part of a phrase, so `"hi "` does not match inside "this".
    ///
    /// # Errors
    ///
    /// Returns `IntentError` when no usable pattern or response remains.
    pub fn validate(self) -> Result<Intent, IntentError> {
        let patterns: Vec<String> = self
            .patterns
            .into_iter()
            .map(|p| p.to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        if patterns.is_empty() {
            return Err(IntentError::NoPatterns { tag: self.tag });
        }

        let responses: Vec<String> = self
            .responses
            .into_iter()
            .filter(|r| !r.trim().is_empty())
            .collect();
        if responses.is_empty() {
            return Err(IntentError::NoResponses { tag: self.tag });
        }

        Ok(Intent {
            tag: self.tag,
            patterns,
            responses,
        })
    }
}

/// A named group of trigger phrases and candidate responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    tag: String,
    patterns: Vec<String>,
    responses: Vec<String>,
}

impl Intent {
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Lowercased trigger phrases.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    #[must_use]
    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    /// True if any trigger phrase is contained in the already-lowercased input.
    #[must_use]
    pub fn matches_lowercase(&self, input: &str) -> bool {
        self.patterns.iter().any(|p| input.contains(p.as_str()))
    }
}

/// Ordered rule table; earlier intents win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentTable {
    intents: Vec<Intent>,
}

impl IntentTable {
    #[must_use]
    pub fn new(intents: Vec<Intent>) -> Self {
        Self { intents }
    }

    #[must_use]
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// First intent with a trigger phrase contained in `input`, ignoring case.
    #[must_use]
    pub fn find(&self, input: &str) -> Option<&Intent> {
        let lowered = input.to_lowercase();
        self.intents.iter().find(|i| i.matches_lowercase(&lowered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(tag: &str, patterns: &[&str], responses: &[&str]) -> IntentDraft {
        IntentDraft {
            tag: tag.into(),
            patterns: patterns.iter().map(|s| (*s).to_string()).collect(),
            responses: responses.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn patterns_are_lowercased() {
        let intent = draft("saving", &["How To SAVE", ""], &["Pay yourself first."])
            .validate()
            .unwrap();
        assert_eq!(intent.patterns(), ["how to save"]);
    }

    #[test]
    fn padded_phrase_keeps_its_spaces() {
        let table = IntentTable::new(vec![
            draft("greeting", &["hi "], &["Hello!"]).validate().unwrap(),
        ]);

        assert_eq!(table.intents()[0].patterns(), ["hi "]);
        assert!(table.find("this is fine").is_none());
        assert_eq!(table.find("Hi there").unwrap().tag(), "greeting");
    }

    #[test]
    fn intent_without_responses_is_rejected() {
        let err = draft("empty", &["hello"], &[]).validate().unwrap_err();
        assert!(matches!(err, IntentError::NoResponses { .. }));
    }

    #[test]
    fn find_is_case_insensitive_and_ordered() {
        let table = IntentTable::new(vec![
            draft("budget", &["budget"], &["Try 50/30/20."]).validate().unwrap(),
            draft("invest", &["invest", "budget"], &["Index funds."]).validate().unwrap(),
        ]);

        assert_eq!(table.find("Help me BUDGET").unwrap().tag(), "budget");
        assert_eq!(table.find("should I invest?").unwrap().tag(), "invest");
        assert!(table.find("weather today").is_none());
    }
}
