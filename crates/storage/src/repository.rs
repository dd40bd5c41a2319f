use async_trait::async_trait;
use finlit_core::model::{QuestionDraft, QuestionError, QuestionRecord};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by data sources.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(err.to_string()),
            _ => StorageError::Io(err.to_string()),
        }
    }
}

//
// ─── SOURCES ───────────────────────────────────────────────────────────────────
//

/// Raw text provider for question and intent files.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Stable key used for caching.
    fn key(&self) -> String;

    /// Read the whole source.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source cannot be read.
    async fn read(&self) -> Result<String, StorageError>;
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn key(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn read(&self) -> Result<String, StorageError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

/// Fixed text held in memory, for tests and bundled defaults.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    body: String,
}

impl InMemorySource {
    #[must_use]
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

#[async_trait]
impl DataSource for InMemorySource {
    fn key(&self) -> String {
        format!("memory:{}", self.name)
    }

    async fn read(&self) -> Result<String, StorageError> {
        Ok(self.body.clone())
    }
}

//
// ─── LOAD REPORT ───────────────────────────────────────────────────────────────
//

/// Something that went wrong while loading; never fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadDiagnostic {
    #[error("question source unreadable: {0}")]
    Unreadable(StorageError),

    #[error("question source unparsable: {0}")]
    Unparsable(String),

    #[error("record {index} is malformed: {reason}")]
    Malformed { index: usize, reason: String },

    #[error("record {index} rejected: {error}")]
    Rejected { index: usize, error: QuestionError },
}

/// Valid questions from one source plus everything that was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub questions: Vec<QuestionRecord>,
    pub diagnostics: Vec<LoadDiagnostic>,
}

impl LoadReport {
    fn failed(diagnostic: LoadDiagnostic) -> Self {
        Self {
            questions: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse a question file: either a top-level array of records or an object
/// with a `questions` array. Bad records are reported and skipped.
#[must_use]
pub fn parse_questions(raw: &str) -> LoadReport {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => return LoadReport::failed(LoadDiagnostic::Unparsable(err.to_string())),
    };

    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("questions") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return LoadReport::failed(LoadDiagnostic::Unparsable(
                    "expected a `questions` array".into(),
                ));
            }
        },
        _ => {
            return LoadReport::failed(LoadDiagnostic::Unparsable(
                "expected an array of questions".into(),
            ));
        }
    };

    let mut report = LoadReport::default();
    for (index, item) in items.into_iter().enumerate() {
        let draft = match serde_json::from_value::<QuestionDraft>(item) {
            Ok(draft) => draft,
            Err(err) => {
                report.diagnostics.push(LoadDiagnostic::Malformed {
                    index,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        match draft.validate() {
            Ok(record) => report.questions.push(record),
            Err(error) => report
                .diagnostics
                .push(LoadDiagnostic::Rejected { index, error }),
        }
    }
    report
}

//
// ─── REPOSITORY ────────────────────────────────────────────────────────────────
//

/// Loads and validates question sets, caching each source until invalidated.
#[derive(Clone, Default)]
pub struct QuestionRepository {
    cache: Arc<Mutex<HashMap<String, LoadReport>>>,
}

impl QuestionRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load questions from `source`, serving the cached result when present.
    ///
    /// Never fails: an unreadable or unparsable source yields an empty set with
    /// a diagnostic.
    pub async fn load(&self, source: &dyn DataSource) -> LoadReport {
        let key = source.key();
        if let Some(hit) = self.cached(&key) {
            debug!(source = %key, "question cache hit");
            return hit;
        }

        let report = match source.read().await {
            Ok(raw) => parse_questions(&raw),
            Err(err) => LoadReport::failed(LoadDiagnostic::Unreadable(err)),
        };
        for diagnostic in &report.diagnostics {
            warn!(source = %key, "{diagnostic}");
        }
        debug!(source = %key, count = report.questions.len(), "questions loaded");

        self.lock().insert(key, report.clone());
        report
    }

    /// Drop every cached source so the next `load` re-reads it.
    pub fn invalidate(&self) {
        self.lock().clear();
    }

    /// Drop one source's cached result.
    pub fn invalidate_source(&self, source: &dyn DataSource) {
        self.lock().remove(&source.key());
    }

    fn cached(&self, key: &str) -> Option<LoadReport> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, LoadReport>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
