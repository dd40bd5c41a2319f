#![forbid(unsafe_code)]

pub mod intents;
pub mod repository;

pub use intents::{load_intents, parse_intents};
pub use repository::{
    DataSource, FileSource, InMemorySource, LoadDiagnostic, LoadReport, QuestionRepository,
    StorageError, parse_questions,
};
