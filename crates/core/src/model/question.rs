use serde::Deserialize;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a raw question record is rejected at load time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("question must offer at least one option")]
    NoOptions,

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("option {option:?} appears more than once")]
    DuplicateOption { option: String },

    #[error("answer {answer:?} is not one of the options")]
    AnswerNotInOptions { answer: String },
}

//
// ─── DRAFT (unvalidated input) ─────────────────────────────────────────────────
//

/// Question as it appears in a source file, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            answer: answer.into(),
        }
    }

    /// Check the record's shape and produce a `QuestionRecord`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the question is blank, there are no options,
    /// an option is blank or repeated, or the answer is not among the options.
    pub fn validate(self) -> Result<QuestionRecord, QuestionError> {
        if self.question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        for (index, option) in self.options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption { index });
            }
            if self.options[..index].contains(option) {
                return Err(QuestionError::DuplicateOption {
                    option: option.clone(),
                });
            }
        }
        if !self.options.contains(&self.answer) {
            return Err(QuestionError::AnswerNotInOptions {
                answer: self.answer,
            });
        }

        Ok(QuestionRecord {
            question: self.question,
            options: self.options,
            answer: self.answer,
        })
    }
}

//
// ─── VALIDATED RECORD ──────────────────────────────────────────────────────────
//

/// A multiple-choice question whose answer is guaranteed to be one of its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    question: String,
    options: Vec<String>,
    answer: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
