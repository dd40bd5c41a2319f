use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Avatar, QuestionRecord, SessionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetupError {
    #[error("a username is required")]
    MissingUsername,

    #[error("an avatar must be chosen")]
    MissingAvatar,

    #[error("session setup has already been completed")]
    AlreadyConfigured,
}

//
// ─── SETUP ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated setup form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupForm {
    pub username: String,
    pub country: String,
}

impl SetupForm {
    #[must_use]
    pub fn new(username: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            country: country.into(),
        }
    }
}

/// Player identity, fixed once setup succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    username: String,
    country: String,
    avatar: Avatar,
}

impl Profile {
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }
}

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Correct answers over questions asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRatio {
    pub score: u32,
    pub total: u32,
}

impl ScoreRatio {
    /// Fraction in `0.0..=1.0`; an empty quiz counts as `0.0`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total)
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Everything one player's quiz needs across re-invocations of the render loop.
///
/// Setup fields are written once through [`SessionState::configure`]; quiz
/// progress fields are only mutated by the phase engine.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: SessionId,
    pending_avatar: Option<Avatar>,
    profile: Option<Profile>,
    questions: Vec<QuestionRecord>,
    question_index: usize,
    selected_option: Option<String>,
    score: u32,
    scored: BTreeSet<usize>,
    phase_anchor: DateTime<Utc>,
}

impl SessionState {
    #[must_use]
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self::with_id(SessionId::random(), created_at)
    }

    #[must_use]
    pub fn with_id(id: SessionId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            pending_avatar: None,
            profile: None,
            questions: Vec::new(),
            question_index: 0,
            selected_option: None,
            score: 0,
            scored: BTreeSet::new(),
            phase_anchor: created_at,
        }
    }

    /// Record the latest avatar choice made during setup.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::AlreadyConfigured` once setup has completed.
    pub fn set_avatar(&mut self, avatar: Avatar) -> Result<(), SetupError> {
        if self.profile.is_some() {
            return Err(SetupError::AlreadyConfigured);
        }
        self.pending_avatar = Some(avatar);
        Ok(())
    }

    /// Complete setup: freeze the identity and the question sample, and start
    /// the first question's phase cycle at `now`.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::MissingUsername` or `SetupError::MissingAvatar` when
    /// the form is incomplete, and `SetupError::AlreadyConfigured` on a second call.
    pub fn configure(
        &mut self,
        form: SetupForm,
        questions: Vec<QuestionRecord>,
        now: DateTime<Utc>,
    ) -> Result<(), SetupError> {
        if self.profile.is_some() {
            return Err(SetupError::AlreadyConfigured);
        }
        let username = form.username.trim();
        if username.is_empty() {
            return Err(SetupError::MissingUsername);
        }
        let Some(avatar) = self.pending_avatar.clone() else {
            return Err(SetupError::MissingAvatar);
        };

        self.profile = Some(Profile {
            username: username.to_owned(),
            country: form.country.trim().to_owned(),
            avatar,
        });
        self.questions = questions;
        self.question_index = 0;
        self.selected_option = None;
        self.score = 0;
        self.scored.clear();
        self.phase_anchor = now;
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Latest avatar choice, before or after setup.
    #[must_use]
    pub fn avatar(&self) -> Option<&Avatar> {
        match &self.profile {
            Some(profile) => Some(profile.avatar()),
            None => self.pending_avatar.as_ref(),
        }
    }

    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.profile.is_some()
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.questions.get(self.question_index)
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<&str> {
        self.selected_option.as_deref()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Question indices that have already been scored.
    #[must_use]
    pub fn scored_indices(&self) -> &BTreeSet<usize> {
        &self.scored
    }

    #[must_use]
    pub fn phase_anchor(&self) -> DateTime<Utc> {
        self.phase_anchor
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_configured() && self.question_index >= self.questions.len()
    }

    #[must_use]
    pub fn score_ratio(&self) -> ScoreRatio {
        ScoreRatio {
            score: self.score,
            total: u32::try_from(self.questions.len()).unwrap_or(u32::MAX),
        }
    }

    pub(crate) fn select(&mut self, option: String, anchor: DateTime<Utc>) {
        self.selected_option = Some(option);
        self.phase_anchor = anchor;
    }

    /// Score the current question unless it was already scored.
    ///
    /// Returns `Some(correct)` the first time, `None` afterwards.
    pub(crate) fn score_current(&mut self) -> Option<bool> {
        let index = self.question_index;
        let question = self.questions.get(index)?;
        if !self.scored.insert(index) {
            return None;
        }
        let correct = self
            .selected_option
            .as_deref()
            .is_some_and(|selected| question.is_correct(selected));
        if correct {
            self.score = self.score.saturating_add(1);
        }
        Some(correct)
    }

    pub(crate) fn advance(&mut self, now: DateTime<Utc>) {
        self.question_index += 1;
        self.selected_option = None;
        self.phase_anchor = now;
    }
}
