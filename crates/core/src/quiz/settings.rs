use std::time::Duration;

use chrono::TimeDelta;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("answer window must be between 1 and 600 seconds")]
    InvalidCollectSeconds,

    #[error("reveal window must be between 1 and 600 seconds")]
    InvalidRevealSeconds,

    #[error("poll interval must be between 10 and 5000 milliseconds")]
    InvalidPollInterval,

    #[error("questions per quiz must be > 0")]
    InvalidQuestionCount,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Timing and sizing knobs for one quiz run.
///
/// `collect_secs` is how long options stay selectable (T1), `reveal_secs` how
/// long the answer stays on screen (T2). `poll_interval_ms` only paces redraws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    collect_secs: u32,
    reveal_secs: u32,
    poll_interval_ms: u32,
    questions_per_quiz: u32,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            collect_secs: 5,
            reveal_secs: 5,
            poll_interval_ms: 120,
            questions_per_quiz: 5,
        }
    }
}

impl QuizSettings {
    /// # Errors
    ///
    /// Returns `SettingsError` if any value is out of range.
    pub fn new(
        collect_secs: u32,
        reveal_secs: u32,
        poll_interval_ms: u32,
        questions_per_quiz: u32,
    ) -> Result<Self, SettingsError> {
        if !(1..=600).contains(&collect_secs) {
            return Err(SettingsError::InvalidCollectSeconds);
        }
        if !(1..=600).contains(&reveal_secs) {
            return Err(SettingsError::InvalidRevealSeconds);
        }
        if !(10..=5000).contains(&poll_interval_ms) {
            return Err(SettingsError::InvalidPollInterval);
        }
        if questions_per_quiz == 0 {
            return Err(SettingsError::InvalidQuestionCount);
        }

        Ok(Self {
            collect_secs,
            reveal_secs,
            poll_interval_ms,
            questions_per_quiz,
        })
    }

    #[must_use]
    pub fn collect_secs(&self) -> u32 {
        self.collect_secs
    }

    #[must_use]
    pub fn reveal_secs(&self) -> u32 {
        self.reveal_secs
    }

    #[must_use]
    pub fn poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms
    }

    #[must_use]
    pub fn questions_per_quiz(&self) -> u32 {
        self.questions_per_quiz
    }

    /// T1 as a chrono delta.
    #[must_use]
    pub fn collect_window(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.collect_secs))
    }

    /// T2 as a chrono delta.
    #[must_use]
    pub fn reveal_window(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.reveal_secs))
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.poll_interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_quiz_show_pacing() {
        let settings = QuizSettings::default();
        assert_eq!(settings.collect_window(), TimeDelta::seconds(5));
        assert_eq!(settings.reveal_window(), TimeDelta::seconds(5));
        assert_eq!(settings.poll_interval(), Duration::from_millis(120));
        assert_eq!(settings.questions_per_quiz(), 5);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(
            QuizSettings::new(0, 5, 120, 5).unwrap_err(),
            SettingsError::InvalidCollectSeconds
        );
        assert_eq!(
            QuizSettings::new(5, 601, 120, 5).unwrap_err(),
            SettingsError::InvalidRevealSeconds
        );
        assert_eq!(
            QuizSettings::new(5, 5, 5, 5).unwrap_err(),
            SettingsError::InvalidPollInterval
        );
        assert_eq!(
            QuizSettings::new(5, 5, 120, 0).unwrap_err(),
            SettingsError::InvalidQuestionCount
        );
    }
}
