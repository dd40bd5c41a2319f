use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::info;

use finlit_core::model::{QuestionRecord, SessionState, SetupForm};
use finlit_core::quiz::QuizSettings;

use crate::error::SessionError;

/// Draw up to `count` distinct questions from `pool` in random order.
pub fn sample_questions<R: Rng + ?Sized>(
    pool: &[QuestionRecord],
    count: usize,
    rng: &mut R,
) -> Vec<QuestionRecord> {
    pool.choose_multiple(rng, count).cloned().collect()
}

/// Turns a submitted setup form into a running quiz.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetupService {
    settings: QuizSettings,
}

impl SetupService {
    #[must_use]
    pub fn new(settings: QuizSettings) -> Self {
        Self { settings }
    }

    /// Validate the form, sample the quiz questions and start the first phase
    /// cycle at `now`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Setup` when the username or avatar is missing or
    /// the session was already set up. The session is left untouched.
    pub fn submit<R: Rng + ?Sized>(
        &self,
        state: &mut SessionState,
        form: SetupForm,
        pool: &[QuestionRecord],
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let count = usize::try_from(self.settings.questions_per_quiz()).unwrap_or(usize::MAX);
        let questions = sample_questions(pool, count, rng);
        state.configure(form, questions, now)?;
        info!(
            session_id = %state.id(),
            questions = state.questions().len(),
            pool = pool.len(),
            "quiz started"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finlit_core::model::{Avatar, QuestionDraft};
    use finlit_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool(n: usize) -> Vec<QuestionRecord> {
        (0..n)
            .map(|i| {
                QuestionDraft::new(format!("Q{i}"), ["yes", "no"], "yes")
                    .validate()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn sample_is_capped_and_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = pool(8);
        let sample = sample_questions(&pool, 5, &mut rng);
        assert_eq!(sample.len(), 5);
        for (i, q) in sample.iter().enumerate() {
            assert!(!sample[..i].contains(q));
        }

        assert_eq!(sample_questions(&pool[..2], 5, &mut rng).len(), 2);
        assert!(sample_questions(&[], 5, &mut rng).is_empty());
    }

    #[test]
    fn submit_without_avatar_is_incomplete() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SessionState::new(fixed_now());
        let err = SetupService::default()
            .submit(&mut state, SetupForm::new("Ana", "NZ"), &pool(3), &mut rng, fixed_now())
            .unwrap_err();
        assert!(err.is_setup_incomplete());
        assert!(!state.is_configured());
    }

    #[test]
    fn submit_starts_quiz_with_configured_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SessionState::new(fixed_now());
        state.set_avatar(Avatar::emoji("🐙").unwrap()).unwrap();
        let settings = QuizSettings::new(5, 5, 120, 3).unwrap();

        SetupService::new(settings)
            .submit(&mut state, SetupForm::new("Ana", "NZ"), &pool(10), &mut rng, fixed_now())
            .unwrap();

        assert!(state.is_configured());
        assert_eq!(state.questions().len(), 3);
        assert_eq!(state.phase_anchor(), fixed_now());
    }
}
