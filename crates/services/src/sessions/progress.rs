use finlit_core::model::SessionState;

/// Aggregated view of quiz progress, useful for status lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub score: u32,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn of(state: &SessionState) -> Self {
        let total = state.questions().len();
        let answered = state.scored_indices().len();
        Self {
            total,
            answered,
            remaining: total.saturating_sub(state.question_index()),
            score: state.score(),
            is_complete: state.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finlit_core::model::{Avatar, QuestionDraft, SetupForm};
    use finlit_core::time::fixed_now;

    #[test]
    fn fresh_quiz_has_everything_remaining() {
        let mut state = SessionState::new(fixed_now());
        state.set_avatar(Avatar::emoji("🐨").unwrap()).unwrap();
        let questions = (0..4)
            .map(|i| {
                QuestionDraft::new(format!("Q{i}"), ["a", "b"], "a")
                    .validate()
                    .unwrap()
            })
            .collect();
        state
            .configure(SetupForm::new("Ana", "NZ"), questions, fixed_now())
            .unwrap();

        let progress = SessionProgress::of(&state);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.answered, 0);
        assert_eq!(progress.remaining, 4);
        assert!(!progress.is_complete);
    }
}
