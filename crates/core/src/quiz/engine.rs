use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{Profile, SessionState};
use crate::quiz::render::{Annotation, OptionView, Reinvoke, RenderDirective, Tick};
use crate::quiz::{Phase, QuizSettings};
use crate::time::elapsed_since;

/// How far past T1 an early selection pushes the phase anchor.
pub const LOCK_IN_EPSILON_MS: i64 = 1;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("session setup has not been completed")]
    NotConfigured,

    #[error("selections are only accepted while collecting answers (phase: {phase})")]
    NotCollecting { phase: Phase },

    #[error("{option:?} is not an option for the current question")]
    UnknownOption { option: String },

    #[error("option number {index} is out of range")]
    OptionOutOfRange { index: usize },
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Derives the quiz phase from elapsed wall-clock time and applies its effects.
///
/// Every call recomputes the phase from `now - phase_anchor`, so the host may
/// invoke [`QuizPhaseEngine::tick`] as often as it likes: repeated ticks inside
/// the same window render the same thing and score a question at most once.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizPhaseEngine {
    settings: QuizSettings,
}

impl QuizPhaseEngine {
    #[must_use]
    pub fn new(settings: QuizSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Phase the session is in at `now`, without applying any effects.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotConfigured` before setup has completed.
    pub fn phase_at(&self, state: &SessionState, now: DateTime<Utc>) -> Result<Phase, EngineError> {
        if !state.is_configured() {
            return Err(EngineError::NotConfigured);
        }
        if state.is_complete() {
            return Ok(Phase::Complete);
        }
        let elapsed = elapsed_since(state.phase_anchor(), now);
        Ok(Phase::for_elapsed(
            elapsed,
            self.settings.collect_window(),
            self.settings.reveal_window(),
        ))
    }

    /// Evaluate the session at `now`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotConfigured` before setup has completed.
    pub fn tick(&self, state: &mut SessionState, now: DateTime<Utc>) -> Result<Tick, EngineError> {
        let profile = state.profile().cloned().ok_or(EngineError::NotConfigured)?;
        if state.is_complete() {
            return Ok(self.complete(state, &profile));
        }

        let collect = self.settings.collect_window();
        let reveal = self.settings.reveal_window();
        let elapsed = elapsed_since(state.phase_anchor(), now);

        match Phase::for_elapsed(elapsed, collect, reveal) {
            Phase::Collecting => {
                let mut directive = self.directive(state, &profile, Phase::Collecting);
                directive.selectable = true;
                directive.options = self.option_views(state, false);
                directive.progress = fraction(elapsed, collect);
                Ok(Tick {
                    directive,
                    next: Reinvoke::After(self.settings.poll_interval()),
                })
            }
            Phase::Revealing => {
                self.score_once(state);
                let mut directive = self.directive(state, &profile, Phase::Revealing);
                directive.options = self.option_views(state, true);
                directive.progress = fraction(elapsed - collect, reveal);
                Ok(Tick {
                    directive,
                    next: Reinvoke::After(self.settings.poll_interval()),
                })
            }
            Phase::Advancing | Phase::Complete => {
                // A host that slept through the reveal window still owes this
                // question its score.
                self.score_once(state);
                state.advance(now);
                debug!(
                    session_id = %state.id(),
                    index = state.question_index(),
                    "advanced to next question"
                );

                if state.is_complete() {
                    info!(
                        session_id = %state.id(),
                        score = state.score(),
                        total = state.questions().len(),
                        "quiz complete"
                    );
                    return Ok(self.complete(state, &profile));
                }
                Ok(Tick {
                    directive: self.directive(state, &profile, Phase::Advancing),
                    next: Reinvoke::Immediate,
                })
            }
        }
    }

    /// Lock in `option` for the current question.
    ///
    /// The phase anchor is moved so that the next tick lands just past T1: the
    /// remaining answer time is skipped but the reveal is still shown.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotCollecting` outside the answer window and
    /// `EngineError::UnknownOption` if `option` is not offered.
    pub fn select(
        &self,
        state: &mut SessionState,
        option: &str,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let phase = self.phase_at(state, now)?;
        if phase != Phase::Collecting {
            return Err(EngineError::NotCollecting { phase });
        }
        let offered = state
            .current_question()
            .is_some_and(|question| question.offers(option));
        if !offered {
            return Err(EngineError::UnknownOption {
                option: option.to_owned(),
            });
        }

        let anchor =
            now - self.settings.collect_window() - TimeDelta::milliseconds(LOCK_IN_EPSILON_MS);
        state.select(option.to_owned(), anchor);
        debug!(session_id = %state.id(), index = state.question_index(), "answer locked in");
        Ok(())
    }

    /// Lock in the option at zero-based `index` of the current question.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::OptionOutOfRange` for an index past the options,
    /// otherwise the same errors as [`QuizPhaseEngine::select`].
    pub fn select_index(
        &self,
        state: &mut SessionState,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let phase = self.phase_at(state, now)?;
        if phase != Phase::Collecting {
            return Err(EngineError::NotCollecting { phase });
        }
        let option = state
            .current_question()
            .and_then(|question| question.options().get(index))
            .cloned()
            .ok_or(EngineError::OptionOutOfRange { index })?;
        self.select(state, &option, now)
    }

    fn score_once(&self, state: &mut SessionState) {
        if let Some(correct) = state.score_current() {
            debug!(
                session_id = %state.id(),
                index = state.question_index(),
                correct,
                score = state.score(),
                "question scored"
            );
        }
    }

    fn complete(&self, state: &SessionState, profile: &Profile) -> Tick {
        let mut directive = self.directive(state, profile, Phase::Complete);
        directive.progress = 1.0;
        Tick {
            directive,
            next: Reinvoke::Stop,
        }
    }

    fn directive(&self, state: &SessionState, profile: &Profile, phase: Phase) -> RenderDirective {
        let question = match phase {
            Phase::Collecting | Phase::Revealing => state
                .current_question()
                .map(|question| question.question().to_owned()),
            Phase::Advancing | Phase::Complete => None,
        };
        RenderDirective {
            phase,
            question,
            options: Vec::new(),
            selectable: false,
            selected: state.selected_option().map(str::to_owned),
            progress: 0.0,
            ratio: state.score_ratio(),
            index: state.question_index(),
            avatar: profile.avatar().clone(),
            username: profile.username().to_owned(),
            country: profile.country().to_owned(),
        }
    }

    fn option_views(&self, state: &SessionState, annotate: bool) -> Vec<OptionView> {
        let Some(question) = state.current_question() else {
            return Vec::new();
        };
        let selected = state.selected_option();
        question
            .options()
            .iter()
            .map(|text| OptionView {
                text: text.clone(),
                annotation: annotate.then(|| Annotation {
                    correct: question.is_correct(text),
                    selected: selected == Some(text.as_str()),
                }),
            })
            .collect()
    }
}

#[allow(clippy::cast_precision_loss)]
fn fraction(part: TimeDelta, whole: TimeDelta) -> f64 {
    let whole = whole.num_milliseconds();
    if whole <= 0 {
        return 1.0;
    }
    (part.num_milliseconds() as f64 / whole as f64).clamp(0.0, 1.0)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Avatar, QuestionDraft, QuestionRecord, SetupForm};
    use crate::time::fixed_now;

    fn question(n: usize) -> QuestionRecord {
        QuestionDraft::new(format!("Question {n}"), ["right", "wrong"], "right")
            .validate()
            .unwrap()
    }

    fn session(count: usize) -> SessionState {
        let mut state = SessionState::new(fixed_now());
        state.set_avatar(Avatar::emoji("🦉").unwrap()).unwrap();
        state
            .configure(
                SetupForm::new("Ana", "Portugal"),
                (0..count).map(question).collect(),
                fixed_now(),
            )
            .unwrap();
        state
    }

    fn at(millis: i64) -> DateTime<Utc> {
        fixed_now() + TimeDelta::milliseconds(millis)
    }

    #[test]
    fn collecting_window_accepts_selection() {
        let engine = QuizPhaseEngine::default();
        let mut state = session(1);

        for millis in [0, 1_000, 4_999] {
            let tick = engine.tick(&mut state, at(millis)).unwrap();
            assert_eq!(tick.phase(), Phase::Collecting);
            assert!(tick.directive.selectable);
            assert_eq!(tick.directive.question.as_deref(), Some("Question 0"));
            assert!(tick.directive.options.iter().all(|o| o.annotation.is_none()));
            assert_eq!(tick.next, Reinvoke::After(engine.settings().poll_interval()));
        }

        engine.select(&mut state, "wrong", at(4_999)).unwrap();
        assert_eq!(state.selected_option(), Some("wrong"));
    }

    #[test]
    fn revealing_scores_at_most_once() {
        let engine = QuizPhaseEngine::default();
        let mut state = session(2);
        engine.select(&mut state, "right", at(500)).unwrap();

        for millis in [500, 600, 3_000, 5_400] {
            let tick = engine.tick(&mut state, at(millis)).unwrap();
            assert_eq!(tick.phase(), Phase::Revealing);
            assert!(!tick.directive.selectable);
        }
        assert_eq!(state.score(), 1);
        assert!(state.scored_indices().contains(&0));
    }

    #[test]
    fn same_now_gives_same_output() {
        let engine = QuizPhaseEngine::default();
        let mut state = session(1);
        engine.select(&mut state, "right", at(2_000)).unwrap();

        let first = engine.tick(&mut state, at(3_000)).unwrap();
        let second = engine.tick(&mut state, at(3_000)).unwrap();
        assert_eq!(first, second);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn repeated_collecting_ticks_change_nothing() {
        let engine = QuizPhaseEngine::default();
        let mut state = session(2);
        let anchor = state.phase_anchor();

        let first = engine.tick(&mut state, at(1_500)).unwrap();
        let second = engine.tick(&mut state, at(1_500)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.phase(), Phase::Collecting);
        assert!(first.directive.selectable);
        assert_eq!(state.phase_anchor(), anchor);
        assert_eq!(state.question_index(), 0);
        assert!(state.scored_indices().is_empty());
    }

    #[test]
    fn early_selection_routes_through_reveal() {
        let engine = QuizPhaseEngine::default();
        let mut state = session(2);
        engine.tick(&mut state, at(2_000)).unwrap();
        engine.select(&mut state, "right", at(2_000)).unwrap();

        let elapsed = elapsed_since(state.phase_anchor(), at(2_000));
        assert!(elapsed >= engine.settings().collect_window());

        let tick = engine.tick(&mut state, at(2_000)).unwrap();
        assert_eq!(tick.phase(), Phase::Revealing);
        let annotations: Vec<_> = tick
            .directive
            .options
            .iter()
            .map(|o| o.annotation.unwrap())
            .collect();
        assert_eq!(
            annotations,
            vec![
                Annotation { correct: true, selected: true },
                Annotation { correct: false, selected: false },
            ]
        );

        let err = engine.select(&mut state, "wrong", at(2_100)).unwrap_err();
        assert_eq!(err, EngineError::NotCollecting { phase: Phase::Revealing });
        assert_eq!(state.selected_option(), Some("right"));
    }

    #[test]
    fn advancing_resets_question_state() {
        let engine = QuizPhaseEngine::default();
        let mut state = session(2);
        engine.select(&mut state, "wrong", at(1_000)).unwrap();
        engine.tick(&mut state, at(1_000)).unwrap();

        let tick = engine.tick(&mut state, at(6_000)).unwrap();
        assert_eq!(tick.phase(), Phase::Advancing);
        assert_eq!(tick.next, Reinvoke::Immediate);
        assert!(tick.directive.options.is_empty());
        assert_eq!(state.question_index(), 1);
        assert_eq!(state.selected_option(), None);
        assert_eq!(state.phase_anchor(), at(6_000));

        let tick = engine.tick(&mut state, at(6_000)).unwrap();
        assert_eq!(tick.phase(), Phase::Collecting);
        assert_eq!(tick.directive.question.as_deref(), Some("Question 1"));
    }

    #[test]
    fn last_question_leads_to_permanent_completion() {
        let engine = QuizPhaseEngine::default();
        let mut state = session(1);

        engine.tick(&mut state, at(0)).unwrap();
        engine.tick(&mut state, at(5_000)).unwrap();
        let tick = engine.tick(&mut state, at(10_000)).unwrap();
        assert_eq!(tick.phase(), Phase::Complete);
        assert_eq!(tick.next, Reinvoke::Stop);
        assert_eq!(state.question_index(), 1);

        let anchor = state.phase_anchor();
        for millis in [10_000, 20_000, 500_000] {
            let tick = engine.tick(&mut state, at(millis)).unwrap();
            assert_eq!(tick.phase(), Phase::Complete);
        }
        assert_eq!(state.question_index(), 1);
        assert_eq!(state.phase_anchor(), anchor);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn empty_quiz_completes_immediately() {
        let engine = QuizPhaseEngine::default();
        let mut state = session(0);

        let tick = engine.tick(&mut state, at(0)).unwrap();
        assert_eq!(tick.phase(), Phase::Complete);
        assert_eq!(tick.directive.score(), 0);
        assert_eq!(tick.directive.total(), 0);
        assert!(tick.directive.ratio.fraction().abs() < f64::EPSILON);
        assert!(tick.directive.ratio.fraction().is_finite());
    }

    #[test]
    fn three_question_run_scores_only_the_answered_one() {
        let engine = QuizPhaseEngine::new(QuizSettings::new(5, 5, 120, 3).unwrap());
        let mut state = session(3);

        engine.tick(&mut state, at(0)).unwrap();
        engine.select(&mut state, "right", at(1_000)).unwrap();

        let mut now = 1_000;
        let mut last = engine.tick(&mut state, at(now)).unwrap();
        while last.next != Reinvoke::Stop {
            now += match last.next {
                Reinvoke::Immediate => 0,
                Reinvoke::After(_) => 120,
                Reinvoke::Stop => unreachable!(),
            };
            last = engine.tick(&mut state, at(now)).unwrap();
        }

        assert_eq!(last.phase(), Phase::Complete);
        assert_eq!(state.score(), 1);
        assert_eq!(
            state.scored_indices().iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn skipped_reveal_window_still_scores_once() {
        let engine = QuizPhaseEngine::default();
        let mut state = session(2);
        engine.select(&mut state, "right", at(1_000)).unwrap();

        let tick = engine.tick(&mut state, at(60_000)).unwrap();
        assert_eq!(tick.phase(), Phase::Advancing);
        assert_eq!(state.score(), 1);
        assert!(state.scored_indices().contains(&0));
    }

    #[test]
    fn selection_rejects_unknown_options() {
        let engine = QuizPhaseEngine::default();
        let mut state = session(1);

        let err = engine.select(&mut state, "maybe", at(0)).unwrap_err();
        assert!(matches!(err, EngineError::UnknownOption { .. }));
        let err = engine.select_index(&mut state, 7, at(0)).unwrap_err();
        assert_eq!(err, EngineError::OptionOutOfRange { index: 7 });

        engine.select_index(&mut state, 1, at(0)).unwrap();
        assert_eq!(state.selected_option(), Some("wrong"));
    }

    #[test]
    fn unconfigured_session_is_rejected() {
        let engine = QuizPhaseEngine::default();
        let mut state = SessionState::new(fixed_now());
        assert_eq!(
            engine.tick(&mut state, at(0)).unwrap_err(),
            EngineError::NotConfigured
        );
    }

    #[test]
    fn progress_tracks_window_share() {
        let engine = QuizPhaseEngine::default();
        let mut state = session(1);
        let tick = engine.tick(&mut state, at(2_500)).unwrap();
        assert!((tick.directive.progress - 0.5).abs() < 1e-9);
        let tick = engine.tick(&mut state, at(7_500)).unwrap();
        assert!((tick.directive.progress - 0.5).abs() < 1e-9);
    }
}
