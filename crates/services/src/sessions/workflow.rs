use tokio::sync::mpsc;
use tracing::{debug, warn};

use finlit_core::Clock;
use finlit_core::model::{ScoreRatio, SessionState};
use finlit_core::quiz::{QuizPhaseEngine, Reinvoke, Tick};

use super::driver::{LoopClock, PresentationDriver};
use crate::error::SessionError;

/// Render entry point and host loop around `QuizPhaseEngine`.
#[derive(Debug, Clone, Copy)]
pub struct QuizLoopService {
    clock: Clock,
    engine: QuizPhaseEngine,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, engine: QuizPhaseEngine) -> Self {
        Self { clock, engine }
    }

    #[must_use]
    pub fn engine(&self) -> &QuizPhaseEngine {
        &self.engine
    }

    /// Evaluate the session against the service clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Engine` if setup has not completed.
    pub fn render(&self, state: &mut SessionState) -> Result<Tick, SessionError> {
        Ok(self.engine.tick(state, self.clock.now())?)
    }

    /// Lock in an option for the current question at the service clock's time.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Engine` if the option is unknown or answers are
    /// not being collected.
    pub fn select(&self, state: &mut SessionState, option: &str) -> Result<(), SessionError> {
        Ok(self.engine.select(state, option, self.clock.now())?)
    }

    /// Drive the quiz until it completes.
    ///
    /// Each tick is handed to `driver`. Between delayed ticks the loop waits on
    /// either the delay or an option number from `selections`, whichever comes
    /// first. Rejected selections are logged and ignored. A closed channel
    /// just stops listening; the quiz keeps running on timers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Engine` if setup has not completed.
    pub async fn run<D>(
        &self,
        state: &mut SessionState,
        driver: &mut D,
        mut selections: mpsc::Receiver<usize>,
    ) -> Result<ScoreRatio, SessionError>
    where
        D: PresentationDriver + ?Sized,
    {
        let clock = LoopClock::start(self.clock.now());
        let mut listening = true;

        loop {
            let tick = self.engine.tick(state, clock.now())?;
            driver.present(&tick);

            let delay = match tick.next {
                Reinvoke::Stop => break,
                Reinvoke::Immediate => continue,
                Reinvoke::After(delay) => delay,
            };

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                choice = selections.recv(), if listening => match choice {
                    Some(index) => {
                        if let Err(err) = self.engine.select_index(state, index, clock.now()) {
                            warn!(session_id = %state.id(), "selection ignored: {err}");
                        }
                    }
                    None => {
                        debug!(session_id = %state.id(), "selection channel closed");
                        listening = false;
                    }
                },
            }
        }

        Ok(state.score_ratio())
    }
}
