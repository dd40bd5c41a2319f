use std::fmt;

use chrono::TimeDelta;

/// Mutually exclusive states of the quiz for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Options are selectable; `0 <= elapsed < T1`.
    Collecting,
    /// Answer is shown and scored; `T1 <= elapsed < T1 + T2`.
    Revealing,
    /// Transient step that moves to the next question; `elapsed >= T1 + T2`.
    Advancing,
    /// Every question has been asked.
    Complete,
}

impl Phase {
    /// Classify an elapsed time for a question that is still in play.
    #[must_use]
    pub fn for_elapsed(elapsed: TimeDelta, collect: TimeDelta, reveal: TimeDelta) -> Self {
        if elapsed < collect {
            Phase::Collecting
        } else if elapsed < collect + reveal {
            Phase::Revealing
        } else {
            Phase::Advancing
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Collecting => "collecting",
            Phase::Revealing => "revealing",
            Phase::Advancing => "advancing",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_follow_half_open_windows() {
        let t1 = TimeDelta::seconds(5);
        let t2 = TimeDelta::seconds(5);
        assert_eq!(Phase::for_elapsed(TimeDelta::zero(), t1, t2), Phase::Collecting);
        assert_eq!(
            Phase::for_elapsed(TimeDelta::milliseconds(4_999), t1, t2),
            Phase::Collecting
        );
        assert_eq!(Phase::for_elapsed(t1, t1, t2), Phase::Revealing);
        assert_eq!(
            Phase::for_elapsed(TimeDelta::milliseconds(9_999), t1, t2),
            Phase::Revealing
        );
        assert_eq!(Phase::for_elapsed(t1 + t2, t1, t2), Phase::Advancing);
    }
}
