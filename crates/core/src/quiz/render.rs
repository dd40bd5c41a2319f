use std::time::Duration;

use crate::model::{Avatar, ScoreRatio};
use crate::quiz::Phase;

/// How an option is marked once the answer is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation {
    pub correct: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub text: String,
    /// Present only while revealing.
    pub annotation: Option<Annotation>,
}

/// What the presentation layer should draw for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDirective {
    pub phase: Phase,
    pub question: Option<String>,
    pub options: Vec<OptionView>,
    pub selectable: bool,
    pub selected: Option<String>,
    /// Share of the current phase window already used, in `0.0..=1.0`.
    pub progress: f64,
    pub ratio: ScoreRatio,
    /// Zero-based index of the current question.
    pub index: usize,
    pub avatar: Avatar,
    pub username: String,
    pub country: String,
}

impl RenderDirective {
    #[must_use]
    pub fn score(&self) -> u32 {
        self.ratio.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.ratio.total
    }
}

/// When the host should call `tick` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reinvoke {
    Immediate,
    After(Duration),
    Stop,
}

/// Result of one engine evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub directive: RenderDirective,
    pub next: Reinvoke,
}

impl Tick {
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.directive.phase
    }
}
