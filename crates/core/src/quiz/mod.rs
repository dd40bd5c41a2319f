mod engine;
mod phase;
mod render;
mod settings;

pub use engine::{EngineError, LOCK_IN_EPSILON_MS, QuizPhaseEngine};
pub use phase::Phase;
pub use render::{Annotation, OptionView, Reinvoke, RenderDirective, Tick};
pub use settings::{QuizSettings, SettingsError};
