mod driver;
mod progress;
mod setup;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use driver::{LoopClock, PresentationDriver};
pub use progress::SessionProgress;
pub use setup::{SetupService, sample_questions};
pub use workflow::QuizLoopService;
