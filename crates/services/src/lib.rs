#![forbid(unsafe_code)]

pub mod avatar;
pub mod chat;
pub mod error;
pub mod sessions;

pub use finlit_core::Clock;

pub use avatar::{AvatarSelector, AvatarTab, EMOJI_CATALOG};
pub use chat::{FALLBACK_RESPONSE, IntentResponder, ResponseEngine};
pub use error::{SelectorError, SessionError};

pub use sessions::{
    LoopClock, PresentationDriver, QuizLoopService, SessionProgress, SetupService,
    sample_questions,
};
