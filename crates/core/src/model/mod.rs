mod avatar;
mod ids;
mod intent;
mod question;
mod session;

pub use ids::SessionId;

pub use avatar::{Avatar, AvatarError, AvatarKind, ImageAvatar, ImageFormat};
pub use intent::{Intent, IntentDraft, IntentError, IntentTable};
pub use question::{QuestionDraft, QuestionError, QuestionRecord};
pub use session::{Profile, ScoreRatio, SessionState, SetupError, SetupForm};
