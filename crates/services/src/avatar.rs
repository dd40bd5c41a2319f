use finlit_core::model::{Avatar, SessionState};
use tracing::{debug, warn};

use crate::error::SelectorError;

/// Emoji offered on the catalog tab.
pub const EMOJI_CATALOG: &[&str] = &[
    "🦊", "🐼", "🦉", "🐯", "🐸", "🐙", "🦄", "🐢", "🐝", "🦁", "🐧", "🐨",
];

/// Where the latest avatar choice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarTab {
    Catalog,
    Typed,
    Upload,
}

/// Collects avatar interactions during setup.
///
/// Each accepted interaction is written straight into the session so a setup
/// submission can read it without waiting on the selector. The last accepted
/// interaction wins, whichever tab it came from.
#[derive(Debug, Default)]
pub struct AvatarSelector {
    last_tab: Option<AvatarTab>,
}

impl AvatarSelector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn catalog() -> &'static [&'static str] {
        EMOJI_CATALOG
    }

    /// # Errors
    ///
    /// Returns `SelectorError::OutOfCatalog` for an unknown position, or
    /// `SelectorError::Setup` once setup has completed.
    pub fn pick_catalog(
        &mut self,
        state: &mut SessionState,
        index: usize,
    ) -> Result<(), SelectorError> {
        let emoji = EMOJI_CATALOG
            .get(index)
            .ok_or(SelectorError::OutOfCatalog { index })?;
        self.apply(state, Avatar::emoji(*emoji)?, AvatarTab::Catalog)
    }

    /// # Errors
    ///
    /// Returns `SelectorError::Avatar` for blank input, or
    /// `SelectorError::Setup` once setup has completed.
    pub fn type_emoji(&mut self, state: &mut SessionState, raw: &str) -> Result<(), SelectorError> {
        let avatar = Avatar::emoji(raw).inspect_err(|err| warn!("typed emoji rejected: {err}"))?;
        self.apply(state, avatar, AvatarTab::Typed)
    }

    /// # Errors
    ///
    /// Returns `SelectorError::Avatar` for empty or unsupported files, or
    /// `SelectorError::Setup` once setup has completed.
    pub fn upload_image(
        &mut self,
        state: &mut SessionState,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), SelectorError> {
        let avatar =
            Avatar::image(file_name, bytes).inspect_err(|err| warn!("upload rejected: {err}"))?;
        self.apply(state, avatar, AvatarTab::Upload)
    }

    /// Latest accepted choice, as stored on the session.
    #[must_use]
    pub fn current_selection<'a>(&self, state: &'a SessionState) -> Option<&'a Avatar> {
        state.avatar()
    }

    #[must_use]
    pub fn last_tab(&self) -> Option<AvatarTab> {
        self.last_tab
    }

    fn apply(
        &mut self,
        state: &mut SessionState,
        avatar: Avatar,
        tab: AvatarTab,
    ) -> Result<(), SelectorError> {
        state.set_avatar(avatar)?;
        self.last_tab = Some(tab);
        debug!(session_id = %state.id(), ?tab, "avatar selected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finlit_core::model::{AvatarKind, SetupForm};
    use finlit_core::time::fixed_now;

    #[test]
    fn last_interaction_wins_across_tabs() {
        let mut state = SessionState::new(fixed_now());
        let mut selector = AvatarSelector::new();

        selector.pick_catalog(&mut state, 1).unwrap();
        assert_eq!(selector.current_selection(&state), Some(&Avatar::Emoji("🐼".into())));

        selector
            .upload_image(&mut state, "me.png", vec![0x89, 0x50])
            .unwrap();
        assert_eq!(
            selector.current_selection(&state).map(Avatar::kind),
            Some(AvatarKind::Image)
        );

        selector.type_emoji(&mut state, "🚀").unwrap();
        assert_eq!(state.avatar(), Some(&Avatar::Emoji("🚀".into())));
        assert_eq!(selector.last_tab(), Some(AvatarTab::Typed));
    }

    #[test]
    fn rejected_interaction_keeps_previous_choice() {
        let mut state = SessionState::new(fixed_now());
        let mut selector = AvatarSelector::new();
        selector.pick_catalog(&mut state, 0).unwrap();

        assert!(selector.type_emoji(&mut state, "   ").is_err());
        assert!(selector.upload_image(&mut state, "cv.pdf", vec![1]).is_err());
        assert!(matches!(
            selector.pick_catalog(&mut state, 99),
            Err(SelectorError::OutOfCatalog { index: 99 })
        ));
        assert_eq!(state.avatar(), Some(&Avatar::Emoji("🦊".into())));
        assert_eq!(selector.last_tab(), Some(AvatarTab::Catalog));
    }

    #[test]
    fn selection_is_frozen_after_setup() {
        let mut state = SessionState::new(fixed_now());
        let mut selector = AvatarSelector::new();
        selector.pick_catalog(&mut state, 2).unwrap();
        state
            .configure(SetupForm::new("Ana", "NZ"), Vec::new(), fixed_now())
            .unwrap();

        assert!(matches!(
            selector.pick_catalog(&mut state, 3),
            Err(SelectorError::Setup(_))
        ));
        assert_eq!(state.avatar(), Some(&Avatar::Emoji("🦉".into())));
    }
}
