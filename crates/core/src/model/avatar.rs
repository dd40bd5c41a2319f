use std::fmt;
use std::path::Path;

use thiserror::Error;

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AvatarError {
    #[error("emoji cannot be empty")]
    EmptyEmoji,

    #[error("uploaded image is empty")]
    EmptyImage,

    #[error("unsupported image type: {name}")]
    UnsupportedImage { name: String },
}

//
// ─── AVATAR TYPES ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarKind {
    Emoji,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Guess the format from a file name's extension.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }
}

/// An uploaded picture used as a player avatar.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAvatar {
    file_name: String,
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImageAvatar {
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImageAvatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAvatar")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Identity picked by the player during setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Emoji(String),
    Image(ImageAvatar),
}

impl Avatar {
    /// # Errors
    ///
    /// Returns `AvatarError::EmptyEmoji` for blank input.
    pub fn emoji(raw: impl Into<String>) -> Result<Self, AvatarError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AvatarError::EmptyEmoji);
        }
        Ok(Self::Emoji(trimmed.to_owned()))
    }

    /// # Errors
    ///
    /// Returns `AvatarError::EmptyImage` if `bytes` is empty, or
    /// `AvatarError::UnsupportedImage` if the extension is not a known image type.
    pub fn image(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AvatarError> {
        let file_name = file_name.into();
        if bytes.is_empty() {
            return Err(AvatarError::EmptyImage);
        }
        let format = ImageFormat::from_file_name(&file_name)
            .ok_or_else(|| AvatarError::UnsupportedImage {
                name: file_name.clone(),
            })?;
        Ok(Self::Image(ImageAvatar {
            file_name,
            format,
            bytes,
        }))
    }

    #[must_use]
    pub fn kind(&self) -> AvatarKind {
        match self {
            Avatar::Emoji(_) => AvatarKind::Emoji,
            Avatar::Image(_) => AvatarKind::Image,
        }
    }

    /// Short text form for text-only presentations.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Avatar::Emoji(e) => e,
            Avatar::Image(img) => img.file_name(),
        }
    }
}
