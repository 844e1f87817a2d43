//! Poster, backdrop and profile image URLs.

use std::fmt;
use std::str::FromStr;

/// Base URL of the TMDB image CDN.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Returned when an image path is absent.
pub const PLACEHOLDER_IMAGE_URL: &str = "/placeholder.svg";

/// Image rendition size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    /// `w200`.
    Tiny,
    /// `w300`.
    Small,
    /// `w500`.
    #[default]
    Medium,
    /// `w780`.
    Large,
    /// `w1280`.
    ExtraLarge,
    /// Full resolution.
    Original,
}

impl ImageSize {
    /// All sizes, smallest first.
    pub const ALL: [Self; 6] = [
        Self::Tiny,
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::ExtraLarge,
        Self::Original,
    ];

    /// CDN path segment for this size.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Tiny => "w200",
            Self::Small => "w300",
            Self::Medium => "w500",
            Self::Large => "w780",
            Self::ExtraLarge => "w1280",
            Self::Original => "original",
        }
    }

    /// User-facing name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extra-large",
            Self::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown image size '{s}' (expected tiny, small, medium, large, extra-large or original)"
                )
            })
    }
}

/// Builds an absolute image URL, or the placeholder if `path` is absent or empty.
#[must_use]
pub fn image_url(path: Option<&str>, size: ImageSize) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{IMAGE_BASE_URL}/{}{p}", size.segment()),
        _ => String::from(PLACEHOLDER_IMAGE_URL),
    }
}

/// Poster URL (`medium`).
#[must_use]
pub fn poster_url(path: Option<&str>) -> String {
    image_url(path, ImageSize::Medium)
}

/// Backdrop URL (`extra-large`).
#[must_use]
pub fn backdrop_url(path: Option<&str>) -> String {
    image_url(path, ImageSize::ExtraLarge)
}

/// Cast/crew headshot URL (`small`).
#[must_use]
pub fn profile_url(path: Option<&str>) -> String {
    image_url(path, ImageSize::Small)
}
