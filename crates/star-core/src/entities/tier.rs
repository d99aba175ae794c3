//! Star tier - visual classification of a starred message by its count

use serde::{Deserialize, Serialize};

/// Visual tier of a starred message
///
/// Ordered: a higher count never yields a lower tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarTier {
    Star,
    GlowingStar,
    Dizzy,
    Sparkles,
}

impl StarTier {
    /// Classify a star count. Total over `i64`; negative counts map to the lowest tier.
    pub const fn for_count(count: i64) -> Self {
        match count {
            i64::MIN..=4 => Self::Star,
            5..=9 => Self::GlowingStar,
            10..=14 => Self::Dizzy,
            _ => Self::Sparkles,
        }
    }

    /// Emoji shown in the entry header
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Star => "\u{2b50}",
            Self::GlowingStar => "\u{1f31f}",
            Self::Dizzy => "\u{1f4ab}",
            Self::Sparkles => "\u{2728}",
        }
    }
}

impl From<i64> for StarTier {
    fn from(count: i64) -> Self {
        Self::for_count(count)
    }
}
