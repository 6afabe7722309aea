#![forbid(unsafe_code)]

//! Reduced-motion preference.

use serde::{Deserialize, Serialize};

/// The user's motion preference as reported by the host environment.
///
/// When reduced, snap-back is instant, the dissolution skips its simulation
/// and layout transitions jump straight to their targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPreference {
    #[default]
    Full,
    Reduced,
}

impl MotionPreference {
    #[inline]
    #[must_use]
    pub const fn is_reduced(self) -> bool {
        matches!(self, Self::Reduced)
    }

    /// Map a boolean host signal (`prefers-reduced-motion`).
    #[must_use]
    pub const fn from_reduced(reduced: bool) -> Self {
        if reduced { Self::Reduced } else { Self::Full }
    }
}
