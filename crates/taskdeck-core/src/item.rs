#![forbid(unsafe_code)]

//! Item identity and lifecycle status.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable identifier of a card (task or toast).
///
/// Cheap to clone; ids are passed around every frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Arc<str>);

impl ItemId {
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        String::deserialize(d).map(Self::from)
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ItemId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Lifecycle of a task as driven by the external executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Idle,
    Selected,
    Queued,
    Running,
    Done,
}

impl ItemStatus {
    /// The single-bit set for this status.
    #[must_use]
    pub const fn as_set(self) -> StatusSet {
        match self {
            Self::Idle => StatusSet::IDLE,
            Self::Selected => StatusSet::SELECTED,
            Self::Queued => StatusSet::QUEUED,
            Self::Running => StatusSet::RUNNING,
            Self::Done => StatusSet::DONE,
        }
    }
}

bitflags! {
    /// A set of [`ItemStatus`] values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusSet: u8 {
        const IDLE = 1 << 0;
        const SELECTED = 1 << 1;
        const QUEUED = 1 << 2;
        const RUNNING = 1 << 3;
        const DONE = 1 << 4;
        /// Statuses a card can be dragged in. `DONE` must never be added.
        const DRAGGABLE = Self::IDLE.bits() | Self::SELECTED.bits();
    }
}

impl StatusSet {
    #[inline]
    #[must_use]
    pub fn admits(self, status: ItemStatus) -> bool {
        self.contains(status.as_set())
    }
}

impl Default for StatusSet {
    fn default() -> Self {
        Self::DRAGGABLE
    }
}
