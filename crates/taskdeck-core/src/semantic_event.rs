#![forbid(unsafe_code)]

//! High-level gestures derived from raw pointer input.
//!
//! # Invariants
//! 1. Every drag sequence is well-formed: `DragStart` → zero or more
//!    `DragMove` → `DragEnd` or `DragCancel`.
//! 2. `Click` and `DragEnd` never both emit for the same down → up pair.
//! 3. `SwipeEvent::Dismiss` velocity is always non-negative.

use crate::geometry::Point;

/// Gestures produced by [`GestureRecognizer`](crate::gesture::GestureRecognizer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SemanticEvent {
    /// Down and up without crossing the drag threshold.
    Click { pos: Point },

    /// Pointer crossed the drag threshold. Emitted once per interaction.
    DragStart { origin: Point, pos: Point },

    /// Pointer moved while a drag is active.
    DragMove {
        origin: Point,
        pos: Point,
        /// Movement since the previous sample.
        delta: Point,
    },

    /// Pointer released while a drag is active.
    DragEnd { origin: Point, pos: Point },

    /// Drag interrupted by the platform.
    DragCancel,
}

impl SemanticEvent {
    /// Whether this event belongs to a drag sequence.
    #[must_use]
    pub const fn is_drag(&self) -> bool {
        matches!(
            self,
            Self::DragStart { .. } | Self::DragMove { .. } | Self::DragEnd { .. } | Self::DragCancel
        )
    }
}

/// Horizontal swipe direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Direction of a signed horizontal delta (zero counts as left).
    #[must_use]
    pub fn from_delta(dx: f32) -> Self {
        if dx > 0.0 { Self::Right } else { Self::Left }
    }

    /// `1.0` for right, `-1.0` for left.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Events produced by [`SwipeRecognizer`](crate::swipe::SwipeRecognizer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeEvent {
    /// Released without ever passing the click threshold.
    Tap,
    /// Raw signed horizontal offset from the press position.
    Move { delta_x: f32 },
    /// Released past the distance threshold or fast enough.
    Dismiss {
        direction: SwipeDirection,
        /// Release velocity in px/ms.
        velocity: f32,
    },
    /// Released without committing; the card should spring back.
    Cancel,
}
