#![forbid(unsafe_code)]

//! Raw pointer input.
//!
//! [`PointerEvent`] is the normalized record every host (DOM, winit, a TUI
//! mouse decoder) converts its native events into. The timestamp travels with
//! the event so recognizers never read a clock themselves.

use web_time::Instant;

use crate::geometry::Point;

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    /// Platform cancelled the pointer (capture lost, window blurred).
    Cancel,
}

/// What the pointer went down on.
///
/// Interactive targets own their own pointer handling; gestures never start
/// on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerTarget {
    /// Plain card surface.
    #[default]
    Surface,
    /// Text input or textarea.
    EditableField,
    Button,
}

impl PointerTarget {
    /// Whether this target handles the pointer itself.
    #[inline]
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        matches!(self, Self::EditableField | Self::Button)
    }
}

/// A single pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Point,
    pub time: Instant,
    pub target: PointerTarget,
}

impl PointerEvent {
    /// Create an event over a plain surface.
    #[must_use]
    pub fn new(kind: PointerKind, x: f32, y: f32, time: Instant) -> Self {
        Self {
            kind,
            pos: Point::new(x, y),
            time,
            target: PointerTarget::Surface,
        }
    }

    #[must_use]
    pub fn down(x: f32, y: f32, time: Instant) -> Self {
        Self::new(PointerKind::Down, x, y, time)
    }

    #[must_use]
    pub fn moved(x: f32, y: f32, time: Instant) -> Self {
        Self::new(PointerKind::Move, x, y, time)
    }

    #[must_use]
    pub fn up(x: f32, y: f32, time: Instant) -> Self {
        Self::new(PointerKind::Up, x, y, time)
    }

    #[must_use]
    pub fn cancel(x: f32, y: f32, time: Instant) -> Self {
        Self::new(PointerKind::Cancel, x, y, time)
    }

    /// Replace the target (builder pattern).
    #[must_use]
    pub fn on(mut self, target: PointerTarget) -> Self {
        self.target = target;
        self
    }
}
