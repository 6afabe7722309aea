#![forbid(unsafe_code)]

//! Gesture recognition: classifies a pointer stream as click or drag.
//!
//! [`GestureRecognizer`] is a small state machine that consumes
//! [`PointerEvent`]s and emits [`SemanticEvent`]s.
//!
//! # State Machine
//!
//! ```text
//! Idle ──down──▶ Pending ──move (dist ≥ threshold)──▶ Dragging
//!                  │                                    │
//!                  └──up──▶ Click                        └──up──▶ DragEnd
//! ```
//!
//! # Invariants
//!
//! 1. Drag and Click never both emit for the same down → up interaction.
//! 2. `DragStart` is emitted at most once per interaction and is always
//!    followed, on the same move, by a `DragMove`.
//! 3. Pointer-down on an interactive target (field, button) is ignored.
//! 4. Pointer-down while a drag is active is ignored until the drag resolves.
//! 5. After `reset()`, the recognizer is idle and emits nothing for the
//!    remainder of the abandoned interaction.
//!
//! # Failure Modes
//!
//! - A `Move` or `Up` without a preceding accepted `Down` is dropped.
//! - A platform `Cancel` emits `DragCancel` only if a drag had started.

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::event::{PointerEvent, PointerKind};
use crate::geometry::Point;
use crate::semantic_event::SemanticEvent;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for click vs drag classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Euclidean distance (px) from the press position before a drag
    /// activates (default: 5).
    pub drag_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

/// The pointer currently held down.
#[derive(Debug, Clone, Copy)]
struct GesturePointer {
    origin: Point,
    last: Point,
    started_at: Instant,
    active_drag: bool,
}

// ---------------------------------------------------------------------------
// GestureRecognizer
// ---------------------------------------------------------------------------

/// Stateful click/drag recognizer for a single pointer.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    config: GestureConfig,
    pointer: Option<GesturePointer>,
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            pointer: None,
        }
    }

    /// Process a pointer event, returning the semantic events it produced.
    ///
    /// Most events produce 0 or 1 semantic events; the move that crosses the
    /// threshold produces `DragStart` followed by `DragMove`.
    pub fn process(&mut self, event: &PointerEvent) -> Vec<SemanticEvent> {
        let mut out = Vec::with_capacity(2);
        match event.kind {
            PointerKind::Down => self.on_down(event),
            PointerKind::Move => self.on_move(event.pos, &mut out),
            PointerKind::Up => self.on_up(event.pos, &mut out),
            PointerKind::Cancel => {
                if self.pointer.take().is_some_and(|p| p.active_drag) {
                    out.push(SemanticEvent::DragCancel);
                }
            }
        }
        out
    }

    /// Whether a drag is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.pointer.is_some_and(|p| p.active_drag)
    }

    /// Whether a press is held but has not yet become a drag.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pointer.is_some_and(|p| !p.active_drag)
    }

    /// When the current press started, if any.
    #[must_use]
    pub fn pressed_at(&self) -> Option<Instant> {
        self.pointer.map(|p| p.started_at)
    }

    /// Drop any in-flight interaction without emitting events.
    pub fn reset(&mut self) {
        self.pointer = None;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureRecognizer {
    fn on_down(&mut self, event: &PointerEvent) {
        if event.target.is_interactive() {
            tracing::trace!(target: "taskdeck.gesture", target_kind = ?event.target, "press on interactive target ignored");
            return;
        }
        if self.is_dragging() {
            tracing::trace!(target: "taskdeck.gesture", "press ignored while dragging");
            return;
        }
        self.pointer = Some(GesturePointer {
            origin: event.pos,
            last: event.pos,
            started_at: event.time,
            active_drag: false,
        });
    }

    fn on_move(&mut self, pos: Point, out: &mut Vec<SemanticEvent>) {
        let threshold = self.config.drag_threshold;
        let Some(ref mut pointer) = self.pointer else {
            return;
        };

        if !pointer.active_drag && pointer.origin.distance(pos) >= threshold {
            pointer.active_drag = true;
            out.push(SemanticEvent::DragStart {
                origin: pointer.origin,
                pos,
            });
        }

        if pointer.active_drag {
            out.push(SemanticEvent::DragMove {
                origin: pointer.origin,
                pos,
                delta: pos.delta(pointer.last),
            });
        }

        pointer.last = pos;
    }

    fn on_up(&mut self, pos: Point, out: &mut Vec<SemanticEvent>) {
        let Some(pointer) = self.pointer.take() else {
            return;
        };
        if pointer.active_drag {
            out.push(SemanticEvent::DragEnd {
                origin: pointer.origin,
                pos,
            });
        } else {
            out.push(SemanticEvent::Click { pos });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerTarget;
    use web_time::Duration;

    const MS_16: Duration = Duration::from_millis(16);

    fn recognizer() -> GestureRecognizer {
        GestureRecognizer::new(GestureConfig::default())
    }

    #[test]
    fn press_release_in_place_is_click() {
        let mut gr = recognizer();
        let t = Instant::now();

        assert!(gr.process(&PointerEvent::down(10.0, 10.0, t)).is_empty());
        let events = gr.process(&PointerEvent::up(10.0, 10.0, t + MS_16));
        assert_eq!(
            events,
            vec![SemanticEvent::Click {
                pos: Point::new(10.0, 10.0)
            }]
        );
    }

    #[test]
    fn small_jitter_stays_a_click() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0, t));
        assert!(gr.process(&PointerEvent::moved(3.0, 3.0, t + MS_16)).is_empty());
        let events = gr.process(&PointerEvent::up(3.0, 3.0, t + MS_16 * 2));
        assert!(matches!(events[..], [SemanticEvent::Click { .. }]));
    }

    #[test]
    fn threshold_uses_euclidean_distance() {
        // (3, 4) is exactly 5 px away.
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0, t));
        let events = gr.process(&PointerEvent::moved(3.0, 4.0, t + MS_16));
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SemanticEvent::DragStart { .. }));
        assert!(matches!(events[1], SemanticEvent::DragMove { .. }));
    }

    #[test]
    fn drag_start_is_one_shot() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0, t));
        gr.process(&PointerEvent::moved(10.0, 0.0, t + MS_16));
        let events = gr.process(&PointerEvent::moved(20.0, 0.0, t + MS_16 * 2));
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            SemanticEvent::DragMove {
                origin: Point::new(0.0, 0.0),
                pos: Point::new(20.0, 0.0),
                delta: Point::new(10.0, 0.0),
            }
        );
    }

    #[test]
    fn drag_end_replaces_click() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0, t));
        gr.process(&PointerEvent::moved(0.0, 30.0, t + MS_16));
        // Returning to the origin does not turn the drag back into a click.
        gr.process(&PointerEvent::moved(0.0, 0.0, t + MS_16 * 2));
        let events = gr.process(&PointerEvent::up(0.0, 0.0, t + MS_16 * 3));
        assert_eq!(
            events,
            vec![SemanticEvent::DragEnd {
                origin: Point::new(0.0, 0.0),
                pos: Point::new(0.0, 0.0)
            }]
        );
        assert!(!gr.is_dragging());
    }

    #[test]
    fn interactive_targets_never_start_gestures() {
        for target in [PointerTarget::Button, PointerTarget::EditableField] {
            let mut gr = recognizer();
            let t = Instant::now();
            gr.process(&PointerEvent::down(0.0, 0.0, t).on(target));
            assert!(gr.process(&PointerEvent::moved(50.0, 0.0, t + MS_16)).is_empty());
            assert!(gr.process(&PointerEvent::up(50.0, 0.0, t + MS_16 * 2)).is_empty());
        }
    }

    #[test]
    fn second_press_during_drag_is_ignored() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0, t));
        gr.process(&PointerEvent::moved(20.0, 0.0, t + MS_16));
        gr.process(&PointerEvent::down(200.0, 200.0, t + MS_16 * 2));
        assert!(gr.is_dragging());
        let events = gr.process(&PointerEvent::up(25.0, 0.0, t + MS_16 * 3));
        assert_eq!(
            events,
            vec![SemanticEvent::DragEnd {
                origin: Point::new(0.0, 0.0),
                pos: Point::new(25.0, 0.0)
            }]
        );
    }

    #[test]
    fn second_press_while_pending_restarts() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0, t));
        gr.process(&PointerEvent::down(100.0, 100.0, t + MS_16));
        // 4 px from the new origin: still pending.
        assert!(gr.process(&PointerEvent::moved(104.0, 100.0, t + MS_16 * 2)).is_empty());
        assert!(gr.is_pending());
    }

    #[test]
    fn cancel_during_drag_emits_drag_cancel() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0, t));
        gr.process(&PointerEvent::moved(20.0, 0.0, t + MS_16));
        let events = gr.process(&PointerEvent::cancel(20.0, 0.0, t + MS_16 * 2));
        assert_eq!(events, vec![SemanticEvent::DragCancel]);
        assert!(gr.process(&PointerEvent::up(20.0, 0.0, t + MS_16 * 3)).is_empty());
    }

    #[test]
    fn cancel_while_pending_is_silent() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0, t));
        assert!(gr.process(&PointerEvent::cancel(0.0, 0.0, t)).is_empty());
        assert!(!gr.is_pending());
    }

    #[test]
    fn orphan_move_and_up_are_dropped() {
        let mut gr = recognizer();
        let t = Instant::now();
        assert!(gr.process(&PointerEvent::moved(50.0, 50.0, t)).is_empty());
        assert!(gr.process(&PointerEvent::up(50.0, 50.0, t)).is_empty());
    }

    #[test]
    fn reset_abandons_drag_silently() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0, t));
        gr.process(&PointerEvent::moved(20.0, 0.0, t + MS_16));
        gr.reset();
        assert!(!gr.is_dragging());
        assert!(gr.process(&PointerEvent::up(20.0, 0.0, t + MS_16 * 2)).is_empty());
    }

    #[test]
    fn custom_threshold() {
        let mut gr = GestureRecognizer::new(GestureConfig {
            drag_threshold: 20.0,
        });
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0, t));
        assert!(gr.process(&PointerEvent::moved(19.0, 0.0, t + MS_16)).is_empty());
        assert_eq!(gr.process(&PointerEvent::moved(20.0, 0.0, t + MS_16 * 2)).len(), 2);
    }

    #[test]
    fn pressed_at_tracks_press_time() {
        let mut gr = recognizer();
        let t = Instant::now();
        assert!(gr.pressed_at().is_none());
        gr.process(&PointerEvent::down(0.0, 0.0, t));
        assert_eq!(gr.pressed_at(), Some(t));
    }

    #[test]
    fn config_getter_and_setter() {
        let mut gr = recognizer();
        assert_eq!(gr.config().drag_threshold, 5.0);
        gr.set_config(GestureConfig {
            drag_threshold: 8.0,
        });
        assert_eq!(gr.config().drag_threshold, 8.0);
    }
}
