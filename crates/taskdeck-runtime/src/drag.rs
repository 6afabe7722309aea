#![forbid(unsafe_code)]

//! Drag-to-delete controller.
//!
//! Owns the drag session for at most one card. A press on a draggable card
//! makes the session pending; once the pointer travels past the gesture
//! threshold the card floats under the cursor. Releasing outside the panel
//! boundary yields [`DragOutcome::Delete`] with the floating card's rectangle;
//! releasing inside snaps the card back to its slot.
//!
//! # State Machine
//!
//! ```text
//! Idle ──down──▶ Pending ──DragStart──▶ Dragging ──up (inside)──▶ SnappingBack ──snap_back──▶ Idle
//!                  │                       │
//!                  └──up (click)──▶ Idle    └──up (outside)──▶ Idle  (Delete)
//! ```
//!
//! # Invariants
//!
//! 1. At most one subject is Pending, Dragging or SnappingBack.
//! 2. A press is ignored unless the controller is enabled, the card's status
//!    is in the draggable set and the card can be measured.
//! 3. `reset()` returns to Idle immediately and drops the pending snap-back.
//! 4. The snap-back duration is `DragConfig::snap_back` everywhere.
//!
//! # Failure Modes
//!
//! - No panel boundary at release: the card snaps back (debug log).

use serde::{Deserialize, Serialize};
use taskdeck_core::animation::ease_in_out;
use taskdeck_core::event::{PointerEvent, PointerKind};
use taskdeck_core::geometry::{Point, RectF};
use taskdeck_core::gesture::{GestureConfig, GestureRecognizer};
use taskdeck_core::item::{ItemId, ItemStatus, StatusSet};
use taskdeck_core::measure::{ElementKey, Measure};
use taskdeck_core::motion::MotionPreference;
use taskdeck_core::semantic_event::SemanticEvent;
use web_time::{Duration, Instant};

use crate::deferred::DeferredQueue;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Time for a released card to glide back into its slot.
    #[serde(with = "taskdeck_core::serde_millis")]
    pub snap_back: Duration,
    /// Statuses a card may be dragged in.
    #[serde(skip)]
    pub draggable: StatusSet,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            snap_back: Duration::from_millis(200),
            draggable: StatusSet::DRAGGABLE,
        }
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Pending,
    Dragging,
    SnappingBack,
}

/// Result of a pointer release or cancel.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Released without passing the drag threshold.
    Click { subject: ItemId },
    /// Released inside the boundary; the card glides home.
    SnapBack { subject: ItemId },
    /// Released outside the boundary. `rect` is where the card was floating.
    Delete { subject: ItemId, rect: RectF },
    /// The platform cancelled the pointer mid-drag.
    Cancelled { subject: ItemId },
}

/// What the renderer should draw for the floating card.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOverlay {
    pub subject: ItemId,
    pub rect: RectF,
    pub snapping: bool,
    /// The cursor is in the delete zone.
    pub outside: bool,
}

#[derive(Debug, Clone)]
struct Session {
    id: u64,
    subject: ItemId,
    cursor: Point,
    /// Cursor to card top-left.
    offset: Point,
    origin_rect: RectF,
    outside: bool,
    snap: Option<Snap>,
}

#[derive(Debug, Clone, Copy)]
struct Snap {
    from: RectF,
    started_at: Instant,
}

impl Session {
    fn floating_rect(&self) -> RectF {
        self.origin_rect.with_origin(self.cursor.delta(self.offset))
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DragController {
    config: DragConfig,
    motion: MotionPreference,
    enabled: bool,
    recognizer: GestureRecognizer,
    phase: DragPhase,
    session: Option<Session>,
    finish_snap: DeferredQueue<u64, ()>,
    next_session: u64,
}

impl DragController {
    #[must_use]
    pub fn new(config: DragConfig, gesture: GestureConfig) -> Self {
        Self {
            config,
            motion: MotionPreference::Full,
            enabled: true,
            recognizer: GestureRecognizer::new(gesture),
            phase: DragPhase::Idle,
            session: None,
            finish_snap: DeferredQueue::new(),
            next_session: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn set_motion(&mut self, motion: MotionPreference) {
        self.motion = motion;
    }

    /// Disable new presses (while the task list is executing).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Card currently owned by the controller.
    #[must_use]
    pub fn subject(&self) -> Option<&ItemId> {
        self.session.as_ref().map(|s| &s.subject)
    }

    /// Press on the card `subject`. Returns whether the press was accepted.
    pub fn pointer_down<M: Measure + ?Sized>(
        &mut self,
        subject: &ItemId,
        status: ItemStatus,
        event: &PointerEvent,
        measure: &M,
    ) -> bool {
        if !self.enabled {
            tracing::trace!(target: "taskdeck.drag", subject = %subject, "press ignored: disabled");
            return false;
        }
        if event.target.is_interactive() {
            tracing::trace!(target: "taskdeck.drag", subject = %subject, target_kind = ?event.target, "press ignored: interactive target");
            return false;
        }
        if matches!(self.phase, DragPhase::Dragging | DragPhase::SnappingBack) {
            tracing::trace!(target: "taskdeck.drag", subject = %subject, "press ignored: drag active");
            return false;
        }
        if !self.config.draggable.admits(status) {
            tracing::trace!(target: "taskdeck.drag", subject = %subject, ?status, "press ignored: status");
            return false;
        }
        let Some(rect) = measure.measure(ElementKey::Item(subject)) else {
            tracing::trace!(target: "taskdeck.drag", subject = %subject, "press ignored: card not measured");
            return false;
        };

        // A press that never released is stale once a new one arrives.
        if self.phase == DragPhase::Pending {
            self.take_session();
        }
        self.recognizer.process(event);
        if !self.recognizer.is_pending() {
            self.session = None;
            self.phase = DragPhase::Idle;
            return false;
        }

        let id = self.next_session;
        self.next_session += 1;
        self.session = Some(Session {
            id,
            subject: subject.clone(),
            cursor: event.pos,
            offset: event.pos.delta(rect.origin()),
            origin_rect: rect,
            outside: false,
            snap: None,
        });
        self.phase = DragPhase::Pending;
        true
    }

    /// Feed a move, release or cancel.
    pub fn pointer_event<M: Measure + ?Sized>(
        &mut self,
        event: &PointerEvent,
        measure: &M,
    ) -> Option<DragOutcome> {
        if event.kind == PointerKind::Down {
            return None;
        }
        if !matches!(self.phase, DragPhase::Pending | DragPhase::Dragging) {
            return None;
        }

        let mut outcome = None;
        for semantic in self.recognizer.process(event) {
            match semantic {
                SemanticEvent::DragStart { .. } => {
                    self.phase = DragPhase::Dragging;
                    if let Some(s) = &self.session {
                        tracing::debug!(target: "taskdeck.drag", subject = %s.subject, "drag started");
                    }
                }
                SemanticEvent::DragMove { pos, .. } => {
                    let boundary = measure.measure(ElementKey::Panel);
                    if let Some(s) = self.session.as_mut() {
                        s.cursor = pos;
                        s.outside = boundary.is_some_and(|b| b.is_outside(pos));
                    }
                }
                SemanticEvent::DragEnd { pos, .. } => {
                    outcome = self.release(pos, event.time, measure);
                }
                SemanticEvent::Click { .. } => {
                    outcome = self
                        .take_session()
                        .map(|s| DragOutcome::Click { subject: s.subject });
                }
                SemanticEvent::DragCancel => {
                    tracing::debug!(target: "taskdeck.drag", "drag cancelled by platform");
                    outcome = self
                        .take_session()
                        .map(|s| DragOutcome::Cancelled { subject: s.subject });
                }
            }
        }

        // A pending press cancelled before the threshold leaves nothing behind.
        if event.kind == PointerKind::Cancel && self.phase == DragPhase::Pending {
            self.take_session();
        }
        outcome
    }

    fn release<M: Measure + ?Sized>(
        &mut self,
        pos: Point,
        now: Instant,
        measure: &M,
    ) -> Option<DragOutcome> {
        let boundary = measure.measure(ElementKey::Panel);
        let session = self.session.as_mut()?;
        session.cursor = pos;

        let outside = match boundary {
            Some(b) => b.is_outside(pos),
            None => {
                tracing::debug!(target: "taskdeck.drag", subject = %session.subject, "no boundary at release, snapping back");
                false
            }
        };
        session.outside = outside;

        if outside {
            let rect = session.floating_rect();
            let s = self.take_session()?;
            tracing::debug!(
                target: "taskdeck.drag",
                subject = %s.subject,
                x = rect.x,
                y = rect.y,
                "released outside, deleting"
            );
            return Some(DragOutcome::Delete {
                subject: s.subject,
                rect,
            });
        }

        let subject = session.subject.clone();
        if self.motion.is_reduced() || self.config.snap_back.is_zero() {
            self.take_session();
        } else {
            session.snap = Some(Snap {
                from: session.floating_rect(),
                started_at: now,
            });
            self.finish_snap
                .schedule(session.id, now + self.config.snap_back, ());
            self.phase = DragPhase::SnappingBack;
        }
        tracing::debug!(target: "taskdeck.drag", subject = %subject, "released inside, snapping back");
        Some(DragOutcome::SnapBack { subject })
    }

    /// Advance the snap-back. Returns `true` when a snap-back finished.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut finished = false;
        for (session_id, ()) in self.finish_snap.drain_due(now) {
            if self.session.as_ref().is_some_and(|s| s.id == session_id) {
                self.take_session();
                finished = true;
            }
        }
        finished
    }

    /// Abandon any drag immediately. Idempotent.
    pub fn reset(&mut self) {
        if self.session.is_some() {
            tracing::debug!(target: "taskdeck.drag", "drag reset");
        }
        self.finish_snap.cancel_all();
        self.take_session();
    }

    fn take_session(&mut self) -> Option<Session> {
        self.recognizer.reset();
        self.phase = DragPhase::Idle;
        self.session.take()
    }

    /// Floating card to draw, if a drag is visible.
    #[must_use]
    pub fn overlay(&self, now: Instant) -> Option<DragOverlay> {
        let s = self.session.as_ref()?;
        let (rect, snapping) = match (self.phase, s.snap) {
            (DragPhase::Dragging, _) => (s.floating_rect(), false),
            (DragPhase::SnappingBack, Some(snap)) => {
                let elapsed = now.saturating_duration_since(snap.started_at);
                let t = elapsed.as_secs_f32() / self.config.snap_back.as_secs_f32().max(f32::EPSILON);
                (snap.from.lerp(&s.origin_rect, ease_in_out(t)), true)
            }
            _ => return None,
        };
        Some(DragOverlay {
            subject: s.subject.clone(),
            rect,
            snapping,
            outside: s.outside,
        })
    }

    /// Height to reserve in the list for the lifted card.
    #[must_use]
    pub fn placeholder(&self) -> Option<(&ItemId, f32)> {
        match self.phase {
            DragPhase::Dragging | DragPhase::SnappingBack => self
                .session
                .as_ref()
                .map(|s| (&s.subject, s.origin_rect.height)),
            DragPhase::Idle | DragPhase::Pending => None,
        }
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DragConfig::default(), GestureConfig::default())
    }
}
