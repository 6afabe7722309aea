#![forbid(unsafe_code)]

//! Toast presentation: per-card lifecycle, auto-dismiss and swipe.
//!
//! [`Toaster`] owns a [`ToastStore`] and keeps one card record per stored
//! toast. Cards enter, stay visible until their duration elapses or they are
//! swiped away, and then play a short exit before the toast is removed from
//! the store.
//!
//! # Invariants
//!
//! 1. Auto-dismiss timers only run while the stack is collapsed. Expanding
//!    drops them; collapsing restarts them with each toast's full duration.
//! 2. Only the front card can be swiped while collapsed; any card can be
//!    swiped while expanded.
//! 3. An exiting card ignores input and is removed `exit_duration` after it
//!    started exiting, running its dismiss callback first.
//! 4. A tap that follows a swipe never expands the stack.

use rustc_hash::FxHashMap;
use taskdeck_core::event::{PointerEvent, PointerKind};
use taskdeck_core::motion::MotionPreference;
use taskdeck_core::semantic_event::{SwipeDirection, SwipeEvent};
use taskdeck_core::swipe::{SwipeConfig, SwipeRecognizer};
use taskdeck_layout::toast::{self, ExitKind, ToastConfig, ToastPhase, ToastSlot, ToastTransform};
use web_time::{Duration, Instant};

use crate::deferred::DeferredQueue;
use crate::toast_store::{ToastId, ToastOptions, ToastStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToastTimer {
    /// Duration elapsed; start the auto exit.
    BeginExit,
    /// Exit finished; drop from the store.
    Remove,
}

#[derive(Debug)]
struct Card {
    phase: ToastPhase,
    mounted_at: Instant,
    swipe: SwipeRecognizer,
    swipe_dx: f32,
}

/// Relative timestamp shown on a toast.
#[must_use]
pub fn time_ago(created_at: Instant, now: Instant) -> String {
    let secs = now.saturating_duration_since(created_at).as_secs();
    match secs {
        0..5 => "now".to_owned(),
        5..60 => format!("{secs}s ago"),
        60..3600 => format!("{}m ago", secs / 60),
        _ => format!("{}h ago", secs / 3600),
    }
}

#[derive(Debug)]
pub struct Toaster {
    config: ToastConfig,
    swipe_config: SwipeConfig,
    motion: MotionPreference,
    store: ToastStore,
    cards: FxHashMap<ToastId, Card>,
    timers: DeferredQueue<ToastId, ToastTimer>,
    card_height: Option<f32>,
    expanded_seen: bool,
}

impl Toaster {
    #[must_use]
    pub fn new(config: ToastConfig, swipe_config: SwipeConfig) -> Self {
        let store = ToastStore::with_default_duration(config.default_duration);
        Self {
            config,
            swipe_config,
            motion: MotionPreference::Full,
            store,
            cards: FxHashMap::default(),
            timers: DeferredQueue::new(),
            card_height: None,
            expanded_seen: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ToastConfig {
        &self.config
    }

    pub fn set_motion(&mut self, motion: MotionPreference) {
        self.motion = motion;
    }

    #[must_use]
    pub fn store(&self) -> &ToastStore {
        &self.store
    }

    /// Direct store access. Changes are picked up on the next call into the
    /// toaster.
    pub fn store_mut(&mut self) -> &mut ToastStore {
        &mut self.store
    }

    /// Show a toast.
    pub fn add(&mut self, options: impl Into<ToastOptions>, now: Instant) -> ToastId {
        let id = self.store.add(options, now);
        self.sync(now);
        id
    }

    /// Remove a toast immediately, without an exit animation or callback.
    pub fn dismiss(&mut self, id: &ToastId, now: Instant) -> bool {
        let removed = self.store.dismiss(id);
        self.sync(now);
        removed
    }

    /// The header's clear-all button.
    pub fn dismiss_all(&mut self, now: Instant) {
        self.store.dismiss_all();
        self.sync(now);
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.store.is_expanded()
    }

    pub fn set_expanded(&mut self, expanded: bool, now: Instant) {
        if self.store.is_expanded() != expanded {
            self.store.set_expanded(expanded);
        }
        self.sync(now);
    }

    /// A click landed outside the toast container.
    pub fn click_outside(&mut self, now: Instant) {
        if self.store.is_expanded() {
            tracing::debug!(target: "taskdeck.toast", "collapsed by outside click");
            self.set_expanded(false, now);
        }
    }

    /// Whether the header row ("show less", clear all) is shown.
    #[must_use]
    pub fn show_header(&self) -> bool {
        self.store.is_expanded() && self.store.len() > 1
    }

    /// Record the measured card height. Only the first measurement sticks.
    pub fn set_card_height(&mut self, height: f32) {
        if self.card_height.is_none() && height > 0.0 {
            self.card_height = Some(height);
        }
    }

    #[must_use]
    pub fn phase(&self, id: &ToastId) -> Option<ToastPhase> {
        self.cards.get(id).map(|c| c.phase)
    }

    /// Feed a pointer event that targets the card `id`.
    pub fn card_pointer(&mut self, id: &ToastId, event: &PointerEvent, now: Instant) {
        self.sync(now);
        let Some(index) = self.store.snapshot().index_of(id) else {
            return;
        };
        let expanded = self.store.is_expanded();
        let count = self.store.len();
        let Some(card) = self.cards.get_mut(id) else {
            return;
        };
        if matches!(card.phase, ToastPhase::Exiting(_)) {
            return;
        }
        if event.kind == PointerKind::Down {
            card.swipe.set_enabled(index == 0 || expanded);
        }

        match card.swipe.process(event) {
            Some(SwipeEvent::Move { delta_x }) => card.swipe_dx = delta_x,
            Some(SwipeEvent::Dismiss { direction, .. }) => {
                let kind = match direction {
                    SwipeDirection::Left => ExitKind::SwipeLeft,
                    SwipeDirection::Right => ExitKind::SwipeRight,
                };
                card.swipe_dx = 0.0;
                self.begin_exit(id, kind, now);
            }
            Some(SwipeEvent::Cancel) => card.swipe_dx = 0.0,
            Some(SwipeEvent::Tap) => {
                if !expanded && count > 1 {
                    tracing::debug!(target: "taskdeck.toast", id = %id, "expanded by click");
                    self.set_expanded(true, now);
                }
            }
            None => {}
        }
    }

    /// Advance timers and the enter animation.
    pub fn tick(&mut self, now: Instant) {
        self.sync(now);
        for (id, timer) in self.timers.drain_due(now) {
            match timer {
                ToastTimer::BeginExit => self.begin_exit(&id, ExitKind::Auto, now),
                ToastTimer::Remove => self.remove(&id),
            }
        }
        for card in self.cards.values_mut() {
            if card.phase == ToastPhase::Entering && now > card.mounted_at {
                card.phase = ToastPhase::Visible;
            }
        }
        self.sync(now);
    }

    /// Earliest pending timer, for hosts that sleep between frames.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_due()
    }

    /// Transforms of every toast, front first.
    #[must_use]
    pub fn transforms(&self) -> Vec<(ToastId, ToastTransform)> {
        let snapshot = self.store.snapshot();
        let count = snapshot.toasts.len();
        snapshot
            .toasts
            .iter()
            .enumerate()
            .map(|(index, t)| {
                let (phase, swipe_dx) = self
                    .cards
                    .get(&t.id)
                    .map_or((ToastPhase::Entering, 0.0), |c| (c.phase, c.swipe_dx));
                let slot = ToastSlot {
                    index,
                    count,
                    expanded: snapshot.expanded,
                    phase,
                    swipe_dx,
                    card_height: self.card_height,
                };
                (t.id.clone(), toast::toast_transform(slot, &self.config))
            })
            .collect()
    }

    #[must_use]
    pub fn container_height(&self) -> f32 {
        toast::container_height(
            self.store.len(),
            self.store.is_expanded(),
            self.card_height,
            &self.config,
        )
    }

    /// Transition length for the current state; zero while a card follows
    /// the finger or under reduced motion.
    #[must_use]
    pub fn transition_for(&self, id: &ToastId) -> Duration {
        if self.motion.is_reduced() {
            return Duration::ZERO;
        }
        match self.cards.get(id) {
            Some(c) if c.swipe_dx != 0.0 => Duration::ZERO,
            Some(Card {
                phase: ToastPhase::Exiting(_),
                ..
            }) => self.config.exit_duration,
            _ => self.config.enter_duration,
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn begin_exit(&mut self, id: &ToastId, kind: ExitKind, now: Instant) {
        let Some(card) = self.cards.get_mut(id) else {
            return;
        };
        if matches!(card.phase, ToastPhase::Exiting(_)) {
            return;
        }
        card.phase = ToastPhase::Exiting(kind);
        card.swipe.reset();
        self.timers.cancel_key(id);
        self.timers
            .schedule(id.clone(), now + self.config.exit_duration, ToastTimer::Remove);
        tracing::debug!(target: "taskdeck.toast", id = %id, ?kind, "toast exiting");
    }

    fn remove(&mut self, id: &ToastId) {
        if let Some(cb) = self.store.snapshot().get(id).and_then(|t| t.on_dismiss.clone()) {
            cb(id);
        }
        self.store.dismiss(id);
    }

    /// Reconcile card records and timers with the store.
    fn sync(&mut self, now: Instant) {
        let snapshot = self.store.snapshot();
        let expanded = snapshot.expanded;

        let stale: Vec<ToastId> = self
            .cards
            .keys()
            .filter(|id| snapshot.get(id).is_none())
            .cloned()
            .collect();
        for id in stale {
            self.cards.remove(&id);
            self.timers.cancel_key(&id);
        }

        for t in &snapshot.toasts {
            if self.cards.contains_key(&t.id) {
                continue;
            }
            let phase = if self.motion.is_reduced() {
                ToastPhase::Visible
            } else {
                ToastPhase::Entering
            };
            self.cards.insert(
                t.id.clone(),
                Card {
                    phase,
                    mounted_at: now,
                    swipe: SwipeRecognizer::new(self.swipe_config.clone()),
                    swipe_dx: 0.0,
                },
            );
            if !expanded {
                self.timers
                    .schedule(t.id.clone(), now + t.duration, ToastTimer::BeginExit);
            }
        }

        if expanded != self.expanded_seen {
            self.expanded_seen = expanded;
            for t in &snapshot.toasts {
                let Some(card) = self.cards.get(&t.id) else {
                    continue;
                };
                if matches!(card.phase, ToastPhase::Exiting(_)) {
                    continue;
                }
                self.timers.cancel_key(&t.id);
                if !expanded {
                    self.timers
                        .schedule(t.id.clone(), now + t.duration, ToastTimer::BeginExit);
                }
            }
        }
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(ToastConfig::default(), SwipeConfig::default())
    }
}
