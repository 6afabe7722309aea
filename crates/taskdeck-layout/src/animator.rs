#![forbid(unsafe_code)]

//! Animated transitions between stack layouts.
//!
//! [`StackAnimator`] keeps the last displayed transform of every item (keyed
//! by id) and eases each item from where it is to its new target when the
//! list or the expanded flag changes. Time only moves through
//! [`StackAnimator::tick`].
//!
//! # Invariants
//!
//! 1. After `tick(now)` with `now >= retarget + max(delay) + transition`,
//!    every displayed transform equals its target.
//! 2. An item that first appears starts at its target position with opacity
//!    0 and fades in.
//! 3. Under reduced motion targets are applied immediately.

use rustc_hash::FxHashMap;
use taskdeck_core::animation::{Tween, ease_out_cubic, lerp};
use taskdeck_core::item::ItemId;
use taskdeck_core::motion::MotionPreference;
use web_time::{Duration, Instant};

use crate::stack::{self, ItemTransform, StackConfig, StackItem};

#[derive(Debug, Clone, Copy)]
struct Track {
    from: ItemTransform,
    to: ItemTransform,
    current: ItemTransform,
    tween: Tween,
}

impl Track {
    fn settled(t: ItemTransform) -> Self {
        Self {
            from: t,
            to: t,
            current: t,
            tween: Tween::new(Duration::ZERO),
        }
    }

    fn sample(&mut self, elapsed: Duration) {
        let p = self.tween.progress(elapsed);
        if p >= 1.0 {
            self.current = self.to;
            return;
        }
        self.current = ItemTransform {
            y: lerp(self.from.y, self.to.y, p),
            scale: lerp(self.from.scale, self.to.scale, p),
            opacity: lerp(self.from.opacity, self.to.opacity, p),
            z_index: self.to.z_index,
            band: self.to.band,
        };
    }
}

/// Drives the task list between collapsed and expanded layouts.
#[derive(Debug, Clone)]
pub struct StackAnimator {
    config: StackConfig,
    motion: MotionPreference,
    expanded: bool,
    order: Vec<ItemId>,
    tracks: FxHashMap<ItemId, Track>,
    started_at: Option<Instant>,
    settle_after: Duration,
}

impl StackAnimator {
    #[must_use]
    pub fn new(config: StackConfig) -> Self {
        Self {
            config,
            motion: MotionPreference::Full,
            expanded: false,
            order: Vec::new(),
            tracks: FxHashMap::default(),
            started_at: None,
            settle_after: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn set_motion(&mut self, motion: MotionPreference) {
        self.motion = motion;
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Retarget every item.
    ///
    /// `ids` and `items` are parallel, in insertion order. `staggered`
    /// applies the open/close stagger delays; otherwise all items move
    /// together.
    pub fn set_target(
        &mut self,
        ids: &[ItemId],
        items: &[StackItem],
        expanded: bool,
        staggered: bool,
        now: Instant,
    ) {
        debug_assert_eq!(ids.len(), items.len());
        let targets = if expanded {
            stack::expanded(ids.len())
        } else {
            stack::collapsed(items, &self.config)
        };
        let total = ids.len();
        let instant = self.motion.is_reduced();

        let mut tracks = FxHashMap::default();
        let mut settle_after = Duration::ZERO;
        for (i, (id, to)) in ids.iter().zip(targets).enumerate() {
            let from = match self.tracks.get(id) {
                Some(track) => track.current,
                None => ItemTransform { opacity: 0.0, ..to },
            };
            let track = if instant {
                Track::settled(to)
            } else {
                let delay = if staggered {
                    stack::stagger_delay(i, total, expanded, &self.config)
                } else {
                    Duration::ZERO
                };
                let tween = Tween::new(self.config.transition)
                    .easing(ease_out_cubic)
                    .delay(delay);
                settle_after = settle_after.max(tween.total());
                Track {
                    from,
                    to,
                    current: from,
                    tween,
                }
            };
            tracks.insert(id.clone(), track);
        }

        tracing::debug!(
            target: "taskdeck.layout",
            total,
            expanded,
            staggered,
            "stack retargeted"
        );

        self.expanded = expanded;
        self.order = ids.to_vec();
        self.tracks = tracks;
        self.started_at = (!instant).then_some(now);
        self.settle_after = settle_after;
    }

    /// Advance to `now`. Returns `true` while any item is still moving.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(start) = self.started_at else {
            return false;
        };
        let elapsed = now.saturating_duration_since(start);
        for track in self.tracks.values_mut() {
            track.sample(elapsed);
        }
        if elapsed >= self.settle_after {
            self.started_at = None;
        }
        self.started_at.is_some()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.started_at.is_some()
    }

    /// Displayed transform of one item.
    #[must_use]
    pub fn transform(&self, id: &ItemId) -> Option<ItemTransform> {
        self.tracks.get(id).map(|t| t.current)
    }

    /// Displayed transforms in list order.
    #[must_use]
    pub fn transforms(&self) -> Vec<(ItemId, ItemTransform)> {
        self.order
            .iter()
            .filter_map(|id| self.tracks.get(id).map(|t| (id.clone(), t.current)))
            .collect()
    }
}

impl Default for StackAnimator {
    fn default() -> Self {
        Self::new(StackConfig::default())
    }
}
