#![forbid(unsafe_code)]

//! The task panel: list state plus drag-to-delete, dissolution and the
//! animated stack.
//!
//! [`TaskPanel`] owns the ordered task list and wires the components
//! together. A card dragged out of the panel dissolves; when the dissolution
//! finishes the task leaves the list and the host hears about it through
//! [`RemovalSink::request_removal`], exactly once.
//!
//! # Frame order
//!
//! [`TaskPanel::frame`] advances, in order: the drag snap-back, dissolution
//! runs (delivering removals), then the stack animator. Pointer input
//! arriving between frames is applied immediately.
//!
//! # Invariants
//!
//! 1. A dissolving task is not visible and cannot be dragged.
//! 2. Collapsing resets the drag, cancels every dissolution and clears the
//!    dissolving set; cancelled runs never reach the sink.
//! 3. While executing, presses never start a drag.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use taskdeck_core::event::PointerEvent;
use taskdeck_core::geometry::RectF;
use taskdeck_core::item::{ItemId, ItemStatus};
use taskdeck_core::measure::{ElementKey, Measure};
use taskdeck_core::motion::MotionPreference;
use taskdeck_fx::{DissolveEngine, DissolveHandle};
use taskdeck_layout::{ItemTransform, StackAnimator, StackItem};
use web_time::{Duration, Instant};

use crate::config::TaskdeckConfig;
use crate::drag::{DragController, DragOutcome, DragOverlay};

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ItemStatus,
}

impl Task {
    #[must_use]
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status: ItemStatus::Idle,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Length of the dissolve played for a deleted card.
    #[serde(with = "taskdeck_core::serde_millis")]
    pub dissolve_duration: Duration,
    /// After expanding, list changes within this window still stagger.
    #[serde(with = "taskdeck_core::serde_millis")]
    pub just_expanded_window: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            dissolve_duration: Duration::from_millis(700),
            just_expanded_window: Duration::from_millis(500),
        }
    }
}

/// Receives tasks whose deletion has finished.
pub trait RemovalSink {
    fn request_removal(&mut self, id: &ItemId);
}

impl<F: FnMut(&ItemId)> RemovalSink for F {
    fn request_removal(&mut self, id: &ItemId) {
        self(id);
    }
}

/// Header line for `count` tasks.
#[must_use]
pub fn summary_text(count: usize) -> String {
    match count {
        1 => "One task is extracted".to_owned(),
        2 => "Two tasks are extracted".to_owned(),
        3 => "Three tasks are extracted".to_owned(),
        4 => "Four tasks are extracted".to_owned(),
        n => format!("{n} tasks are extracted"),
    }
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct TaskPanel {
    config: PanelConfig,
    tasks: Vec<Task>,
    expanded: bool,
    executing: bool,
    drag: DragController,
    dissolve: DissolveEngine<ItemId>,
    dissolving: FxHashMap<ItemId, DissolveHandle>,
    animator: StackAnimator,
    /// Last measured rect of each visible card.
    measured: FxHashMap<ItemId, RectF>,
    new_ids: FxHashSet<ItemId>,
    just_expanded_until: Option<Instant>,
    layout_dirty: bool,
    staggered_retarget: bool,
}

impl TaskPanel {
    #[must_use]
    pub fn new(config: &TaskdeckConfig) -> Self {
        Self {
            config: config.panel.clone(),
            tasks: Vec::new(),
            expanded: false,
            executing: false,
            drag: DragController::new(config.drag.clone(), config.gesture.clone()),
            dissolve: DissolveEngine::new(config.dissolve.clone()),
            dissolving: FxHashMap::default(),
            animator: StackAnimator::new(config.stack.clone()),
            measured: FxHashMap::default(),
            new_ids: FxHashSet::default(),
            just_expanded_until: None,
            layout_dirty: true,
            staggered_retarget: false,
        }
    }

    /// Replace the dissolution engine (seeded, or with a drawing surface).
    #[must_use]
    pub fn with_engine(mut self, mut engine: DissolveEngine<ItemId>) -> Self {
        engine.set_motion(self.dissolve.motion());
        self.dissolve = engine;
        self
    }

    pub fn set_motion(&mut self, motion: MotionPreference) {
        self.drag.set_motion(motion);
        self.dissolve.set_motion(motion);
        self.animator.set_motion(motion);
    }

    // -----------------------------------------------------------------------
    // List state
    // -----------------------------------------------------------------------

    /// Every task, including ones currently dissolving.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks shown in the list.
    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(|t| !self.dissolving.contains_key(&t.id))
    }

    #[must_use]
    pub fn task(&self, id: &ItemId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    fn task_mut(&mut self, id: &ItemId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == *id)
    }

    /// Replace the whole list. Ids not seen before are marked new while
    /// expanded. A dropped id loses its drag and its dissolution, and is
    /// never reported to the removal sink.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        if self.expanded && !self.tasks.is_empty() {
            let known: FxHashSet<&ItemId> = self.tasks.iter().map(|t| &t.id).collect();
            let added: Vec<ItemId> = tasks
                .iter()
                .filter(|t| !known.contains(&t.id))
                .map(|t| t.id.clone())
                .collect();
            self.new_ids.extend(added);
        }
        let kept: FxHashSet<&ItemId> = tasks.iter().map(|t| &t.id).collect();
        if self.drag.subject().is_some_and(|s| !kept.contains(s)) {
            self.drag.reset();
        }
        let dropped: Vec<ItemId> = self
            .dissolving
            .keys()
            .filter(|id| !kept.contains(id))
            .cloned()
            .collect();
        for id in dropped {
            if let Some(handle) = self.dissolving.remove(&id) {
                handle.cancel();
                self.dissolve.cancel(handle.run());
                tracing::debug!(target: "taskdeck.panel", id = %id, "dissolve dropped with its task");
            }
        }
        self.measured.retain(|id, _| kept.contains(id));
        self.new_ids.retain(|id| kept.contains(id));
        self.tasks = tasks;
        self.layout_dirty = true;
    }

    /// Append one task.
    pub fn push_task(&mut self, task: Task) {
        if self.expanded && !self.tasks.is_empty() {
            self.new_ids.insert(task.id.clone());
        }
        self.tasks.push(task);
        self.layout_dirty = true;
    }

    /// Whether `id` was added while expanded and has not finished entering.
    #[must_use]
    pub fn is_new(&self, id: &ItemId) -> bool {
        self.new_ids.contains(id)
    }

    /// Idle ↔ Selected. Other statuses are left alone.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        let Some(task) = self.task_mut(id) else {
            return false;
        };
        task.status = match task.status {
            ItemStatus::Idle => ItemStatus::Selected,
            ItemStatus::Selected => ItemStatus::Idle,
            other => {
                tracing::trace!(target: "taskdeck.panel", id = %id, status = ?other, "toggle ignored");
                return false;
            }
        };
        true
    }

    /// Executor-driven status change.
    pub fn set_status(&mut self, id: &ItemId, status: ItemStatus) -> bool {
        let Some(task) = self.task_mut(id) else {
            return false;
        };
        tracing::debug!(target: "taskdeck.panel", id = %id, from = ?task.status, to = ?status, "status changed");
        task.status = status;
        true
    }

    pub fn edit_title(&mut self, id: &ItemId, title: impl Into<String>) -> bool {
        let Some(task) = self.task_mut(id) else {
            return false;
        };
        task.title = title.into();
        true
    }

    pub fn edit_description(&mut self, id: &ItemId, description: impl Into<String>) -> bool {
        let Some(task) = self.task_mut(id) else {
            return false;
        };
        task.description = description.into();
        true
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.visible_tasks()
            .filter(|t| t.status == ItemStatus::Selected)
            .count()
    }

    /// No visible task is left undone.
    #[must_use]
    pub fn all_done(&self) -> bool {
        self.visible_tasks().all(|t| t.status == ItemStatus::Done)
    }

    #[must_use]
    pub fn delegate_enabled(&self) -> bool {
        !self.all_done() && self.selected_count() > 0
    }

    /// Label of the delegate button.
    #[must_use]
    pub fn delegate_label(&self) -> String {
        if self.executing {
            return "Execute".to_owned();
        }
        match self.selected_count() {
            0 => "Select task".to_owned(),
            1 => "Delegate 1 task".to_owned(),
            n => format!("Delegate {n} tasks"),
        }
    }

    #[must_use]
    pub fn summary_text(&self) -> String {
        summary_text(self.tasks.len())
    }

    // -----------------------------------------------------------------------
    // Expansion and execution
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn expand(&mut self, now: Instant) {
        if self.expanded {
            return;
        }
        self.expanded = true;
        self.just_expanded_until = Some(now + self.config.just_expanded_window);
        self.layout_dirty = true;
        self.staggered_retarget = true;
        tracing::debug!(target: "taskdeck.panel", tasks = self.tasks.len(), "panel expanded");
    }

    /// Collapse and abandon any drag or dissolution in flight.
    pub fn collapse(&mut self) {
        if !self.expanded {
            return;
        }
        self.expanded = false;
        self.just_expanded_until = None;
        self.drag.reset();
        self.dissolve.cancel_all();
        let abandoned = self.dissolving.len();
        for handle in self.dissolving.values() {
            handle.cancel();
        }
        self.dissolving.clear();
        self.new_ids.clear();
        self.layout_dirty = true;
        self.staggered_retarget = true;
        tracing::debug!(target: "taskdeck.panel", abandoned, "panel collapsed");
    }

    #[must_use]
    pub fn is_executing(&self) -> bool {
        self.executing
    }

    pub fn set_executing(&mut self, executing: bool) {
        self.executing = executing;
        self.drag.set_enabled(!executing);
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Press on the card `id`. Ignored while collapsed.
    pub fn pointer_down<M: Measure + ?Sized>(
        &mut self,
        id: &ItemId,
        event: &PointerEvent,
        measure: &M,
    ) -> bool {
        if !self.expanded {
            tracing::trace!(target: "taskdeck.panel", id = %id, "press on collapsed panel ignored");
            return false;
        }
        if self.dissolving.contains_key(id) {
            tracing::trace!(target: "taskdeck.panel", id = %id, "press on dissolving card ignored");
            return false;
        }
        let Some(status) = self.task(id).map(|t| t.status) else {
            return false;
        };
        self.drag.pointer_down(id, status, event, measure)
    }

    /// Move, release or cancel. A release outside the panel starts the
    /// dissolve.
    pub fn pointer_event<M: Measure + ?Sized>(
        &mut self,
        event: &PointerEvent,
        measure: &M,
    ) -> Option<DragOutcome> {
        let outcome = self.drag.pointer_event(event, measure)?;
        if let DragOutcome::Delete { subject, rect } = &outcome {
            let handle = self.dissolve.start(
                *rect,
                Some(self.config.dissolve_duration),
                event.time,
                subject.clone(),
            );
            tracing::debug!(target: "taskdeck.panel", id = %subject, run = %handle.run(), "dissolve started");
            self.dissolving.insert(subject.clone(), handle);
            self.layout_dirty = true;
        }
        Some(outcome)
    }

    /// Abandon the drag in progress.
    pub fn cancel_drag(&mut self) {
        self.drag.reset();
    }

    // -----------------------------------------------------------------------
    // Frame
    // -----------------------------------------------------------------------

    /// Advance everything to `now`. Returns whether another frame is needed.
    pub fn frame<M, S>(&mut self, now: Instant, measure: &M, sink: &mut S) -> bool
    where
        M: Measure + ?Sized,
        S: RemovalSink + ?Sized,
    {
        self.drag.tick(now);

        for id in self.dissolve.tick(now) {
            if self.dissolving.remove(&id).is_none() {
                continue;
            }
            self.tasks.retain(|t| t.id != id);
            self.measured.remove(&id);
            self.new_ids.remove(&id);
            self.layout_dirty = true;
            tracing::debug!(target: "taskdeck.panel", id = %id, remaining = self.tasks.len(), "task removed");
            sink.request_removal(&id);
        }

        self.refresh_measurements(measure);

        if self.just_expanded_until.is_some_and(|until| now >= until) {
            self.just_expanded_until = None;
        }
        if self.layout_dirty {
            self.retarget(now);
        }

        let animating = self.animator.tick(now);
        if !animating && !self.new_ids.is_empty() {
            self.new_ids.clear();
        }

        animating || self.dissolve.active_runs() > 0 || self.drag.overlay(now).is_some()
    }

    fn refresh_measurements<M: Measure + ?Sized>(&mut self, measure: &M) {
        for task in &self.tasks {
            if self.dissolving.contains_key(&task.id) {
                continue;
            }
            let Some(rect) = measure
                .measure(ElementKey::Item(&task.id))
                .filter(|r| r.height > 0.0)
            else {
                continue;
            };
            if self.measured.get(&task.id) != Some(&rect) {
                self.measured.insert(task.id.clone(), rect);
                self.layout_dirty = true;
            }
        }
    }

    /// Natural offsets are measured from the first visible card's top. If
    /// that card is unmeasured every offset is estimated.
    fn retarget(&mut self, now: Instant) {
        let top = self
            .visible_tasks()
            .next()
            .and_then(|t| self.measured.get(&t.id))
            .map(|r| r.y);
        let (ids, items): (Vec<ItemId>, Vec<StackItem>) = self
            .visible_tasks()
            .map(|t| {
                let rect = self.measured.get(&t.id);
                let item = StackItem {
                    height: rect.map(|r| r.height),
                    offset: top.zip(rect).map(|(top, r)| r.y - top),
                };
                (t.id.clone(), item)
            })
            .unzip();
        let staggered = self.staggered_retarget || self.just_expanded_until.is_some();
        self.animator
            .set_target(&ids, &items, self.expanded, staggered, now);
        self.layout_dirty = false;
        self.staggered_retarget = false;
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// Current transforms of the visible tasks, in list order.
    #[must_use]
    pub fn transforms(&self) -> Vec<(ItemId, ItemTransform)> {
        self.animator.transforms()
    }

    #[must_use]
    pub fn transform(&self, id: &ItemId) -> Option<ItemTransform> {
        self.animator.transform(id)
    }

    #[must_use]
    pub fn overlay(&self, now: Instant) -> Option<DragOverlay> {
        self.drag.overlay(now)
    }

    /// Height to reserve in place of the lifted card.
    #[must_use]
    pub fn placeholder(&self) -> Option<(&ItemId, f32)> {
        self.drag.placeholder()
    }

    #[must_use]
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    #[must_use]
    pub fn dissolve(&self) -> &DissolveEngine<ItemId> {
        &self.dissolve
    }

    #[must_use]
    pub fn is_dissolving(&self, id: &ItemId) -> bool {
        self.dissolving.contains_key(id)
    }
}

impl Default for TaskPanel {
    fn default() -> Self {
        Self::new(&TaskdeckConfig::default())
    }
}
