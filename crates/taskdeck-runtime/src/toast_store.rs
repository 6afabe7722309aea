#![forbid(unsafe_code)]

//! Shared toast list with change notification.
//!
//! A [`ToastStore`] is an explicit value the host owns (no process-wide
//! singleton). Every mutation replaces the snapshot and then calls each
//! subscriber with it, in subscription order.
//!
//! # Invariants
//!
//! 1. Toasts are ordered newest first.
//! 2. Generated ids are `toast-1`, `toast-2`, ... and never repeat until
//!    [`reset`](ToastStore::reset).
//! 3. After a dismissal that leaves at most one toast, `expanded` is false.

use std::fmt;
use std::rc::Rc;

use taskdeck_core::item::ItemId;
use web_time::{Duration, Instant};

/// Toast identifier.
pub type ToastId = ItemId;

/// Callback run just before a toast is removed by the toaster.
pub type DismissCallback = Rc<dyn Fn(&ToastId)>;

/// What to show. `From<&str>` gives a title-only toast.
#[derive(Clone, Default)]
pub struct ToastOptions {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Auto-dismiss delay; the store default when `None`.
    pub duration: Option<Duration>,
    /// Caller-chosen id; generated when `None`.
    pub id: Option<ToastId>,
    pub on_dismiss: Option<DismissCallback>,
}

impl ToastOptions {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<ToastId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn on_dismiss(mut self, f: impl Fn(&ToastId) + 'static) -> Self {
        self.on_dismiss = Some(Rc::new(f));
        self
    }
}

impl From<&str> for ToastOptions {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}

impl From<String> for ToastOptions {
    fn from(title: String) -> Self {
        Self::new(title)
    }
}

impl fmt::Debug for ToastOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastOptions")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("icon", &self.icon)
            .field("duration", &self.duration)
            .field("id", &self.id)
            .field("on_dismiss", &self.on_dismiss.is_some())
            .finish()
    }
}

/// One toast as stored.
#[derive(Clone)]
pub struct ToastData {
    pub id: ToastId,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub duration: Duration,
    pub created_at: Instant,
    pub on_dismiss: Option<DismissCallback>,
}

impl fmt::Debug for ToastData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastData")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("duration", &self.duration)
            .field("on_dismiss", &self.on_dismiss.is_some())
            .finish_non_exhaustive()
    }
}

/// Snapshot handed to subscribers.
#[derive(Debug, Clone, Default)]
pub struct ToastState {
    pub toasts: Vec<ToastData>,
    pub expanded: bool,
}

impl ToastState {
    #[must_use]
    pub fn get(&self, id: &ToastId) -> Option<&ToastData> {
        self.toasts.iter().find(|t| t.id == *id)
    }

    #[must_use]
    pub fn index_of(&self, id: &ToastId) -> Option<usize> {
        self.toasts.iter().position(|t| t.id == *id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ToastState)>;

pub struct ToastStore {
    state: ToastState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_listener: u64,
    counter: u64,
    default_duration: Duration,
}

impl ToastStore {
    /// Empty store with a 5 s default duration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_duration(Duration::from_millis(5000))
    }

    #[must_use]
    pub fn with_default_duration(default_duration: Duration) -> Self {
        Self {
            state: ToastState::default(),
            listeners: Vec::new(),
            next_listener: 0,
            counter: 0,
            default_duration,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ToastState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    #[must_use]
    pub fn snapshot(&self) -> &ToastState {
        &self.state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.toasts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.toasts.is_empty()
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.state.expanded
    }

    /// Prepend a toast and return its id.
    pub fn add(&mut self, options: impl Into<ToastOptions>, now: Instant) -> ToastId {
        let opts = options.into();
        let id = match opts.id {
            Some(id) => id,
            None => {
                self.counter += 1;
                ToastId::new(format!("toast-{}", self.counter))
            }
        };
        let data = ToastData {
            id: id.clone(),
            title: opts.title,
            description: opts.description,
            icon: opts.icon,
            duration: opts.duration.unwrap_or(self.default_duration),
            created_at: now,
            on_dismiss: opts.on_dismiss,
        };
        tracing::debug!(target: "taskdeck.toast", id = %id, "toast added");
        self.state.toasts.insert(0, data);
        self.emit();
        id
    }

    /// Remove one toast. Returns whether it existed.
    pub fn dismiss(&mut self, id: &ToastId) -> bool {
        let before = self.state.toasts.len();
        self.state.toasts.retain(|t| t.id != *id);
        if self.state.toasts.len() == before {
            return false;
        }
        if self.state.toasts.len() <= 1 {
            self.state.expanded = false;
        }
        tracing::debug!(target: "taskdeck.toast", id = %id, remaining = self.state.toasts.len(), "toast dismissed");
        self.emit();
        true
    }

    pub fn dismiss_all(&mut self) {
        self.state.toasts.clear();
        self.state.expanded = false;
        tracing::debug!(target: "taskdeck.toast", "all toasts dismissed");
        self.emit();
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.state.expanded = expanded;
        self.emit();
    }

    /// Clear toasts, the expanded flag and the id counter. Subscribers stay.
    pub fn reset(&mut self) {
        self.state = ToastState::default();
        self.counter = 0;
        self.emit();
    }

    fn emit(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ToastStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .field("counter", &self.counter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn ids(store: &ToastStore) -> Vec<String> {
        store
            .snapshot()
            .toasts
            .iter()
            .map(|t| t.id.as_str().to_owned())
            .collect()
    }

    #[test]
    fn newest_first_with_generated_ids() {
        let mut store = ToastStore::new();
        let now = Instant::now();
        assert_eq!(store.add("a", now), "toast-1");
        assert_eq!(store.add("b", now), "toast-2");
        assert_eq!(ids(&store), ["toast-2", "toast-1"]);
        assert_eq!(store.snapshot().toasts[0].duration, Duration::from_millis(5000));
    }

    #[test]
    fn explicit_id_and_duration() {
        let mut store = ToastStore::new();
        let id = store.add(
            ToastOptions::new("saved")
                .id("custom")
                .duration(Duration::from_secs(1)),
            Instant::now(),
        );
        assert_eq!(id, "custom");
        assert_eq!(store.snapshot().toasts[0].duration, Duration::from_secs(1));
        // generated counter untouched
        assert_eq!(store.add("x", Instant::now()), "toast-1");
    }

    #[test]
    fn dismiss_collapses_when_one_left() {
        let mut store = ToastStore::new();
        let now = Instant::now();
        let a = store.add("a", now);
        store.add("b", now);
        store.add("c", now);
        store.set_expanded(true);
        assert!(store.dismiss(&a));
        assert!(store.is_expanded());
        let first = store.snapshot().toasts[0].id.clone();
        store.dismiss(&first);
        assert!(!store.is_expanded());
        assert!(!store.dismiss(&ToastId::new("missing")));
    }

    #[test]
    fn subscribers_see_each_mutation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = ToastStore::new();
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |s: &ToastState| sink.borrow_mut().push(s.toasts.len()));
        let now = Instant::now();
        store.add("a", now);
        store.add("b", now);
        store.dismiss_all();
        assert_eq!(*seen.borrow(), [1, 2, 0]);

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.add("c", now);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn reset_restarts_ids() {
        let mut store = ToastStore::new();
        let now = Instant::now();
        store.add("a", now);
        store.set_expanded(true);
        store.reset();
        assert!(store.is_empty());
        assert!(!store.is_expanded());
        assert_eq!(store.add("b", now), "toast-1");
    }
}
