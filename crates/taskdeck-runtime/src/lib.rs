#![forbid(unsafe_code)]

//! Runtime for taskdeck: the stateful pieces that sit between raw input and
//! rendering.
//!
//! # Role in taskdeck
//! The core crate recognizes gestures, the fx crate dissolves rectangles and
//! the layout crate computes transforms. This crate owns state over time and
//! connects them:
//!
//! - [`drag::DragController`]: drag-to-delete with containment and snap-back.
//! - [`panel::TaskPanel`]: the task list, dissolution of deleted cards and
//!   the animated stack.
//! - [`toast_store::ToastStore`] and [`toaster::Toaster`]: notifications with
//!   auto-dismiss and swipe.
//! - [`config::TaskdeckConfig`]: every tunable, loadable from TOML or JSON.
//! - [`logging`]: optional subscriber setup for hosts.
//!
//! Everything is single-threaded and frame-driven: time only advances
//! through the `now` passed to each `tick`/`frame`.

pub mod config;
pub mod deferred;
pub mod drag;
pub mod logging;
pub mod panel;
pub mod toast_store;
pub mod toaster;

pub use config::{ConfigError, TaskdeckConfig};
pub use deferred::DeferredQueue;
pub use drag::{DragConfig, DragController, DragOutcome, DragOverlay, DragPhase};
pub use panel::{PanelConfig, RemovalSink, Task, TaskPanel};
pub use toast_store::{SubscriptionId, ToastData, ToastId, ToastOptions, ToastState, ToastStore};
pub use toaster::{Toaster, time_ago};
