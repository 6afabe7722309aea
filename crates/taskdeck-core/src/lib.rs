#![forbid(unsafe_code)]

//! Core: pointer input, gesture recognition and geometry for taskdeck.
//!
//! # Role in taskdeck
//! `taskdeck-core` is the input layer. It turns a raw pointer stream into
//! semantic gestures and owns the small shared vocabulary (rectangles, item
//! ids, statuses, cancellation, motion preference) that the effect, layout
//! and runtime crates build on.
//!
//! # Primary responsibilities
//! - **GestureRecognizer**: click vs drag classification with a distance
//!   threshold and a single active pointer.
//! - **SwipeRecognizer**: horizontal swipe-to-dismiss with distance and
//!   velocity thresholds.
//! - **Measure**: the capability through which the renderer reports element
//!   rectangles. Nothing in the core assumes a rendering technology.
//!
//! # How it fits in the system
//! `taskdeck-runtime` feeds [`event::PointerEvent`]s into the recognizers and
//! routes the resulting [`semantic_event::SemanticEvent`]s to the drag
//! controller and toaster. `taskdeck-fx` and `taskdeck-layout` only use the
//! geometry and animation helpers.

pub mod animation;
pub mod cancellation;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod item;
pub mod measure;
pub mod motion;
pub mod semantic_event;
pub mod serde_millis;
pub mod swipe;

pub use web_time::{Duration, Instant};
