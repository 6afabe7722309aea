#![forbid(unsafe_code)]

//! Layout for taskdeck card lists.
//!
//! - [`stack`]: the collapsed "peek stack" and expanded list transforms for
//!   the task panel, with stagger delays and offset estimation.
//! - [`animator`]: drives transitions between two stack layouts over time.
//! - [`toast`]: the toast stack transforms and container height.
//! - [`scroll`]: scroll-edge fade indicators.
//!
//! Everything except [`animator::StackAnimator`] is a pure function of its
//! inputs.

pub mod animator;
pub mod scroll;
pub mod stack;
pub mod toast;

pub use animator::StackAnimator;
pub use scroll::ScrollFade;
pub use stack::{ItemTransform, StackBand, StackConfig, StackItem};
pub use toast::{ExitKind, ToastConfig, ToastPhase, ToastSlot, ToastTransform};
