#![forbid(unsafe_code)]

//! Taskdeck public facade crate.
//!
//! Re-exports the types a host needs to drive a task panel and a toaster,
//! plus a small prelude. The subsystem crates stay reachable as
//! [`core`], [`fx`], [`layout`] and [`runtime`] for anything not lifted here.
//!
//! ```ignore
//! use taskdeck::prelude::*;
//!
//! let config = taskdeck::load_config("taskdeck.toml")?;
//! let mut panel = TaskPanel::new(&config);
//! let mut toaster = Toaster::new(config.toast.clone(), config.swipe.clone());
//! ```

pub mod error;

use std::path::Path;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use taskdeck_core::animation::{Tween, ease_in_out, ease_out_cubic, lerp};
pub use taskdeck_core::cancellation::{CancellationSource, CancellationToken};
pub use taskdeck_core::event::{PointerEvent, PointerKind, PointerTarget};
pub use taskdeck_core::geometry::{Point, RectF};
pub use taskdeck_core::gesture::{GestureConfig, GestureRecognizer};
pub use taskdeck_core::item::{ItemId, ItemStatus, StatusSet};
pub use taskdeck_core::measure::{ElementKey, Measure, MeasureMap};
pub use taskdeck_core::motion::MotionPreference;
pub use taskdeck_core::semantic_event::{SemanticEvent, SwipeDirection, SwipeEvent};
pub use taskdeck_core::swipe::{SwipeConfig, SwipeRecognizer};
pub use taskdeck_core::{Duration, Instant};

// --- Effect re-exports -----------------------------------------------------

pub use taskdeck_fx::{
    DissolveConfig, DissolveEngine, DissolveHandle, NoSurface, Particle, ParticleSprite,
    ParticleSurface, RunId, SpriteStore, SurfaceProvider,
};

// --- Layout re-exports -----------------------------------------------------

pub use taskdeck_layout::{
    ExitKind, ItemTransform, ScrollFade, StackAnimator, StackBand, StackConfig, StackItem,
    ToastConfig, ToastPhase, ToastSlot, ToastTransform,
};

// --- Runtime re-exports ----------------------------------------------------

pub use taskdeck_runtime::logging;
pub use taskdeck_runtime::{
    ConfigError, DragConfig, DragController, DragOutcome, DragOverlay, DragPhase, PanelConfig,
    RemovalSink, SubscriptionId, Task, TaskPanel, TaskdeckConfig, ToastData, ToastId,
    ToastOptions, ToastState, ToastStore, Toaster, time_ago,
};

// --- Setup helpers ---------------------------------------------------------

/// Load and validate a configuration file (TOML, or JSON by extension).
pub fn load_config(path: impl AsRef<Path>) -> Result<TaskdeckConfig> {
    Ok(TaskdeckConfig::load(path)?)
}

/// Install the default log subscriber (filter from `TASKDECK_LOG`).
pub fn init_logging() -> Result<()> {
    Ok(logging::init_default()?)
}

// --- Prelude ---------------------------------------------------------------

/// Everyday imports for hosts.
pub mod prelude {
    pub use crate::{
        DissolveEngine, DragOutcome, Duration, Error, Instant, ItemId, ItemStatus, Measure,
        MeasureMap, MotionPreference, PointerEvent, RectF, Result, Task, TaskPanel,
        TaskdeckConfig, ToastOptions, Toaster,
    };

    pub use crate::{core, fx, layout, runtime};
}

pub use taskdeck_core as core;
pub use taskdeck_fx as fx;
pub use taskdeck_layout as layout;
pub use taskdeck_runtime as runtime;
