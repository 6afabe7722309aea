#![forbid(unsafe_code)]

//! Drawing seam between the dissolution engine and the host renderer.
//!
//! Each dissolution run asks a [`SurfaceProvider`] for its own
//! [`ParticleSurface`] when it starts and hands it back when it ends. A
//! provider that cannot produce a surface (no drawable context) makes the run
//! fall back to a timer-only completion.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use taskdeck_core::geometry::RectF;

use crate::dissolve::RunId;

/// A particle ready to draw: a filled square with top-left at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSprite {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub alpha: f32,
    /// Grey level; the host maps it to `rgb(shade, shade, shade)`.
    pub shade: u8,
}

/// Per-run drawing target.
pub trait ParticleSurface {
    /// Start a new frame, discarding the previous one.
    fn begin_frame(&mut self);

    fn draw(&mut self, sprite: ParticleSprite);

    /// Finish the frame.
    fn end_frame(&mut self) {}
}

/// Creates and tears down per-run surfaces.
pub trait SurfaceProvider {
    /// Acquire a surface for a run covering `source`. `None` means no drawable
    /// context is available.
    fn acquire(&mut self, run: RunId, source: RectF) -> Option<Box<dyn ParticleSurface>>;

    /// Called once when the run ends, completed or cancelled.
    fn release(&mut self, _run: RunId) {}
}

/// A provider that never has a drawable context.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSurface;

impl SurfaceProvider for NoSurface {
    fn acquire(&mut self, _run: RunId, _source: RectF) -> Option<Box<dyn ParticleSurface>> {
        None
    }
}

type Frame = Rc<RefCell<Vec<ParticleSprite>>>;

struct BufferSurface {
    frame: Frame,
    pending: Vec<ParticleSprite>,
}

impl ParticleSurface for BufferSurface {
    fn begin_frame(&mut self) {
        self.pending.clear();
    }

    fn draw(&mut self, sprite: ParticleSprite) {
        self.pending.push(sprite);
    }

    fn end_frame(&mut self) {
        self.frame.borrow_mut().clone_from(&self.pending);
    }
}

/// In-memory provider: keeps the last presented frame of every live run.
///
/// Cloning a `SpriteStore` yields a handle onto the same frames, so a host can
/// give one clone to the engine and read sprites through another.
#[derive(Clone, Default)]
pub struct SpriteStore {
    frames: Rc<RefCell<FxHashMap<RunId, Frame>>>,
}

impl SpriteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sprites presented by `run` in its latest frame.
    #[must_use]
    pub fn sprites(&self, run: RunId) -> Vec<ParticleSprite> {
        self.frames
            .borrow()
            .get(&run)
            .map(|f| f.borrow().clone())
            .unwrap_or_default()
    }

    /// Number of runs currently holding a surface.
    #[must_use]
    pub fn live_surfaces(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl std::fmt::Debug for SpriteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteStore")
            .field("live_surfaces", &self.live_surfaces())
            .finish()
    }
}

impl SurfaceProvider for SpriteStore {
    fn acquire(&mut self, run: RunId, _source: RectF) -> Option<Box<dyn ParticleSurface>> {
        let frame: Frame = Rc::default();
        self.frames.borrow_mut().insert(run, Rc::clone(&frame));
        Some(Box::new(BufferSurface {
            frame,
            pending: Vec::new(),
        }))
    }

    fn release(&mut self, run: RunId) {
        self.frames.borrow_mut().remove(&run);
    }
}
