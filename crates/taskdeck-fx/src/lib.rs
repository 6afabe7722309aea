#![forbid(unsafe_code)]

//! Visual effects for taskdeck.
//!
//! Currently one effect: the particle dissolution that plays when a card is
//! dragged out of its panel. See [`dissolve`] for the engine, [`particle`]
//! for the field construction and physics, and [`surface`] for the drawing
//! seam the host implements.

pub mod dissolve;
pub mod particle;
pub mod surface;

pub use dissolve::{DissolveConfig, DissolveEngine, DissolveHandle, RunId};
pub use particle::Particle;
pub use surface::{NoSurface, ParticleSprite, ParticleSurface, SpriteStore, SurfaceProvider};
