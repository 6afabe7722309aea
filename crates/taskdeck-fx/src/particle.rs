#![forbid(unsafe_code)]

//! Particle field construction and per-particle physics.
//!
//! A card rectangle is cut into square cells of edge `cell_size`; each cell
//! becomes one particle centred in it. Particles start attached (not drawn)
//! and are released row by row, bottom first, as the wave front climbs.
//!
//! # Invariants
//!
//! 1. `field.len() == ceil(w / cell) * ceil(h / cell)` for a non-empty rect,
//!    where `cell` is the configured size unless that grid would exceed
//!    [`MAX_PARTICLES`]; then the cell widens until the grid fits.
//! 2. `row_norm` is in [0, 1]; the bottom row is 0 and the top row is 1 (a
//!    single-row field is all 1).
//! 3. A particle is released at most once; release is the only place its
//!    velocity is randomized.

use rand::Rng;
use taskdeck_core::geometry::RectF;

use crate::dissolve::DissolveConfig;
use crate::surface::ParticleSprite;

/// Upper bound on the particles of one field.
pub const MAX_PARTICLES: usize = 250_000;

/// Smallest cell edge a configuration may ask for (px).
pub const MIN_CELL_SIZE: f32 = 0.5;

/// One cell of a dissolving card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Horizontal velocity (px/s).
    pub vx: f32,
    /// Vertical velocity (px/s, positive is downward).
    pub vy: f32,
    /// Edge length of the drawn square (px).
    pub size: f32,
    pub alpha: f32,
    /// Grey level of the fill.
    pub shade: u8,
    /// Wave position: 0 releases first (bottom), 1 last (top).
    pub row_norm: f32,
    /// Whether the wave front has released this particle.
    pub free: bool,
}

impl Particle {
    /// Drawable form of the particle.
    #[must_use]
    pub fn sprite(&self) -> ParticleSprite {
        ParticleSprite {
            x: self.x - self.size / 2.0,
            y: self.y - self.size / 2.0,
            size: self.size,
            alpha: self.alpha,
            shade: self.shade,
        }
    }

    /// Detach from the card: jitter position and assign a burst velocity.
    pub(crate) fn release<R: Rng>(&mut self, config: &DissolveConfig, rng: &mut R) {
        self.free = true;
        self.alpha = 1.0;
        self.x += rng.random_range(-config.jitter..=config.jitter);
        self.y += rng.random_range(-config.jitter..=config.jitter);
        self.vx = rng.random_range(-config.burst_speed_x..=config.burst_speed_x);
        self.vy = -rng.random_range(config.lift_min..=config.lift_max);
        if rng.random_bool(f64::from(config.fall_chance.clamp(0.0, 1.0))) {
            self.vy += rng.random_range(config.fall_min..=config.fall_max);
        }
    }

    /// Advance a released particle by `dt` seconds.
    pub(crate) fn integrate(&mut self, config: &DissolveConfig, dt: f32) {
        self.vy += config.gravity * dt;
        // Damping is specified per 60 Hz frame; scale it to the real step.
        self.vx *= config.horizontal_damping.powf(dt * 60.0);
        self.x += self.vx * dt;
        self.y += self.vy * dt;
    }
}

/// Columns and rows of the particle grid for `rect`.
#[must_use]
pub fn grid_dims(rect: &RectF, cell_size: f32) -> (usize, usize) {
    if rect.is_empty()
        || !rect.width.is_finite()
        || !rect.height.is_finite()
        || !(cell_size > 0.0)
    {
        return (0, 0);
    }
    let cols = (rect.width / cell_size).ceil() as usize;
    let rows = (rect.height / cell_size).ceil() as usize;
    (cols, rows)
}

/// Cell edge that keeps the grid of `rect` within [`MAX_PARTICLES`].
#[must_use]
pub fn fitted_cell(rect: &RectF, cell_size: f32) -> f32 {
    let fits = |cell: f32| {
        let (cols, rows) = grid_dims(rect, cell);
        cols.checked_mul(rows).is_some_and(|n| n <= MAX_PARTICLES)
    };
    if fits(cell_size) {
        return cell_size;
    }
    let base = (rect.width * rect.height / MAX_PARTICLES as f32)
        .sqrt()
        .max(cell_size);
    (0..64)
        .map(|step| base * 1.25f32.powi(step))
        .find(|&cell| fits(cell))
        .unwrap_or(f32::INFINITY)
}

/// Wave position of `row` in a grid of `rows` rows.
#[must_use]
pub fn row_norm(row: usize, rows: usize) -> f32 {
    if rows <= 1 {
        return 1.0;
    }
    1.0 - row as f32 / (rows - 1) as f32
}

/// Build the attached particle field covering `rect`.
pub fn build_field<R: Rng>(rect: &RectF, config: &DissolveConfig, rng: &mut R) -> Vec<Particle> {
    let cell = fitted_cell(rect, config.cell_size);
    let (cols, rows) = grid_dims(rect, cell);
    let mut field = Vec::with_capacity(cols.saturating_mul(rows).min(MAX_PARTICLES));

    for r in 0..rows {
        let norm = row_norm(r, rows);
        for c in 0..cols {
            field.push(Particle {
                x: rect.x + c as f32 * cell + cell / 2.0,
                y: rect.y + r as f32 * cell + cell / 2.0,
                vx: 0.0,
                vy: 0.0,
                size: rng.random_range(config.size_min..=config.size_max),
                alpha: 0.0,
                shade: rng.random_range(config.shade_min..=config.shade_max),
                row_norm: norm,
                free: false,
            });
        }
    }
    field
}
