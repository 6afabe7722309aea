#![forbid(unsafe_code)]

//! Particle dissolution engine.
//!
//! [`DissolveEngine`] turns a card rectangle into a field of particles that
//! peel off bottom-first, fly up under a burst velocity, fall under gravity
//! and fade out. Each run carries a completion value of type `T` which is
//! returned from [`DissolveEngine::tick`] exactly once when the run ends.
//!
//! # Run modes
//!
//! - **Simulated**: the default. Particles are integrated every tick and drawn
//!   to a per-run [`ParticleSurface`].
//! - **Timer-only**: no particles. Used under reduced motion (fixed short
//!   deadline) and when the [`SurfaceProvider`] has no drawable context
//!   (nominal duration). The completion still fires.
//!
//! # Invariants
//!
//! 1. A run's completion value is returned at most once.
//! 2. A cancelled run never returns its completion value.
//! 3. Every surface acquired for a run is released exactly once, whether the
//!    run completes or is cancelled.
//! 4. Runs share no mutable state except the engine's seed generator.
//!
//! # Failure Modes
//!
//! - Surface acquisition fails: warn and degrade to timer-only.
//! - Zero-area rectangle: the field is empty and the run completes on its
//!   first tick.
//! - A stalled host (long gap between ticks): the physics step is clamped to
//!   `max_step`, progress still follows wall time.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use taskdeck_core::cancellation::{CancellationSource, CancellationToken};
use taskdeck_core::geometry::RectF;
use taskdeck_core::motion::MotionPreference;
use web_time::{Duration, Instant};

use crate::particle::{MIN_CELL_SIZE, Particle, build_field};
use crate::surface::{ParticleSurface, SpriteStore, SurfaceProvider};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning for the dissolution effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DissolveConfig {
    /// Edge of one particle cell (px).
    pub cell_size: f32,
    /// Downward acceleration (px/s²).
    pub gravity: f32,
    /// Position jitter applied on release (± px per axis).
    pub jitter: f32,
    /// Horizontal burst speed bound (± px/s).
    pub burst_speed_x: f32,
    /// Upward burst speed range (px/s).
    pub lift_min: f32,
    pub lift_max: f32,
    /// Probability that a released particle also gets a downward kick.
    pub fall_chance: f32,
    pub fall_min: f32,
    pub fall_max: f32,
    /// Horizontal velocity retained per 60 Hz frame.
    pub horizontal_damping: f32,
    /// Fraction of the duration over which the release wave crosses the card.
    pub wave_fraction: f32,
    /// Progress after which particles start fading.
    pub fade_start: f32,
    /// Alpha at or below which a particle counts as invisible.
    pub visibility_floor: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub shade_min: u8,
    pub shade_max: u8,
    /// Upper bound on one physics step.
    #[serde(with = "taskdeck_core::serde_millis")]
    pub max_step: Duration,
    /// Used when `start` is called without an explicit duration.
    #[serde(with = "taskdeck_core::serde_millis")]
    pub duration: Duration,
    /// Completion delay under reduced motion.
    #[serde(with = "taskdeck_core::serde_millis")]
    pub reduced_motion_delay: Duration,
}

impl Default for DissolveConfig {
    fn default() -> Self {
        Self {
            cell_size: 2.0,
            gravity: 600.0,
            jitter: 3.0,
            burst_speed_x: 100.0,
            lift_min: 60.0,
            lift_max: 180.0,
            fall_chance: 0.15,
            fall_min: 80.0,
            fall_max: 140.0,
            horizontal_damping: 0.993,
            wave_fraction: 0.5,
            fade_start: 0.8,
            visibility_floor: 0.01,
            size_min: 0.5,
            size_max: 1.5,
            shade_min: 230,
            shade_max: 250,
            max_step: Duration::from_millis(50),
            duration: Duration::from_millis(1200),
            reduced_motion_delay: Duration::from_millis(50),
        }
    }
}

impl DissolveConfig {
    /// Human-readable problems with this configuration; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.cell_size >= MIN_CELL_SIZE) {
            errors.push(format!(
                "dissolve.cell_size must be >= {MIN_CELL_SIZE}, got {}",
                self.cell_size
            ));
        }
        if self.lift_min > self.lift_max {
            errors.push("dissolve.lift_min must be <= lift_max".to_owned());
        }
        if self.fall_min > self.fall_max {
            errors.push("dissolve.fall_min must be <= fall_max".to_owned());
        }
        if self.size_min > self.size_max {
            errors.push("dissolve.size_min must be <= size_max".to_owned());
        }
        if self.shade_min > self.shade_max {
            errors.push("dissolve.shade_min must be <= shade_max".to_owned());
        }
        if self.jitter < 0.0 || self.burst_speed_x < 0.0 {
            errors.push("dissolve.jitter and burst_speed_x must be >= 0".to_owned());
        }
        if !(0.0..=1.0).contains(&self.fall_chance) {
            errors.push(format!(
                "dissolve.fall_chance must be in [0, 1], got {}",
                self.fall_chance
            ));
        }
        if !(self.wave_fraction > 0.0 && self.wave_fraction <= 1.0) {
            errors.push(format!(
                "dissolve.wave_fraction must be in (0, 1], got {}",
                self.wave_fraction
            ));
        }
        if !(0.0..1.0).contains(&self.fade_start) {
            errors.push(format!(
                "dissolve.fade_start must be in [0, 1), got {}",
                self.fade_start
            ));
        }
        if self.max_step.is_zero() {
            errors.push("dissolve.max_step must be > 0".to_owned());
        }
        errors
    }

    /// Alpha of a released particle at `progress` (0..=1).
    #[must_use]
    pub fn alpha_at(&self, progress: f32) -> f32 {
        if progress <= self.fade_start {
            return 1.0;
        }
        let span = (1.0 - self.fade_start).max(f32::EPSILON);
        (1.0 - (progress - self.fade_start) / span).clamp(0.0, 1.0)
    }

    /// Wave front position at `elapsed` into a run of `duration`.
    #[must_use]
    pub fn wave_front(&self, elapsed: Duration, duration: Duration) -> f32 {
        let window = duration.as_secs_f32() * self.wave_fraction;
        if window <= 0.0 {
            return 1.0;
        }
        (elapsed.as_secs_f32() / window).min(1.0)
    }
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Identifier of one dissolution run, unique per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u64);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dissolve#{}", self.0)
    }
}

/// Cancel handle returned by [`DissolveEngine::start`].
///
/// Cancelling is idempotent and harmless after the run has completed.
#[derive(Debug, Clone)]
pub struct DissolveHandle {
    run: RunId,
    source: CancellationSource,
}

impl DissolveHandle {
    #[must_use]
    pub fn run(&self) -> RunId {
        self.run
    }

    /// Stop the run without reporting completion.
    ///
    /// Returns `true` if this call performed the cancellation.
    pub fn cancel(&self) -> bool {
        self.source.cancel()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.source.is_cancelled()
    }
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

enum RunMode {
    Simulated {
        particles: Vec<Particle>,
        surface: Box<dyn ParticleSurface>,
        rng: SmallRng,
        last_tick: Instant,
    },
    TimerOnly {
        deadline: Duration,
    },
}

enum Step {
    Running,
    Complete,
    Cancelled,
}

struct Run<T> {
    id: RunId,
    source_rect: RectF,
    started_at: Instant,
    duration: Duration,
    mode: RunMode,
    source: CancellationSource,
    token: CancellationToken,
    completion: T,
}

impl<T> Run<T> {
    fn step(&mut self, config: &DissolveConfig, now: Instant) -> Step {
        if self.token.is_cancelled() {
            return Step::Cancelled;
        }
        let elapsed = now.saturating_duration_since(self.started_at);

        match &mut self.mode {
            RunMode::TimerOnly { deadline } => {
                if elapsed >= *deadline {
                    Step::Complete
                } else {
                    Step::Running
                }
            }
            RunMode::Simulated {
                particles,
                surface,
                rng,
                last_tick,
            } => {
                let dt = now
                    .saturating_duration_since(*last_tick)
                    .min(config.max_step)
                    .as_secs_f32();
                *last_tick = now;

                let progress = if self.duration.is_zero() {
                    1.0
                } else {
                    (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
                };
                let wave = config.wave_front(elapsed, self.duration);
                let alpha = config.alpha_at(progress);

                surface.begin_frame();
                let mut all_gone = true;
                for p in particles.iter_mut() {
                    if !p.free {
                        if p.row_norm <= wave {
                            p.release(config, rng);
                        } else {
                            all_gone = false;
                            continue;
                        }
                    }
                    p.integrate(config, dt);
                    p.alpha = alpha;
                    if p.alpha > config.visibility_floor {
                        all_gone = false;
                        surface.draw(p.sprite());
                    }
                }
                surface.end_frame();

                tracing::trace!(
                    target: "taskdeck.dissolve",
                    run = self.id.0,
                    progress,
                    wave,
                    dt,
                    "dissolve frame"
                );

                if progress >= 1.0 || all_gone {
                    Step::Complete
                } else {
                    Step::Running
                }
            }
        }
    }

    fn has_surface(&self) -> bool {
        matches!(self.mode, RunMode::Simulated { .. })
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Drives any number of independent dissolution runs.
pub struct DissolveEngine<T> {
    config: DissolveConfig,
    motion: MotionPreference,
    surfaces: Box<dyn SurfaceProvider>,
    rng: SmallRng,
    next_id: u64,
    runs: Vec<Run<T>>,
}

impl<T> DissolveEngine<T> {
    /// Engine drawing into an in-memory [`SpriteStore`], seeded from the OS.
    #[must_use]
    pub fn new(config: DissolveConfig) -> Self {
        Self::with_rng(config, SmallRng::from_os_rng())
    }

    /// Deterministic engine for tests and replays.
    #[must_use]
    pub fn with_seed(config: DissolveConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: DissolveConfig, rng: SmallRng) -> Self {
        Self {
            config,
            motion: MotionPreference::Full,
            surfaces: Box::new(SpriteStore::new()),
            rng,
            next_id: 0,
            runs: Vec::new(),
        }
    }

    /// Replace the surface provider used by runs started from now on.
    #[must_use]
    pub fn surfaces(mut self, provider: impl SurfaceProvider + 'static) -> Self {
        self.surfaces = Box::new(provider);
        self
    }

    #[must_use]
    pub fn config(&self) -> &DissolveConfig {
        &self.config
    }

    pub fn set_motion(&mut self, motion: MotionPreference) {
        self.motion = motion;
    }

    #[must_use]
    pub fn motion(&self) -> MotionPreference {
        self.motion
    }

    /// Start dissolving `rect`.
    ///
    /// `duration` defaults to [`DissolveConfig::duration`]. `completion` is
    /// handed back from [`tick`](Self::tick) once the run finishes.
    pub fn start(
        &mut self,
        rect: RectF,
        duration: Option<Duration>,
        now: Instant,
        completion: T,
    ) -> DissolveHandle {
        let id = RunId(self.next_id);
        self.next_id += 1;
        let duration = duration.unwrap_or(self.config.duration);

        let mode = if self.motion.is_reduced() {
            RunMode::TimerOnly {
                deadline: self.config.reduced_motion_delay,
            }
        } else if let Some(surface) = self.surfaces.acquire(id, rect) {
            let mut rng = SmallRng::seed_from_u64(self.rng.random());
            let particles = build_field(&rect, &self.config, &mut rng);
            RunMode::Simulated {
                particles,
                surface,
                rng,
                last_tick: now,
            }
        } else {
            tracing::warn!(
                target: "taskdeck.dissolve",
                run = id.0,
                "no drawable surface, completing on timer"
            );
            RunMode::TimerOnly { deadline: duration }
        };

        let particle_count = match &mode {
            RunMode::Simulated { particles, .. } => particles.len(),
            RunMode::TimerOnly { .. } => 0,
        };
        tracing::debug!(
            target: "taskdeck.dissolve",
            run = id.0,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            duration_ms = duration.as_millis() as u64,
            particle_count,
            "dissolve started"
        );

        let source = CancellationSource::new();
        let token = source.token();
        self.runs.push(Run {
            id,
            source_rect: rect,
            started_at: now,
            duration,
            mode,
            source: source.clone(),
            token,
            completion,
        });
        DissolveHandle { run: id, source }
    }

    /// Advance every run to `now`; returns the completion values of runs that
    /// finished this frame, in start order.
    pub fn tick(&mut self, now: Instant) -> Vec<T> {
        let mut completed = Vec::new();
        let runs = std::mem::take(&mut self.runs);
        for mut run in runs {
            match run.step(&self.config, now) {
                Step::Running => self.runs.push(run),
                Step::Complete => {
                    tracing::debug!(target: "taskdeck.dissolve", run = run.id.0, "dissolve complete");
                    if run.has_surface() {
                        self.surfaces.release(run.id);
                    }
                    completed.push(run.completion);
                }
                Step::Cancelled => {
                    tracing::debug!(target: "taskdeck.dissolve", run = run.id.0, "dissolve cancelled");
                    if run.has_surface() {
                        self.surfaces.release(run.id);
                    }
                }
            }
        }
        completed
    }

    /// Cancel one run immediately. Returns `false` if it is not active.
    pub fn cancel(&mut self, run: RunId) -> bool {
        let Some(pos) = self.runs.iter().position(|r| r.id == run) else {
            return false;
        };
        let run = self.runs.remove(pos);
        run.source.cancel();
        if run.has_surface() {
            self.surfaces.release(run.id);
        }
        tracing::debug!(target: "taskdeck.dissolve", run = run.id.0, "dissolve cancelled");
        true
    }

    /// Cancel every active run without reporting.
    pub fn cancel_all(&mut self) {
        for run in std::mem::take(&mut self.runs) {
            run.source.cancel();
            if run.has_surface() {
                self.surfaces.release(run.id);
            }
        }
    }

    #[must_use]
    pub fn is_active(&self, run: RunId) -> bool {
        self.runs.iter().any(|r| r.id == run && !r.token.is_cancelled())
    }

    /// Number of runs not yet completed or reaped.
    #[must_use]
    pub fn active_runs(&self) -> usize {
        self.runs.len()
    }

    /// Particle field of a simulated run.
    #[must_use]
    pub fn particles(&self, run: RunId) -> Option<&[Particle]> {
        self.runs.iter().find(|r| r.id == run).and_then(|r| match &r.mode {
            RunMode::Simulated { particles, .. } => Some(particles.as_slice()),
            RunMode::TimerOnly { .. } => None,
        })
    }

    /// Rectangle a run was started with.
    #[must_use]
    pub fn source_rect(&self, run: RunId) -> Option<RectF> {
        self.runs.iter().find(|r| r.id == run).map(|r| r.source_rect)
    }
}

impl<T> std::fmt::Debug for DissolveEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DissolveEngine")
            .field("motion", &self.motion)
            .field("active_runs", &self.runs.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
