#![forbid(unsafe_code)]

//! One-dimensional swipe-to-dismiss recognition.
//!
//! [`SwipeRecognizer`] follows a horizontal press → move → release and
//! decides whether the card was tapped, flung away or merely nudged.
//!
//! # Invariants
//!
//! 1. `Move` is emitted only while `|dx|` exceeds the click threshold.
//! 2. Every accepted press produces exactly one terminal event on release:
//!    `Tap`, `Dismiss` or `Cancel`.
//! 3. A disabled recognizer ignores presses; an in-flight swipe finishes
//!    normally even if the recognizer is disabled mid-gesture.

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::event::{PointerEvent, PointerKind};
use crate::semantic_event::{SwipeDirection, SwipeEvent};

/// Thresholds for swipe classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Horizontal distance (px) below which the gesture is still a tap.
    pub click_threshold: f32,
    /// Horizontal distance (px) that commits a dismissal.
    pub dismiss_distance: f32,
    /// Release velocity (px/ms) that commits a dismissal.
    pub dismiss_velocity: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            click_threshold: 5.0,
            dismiss_distance: 100.0,
            dismiss_velocity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SwipeTrack {
    start_x: f32,
    started_at: Instant,
    swiping: bool,
}

/// Horizontal swipe recognizer for a single card.
#[derive(Debug, Clone)]
pub struct SwipeRecognizer {
    config: SwipeConfig,
    enabled: bool,
    track: Option<SwipeTrack>,
}

impl SwipeRecognizer {
    #[must_use]
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            enabled: true,
            track: None,
        }
    }

    /// Enable or disable new presses.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the current press has turned into a swipe.
    #[must_use]
    pub fn is_swiping(&self) -> bool {
        self.track.is_some_and(|t| t.swiping)
    }

    #[must_use]
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn reset(&mut self) {
        self.track = None;
    }

    /// Feed one pointer event.
    pub fn process(&mut self, event: &PointerEvent) -> Option<SwipeEvent> {
        match event.kind {
            PointerKind::Down => {
                if !self.enabled || event.target.is_interactive() || self.is_swiping() {
                    return None;
                }
                self.track = Some(SwipeTrack {
                    start_x: event.pos.x,
                    started_at: event.time,
                    swiping: false,
                });
                None
            }
            PointerKind::Move => {
                let track = self.track.as_mut()?;
                let delta_x = event.pos.x - track.start_x;
                if delta_x.abs() > self.config.click_threshold {
                    track.swiping = true;
                    Some(SwipeEvent::Move { delta_x })
                } else {
                    None
                }
            }
            PointerKind::Up => {
                let track = self.track.take()?;
                if !track.swiping {
                    return Some(SwipeEvent::Tap);
                }
                let delta_x = event.pos.x - track.start_x;
                let elapsed_ms = event
                    .time
                    .saturating_duration_since(track.started_at)
                    .as_secs_f32()
                    * 1000.0;
                let velocity = delta_x.abs() / elapsed_ms.max(1.0);

                if delta_x.abs() >= self.config.dismiss_distance
                    || velocity >= self.config.dismiss_velocity
                {
                    let direction = SwipeDirection::from_delta(delta_x);
                    tracing::debug!(
                        target: "taskdeck.gesture",
                        delta_x,
                        velocity,
                        ?direction,
                        "swipe dismissed"
                    );
                    Some(SwipeEvent::Dismiss {
                        direction,
                        velocity,
                    })
                } else {
                    Some(SwipeEvent::Cancel)
                }
            }
            PointerKind::Cancel => {
                let track = self.track.take()?;
                track.swiping.then_some(SwipeEvent::Cancel)
            }
        }
    }
}

impl Default for SwipeRecognizer {
    fn default() -> Self {
        Self::new(SwipeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerTarget;
    use web_time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn tap_without_movement() {
        let mut sr = SwipeRecognizer::default();
        let t = Instant::now();
        assert_eq!(sr.process(&PointerEvent::down(50.0, 0.0, t)), None);
        assert_eq!(
            sr.process(&PointerEvent::up(52.0, 0.0, t + ms(80))),
            Some(SwipeEvent::Tap)
        );
    }

    #[test]
    fn move_reports_raw_signed_delta() {
        let mut sr = SwipeRecognizer::default();
        let t = Instant::now();
        sr.process(&PointerEvent::down(50.0, 0.0, t));
        assert_eq!(sr.process(&PointerEvent::moved(54.0, 0.0, t + ms(16))), None);
        assert_eq!(
            sr.process(&PointerEvent::moved(30.0, 0.0, t + ms(32))),
            Some(SwipeEvent::Move { delta_x: -20.0 })
        );
        assert!(sr.is_swiping());
    }

    #[test]
    fn far_slow_swipe_dismisses() {
        let mut sr = SwipeRecognizer::default();
        let t = Instant::now();
        sr.process(&PointerEvent::down(0.0, 0.0, t));
        sr.process(&PointerEvent::moved(60.0, 0.0, t + ms(500)));
        // 120 px over 2 s = 0.06 px/ms, but past the distance threshold.
        let ev = sr.process(&PointerEvent::up(120.0, 0.0, t + ms(2000)));
        assert!(matches!(
            ev,
            Some(SwipeEvent::Dismiss {
                direction: SwipeDirection::Right,
                ..
            })
        ));
    }

    #[test]
    fn short_fast_flick_dismisses() {
        let mut sr = SwipeRecognizer::default();
        let t = Instant::now();
        sr.process(&PointerEvent::down(100.0, 0.0, t));
        sr.process(&PointerEvent::moved(80.0, 0.0, t + ms(20)));
        // 40 px in 50 ms = 0.8 px/ms.
        let ev = sr.process(&PointerEvent::up(60.0, 0.0, t + ms(50)));
        assert!(matches!(
            ev,
            Some(SwipeEvent::Dismiss {
                direction: SwipeDirection::Left,
                ..
            })
        ));
    }

    #[test]
    fn short_slow_swipe_cancels() {
        let mut sr = SwipeRecognizer::default();
        let t = Instant::now();
        sr.process(&PointerEvent::down(0.0, 0.0, t));
        sr.process(&PointerEvent::moved(30.0, 0.0, t + ms(200)));
        assert_eq!(
            sr.process(&PointerEvent::up(40.0, 0.0, t + ms(400))),
            Some(SwipeEvent::Cancel)
        );
    }

    #[test]
    fn distance_threshold_is_inclusive() {
        let mut sr = SwipeRecognizer::default();
        let t = Instant::now();
        sr.process(&PointerEvent::down(0.0, 0.0, t));
        sr.process(&PointerEvent::moved(50.0, 0.0, t + ms(500)));
        let ev = sr.process(&PointerEvent::up(100.0, 0.0, t + ms(1000)));
        assert!(matches!(ev, Some(SwipeEvent::Dismiss { .. })));
    }

    #[test]
    fn zero_elapsed_does_not_divide_by_zero() {
        let mut sr = SwipeRecognizer::default();
        let t = Instant::now();
        sr.process(&PointerEvent::down(0.0, 0.0, t));
        sr.process(&PointerEvent::moved(10.0, 0.0, t));
        match sr.process(&PointerEvent::up(10.0, 0.0, t)) {
            Some(SwipeEvent::Dismiss { velocity, .. }) => assert_eq!(velocity, 10.0),
            other => panic!("expected dismiss, got {other:?}"),
        }
    }

    #[test]
    fn disabled_recognizer_ignores_presses() {
        let mut sr = SwipeRecognizer::default();
        sr.set_enabled(false);
        let t = Instant::now();
        sr.process(&PointerEvent::down(0.0, 0.0, t));
        assert_eq!(sr.process(&PointerEvent::moved(200.0, 0.0, t + ms(10))), None);
        assert_eq!(sr.process(&PointerEvent::up(200.0, 0.0, t + ms(20))), None);
    }

    #[test]
    fn button_press_is_ignored() {
        let mut sr = SwipeRecognizer::default();
        let t = Instant::now();
        sr.process(&PointerEvent::down(0.0, 0.0, t).on(PointerTarget::Button));
        assert_eq!(sr.process(&PointerEvent::up(0.0, 0.0, t + ms(20))), None);
    }

    #[test]
    fn platform_cancel_mid_swipe() {
        let mut sr = SwipeRecognizer::default();
        let t = Instant::now();
        sr.process(&PointerEvent::down(0.0, 0.0, t));
        sr.process(&PointerEvent::moved(30.0, 0.0, t + ms(16)));
        assert_eq!(
            sr.process(&PointerEvent::cancel(30.0, 0.0, t + ms(32))),
            Some(SwipeEvent::Cancel)
        );
        assert!(!sr.is_swiping());
    }
}
