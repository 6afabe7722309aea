//! Property-based invariant tests for the click/drag recognizer.
//!
//! 1. A stroke whose every sample stays within the threshold yields exactly
//!    one `Click` and no drag events.
//! 2. A stroke that reaches the threshold yields exactly one `DragStart`,
//!    then only `DragMove`s, then exactly one `DragEnd`, and never a `Click`.
//! 3. Swipe release always yields exactly one terminal event.

use proptest::prelude::*;
use taskdeck_core::event::PointerEvent;
use taskdeck_core::gesture::{GestureConfig, GestureRecognizer};
use taskdeck_core::semantic_event::{SemanticEvent, SwipeEvent};
use taskdeck_core::swipe::SwipeRecognizer;
use taskdeck_core::{Duration, Instant};

const THRESHOLD: f32 = 5.0;

fn run_stroke(points: &[(f32, f32)]) -> Vec<SemanticEvent> {
    let mut gr = GestureRecognizer::new(GestureConfig {
        drag_threshold: THRESHOLD,
    });
    let t0 = Instant::now();
    let mut out = gr.process(&PointerEvent::down(0.0, 0.0, t0));
    let mut t = t0;
    for &(x, y) in points {
        t += Duration::from_millis(16);
        out.extend(gr.process(&PointerEvent::moved(x, y, t)));
    }
    let (lx, ly) = points.last().copied().unwrap_or((0.0, 0.0));
    out.extend(gr.process(&PointerEvent::up(lx, ly, t + Duration::from_millis(16))));
    out
}

// Points strictly inside a circle of radius THRESHOLD around the origin.
fn arb_small_point() -> impl Strategy<Value = (f32, f32)> {
    (0.0f32..std::f32::consts::TAU, 0.0f32..(THRESHOLD - 0.01))
        .prop_map(|(a, r)| (r * a.cos(), r * a.sin()))
}

fn arb_point() -> impl Strategy<Value = (f32, f32)> {
    (-400.0f32..400.0, -400.0f32..400.0)
}

proptest! {
    #[test]
    fn sub_threshold_strokes_are_clicks(points in prop::collection::vec(arb_small_point(), 0..20)) {
        let events = run_stroke(&points);
        prop_assert_eq!(events.len(), 1);
        let is_click = matches!(events[0], SemanticEvent::Click { .. });
        prop_assert!(is_click);
    }

    #[test]
    fn drag_sequences_are_well_formed(
        prefix in prop::collection::vec(arb_small_point(), 0..5),
        far in ((THRESHOLD + 0.01)..300.0f32, 0.0f32..std::f32::consts::TAU),
        rest in prop::collection::vec(arb_point(), 0..20),
    ) {
        let (r, a) = far;
        let mut points = prefix;
        points.push((r * a.cos(), r * a.sin()));
        points.extend(rest);

        let events = run_stroke(&points);
        let starts = events.iter().filter(|e| matches!(e, SemanticEvent::DragStart { .. })).count();
        let ends = events.iter().filter(|e| matches!(e, SemanticEvent::DragEnd { .. })).count();
        let clicks = events.iter().filter(|e| matches!(e, SemanticEvent::Click { .. })).count();
        prop_assert_eq!(starts, 1);
        prop_assert_eq!(ends, 1);
        prop_assert_eq!(clicks, 0);
        let first_is_start = matches!(events.first(), Some(SemanticEvent::DragStart { .. }));
        let last_is_end = matches!(events.last(), Some(SemanticEvent::DragEnd { .. }));
        prop_assert!(first_is_start);
        prop_assert!(last_is_end);
        for ev in &events[1..events.len() - 1] {
            let is_move = matches!(ev, SemanticEvent::DragMove { .. });
            prop_assert!(is_move);
        }
    }

    #[test]
    fn swipe_release_is_always_terminal(
        xs in prop::collection::vec(-300.0f32..300.0, 0..10),
        hold_ms in 0u64..3000,
    ) {
        let mut sr = SwipeRecognizer::default();
        let t0 = Instant::now();
        prop_assert!(sr.process(&PointerEvent::down(0.0, 0.0, t0)).is_none());
        for (i, &x) in xs.iter().enumerate() {
            let ev = sr.process(&PointerEvent::moved(x, 0.0, t0 + Duration::from_millis(i as u64)));
            let ok = matches!(ev, None | Some(SwipeEvent::Move { .. }));
            prop_assert!(ok);
        }
        let last = xs.last().copied().unwrap_or(0.0);
        let ev = sr.process(&PointerEvent::up(last, 0.0, t0 + Duration::from_millis(hold_ms)));
        let terminal = matches!(
            ev,
            Some(SwipeEvent::Tap | SwipeEvent::Cancel | SwipeEvent::Dismiss { .. })
        );
        prop_assert!(terminal);
        if let Some(SwipeEvent::Dismiss { velocity, .. }) = ev {
            prop_assert!(velocity >= 0.0);
        }
    }
}
