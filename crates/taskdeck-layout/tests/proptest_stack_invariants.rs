//! Property-based invariant tests for the stack layout.
//!
//! 1. Band counts: one front card, `min(2, total - 1)` stacked, the rest
//!    hidden; nothing hidden when `total <= 1`.
//! 2. `z_index` strictly increases with index.
//! 3. Opening stagger is non-decreasing and bounded by base + window.
//! 4. Estimated offsets never go backwards for unmeasured items.

use proptest::prelude::*;
use taskdeck_layout::stack::{self, StackBand, StackConfig, StackItem};
use web_time::Duration;

fn arb_item() -> impl Strategy<Value = StackItem> {
    (
        prop::option::of(20.0f32..200.0),
        prop::option::of(0.0f32..2000.0),
    )
        .prop_map(|(height, offset)| StackItem { height, offset })
}

proptest! {
    #[test]
    fn band_counts(items in prop::collection::vec(arb_item(), 0..30)) {
        let cfg = StackConfig::default();
        let t = stack::collapsed(&items, &cfg);
        let total = items.len();
        let front = t.iter().filter(|t| t.band == StackBand::Front).count();
        let stacked = t.iter().filter(|t| matches!(t.band, StackBand::Stacked(_))).count();
        let hidden = t.iter().filter(|t| t.band == StackBand::Hidden).count();

        prop_assert_eq!(front, usize::from(total > 0));
        prop_assert_eq!(stacked, 2.min(total.saturating_sub(1)));
        prop_assert_eq!(hidden, total.saturating_sub(1 + stacked));
        if total <= 1 {
            prop_assert_eq!(hidden, 0);
        }
        for tr in &t {
            if tr.band == StackBand::Hidden {
                prop_assert_eq!(tr.opacity, 0.0);
                prop_assert!(tr.y.is_finite());
            }
        }
    }

    #[test]
    fn z_order(items in prop::collection::vec(arb_item(), 0..30)) {
        let t = stack::collapsed(&items, &StackConfig::default());
        for w in t.windows(2) {
            prop_assert!(w[0].z_index < w[1].z_index);
        }
    }

    #[test]
    fn opening_stagger_bounded(total in 1usize..200) {
        let cfg = StackConfig::default();
        let limit = cfg.stagger_base + cfg.stagger_window;
        let mut prev = Duration::ZERO;
        for i in 0..total {
            let d = stack::stagger_delay(i, total, true, &cfg);
            prop_assert!(d >= prev);
            prop_assert!(d <= limit);
            prev = d;
        }
    }

    #[test]
    fn estimated_offsets_advance(heights in prop::collection::vec(prop::option::of(20.0f32..200.0), 1..20)) {
        let items: Vec<_> = heights.iter().map(|&height| StackItem { height, offset: None }).collect();
        let resolved = stack::estimate_offsets(&items, &StackConfig::default());
        prop_assert_eq!(resolved[0].1, 0.0);
        for w in resolved.windows(2) {
            prop_assert!(w[1].1 > w[0].1);
        }
    }
}
