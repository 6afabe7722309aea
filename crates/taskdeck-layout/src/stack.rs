#![forbid(unsafe_code)]

//! Collapsed peek-stack and expanded list transforms.
//!
//! Items are given in insertion order. While collapsed the last item is the
//! front card; up to `max_stacked` items before it peek out behind it at
//! decreasing scale, and anything older is hidden but still positioned so it
//! can animate in when removals shift it into the visible band. While
//! expanded every item sits at its natural position.
//!
//! # Invariants
//!
//! 1. `stacked = min(max_stacked, total - 1)`; hidden = `total - 1 - stacked`.
//! 2. With `total <= 1` nothing is hidden.
//! 3. `z_index` strictly increases with index, so the front card is on top.
//! 4. The opening stagger is non-decreasing in `index` and never exceeds
//!    `stagger_base + stagger_window`.
//!
//! # Failure Modes
//!
//! - Scale/opacity tables shorter than `max_stacked`: the last entry is
//!   reused (validation reports it).
//! - Unmeasured items: height falls back to `default_height`, offset is
//!   estimated from the previous item.

use serde::{Deserialize, Serialize};
use web_time::Duration;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Geometry and timing of the task stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Cards visible behind the front card while collapsed.
    pub max_stacked: usize,
    /// Scale per stacked depth, nearest first.
    pub stack_scales: Vec<f32>,
    /// Opacity per stacked depth, nearest first.
    pub stack_opacities: Vec<f32>,
    /// Vertical overlap of the front card (px).
    pub front_overlap: f32,
    /// How far each stacked card peeks out (px).
    pub peek_per_card: f32,
    /// Vertical gap between expanded cards (px).
    pub gap: f32,
    /// Height assumed for an unmeasured card (px).
    pub default_height: f32,
    #[serde(with = "taskdeck_core::serde_millis")]
    pub stagger_base: Duration,
    /// Upper bound of the per-item opening stagger.
    #[serde(with = "taskdeck_core::serde_millis")]
    pub stagger_step: Duration,
    /// Total spread of the opening stagger across all items.
    #[serde(with = "taskdeck_core::serde_millis")]
    pub stagger_window: Duration,
    /// Per-item closing stagger.
    #[serde(with = "taskdeck_core::serde_millis")]
    pub close_step: Duration,
    /// Duration of one card's transition.
    #[serde(with = "taskdeck_core::serde_millis")]
    pub transition: Duration,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            max_stacked: 2,
            stack_scales: vec![0.94, 0.88],
            stack_opacities: vec![1.0, 0.85],
            front_overlap: 52.0,
            peek_per_card: 8.0,
            gap: 6.0,
            default_height: 72.0,
            stagger_base: Duration::from_millis(50),
            stagger_step: Duration::from_millis(40),
            stagger_window: Duration::from_millis(300),
            close_step: Duration::from_millis(20),
            transition: Duration::from_millis(300),
        }
    }
}

impl StackConfig {
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.stack_scales.len() < self.max_stacked {
            errors.push(format!(
                "stack.stack_scales has {} entries, max_stacked is {}",
                self.stack_scales.len(),
                self.max_stacked
            ));
        }
        if self.stack_opacities.len() < self.max_stacked {
            errors.push(format!(
                "stack.stack_opacities has {} entries, max_stacked is {}",
                self.stack_opacities.len(),
                self.max_stacked
            ));
        }
        if self.stack_scales.iter().any(|s| *s <= 0.0) {
            errors.push("stack.stack_scales must be > 0".to_owned());
        }
        if self
            .stack_opacities
            .iter()
            .any(|o| !(0.0..=1.0).contains(o))
        {
            errors.push("stack.stack_opacities must be in [0, 1]".to_owned());
        }
        if self.default_height <= 0.0 {
            errors.push("stack.default_height must be > 0".to_owned());
        }
        errors
    }

    fn scale_at(&self, depth: usize) -> f32 {
        table_at(&self.stack_scales, depth, 1.0)
    }

    fn opacity_at(&self, depth: usize) -> f32 {
        table_at(&self.stack_opacities, depth, 1.0)
    }
}

fn table_at(table: &[f32], i: usize, fallback: f32) -> f32 {
    table
        .get(i)
        .or_else(|| table.last())
        .copied()
        .unwrap_or(fallback)
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Measurements of one item, either of which may be unknown yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StackItem {
    pub height: Option<f32>,
    /// Natural top offset within the list.
    pub offset: Option<f32>,
}

impl StackItem {
    #[must_use]
    pub const fn measured(height: f32, offset: f32) -> Self {
        Self {
            height: Some(height),
            offset: Some(offset),
        }
    }

    #[must_use]
    pub const fn unmeasured() -> Self {
        Self {
            height: None,
            offset: None,
        }
    }
}

/// Where a collapsed item sits in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackBand {
    Front,
    /// Peeking behind the front card at this depth (0 nearest).
    Stacked(usize),
    Hidden,
    /// Expanded list: natural position.
    Natural,
}

/// Per-item visual transform relative to the item's natural position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemTransform {
    pub y: f32,
    pub scale: f32,
    pub opacity: f32,
    pub z_index: i32,
    pub band: StackBand,
}

impl ItemTransform {
    /// The expanded-list transform.
    #[must_use]
    pub const fn identity(z_index: i32) -> Self {
        Self {
            y: 0.0,
            scale: 1.0,
            opacity: 1.0,
            z_index,
            band: StackBand::Natural,
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Number of cards peeking behind the front card.
#[must_use]
pub fn stacked_count(total: usize, config: &StackConfig) -> usize {
    config.max_stacked.min(total.saturating_sub(1))
}

/// Band of `index` in a collapsed stack of `total` items.
#[must_use]
pub fn band_of(index: usize, total: usize, config: &StackConfig) -> StackBand {
    if total == 0 || index + 1 >= total {
        return StackBand::Front;
    }
    let stacked = stacked_count(total, config);
    let first_stacked = total - 1 - stacked;
    if index >= first_stacked {
        StackBand::Stacked(total - 2 - index)
    } else {
        StackBand::Hidden
    }
}

/// Resolve heights and natural offsets, estimating unmeasured ones.
///
/// An unmeasured offset is the previous item's offset plus its height plus
/// the gap.
#[must_use]
pub fn estimate_offsets(items: &[StackItem], config: &StackConfig) -> Vec<(f32, f32)> {
    let mut out: Vec<(f32, f32)> = Vec::with_capacity(items.len());
    for item in items {
        let height = item.height.unwrap_or(config.default_height);
        let offset = item.offset.unwrap_or_else(|| {
            out.last()
                .map_or(0.0, |&(h, off)| off + h + config.gap)
        });
        out.push((height, offset));
    }
    out
}

/// Transform of one item in the collapsed stack.
#[must_use]
pub fn collapsed_transform(
    index: usize,
    total: usize,
    height: f32,
    natural_offset: f32,
    config: &StackConfig,
) -> ItemTransform {
    let z_index = i32::try_from(index + 1).unwrap_or(i32::MAX);
    let peeked_y = |depth: usize, scale: f32| {
        config.front_overlap + (depth + 1) as f32 * config.peek_per_card - height * scale
            - natural_offset
    };

    match band_of(index, total, config) {
        StackBand::Front | StackBand::Natural => ItemTransform {
            y: -natural_offset,
            scale: 1.0,
            opacity: 1.0,
            z_index,
            band: StackBand::Front,
        },
        StackBand::Stacked(k) => {
            let scale = config.scale_at(k);
            ItemTransform {
                y: peeked_y(k, scale),
                scale,
                opacity: config.opacity_at(k),
                z_index,
                band: StackBand::Stacked(k),
            }
        }
        StackBand::Hidden => {
            let depth = stacked_count(total, config);
            let scale = config.scale_at(depth);
            ItemTransform {
                y: peeked_y(depth, scale),
                scale,
                opacity: 0.0,
                z_index,
                band: StackBand::Hidden,
            }
        }
    }
}

/// Collapsed transforms for the whole list.
#[must_use]
pub fn collapsed(items: &[StackItem], config: &StackConfig) -> Vec<ItemTransform> {
    let total = items.len();
    estimate_offsets(items, config)
        .into_iter()
        .enumerate()
        .map(|(i, (h, off))| collapsed_transform(i, total, h, off, config))
        .collect()
}

/// Expanded transforms for a list of `total` items.
#[must_use]
pub fn expanded(total: usize) -> Vec<ItemTransform> {
    (0..total)
        .map(|i| ItemTransform::identity(i32::try_from(i + 1).unwrap_or(i32::MAX)))
        .collect()
}

/// Start delay of item `index` when the list opens or closes.
#[must_use]
pub fn stagger_delay(index: usize, total: usize, opening: bool, config: &StackConfig) -> Duration {
    if opening {
        let spread = config.stagger_window / u32::try_from(total.max(1)).unwrap_or(u32::MAX);
        let per_item = config.stagger_step.min(spread);
        // index * per_item never leaves the window while index < total.
        config.stagger_base + per_item * u32::try_from(index.min(total.max(1) - 1)).unwrap_or(0)
    } else {
        let from_back = total.saturating_sub(1).saturating_sub(index);
        config.close_step * u32::try_from(from_back).unwrap_or(u32::MAX)
    }
}
