#![forbid(unsafe_code)]

//! Toast stack layout.
//!
//! Toasts are ordered newest first (index 0 is the front card). Collapsed,
//! the first `visible` toasts shrink and shift down slightly per index and
//! the rest are hidden behind them. Expanded, they form a list under an
//! optional header.

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// How a toast leaves the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitKind {
    SwipeLeft,
    SwipeRight,
    /// Auto-dismiss timer fired.
    Auto,
}

/// Lifecycle of one toast card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToastPhase {
    /// Mounted, not yet shown.
    #[default]
    Entering,
    Visible,
    Exiting(ExitKind),
}

/// Toast geometry and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    /// Toasts shown in the collapsed stack.
    pub visible_toasts: usize,
    /// Vertical gap between expanded toasts (px).
    pub gap: f32,
    /// Scale per collapsed index.
    pub scales: Vec<f32>,
    /// Downward shift per collapsed index (px).
    pub translate_y: Vec<f32>,
    /// Corner radius per collapsed index (px).
    pub radii: Vec<f32>,
    /// Corner radius of every expanded toast (px).
    pub expanded_radius: f32,
    pub header_height: f32,
    pub header_gap: f32,
    /// Card height used until one is measured (px).
    pub default_card_height: f32,
    /// Container height used until a card is measured (px).
    pub default_container_height: f32,
    /// Horizontal travel of a swiped-away toast; also the swipe fade span.
    pub swipe_exit_distance: f32,
    #[serde(with = "taskdeck_core::serde_millis")]
    pub default_duration: Duration,
    #[serde(with = "taskdeck_core::serde_millis")]
    pub exit_duration: Duration,
    #[serde(with = "taskdeck_core::serde_millis")]
    pub enter_duration: Duration,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            visible_toasts: 3,
            gap: 6.0,
            scales: vec![1.0, 0.88, 0.77],
            translate_y: vec![0.0, 8.0, 14.0],
            radii: vec![20.0, 17.6, 15.5],
            expanded_radius: 20.0,
            header_height: 23.0,
            header_gap: 8.0,
            default_card_height: 72.0,
            default_container_height: 80.0,
            swipe_exit_distance: 400.0,
            default_duration: Duration::from_millis(5000),
            exit_duration: Duration::from_millis(200),
            enter_duration: Duration::from_millis(350),
        }
    }
}

impl ToastConfig {
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.visible_toasts == 0 {
            errors.push("toast.visible_toasts must be >= 1".to_owned());
        }
        for (name, table) in [
            ("scales", &self.scales),
            ("translate_y", &self.translate_y),
            ("radii", &self.radii),
        ] {
            if table.is_empty() {
                errors.push(format!("toast.{name} must not be empty"));
            }
        }
        if self.swipe_exit_distance <= 0.0 {
            errors.push("toast.swipe_exit_distance must be > 0".to_owned());
        }
        errors
    }

    /// Space above the first expanded toast.
    #[must_use]
    pub fn header_offset(&self, count: usize, expanded: bool) -> f32 {
        if expanded && count > 1 {
            self.header_height + self.header_gap
        } else {
            0.0
        }
    }
}

/// Visual state of one toast card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToastTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub opacity: f32,
    pub radius: f32,
    pub z_index: i32,
    /// Hidden cards take no pointer input.
    pub hidden: bool,
}

/// Inputs for [`toast_transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToastSlot {
    pub index: usize,
    pub count: usize,
    pub expanded: bool,
    pub phase: ToastPhase,
    /// Live horizontal swipe offset.
    pub swipe_dx: f32,
    /// Measured card height, if any.
    pub card_height: Option<f32>,
}

fn table_at(table: &[f32], i: usize, fallback: f32) -> f32 {
    table.get(i).or_else(|| table.last()).copied().unwrap_or(fallback)
}

/// Transform of the toast in `slot`.
#[must_use]
pub fn toast_transform(slot: ToastSlot, config: &ToastConfig) -> ToastTransform {
    let visible = config.visible_toasts.max(1);
    let clamped = slot.index.min(visible - 1);
    let hidden = slot.index >= visible && !slot.expanded;
    let height = slot.card_height.unwrap_or(config.default_card_height);
    let radius = if slot.expanded {
        config.expanded_radius
    } else {
        table_at(&config.radii, clamped, config.expanded_radius)
    };
    let z_index = 100 - i32::try_from(slot.index).unwrap_or(i32::MAX).min(100);

    let stacked_y = table_at(&config.translate_y, clamped, 0.0);
    let stacked_scale = table_at(&config.scales, clamped, 1.0);
    let listed_y =
        config.header_offset(slot.count, slot.expanded) + slot.index as f32 * (height + config.gap);

    let base = ToastTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        opacity: 0.0,
        radius,
        z_index,
        hidden,
    };

    match slot.phase {
        ToastPhase::Exiting(ExitKind::SwipeLeft) => ToastTransform {
            translate_x: -config.swipe_exit_distance,
            ..base
        },
        ToastPhase::Exiting(ExitKind::SwipeRight) => ToastTransform {
            translate_x: config.swipe_exit_distance,
            ..base
        },
        ToastPhase::Exiting(ExitKind::Auto) | ToastPhase::Entering => ToastTransform {
            translate_y: height,
            ..base
        },
        ToastPhase::Visible if slot.swipe_dx != 0.0 => {
            let (translate_y, scale) = if slot.expanded {
                (listed_y, 1.0)
            } else {
                (stacked_y, stacked_scale)
            };
            ToastTransform {
                translate_x: slot.swipe_dx,
                translate_y,
                scale,
                opacity: (1.0 - slot.swipe_dx.abs() / config.swipe_exit_distance).max(0.0),
                ..base
            }
        }
        ToastPhase::Visible if slot.expanded => ToastTransform {
            translate_y: listed_y,
            opacity: 1.0,
            ..base
        },
        ToastPhase::Visible => ToastTransform {
            translate_y: stacked_y,
            scale: stacked_scale,
            opacity: if hidden { 0.0 } else { 1.0 },
            ..base
        },
    }
}

/// Height of the toast container.
#[must_use]
pub fn container_height(count: usize, expanded: bool, card_height: Option<f32>, config: &ToastConfig) -> f32 {
    match card_height {
        Some(h) if expanded && h > 0.0 => {
            let n = count as f32;
            config.header_offset(count, expanded) + n * h + (n - 1.0).max(0.0) * config.gap
        }
        Some(h) if h > 0.0 => h,
        _ => config.default_container_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(index: usize, count: usize, expanded: bool) -> ToastSlot {
        ToastSlot {
            index,
            count,
            expanded,
            phase: ToastPhase::Visible,
            swipe_dx: 0.0,
            card_height: Some(70.0),
        }
    }

    #[test]
    fn collapsed_stack_tables() {
        let cfg = ToastConfig::default();
        let t: Vec<_> = (0..4).map(|i| toast_transform(slot(i, 4, false), &cfg)).collect();
        assert_eq!((t[0].translate_y, t[0].scale, t[0].radius), (0.0, 1.0, 20.0));
        assert_eq!((t[1].translate_y, t[1].scale, t[1].radius), (8.0, 0.88, 17.6));
        assert_eq!((t[2].translate_y, t[2].scale), (14.0, 0.77));
        assert!(t[3].hidden);
        assert_eq!(t[3].opacity, 0.0);
        assert_eq!(t[3].translate_y, 14.0);
        assert!(t.windows(2).all(|w| w[0].z_index > w[1].z_index));
    }

    #[test]
    fn expanded_list_under_header() {
        let cfg = ToastConfig::default();
        let t = toast_transform(slot(2, 3, true), &cfg);
        assert_eq!(t.translate_y, 31.0 + 2.0 * 76.0);
        assert_eq!((t.scale, t.opacity, t.radius), (1.0, 1.0, 20.0));
        assert!(!t.hidden);
        // single toast: no header
        assert_eq!(toast_transform(slot(0, 1, true), &cfg).translate_y, 0.0);
    }

    #[test]
    fn swipe_fades_with_distance() {
        let cfg = ToastConfig::default();
        let mut s = slot(0, 2, false);
        s.swipe_dx = -100.0;
        let t = toast_transform(s, &cfg);
        assert_eq!(t.translate_x, -100.0);
        assert_eq!(t.opacity, 0.75);
        s.swipe_dx = 500.0;
        assert_eq!(toast_transform(s, &cfg).opacity, 0.0);
    }

    #[test]
    fn exit_states_are_transparent() {
        let cfg = ToastConfig::default();
        let mut s = slot(0, 1, false);
        s.phase = ToastPhase::Exiting(ExitKind::SwipeRight);
        let t = toast_transform(s, &cfg);
        assert_eq!((t.translate_x, t.opacity), (400.0, 0.0));
        s.phase = ToastPhase::Exiting(ExitKind::Auto);
        let t = toast_transform(s, &cfg);
        assert_eq!((t.translate_y, t.opacity), (70.0, 0.0));
    }

    #[test]
    fn container_heights() {
        let cfg = ToastConfig::default();
        assert_eq!(container_height(3, true, Some(70.0), &cfg), 31.0 + 210.0 + 12.0);
        assert_eq!(container_height(3, false, Some(70.0), &cfg), 70.0);
        assert_eq!(container_height(3, true, None, &cfg), 80.0);
        assert_eq!(container_height(1, true, Some(70.0), &cfg), 70.0);
    }
}
