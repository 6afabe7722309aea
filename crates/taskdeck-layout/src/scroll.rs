#![forbid(unsafe_code)]

//! Scroll-edge fade indicators for the expanded task list.

/// Which edges of a scroll container should show a fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollFade {
    pub can_scroll_up: bool,
    pub can_scroll_down: bool,
}

impl ScrollFade {
    /// Compute from the container's scroll metrics (px). A 1 px tolerance
    /// absorbs sub-pixel scroll positions.
    #[must_use]
    pub fn from_metrics(scroll_top: f32, client_height: f32, scroll_height: f32) -> Self {
        Self {
            can_scroll_up: scroll_top > 1.0,
            can_scroll_down: scroll_top + client_height < scroll_height - 1.0,
        }
    }

    /// Recompute and report whether anything changed.
    pub fn update(&mut self, scroll_top: f32, client_height: f32, scroll_height: f32) -> bool {
        let next = Self::from_metrics(scroll_top, client_height, scroll_height);
        let changed = next != *self;
        *self = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges() {
        assert_eq!(ScrollFade::from_metrics(0.0, 200.0, 200.0), ScrollFade::default());
        let mid = ScrollFade::from_metrics(50.0, 200.0, 400.0);
        assert!(mid.can_scroll_up && mid.can_scroll_down);
        let bottom = ScrollFade::from_metrics(199.5, 200.0, 400.0);
        assert!(bottom.can_scroll_up && !bottom.can_scroll_down);
        let near_top = ScrollFade::from_metrics(1.0, 200.0, 400.0);
        assert!(!near_top.can_scroll_up);
    }

    #[test]
    fn update_reports_changes_only() {
        let mut fade = ScrollFade::default();
        assert!(!fade.update(0.0, 100.0, 100.0));
        assert!(fade.update(0.0, 100.0, 300.0));
        assert!(!fade.update(0.5, 100.0, 300.0));
    }
}
