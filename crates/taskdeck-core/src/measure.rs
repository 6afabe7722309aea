#![forbid(unsafe_code)]

//! Element measurement capability.
//!
//! The renderer knows where things are on screen; the core only asks. A
//! [`Measure`] implementation answers "where is element X right now" and may
//! return `None` when the element is not mounted.

use ahash::AHashMap;

use crate::geometry::RectF;
use crate::item::ItemId;

/// Something the core may ask the renderer to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKey<'a> {
    /// The containing panel (the drag-to-delete boundary).
    Panel,
    /// A single item card.
    Item(&'a ItemId),
}

/// Reports current element rectangles in logical pixels.
pub trait Measure {
    fn measure(&self, key: ElementKey<'_>) -> Option<RectF>;
}

impl<F> Measure for F
where
    F: Fn(ElementKey<'_>) -> Option<RectF>,
{
    fn measure(&self, key: ElementKey<'_>) -> Option<RectF> {
        self(key)
    }
}

/// A table-backed [`Measure`] for hosts that push layout results each frame.
#[derive(Debug, Clone, Default)]
pub struct MeasureMap {
    panel: Option<RectF>,
    items: AHashMap<ItemId, RectF>,
}

impl MeasureMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_panel(&mut self, rect: Option<RectF>) {
        self.panel = rect;
    }

    pub fn set_item(&mut self, id: ItemId, rect: RectF) {
        self.items.insert(id, rect);
    }

    pub fn remove_item(&mut self, id: &ItemId) {
        self.items.remove(id);
    }

    /// Builder form of [`set_panel`](Self::set_panel).
    #[must_use]
    pub fn with_panel(mut self, rect: RectF) -> Self {
        self.panel = Some(rect);
        self
    }

    /// Builder form of [`set_item`](Self::set_item).
    #[must_use]
    pub fn with_item(mut self, id: impl Into<ItemId>, rect: RectF) -> Self {
        self.items.insert(id.into(), rect);
        self
    }
}

impl Measure for MeasureMap {
    fn measure(&self, key: ElementKey<'_>) -> Option<RectF> {
        match key {
            ElementKey::Panel => self.panel,
            ElementKey::Item(id) => self.items.get(id).copied(),
        }
    }
}
