use crate::{Rect, Size};

/// Recycling type tag of a list item. Items are only reused for positions with the same id.
pub type ItemId = u32;

/// Extra space around an item's view, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub start: i32,
    pub top: i32,
    pub end: i32,
    pub bottom: i32,
}

impl Margins {
    pub const fn new(start: i32, top: i32, end: i32, bottom: i32) -> Self {
        Self {
            start,
            top,
            end,
            bottom,
        }
    }

    pub const fn uniform(v: i32) -> Self {
        Self::new(v, v, v, v)
    }

    pub fn horizontal(&self) -> i32 {
        self.start + self.end
    }

    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

/// One materialized row/cell of a list.
///
/// A `ListItem` owns its view value `V`. While it sits in a column the host view tree shows
/// that view; while it sits in a [`crate::ListItemRecycler`] pool it is detached and marked
/// recycled. Moving the item between the two is the only way its view changes hands.
#[derive(Debug)]
pub struct ListItem<V> {
    view: V,
    item_id: ItemId,
    data_pos: Option<usize>,
    margins: Margins,
    measured: Size,
    bounds: Rect,
    recycled: bool,
}

impl<V> ListItem<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            item_id: 0,
            data_pos: None,
            margins: Margins::default(),
            measured: Size::ZERO,
            bounds: Rect::default(),
            recycled: false,
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// The data position this item is bound to, or `None` when unbound.
    pub fn data_pos(&self) -> Option<usize> {
        self.data_pos
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    /// Size reported by the last measure pass (margins excluded).
    pub fn measured(&self) -> Size {
        self.measured
    }

    /// View bounds assigned by the last layout pass (margins excluded).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_recycled(&self) -> bool {
        self.recycled
    }

    pub fn outer_top(&self) -> i32 {
        self.bounds.top - self.margins.top
    }

    pub fn outer_bottom(&self) -> i32 {
        self.bounds.bottom + self.margins.bottom
    }

    pub fn outer_height(&self) -> i32 {
        self.measured.height + self.margins.vertical()
    }

    pub fn outer_width(&self) -> i32 {
        self.measured.width + self.margins.horizontal()
    }

    pub(crate) fn set_item_id(&mut self, item_id: ItemId) {
        self.item_id = item_id;
    }

    pub(crate) fn set_data_pos(&mut self, data_pos: Option<usize>) {
        self.data_pos = data_pos;
    }

    pub(crate) fn set_measured(&mut self, measured: Size) {
        self.measured = measured;
    }

    pub(crate) fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub(crate) fn set_recycled(&mut self, recycled: bool) {
        self.recycled = recycled;
    }

    pub(crate) fn offset(&mut self, dy: i32) {
        self.bounds.offset(0, dy);
    }
}
