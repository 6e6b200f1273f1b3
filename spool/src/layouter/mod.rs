//! Virtualized list layout.
//!
//! A layouter decides which data positions are visible in the host's viewport, materializes
//! (or recycles) item views to match, positions them, and clamps scroll deltas against the
//! data boundaries. All variants share one core (binding, columns, recycler, anchor) and differ
//! only in how positions map to columns:
//! - [`LinearListLayouter`]: one column, one position per row.
//! - [`GridListLayouter`]: `col_count` columns, rows aligned, `col_count` positions per row.
//! - [`FlowListLayouter`]: `col_count` columns fed round-robin, each column stacking
//!   independently (staggered).

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::{
    Anchor, ColumnCollection, ExtentEstimate, ListHost, ListItem, ListItemRecycler, ListSource,
    Rect, ScrollDirection, Size,
};

/// Implements the [`ListLayouter`] methods that only forward to `self.core`.
macro_rules! forward_to_core {
    () => {
        fn unbind(&mut self) -> Option<$crate::layouter::Binding<V>> {
            self.core.unbind()
        }

        fn is_available(&self) -> bool {
            self.core.is_available()
        }

        fn host(&self) -> Option<&dyn $crate::ListHost<V>> {
            match &self.core.binding {
                Some(b) => Some(b.host.as_ref()),
                None => None,
            }
        }

        fn source(&self) -> Option<&dyn $crate::ListSource<V>> {
            match &self.core.binding {
                Some(b) => Some(b.source.as_ref()),
                None => None,
            }
        }

        fn anchor(&self) -> $crate::Anchor {
            self.core.anchor
        }

        fn can_scroll(&self, direction: $crate::ScrollDirection) -> bool {
            self.core.can_scroll(direction)
        }

        fn offset_children(&mut self, dy: i32) {
            self.core.offset_children(dy);
        }

        fn recycle_all(&mut self) {
            self.core.recycle_all();
        }

        fn columns(&self) -> &$crate::ColumnCollection<V> {
            &self.core.columns
        }

        fn recycler(&self) -> &$crate::ListItemRecycler<V> {
            &self.core.recycler
        }
    };
}

pub(crate) use forward_to_core;

mod flow;
mod grid;
mod linear;

pub use flow::FlowListLayouter;
pub use grid::GridListLayouter;
pub use linear::LinearListLayouter;

/// The `(host, source)` pair a layouter is bound to.
pub struct Binding<V> {
    pub host: Box<dyn ListHost<V>>,
    pub source: Box<dyn ListSource<V>>,
}

impl<V> core::fmt::Debug for Binding<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Binding")
            .field("data_count", &self.source.data_count())
            .field("content_bounds", &self.host.content_bounds())
            .finish_non_exhaustive()
    }
}

/// The operations shared by every list layouter.
///
/// Coordinates are host content coordinates. A negative `dy` moves content up and reveals
/// items at the bottom; a positive `dy` reveals items at the top.
///
/// An unbound layouter turns every operation into a no-op that returns the identity value
/// (`0`, `Size::ZERO`, `false`, an empty estimate).
pub trait ListLayouter<V> {
    /// Binds the layouter to a host and a data source, dropping any previous binding and
    /// rebuilding the columns.
    fn bind(&mut self, host: Box<dyn ListHost<V>>, source: Box<dyn ListSource<V>>);

    /// Detaches every materialized item and returns the previous binding.
    fn unbind(&mut self) -> Option<Binding<V>>;

    fn is_available(&self) -> bool;

    fn host(&self) -> Option<&dyn ListHost<V>>;

    fn source(&self) -> Option<&dyn ListSource<V>>;

    /// Measures items from position 0 (or the anchor) until `height` is covered.
    ///
    /// Returns the content size the items want within `width x height`.
    fn measure_at_position(&mut self, use_anchor: bool, width: i32, height: i32) -> Size;

    /// Lays out items from position 0 (or the anchor) to cover the viewport.
    ///
    /// Returns a positive correction delta when the item run ends above the viewport bottom
    /// while there is still content hidden above; feed it back through the scroll pipeline.
    fn layout_at_position(&mut self, use_anchor: bool) -> i32;

    /// Materializes items above the current run for a scroll by `dy > 0`.
    ///
    /// Returns `dy` clamped so the first data row never leaves a gap at the top.
    fn fill_top_children(&mut self, dy: i32) -> i32;

    /// Materializes items below the current run for a scroll by `dy < 0`.
    ///
    /// Returns `dy` clamped so the last data row never scrolls above the bottom.
    fn fill_bottom_children(&mut self, dy: i32) -> i32;

    /// Jumps to `pos` with its top `offset` pixels above the viewport top.
    ///
    /// Returns the settle delta of the resulting layout (see [`Self::layout_at_position`]).
    fn scroll_to_position(&mut self, pos: usize, offset: i32) -> i32;

    /// Computes the scroll delta that would bring `pos` to `offset` pixels above the viewport
    /// top. Unmaterialized targets are estimated from the average materialized extent.
    fn smooth_scroll_to_position(&mut self, pos: usize, offset: i32) -> i32;

    /// Estimates the content extent from the currently materialized items.
    fn compute_total_height(&self) -> ExtentEstimate;

    /// Remembers the data position at the top edge and how far it overshoots.
    fn record_anchor(&mut self);

    fn anchor(&self) -> Anchor;

    /// `true` unless every column already shows the data boundary at the `direction` edge.
    fn can_scroll(&self, direction: ScrollDirection) -> bool;

    /// Shifts every materialized item by `dy` and re-lays it out through the host.
    fn offset_children(&mut self, dy: i32);

    /// Returns every materialized item to the recycler.
    fn recycle_all(&mut self);

    fn columns(&self) -> &ColumnCollection<V>;

    fn recycler(&self) -> &ListItemRecycler<V>;

    /// Materialized data positions, sorted ascending.
    fn materialized_positions(&self) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .columns()
            .iter()
            .flat_map(|c| c.items().iter().filter_map(ListItem::data_pos))
            .collect();
        out.sort_unstable();
        out
    }

    /// The smallest data position at least partially inside the viewport.
    fn first_visible_position(&self) -> Option<usize> {
        self.columns()
            .iter()
            .filter_map(|c| {
                c.index_of_first_visible(0)
                    .and_then(|i| c.item(i))
                    .and_then(ListItem::data_pos)
            })
            .min()
    }
}

/// State and primitives shared by all layouter variants.
#[derive(Debug)]
pub(crate) struct ListCore<V> {
    pub(crate) binding: Option<Binding<V>>,
    pub(crate) columns: ColumnCollection<V>,
    pub(crate) recycler: ListItemRecycler<V>,
    pub(crate) anchor: Anchor,
}

impl<V> ListCore<V> {
    pub(crate) fn new(col_count: usize) -> Self {
        Self {
            binding: None,
            columns: ColumnCollection::new(col_count),
            recycler: ListItemRecycler::new(),
            anchor: Anchor::default(),
        }
    }

    pub(crate) fn bind(&mut self, host: Box<dyn ListHost<V>>, source: Box<dyn ListSource<V>>) {
        self.unbind();
        let col_count = self.columns.col_count();
        self.columns = ColumnCollection::new(col_count);
        self.anchor = Anchor::default();
        self.binding = Some(Binding { host, source });
        strace!(col_count, "ListLayouter::bind");
    }

    pub(crate) fn unbind(&mut self) -> Option<Binding<V>> {
        let mut b = self.binding.take()?;
        for mut item in self.columns.take_all() {
            b.host.remove_view(&mut item);
        }
        self.recycler.clear();
        Some(b)
    }

    pub(crate) fn is_available(&self) -> bool {
        self.binding.is_some()
    }

    pub(crate) fn data_count(&self) -> usize {
        self.binding.as_ref().map_or(0, |b| b.source.data_count())
    }

    pub(crate) fn col_count(&self) -> usize {
        self.columns.col_count()
    }

    /// Copies the host's content bounds into the columns.
    pub(crate) fn sync_bounds(&mut self) -> Option<Rect> {
        let bounds = self.binding.as_ref()?.host.content_bounds();
        self.columns.set_vertical(bounds.top, bounds.bottom);
        self.columns.set_horizontal(bounds.left, bounds.right);
        Some(bounds)
    }

    pub(crate) fn freeze(&mut self) {
        if let Some(b) = self.binding.as_mut() {
            b.host.freeze_layout();
        }
    }

    pub(crate) fn unfreeze(&mut self) {
        if let Some(b) = self.binding.as_mut() {
            b.host.unfreeze_layout();
        }
    }

    /// Clamps a requested start position into `[0, count)`; a clamped anchor loses its offset.
    pub(crate) fn clamp_position(&self, pos: usize, offset: i32, count: usize) -> (usize, i32) {
        if pos < count {
            return (pos, offset);
        }
        swarn!(pos, count, "ListLayouter: position out of range, clamped");
        (count.saturating_sub(1), 0)
    }

    /// Clamps a jump target like [`Self::clamp_position`] and drops a negative offset.
    ///
    /// A target placed below the top edge would leave the rows above it unmaterialized.
    pub(crate) fn jump_target(&self, pos: usize, offset: i32, count: usize) -> (usize, i32) {
        let (pos, offset) = self.clamp_position(pos, offset, count);
        if offset < 0 {
            sdebug!(pos, offset, "ListLayouter: negative jump offset, aligned to the top");
        }
        (pos, offset.max(0))
    }

    /// Makes item `index` of column `col` an item bound to `pos`, reusing a materialized item
    /// of the same type when one exists at or after `index`.
    pub(crate) fn obtain_at(&mut self, col: usize, index: usize, pos: usize) {
        let Self {
            binding: Some(b),
            columns,
            recycler,
            ..
        } = self
        else {
            return;
        };
        let column = columns.column_mut(col);
        let item_id = b.source.item_type_id(pos);
        if !column.find_and_insert_item(index, item_id) {
            let item = new_item(b, recycler, pos, None);
            column.insert_item(index, item);
            return;
        }
        if let Some(item) = column.item_mut(index) {
            b.source.bind_data(item, pos);
            item.set_data_pos(Some(pos));
        }
    }

    /// Inserts a reused or freshly created item for `pos` at `index` of column `col`.
    pub(crate) fn insert_fresh(
        &mut self,
        col: usize,
        index: usize,
        pos: usize,
        attach_at: Option<usize>,
    ) {
        let Self {
            binding: Some(b),
            columns,
            recycler,
            ..
        } = self
        else {
            return;
        };
        let item = new_item(b, recycler, pos, attach_at);
        columns.column_mut(col).insert_item(index, item);
    }

    /// Measures item `index` of column `col` against the column width.
    ///
    /// Returns its outer height (margins included).
    pub(crate) fn measure_at(&mut self, col: usize, index: usize) -> i32 {
        let Self {
            binding: Some(b),
            columns,
            ..
        } = self
        else {
            return 0;
        };
        let column = columns.column_mut(col);
        let width = column.width();
        let Some(item) = column.item_mut(index) else {
            return 0;
        };
        let max_width = (width - item.margins().horizontal()).max(0);
        let size = b.host.measure_item(item, max_width);
        item.set_measured(size);
        item.outer_height()
    }

    /// Places item `index` of column `col` with its outer top at `outer_top`.
    pub(crate) fn place(&mut self, col: usize, index: usize, outer_top: i32) {
        let Self {
            binding: Some(b),
            columns,
            ..
        } = self
        else {
            return;
        };
        let column = columns.column_mut(col);
        let left = column.left();
        let Some(item) = column.item_mut(index) else {
            return;
        };
        let m = item.margins();
        let size = item.measured();
        let bounds = Rect::from_size(left + m.start, outer_top + m.top, size.width, size.height);
        item.set_bounds(bounds);
        b.host.layout_item(item, bounds);
    }

    pub(crate) fn recycle_items(&mut self, items: Vec<ListItem<V>>) {
        let Self {
            binding: Some(b),
            recycler,
            ..
        } = self
        else {
            return;
        };
        for item in items {
            recycler.recycle_from_parent(item, b.host.as_mut());
        }
    }

    /// Recycles every item of column `col` from `index` on.
    pub(crate) fn recycle_from(&mut self, col: usize, index: usize) {
        let items = self.columns.column_mut(col).split_off(index);
        self.recycle_items(items);
    }

    /// Recycles the items of column `col` that lie fully above the top edge after `dy`.
    ///
    /// The last item always stays so the column keeps its place in the data stream.
    pub(crate) fn recycle_above(&mut self, col: usize, dy: i32) {
        let column = self.columns.column(col);
        let count = column
            .index_of_first_visible(dy)
            .unwrap_or_else(|| column.len().saturating_sub(1));
        if count == 0 {
            return;
        }
        let items = self.columns.column_mut(col).drain_front(count);
        self.recycle_items(items);
    }

    /// Recycles the items of column `col` that lie fully below the bottom edge after `dy`.
    ///
    /// The first item always stays so the column keeps its place in the data stream.
    pub(crate) fn recycle_below(&mut self, col: usize, dy: i32) {
        let keep = self
            .columns
            .column(col)
            .index_of_last_visible(dy)
            .map_or(1, |i| i + 1);
        self.recycle_from(col, keep);
    }

    pub(crate) fn recycle_all(&mut self) {
        let items = self.columns.take_all();
        self.recycle_items(items);
    }

    pub(crate) fn offset_children(&mut self, dy: i32) {
        if dy == 0 {
            return;
        }
        let Self {
            binding: Some(b),
            columns,
            ..
        } = self
        else {
            return;
        };
        b.host.freeze_layout();
        for column in columns.iter_mut() {
            column.offset(dy);
            for index in 0..column.len() {
                if let Some(item) = column.item_mut(index) {
                    let bounds = item.bounds();
                    b.host.layout_item(item, bounds);
                }
            }
        }
        b.host.unfreeze_layout();
    }

    /// Anchors on the first visible item of column 0.
    pub(crate) fn record_row_anchor(&mut self) {
        let column = self.columns.column(0);
        let Some(item) = column
            .index_of_first_visible(0)
            .and_then(|i| column.item(i))
        else {
            return;
        };
        let Some(position) = item.data_pos() else {
            return;
        };
        self.anchor = Anchor {
            position,
            offset: column.top() - item.outer_top(),
        };
    }

    /// A positive delta when the run ends above the bottom edge at the data floor while content
    /// is still hidden above.
    pub(crate) fn settle_delta(&self) -> i32 {
        let columns = &self.columns;
        if columns.is_empty() {
            return 0;
        }
        let gap = columns.bottom() - columns.items_bottom();
        if gap <= 0 || !columns.is_all_at_floor(self.data_count()) {
            return 0;
        }
        if columns.is_all_at_ceil() && columns.is_all_at_top() {
            return 0;
        }
        sdebug!(gap, "ListLayouter: settle delta");
        gap
    }

    pub(crate) fn can_scroll(&self, direction: ScrollDirection) -> bool {
        if !self.is_available() || self.columns.is_empty() {
            return false;
        }
        match direction {
            ScrollDirection::Top => {
                !(self.columns.is_all_at_ceil() && self.columns.is_all_at_top())
            }
            ScrollDirection::Bottom => {
                !(self.columns.is_all_at_floor(self.data_count())
                    && self.columns.is_all_at_bottom())
            }
        }
    }

    /// The viewport height, in pixels.
    pub(crate) fn viewport_extent(&self) -> i64 {
        i64::from(self.columns.bottom() - self.columns.top())
    }
}

fn new_item<V>(
    b: &mut Binding<V>,
    recycler: &mut ListItemRecycler<V>,
    pos: usize,
    attach_at: Option<usize>,
) -> ListItem<V> {
    let item_id = b.source.item_type_id(pos);
    let mut item = match recycler.reuse(item_id, b.host.as_mut(), attach_at) {
        Some(item) => item,
        None => {
            let mut item = b.source.create_item(pos);
            item.set_item_id(item_id);
            b.host.add_view_at(attach_at, &mut item);
            item
        }
    };
    b.source.bind_data(&mut item, pos);
    item.set_data_pos(Some(pos));
    item
}

/// Average of `sum` over `n`, at least one pixel.
pub(crate) fn average(sum: i64, n: usize) -> f64 {
    if n == 0 {
        return 1.0;
    }
    (sum as f64 / n as f64).max(1.0)
}
