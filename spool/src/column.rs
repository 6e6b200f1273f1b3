use alloc::vec::Vec;

use crate::{ItemId, ListItem};

/// One column of materialized items.
///
/// Items are kept sorted by ascending data position and are contiguous within the data stream
/// assigned to this column. The column's `top`/`bottom`/`left`/`right` are the viewport edges
/// its items are tested against.
#[derive(Debug)]
pub struct Column<V> {
    top: i32,
    bottom: i32,
    left: i32,
    right: i32,
    items: Vec<ListItem<V>>,
}

impl<V> Default for Column<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Column<V> {
    pub fn new() -> Self {
        Self {
            top: 0,
            bottom: 0,
            left: 0,
            right: 0,
            items: Vec::new(),
        }
    }

    pub fn set_vertical(&mut self, top: i32, bottom: i32) {
        self.top = top;
        self.bottom = bottom;
    }

    pub fn set_horizontal(&mut self, left: i32, right: i32) {
        self.left = left;
        self.right = right;
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ListItem<V>] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&ListItem<V>> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut ListItem<V>> {
        self.items.get_mut(index)
    }

    pub fn front(&self) -> Option<&ListItem<V>> {
        self.items.first()
    }

    pub fn back(&self) -> Option<&ListItem<V>> {
        self.items.last()
    }

    pub fn first_data_pos(&self) -> Option<usize> {
        self.front().and_then(ListItem::data_pos)
    }

    pub fn last_data_pos(&self) -> Option<usize> {
        self.back().and_then(ListItem::data_pos)
    }

    pub fn push_item(&mut self, item: ListItem<V>) {
        debug_assert!(
            match (self.last_data_pos(), item.data_pos()) {
                (Some(last), Some(pos)) => pos > last,
                _ => true,
            },
            "Column::push_item: items must stay sorted by data position"
        );
        self.items.push(item);
    }

    pub fn insert_item(&mut self, index: usize, item: ListItem<V>) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    pub fn remove_item(&mut self, index: usize) -> Option<ListItem<V>> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.items.remove(index))
    }

    /// Removes and returns every item from `index` on.
    pub fn split_off(&mut self, index: usize) -> Vec<ListItem<V>> {
        let index = index.min(self.items.len());
        self.items.split_off(index)
    }

    /// Removes and returns the first `count` items.
    pub fn drain_front(&mut self, count: usize) -> Vec<ListItem<V>> {
        let count = count.min(self.items.len());
        self.items.drain(..count).collect()
    }

    pub fn take_all(&mut self) -> Vec<ListItem<V>> {
        core::mem::take(&mut self.items)
    }

    /// Looks for an item with `item_id` at or after `start` and moves it to `start`.
    ///
    /// Returns `true` when such an item exists (it is now at `start`).
    pub fn find_and_insert_item(&mut self, start: usize, item_id: ItemId) -> bool {
        let Some(found) = self.items[start.min(self.items.len())..]
            .iter()
            .position(|it| it.item_id() == item_id)
        else {
            return false;
        };
        let found = start + found;
        if found != start {
            let item = self.items.remove(found);
            self.items.insert(start, item);
        }
        true
    }

    /// The outer top of the first item, or the column top when empty.
    pub fn items_top(&self) -> i32 {
        self.front().map_or(self.top, ListItem::outer_top)
    }

    /// The outer bottom of the last item, or the column top when empty.
    pub fn items_bottom(&self) -> i32 {
        self.back().map_or(self.top, ListItem::outer_bottom)
    }

    /// Clamps `dy` so the item run never scrolls past its own start (for `dy > 0`) or end
    /// (for `dy < 0`).
    pub fn final_scroll(&self, dy: i32) -> i32 {
        if dy > 0 {
            dy.min((self.top - self.items_top()).max(0))
        } else if dy < 0 {
            dy.max((self.bottom - self.items_bottom()).min(0))
        } else {
            0
        }
    }

    /// Index of the first item still (partially) visible after scrolling by `dy`.
    pub fn index_of_first_visible(&self, dy: i32) -> Option<usize> {
        self.items
            .iter()
            .position(|it| it.outer_bottom() + dy > self.top)
    }

    /// Index of the last item still (partially) visible after scrolling by `dy`.
    pub fn index_of_last_visible(&self, dy: i32) -> Option<usize> {
        self.items
            .iter()
            .rposition(|it| it.outer_top() + dy < self.bottom)
    }

    pub fn is_top_filled(&self, dy: i32) -> bool {
        !self.items.is_empty() && self.items_top() + dy <= self.top
    }

    pub fn is_bottom_filled(&self, dy: i32) -> bool {
        !self.items.is_empty() && self.items_bottom() + dy >= self.bottom
    }

    pub fn is_at_top(&self) -> bool {
        self.items_top() >= self.top
    }

    pub fn is_at_bottom(&self) -> bool {
        self.items_bottom() <= self.bottom
    }

    pub fn offset(&mut self, dy: i32) {
        for it in &mut self.items {
            it.offset(dy);
        }
    }
}

/// A fixed number of columns sharing one horizontal span.
#[derive(Debug)]
pub struct ColumnCollection<V> {
    columns: Vec<Column<V>>,
}

impl<V> ColumnCollection<V> {
    pub fn new(col_count: usize) -> Self {
        let col_count = col_count.max(1);
        let mut columns = Vec::with_capacity(col_count);
        columns.resize_with(col_count, Column::new);
        Self { columns }
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> &Column<V> {
        &self.columns[index]
    }

    pub fn column_mut(&mut self, index: usize) -> &mut Column<V> {
        &mut self.columns[index]
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Column<V>> {
        self.columns.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, Column<V>> {
        self.columns.iter_mut()
    }

    pub fn set_vertical(&mut self, top: i32, bottom: i32) {
        for c in &mut self.columns {
            c.set_vertical(top, bottom);
        }
    }

    /// Splits `[left, right)` into nearly equal widths.
    ///
    /// The remainder is handed out one pixel at a time to the leftmost columns, so the widths
    /// sum to exactly `right - left` and differ by at most one pixel.
    pub fn set_horizontal(&mut self, left: i32, right: i32) {
        let n = self.columns.len() as i32;
        let total = (right - left).max(0);
        let base = total / n;
        let remainder = total % n;

        let mut x = left;
        for (i, c) in self.columns.iter_mut().enumerate() {
            let w = base + i32::from((i as i32) < remainder);
            c.set_horizontal(x, x + w);
            x += w;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Column::is_empty)
    }

    pub fn item_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub fn top(&self) -> i32 {
        self.columns[0].top()
    }

    pub fn bottom(&self) -> i32 {
        self.columns[0].bottom()
    }

    /// The highest outer top over non-empty columns.
    pub fn items_top(&self) -> i32 {
        self.columns
            .iter()
            .filter(|c| !c.is_empty())
            .map(Column::items_top)
            .min()
            .unwrap_or_else(|| self.top())
    }

    /// The lowest outer bottom over non-empty columns.
    pub fn items_bottom(&self) -> i32 {
        self.columns
            .iter()
            .filter(|c| !c.is_empty())
            .map(Column::items_bottom)
            .max()
            .unwrap_or_else(|| self.top())
    }

    pub fn is_all_at_top(&self) -> bool {
        self.columns.iter().all(Column::is_at_top)
    }

    pub fn is_all_at_bottom(&self) -> bool {
        self.columns.iter().all(Column::is_at_bottom)
    }

    /// Every column is filled up to the top edge after scrolling by `dy`.
    pub fn is_top_filled(&self, dy: i32) -> bool {
        self.columns.iter().all(|c| c.is_top_filled(dy))
    }

    /// Every column is filled down to the bottom edge after scrolling by `dy`.
    pub fn is_bottom_filled(&self, dy: i32) -> bool {
        self.columns.iter().all(|c| c.is_bottom_filled(dy))
    }

    /// Every non-empty column holds the first data position of its stream.
    pub fn is_all_at_ceil(&self) -> bool {
        let n = self.columns.len();
        self.columns
            .iter()
            .filter_map(Column::first_data_pos)
            .all(|pos| pos < n)
    }

    /// Every non-empty column holds the last data position of its stream.
    pub fn is_all_at_floor(&self, data_count: usize) -> bool {
        let n = self.columns.len();
        self.columns
            .iter()
            .filter_map(Column::last_data_pos)
            .all(|pos| pos + n >= data_count)
    }

    /// Clamps `dy` against the data boundaries of all columns.
    ///
    /// Scrolling toward the top stops as soon as any column would leave a gap at the top edge;
    /// scrolling toward the bottom stops once the tallest column reaches the bottom edge.
    pub fn final_scroll(&self, dy: i32) -> i32 {
        // Per-column results lie in [0, dy] or [dy, 0], so `min` picks the most restrictive
        // column going up and the least restrictive one going down.
        self.columns
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| c.final_scroll(dy))
            .min()
            .unwrap_or(0)
    }

    pub fn offset(&mut self, dy: i32) {
        for c in &mut self.columns {
            c.offset(dy);
        }
    }

    pub fn take_all(&mut self) -> Vec<ListItem<V>> {
        let mut out = Vec::with_capacity(self.item_count());
        for c in &mut self.columns {
            out.append(&mut c.take_all());
        }
        out
    }
}
