use alloc::boxed::Box;
use alloc::vec::Vec;

use super::{ListCore, ListLayouter, average, forward_to_core};
use crate::{Anchor, ExtentEstimate, ListHost, ListSource, Size, float};

/// A grid of `col_count` aligned columns: position `i` sits in row `i / col_count`, column
/// `i % col_count`. Every item of a row shares the row top; the row is as tall as its tallest
/// item.
#[derive(Debug)]
pub struct GridListLayouter<V> {
    core: ListCore<V>,
}

impl<V> GridListLayouter<V> {
    pub fn new(col_count: usize) -> Self {
        Self {
            core: ListCore::new(col_count),
        }
    }

    pub fn col_count(&self) -> usize {
        self.core.col_count()
    }

    fn total_rows(&self, count: usize) -> usize {
        count.div_ceil(self.col_count())
    }

    fn row_len(&self, row: usize, count: usize) -> usize {
        let c = self.col_count();
        c.min(count.saturating_sub(row * c))
    }

    fn start_row(&self, use_anchor: bool, count: usize) -> (usize, i32) {
        if !use_anchor {
            return (0, 0);
        }
        let Anchor { position, offset } = self.core.anchor;
        let (position, offset) = self.core.clamp_position(position, offset, count);
        (position / self.col_count(), offset)
    }

    /// Number of materialized rows. Column 0 holds the first item of every row.
    fn rows(&self) -> usize {
        self.core.columns.column(0).len()
    }

    /// Outer height of materialized row `index`.
    fn row_height(&self, index: usize) -> i32 {
        self.core
            .columns
            .iter()
            .filter_map(|c| c.item(index))
            .map(|it| it.outer_height())
            .max()
            .unwrap_or(0)
    }

    fn row_bottom(&self, index: usize) -> i32 {
        self.core
            .columns
            .iter()
            .filter_map(|c| c.item(index))
            .map(|it| it.outer_bottom())
            .max()
            .unwrap_or_else(|| self.core.columns.top())
    }

    /// The first row reaches the top edge after `dy`.
    fn is_top_covered(&self, dy: i32) -> bool {
        self.rows() > 0 && self.core.columns.items_top() + dy <= self.core.columns.top()
    }

    /// The last row's tallest item reaches the bottom edge after `dy`.
    fn is_bottom_covered(&self, dy: i32) -> bool {
        self.rows()
            .checked_sub(1)
            .is_some_and(|last| self.row_bottom(last) + dy >= self.core.columns.bottom())
    }

    /// Drops whole rows that are fully above the top edge after `dy`, keeping the last one.
    fn recycle_rows_above(&mut self, dy: i32) {
        let rows = self.rows();
        let top = self.core.columns.top();
        let drop = (0..rows.saturating_sub(1))
            .take_while(|&i| self.row_bottom(i) + dy <= top)
            .count();
        if drop == 0 {
            return;
        }
        for j in 0..self.col_count() {
            let items = self.core.columns.column_mut(j).drain_front(drop);
            self.core.recycle_items(items);
        }
    }

    /// Drops whole rows that are fully below the bottom edge after `dy`, keeping the first one.
    fn recycle_rows_below(&mut self, dy: i32) {
        let column = self.core.columns.column(0);
        let keep = column.index_of_last_visible(dy).map_or(1, |i| i + 1);
        for j in 0..self.col_count() {
            self.core.recycle_from(j, keep);
        }
    }

    /// Materializes `row` at the front or back of each column, measures it, and returns the
    /// row height.
    fn insert_row(&mut self, row: usize, count: usize, at_front: bool) -> i32 {
        let c = self.col_count();
        let mut row_h = 0;
        for j in 0..self.row_len(row, count) {
            let index = if at_front {
                0
            } else {
                self.core.columns.column(j).len()
            };
            let attach_at = at_front.then_some(0);
            self.core.insert_fresh(j, index, row * c + j, attach_at);
            row_h = row_h.max(self.core.measure_at(j, index));
        }
        row_h
    }

    fn place_row(&mut self, row: usize, count: usize, index_of: impl Fn(usize) -> usize, top: i32) {
        for j in 0..self.row_len(row, count) {
            self.core.place(j, index_of(j), top);
        }
    }
}

impl<V> ListLayouter<V> for GridListLayouter<V> {
    forward_to_core!();

    fn bind(&mut self, host: Box<dyn ListHost<V>>, source: Box<dyn ListSource<V>>) {
        self.core.bind(host, source);
    }

    fn measure_at_position(&mut self, use_anchor: bool, width: i32, height: i32) -> Size {
        if !self.core.is_available() {
            return Size::ZERO;
        }
        let count = self.core.data_count();
        if count == 0 {
            self.core.recycle_all();
            return Size::ZERO;
        }
        self.core.columns.set_horizontal(0, width);

        let c = self.col_count();
        let total_rows = self.total_rows(count);
        let (mut row, offset) = self.start_row(use_anchor, count);
        let target = height + offset.max(0);

        self.core.freeze();
        let mut index = 0;
        let mut consumed = 0;
        while row < total_rows && consumed < target {
            let mut row_h = 0;
            for j in 0..self.row_len(row, count) {
                self.core.obtain_at(j, index, row * c + j);
                row_h = row_h.max(self.core.measure_at(j, index));
            }
            consumed += row_h;
            index += 1;
            row += 1;
        }
        for j in 0..c {
            self.core.recycle_from(j, index);
        }
        self.core.unfreeze();

        Size::new(width.max(0), (consumed - offset.max(0)).clamp(0, height))
    }

    fn layout_at_position(&mut self, use_anchor: bool) -> i32 {
        let Some(bounds) = self.core.sync_bounds() else {
            return 0;
        };
        let count = self.core.data_count();
        if count == 0 {
            self.core.recycle_all();
            self.core.anchor = Anchor::default();
            return 0;
        }
        let c = self.col_count();
        let total_rows = self.total_rows(count);
        let (mut row, offset) = self.start_row(use_anchor, count);
        strace!(row, offset, "GridListLayouter::layout_at_position");

        self.core.freeze();
        let mut kept = alloc::vec![0usize; c];
        let mut top = bounds.top - offset;
        while row < total_rows && top < bounds.bottom {
            let len = self.row_len(row, count);
            let mut row_h = 0;
            for (j, index) in kept.iter().enumerate().take(len) {
                self.core.obtain_at(j, *index, row * c + j);
                row_h = row_h.max(self.core.measure_at(j, *index));
            }
            for (j, index) in kept.iter_mut().enumerate().take(len) {
                self.core.place(j, *index, top);
                *index += 1;
            }
            top += row_h;
            row += 1;
        }
        for (j, index) in kept.into_iter().enumerate() {
            self.core.recycle_from(j, index);
        }
        self.core.unfreeze();

        self.core.settle_delta()
    }

    fn fill_top_children(&mut self, dy: i32) -> i32 {
        if !self.core.is_available() || dy <= 0 || self.core.columns.is_empty() {
            return 0;
        }
        let count = self.core.data_count();
        let c = self.col_count();
        self.core.freeze();
        loop {
            if self.is_top_covered(dy) {
                break;
            }
            let Some(first) = self.core.columns.column(0).first_data_pos() else {
                break;
            };
            let first_row = first / c;
            if first_row == 0 {
                break;
            }
            let covered = self.core.columns.final_scroll(dy);
            self.recycle_rows_below(covered);

            let edge = self.core.columns.items_top();
            let row = first_row - 1;
            let row_h = self.insert_row(row, count, true);
            self.place_row(row, count, |_| 0, edge - row_h);
        }
        let dy = self.core.columns.final_scroll(dy);
        self.recycle_rows_below(dy);
        self.core.unfreeze();
        dy
    }

    fn fill_bottom_children(&mut self, dy: i32) -> i32 {
        if !self.core.is_available() || dy >= 0 || self.core.columns.is_empty() {
            return 0;
        }
        let count = self.core.data_count();
        let c = self.col_count();
        let total_rows = self.total_rows(count);
        self.core.freeze();
        loop {
            if self.is_bottom_covered(dy) {
                break;
            }
            let Some(last) = self.core.columns.column(0).last_data_pos() else {
                break;
            };
            let row = last / c + 1;
            if row >= total_rows {
                break;
            }
            let covered = self.core.columns.final_scroll(dy);
            self.recycle_rows_above(covered);

            let edge = self.core.columns.items_bottom();
            self.insert_row(row, count, false);
            let columns = &self.core.columns;
            let last_index: Vec<usize> =
                columns.iter().map(|col| col.len().saturating_sub(1)).collect();
            self.place_row(row, count, |j| last_index[j], edge);
        }
        let dy = self.core.columns.final_scroll(dy);
        self.recycle_rows_above(dy);
        self.core.unfreeze();
        dy
    }

    fn scroll_to_position(&mut self, pos: usize, offset: i32) -> i32 {
        let count = self.core.data_count();
        if !self.core.is_available() || count == 0 {
            return 0;
        }
        let (position, offset) = self.core.jump_target(pos, offset, count);
        let position = position / self.col_count() * self.col_count();
        sdebug!(position, offset, "GridListLayouter::scroll_to_position");
        self.core.anchor = Anchor { position, offset };
        self.layout_at_position(true)
    }

    fn smooth_scroll_to_position(&mut self, pos: usize, offset: i32) -> i32 {
        let count = self.core.data_count();
        if !self.core.is_available() || count == 0 || self.core.columns.is_empty() {
            return 0;
        }
        let c = self.col_count();
        let (pos, offset) = self.core.jump_target(pos, offset, count);
        let row = pos / c;
        let column = self.core.columns.column(0);
        let target_top = column.top() - offset;

        if let Some(item) = column.items().iter().find(|it| it.data_pos() == Some(row * c)) {
            return target_top - item.outer_top();
        }

        let (Some(first), Some(last)) = (column.first_data_pos(), column.last_data_pos()) else {
            return 0;
        };
        let (first_row, last_row) = (first / c, last / c);
        let rows = self.rows();
        let sum: i64 = (0..rows).map(|i| i64::from(self.row_height(i))).sum();
        let avg = average(sum, rows);
        let estimated_top = if row < first_row {
            f64::from(self.core.columns.items_top()) - avg * (first_row - row) as f64
        } else {
            f64::from(self.core.columns.items_bottom()) + avg * (row - last_row - 1) as f64
        };
        let dy = f64::from(target_top) - estimated_top;
        float::round(dy).clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }

    fn compute_total_height(&self) -> ExtentEstimate {
        let c = self.col_count();
        let column = self.core.columns.column(0);
        let (Some(first), Some(last)) = (column.first_data_pos(), column.last_data_pos()) else {
            return ExtentEstimate::default();
        };
        let count = self.core.data_count();
        let rows = self.rows();
        let sum: i64 = (0..rows).map(|i| i64::from(self.row_height(i))).sum();
        let avg = average(sum, rows);

        let (first_row, last_row) = (first / c, last / c);
        let total_rows = self.total_rows(count);
        let before = float::round(avg * first_row as f64) as i64;
        let after = float::round(avg * total_rows.saturating_sub(last_row + 1) as f64) as i64;
        let total = before + sum + after;
        let columns = &self.core.columns;
        let prev = (before + i64::from(columns.top() - columns.items_top())).max(0);
        let next = (total - prev - self.core.viewport_extent()).max(0);
        ExtentEstimate { prev, next, total }
    }

    /// Anchors on the first row still (partially) visible, measured from its shared top.
    fn record_anchor(&mut self) {
        let top = self.core.columns.top();
        let Some(index) = (0..self.rows()).find(|&i| self.row_bottom(i) > top) else {
            return;
        };
        let Some(item) = self.core.columns.column(0).item(index) else {
            return;
        };
        let Some(position) = item.data_pos() else {
            return;
        };
        self.core.anchor = Anchor {
            position,
            offset: top - item.outer_top(),
        };
    }
}
