use alloc::boxed::Box;

use super::{ListCore, ListLayouter, average, forward_to_core};
use crate::{Anchor, ExtentEstimate, ListHost, ListSource, Size, float};

/// A single-column list: position `i` is row `i`.
#[derive(Debug)]
pub struct LinearListLayouter<V> {
    core: ListCore<V>,
}

impl<V> Default for LinearListLayouter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LinearListLayouter<V> {
    pub fn new() -> Self {
        Self {
            core: ListCore::new(1),
        }
    }

    fn start_point(&self, use_anchor: bool, count: usize) -> (usize, i32) {
        if !use_anchor {
            return (0, 0);
        }
        let Anchor { position, offset } = self.core.anchor;
        self.core.clamp_position(position, offset, count)
    }
}

impl<V> ListLayouter<V> for LinearListLayouter<V> {
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

        let (mut pos, offset) = self.start_point(use_anchor, count);
        let target = height + offset.max(0);

        self.core.freeze();
        let mut index = 0;
        let mut consumed = 0;
        let mut max_width = 0;
        while pos < count && consumed < target {
            self.core.obtain_at(0, index, pos);
            consumed += self.core.measure_at(0, index);
            if let Some(item) = self.core.columns.column(0).item(index) {
                max_width = max_width.max(item.outer_width());
            }
            index += 1;
            pos += 1;
        }
        self.core.recycle_from(0, index);
        self.core.unfreeze();

        Size::new(max_width.min(width), (consumed - offset.max(0)).clamp(0, height))
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
        let (mut pos, offset) = self.start_point(use_anchor, count);
        strace!(pos, offset, "LinearListLayouter::layout_at_position");

        self.core.freeze();
        let mut top = bounds.top - offset;
        let mut index = 0;
        while pos < count && top < bounds.bottom {
            self.core.obtain_at(0, index, pos);
            let h = self.core.measure_at(0, index);
            self.core.place(0, index, top);
            top += h;
            index += 1;
            pos += 1;
        }
        self.core.recycle_from(0, index);
        self.core.unfreeze();

        self.core.settle_delta()
    }

    fn fill_top_children(&mut self, dy: i32) -> i32 {
        if !self.core.is_available() || dy <= 0 || self.core.columns.is_empty() {
            return 0;
        }
        self.core.freeze();
        loop {
            let column = self.core.columns.column(0);
            if column.is_top_filled(dy) {
                break;
            }
            let Some(first) = column.first_data_pos() else {
                break;
            };
            if first == 0 {
                break;
            }
            // Recycle what is certainly gone before materializing more.
            let covered = self.core.columns.final_scroll(dy);
            self.core.recycle_below(0, covered);

            let edge = self.core.columns.column(0).items_top();
            self.core.insert_fresh(0, 0, first - 1, Some(0));
            let h = self.core.measure_at(0, 0);
            self.core.place(0, 0, edge - h);
        }
        let dy = self.core.columns.final_scroll(dy);
        self.core.recycle_below(0, dy);
        self.core.unfreeze();
        dy
    }

    fn fill_bottom_children(&mut self, dy: i32) -> i32 {
        if !self.core.is_available() || dy >= 0 || self.core.columns.is_empty() {
            return 0;
        }
        let count = self.core.data_count();
        self.core.freeze();
        loop {
            let column = self.core.columns.column(0);
            if column.is_bottom_filled(dy) {
                break;
            }
            let Some(last) = column.last_data_pos() else {
                break;
            };
            if last + 1 >= count {
                break;
            }
            let covered = self.core.columns.final_scroll(dy);
            self.core.recycle_above(0, covered);

            let column = self.core.columns.column(0);
            let edge = column.items_bottom();
            let index = column.len();
            self.core.insert_fresh(0, index, last + 1, None);
            self.core.measure_at(0, index);
            self.core.place(0, index, edge);
        }
        let dy = self.core.columns.final_scroll(dy);
        self.core.recycle_above(0, dy);
        self.core.unfreeze();
        dy
    }

    fn scroll_to_position(&mut self, pos: usize, offset: i32) -> i32 {
        let count = self.core.data_count();
        if !self.core.is_available() || count == 0 {
            return 0;
        }
        let (position, offset) = self.core.jump_target(pos, offset, count);
        sdebug!(position, offset, "LinearListLayouter::scroll_to_position");
        self.core.anchor = Anchor { position, offset };
        self.layout_at_position(true)
    }

    fn smooth_scroll_to_position(&mut self, pos: usize, offset: i32) -> i32 {
        let count = self.core.data_count();
        if !self.core.is_available() || count == 0 || self.core.columns.is_empty() {
            return 0;
        }
        let (pos, offset) = self.core.jump_target(pos, offset, count);
        let column = self.core.columns.column(0);
        let target_top = column.top() - offset;

        if let Some(item) = column.items().iter().find(|it| it.data_pos() == Some(pos)) {
            return target_top - item.outer_top();
        }

        let sum: i64 = column.items().iter().map(|it| i64::from(it.outer_height())).sum();
        let avg = average(sum, column.len());
        let (Some(first), Some(last)) = (column.first_data_pos(), column.last_data_pos()) else {
            return 0;
        };
        let estimated_top = if pos < first {
            f64::from(column.items_top()) - avg * (first - pos) as f64
        } else {
            f64::from(column.items_bottom()) + avg * (pos - last - 1) as f64
        };
        let dy = f64::from(target_top) - estimated_top;
        float::round(dy).clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }

    fn compute_total_height(&self) -> ExtentEstimate {
        let column = self.core.columns.column(0);
        let (Some(first), Some(last)) = (column.first_data_pos(), column.last_data_pos()) else {
            return ExtentEstimate::default();
        };
        let count = self.core.data_count();
        let sum: i64 = column.items().iter().map(|it| i64::from(it.outer_height())).sum();
        let avg = average(sum, column.len());

        let before = float::round(avg * first as f64) as i64;
        let after = float::round(avg * count.saturating_sub(last + 1) as f64) as i64;
        let total = before + sum + after;
        let prev = (before + i64::from(column.top() - column.items_top())).max(0);
        let next = (total - prev - self.core.viewport_extent()).max(0);
        ExtentEstimate { prev, next, total }
    }

    fn record_anchor(&mut self) {
        self.core.record_row_anchor();
    }
}
