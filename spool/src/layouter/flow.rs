use alloc::boxed::Box;
use alloc::vec::Vec;

use super::{ListCore, ListLayouter, average, forward_to_core};
use crate::{Anchor, ExtentEstimate, ListHost, ListSource, Size, float};

/// Where one column resumes on the next anchored layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Record {
    cur_row: usize,
    cur_offset: i32,
    is_null: bool,
}

impl Record {
    const NULL: Self = Self {
        cur_row: 0,
        cur_offset: 0,
        is_null: true,
    };
}

/// A staggered layout of `col_count` columns.
///
/// Position `i` belongs to column `i % col_count`, row `i / col_count`. Unlike the grid, rows
/// are not aligned: every column stacks its own items and keeps its own resume record, so
/// columns of variable-height items run at different paces.
#[derive(Debug)]
pub struct FlowListLayouter<V> {
    core: ListCore<V>,
    records: Vec<Record>,
}

impl<V> FlowListLayouter<V> {
    pub fn new(col_count: usize) -> Self {
        let core = ListCore::new(col_count);
        let records = alloc::vec![Record::NULL; core.col_count()];
        Self { core, records }
    }

    pub fn col_count(&self) -> usize {
        self.core.col_count()
    }

    fn reset_records(&mut self) {
        self.records.fill(Record::NULL);
    }

    /// The smallest row-aligned position over all columns with a record.
    ///
    /// Re-anchoring there never skips the earliest unconsumed row of any column.
    fn preferred_position(&self) -> Option<usize> {
        let c = self.col_count();
        self.records
            .iter()
            .filter(|r| !r.is_null)
            .map(|r| r.cur_row * c)
            .min()
    }

    /// The last row of column `col`, or `None` when the column has no data.
    fn last_row(&self, col: usize, count: usize) -> Option<usize> {
        (col < count).then(|| (count - 1 - col) / self.col_count())
    }

    fn start_row(&self, col: usize, use_anchor: bool, count: usize) -> Option<(usize, i32)> {
        let last_row = self.last_row(col, count)?;
        if !use_anchor {
            return Some((0, 0));
        }
        let record = self.records[col];
        let (row, offset) = if record.is_null {
            (self.core.anchor.position / self.col_count(), 0)
        } else {
            (record.cur_row, record.cur_offset)
        };
        if row > last_row {
            return Some((last_row, 0));
        }
        Some((row, offset))
    }

    /// Lays out column `col` from its start row down to `bottom`. Returns the consumed extent
    /// measured from the start row's top.
    fn lay_column(
        &mut self,
        col: usize,
        use_anchor: bool,
        count: usize,
        top: i32,
        bottom: i32,
        place: bool,
    ) -> i32 {
        let Some((row, offset)) = self.start_row(col, use_anchor, count) else {
            self.core.recycle_from(col, 0);
            return 0;
        };
        let c = self.col_count();
        let mut pos = row * c + col;
        let mut y = top - offset;
        let mut index = 0;
        while pos < count && y < bottom {
            self.core.obtain_at(col, index, pos);
            let h = self.core.measure_at(col, index);
            if place {
                self.core.place(col, index, y);
            }
            y += h;
            index += 1;
            pos += c;
        }
        self.core.recycle_from(col, index);
        y - (top - offset)
    }

    /// Items of column `col` estimated with the shared average height.
    fn column_estimate(&self, col: usize, avg: f64, count: usize) -> Option<ExtentEstimate> {
        let c = self.col_count();
        let column = self.core.columns.column(col);
        let (first, last) = (column.first_data_pos()?, column.last_data_pos()?);
        let last_row = self.last_row(col, count)?;
        let sum: i64 = column
            .items()
            .iter()
            .map(|it| i64::from(it.outer_height()))
            .sum();
        let before = float::round(avg * (first / c) as f64) as i64;
        let after = float::round(avg * last_row.saturating_sub(last / c) as f64) as i64;
        let total = before + sum + after;
        let prev = (before + i64::from(column.top() - column.items_top())).max(0);
        let next = (total - prev - self.core.viewport_extent()).max(0);
        Some(ExtentEstimate { prev, next, total })
    }

    /// After a top fill was clamped by a column already showing its first row while another
    /// column still hides content above, lays out every column from row 0 again.
    fn needs_realign(&self, requested: i32, applied: i32) -> bool {
        if applied >= requested {
            return false;
        }
        let top = self.core.columns.top();
        self.core
            .columns
            .iter()
            .any(|c| !c.is_empty() && c.items_top() + applied < top)
    }
}

impl<V> ListLayouter<V> for FlowListLayouter<V> {
    forward_to_core!();

    fn bind(&mut self, host: Box<dyn ListHost<V>>, source: Box<dyn ListSource<V>>) {
        self.core.bind(host, source);
        self.reset_records();
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

        self.core.freeze();
        let mut consumed = 0;
        for col in 0..self.col_count() {
            let used = self.lay_column(col, use_anchor, count, 0, height, false);
            let offset = match self.start_row(col, use_anchor, count) {
                Some((_, offset)) => offset.max(0),
                None => 0,
            };
            consumed = consumed.max(used - offset);
        }
        self.core.unfreeze();

        Size::new(width.max(0), consumed.clamp(0, height))
    }

    fn layout_at_position(&mut self, use_anchor: bool) -> i32 {
        let Some(bounds) = self.core.sync_bounds() else {
            return 0;
        };
        let count = self.core.data_count();
        if count == 0 {
            self.core.recycle_all();
            self.core.anchor = Anchor::default();
            self.reset_records();
            return 0;
        }
        strace!(use_anchor, "FlowListLayouter::layout_at_position");

        self.core.freeze();
        for col in 0..self.col_count() {
            self.lay_column(col, use_anchor, count, bounds.top, bounds.bottom, true);
        }
        self.core.unfreeze();

        self.core.settle_delta()
    }

    fn fill_top_children(&mut self, dy: i32) -> i32 {
        if !self.core.is_available() || dy <= 0 || self.core.columns.is_empty() {
            return 0;
        }
        let c = self.col_count();
        self.core.freeze();
        loop {
            if self.core.columns.is_top_filled(dy) {
                break;
            }
            let covered = self.core.columns.final_scroll(dy);
            let mut progressed = false;
            for col in 0..c {
                let column = self.core.columns.column(col);
                if column.is_top_filled(dy) {
                    continue;
                }
                let Some(first) = column.first_data_pos() else {
                    continue;
                };
                if first < c {
                    continue;
                }
                self.core.recycle_below(col, covered);
                let edge = self.core.columns.column(col).items_top();
                self.core.insert_fresh(col, 0, first - c, Some(0));
                let h = self.core.measure_at(col, 0);
                self.core.place(col, 0, edge - h);
                progressed = true;
            }
            if !progressed {
                break;
            }
        }
        let applied = self.core.columns.final_scroll(dy);
        for col in 0..c {
            self.core.recycle_below(col, applied);
        }
        self.core.unfreeze();

        if self.needs_realign(dy, applied) {
            sdebug!(dy, applied, "FlowListLayouter: realigning columns at the top");
            self.reset_records();
            self.core.anchor = Anchor::default();
            let settle = self.layout_at_position(false);
            // A layout from row 0 starts at the top edge and never settles.
            debug_assert_eq!(settle, 0);
            return 0;
        }
        applied
    }

    fn fill_bottom_children(&mut self, dy: i32) -> i32 {
        if !self.core.is_available() || dy >= 0 || self.core.columns.is_empty() {
            return 0;
        }
        let count = self.core.data_count();
        let c = self.col_count();
        self.core.freeze();
        loop {
            if self.core.columns.is_bottom_filled(dy) {
                break;
            }
            let covered = self.core.columns.final_scroll(dy);
            let mut progressed = false;
            for col in 0..c {
                let column = self.core.columns.column(col);
                if column.is_bottom_filled(dy) {
                    continue;
                }
                let Some(last) = column.last_data_pos() else {
                    continue;
                };
                if last + c >= count {
                    continue;
                }
                self.core.recycle_above(col, covered);
                let column = self.core.columns.column(col);
                let edge = column.items_bottom();
                let index = column.len();
                self.core.insert_fresh(col, index, last + c, None);
                self.core.measure_at(col, index);
                self.core.place(col, index, edge);
                progressed = true;
            }
            if !progressed {
                break;
            }
        }
        let applied = self.core.columns.final_scroll(dy);
        for col in 0..c {
            self.core.recycle_above(col, applied);
        }
        self.core.unfreeze();
        applied
    }

    fn scroll_to_position(&mut self, pos: usize, offset: i32) -> i32 {
        let count = self.core.data_count();
        if !self.core.is_available() || count == 0 {
            return 0;
        }
        let (position, offset) = self.core.jump_target(pos, offset, count);
        let c = self.col_count();
        let cur_row = position / c;
        sdebug!(position, offset, "FlowListLayouter::scroll_to_position");
        self.records.fill(Record {
            cur_row,
            cur_offset: offset,
            is_null: false,
        });
        self.core.anchor = Anchor {
            position: cur_row * c,
            offset,
        };
        self.layout_at_position(true)
    }

    fn smooth_scroll_to_position(&mut self, pos: usize, offset: i32) -> i32 {
        let count = self.core.data_count();
        if !self.core.is_available() || count == 0 || self.core.columns.is_empty() {
            return 0;
        }
        let c = self.col_count();
        let (pos, offset) = self.core.jump_target(pos, offset, count);
        let column = self.core.columns.column(pos % c);
        let target_top = column.top() - offset;

        if let Some(item) = column.items().iter().find(|it| it.data_pos() == Some(pos)) {
            return target_top - item.outer_top();
        }
        let (Some(first), Some(last)) = (column.first_data_pos(), column.last_data_pos()) else {
            return 0;
        };
        let sum: i64 = column
            .items()
            .iter()
            .map(|it| i64::from(it.outer_height()))
            .sum();
        let avg = average(sum, column.len());
        let row = pos / c;
        let estimated_top = if pos < first {
            f64::from(column.items_top()) - avg * (first / c - row) as f64
        } else {
            f64::from(column.items_bottom()) + avg * (row - last / c - 1) as f64
        };
        let dy = f64::from(target_top) - estimated_top;
        float::round(dy).clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }

    fn compute_total_height(&self) -> ExtentEstimate {
        let columns = &self.core.columns;
        let n = columns.item_count();
        if n == 0 {
            return ExtentEstimate::default();
        }
        let sum: i64 = columns
            .iter()
            .flat_map(|c| c.items().iter())
            .map(|it| i64::from(it.outer_height()))
            .sum();
        let avg = average(sum, n);
        let count = self.core.data_count();

        // The tallest column decides the extent.
        (0..self.col_count())
            .filter_map(|col| self.column_estimate(col, avg, count))
            .max_by_key(|e| e.total)
            .unwrap_or_default()
    }

    fn record_anchor(&mut self) {
        let c = self.col_count();
        for (col, record) in self.records.iter_mut().enumerate() {
            let column = self.core.columns.column(col);
            let first = column
                .index_of_first_visible(0)
                .and_then(|i| column.item(i))
                .and_then(|it| Some((it.data_pos()?, column.top() - it.outer_top())));
            *record = match first {
                Some((pos, offset)) => Record {
                    cur_row: pos / c,
                    cur_offset: offset,
                    is_null: false,
                },
                None => Record::NULL,
            };
        }
        let Some(position) = self.preferred_position() else {
            return;
        };
        let offset = self
            .records
            .iter()
            .find(|r| !r.is_null && r.cur_row * c == position)
            .map_or(0, |r| r.cur_offset);
        self.core.anchor = Anchor { position, offset };
    }
}
