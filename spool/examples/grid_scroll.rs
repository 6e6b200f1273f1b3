// Example: a 3-column grid over 10k rows of data, scrolled by hand.
use spool::{
    GridListLayouter, ListHost, ListItem, ListLayouter, ListSource, Rect, ScrollDirection, Size,
};

/// Views are plain labels; the host only records where they end up.
struct PrintHost {
    viewport: Rect,
    attached: usize,
}

impl ListHost<String> for PrintHost {
    fn measure_item(&mut self, item: &mut ListItem<String>, max_width: i32) -> Size {
        // Taller cells every seventh row.
        let tall = item.data_pos().is_some_and(|pos| pos / 3 % 7 == 0);
        Size::new(max_width, if tall { 80 } else { 40 })
    }

    fn layout_item(&mut self, _item: &mut ListItem<String>, _bounds: Rect) {}

    fn add_view_at(&mut self, _pos: Option<usize>, _item: &mut ListItem<String>) {
        self.attached += 1;
    }

    fn remove_view(&mut self, _item: &mut ListItem<String>) {
        self.attached -= 1;
    }

    fn content_bounds(&self) -> Rect {
        self.viewport
    }
}

struct Labels {
    count: usize,
    created: usize,
}

impl ListSource<String> for Labels {
    fn create_item(&mut self, _data_pos: usize) -> ListItem<String> {
        self.created += 1;
        ListItem::new(String::new())
    }

    fn bind_data(&mut self, item: &mut ListItem<String>, data_pos: usize) {
        *item.view_mut() = format!("cell #{data_pos}");
    }

    fn data_count(&self) -> usize {
        self.count
    }
}

fn scroll(l: &mut GridListLayouter<String>, dy: i32) -> i32 {
    let applied = if dy < 0 {
        l.fill_bottom_children(dy)
    } else {
        l.fill_top_children(dy)
    };
    l.offset_children(applied);
    l.record_anchor();
    applied
}

fn main() {
    let mut l = GridListLayouter::<String>::new(3);
    l.bind(
        Box::new(PrintHost {
            viewport: Rect::from_size(0, 0, 300, 400),
            attached: 0,
        }),
        Box::new(Labels {
            count: 10_000,
            created: 0,
        }),
    );
    l.layout_at_position(false);
    println!("initial: {:?}", l.materialized_positions());

    let mut total = 0;
    while total > -5_000 && l.can_scroll(ScrollDirection::Bottom) {
        total += scroll(&mut l, -120);
    }
    let extent = l.compute_total_height();
    println!("after {total}px: first={:?}", l.first_visible_position());
    println!("estimate: {extent:?}");
    println!(
        "live={} pooled={}",
        l.columns().item_count(),
        l.recycler().len()
    );

    let settle = l.scroll_to_position(9_998, 0);
    println!(
        "jump to the end: settle={settle} rows={:?}",
        l.materialized_positions()
    );
    scroll(&mut l, settle);
    println!("settled: first={:?}", l.first_visible_position());
}
