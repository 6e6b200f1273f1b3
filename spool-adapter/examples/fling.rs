// Example: a touch fling over a flowing two-column feed, driven frame by frame.
use spool::{FlowListLayouter, ListHost, ListItem, ListSource, Rect, Size};
use spool_adapter::{ListController, ListControllerOptions, ScrollInput};

const MS: i64 = 1_000_000;
const FRAME_NS: i64 = 16_666_667;

struct Host;

impl ListHost<usize> for Host {
    fn measure_item(&mut self, item: &mut ListItem<usize>, max_width: i32) -> Size {
        // Card heights vary with the data, so the two columns drift apart.
        let h = 60 + (*item.view() * 37 % 5) as i32 * 30;
        Size::new(max_width, h)
    }

    fn layout_item(&mut self, _item: &mut ListItem<usize>, _bounds: Rect) {}

    fn add_view_at(&mut self, _pos: Option<usize>, _item: &mut ListItem<usize>) {}

    fn remove_view(&mut self, _item: &mut ListItem<usize>) {}

    fn content_bounds(&self) -> Rect {
        Rect::from_size(0, 0, 360, 640)
    }
}

struct Feed;

impl ListSource<usize> for Feed {
    fn create_item(&mut self, data_pos: usize) -> ListItem<usize> {
        ListItem::new(data_pos)
    }

    fn bind_data(&mut self, item: &mut ListItem<usize>, data_pos: usize) {
        *item.view_mut() = data_pos;
    }

    fn data_count(&self) -> usize {
        500
    }
}

fn main() {
    let mut c = ListController::new(
        FlowListLayouter::<usize>::new(2),
        ListControllerOptions::default(),
    );
    c.bind(Box::new(Host), Box::new(Feed));
    c.layout(360, 640);

    // A quick upward swipe: 240px in 30ms.
    let mut now = 0;
    c.on_input(ScrollInput::TouchDown { y: 500 }, now);
    for y in [420, 340, 260] {
        now += 10 * MS;
        c.on_input(ScrollInput::TouchMove { y }, now);
    }
    c.on_input(ScrollInput::TouchUp { y: 260 }, now);
    println!("fling velocity: {:.0}px/s", c.scroller().cur_velocity());

    let mut frames = 0;
    let mut travelled = 0;
    while c.is_animating() {
        now += FRAME_NS;
        travelled += c.tick(now, 60);
        frames += 1;
        if frames % 20 == 0 {
            println!(
                "frame {frames}: first={:?} thumb={:?}",
                c.layouter().first_visible_position(),
                c.scrollbar(640)
            );
        }
    }
    println!("stopped after {frames} frames, {travelled}px");
}
