use crate::{ItemId, ListItem, Rect, Size};

/// Adapter between a layouter and the application's data.
///
/// The layouter never reads data directly: it asks the source to create item views, to bind a
/// data position into an item, and for the type tag used to decide recycling eligibility.
pub trait ListSource<V> {
    /// Creates a fresh item able to show `data_pos`.
    fn create_item(&mut self, data_pos: usize) -> ListItem<V>;

    /// Binds the data at `data_pos` into `item`.
    fn bind_data(&mut self, item: &mut ListItem<V>, data_pos: usize);

    /// Recycling type tag for `data_pos`.
    fn item_type_id(&self, _data_pos: usize) -> ItemId {
        0
    }

    fn data_count(&self) -> usize;
}

/// The capabilities a layouter needs from the list view that hosts its items.
pub trait ListHost<V> {
    /// Measures `item` against an available width and returns its size without margins.
    fn measure_item(&mut self, item: &mut ListItem<V>, max_width: i32) -> Size;

    /// Positions `item`'s view at `bounds` (margins excluded).
    fn layout_item(&mut self, item: &mut ListItem<V>, bounds: Rect);

    /// Attaches `item`'s view to the view tree at child index `pos`, or appends it.
    fn add_view_at(&mut self, pos: Option<usize>, item: &mut ListItem<V>);

    /// Detaches `item`'s view from the view tree.
    fn remove_view(&mut self, item: &mut ListItem<V>);

    /// Starts a batch of item updates. Layout requests should be deferred until `unfreeze_layout`.
    fn freeze_layout(&mut self) {}

    fn unfreeze_layout(&mut self) {}

    /// The viewport the items are laid out in.
    fn content_bounds(&self) -> Rect;
}
