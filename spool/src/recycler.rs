use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::{ItemId, ListHost, ListItem};

#[cfg(feature = "std")]
type PoolMap<V> = HashMap<ItemId, Vec<ListItem<V>>>;
#[cfg(not(feature = "std"))]
type PoolMap<V> = BTreeMap<ItemId, Vec<ListItem<V>>>;

/// A pool of detached items, keyed by item type id.
///
/// Pools are never shared across types: item views of different types are not
/// interchangeable. Within one type the most recently recycled item is reused first.
#[derive(Debug)]
pub struct ListItemRecycler<V> {
    pools: PoolMap<V>,
}

impl<V> Default for ListItemRecycler<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ListItemRecycler<V> {
    pub fn new() -> Self {
        Self {
            pools: PoolMap::new(),
        }
    }

    /// Pops the most recently recycled item of `item_id` and re-attaches it to the host at
    /// `pos` (or appends it).
    ///
    /// Returns `None` when the pool for `item_id` is empty; the caller creates a fresh item.
    pub fn reuse(
        &mut self,
        item_id: ItemId,
        host: &mut dyn ListHost<V>,
        pos: Option<usize>,
    ) -> Option<ListItem<V>> {
        let mut item = self.pools.get_mut(&item_id)?.pop()?;
        item.set_recycled(false);
        host.add_view_at(pos, &mut item);
        strace!(item_id, "ListItemRecycler::reuse");
        Some(item)
    }

    /// Detaches `item` from the host and stores it for later reuse.
    pub fn recycle_from_parent(&mut self, mut item: ListItem<V>, host: &mut dyn ListHost<V>) {
        host.remove_view(&mut item);
        item.set_recycled(true);
        item.set_data_pos(None);
        self.pools.entry(item.item_id()).or_default().push(item);
    }

    /// Number of pooled items of `item_id`.
    pub fn pooled(&self, item_id: ItemId) -> usize {
        self.pools.get(&item_id).map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.values().all(Vec::is_empty)
    }

    /// Drops every pooled item together with its view.
    pub fn clear(&mut self) {
        self.pools.clear();
    }
}
