//! Compact arena backing every node of a tree.
//!
//! Slots live in a `Vec<T>` with a separate allocation mask and free list, so
//! handles stay stable while freed slots are recycled.

use std::ops::{Index, IndexMut};

pub type NodeId = u32;
pub const NULL_NODE: NodeId = u32::MAX;

/// Statistics for a compact arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactArenaStats {
    pub total_capacity: usize,
    pub allocated_count: usize,
    pub free_count: usize,
    pub utilization: f64,
    pub fragmentation: f64,
}

/// Arena allocator with a free list and an allocation mask.
#[derive(Debug, Clone)]
pub struct CompactArena<T> {
    /// Direct storage without Option wrapper
    storage: Vec<T>,
    /// Free slot indices for reuse
    free_list: Vec<usize>,
    /// Track which slots are actually allocated
    allocated_mask: Vec<bool>,
    /// Number of live slots
    allocated: usize,
}

impl<T> CompactArena<T> {
    /// Create a new empty compact arena
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated_mask: Vec::new(),
            allocated: 0,
        }
    }

    /// Create a new compact arena with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            allocated_mask: Vec::with_capacity(capacity),
            allocated: 0,
        }
    }

    /// Allocate a new item in the arena and return its ID
    ///
    /// # Panics
    ///
    /// Panics if the arena would need more than `NULL_NODE` slots.
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = if let Some(free_index) = self.free_list.pop() {
            self.storage[free_index] = item;
            self.allocated_mask[free_index] = true;
            free_index
        } else {
            let index = self.storage.len();
            assert!(
                index < NULL_NODE as usize,
                "CompactArena::allocate: arena is at maximum capacity ({NULL_NODE})"
            );
            self.storage.push(item);
            self.allocated_mask.push(true);
            index
        };
        self.allocated += 1;

        // The assertion above keeps every index below NULL_NODE.
        index as NodeId
    }

    /// Deallocate an item from the arena and return it (requires Default)
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T>
    where
        T: Default,
    {
        let index = self.live_index(id)?;

        self.allocated_mask[index] = false;
        self.free_list.push(index);
        self.allocated -= 1;

        Some(std::mem::take(&mut self.storage[index]))
    }

    /// Deallocate an item that must be live.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not name an allocated slot.
    pub fn take(&mut self, id: NodeId) -> T
    where
        T: Default,
    {
        match self.deallocate(id) {
            Some(item) => item,
            None => panic!("CompactArena: node {id} is not allocated"),
        }
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.live_index(id).map(|index| &self.storage[index])
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.live_index(id).map(|index| &mut self.storage[index])
    }

    /// Check if an ID is valid and allocated
    pub fn contains(&self, id: NodeId) -> bool {
        self.live_index(id).is_some()
    }

    fn live_index(&self, id: NodeId) -> Option<usize> {
        if id == NULL_NODE {
            return None;
        }
        let index = usize::try_from(id).ok()?;
        self.allocated_mask
            .get(index)
            .copied()
            .unwrap_or(false)
            .then_some(index)
    }

    /// Iterate over the IDs of all allocated slots in ascending order.
    pub fn allocated_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.allocated_mask
            .iter()
            .enumerate()
            .filter(|&(_, &allocated)| allocated)
            .map(|(index, _)| index as NodeId)
    }

    /// Get arena statistics
    pub fn stats(&self) -> CompactArenaStats {
        let total_capacity = self.storage.capacity();
        let allocated_count = self.allocated;
        let free_count = self.free_list.len();
        let utilization = if total_capacity > 0 {
            allocated_count as f64 / total_capacity as f64
        } else {
            0.0
        };
        let fragmentation = if allocated_count > 0 {
            free_count as f64 / (allocated_count + free_count) as f64
        } else {
            0.0
        };

        CompactArenaStats {
            total_capacity,
            allocated_count,
            free_count,
            utilization,
            fragmentation,
        }
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.allocated
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }

    /// Clear all items from the arena
    pub fn clear(&mut self) {
        self.storage.clear();
        self.allocated_mask.clear();
        self.free_list.clear();
        self.allocated = 0;
    }

    /// Get the number of free slots
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }
}

impl<T> Default for CompactArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for CompactArena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(item) => item,
            None => panic!("CompactArena: node {id} is not allocated"),
        }
    }
}

impl<T> IndexMut<NodeId> for CompactArena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.get_mut(id) {
            Some(item) => item,
            None => panic!("CompactArena: node {id} is not allocated"),
        }
    }
}


// ============================================================================
// BTREE ARENA ALLOCATION HELPERS
// ============================================================================

use crate::error::{BTreeError, BTreeResult};
use crate::types::{BTree, Node};

impl<T, C> BTree<T, C> {
    /// Allocate a node in the arena and return its ID.
    #[inline]
    pub(crate) fn allocate_node(&mut self, node: Node<T>) -> NodeId {
        self.arena.allocate(node)
    }

    /// Remove a live node from the arena, handing back its contents.
    #[inline]
    pub(crate) fn deallocate_node(&mut self, id: NodeId) -> Node<T> {
        self.arena.take(id)
    }

    /// Read access to a node by handle, `None` if the handle is stale.
    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.arena.get(id)
    }

    /// Checked lookup for the fallible entry points; a stale handle becomes `ArenaError`.
    pub(crate) fn checked_node(&self, id: NodeId, operation: &str) -> BTreeResult<&Node<T>> {
        self.arena.get(id).ok_or_else(|| {
            BTreeError::arena_error(operation, &format!("node {} is not allocated", id))
        })
    }

    /// Get statistics for the node arena.
    pub fn arena_stats(&self) -> CompactArenaStats {
        self.arena.stats()
    }

    /// Get the number of free slots in the node arena.
    pub fn free_node_count(&self) -> usize {
        self.arena.free_count()
    }

    /// Get the number of allocated nodes in the arena.
    pub fn allocated_node_count(&self) -> usize {
        self.arena.len()
    }

    /// Point `child` at its new owner.
    #[inline]
    pub(crate) fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        self.arena[child].parent = parent;
    }

    /// Point every child of `id` back at `id`.
    pub(crate) fn adopt_children(&mut self, id: NodeId) {
        for index in 0..self.arena[id].children.len() {
            let child = self.arena[id].children[index];
            self.set_parent(child, id);
        }
    }
}
