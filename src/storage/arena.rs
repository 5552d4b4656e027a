//! Node arena.
//!
//! All nodes of a tree live in one slot table. The arena is the only owner
//! of node memory: a node is created by `alloc`, handed out by `NodeId`, and
//! destroyed by `release`, which returns it by value. Released slots are
//! recycled through the free list.

use super::FreeList;
use crate::node::Node;
use crate::types::NodeId;
use std::ops::{Index, IndexMut};

/// Slot table holding every node of one tree
#[derive(Debug)]
pub struct NodeArena<K> {
    /// Node slots; `None` marks a released slot
    slots: Vec<Option<Node<K>>>,
    /// Released slots waiting for reuse
    free_list: FreeList,
}

impl<K> Default for NodeArena<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> NodeArena<K> {
    /// Create an empty arena
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: FreeList::new(),
        }
    }

    /// Store a node and return its handle
    pub fn alloc(&mut self, node: Node<K>) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            self.slots[id.index()] = Some(node);
            return id;
        }

        let id = NodeId::new(self.slots.len() as u32);
        self.slots.push(Some(node));
        id
    }

    /// Remove a node from the arena, returning ownership of it
    ///
    /// Panics if the slot was already released.
    pub fn release(&mut self, id: NodeId) -> Node<K> {
        match self.slots.get_mut(id.index()).and_then(Option::take) {
            Some(node) => {
                self.free_list.push(id);
                node
            }
            None => panic!("node {} released while not allocated", id),
        }
    }

    /// Look up a node, returning `None` for released or unknown slots
    pub fn get(&self, id: NodeId) -> Option<&Node<K>> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Whether the arena holds no live nodes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total slots ever allocated, live or free
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Handles of all live nodes
    pub fn live_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| NodeId::new(i as u32))
    }
}

impl<K> Index<NodeId> for NodeArena<K> {
    type Output = Node<K>;

    fn index(&self, id: NodeId) -> &Node<K> {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {} is not allocated", id),
        }
    }
}

impl<K> IndexMut<NodeId> for NodeArena<K> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.slots.get_mut(id.index()).and_then(Option::as_mut) {
            Some(node) => node,
            None => panic!("node {} is not allocated", id),
        }
    }
}
