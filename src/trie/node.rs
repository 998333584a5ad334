//! Node representation for the compressed trie arena

use crate::alphabet::ALPHABET_SIZE;

/// Handle of a node in a [`RadixTrie`](super::RadixTrie) arena.
///
/// Handles are stable for as long as the node they name holds a value; they
/// are non-owning and never control the node's lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The root of every trie lives at slot zero and is never freed.
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Parent-to-child link carrying a compressed, non-empty label.
#[derive(Debug)]
pub(crate) struct Edge {
    pub label: String,
    pub child: NodeId,
}

/// A trie node: one child slot per alphabet symbol, an optional value, and a
/// non-owning back-reference to the father (absent only for the root).
#[derive(Debug)]
pub(crate) struct Node<V> {
    pub parent: Option<NodeId>,
    pub children: [Option<Edge>; ALPHABET_SIZE],
    pub value: Option<V>,
}

impl<V> Node<V> {
    pub fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: std::array::from_fn(|_| None),
            value: None,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.iter().filter(|slot| slot.is_some()).count()
    }

    /// Slot of the only child, or `None` when the node has zero or more than
    /// one child.
    pub fn sole_child_slot(&self) -> Option<usize> {
        let mut found = None;
        for (slot, edge) in self.children.iter().enumerate() {
            if edge.is_some() {
                if found.is_some() {
                    return None;
                }
                found = Some(slot);
            }
        }
        found
    }

    /// Slot under which `child` hangs, found by scanning the child array.
    pub fn slot_of(&self, child: NodeId) -> Option<usize> {
        self.children
            .iter()
            .position(|slot| matches!(slot, Some(edge) if edge.child == child))
    }
}
