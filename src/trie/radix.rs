//! Compressed trie over the digit alphabet
//!
//! Keys are digit strings; chains of single-child nodes are merged into one
//! edge carrying a multi-symbol label. Nodes live in an arena (`Vec` of slots
//! plus a free list) and refer to each other through [`NodeId`] handles, so
//! back-references never control lifetimes.
//!
//! The structure maintains the compaction invariant: after any operation
//! completes, no reachable non-root node has exactly one child and no value,
//! and no valueless childless non-root node survives. The single tolerated
//! exception is a failed label concatenation during post-delete compaction,
//! which leaves the trie valid but less compacted than optimal; re-attempting
//! compaction later is always safe.

use super::node::{Edge, Node, NodeId};
use crate::alphabet::{self, ALPHABET_SIZE};
use crate::error::{PhoneError, Result};
use crate::strings;

/// Arena slot: an occupied node or a link in the free list.
#[derive(Debug)]
enum Slot<V> {
    Occupied(Node<V>),
    Free(Option<NodeId>),
}

/// Structure statistics, collected by walking the reachable tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieStats {
    /// Reachable nodes, including the root
    pub nodes: usize,
    /// Stored values
    pub keys: usize,
    /// Longest root-to-leaf chain, counted in edges
    pub max_depth: usize,
}

/// A compressed (radix) trie mapping digit strings to values of type `V`.
///
/// Mutating operations are fallible and leave the trie in its pre-call state
/// when they report [`PhoneError::OutOfMemory`]; lookups never fail and never
/// mutate.
///
/// # Examples
///
/// ```rust
/// use phone_forward::RadixTrie;
///
/// let mut trie = RadixTrie::new();
/// trie.insert("123", "one-two-three").unwrap();
/// trie.insert("12356", "longer").unwrap();
///
/// assert_eq!(trie.get("123"), Some(&"one-two-three"));
/// assert_eq!(trie.longest_prefix("123999"), Some((&"one-two-three", 3)));
/// ```
#[derive(Debug)]
pub struct RadixTrie<V> {
    slots: Vec<Slot<V>>,
    free_head: Option<NodeId>,
    num_keys: usize,
}

/// Outcome of examining one child slot during the descent of `probe`.
enum Step {
    Missing,
    Descend(NodeId, usize),
    Split(SplitPlan),
}

/// Everything a split needs, cloned before any structural mutation.
struct SplitPlan {
    common: usize,
    old_child: NodeId,
    old_suffix: String,
    old_branch: usize,
}

impl<V> RadixTrie<V> {
    /// Create a new empty trie holding only the root node.
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::Occupied(Node::new(None))],
            free_head: None,
            num_keys: 0,
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.num_keys
    }

    /// Check if the trie holds no values.
    pub fn is_empty(&self) -> bool {
        self.num_keys == 0
    }

    fn node(&self, id: NodeId) -> &Node<V> {
        match &self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Free(_) => unreachable!("stale node handle"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        match &mut self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Free(_) => unreachable!("stale node handle"),
        }
    }

    fn alloc_node(&mut self, parent: Option<NodeId>) -> Result<NodeId> {
        if let Some(id) = self.free_head {
            let next = match &self.slots[id.index()] {
                Slot::Free(next) => *next,
                Slot::Occupied(_) => unreachable!("corrupt free list"),
            };
            self.free_head = next;
            self.slots[id.index()] = Slot::Occupied(Node::new(parent));
            return Ok(id);
        }
        self.slots
            .try_reserve(1)
            .map_err(|_| PhoneError::out_of_memory(std::mem::size_of::<Slot<V>>()))?;
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot::Occupied(Node::new(parent)));
        Ok(id)
    }

    fn release_node(&mut self, id: NodeId) {
        debug_assert!(id != NodeId::ROOT, "root is never freed");
        self.slots[id.index()] = Slot::Free(self.free_head);
        self.free_head = Some(id);
    }

    /// Walk from the root along `key`, descending only fully matched edges.
    ///
    /// Returns the node whose path spells `key` exactly, or `None`.
    fn locate(&self, key: &str) -> Option<NodeId> {
        let bytes = key.as_bytes();
        let mut node = NodeId::ROOT;
        let mut pos = 0;
        while pos < bytes.len() {
            let slot = alphabet::symbol_index(bytes[pos])?;
            let edge = self.node(node).children[slot].as_ref()?;
            if !bytes[pos..].starts_with(edge.label.as_bytes()) {
                return None;
            }
            pos += edge.label.len();
            node = edge.child;
        }
        Some(node)
    }

    /// Locate the node for `key`, creating it if necessary.
    ///
    /// This is the locate-or-create walk: an empty child slot grows a single
    /// new leaf carrying the whole remaining suffix; an edge that diverges
    /// from the key mid-label is split around the common prefix. On failure
    /// every node and label allocated so far is released and the trie is left
    /// in its exact pre-call state.
    pub fn probe(&mut self, key: &str) -> Result<NodeId> {
        alphabet::check_number(key)?;
        let bytes = key.as_bytes();
        let mut node = NodeId::ROOT;
        let mut pos = 0;
        loop {
            if pos == bytes.len() {
                return Ok(node);
            }
            let slot = alphabet::slot(bytes[pos]);
            let step = match &self.node(node).children[slot] {
                None => Step::Missing,
                Some(edge) => {
                    let common = strings::common_prefix_len(&edge.label, &key[pos..]);
                    if common == edge.label.len() {
                        Step::Descend(edge.child, common)
                    } else {
                        Step::Split(SplitPlan {
                            common,
                            old_child: edge.child,
                            old_suffix: strings::clone_suffix(&edge.label, common)?,
                            old_branch: alphabet::slot(edge.label.as_bytes()[common]),
                        })
                    }
                }
            };
            match step {
                Step::Missing => {
                    let label = strings::clone_suffix(key, pos)?;
                    let child = self.alloc_node(Some(node))?;
                    self.node_mut(node).children[slot] = Some(Edge { label, child });
                    return Ok(child);
                }
                Step::Descend(child, consumed) => {
                    node = child;
                    pos += consumed;
                }
                Step::Split(plan) => return self.split_edge(node, slot, pos, key, plan),
            }
        }
    }

    /// Split the edge at `parent.children[slot]` around `plan.common`.
    ///
    /// A new intermediate node takes over the old subtree under the
    /// truncated-away label suffix; if the key extends past the split point a
    /// fresh leaf is added next to it, otherwise the intermediate node itself
    /// is the insertion point. All allocation happens before the existing
    /// structure is touched.
    fn split_edge(
        &mut self,
        parent: NodeId,
        slot: usize,
        pos: usize,
        key: &str,
        plan: SplitPlan,
    ) -> Result<NodeId> {
        let SplitPlan {
            common,
            old_child,
            old_suffix,
            old_branch,
        } = plan;

        let new_tail = if pos + common < key.len() {
            let branch = alphabet::slot(key.as_bytes()[pos + common]);
            debug_assert_ne!(branch, old_branch, "split point must diverge");
            Some((strings::clone_suffix(key, pos + common)?, branch))
        } else {
            None
        };

        let mid = self.alloc_node(Some(parent))?;
        self.node_mut(mid).children[old_branch] = Some(Edge {
            label: old_suffix,
            child: old_child,
        });

        let target = match new_tail {
            Some((label, branch)) => {
                let leaf = match self.alloc_node(Some(mid)) {
                    Ok(leaf) => leaf,
                    Err(err) => {
                        self.release_node(mid);
                        return Err(err);
                    }
                };
                self.node_mut(mid).children[branch] = Some(Edge { label, child: leaf });
                leaf
            }
            None => mid,
        };

        // Commit point: nothing below allocates.
        self.node_mut(old_child).parent = Some(mid);
        if let Some(edge) = self.node_mut(parent).children[slot].as_mut() {
            edge.label.truncate(common);
            edge.child = mid;
        }
        Ok(target)
    }

    /// Insert `value` under `key`, returning the node handle and the value it
    /// replaced, if any. The caller owns the previous value and is
    /// responsible for any cross-structure cleanup it requires.
    pub fn insert(&mut self, key: &str, value: V) -> Result<(NodeId, Option<V>)> {
        let id = self.probe(key)?;
        let previous = self.set_value_at(id, value);
        Ok((id, previous))
    }

    /// Swap `value` into the node named by `id`, returning the old value.
    pub fn set_value_at(&mut self, id: NodeId, value: V) -> Option<V> {
        let previous = self.node_mut(id).value.replace(value);
        if previous.is_none() {
            self.num_keys += 1;
        }
        previous
    }

    /// Exact-match lookup. Never mutates.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.locate(key).and_then(|id| self.node(id).value.as_ref())
    }

    /// Check whether `key` holds a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Value stored at the node named by `id`.
    pub fn value_at(&self, id: NodeId) -> Option<&V> {
        self.node(id).value.as_ref()
    }

    /// Mutable value stored at the node named by `id`.
    pub fn value_at_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.node_mut(id).value.as_mut()
    }

    /// Find the value of the longest stored prefix of `key`.
    ///
    /// Returns the value of the deepest value-bearing node on the walk
    /// together with the number of key bytes it covers. A node without a
    /// value never terminates the walk; it only contributes its edge length.
    pub fn longest_prefix(&self, key: &str) -> Option<(&V, usize)> {
        let bytes = key.as_bytes();
        let mut best = None;
        let mut node = NodeId::ROOT;
        let mut pos = 0;
        loop {
            if let Some(value) = self.node(node).value.as_ref() {
                best = Some((value, pos));
            }
            if pos == bytes.len() {
                break;
            }
            let Some(slot) = alphabet::symbol_index(bytes[pos]) else {
                break;
            };
            let Some(edge) = self.node(node).children[slot].as_ref() else {
                break;
            };
            if !bytes[pos..].starts_with(edge.label.as_bytes()) {
                break;
            }
            pos += edge.label.len();
            node = edge.child;
        }
        best
    }

    /// Collect the value of every visited node along `key`'s path, in
    /// root-to-leaf (shortest-prefix-first) order.
    ///
    /// A node is visited when its whole edge matched within the key; the walk
    /// stops at the first edge that does not fully match.
    pub fn values_along_path<'a>(&'a self, key: &str) -> Vec<&'a V> {
        let bytes = key.as_bytes();
        let mut out = Vec::new();
        let mut node = NodeId::ROOT;
        let mut pos = 0;
        loop {
            if let Some(value) = self.node(node).value.as_ref() {
                out.push(value);
            }
            if pos == bytes.len() {
                break;
            }
            let Some(slot) = alphabet::symbol_index(bytes[pos]) else {
                break;
            };
            let Some(edge) = self.node(node).children[slot].as_ref() else {
                break;
            };
            if !bytes[pos..].starts_with(edge.label.as_bytes()) {
                break;
            }
            pos += edge.label.len();
            node = edge.child;
        }
        out
    }

    /// Reconstruct the full key of the node named by `id` by walking the
    /// father chain and concatenating edge labels root-to-leaf.
    pub fn key_of(&self, id: NodeId) -> String {
        let mut labels = Vec::new();
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            if let Some(slot) = self.node(parent).slot_of(current) {
                if let Some(edge) = self.node(parent).children[slot].as_ref() {
                    labels.push(edge.label.as_str());
                }
            }
            current = parent;
        }
        let mut key = String::with_capacity(labels.iter().map(|l| l.len()).sum());
        for label in labels.iter().rev() {
            key.push_str(label);
        }
        key
    }

    /// Remove the value stored under `key`, if any.
    ///
    /// `dispose` receives the removed value together with its key. The node
    /// survives as a pure branch point when it still has two or more
    /// children; otherwise it is merged or freed and compaction propagates
    /// toward the root.
    pub fn remove<F>(&mut self, key: &str, dispose: F)
    where
        F: FnMut(V, Option<&str>),
    {
        if let Some(id) = self.locate(key) {
            self.remove_at(id, dispose);
        }
    }

    /// Remove the value at the node named by `id`, then compact.
    ///
    /// Used by callers that kept a handle from insertion and want disposal
    /// without a second trie search. The key passed to `dispose` is
    /// reconstructed from the father chain.
    pub fn remove_at<F>(&mut self, id: NodeId, mut dispose: F)
    where
        F: FnMut(V, Option<&str>),
    {
        if let Some(value) = self.node_mut(id).value.take() {
            self.num_keys -= 1;
            let key = self.key_of(id);
            dispose(value, Some(&key));
        }
        self.compact_from(id);
    }

    /// Remove the whole subtree rooted at the node whose path spells
    /// `prefix` exactly; a prefix that only partially matches an edge label
    /// is a no-op. Values are destroyed children-before-parent, each passed
    /// to `dispose` with its reconstructed key.
    pub fn remove_subtree<F>(&mut self, prefix: &str, mut dispose: F)
    where
        F: FnMut(V, Option<&str>),
    {
        let Some(id) = self.locate(prefix) else {
            return;
        };
        if let Some(parent) = self.node(id).parent {
            if let Some(slot) = self.node(parent).slot_of(id) {
                self.node_mut(parent).children[slot] = None;
            }
            self.teardown(id, prefix, &mut dispose);
            self.compact_from(parent);
        } else {
            // An empty prefix names the root: every subtree goes, the root
            // stays.
            for slot in 0..ALPHABET_SIZE {
                if let Some(edge) = self.node_mut(NodeId::ROOT).children[slot].take() {
                    self.teardown(edge.child, &edge.label, &mut dispose);
                }
            }
        }
    }

    /// Post-order teardown of the detached subtree rooted at `root`, whose
    /// full key is `base`. Iterative, so deep tries cannot overflow the call
    /// stack.
    fn teardown<F>(&mut self, root: NodeId, base: &str, dispose: &mut F)
    where
        F: FnMut(V, Option<&str>),
    {
        struct Frame {
            id: NodeId,
            path_len: usize,
            next_slot: usize,
        }

        let mut path = String::from(base);
        let mut stack = vec![Frame {
            id: root,
            path_len: path.len(),
            next_slot: 0,
        }];
        loop {
            let Some(top) = stack.last_mut() else {
                break;
            };
            let id = top.id;
            let path_len = top.path_len;
            if top.next_slot < ALPHABET_SIZE {
                let slot = top.next_slot;
                top.next_slot += 1;
                if let Some(edge) = self.node_mut(id).children[slot].take() {
                    path.truncate(path_len);
                    path.push_str(&edge.label);
                    stack.push(Frame {
                        id: edge.child,
                        path_len: path.len(),
                        next_slot: 0,
                    });
                }
            } else {
                path.truncate(path_len);
                if let Some(value) = self.node_mut(id).value.take() {
                    self.num_keys -= 1;
                    dispose(value, Some(&path));
                }
                self.release_node(id);
                stack.pop();
            }
        }
    }

    /// Restore the compaction invariant walking upward from `id`.
    ///
    /// A valueless childless node is freed and its father re-examined; a
    /// valueless single-child node is merged into its father's edge, which
    /// ends the walk (the father's child count is unchanged by a merge).
    fn compact_from(&mut self, mut id: NodeId) {
        loop {
            if self.node(id).value.is_some() {
                return;
            }
            let Some(parent) = self.node(id).parent else {
                return;
            };
            match self.node(id).child_count() {
                0 => {
                    if let Some(slot) = self.node(parent).slot_of(id) {
                        self.node_mut(parent).children[slot] = None;
                    }
                    self.release_node(id);
                    id = parent;
                }
                1 => {
                    self.merge_into_parent(id, parent);
                    return;
                }
                _ => return,
            }
        }
    }

    /// Splice out `id` (one child, no value) by prefixing its child's edge
    /// label with `id`'s own and hanging the child directly under `parent`.
    ///
    /// A failed concatenation keeps the redundant node: the trie stays valid,
    /// merely less compacted than optimal, and a later deletion can retry.
    fn merge_into_parent(&mut self, id: NodeId, parent: NodeId) {
        let Some(child_slot) = self.node(id).sole_child_slot() else {
            return;
        };
        let Some(my_slot) = self.node(parent).slot_of(id) else {
            return;
        };
        let Some(tail) = self.node_mut(id).children[child_slot].take() else {
            return;
        };
        let merged = match self.node_mut(parent).children[my_slot].as_mut() {
            Some(edge) => strings::concat_in_place(&mut edge.label, &tail.label),
            None => return,
        };
        match merged {
            Ok(()) => {
                let grandchild = tail.child;
                if let Some(edge) = self.node_mut(parent).children[my_slot].as_mut() {
                    edge.child = grandchild;
                }
                self.node_mut(grandchild).parent = Some(parent);
                self.release_node(id);
            }
            Err(_) => {
                self.node_mut(id).children[child_slot] = Some(tail);
                log::debug!("edge merge skipped under memory pressure; trie left uncompacted");
            }
        }
    }

    /// Destroy every node and value, keeping only a fresh root.
    ///
    /// `dispose` receives each value with an absent key: this is a pure
    /// free, not a logical per-key deletion.
    pub fn clear<F>(&mut self, mut dispose: F)
    where
        F: FnMut(V, Option<&str>),
    {
        for slot in self.slots.iter_mut() {
            if let Slot::Occupied(node) = slot {
                if let Some(value) = node.value.take() {
                    dispose(value, None);
                }
            }
        }
        self.slots.truncate(1);
        self.slots[0] = Slot::Occupied(Node::new(None));
        self.free_head = None;
        self.num_keys = 0;
    }

    /// Collect statistics by walking the reachable tree.
    pub fn stats(&self) -> TrieStats {
        let mut stats = TrieStats {
            nodes: 0,
            keys: 0,
            max_depth: 0,
        };
        let mut stack = vec![(NodeId::ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            let node = self.node(id);
            if node.value.is_some() {
                stats.keys += 1;
            }
            for edge in node.children.iter().flatten() {
                stack.push((edge.child, depth + 1));
            }
        }
        stats
    }
}

impl<V> Default for RadixTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}
