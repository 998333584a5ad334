//! Reverse forwarding index
//!
//! Maps a forwarding target to every source prefix currently pointing at it.
//! Targets are keys of an inner [`RadixTrie`]; each target node anchors an
//! intrusive doubly-linked list of entries, one per source prefix. Entries
//! live in their own arena and carry a back-reference to the owning trie
//! node, so unlinking the last entry can drop the whole target node without
//! a second trie search.

use crate::dedup::DedupTree;
use crate::error::{PhoneError, Result};
use crate::strings;
use crate::trie::{NodeId, RadixTrie};

/// Handle of an entry in a [`ReverseIndex`] arena.
///
/// Owned by the forward mapping that created it; stays valid until that
/// mapping unlinks it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EntryId(u32);

impl EntryId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One source prefix hanging off a target node's list.
#[derive(Debug)]
struct Entry {
    number: String,
    prev: Option<EntryId>,
    next: Option<EntryId>,
    /// Trie node of the target this entry belongs to.
    node: NodeId,
}

#[derive(Debug)]
enum EntrySlot {
    Occupied(Entry),
    Free(Option<EntryId>),
}

/// List anchor stored as the trie value of a target node. The node exists
/// exactly as long as its list is non-empty.
#[derive(Debug)]
struct TargetList {
    head: EntryId,
}

/// Target-to-sources index backing reverse queries.
#[derive(Debug, Default)]
pub struct ReverseIndex {
    trie: RadixTrie<TargetList>,
    entries: Vec<EntrySlot>,
    free_head: Option<EntryId>,
    num_entries: usize,
}

impl ReverseIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            trie: RadixTrie::new(),
            entries: Vec::new(),
            free_head: None,
            num_entries: 0,
        }
    }

    /// Number of live entries across all targets.
    pub fn len(&self) -> usize {
        self.num_entries
    }

    /// Check if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.num_entries == 0
    }

    fn entry(&self, id: EntryId) -> &Entry {
        match &self.entries[id.index()] {
            EntrySlot::Occupied(entry) => entry,
            EntrySlot::Free(_) => unreachable!("stale entry handle"),
        }
    }

    fn entry_mut(&mut self, id: EntryId) -> &mut Entry {
        match &mut self.entries[id.index()] {
            EntrySlot::Occupied(entry) => entry,
            EntrySlot::Free(_) => unreachable!("stale entry handle"),
        }
    }

    fn alloc_entry(&mut self, entry: Entry) -> Result<EntryId> {
        if let Some(id) = self.free_head {
            let next = match &self.entries[id.index()] {
                EntrySlot::Free(next) => *next,
                EntrySlot::Occupied(_) => unreachable!("corrupt free list"),
            };
            self.free_head = next;
            self.entries[id.index()] = EntrySlot::Occupied(entry);
            self.num_entries += 1;
            return Ok(id);
        }
        self.entries
            .try_reserve(1)
            .map_err(|_| PhoneError::out_of_memory(std::mem::size_of::<EntrySlot>()))?;
        let id = EntryId(self.entries.len() as u32);
        self.entries.push(EntrySlot::Occupied(entry));
        self.num_entries += 1;
        Ok(id)
    }

    fn release_entry(&mut self, id: EntryId) {
        self.entries[id.index()] = EntrySlot::Free(self.free_head);
        self.free_head = Some(id);
        self.num_entries -= 1;
    }

    /// Record that `number` now forwards to `target`.
    ///
    /// The new entry is pushed at the head of the target's list; a target
    /// without a node yet gets one. On failure any node created by the walk
    /// is compacted away again and the index is unchanged.
    pub fn link(&mut self, target: &str, number: &str) -> Result<EntryId> {
        let number = strings::clone_str(number)?;
        let node = self.trie.probe(target)?;
        let head = self.trie.value_at(node).map(|list| list.head);
        let entry = Entry {
            number,
            prev: None,
            next: head,
            node,
        };
        let id = match self.alloc_entry(entry) {
            Ok(id) => id,
            Err(err) => {
                if self.trie.value_at(node).is_none() {
                    // Node was freshly created by the probe; undo it.
                    self.trie.remove_at(node, |_, _| {});
                }
                return Err(err);
            }
        };
        match head {
            Some(old_head) => {
                self.entry_mut(old_head).prev = Some(id);
                if let Some(list) = self.trie.value_at_mut(node) {
                    list.head = id;
                }
            }
            None => {
                self.trie.set_value_at(node, TargetList { head: id });
            }
        }
        Ok(id)
    }

    /// Drop the entry named by `id` from its target's list.
    ///
    /// A sole entry takes its target node down with it through the held
    /// back-reference; otherwise only the list pointers around the entry are
    /// rewired.
    pub fn unlink(&mut self, id: EntryId) {
        let (prev, next, node) = {
            let entry = self.entry(id);
            (entry.prev, entry.next, entry.node)
        };
        if prev.is_none() && next.is_none() {
            self.trie.remove_at(node, |_, _| {});
        } else {
            match prev {
                Some(prev) => self.entry_mut(prev).next = next,
                None => {
                    // Head removal: next exists, it becomes the anchor.
                    if let (Some(list), Some(next)) = (self.trie.value_at_mut(node), next) {
                        list.head = next;
                    }
                }
            }
            if let Some(next) = next {
                self.entry_mut(next).prev = prev;
            }
        }
        self.release_entry(id);
    }

    /// Source prefix stored in the entry named by `id`.
    pub fn number_of(&self, id: EntryId) -> &str {
        &self.entry(id).number
    }

    /// Insert into `tree` the source prefix of every entry anchored on any
    /// node along `number`'s path, shortest target first within the walk;
    /// the tree re-sorts and dedups.
    pub fn collect_into(&self, number: &str, tree: &mut DedupTree) -> Result<()> {
        for list in self.trie.values_along_path(number) {
            let mut cursor = Some(list.head);
            while let Some(id) = cursor {
                let entry = self.entry(id);
                tree.insert(strings::clone_str(&entry.number)?)?;
                cursor = entry.next;
            }
        }
        Ok(())
    }

    /// Drop every entry and target, keeping the index usable.
    pub fn clear(&mut self) {
        self.trie.clear(|_, _| {});
        self.entries.clear();
        self.free_head = None;
        self.num_entries = 0;
    }

    #[cfg(test)]
    fn target_nodes(&self) -> usize {
        self.trie.stats().nodes
    }
}
