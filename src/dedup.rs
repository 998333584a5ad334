//! Ephemeral dedup/sort tree
//!
//! A red-black tree of numbers ordered by the digit alphabet (symbols
//! compared by their dense index, not their byte value). One tree lives for
//! the duration of a single reverse query: every collected number is
//! inserted, duplicates are discarded on the way in, and an in-order drain
//! produces the sorted result before the tree is dropped. No per-key
//! deletion exists.
//!
//! Nodes live in a `Vec` arena addressed by `u32` indices with a `NIL`
//! sentinel, so rotations rewire plain integers instead of owned pointers.

use crate::alphabet;
use crate::error::{PhoneError, Result};
use std::cmp::Ordering;

const NIL: u32 = u32::MAX;

#[derive(Debug)]
struct RbNode {
    key: String,
    parent: u32,
    left: u32,
    right: u32,
    red: bool,
}

/// Set of numbers with lexicographic in-order extraction.
///
/// # Examples
///
/// ```rust
/// use phone_forward::DedupTree;
///
/// let mut tree = DedupTree::new();
/// for number in ["5", "12", "12", "7"] {
///     tree.insert(number.to_string()).unwrap();
/// }
/// assert_eq!(tree.into_sorted_vec(), vec!["12", "5", "7"]);
/// ```
#[derive(Debug)]
pub struct DedupTree {
    nodes: Vec<RbNode>,
    root: u32,
}

impl Default for DedupTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DedupTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NIL,
        }
    }

    /// Number of distinct numbers held.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds no numbers.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert `key`, keeping set semantics: inserting a duplicate discards
    /// the incoming string, retains the resident node and returns `false`.
    pub fn insert(&mut self, key: String) -> Result<bool> {
        let mut parent = NIL;
        let mut current = self.root;
        let mut went_left = false;
        while current != NIL {
            match alphabet::cmp_numbers(&key, &self.nodes[current as usize].key) {
                Ordering::Less => {
                    parent = current;
                    went_left = true;
                    current = self.nodes[current as usize].left;
                }
                Ordering::Greater => {
                    parent = current;
                    went_left = false;
                    current = self.nodes[current as usize].right;
                }
                Ordering::Equal => return Ok(false),
            }
        }

        self.nodes
            .try_reserve(1)
            .map_err(|_| PhoneError::out_of_memory(std::mem::size_of::<RbNode>()))?;
        let id = self.nodes.len() as u32;
        self.nodes.push(RbNode {
            key,
            parent,
            left: NIL,
            right: NIL,
            red: true,
        });
        if parent == NIL {
            self.root = id;
        } else if went_left {
            self.nodes[parent as usize].left = id;
        } else {
            self.nodes[parent as usize].right = id;
        }
        self.restore_after_insert(id);
        Ok(true)
    }

    /// Consume the tree, yielding its numbers in alphabet order.
    pub fn into_sorted_vec(mut self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut current = self.root;
        while current != NIL || !stack.is_empty() {
            while current != NIL {
                stack.push(current);
                current = self.nodes[current as usize].left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            out.push(std::mem::take(&mut self.nodes[id as usize].key));
            current = self.nodes[id as usize].right;
        }
        out
    }

    #[inline]
    fn is_red(&self, id: u32) -> bool {
        id != NIL && self.nodes[id as usize].red
    }

    #[inline]
    fn parent_of(&self, id: u32) -> u32 {
        if id == NIL {
            NIL
        } else {
            self.nodes[id as usize].parent
        }
    }

    /// Classic insert fixup: recolor while the uncle is red, otherwise rotate
    /// the red-red edge away. The loop invariant keeps `id` red; a red father
    /// is never the root, so the grandfather always exists.
    fn restore_after_insert(&mut self, mut id: u32) {
        while self.is_red(self.parent_of(id)) {
            let parent = self.parent_of(id);
            let grand = self.parent_of(parent);
            if parent == self.nodes[grand as usize].left {
                let uncle = self.nodes[grand as usize].right;
                if self.is_red(uncle) {
                    self.nodes[parent as usize].red = false;
                    self.nodes[uncle as usize].red = false;
                    self.nodes[grand as usize].red = true;
                    id = grand;
                } else {
                    if id == self.nodes[parent as usize].right {
                        id = parent;
                        self.rotate_left(id);
                    }
                    let parent = self.parent_of(id);
                    let grand = self.parent_of(parent);
                    self.nodes[parent as usize].red = false;
                    self.nodes[grand as usize].red = true;
                    self.rotate_right(grand);
                }
            } else {
                let uncle = self.nodes[grand as usize].left;
                if self.is_red(uncle) {
                    self.nodes[parent as usize].red = false;
                    self.nodes[uncle as usize].red = false;
                    self.nodes[grand as usize].red = true;
                    id = grand;
                } else {
                    if id == self.nodes[parent as usize].left {
                        id = parent;
                        self.rotate_right(id);
                    }
                    let parent = self.parent_of(id);
                    let grand = self.parent_of(parent);
                    self.nodes[parent as usize].red = false;
                    self.nodes[grand as usize].red = true;
                    self.rotate_left(grand);
                }
            }
        }
        let root = self.root;
        self.nodes[root as usize].red = false;
    }

    fn rotate_left(&mut self, x: u32) {
        let y = self.nodes[x as usize].right;
        let y_left = self.nodes[y as usize].left;
        self.nodes[x as usize].right = y_left;
        if y_left != NIL {
            self.nodes[y_left as usize].parent = x;
        }
        let x_parent = self.nodes[x as usize].parent;
        self.nodes[y as usize].parent = x_parent;
        if x_parent == NIL {
            self.root = y;
        } else if self.nodes[x_parent as usize].left == x {
            self.nodes[x_parent as usize].left = y;
        } else {
            self.nodes[x_parent as usize].right = y;
        }
        self.nodes[y as usize].left = x;
        self.nodes[x as usize].parent = y;
    }

    fn rotate_right(&mut self, x: u32) {
        let y = self.nodes[x as usize].left;
        let y_right = self.nodes[y as usize].right;
        self.nodes[x as usize].left = y_right;
        if y_right != NIL {
            self.nodes[y_right as usize].parent = x;
        }
        let x_parent = self.nodes[x as usize].parent;
        self.nodes[y as usize].parent = x_parent;
        if x_parent == NIL {
            self.root = y;
        } else if self.nodes[x_parent as usize].left == x {
            self.nodes[x_parent as usize].left = y;
        } else {
            self.nodes[x_parent as usize].right = y;
        }
        self.nodes[y as usize].right = x;
        self.nodes[x as usize].parent = y;
    }
}
