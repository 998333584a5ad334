//! Compressed trie engine
//!
//! This module provides the radix tree the forwarding store is built on:
//! insert with edge splitting, exact and longest-prefix search, single-key
//! and subtree deletion with structural compaction, and per-path value
//! collection for the reverse index.

mod node;
mod radix;

pub use node::NodeId;
pub use radix::{RadixTrie, TrieStats};
