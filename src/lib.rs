//! # Phone Forward: Prefix-Based Number Forwarding
//!
//! This crate implements a bidirectional phone-number forwarding store built on
//! a compressed trie, covering forward redirection, reverse lookup and prefix
//! deletion over a twelve-symbol digit alphabet.
//!
//! ## Key Features
//!
//! - **Compressed Trie**: Radix tree with edge splitting, longest-prefix
//!   matching and structural compaction after every deletion
//! - **Reverse Index**: Intrusive per-target lists with O(1) entry retirement
//!   through node back-references
//! - **Sorted Reverse Queries**: Red-black dedup tree producing results in
//!   alphabet order (`'*'` and `'#'` sort after the digits)
//! - **Failure Atomicity**: Every mutation reports allocation failure through
//!   [`PhoneError::OutOfMemory`] and leaves the store in its pre-call state
//! - **Arena Storage**: Nodes and entries live in index-addressed arenas with
//!   free-list reuse, so back-references never fight the borrow checker
//!
//! ## Quick Start
//!
//! ```rust
//! use phone_forward::PhoneForward;
//!
//! let mut pf = PhoneForward::new();
//! pf.add("123", "999").unwrap();
//! pf.add("12356", "111").unwrap();
//!
//! // Longest matching prefix wins: "12356" beats "123".
//! assert_eq!(pf.get("123567").unwrap(), "1117");
//! assert_eq!(pf.get("123999999").unwrap(), "999999999");
//!
//! // Who forwards to a prefix of "111"?
//! assert_eq!(pf.reverse("111").unwrap(), vec!["12356"]);
//!
//! // Deleting a prefix removes every rule underneath it.
//! pf.remove("123");
//! assert!(pf.is_empty());
//! ```

#![warn(missing_docs)]

pub mod alphabet;
pub mod dedup;
pub mod error;
pub mod forward;
pub mod reverse;
pub mod trie;

mod strings;

// Re-export core types
pub use dedup::DedupTree;
pub use error::{PhoneError, Result};
pub use forward::PhoneForward;
pub use reverse::{EntryId, ReverseIndex};
pub use trie::{NodeId, RadixTrie, TrieStats};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library with default settings
pub fn init() {
    log::debug!("phone-forward v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_init() {
        init();
    }
}
