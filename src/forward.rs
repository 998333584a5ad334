//! Forwarding store facade
//!
//! [`PhoneForward`] ties the pieces together: a forward trie mapping a source
//! prefix to its forwarding record, and a [`ReverseIndex`] answering the
//! opposite question. Every mutation keeps the two structures consistent,
//! rolling back the half that already succeeded when the other half fails.

use crate::alphabet;
use crate::dedup::DedupTree;
use crate::error::{PhoneError, Result};
use crate::reverse::{EntryId, ReverseIndex};
use crate::strings;
use crate::trie::{RadixTrie, TrieStats};

/// Forward-side value: the target prefix plus the handle of the reverse
/// entry registered for this mapping, kept for O(1) unlinking.
#[derive(Debug)]
struct ForwardRecord {
    target: String,
    entry: EntryId,
}

/// Bidirectional phone-number forwarding store.
///
/// Numbers are non-empty strings over the twelve-symbol digit alphabet
/// (`'0'`-`'9'`, `'*'`, `'#'`). Each source prefix forwards to at most one
/// target; redirection applies the longest matching prefix.
///
/// # Examples
///
/// ```rust
/// use phone_forward::PhoneForward;
///
/// let mut pf = PhoneForward::new();
/// pf.add("123", "999").unwrap();
/// pf.add("12356", "111").unwrap();
///
/// assert_eq!(pf.get("123999999").unwrap(), "999999999");
/// assert_eq!(pf.reverse("111").unwrap(), vec!["12356"]);
///
/// pf.remove("12356");
/// assert!(pf.reverse("111").unwrap().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct PhoneForward {
    forward: RadixTrie<ForwardRecord>,
    reverse: ReverseIndex,
}

impl PhoneForward {
    /// Create an empty forwarding store.
    pub fn new() -> Self {
        Self {
            forward: RadixTrie::new(),
            reverse: ReverseIndex::new(),
        }
    }

    /// Number of forwarding rules currently stored.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Check if the store holds no rules.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Add or overwrite the rule forwarding the prefix `number` to `target`.
    ///
    /// A prefix may forward to exactly one target, so adding over an existing
    /// rule replaces it and retires its reverse entry. Both numbers must be
    /// valid and distinct. On [`PhoneError::OutOfMemory`] the store is left
    /// exactly as it was.
    pub fn add(&mut self, number: &str, target: &str) -> Result<()> {
        alphabet::check_number(number)?;
        alphabet::check_number(target)?;
        if number == target {
            return Err(PhoneError::invalid_number(number));
        }

        let target_owned = strings::clone_str(target)?;
        let entry = self.reverse.link(target, number)?;
        let record = ForwardRecord {
            target: target_owned,
            entry,
        };
        match self.forward.insert(number, record) {
            Ok((_, previous)) => {
                if let Some(previous) = previous {
                    self.reverse.unlink(previous.entry);
                }
                Ok(())
            }
            Err(err) => {
                self.reverse.unlink(entry);
                Err(err)
            }
        }
    }

    /// Redirect `number` through the longest stored prefix rule.
    ///
    /// The matched prefix is replaced by its target and the rest of the
    /// number is carried over unchanged. Without a matching rule the number
    /// comes back as its own redirection.
    pub fn get(&self, number: &str) -> Result<String> {
        alphabet::check_number(number)?;
        match self.forward.longest_prefix(number) {
            Some((record, matched)) => {
                let mut out = strings::clone_str(&record.target)?;
                strings::concat_in_place(&mut out, &number[matched..])?;
                Ok(out)
            }
            None => strings::clone_str(number),
        }
    }

    /// All source prefixes currently forwarding to a prefix of `number`,
    /// sorted in alphabet order without duplicates.
    pub fn reverse(&self, number: &str) -> Result<Vec<String>> {
        alphabet::check_number(number)?;
        let mut tree = DedupTree::new();
        self.reverse.collect_into(number, &mut tree)?;
        Ok(tree.into_sorted_vec())
    }

    /// Delete every rule whose source starts with `prefix`.
    ///
    /// Each deleted rule retires its reverse entry. An invalid prefix, or one
    /// matching no stored rule, is a no-op.
    pub fn remove(&mut self, prefix: &str) {
        if !alphabet::is_valid_number(prefix) {
            return;
        }
        let reverse = &mut self.reverse;
        self.forward.remove_subtree(prefix, |record, _key| {
            reverse.unlink(record.entry);
        });
    }

    /// Drop every rule, keeping the store usable.
    pub fn clear(&mut self) {
        self.forward.clear(|_, _| {});
        self.reverse.clear();
    }

    /// Structure statistics of the forward trie.
    pub fn stats(&self) -> TrieStats {
        self.forward.stats()
    }
}
