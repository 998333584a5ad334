//! Property-based tests for the trie engine and the forwarding store
//!
//! Random operation sequences are replayed against simple model structures
//! built from std collections; the trie and the facade must agree with the
//! model while also keeping their structural invariants.

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use phone_forward::alphabet;
use phone_forward::{DedupTree, PhoneForward, RadixTrie};

// =============================================================================
// GENERATORS
// =============================================================================

const SYMBOLS: [char; 12] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '*', '#'];

/// Generate a single valid number over the digit alphabet.
fn number() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(SYMBOLS.to_vec()), 1..10)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generate numbers biased toward shared prefixes, so edge splits and
/// compaction paths actually trigger.
fn clustered_numbers() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            // Independent numbers
            3 => number(),
            // Extensions of a handful of short stems
            7 => (prop::sample::select(vec!["1", "12", "123", "9", "*2"]), number())
                .prop_map(|(stem, tail)| format!("{stem}{tail}")),
        ],
        1..60,
    )
}

// =============================================================================
// TRIE VS MAP MODEL
// =============================================================================

/// Longest key in `model` that prefixes `query`, with its value.
fn model_longest_prefix<'a>(
    model: &'a BTreeMap<String, u32>,
    query: &str,
) -> Option<(&'a str, u32)> {
    model
        .iter()
        .filter(|(key, _)| query.starts_with(key.as_str()))
        .max_by_key(|(key, _)| key.len())
        .map(|(key, value)| (key.as_str(), *value))
}

proptest! {
    #[test]
    fn prop_trie_matches_map_model(keys in clustered_numbers()) {
        let mut trie = RadixTrie::new();
        let mut model = BTreeMap::new();

        for (i, key) in keys.iter().enumerate() {
            let value = i as u32;
            trie.insert(key, value).unwrap();
            model.insert(key.clone(), value);
        }

        prop_assert_eq!(trie.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(trie.get(key), Some(value));
        }
        // Probing around stored keys must not produce phantom values.
        for key in &keys {
            let longer = format!("{key}0");
            prop_assert_eq!(trie.get(&longer), model.get(&longer));
        }
    }

    #[test]
    fn prop_longest_prefix_matches_model(keys in clustered_numbers(), query in number()) {
        let mut trie = RadixTrie::new();
        let mut model = BTreeMap::new();
        for (i, key) in keys.iter().enumerate() {
            let value = i as u32;
            trie.insert(key, value).unwrap();
            model.insert(key.clone(), value);
        }

        let got = trie.longest_prefix(&query).map(|(v, len)| (*v, len));
        let expected = model_longest_prefix(&model, &query).map(|(k, v)| (v, k.len()));
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_removal_keeps_survivors_and_compaction(
        keys in clustered_numbers(),
        drop_mask in prop::collection::vec(any::<bool>(), 60),
    ) {
        let mut trie = RadixTrie::new();
        let mut model = BTreeMap::new();
        for (i, key) in keys.iter().enumerate() {
            let value = i as u32;
            trie.insert(key, value).unwrap();
            model.insert(key.clone(), value);
        }

        for (key, drop) in keys.iter().zip(drop_mask.iter()) {
            if *drop {
                trie.remove(key, |_, _| {});
                model.remove(key);
            }
        }

        prop_assert_eq!(trie.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(trie.get(key), Some(value));
        }
        // Compaction bound: a radix tree over n keys needs at most 2n + 1
        // nodes, root included.
        let stats = trie.stats();
        prop_assert_eq!(stats.keys, model.len());
        prop_assert!(stats.nodes <= 2 * model.len() + 1);
    }

    #[test]
    fn prop_remove_subtree_matches_model(keys in clustered_numbers(), prefix in number()) {
        let mut trie = RadixTrie::new();
        let mut model = BTreeMap::new();
        for (i, key) in keys.iter().enumerate() {
            let value = i as u32;
            trie.insert(key, value).unwrap();
            model.insert(key.clone(), value);
        }

        trie.remove_subtree(&prefix, |_, _| {});

        // The structural delete fires only when the prefix lands exactly on a
        // node; a prefix ending mid-label is a no-op. Either way the result
        // is all-or-nothing over the keys under the prefix.
        let covered: Vec<&String> = model
            .keys()
            .filter(|k| k.starts_with(prefix.as_str()))
            .collect();
        let fired = covered
            .first()
            .map(|key| trie.get(key).is_none())
            .unwrap_or(false);
        if model.contains_key(&prefix) {
            // An exact stored key always resolves to a node.
            prop_assert!(fired);
        }
        for (key, value) in &model {
            if fired && key.starts_with(prefix.as_str()) {
                prop_assert_eq!(trie.get(key), None);
            } else {
                prop_assert_eq!(trie.get(key), Some(value));
            }
        }
        let survivors = if fired {
            model.len() - covered.len()
        } else {
            model.len()
        };
        prop_assert_eq!(trie.len(), survivors);
    }
}

// =============================================================================
// DEDUP TREE VS SORTED SET
// =============================================================================

proptest! {
    #[test]
    fn prop_dedup_tree_sorts_and_dedups(numbers in prop::collection::vec(number(), 0..80)) {
        let mut tree = DedupTree::new();
        for n in &numbers {
            tree.insert(n.clone()).unwrap();
        }

        let mut expected: Vec<String> = numbers
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        expected.sort_by(|a, b| alphabet::cmp_numbers(a, b));

        prop_assert_eq!(tree.into_sorted_vec(), expected);
    }
}

// =============================================================================
// FORWARDING STORE VS RULE LIST
// =============================================================================

proptest! {
    #[test]
    fn prop_get_applies_longest_rule(
        rules in prop::collection::vec((number(), number()), 0..30),
        query in number(),
    ) {
        let mut pf = PhoneForward::new();
        let mut model = BTreeMap::new();
        for (source, target) in &rules {
            if source == target {
                continue;
            }
            pf.add(source, target).unwrap();
            model.insert(source.clone(), target.clone());
        }

        let expected = match model_ref_longest(&model, &query) {
            Some((source, target)) => format!("{target}{}", &query[source.len()..]),
            None => query.clone(),
        };
        prop_assert_eq!(pf.get(&query).unwrap(), expected);
    }

    #[test]
    fn prop_reverse_lists_every_matching_source(
        rules in prop::collection::vec((number(), number()), 0..30),
        query in number(),
    ) {
        let mut pf = PhoneForward::new();
        let mut model = BTreeMap::new();
        for (source, target) in &rules {
            if source == target {
                continue;
            }
            pf.add(source, target).unwrap();
            model.insert(source.clone(), target.clone());
        }

        let mut expected: Vec<String> = model
            .iter()
            .filter(|(_, target)| query.starts_with(target.as_str()))
            .map(|(source, _)| source.clone())
            .collect();
        expected.sort_by(|a, b| alphabet::cmp_numbers(a, b));
        expected.dedup();

        prop_assert_eq!(pf.reverse(&query).unwrap(), expected);
    }

    #[test]
    fn prop_remove_then_get_forgets_subtree(
        rules in prop::collection::vec((number(), number()), 0..30),
        prefix in number(),
    ) {
        let mut pf = PhoneForward::new();
        let mut model = BTreeMap::new();
        for (source, target) in &rules {
            if source == target {
                continue;
            }
            pf.add(source, target).unwrap();
            model.insert(source.clone(), target.clone());
        }

        pf.remove(&prefix);

        // Subtree removal is all-or-nothing: it fires when the prefix lands
        // exactly on a trie node, never when it ends mid-label. A node the
        // prefix resolves to always has at least one rule beneath it, so a
        // shrinking rule count is an exact signal that it fired.
        let fired = pf.len() < model.len();
        if model.contains_key(&prefix) {
            // An exact stored source always resolves to a node.
            prop_assert!(fired);
        }
        if fired {
            model.retain(|source, _| !source.starts_with(prefix.as_str()));
        }

        prop_assert_eq!(pf.len(), model.len());
        for (source, target) in &model {
            prop_assert_eq!(&pf.get(source).unwrap(), target);
        }
        // Every reverse entry of a removed rule must be gone with it.
        for (source, target) in &rules {
            if !model.contains_key(source) {
                prop_assert!(!pf.reverse(target).unwrap().contains(source));
            }
        }
    }
}

fn model_ref_longest<'a>(
    model: &'a BTreeMap<String, String>,
    query: &str,
) -> Option<(&'a str, &'a str)> {
    model
        .iter()
        .filter(|(source, _)| query.starts_with(source.as_str()))
        .max_by_key(|(source, _)| source.len())
        .map(|(source, target)| (source.as_str(), target.as_str()))
}
