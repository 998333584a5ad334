//! Digit alphabet codec
//!
//! Phone numbers are strings over a fixed 12-symbol alphabet: the ten decimal
//! digits plus `'*'` and `'#'`. Each symbol maps to a dense index in
//! `[0, ALPHABET_SIZE)` used for trie child-slot selection, and the same
//! index order defines the lexicographic order of numbers (`'*'` and `'#'`
//! sort after `'9'`, in that order).

use crate::error::{PhoneError, Result};
use std::cmp::Ordering;

/// Number of symbols in the digit alphabet
pub const ALPHABET_SIZE: usize = 12;

/// Symbol encoded as index 10
const STAR: u8 = b'*';
/// Symbol encoded as index 11
const HASH: u8 = b'#';

/// Map a symbol byte to its dense alphabet index.
///
/// Returns `None` for bytes outside the alphabet.
#[inline]
pub fn symbol_index(byte: u8) -> Option<usize> {
    match byte {
        b'0'..=b'9' => Some((byte - b'0') as usize),
        STAR => Some(10),
        HASH => Some(11),
        _ => None,
    }
}

/// Dense slot index of a symbol from an already-validated number.
///
/// Edge labels stored in the trie are suffixes of checked numbers, so every
/// byte they contain is an alphabet symbol.
#[inline]
pub(crate) fn slot(byte: u8) -> usize {
    match symbol_index(byte) {
        Some(index) => index,
        None => unreachable!("symbol outside the digit alphabet"),
    }
}

/// Sort rank of a byte under the alphabet order.
///
/// Bytes outside the alphabet rank after every alphabet symbol; they never
/// appear in validated numbers, the fallback only keeps the order total.
#[inline]
fn symbol_rank(byte: u8) -> u16 {
    match symbol_index(byte) {
        Some(index) => index as u16,
        None => ALPHABET_SIZE as u16 + byte as u16,
    }
}

/// Check whether `number` is a non-empty string over the alphabet.
#[inline]
pub fn is_valid_number(number: &str) -> bool {
    !number.is_empty() && number.bytes().all(|b| symbol_index(b).is_some())
}

/// Validate `number`, returning [`PhoneError::InvalidNumber`] on failure.
pub fn check_number(number: &str) -> Result<()> {
    if is_valid_number(number) {
        Ok(())
    } else {
        Err(PhoneError::invalid_number(number))
    }
}

/// Compare two numbers under the alphabet order.
///
/// Symbols are compared by their dense index, not their byte value, so
/// `"1*" < "1#"` even though `'*' > '#'` as bytes. A strict prefix sorts
/// before its extensions.
pub fn cmp_numbers(a: &str, b: &str) -> Ordering {
    for (x, y) in a.bytes().zip(b.bytes()) {
        match symbol_rank(x).cmp(&symbol_rank(y)) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_indices() {
        assert_eq!(symbol_index(b'0'), Some(0));
        assert_eq!(symbol_index(b'9'), Some(9));
        assert_eq!(symbol_index(b'*'), Some(10));
        assert_eq!(symbol_index(b'#'), Some(11));
        assert_eq!(symbol_index(b'a'), None);
        assert_eq!(symbol_index(b' '), None);
    }

    #[test]
    fn test_validation() {
        assert!(is_valid_number("0123456789*#"));
        assert!(is_valid_number("5"));
        assert!(!is_valid_number(""));
        assert!(!is_valid_number("12 3"));
        assert!(!is_valid_number("12a"));

        assert!(check_number("123").is_ok());
        assert!(matches!(
            check_number("12a"),
            Err(PhoneError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_alphabet_order() {
        assert_eq!(cmp_numbers("12", "5"), Ordering::Less);
        assert_eq!(cmp_numbers("5", "7"), Ordering::Less);
        assert_eq!(cmp_numbers("12", "12"), Ordering::Equal);
        // Prefix sorts before its extension.
        assert_eq!(cmp_numbers("12", "123"), Ordering::Less);
        // '*' and '#' sort after the digits, '*' first.
        assert_eq!(cmp_numbers("9", "*"), Ordering::Less);
        assert_eq!(cmp_numbers("*", "#"), Ordering::Less);
        assert_eq!(cmp_numbers("1#", "1*"), Ordering::Greater);
    }
}
