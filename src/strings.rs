//! Shared string utilities with fallible allocation
//!
//! The trie engine owns every edge label and key copy it stores, and a
//! mutating operation that cannot allocate must fail without corrupting the
//! structure. These helpers reserve through `try_reserve` and surface
//! failures as [`PhoneError::OutOfMemory`](crate::PhoneError::OutOfMemory),
//! so callers can clone and concatenate before linking anything in place.

use crate::error::{PhoneError, Result};

/// Clone a string, reporting allocation failure instead of aborting.
pub(crate) fn clone_str(s: &str) -> Result<String> {
    clone_suffix(s, 0)
}

/// Clone the suffix of `s` starting at byte index `from`.
pub(crate) fn clone_suffix(s: &str, from: usize) -> Result<String> {
    let suffix = &s[from..];
    let mut out = String::new();
    out.try_reserve(suffix.len())
        .map_err(|_| PhoneError::out_of_memory(suffix.len()))?;
    out.push_str(suffix);
    Ok(out)
}

/// Append `tail` to `dst` in place.
///
/// On failure `dst` is left untouched, so a caller merging edge labels can
/// abort compaction and keep the structure valid.
pub(crate) fn concat_in_place(dst: &mut String, tail: &str) -> Result<()> {
    dst.try_reserve(tail.len())
        .map_err(|_| PhoneError::out_of_memory(tail.len()))?;
    dst.push_str(tail);
    Ok(())
}

/// Length of the longest common prefix of `a` and `b`, in bytes.
pub(crate) fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count()
}
