//! Construction and lookup of null-terminated string pools.
//!
//! ELF string tables admit a classic encoding trick: a string that is a
//! suffix of another can share the longer string's tail bytes and its
//! terminating NUL. [`build`] produces such a suffix-compressed pool,
//! together with the offset of every input string; [`lookup`] is the
//! inverse, reading a NUL-terminated string at a byte offset.

use crate::{Result, truncated_error};
use alloc::vec::Vec;
use hashbrown::HashMap;

/// Builds a deduplicated, suffix-compressed string pool.
///
/// The pool always begins with a NUL byte, so offset 0 names the empty
/// string. Every returned offset satisfies `lookup(&bytes, map[s]) == s`.
pub fn build<I, S>(strings: I) -> (Vec<u8>, HashMap<Vec<u8>, u64>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let inputs: Vec<Vec<u8>> = strings.into_iter().map(|s| s.as_ref().to_vec()).collect();

    // Sorting the reversed strings brings every string next to the strings
    // it is a suffix of; an entry that is a prefix of its successor is then
    // redundant and dropped.
    let mut reversed: Vec<Vec<u8>> = inputs
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.iter().rev().copied().collect())
        .collect();
    reversed.sort_unstable();

    let mut pool = Vec::new();
    pool.push(0);
    let mut offsets: HashMap<Vec<u8>, u64> = HashMap::new();
    offsets.insert(Vec::new(), 0);

    for i in 0..reversed.len() {
        if let Some(next) = reversed.get(i + 1)
            && next.starts_with(&reversed[i])
        {
            continue;
        }
        let kept: Vec<u8> = reversed[i].iter().rev().copied().collect();
        let base = pool.len() as u64;
        pool.extend_from_slice(&kept);
        pool.push(0);
        // Record every non-empty suffix so suffix-equivalent inputs resolve
        // to their shared bytes.
        for cut in 0..kept.len() {
            offsets.insert(kept[cut..].to_vec(), base + cut as u64);
        }
    }

    let mut map = HashMap::new();
    for s in inputs {
        let offset = offsets[&s];
        map.insert(s, offset);
    }
    (pool, map)
}

/// Reads the NUL-terminated string starting at `offset`.
///
/// The returned slice excludes the terminator. Fails with `Truncated` when
/// `offset` is outside the pool or no terminator follows it.
pub fn lookup(bytes: &[u8], offset: u64) -> Result<&[u8]> {
    let start = usize::try_from(offset)
        .ok()
        .filter(|&start| start <= bytes.len())
        .ok_or_else(|| {
            truncated_error(alloc::format!(
                "string offset {offset} outside table of {} bytes",
                bytes.len()
            ))
        })?;
    let tail = &bytes[start..];
    let end = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| truncated_error(alloc::format!("unterminated string at offset {offset}")))?;
    Ok(&tail[..end])
}
