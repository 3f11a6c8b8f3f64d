//! Free-function entry points over the default `Pattern<1>` instantiation.
//!
//! These wrap [`crate::Pattern`] construction and [`crate::Scanner`]
//! iteration into single calls for callers who parse a pattern once per
//! scan rather than keeping a [`crate::Pattern`] around.

use core::cmp::min;
use core::simd::{LaneCount, SupportedLaneCount};

use crate::{error::PatternError, pattern::Pattern, BYTES};

/// Scans `bytes` for the IDA-style pattern `pattern_text`.
///
/// `bytes`/`pattern_text` may have any alignment; see the crate-level docs
/// for why aligned and unaligned input share one code path here.
///
/// # Errors
/// Returns [`PatternError`] if `pattern_text` fails to parse.
pub fn scan_ida(bytes: &[u8], pattern_text: &str) -> Result<Option<usize>, PatternError> {
    let pattern = Pattern::<1>::from_str(pattern_text)?;
    Ok(pattern.matches(bytes).next())
}

/// Identical to [`scan_ida`]. Kept as a distinct entry point to mirror the
/// aligned/unaligned split of the underlying algorithm; [`crate::Scanner`]
/// already handles both cases transparently.
pub fn scan_ida_unaligned(bytes: &[u8], pattern_text: &str) -> Result<Option<usize>, PatternError> {
    scan_ida(bytes, pattern_text)
}

/// Scans `bytes` for a pattern given as two space-separated hex-byte
/// sequences (`match_text`, `mask_text`) of equal token count.
///
/// # Errors
/// Returns [`PatternError`] if the texts fail to parse or don't satisfy
/// `mask & match == match`.
pub fn scan_mask_match(
    bytes: &[u8],
    match_text: &str,
    mask_text: &str,
) -> Result<Option<usize>, PatternError> {
    let pattern = Pattern::<1>::from_mask_match_text(match_text, mask_text)?;
    Ok(pattern.matches(bytes).next())
}

/// Identical to [`scan_mask_match`]; see [`scan_ida_unaligned`].
pub fn scan_mask_match_unaligned(
    bytes: &[u8],
    match_text: &str,
    mask_text: &str,
) -> Result<Option<usize>, PatternError> {
    scan_mask_match(bytes, match_text, mask_text)
}

/// Smaller-code-size variant of [`scan_ida`]: scans the leading
/// `min(L, N + BYTES - 1)` bytes with the byte-at-a-time reference
/// algorithm, then hands the rest to the vectorized scanner, resuming it
/// `N - 1` bytes before the end of the scalar prefix so the two passes
/// cover every offset with no gap between them. Trades throughput for a
/// smaller call site at the cost of never fully avoiding the vector code
/// (the suffix still needs it).
///
/// # Errors
/// Returns [`PatternError`] if `pattern_text` fails to parse.
pub fn scan_ida_small(bytes: &[u8], pattern_text: &str) -> Result<Option<usize>, PatternError> {
    let pattern = Pattern::<1>::from_str(pattern_text)?;
    Ok(scan_small(&pattern, bytes))
}

/// Smaller-code-size variant of [`scan_mask_match`]. See [`scan_ida_small`].
///
/// # Errors
/// Returns [`PatternError`] if the texts fail to parse or don't satisfy
/// `mask & match == match`.
pub fn scan_mask_match_small(
    bytes: &[u8],
    match_text: &str,
    mask_text: &str,
) -> Result<Option<usize>, PatternError> {
    let pattern = Pattern::<1>::from_mask_match_text(match_text, mask_text)?;
    Ok(scan_small(&pattern, bytes))
}

fn scan_small<const ALIGNMENT: usize, const BYTES: usize>(
    pattern: &Pattern<ALIGNMENT, BYTES>,
    data: &[u8],
) -> Option<usize>
where
    LaneCount<ALIGNMENT>: SupportedLaneCount,
    LaneCount<BYTES>: SupportedLaneCount,
{
    let n = pattern.len();
    let prefix_len = min(data.len(), n + BYTES - 1);
    if let Some(i) = scalar_scan(pattern, &data[..prefix_len]) {
        return Some(i);
    }
    if prefix_len >= data.len() {
        return None;
    }
    // scalar_scan only proves offsets in [0, prefix_len - n] clear; resume
    // the vectorized pass there instead of at `prefix_len`, or offsets in
    // [prefix_len - n + 1, prefix_len - 1] would never be tested by either
    // pass.
    let resume = prefix_len - n + 1;
    pattern
        .matches(&data[resume..])
        .next()
        .map(|i| i + resume)
}

/// Byte-at-a-time reference scan, used as the small-code prefix scanner and
/// as a differential oracle in tests.
pub(crate) fn scalar_scan<const ALIGNMENT: usize, const BYTES: usize>(
    pattern: &Pattern<ALIGNMENT, BYTES>,
    data: &[u8],
) -> Option<usize>
where
    LaneCount<ALIGNMENT>: SupportedLaneCount,
    LaneCount<BYTES>: SupportedLaneCount,
{
    let n = pattern.len();
    if data.len() < n {
        return None;
    }
    (0..=data.len() - n).find(|&i| pattern.matches_at(&data[i..]))
}
