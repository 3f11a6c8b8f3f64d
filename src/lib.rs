#![no_std]
#![feature(portable_simd)]
//! A `no_std`, allocation-free SIMD byte-pattern scanner.
//!
//! A [`Pattern`] pairs a `mask` and a `match` byte array of equal length: a
//! data byte `b` at pattern position `j` satisfies the pattern iff
//! `(b & mask[j]) == match[j]`. `mask[j] == 0` marks position `j` a
//! wildcard. [`Pattern::new`]/[`Pattern::from_str`] parse the common
//! IDA/Ghidra-style textual notation (`"E8 ? ? ? ? 48 8B"`); construction is
//! also available directly from raw mask/match byte pairs
//! ([`Pattern::from_mask_match`]) or their hex-text form
//! ([`Pattern::from_mask_match_text`]).
//!
//! [`Pattern::matches`] returns a [`Scanner`], a plain `Iterator<Item =
//! usize>` yielding every match's starting offset in ascending order.
//! Scanning never allocates and never fails: an invalid pattern is rejected
//! at construction, not at scan time. [`Scanner`] accepts a buffer of any
//! base alignment; there is no separate unaligned entry point, since the
//! same hot loop handles both by computing an alignment fix-up once at
//! construction.
//!
//! ```
//! use bytepattern::Pattern;
//!
//! let pattern = Pattern::<1>::new("DE AD ? EF");
//! let data = [0x00, 0xDE, 0xAD, 0xBE, 0xEF, 0x00];
//! let matches: Vec<usize> = pattern.matches(&data).collect();
//! assert_eq!(matches, vec![1]);
//! ```

#[cfg(feature = "std")]
extern crate std;

mod api;
mod const_utils;
#[cfg(feature = "std")]
mod dispatch;
mod error;
mod masks;
mod pattern;
mod scanner;

#[cfg(test)]
mod tests;

pub use api::{
    scan_ida, scan_ida_small, scan_ida_unaligned, scan_mask_match, scan_mask_match_small,
    scan_mask_match_unaligned,
};
#[cfg(feature = "std")]
pub use dispatch::active_simd_tier;
pub use error::PatternError;
pub use pattern::Pattern;
pub use scanner::Scanner;

/// Lane width (in bytes) used by the default [`Pattern`]/[`Scanner`]
/// instantiation, and the maximum length a pattern may have.
pub const BYTES: usize = 64;

/// One bit per lane of a `BYTES`-wide chunk.
pub(crate) type BytesMask = u64;

/// Bitcasts between same-size SIMD vector/mask representations.
///
/// Used to reinterpret a `BYTES`-wide `i8` lane mask as a narrower-lane
/// vector (e.g. `i16`) so [`core::simd::cmp::SimdPartialEq`] can compare
/// whole `ALIGNMENT`-sized groups at once. Both sides must have identical
/// size and alignment.
macro_rules! transmute_yolo {
    ($val:expr) => {
        unsafe { core::mem::transmute($val) }
    };
}
pub(crate) use transmute_yolo;
