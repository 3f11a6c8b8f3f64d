//! Byte-at-a-time reference scanner, used as a differential-testing oracle
//! for `bytepattern`'s vectorized scanner.

pub mod arbitrary;
mod reference;

pub use reference::{Pattern, Scanner};
