use core::{fmt, num::IntErrorKind};

/// Failure returned when a [`Pattern`](crate::Pattern) cannot be constructed.
///
/// Construction errors are caught before any scan runs; a scan call itself
/// never fails (see the crate-level docs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PatternError {
    /// The pattern contained zero tokens/bytes.
    Empty,
    /// The pattern is longer than [`crate::BYTES`], the scanner's lane width.
    PatternTooLong,
    /// The `match` and `mask` inputs had different lengths.
    LengthMismatch,
    /// A token was not a valid one- or two-digit hex number or wildcard.
    InvalidHexNumber(IntErrorKind),
    /// Every byte of the pattern is a wildcard; there is nothing to pivot the
    /// scan on.
    MissingNonWildcardByte,
    /// The first byte of the pattern is a wildcard (`mask[0] == 0`).
    LeadingWildcard,
    /// The last byte of the pattern is a wildcard (`mask[N-1] == 0`).
    TrailingWildcard,
    /// `mask[j] & match[j] != match[j]` for some `j`: `match` has bits set
    /// outside of `mask`.
    NonSubsetMatch,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("pattern is empty"),
            Self::PatternTooLong => f.write_str("pattern is longer than the scanner's lane width"),
            Self::LengthMismatch => f.write_str("match and mask have different lengths"),
            Self::InvalidHexNumber(_) => f.write_str("pattern token is not a valid hex byte"),
            Self::MissingNonWildcardByte => f.write_str("pattern has no non-wildcard byte"),
            Self::LeadingWildcard => f.write_str("pattern's first byte is a wildcard"),
            Self::TrailingWildcard => f.write_str("pattern's last byte is a wildcard"),
            Self::NonSubsetMatch => f.write_str("match has bits set outside of mask"),
        }
    }
}

impl From<IntErrorKind> for PatternError {
    fn from(value: IntErrorKind) -> Self {
        Self::InvalidHexNumber(value)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PatternError {}
