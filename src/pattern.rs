use core::{
    marker::PhantomData,
    simd::{LaneCount, Simd, SupportedLaneCount},
    str::FromStr,
};

pub use crate::error::PatternError;
use crate::{const_utils, Scanner, BYTES as DEFAULT_BYTES};

/// A prepared pattern: an immutable pair of equal-length `mask`/`match` byte
/// arrays. A data byte `b` at pattern position `j` satisfies the pattern iff
/// `(b & mask[j]) == match[j]`; `mask[j] == 0` marks `j` a wildcard.
///
/// `BYTES` is the scanner's lane width and also the maximum pattern length;
/// every block of data is processed in chunks of `BYTES` bytes. `ALIGNMENT`
/// additionally restricts matches to start at a multiple of `ALIGNMENT` bytes
/// from the start of the scanned slice — most callers want the default `1`
/// (every offset is a candidate).
#[derive(Clone, Debug)]
pub struct Pattern<const ALIGNMENT: usize = 1, const BYTES: usize = DEFAULT_BYTES>
where
    LaneCount<ALIGNMENT>: SupportedLaneCount,
    LaneCount<BYTES>: SupportedLaneCount,
{
    pub(crate) match_bytes: Simd<u8, BYTES>,
    pub(crate) mask: Simd<u8, BYTES>,
    /// pivot chunk (the `ALIGNMENT`-sized window with the most non-wildcard
    /// bytes) tiled across the whole lane, used as a cheap first filter
    pub(crate) first_bytes: Simd<u8, BYTES>,
    pub(crate) first_bytes_mask: Simd<u8, BYTES>,
    pub(crate) first_byte_offset: u8,
    pub(crate) length: u8,
    phantom: PhantomData<[u8; ALIGNMENT]>,
}

impl<const ALIGNMENT: usize, const BYTES: usize> Pattern<ALIGNMENT, BYTES>
where
    LaneCount<ALIGNMENT>: SupportedLaneCount,
    LaneCount<BYTES>: SupportedLaneCount,
{
    /// Parses an IDA-style pattern (`"E8 ? ? ? ? 48 8B"`). `?`/`??` tokens are
    /// wildcards; everything else is a one- or two-digit hex byte.
    ///
    /// # Panics
    /// Panics if [`PatternError`] would be returned; use [`Self::from_str`]
    /// to get the error instead.
    #[must_use]
    #[inline]
    pub const fn new(pattern: &str) -> Self {
        match Self::from_str(pattern) {
            Ok(p) => p,
            Err(PatternError::Empty) => panic!("pattern is empty"),
            Err(PatternError::PatternTooLong) => panic!("PatternTooLong"),
            Err(PatternError::InvalidHexNumber(..)) => panic!("InvalidHexNumber"),
            Err(PatternError::MissingNonWildcardByte) => panic!("MissingNonWildcardByte"),
            Err(PatternError::LeadingWildcard) => panic!("pattern starts with a wildcard"),
            Err(PatternError::TrailingWildcard) => panic!("pattern ends with a wildcard"),
            Err(PatternError::LengthMismatch | PatternError::NonSubsetMatch) => {
                unreachable!("IDA patterns cannot produce this error")
            }
        }
    }

    /// Const parser behind [`Self::new`].
    pub const fn from_str(s: &str) -> Result<Self, PatternError> {
        let tokens = const_utils::SplitAsciiWhitespace::new(s);

        let length = tokens.clone().count();
        if length == 0 {
            return Err(PatternError::Empty);
        }
        if length > BYTES {
            return Err(PatternError::PatternTooLong);
        }

        let (buffer, mask) = {
            let mut buffer = [0_u8; BYTES];
            let mut mask = [0_u8; BYTES];
            let mut index = 0;
            let mut tokens = tokens;

            loop {
                let token;
                (tokens, token) = tokens.next();
                let token = match token {
                    Some(t) => t,
                    None => break,
                };

                if !const_utils::is_wildcard(token) {
                    let parsed = match const_utils::hex_to_u8(token) {
                        Ok(parsed) => parsed,
                        Err(e) => return Err(PatternError::InvalidHexNumber(e)),
                    };
                    buffer[index] = parsed;
                    mask[index] = 0xFF;
                }

                index += 1;
            }

            (buffer, mask)
        };

        if mask[0] == 0 {
            return Err(PatternError::LeadingWildcard);
        }
        if mask[length - 1] == 0 {
            return Err(PatternError::TrailingWildcard);
        }

        let first_byte_offset = match find_first_byte_offset::<ALIGNMENT>(&mask, length) {
            Ok(offset) => offset,
            Err(e) => return Err(e),
        };

        let (_, chunk) = buffer.split_at(first_byte_offset);
        let (_, mask_chunk) = mask.split_at(first_byte_offset);
        let (first_bytes, first_bytes_mask) =
            fill_first_bytes::<ALIGNMENT, BYTES>(chunk, mask_chunk);

        Ok(Self {
            match_bytes: Simd::from_array(buffer),
            mask: Simd::from_array(mask),
            first_bytes,
            first_bytes_mask,
            first_byte_offset: first_byte_offset as _,
            length: length as _,
            phantom: PhantomData,
        })
    }

    /// Builds a pattern from raw `match`/`mask` byte slices (the data model
    /// of §3/§4.1: `(b & mask[j]) == match[j]`). Unlike the IDA grammar, mask
    /// bytes may be any value, not just `0x00`/`0xFF`.
    ///
    /// # Errors
    /// Returns [`PatternError::Empty`] if both slices are empty,
    /// [`PatternError::LengthMismatch`] if their lengths differ,
    /// [`PatternError::PatternTooLong`] if longer than `BYTES`,
    /// [`PatternError::NonSubsetMatch`] if `mask[j] & match[j] != match[j]`
    /// for some `j`, and [`PatternError::LeadingWildcard`] /
    /// [`PatternError::TrailingWildcard`] if `mask[0] == 0` or
    /// `mask[N-1] == 0`.
    pub fn from_mask_match(match_bytes: &[u8], mask: &[u8]) -> Result<Self, PatternError> {
        if match_bytes.len() != mask.len() {
            return Err(PatternError::LengthMismatch);
        }
        let length = match_bytes.len();
        if length == 0 {
            return Err(PatternError::Empty);
        }
        if length > BYTES {
            return Err(PatternError::PatternTooLong);
        }
        for (&m, &x) in mask.iter().zip(match_bytes.iter()) {
            if m & x != x {
                return Err(PatternError::NonSubsetMatch);
            }
        }
        if mask[0] == 0 {
            return Err(PatternError::LeadingWildcard);
        }
        if mask[length - 1] == 0 {
            return Err(PatternError::TrailingWildcard);
        }

        let mut buffer = [0_u8; BYTES];
        let mut mask_buf = [0_u8; BYTES];
        buffer[..length].copy_from_slice(match_bytes);
        mask_buf[..length].copy_from_slice(mask);

        let first_byte_offset = find_first_byte_offset::<ALIGNMENT>(&mask_buf, length)?;
        let (_, chunk) = buffer.split_at(first_byte_offset);
        let (_, mask_chunk) = mask_buf.split_at(first_byte_offset);
        let (first_bytes, first_bytes_mask) =
            fill_first_bytes::<ALIGNMENT, BYTES>(chunk, mask_chunk);

        Ok(Self {
            match_bytes: Simd::from_array(buffer),
            mask: Simd::from_array(mask_buf),
            first_bytes,
            first_bytes_mask,
            first_byte_offset: first_byte_offset as _,
            length: length as _,
            phantom: PhantomData,
        })
    }

    /// Parses the mask/match text grammar of §6: two space-separated hex-byte
    /// sequences of equal token count, e.g. `match = "42 10 05"`,
    /// `mask = "FF FF 0F"`.
    pub fn from_mask_match_text(match_text: &str, mask_text: &str) -> Result<Self, PatternError> {
        let mut match_buf = [0_u8; BYTES];
        let mut mask_buf = [0_u8; BYTES];

        let mut match_tokens = match_text.split_ascii_whitespace();
        let mut mask_tokens = mask_text.split_ascii_whitespace();
        let mut length = 0;

        loop {
            let m = match_tokens.next();
            let k = mask_tokens.next();
            match (m, k) {
                (Some(_), None) | (None, Some(_)) => return Err(PatternError::LengthMismatch),
                (None, None) => break,
                (Some(m), Some(k)) => {
                    if length >= BYTES {
                        return Err(PatternError::PatternTooLong);
                    }
                    match_buf[length] = const_utils::hex_to_u8(m)?;
                    mask_buf[length] = const_utils::hex_to_u8(k)?;
                    length += 1;
                }
            }
        }

        Self::from_mask_match(&match_buf[..length], &mask_buf[..length])
    }

    /// The number of real (non-padding) pattern bytes, `N`.
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.length as usize
    }

    /// Always `false`: construction rejects empty patterns.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Creates an iterator over every match of this pattern in `data`. See
    /// [`Scanner::new`] for remarks.
    #[inline]
    pub fn matches<'pattern, 'data>(
        &'pattern self,
        data: &'data [u8],
    ) -> Scanner<'pattern, 'data, ALIGNMENT, BYTES> {
        Scanner::new(self, data)
    }

    /// Byte-at-a-time check: does the pattern match `data[0..self.len()]`?
    /// Returns `false` if `data` is shorter than the pattern. Used by the
    /// small-code-size scan entry points and as a differential oracle.
    pub(crate) fn matches_at(&self, data: &[u8]) -> bool {
        let n = self.length as usize;
        if data.len() < n {
            return false;
        }
        let match_bytes = self.match_bytes.to_array();
        let mask = self.mask.to_array();
        (0..n).all(|j| (data[j] & mask[j]) == match_bytes[j])
    }
}

const fn find_first_byte_offset<const ALIGNMENT: usize>(
    mut mask: &[u8],
    length: usize,
) -> Result<usize, PatternError> {
    let (used, _) = mask.split_at(length);
    mask = used;

    let mut i = 0;
    let mut smallest = 0;
    let mut highest_count = 0;
    loop {
        if mask.len() < ALIGNMENT {
            break;
        }
        let chunk;
        (chunk, mask) = mask.split_at(ALIGNMENT);

        let mut j = 0;
        let mut count = 0;
        while j < chunk.len() {
            count += (chunk[j] != 0) as usize;
            j += 1;
        }

        if count > highest_count {
            highest_count = count;
            smallest = i;
        }

        i += 1;
    }

    if highest_count == 0 {
        Err(PatternError::MissingNonWildcardByte)
    } else {
        Ok(smallest * ALIGNMENT)
    }
}

/// Tiles the `ALIGNMENT`-sized pivot chunk (`chunk`/`mask`, starting at
/// `first_byte_offset`) across every `ALIGNMENT`-sized group of the lane, so
/// a single SIMD compare tests every in-lane aligned start position at once.
const fn fill_first_bytes<const ALIGNMENT: usize, const BYTES: usize>(
    chunk: &[u8],
    mask: &[u8],
) -> (Simd<u8, BYTES>, Simd<u8, BYTES>)
where
    LaneCount<ALIGNMENT>: SupportedLaneCount,
    LaneCount<BYTES>: SupportedLaneCount,
{
    let mut first = [0u8; BYTES];
    let mut first_mask = [0u8; BYTES];

    let mut i = 0;
    while i < BYTES / ALIGNMENT {
        let mut j = 0;
        while j < ALIGNMENT {
            if j < chunk.len() {
                first[i * ALIGNMENT + j] = chunk[j];
                first_mask[i * ALIGNMENT + j] = mask[j];
            }
            j += 1;
        }
        i += 1;
    }

    (Simd::from_array(first), Simd::from_array(first_mask))
}

impl FromStr for Pattern {
    type Err = PatternError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert_eq!(Pattern::from_str("").err(), Some(PatternError::Empty));
    }

    #[test]
    fn rejects_leading_wildcard() {
        assert_eq!(
            Pattern::from_str("? 42").err(),
            Some(PatternError::LeadingWildcard)
        );
    }

    #[test]
    fn rejects_trailing_wildcard() {
        assert_eq!(
            Pattern::from_str("42 ?").err(),
            Some(PatternError::TrailingWildcard)
        );
    }

    #[test]
    fn rejects_all_wildcard() {
        assert_eq!(
            Pattern::from_str("? ? ?").err(),
            Some(PatternError::MissingNonWildcardByte)
        );
    }

    #[test]
    fn accepts_inner_wildcard() {
        assert!(Pattern::from_str("42 ? 43").is_ok());
    }

    #[test]
    fn mask_match_text_rejects_non_subset() {
        assert_eq!(
            Pattern::from_mask_match_text("FF", "0F").err(),
            Some(PatternError::NonSubsetMatch)
        );
    }

    #[test]
    fn mask_match_text_rejects_length_mismatch() {
        assert_eq!(
            Pattern::from_mask_match_text("FF FF", "0F").err(),
            Some(PatternError::LengthMismatch)
        );
    }

    #[test]
    fn mask_match_text_accepts_partial_mask() {
        let pattern = Pattern::from_mask_match_text("05 10", "0F FF").unwrap();
        assert_eq!(pattern.len(), 2);
    }
}
