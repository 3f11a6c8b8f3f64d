use std::num::ParseIntError;

/// A data byte `b` at position `j` satisfies the pattern iff
/// `(b & mask[j]) == match_bytes[j]`. Mirrors `bytepattern::Pattern`'s data
/// model with plain `Vec<u8>`s and no SIMD, for use as a differential
/// oracle.
pub struct Pattern {
    mask: Vec<u8>,
    match_bytes: Vec<u8>,
    alignment: usize,
}

pub struct Scanner<'pattern, 'data> {
    pattern: &'pattern Pattern,
    data: &'data [u8],
    offset: usize,
}

impl<'pattern, 'data> Scanner<'pattern, 'data> {
    pub fn new(pattern: &'pattern Pattern, data: &'data [u8]) -> Self {
        Self {
            pattern,
            data,
            offset: data.as_ptr().align_offset(pattern.alignment),
        }
    }
}

impl<'pattern, 'data> Iterator for Scanner<'pattern, 'data> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.data.len() >= self.offset + self.pattern.mask.len() {
            let ret = plain_match(self.pattern, &self.data[self.offset..]).then_some(self.offset);
            self.offset += self.pattern.alignment;
            if ret.is_some() {
                return ret;
            }
        }

        None
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PatternError {
    Empty,
    LeadingWildcard,
    TrailingWildcard,
    NonSubsetMatch,
    InvalidHexNumber(ParseIntError),
}

impl From<ParseIntError> for PatternError {
    fn from(value: ParseIntError) -> Self {
        Self::InvalidHexNumber(value)
    }
}

impl Pattern {
    pub fn from_ida_str(s: &str, alignment: usize) -> Result<Self, PatternError> {
        assert!((1..=64).contains(&alignment));

        /// allows . and ? as wildcard and only considers the first character
        fn is_wildcard(byte: &str) -> bool {
            let c = byte.chars().next().unwrap_or_default();
            c == '.' || c == '?'
        }

        let mut mask = Vec::new();
        let mut match_bytes = Vec::new();
        for token in s.split_ascii_whitespace() {
            if is_wildcard(token) {
                mask.push(0);
                match_bytes.push(0);
            } else {
                mask.push(0xFF);
                match_bytes.push(u8::from_str_radix(token, 16)?);
            }
        }

        Self::from_mask_match(&match_bytes, &mask, alignment)
    }

    pub fn from_mask_match(
        match_bytes: &[u8],
        mask: &[u8],
        alignment: usize,
    ) -> Result<Self, PatternError> {
        assert!((1..=64).contains(&alignment));
        if mask.is_empty() {
            return Err(PatternError::Empty);
        }
        if mask[0] == 0 {
            return Err(PatternError::LeadingWildcard);
        }
        if mask[mask.len() - 1] == 0 {
            return Err(PatternError::TrailingWildcard);
        }
        for (&m, &x) in mask.iter().zip(match_bytes) {
            if m & x != x {
                return Err(PatternError::NonSubsetMatch);
            }
        }

        Ok(Self {
            mask: mask.to_vec(),
            match_bytes: match_bytes.to_vec(),
            alignment,
        })
    }

    pub fn matches<'pattern, 'data>(&'pattern self, data: &'data [u8]) -> Scanner<'pattern, 'data> {
        Scanner::new(self, data)
    }
}

/// Match `pattern` against the start of `data` (without SIMD).
///
/// Assumes `data.len() >= pattern.mask.len()`.
fn plain_match(pattern: &Pattern, data: &[u8]) -> bool {
    pattern
        .mask
        .iter()
        .zip(pattern.match_bytes.iter())
        .zip(data[..pattern.mask.len()].iter())
        .all(|((&mask, &match_byte), &data_byte)| (data_byte & mask) == match_byte)
}
