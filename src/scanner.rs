use core::{
    cmp::min,
    iter::FusedIterator,
    simd::{cmp::SimdPartialEq, LaneCount, Mask, Simd, SupportedLaneCount},
};

use crate::{BytesMask, Pattern};

/// An [`Iterator`] that yields every match of a [`Pattern`] in `data`, in
/// ascending order. This is the vectorized scanner: it inspects the buffer
/// one `BYTES`-sized lane at a time, uses a first-byte SIMD equality
/// predicate as a cheap filter, and falls back to a full-pattern
/// verification whenever the filter signals a candidate.
///
/// The buffer's base address may have any alignment; [`Scanner::new`]
/// computes the offset to the first `BYTES`-aligned lane once at
/// construction, so unaligned and aligned input run the same hot loop.
#[must_use]
pub struct Scanner<'pattern, 'data, const ALIGNMENT: usize, const BYTES: usize = crate::BYTES>
where
    LaneCount<ALIGNMENT>: SupportedLaneCount,
    LaneCount<BYTES>: SupportedLaneCount,
{
    /// needle
    pattern: &'pattern Pattern<ALIGNMENT, BYTES>,
    /// one bit for each byte in `BYTES`
    /// little endian least significant bit corresponds to the first byte in
    /// the current slice of data
    candidates_mask: BytesMask,
    /// pointer to first valid byte of data
    data: &'data [u8],
    /// pointer to one byte past the end of data
    end: *const u8,
    /// iterator position
    position: *const u8,
    /// indicates that `self.position + BYTES > self.end`
    exhausted: bool,
}

impl<'pattern, 'data, const ALIGNMENT: usize, const BYTES: usize>
    Scanner<'pattern, 'data, ALIGNMENT, BYTES>
where
    LaneCount<ALIGNMENT>: SupportedLaneCount,
    LaneCount<BYTES>: SupportedLaneCount,
{
    const _ALIGNED: bool = Self::validate_alignment();

    const fn validate_alignment() -> bool {
        if ALIGNMENT > BYTES {
            panic!("Pattern ALIGNMENT must be less or equal to BYTES");
        }
        true
    }

    /// Creates an [`Iterator`], see also [`Pattern::matches`].
    ///
    /// # Panics
    /// Panics when `data.len() > usize::MAX - 3 * BYTES`.
    ///
    /// In the real world, it's near impossible to create a buffer near the
    /// size of [`usize::MAX`]. This reserved space is required to keep the
    /// hot loop efficient while still providing a correct algorithm.
    pub fn new(pattern: &'pattern Pattern<ALIGNMENT, BYTES>, data: &'data [u8]) -> Self {
        let _aligned = Self::_ALIGNED;

        if data.is_empty() {
            let end = data.as_ptr();
            return Self {
                pattern,
                data,
                end,
                position: end,
                candidates_mask: 0,
                exhausted: true,
            };
        }

        debug_assert!(((&data[data.len() - 1]) as *const u8 as usize) <= usize::MAX - 3 * BYTES);

        // data + align_offset is required to align to BYTES
        let mut align_offset = data.as_ptr().align_offset(align_of::<Simd<u8, BYTES>>());
        if align_offset == 0 {
            align_offset = BYTES;
        }
        let data_align = align_offset % ALIGNMENT;
        let first_possible = data_align + pattern.first_byte_offset as usize;
        if align_offset <= first_possible {
            align_offset += BYTES;
        }
        let candidates_mask = Self::initial_candidates(pattern, data, align_offset);

        // set position out of bounds.
        // next() will use it as base for candidates offsets,
        // then increment by BYTES to search for new candidates,
        // increasing position to be in bounds again.
        //
        // # Safety
        // it is assumed that data.as_ptr() - BYTES doesn't underflow
        let position = data.as_ptr().wrapping_add(align_offset).wrapping_sub(BYTES);

        let end = unsafe { data.as_ptr().add(data.len()) };

        Self {
            pattern,
            data,
            end,
            position,
            candidates_mask,
            exhausted: position.wrapping_add(2 * BYTES) >= end,
        }
    }

    #[inline]
    fn initial_candidates(
        pattern: &Pattern<ALIGNMENT, BYTES>,
        data: &[u8],
        align_offset: usize,
    ) -> BytesMask {
        // The general idea is to eliminate extra branches inside the hot
        // loop. For that, the potentially unaligned start of the dataset
        // needs to get prepared to behave exactly like the hot loop.
        // This is done by setting the data pointer out of bounds and using a
        // candidate mask that is shifted to have its end align with the
        // start of the first BYTES-aligned chunk.
        let data_align = align_offset % ALIGNMENT;

        // if the data is shorter than the pattern, there will never be a match
        if data.len().saturating_sub(data_align) < pattern.length as usize {
            return 0;
        }

        let first_possible = data_align + pattern.first_byte_offset as usize;
        let max_offset = min(align_offset, data.len());
        if first_possible >= max_offset {
            return 0;
        }

        // compute the first candidates
        let result = unsafe {
            Self::build_candidates::<true>(
                &data[first_possible],
                max_offset - first_possible,
                pattern,
            )
        };

        // shift result to align to end of currently aligned (out of bounds
        // starting) slice
        result << (BYTES + first_possible - align_offset)
    }

    fn end_candidates(&mut self) {
        // # Safety
        // self.end and self.position are both derived from self.data
        let remaining_length = unsafe { self.end.offset_from(self.position) };
        debug_assert!(remaining_length >= 0);
        let remaining_length = remaining_length as usize;

        self.candidates_mask = unsafe {
            Self::build_candidates::<true>(self.position, remaining_length, self.pattern)
        };
    }

    fn end_search(&mut self) -> Option<<Self as Iterator>::Item> {
        if let Some(position) = unsafe { self.consume_candidates::<true>() } {
            return Some(position);
        }
        if self.position.wrapping_add(BYTES) < self.end {
            self.position = self.position.wrapping_add(BYTES);
            self.end_candidates();
        }

        unsafe { self.consume_candidates::<true>() }
    }
}

impl<'pattern, 'data, const ALIGNMENT: usize, const BYTES: usize> Iterator
    for Scanner<'pattern, 'data, ALIGNMENT, BYTES>
where
    LaneCount<ALIGNMENT>: SupportedLaneCount,
    LaneCount<BYTES>: SupportedLaneCount,
{
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        // In case of removing this, make sure self.position is not
        // unconditionally increased to prevent violating FusedIterator
        // guarantees
        if self.exhausted {
            return self.end_search();
        }

        loop {
            if let Some(position) = unsafe { self.consume_candidates::<false>() } {
                return Some(position);
            }

            // candidates are 0, check next chunk
            //
            // # Safety
            // It's near impossible to get close to address usize::MAX in the
            // real world, allowing to assume that self.position doesn't
            // overflow. This is checked using a debug_assert during init.
            self.position = self.position.wrapping_add(BYTES);
            // check if the next 2 chunks are fully within bounds
            if self.position.wrapping_add(2 * BYTES) >= self.end {
                self.exhausted = true;
                self.candidates_mask =
                    unsafe { Self::build_candidates::<false>(self.position, BYTES, self.pattern) };

                return self.end_search();
            }

            // # Safety
            // self.position was initialized to be aligned to BYTES, is only
            // ever increased in steps of BYTES, and self.position + BYTES is
            // still within bounds of self.data
            self.candidates_mask =
                unsafe { Self::build_candidates::<false>(self.position, BYTES, self.pattern) };
        }
    }
}

impl<'pattern, 'data, const ALIGNMENT: usize, const BYTES: usize> FusedIterator
    for Scanner<'pattern, 'data, ALIGNMENT, BYTES>
where
    LaneCount<ALIGNMENT>: SupportedLaneCount,
    LaneCount<BYTES>: SupportedLaneCount,
{
}

impl<'pattern, 'data, const ALIGNMENT: usize, const BYTES: usize>
    Scanner<'pattern, 'data, ALIGNMENT, BYTES>
where
    LaneCount<ALIGNMENT>: SupportedLaneCount,
    LaneCount<BYTES>: SupportedLaneCount,
{
    /// if `UNALIGNED == false`, then the data pointer must be aligned to
    /// `BYTES` and `data + BYTES <= self.end`
    ///
    /// `data` must always be aligned to `ALIGNMENT`!
    #[inline]
    #[must_use]
    unsafe fn build_candidates<const UNALIGNED: bool>(
        data: *const u8,
        len: usize,
        pattern: &Pattern<ALIGNMENT, BYTES>,
    ) -> BytesMask {
        let len_mask = Self::data_len_mask(len);
        // UNALIGNED is the first parameter on purpose: build_candidates is
        // either called fully aligned or at the start or end of the data
        // slice. a full safe read is required when operating near edges
        let data = unsafe { Self::load::<UNALIGNED, false>(data, len_mask) };

        let mut result = (data & pattern.first_bytes_mask)
            .simd_eq(pattern.first_bytes)
            .to_bitmask();

        if UNALIGNED {
            let wildcard = pattern.first_bytes_mask.simd_eq(Simd::splat(0));
            let mask = Self::mask_min_len(len_mask, wildcard);
            result &= mask.to_bitmask();
        }

        Self::reduce_bitmask(Mask::from_bitmask(result)).to_bitmask()
    }

    /// This function guarantees:
    /// - only `self.candidates_mask` is modified
    /// - if `SAFE_READ == true`, then all bytes read are `>= self.position`
    ///   and `<= self.end`
    ///
    /// This function requires:
    /// - `self.position` to be within bounds
    // This function is part of the hot loop. There is probably a lot of
    // potential for optimization still in here.
    #[inline]
    unsafe fn consume_candidates<const SAFE_READ: bool>(
        &mut self,
    ) -> Option<<Self as Iterator>::Item> {
        loop {
            if self.candidates_mask == 0 {
                return None;
            }

            let offset = self.candidates_mask.trailing_zeros() as usize;
            self.candidates_mask ^= 1 << offset;

            let offset_ptr = self
                .position
                .wrapping_add(offset)
                .wrapping_sub(self.pattern.first_byte_offset as usize);
            // # Safety
            // self.position is derived from self.data
            let position = unsafe { offset_ptr.offset_from(self.data.as_ptr()) };
            // initial_candidates includes a bounds check at candidates
            // creation; subsequent candidate creations cannot underflow
            if position < 0 || position as usize > self.data.len() {
                continue;
            }
            let position = position as usize;

            let len = self.data.len() - position;
            if SAFE_READ && len < self.pattern.length as usize {
                continue;
            }
            let data_len_mask = Self::data_len_mask(len);
            let data = unsafe { Self::load::<SAFE_READ, true>(offset_ptr, data_len_mask) };

            let matched = (data & self.pattern.mask).simd_eq(self.pattern.match_bytes);
            let matched = if SAFE_READ {
                matched & data_len_mask
            } else {
                matched
            };

            if matched.all() {
                return Some(position);
            }
        }
    }

    /// `data_len_mask` must be generated using [`Self::data_len_mask`].
    ///
    /// if `UNALIGNED == false`, then the data pointer must be aligned to
    /// `BYTES`.
    #[inline]
    unsafe fn load<const SAFE_READ: bool, const UNALIGNED: bool>(
        data: *const u8,
        data_len_mask: Mask<i8, BYTES>,
    ) -> Simd<u8, BYTES> {
        if SAFE_READ {
            // # Safety
            // data_len_mask ensures that only valid bytes are read
            Simd::<u8, BYTES>::load_select_ptr(data, data_len_mask, Simd::splat(0))
        } else if UNALIGNED {
            unsafe { core::ptr::read_unaligned(data as *const _) }
        } else {
            unsafe { *(data as *const _) }
        }
    }
}
