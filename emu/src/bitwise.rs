use std::ops::RangeInclusive;

/// Bit manipulation helpers used by the decoder and the status register.
/// Bit indexes go from lsb to msb (right to left).
pub trait Bits: Copy {
    const WIDTH: u8;

    fn get_bit(self, bit_idx: u8) -> bool;

    fn set_bit(&mut self, bit_idx: u8, value: bool);

    /// Extracts `bits_range` and moves it down to bit 0.
    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self;

    /// Overwrites `bits_range` with the low bits of `value`, leaving the rest untouched.
    fn set_bits(&mut self, bits_range: RangeInclusive<u8>, value: Self);

    /// Interprets the low `number_of_bits` as a two's complement number
    /// and extends its sign to the whole width.
    fn sign_extended(self, number_of_bits: u8) -> Self;
}

impl Bits for u32 {
    const WIDTH: u8 = 32;

    fn get_bit(self, bit_idx: u8) -> bool {
        debug_assert!(bit_idx < Self::WIDTH);
        (self >> bit_idx) & 1 == 1
    }

    fn set_bit(&mut self, bit_idx: u8, value: bool) {
        debug_assert!(bit_idx < Self::WIDTH);
        let mask: u32 = 1 << bit_idx;
        if value {
            *self |= mask;
        } else {
            *self &= !mask;
        }
    }

    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self {
        let (start, end) = (*bits_range.start(), *bits_range.end());
        debug_assert!(start <= end && end < Self::WIDTH);

        // `length` ones, e.g. 4..=7 gives 0b1111.
        let length = u32::from(end - start + 1);
        let mask = u32::MAX >> (u32::from(Self::WIDTH) - length);

        (self >> start) & mask
    }

    fn set_bits(&mut self, bits_range: RangeInclusive<u8>, value: Self) {
        let (start, end) = (*bits_range.start(), *bits_range.end());
        debug_assert!(start <= end && end < Self::WIDTH);

        let length = u32::from(end - start + 1);
        let mask = (u32::MAX >> (u32::from(Self::WIDTH) - length)) << start;

        *self = (*self & !mask) | ((value << start) & mask);
    }

    fn sign_extended(self, number_of_bits: u8) -> Self {
        debug_assert!(number_of_bits > 0 && number_of_bits <= Self::WIDTH);

        // Moving the sign bit up to the msb and back with an arithmetic
        // shift replicates it over the upper bits.
        let unused = Self::WIDTH - number_of_bits;
        (((self << unused) as i32) >> unused) as u32
    }
}
