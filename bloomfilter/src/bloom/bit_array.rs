// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::error::Error;

/// A fixed-length bit vector packed into `u64` words.
///
/// Bit `i` lives in word `i / 64` at bit offset `i % 64`. Bits at or beyond [`num_bits`]
/// in the last word are always zero.
///
/// [`num_bits`]: BitArray::num_bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitArray {
    num_bits: u64,
    /// Count of bits set to 1.
    num_bits_set: u64,
    words: Box<[u64]>,
}

impl BitArray {
    /// Creates an all-zero array of `num_bits` bits.
    pub fn new(num_bits: u64) -> Self {
        let num_words = num_bits.div_ceil(64) as usize;
        BitArray {
            num_bits,
            num_bits_set: 0,
            words: vec![0u64; num_words].into_boxed_slice(),
        }
    }

    /// Rebuilds an array from its little-endian byte packing (bit `i` at byte `i / 8`, bit
    /// `i % 8`). Returns `None` if `bytes` is not exactly `ceil(num_bits / 8)` long or sets
    /// any bit at or beyond `num_bits`.
    pub(crate) fn from_le_bytes(num_bits: u64, bytes: &[u8]) -> Option<Self> {
        if bytes.len() as u64 != num_bits.div_ceil(8) {
            return None;
        }

        let words: Box<[u64]> = bytes
            .chunks(8)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf[..chunk.len()].copy_from_slice(chunk);
                u64::from_le_bytes(buf)
            })
            .collect();

        let mut array = BitArray {
            num_bits,
            num_bits_set: 0,
            words,
        };
        if array.words.last().copied().unwrap_or(0) & !array.last_word_mask() != 0 {
            return None;
        }
        array.recount_bits_set();
        Some(array)
    }

    /// Writes the little-endian byte packing of the array, `ceil(num_bits / 8)` bytes.
    pub(crate) fn write_le_bytes(&self, mut write: impl FnMut(&[u8])) {
        let mut remaining = self.byte_size() as usize;
        for word in self.words.iter() {
            let bytes = word.to_le_bytes();
            let len = remaining.min(8);
            write(&bytes[..len]);
            remaining -= len;
        }
    }

    /// Returns the number of bits in the array.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of bits set to 1.
    pub fn num_bits_set(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the packed size of the array in bytes, `ceil(num_bits / 8)`.
    pub fn byte_size(&self) -> u64 {
        self.num_bits.div_ceil(8)
    }

    /// Returns the value of bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_bits`.
    pub fn get(&self, index: u64) -> bool {
        assert!(index < self.num_bits, "bit index {index} out of range");
        let mask = 1u64 << (index % 64);
        (self.words[(index / 64) as usize] & mask) != 0
    }

    /// Sets bit `index` to 1. Returns `true` if the bit was previously 0.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_bits`.
    pub fn set(&mut self, index: u64) -> bool {
        assert!(index < self.num_bits, "bit index {index} out of range");
        let word = &mut self.words[(index / 64) as usize];
        let mask = 1u64 << (index % 64);
        if *word & mask != 0 {
            return false;
        }
        *word |= mask;
        self.num_bits_set += 1;
        true
    }

    /// Sets every bit that is set in `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IncompatibleArray`](crate::error::ErrorKind::IncompatibleArray)
    /// without modifying `self` if the lengths differ.
    pub fn or_merge(&mut self, other: &BitArray) -> Result<(), Error> {
        self.merge_words(other, |a, b| a | b)
    }

    /// Clears every bit that is not set in `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IncompatibleArray`](crate::error::ErrorKind::IncompatibleArray)
    /// without modifying `self` if the lengths differ.
    pub fn and_merge(&mut self, other: &BitArray) -> Result<(), Error> {
        self.merge_words(other, |a, b| a & b)
    }

    /// Clears all bits.
    pub fn clear(&mut self) {
        self.words.fill(0);
        self.num_bits_set = 0;
    }

    fn merge_words(&mut self, other: &BitArray, op: impl Fn(u64, u64) -> u64) -> Result<(), Error> {
        if self.num_bits != other.num_bits {
            return Err(Error::incompatible_array(self.num_bits, other.num_bits));
        }
        for (word, other_word) in self.words.iter_mut().zip(other.words.iter()) {
            *word = op(*word, *other_word);
        }
        self.recount_bits_set();
        Ok(())
    }

    fn recount_bits_set(&mut self) {
        self.num_bits_set = self.words.iter().map(|w| u64::from(w.count_ones())).sum();
    }

    /// Mask of the valid bits in the last word.
    fn last_word_mask(&self) -> u64 {
        match self.num_bits % 64 {
            0 => u64::MAX,
            rem => (1u64 << rem) - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_set_and_get() {
        let mut bits = BitArray::new(130);
        assert_eq!(bits.num_bits_set(), 0);
        assert!(!bits.get(129));

        assert!(bits.set(0));
        assert!(bits.set(64));
        assert!(bits.set(129));
        assert!(!bits.set(129));

        assert!(bits.get(0));
        assert!(bits.get(64));
        assert!(bits.get(129));
        assert!(!bits.get(1));
        assert_eq!(bits.num_bits_set(), 3);
        assert_eq!(bits.byte_size(), 17);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_out_of_range() {
        BitArray::new(10).get(10);
    }

    #[test]
    fn test_or_merge() {
        let mut a = BitArray::new(100);
        let mut b = BitArray::new(100);
        a.set(3);
        b.set(3);
        b.set(99);

        a.or_merge(&b).unwrap();
        assert!(a.get(3));
        assert!(a.get(99));
        assert_eq!(a.num_bits_set(), 2);
    }

    #[test]
    fn test_and_merge() {
        let mut a = BitArray::new(100);
        let mut b = BitArray::new(100);
        a.set(3);
        a.set(50);
        b.set(50);

        a.and_merge(&b).unwrap();
        assert!(!a.get(3));
        assert!(a.get(50));
        assert_eq!(a.num_bits_set(), 1);
    }

    #[test]
    fn test_merge_length_mismatch_leaves_array_untouched() {
        let mut a = BitArray::new(100);
        a.set(7);
        let before = a.clone();
        let mut b = BitArray::new(101);
        b.set(100);

        let err = a.or_merge(&b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleArray);
        assert_eq!(a, before);

        let err = a.and_merge(&b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleArray);
        assert_eq!(a, before);
    }

    #[test]
    fn test_byte_packing() {
        let mut bits = BitArray::new(12);
        bits.set(0);
        bits.set(9);
        bits.set(11);

        let mut bytes = vec![];
        bits.write_le_bytes(|b| bytes.extend_from_slice(b));
        assert_eq!(bytes, vec![0b0000_0001, 0b0000_1010]);

        let restored = BitArray::from_le_bytes(12, &bytes).unwrap();
        assert_eq!(restored, bits);
    }

    #[test]
    fn test_byte_packing_rejects_bad_input() {
        // wrong length
        assert!(BitArray::from_le_bytes(12, &[0]).is_none());
        assert!(BitArray::from_le_bytes(12, &[0, 0, 0]).is_none());
        // bit 12 is padding
        assert!(BitArray::from_le_bytes(12, &[0, 0b0001_0000]).is_none());
    }

    #[test]
    fn test_clear() {
        let mut bits = BitArray::new(70);
        bits.set(69);
        bits.clear();
        assert_eq!(bits.num_bits_set(), 0);
        assert!(!bits.get(69));
    }
}
