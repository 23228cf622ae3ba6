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

/// The `k` bit positions of one element, derived by double hashing (Kirsch-Mitzenmacher).
///
/// A 128-bit digest is split into `h1` (low 64 bits) and `h2` (high 64 bits), and position
/// `i` is `(h1 + i * h2) mod m` for `i` in `0..k`, using wrapping 64-bit arithmetic.
///
/// # Examples
///
/// ```
/// # use bloomfilter::bloom::BitPositions;
/// let digest = (5u128 << 64) | 3;
/// let positions: Vec<u64> = BitPositions::new(digest, 16, 4).collect();
/// assert_eq!(positions, vec![3, 8, 13, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct BitPositions {
    h1: u64,
    h2: u64,
    num_bits: u64,
    next: u32,
    num_hashes: u32,
}

impl BitPositions {
    /// Creates the position sequence for `digest` in a filter of `num_bits` bits using
    /// `num_hashes` hash functions.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is 0.
    pub fn new(digest: u128, num_bits: u64, num_hashes: u32) -> Self {
        assert!(num_bits > 0, "num_bits must be greater than 0");
        BitPositions {
            h1: digest as u64,
            h2: (digest >> 64) as u64,
            num_bits,
            next: 0,
            num_hashes,
        }
    }
}

impl Iterator for BitPositions {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next >= self.num_hashes {
            return None;
        }
        let i = u64::from(self.next);
        self.next += 1;
        Some(self.h1.wrapping_add(i.wrapping_mul(self.h2)) % self.num_bits)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = (self.num_hashes - self.next) as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for BitPositions {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_combination() {
        let positions: Vec<u64> = BitPositions::new((7u128 << 64) | 100, 1000, 5).collect();
        assert_eq!(positions, vec![100, 107, 114, 121, 128]);
    }

    #[test]
    fn test_wrapping_arithmetic() {
        let h1 = u64::MAX;
        let h2 = u64::MAX;
        let digest = (u128::from(h2) << 64) | u128::from(h1);
        let positions: Vec<u64> = BitPositions::new(digest, 1_000_003, 3).collect();
        assert_eq!(
            positions,
            vec![
                u64::MAX % 1_000_003,
                u64::MAX.wrapping_add(u64::MAX) % 1_000_003,
                u64::MAX.wrapping_add(u64::MAX.wrapping_mul(2)) % 1_000_003,
            ]
        );
    }

    #[test]
    fn test_exact_size() {
        let mut positions = BitPositions::new(42, 64, 3);
        assert_eq!(positions.len(), 3);
        positions.next();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions.count(), 2);
    }
}
