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

//! 128-bit hashing of raw element bytes.
//!
//! The filter never hashes structured values itself: callers hand in the exact bytes to test,
//! and a [`Hash128`] implementation turns them into a single 128-bit digest.

mod murmurhash;

pub use self::murmurhash::murmurhash3_x64_128;

/// Seed used by [`Murmur3Hash128::default`].
///
/// Filters only agree on bit positions when they hash with the same function and seed, so
/// changing this value breaks merging with and fingerprint comparison against every filter
/// already serialized.
pub const DEFAULT_SEED: u64 = 0;

/// A deterministic function from a byte sequence to a 128-bit digest.
///
/// The filter splits the digest into its low and high 64-bit halves and derives every bit
/// position from those two values. Implementations must be pure: the same bytes always
/// produce the same digest.
pub trait Hash128 {
    /// Hashes `bytes` into a 128-bit digest.
    fn hash128(&self, bytes: &[u8]) -> u128;
}

/// MurmurHash3 x64/128.
///
/// The digest packs the two 64-bit output words as `(h2 << 64) | h1`, so the low half of the
/// digest is the first word of the reference algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Murmur3Hash128 {
    seed: u64,
}

impl Murmur3Hash128 {
    /// Creates a hasher with the given seed.
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// Returns the seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for Murmur3Hash128 {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl Hash128 for Murmur3Hash128 {
    fn hash128(&self, bytes: &[u8]) -> u128 {
        let (h1, h2) = murmurhash3_x64_128(bytes, self.seed);
        (u128::from(h2) << 64) | u128::from(h1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_layout() {
        let bytes = b"The quick brown fox jumps over the lazy dog";
        let (h1, h2) = murmurhash3_x64_128(bytes, 0);
        let digest = Murmur3Hash128::default().hash128(bytes);
        assert_eq!(digest as u64, h1);
        assert_eq!((digest >> 64) as u64, h2);
    }

    #[test]
    fn test_seed_changes_digest() {
        let default = Murmur3Hash128::default();
        let seeded = Murmur3Hash128::with_seed(9001);
        assert_eq!(default.seed(), DEFAULT_SEED);
        assert_eq!(seeded.seed(), 9001);

        let a = default.hash128(b"robin");
        let b = seeded.hash128(b"robin");
        assert_ne!(a, b);
        assert_eq!(b, Murmur3Hash128::with_seed(seeded.seed()).hash128(b"robin"));
    }
}
