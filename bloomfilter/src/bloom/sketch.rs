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

use crate::bloom::BitArray;
use crate::bloom::BitPositions;
use crate::bloom::BloomFilterBuilder;
use crate::bloom::FilterParameters;
use crate::bloom::serialization::HEADER_SIZE;
use crate::bloom::serialization::fingerprint;
use crate::codec::FilterBytes;
use crate::codec::FilterSlice;
use crate::error::Error;
use crate::hash::Hash128;
use crate::hash::Murmur3Hash128;

/// A Bloom filter for probabilistic set membership testing over byte strings.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - Tunable false positive rate
/// - Constant space usage
///
/// The filter does not enforce its capacity: inserting more items than it was sized for
/// raises the false positive rate toward 1 instead of failing.
///
/// Mutation takes `&mut self`, so a shared filter can be queried from many threads at once
/// but must be wrapped in a lock to be updated concurrently. Filters built per worker can be
/// combined afterwards with [`union`](Self::union).
#[derive(Debug, Clone)]
pub struct BloomFilter<H = Murmur3Hash128> {
    params: FilterParameters,
    bits: BitArray,
    hasher: H,
}

impl BloomFilter {
    /// Creates a filter sized for 10,000,000 items at a 1% false positive probability.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let filter = BloomFilter::new();
    /// assert_eq!(filter.estimated_byte_size(), 11_981_323);
    /// ```
    pub fn new() -> Self {
        Self::from_parameters(FilterParameters::default(), Murmur3Hash128::default())
    }

    /// Creates a filter sized for `expected_insertions` items at a 1% false positive
    /// probability.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `expected_insertions` is 0.
    pub fn with_capacity(expected_insertions: u64) -> Result<Self, Error> {
        BloomFilterBuilder::with_capacity(expected_insertions).build()
    }

    /// Creates a filter sized for `expected_insertions` items at the given false positive
    /// probability.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `expected_insertions` is 0 or `fpp` is not in `(0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let filter = BloomFilter::with_accuracy(100, 0.001).unwrap();
    /// assert_eq!(filter.estimated_byte_size(), 180);
    /// ```
    pub fn with_accuracy(expected_insertions: u64, fpp: f64) -> Result<Self, Error> {
        BloomFilterBuilder::with_accuracy(expected_insertions, fpp).build()
    }

    /// Returns a builder for creating a Bloom filter.
    pub fn builder() -> BloomFilterBuilder {
        BloomFilterBuilder::default()
    }

    /// Deserializes a filter hashed with the default [`Murmur3Hash128`].
    ///
    /// See [`deserialize_with_hasher`](Self::deserialize_with_hasher) for the accepted
    /// encoding and errors.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Self::deserialize_with_hasher(bytes, Murmur3Hash128::default())
    }
}

impl Default for BloomFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Hash128> BloomFilter<H> {
    pub(crate) fn from_parameters(params: FilterParameters, hasher: H) -> Self {
        BloomFilter {
            params,
            bits: BitArray::new(params.num_bits()),
            hasher,
        }
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Tests whether an element is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Element was **possibly** inserted (or false positive)
    /// - `false`: Element was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_capacity(100).unwrap();
    /// filter.insert(b"apple");
    ///
    /// assert!(filter.might_contain(b"apple")); // true - was inserted
    /// assert!(!filter.might_contain(b"grape")); // false - never inserted (probably)
    /// ```
    pub fn might_contain(&self, element: &[u8]) -> bool {
        if self.is_empty() {
            return false;
        }
        self.positions(element).all(|pos| self.bits.get(pos))
    }

    /// Tests and inserts an element in a single operation.
    ///
    /// Returns whether the element was possibly already in the set before insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_capacity(100).unwrap();
    ///
    /// assert!(!filter.contains_and_insert(b"apple")); // First insertion
    /// assert!(filter.contains_and_insert(b"apple")); // Now it's in the set
    /// ```
    pub fn contains_and_insert(&mut self, element: &[u8]) -> bool {
        let mut was_present = true;
        for pos in self.positions(element) {
            was_present &= !self.bits.set(pos);
        }
        was_present
    }

    /// Returns the `k` bit positions `element` maps to.
    ///
    /// The same bytes always map to the same positions in filters with equal bit count,
    /// hash count and hash function.
    pub fn positions(&self, element: &[u8]) -> BitPositions {
        let digest = self.hasher.hash128(element);
        BitPositions::new(digest, self.bits.num_bits(), self.params.num_hashes())
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Inserts an element into the filter.
    ///
    /// After insertion, `might_contain(element)` will always return `true`.
    pub fn insert(&mut self, element: &[u8]) {
        for pos in self.positions(element) {
            self.bits.set(pos);
        }
    }

    /// Resets the filter to its initial empty state.
    ///
    /// Clears all bits while preserving capacity and configuration.
    pub fn reset(&mut self) {
        self.bits.clear();
    }

    // ========================================================================
    // Set Operations
    // ========================================================================

    /// Merges another filter into this one via bitwise OR (union).
    ///
    /// After merging, this filter recognizes every element either filter recognized.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IncompatibleFilter`](crate::error::ErrorKind::IncompatibleFilter)
    /// if the filters differ in bit count or hash count. Neither filter is modified in that
    /// case.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut f1 = BloomFilter::with_capacity(100).unwrap();
    /// let mut f2 = BloomFilter::with_capacity(100).unwrap();
    ///
    /// f1.insert(b"robin");
    /// f2.insert(b"verlangen");
    ///
    /// f1.union(&f2).unwrap();
    /// assert!(f1.might_contain(b"robin"));
    /// assert!(f1.might_contain(b"verlangen"));
    ///
    /// let other = BloomFilter::with_capacity(1000).unwrap();
    /// assert!(f1.union(&other).is_err());
    /// ```
    pub fn union(&mut self, other: &BloomFilter<H>) -> Result<(), Error> {
        self.check_compatible(other)?;
        self.bits.or_merge(&other.bits)
    }

    /// Intersects this filter with another via bitwise AND.
    ///
    /// After intersection, this filter recognizes only elements present in both filters
    /// (plus false positives).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IncompatibleFilter`](crate::error::ErrorKind::IncompatibleFilter)
    /// if the filters differ in bit count or hash count.
    pub fn intersect(&mut self, other: &BloomFilter<H>) -> Result<(), Error> {
        self.check_compatible(other)?;
        self.bits.and_merge(&other.bits)
    }

    /// Checks if two filters can be merged.
    ///
    /// Filters are compatible if they have the same:
    /// - Number of bits (m)
    /// - Number of hash functions (k)
    ///
    /// Both filters must also hash with the same function and seed for a merge to be
    /// meaningful; the type parameter `H` covers the function, the seed is the caller's
    /// responsibility.
    pub fn is_compatible(&self, other: &BloomFilter<H>) -> bool {
        self.num_bits() == other.num_bits() && self.num_hashes() == other.num_hashes()
    }

    fn check_compatible(&self, other: &BloomFilter<H>) -> Result<(), Error> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(Error::incompatible_filter(
                (self.num_bits(), self.num_hashes()),
                (other.num_bits(), other.num_hashes()),
            ))
        }
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns whether the filter is empty (no bits set).
    pub fn is_empty(&self) -> bool {
        self.bits.num_bits_set() == 0
    }

    /// Returns the sizing this filter was built with.
    pub fn parameters(&self) -> &FilterParameters {
        &self.params
    }

    /// Returns the total number of bits in the filter (m).
    pub fn num_bits(&self) -> u64 {
        self.bits.num_bits()
    }

    /// Returns the number of hash functions used (k).
    pub fn num_hashes(&self) -> u32 {
        self.params.num_hashes()
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.bits.num_bits_set()
    }

    /// Returns the bytes occupied by the bit array, `ceil(m / 8)`.
    ///
    /// The serialization header is not included.
    pub fn estimated_byte_size(&self) -> u64 {
        self.bits.byte_size()
    }

    /// Returns the current load factor (fraction of bits set).
    ///
    /// Values above 0.5 indicate the filter holds more items than it was sized for.
    pub fn load_factor(&self) -> f64 {
        self.bits_used() as f64 / self.num_bits() as f64
    }

    /// Estimates the current false positive probability as `load_factor ^ k`.
    ///
    /// This is the probability that all k positions of a random element are already set,
    /// assuming positions are uniformly distributed.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powf(f64::from(self.num_hashes()))
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serializes the filter to a byte vector.
    ///
    /// Layout, integers little-endian:
    ///
    /// ```text
    /// [ m: u64 ][ k: u32 ][ bit array: ceil(m / 8) bytes ]
    /// ```
    ///
    /// Bit `i` is stored in byte `i / 8` at bit position `i % 8`. The result does not alias
    /// the filter.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let filter = BloomFilter::with_capacity(100).unwrap();
    /// let bytes = filter.serialize();
    /// assert_eq!(bytes.len(), 12 + 120);
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let capacity = HEADER_SIZE + self.bits.byte_size() as usize;
        let mut bytes = FilterBytes::with_capacity(capacity);

        bytes.write_u64_le(self.num_bits());
        bytes.write_u32_le(self.num_hashes());
        self.bits.write_le_bytes(|chunk| bytes.write(chunk));

        bytes.into_bytes()
    }

    /// Returns the [`fingerprint`] of this filter's serialized form.
    pub fn fingerprint(&self) -> u128 {
        fingerprint(&self.serialize())
    }

    /// Deserializes a filter, hashing future elements with `hasher`.
    ///
    /// The hasher is not part of the encoding; it must match the one the filter was built
    /// with for membership answers to be meaningful.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MalformedEncoding`](crate::error::ErrorKind::MalformedEncoding)
    /// if:
    /// - The header is truncated
    /// - The bit count is 0 or too large, or the hash count is 0
    /// - The length is not exactly `12 + ceil(m / 8)` bytes
    /// - Bits beyond m in the last byte are set
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_capacity(100).unwrap();
    /// filter.insert(b"test");
    ///
    /// let bytes = filter.serialize();
    /// let restored = BloomFilter::deserialize(&bytes).unwrap();
    /// assert!(restored.might_contain(b"test"));
    /// assert_eq!(filter, restored);
    /// ```
    pub fn deserialize_with_hasher(bytes: &[u8], hasher: H) -> Result<Self, Error> {
        let mut cursor = FilterSlice::new(bytes);

        let num_bits = cursor
            .read_u64_le()
            .map_err(|err| Error::insufficient_data("num_bits").set_source(err))?;
        let num_hashes = cursor
            .read_u32_le()
            .map_err(|err| Error::insufficient_data("num_hashes").set_source(err))?;

        let params = FilterParameters::from_size(num_bits, num_hashes).map_err(|err| {
            Error::malformed(format!("invalid filter header: {}", err.message()))
                .with_context("num_bits", num_bits)
                .with_context("num_hashes", num_hashes)
        })?;

        let expected = num_bits.div_ceil(8);
        let actual = cursor.remaining() as u64;
        if actual != expected {
            return Err(Error::malformed("bit array length does not match num_bits")
                .with_context("expected_bytes", expected)
                .with_context("actual_bytes", actual));
        }

        let mut packed = vec![0u8; actual as usize];
        cursor
            .read_exact(&mut packed)
            .map_err(|err| Error::insufficient_data("bit_array").set_source(err))?;
        let bits = BitArray::from_le_bytes(num_bits, &packed)
            .ok_or_else(|| Error::malformed("bits set beyond num_bits"))?;

        Ok(BloomFilter {
            params,
            bits,
            hasher,
        })
    }
}

/// Filters are equal when they have the same bit count, hash count, hash function and bits.
/// The capacity and accuracy they were requested with are not compared, since the encoding
/// does not carry them.
impl<H: PartialEq> PartialEq for BloomFilter<H> {
    fn eq(&self, other: &Self) -> bool {
        self.params.num_hashes() == other.params.num_hashes()
            && self.hasher == other.hasher
            && self.bits == other.bits
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// Uses the first 16 bytes of the element as the digest.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct IdentityHash;

    impl Hash128 for IdentityHash {
        fn hash128(&self, bytes: &[u8]) -> u128 {
            let mut buf = [0u8; 16];
            let len = bytes.len().min(16);
            buf[..len].copy_from_slice(&bytes[..len]);
            u128::from_le_bytes(buf)
        }
    }

    fn digest_bytes(h1: u64, h2: u64) -> [u8; 16] {
        ((u128::from(h2) << 64) | u128::from(h1)).to_le_bytes()
    }

    #[test]
    fn test_insert_sets_double_hash_positions() {
        let params = FilterParameters::from_size(100, 3).unwrap();
        let mut filter = BloomFilter::from_parameters(params, IdentityHash);

        filter.insert(&digest_bytes(10, 20));
        assert_eq!(filter.bits_used(), 3);
        for pos in [10, 30, 50] {
            assert!(filter.bits.get(pos));
        }

        // positions 30, 50, 70: only 70 is missing
        assert!(!filter.might_contain(&digest_bytes(30, 20)));
        filter.insert(&digest_bytes(70, 0));
        assert!(filter.might_contain(&digest_bytes(30, 20)));
    }

    #[test]
    fn test_positions_wrap_modulo_num_bits() {
        let params = FilterParameters::from_size(7, 4).unwrap();
        let filter = BloomFilter::from_parameters(params, IdentityHash);
        let positions: Vec<u64> = filter.positions(&digest_bytes(5, 3)).collect();
        assert_eq!(positions, vec![5, 1, 4, 0]);
    }

    #[test]
    fn test_insert_and_might_contain() {
        let mut filter = BloomFilter::with_capacity(100).unwrap();

        assert!(!filter.might_contain(b"apple"));
        filter.insert(b"apple");
        assert!(filter.might_contain(b"apple"));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_empty_element() {
        let mut filter = BloomFilter::with_capacity(100).unwrap();
        filter.insert(b"");
        assert!(filter.might_contain(b""));
    }

    #[test]
    fn test_contains_and_insert() {
        let mut filter = BloomFilter::with_capacity(100).unwrap();
        assert!(!filter.contains_and_insert(b"42"));
        assert!(filter.contains_and_insert(b"42"));
    }

    #[test]
    fn test_reset() {
        let mut filter = BloomFilter::with_capacity(100).unwrap();
        filter.insert(b"test");
        assert!(!filter.is_empty());

        filter.reset();
        assert!(filter.is_empty());
        assert!(!filter.might_contain(b"test"));
    }

    #[test]
    fn test_intersect() {
        let mut f1 = BloomFilter::with_capacity(100).unwrap();
        let mut f2 = BloomFilter::with_capacity(100).unwrap();

        f1.insert(b"a");
        f1.insert(b"b");
        f2.insert(b"b");
        f2.insert(b"c");

        f1.intersect(&f2).unwrap();
        assert!(f1.might_contain(b"b"));
    }

    #[test]
    fn test_incompatible_hash_count() {
        let mut f1 = BloomFilter::builder().with_size(1024, 5).build().unwrap();
        let f2 = BloomFilter::builder().with_size(1024, 6).build().unwrap();
        assert!(!f1.is_compatible(&f2));

        let err = f1.union(&f2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleFilter);
        let err = f1.intersect(&f2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleFilter);
    }

    #[test]
    fn test_statistics() {
        let mut filter = BloomFilter::builder().with_size(1000, 5).build().unwrap();
        assert_eq!(filter.bits_used(), 0);
        assert_eq!(filter.load_factor(), 0.0);
        assert_eq!(filter.estimated_fpp(), 0.0);

        filter.insert(b"test");
        assert!(filter.bits_used() > 0);
        assert!(filter.bits_used() <= 5);
        assert!(filter.load_factor() > 0.0);
        assert!(filter.estimated_fpp() > 0.0);
    }

    #[test]
    fn test_serialize_layout() {
        let params = FilterParameters::from_size(12, 2).unwrap();
        let mut filter = BloomFilter::from_parameters(params, IdentityHash);
        filter.insert(&digest_bytes(0, 9));

        let bytes = filter.serialize();
        assert_eq!(
            bytes,
            vec![12, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0b0000_0001, 0b0000_0010]
        );

        let restored = BloomFilter::deserialize_with_hasher(&bytes, IdentityHash).unwrap();
        assert_eq!(restored, filter);
        assert!(restored.might_contain(&digest_bytes(0, 9)));
    }

    #[test]
    fn test_serialize_is_independent_copy() {
        let mut filter = BloomFilter::with_capacity(100).unwrap();
        let before = filter.serialize();
        filter.insert(b"later");
        assert_ne!(before, filter.serialize());
        assert!(BloomFilter::deserialize(&before).unwrap().is_empty());
    }
}
