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

use crate::hash::Hash128;
use crate::hash::Murmur3Hash128;

/// Bytes before the bit array: `num_bits` (u64) and `num_hashes` (u32).
pub(super) const HEADER_SIZE: usize = 8 + 4;

const FINGERPRINT_HASHER: Murmur3Hash128 = Murmur3Hash128::with_seed(0);

/// Computes a 128-bit content hash of a serialized filter.
///
/// The hash is taken over the bytes exactly as given, without decoding them, so it is cheap
/// enough to compare or deduplicate filters in transit. Byte-identical encodings always
/// produce the same fingerprint; two freshly built filters with the same bit count and hash
/// count serialize identically and so share a fingerprint.
///
/// # Examples
///
/// ```
/// # use bloomfilter::bloom::BloomFilter;
/// # use bloomfilter::bloom::fingerprint;
/// let a = BloomFilter::with_capacity(100).unwrap().serialize();
/// let b = BloomFilter::with_capacity(100).unwrap().serialize();
/// assert_eq!(fingerprint(&a), fingerprint(&b));
/// ```
pub fn fingerprint(bytes: &[u8]) -> u128 {
    FINGERPRINT_HASHER.hash128(bytes)
}
