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

//! Bloom filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an element was inserted, `might_contain()` always returns `true`
//! - **Possible false positives**: `might_contain()` may return `true` for elements never
//!   inserted, with probability close to the configured rate while the filter holds no more
//!   than its expected insertions
//! - **Fixed size**: Bloom filters do not resize; overfilling raises the false positive rate
//! - **Insert only**: Elements cannot be removed
//!
//! # Usage
//!
//! ```rust
//! use bloomfilter::bloom::BloomFilter;
//!
//! // Create a filter optimized for 1000 elements with 1% false positive rate
//! let mut filter = BloomFilter::with_accuracy(1000, 0.01).unwrap();
//!
//! filter.insert(b"apple");
//! filter.insert(b"banana");
//!
//! assert!(filter.might_contain(b"apple")); // true - definitely inserted
//! assert!(!filter.might_contain(b"grape")); // false - never inserted (probably)
//!
//! println!("Capacity: {} bits", filter.num_bits());
//! println!("Bits used: {}", filter.bits_used());
//! println!("Est. FPP: {:.4}%", filter.estimated_fpp() * 100.0);
//! ```
//!
//! # Sizing
//!
//! The bit count `m` and hash count `k` are derived from the expected insertions `n` and the
//! false positive probability `p`:
//!
//! ```text
//! m = ceil(-n * ln(p) / ln(2)^2)
//! k = max(1, round(m / n * ln(2)))
//! ```
//!
//! [`BloomFilter::new()`] uses `n = 10,000,000` and `p = 0.01`, a bit array of 11,981,323
//! bytes. [`FilterParameters`] exposes the derivation on its own.
//!
//! # Set Operations
//!
//! Filters with the same `m` and `k` can be merged:
//!
//! ```rust
//! # use bloomfilter::bloom::BloomFilter;
//! let mut filter1 = BloomFilter::with_capacity(100).unwrap();
//! let mut filter2 = BloomFilter::with_capacity(100).unwrap();
//!
//! filter1.insert(b"a");
//! filter2.insert(b"b");
//!
//! // Union: recognizes elements from either filter
//! filter1.union(&filter2).unwrap();
//! assert!(filter1.might_contain(b"a"));
//! assert!(filter1.might_contain(b"b"));
//! ```
//!
//! # Serialization
//!
//! [`BloomFilter::serialize`] writes `[ m: u64 ][ k: u32 ][ ceil(m / 8) bytes of bits ]`,
//! integers little-endian. [`fingerprint`] hashes those bytes directly, giving a cheap
//! equality check for filters in transit.
//!
//! # Implementation Details
//!
//! - Uses MurmurHash3 x64/128 by default; see [`Hash128`](crate::hash::Hash128)
//! - Implements double hashing (Kirsch-Mitzenmacher method) for k hash functions
//! - Bits packed in `u64` words
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"
//! - Kirsch and Mitzenmacher (2008). "Less Hashing, Same Performance: Building a Better Bloom
//!   Filter"

mod bit_array;
mod builder;
mod params;
mod positions;
mod serialization;
mod sketch;

pub use self::bit_array::BitArray;
pub use self::builder::BloomFilterBuilder;
pub use self::params::DEFAULT_EXPECTED_INSERTIONS;
pub use self::params::DEFAULT_FALSE_POSITIVE_PROBABILITY;
pub use self::params::FilterParameters;
pub use self::params::MAX_NUM_BITS;
pub use self::params::MAX_NUM_HASHES;
pub use self::positions::BitPositions;
pub use self::serialization::fingerprint;
pub use self::sketch::BloomFilter;
