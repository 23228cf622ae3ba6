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

use std::f64::consts::LN_2;

use crate::error::Error;

/// Expected insertions used when no capacity is given.
pub const DEFAULT_EXPECTED_INSERTIONS: u64 = 10_000_000;
/// False positive probability used when none is given.
pub const DEFAULT_FALSE_POSITIVE_PROBABILITY: f64 = 0.01;

const MIN_NUM_BITS: u64 = 1;
/// 8 GiB of bit array.
pub const MAX_NUM_BITS: u64 = 1 << 36;
const MIN_NUM_HASHES: u32 = 1;
/// Largest hash count accepted; every insert and query walks this many positions.
pub const MAX_NUM_HASHES: u32 = i16::MAX as u32;

/// Sizing of a Bloom filter: the bit count `m` and hash count `k`, together with the
/// capacity and accuracy they were derived from.
///
/// `m` and `k` are pure functions of the expected insertions `n` and the false positive
/// probability `p`:
///
/// - `m = ceil(-n * ln(p) / ln(2)^2)`
/// - `k = max(1, round(m / n * ln(2)))`
///
/// # Examples
///
/// ```
/// # use bloomfilter::bloom::FilterParameters;
/// let params = FilterParameters::new(100, 0.001).unwrap();
/// assert_eq!(params.num_bits(), 1438);
/// assert_eq!(params.num_hashes(), 10);
/// assert_eq!(params.estimated_byte_size(), 180);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    expected_insertions: u64,
    false_positive_probability: f64,
    num_bits: u64,
    num_hashes: u32,
}

impl FilterParameters {
    /// Derives the optimal bit count and hash count for `expected_insertions` items at the
    /// target `false_positive_probability`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `expected_insertions` is 0, `false_positive_probability` is not in `(0, 1)`, or the
    /// derived bit count exceeds [`MAX_NUM_BITS`].
    pub fn new(expected_insertions: u64, false_positive_probability: f64) -> Result<Self, Error> {
        if expected_insertions == 0 {
            return Err(Error::invalid_parameter(
                "expected insertions must be greater than 0",
            ));
        }
        // NaN fails both comparisons.
        if !(false_positive_probability > 0.0 && false_positive_probability < 1.0) {
            return Err(Error::invalid_parameter(
                "false positive probability must be in (0.0, 1.0)",
            )
            .with_context("false_positive_probability", false_positive_probability));
        }

        let bits = optimal_num_bits(expected_insertions, false_positive_probability);
        if bits > MAX_NUM_BITS as f64 {
            return Err(Error::invalid_parameter(format!(
                "filter would need more than {MAX_NUM_BITS} bits"
            ))
            .with_context("expected_insertions", expected_insertions)
            .with_context("false_positive_probability", false_positive_probability));
        }

        let num_bits = (bits as u64).max(MIN_NUM_BITS);
        let num_hashes = optimal_num_hashes(expected_insertions, num_bits);
        Ok(FilterParameters {
            expected_insertions,
            false_positive_probability,
            num_bits,
            num_hashes,
        })
    }

    /// Uses an explicit bit count and hash count.
    ///
    /// The capacity and false positive probability are reported as the values these sizes
    /// are optimal for: `n = round(m * ln(2) / k)` and the expected false positive rate at
    /// that `n`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `num_bits` is outside `[1, MAX_NUM_BITS]` or `num_hashes` is outside
    /// `[1, MAX_NUM_HASHES]`.
    pub fn from_size(num_bits: u64, num_hashes: u32) -> Result<Self, Error> {
        if !(MIN_NUM_BITS..=MAX_NUM_BITS).contains(&num_bits) {
            return Err(Error::invalid_parameter(format!(
                "num_bits must be in [{MIN_NUM_BITS}, {MAX_NUM_BITS}]"
            ))
            .with_context("num_bits", num_bits));
        }
        if !(MIN_NUM_HASHES..=MAX_NUM_HASHES).contains(&num_hashes) {
            return Err(Error::invalid_parameter(format!(
                "num_hashes must be in [{MIN_NUM_HASHES}, {MAX_NUM_HASHES}]"
            ))
            .with_context("num_hashes", num_hashes));
        }

        let optimal_n = (num_bits as f64 * LN_2 / f64::from(num_hashes)).round();
        let expected_insertions = (optimal_n as u64).max(1);
        let mut params = FilterParameters {
            expected_insertions,
            false_positive_probability: 0.0,
            num_bits,
            num_hashes,
        };
        params.false_positive_probability = params.expected_fpp(expected_insertions);
        Ok(params)
    }

    /// Number of items the filter was sized for.
    pub fn expected_insertions(&self) -> u64 {
        self.expected_insertions
    }

    /// Target false positive probability at full capacity.
    pub fn false_positive_probability(&self) -> f64 {
        self.false_positive_probability
    }

    /// Number of bits in the filter (`m`).
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Number of bit positions set per insert (`k`).
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Bytes occupied by the bit array, `ceil(m / 8)`.
    pub fn estimated_byte_size(&self) -> u64 {
        self.num_bits.div_ceil(8)
    }

    /// Expected false positive probability after `inserted` distinct items:
    /// `(1 - e^(-k * n / m))^k`.
    pub fn expected_fpp(&self, inserted: u64) -> f64 {
        let k = f64::from(self.num_hashes);
        let fill = -k * inserted as f64 / self.num_bits as f64;
        (1.0 - fill.exp()).powf(k)
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        let expected_insertions = DEFAULT_EXPECTED_INSERTIONS;
        let false_positive_probability = DEFAULT_FALSE_POSITIVE_PROBABILITY;
        let num_bits = optimal_num_bits(expected_insertions, false_positive_probability) as u64;
        FilterParameters {
            expected_insertions,
            false_positive_probability,
            num_bits,
            num_hashes: optimal_num_hashes(expected_insertions, num_bits),
        }
    }
}

/// Minimum bit count holding `n` items at false positive probability `p`:
/// `m = ceil(-n * ln(p) / ln(2)^2)`.
fn optimal_num_bits(n: u64, p: f64) -> f64 {
    (-(n as f64) * p.ln() / (LN_2 * LN_2)).ceil()
}

/// Optimal hash count for `m` bits and `n` items: `k = max(1, round(m / n * ln(2)))`.
fn optimal_num_hashes(n: u64, m: u64) -> u32 {
    let k = (m as f64 / n as f64 * LN_2).round();
    (k as u32).clamp(MIN_NUM_HASHES, MAX_NUM_HASHES)
}
