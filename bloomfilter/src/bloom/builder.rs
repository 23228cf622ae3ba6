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

use super::BloomFilter;
use super::FilterParameters;
use super::params::DEFAULT_EXPECTED_INSERTIONS;
use super::params::DEFAULT_FALSE_POSITIVE_PROBABILITY;
use crate::error::Error;
use crate::hash::Hash128;
use crate::hash::Murmur3Hash128;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sizing {
    Accuracy { expected_insertions: u64, fpp: f64 },
    Size { num_bits: u64, num_hashes: u32 },
}

/// Builder for creating [`BloomFilter`] instances.
///
/// Provides three construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify target items and false positive rate
/// - [`with_capacity()`](Self::with_capacity): Specify target items at a 1% false positive rate
/// - [`with_size()`](Self::with_size): Specify exact bit count and hash functions (manual)
///
/// The default builder sizes for 10,000,000 items at 1%. Arguments are validated by
/// [`build()`](Self::build).
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder<H = Murmur3Hash128> {
    sizing: Sizing,
    hasher: H,
}

impl Default for BloomFilterBuilder {
    fn default() -> Self {
        Self::with_accuracy(
            DEFAULT_EXPECTED_INSERTIONS,
            DEFAULT_FALSE_POSITIVE_PROBABILITY,
        )
    }
}

impl BloomFilterBuilder {
    /// Creates a builder with optimal parameters for a target accuracy.
    ///
    /// # Arguments
    ///
    /// - `expected_insertions`: Maximum expected number of distinct items
    /// - `fpp`: Target false positive probability (e.g., 0.01 for 1%)
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// // Optimal for 10,000 items with 1% FPP
    /// let filter = BloomFilterBuilder::with_accuracy(10_000, 0.01).build().unwrap();
    /// assert_eq!(filter.num_hashes(), 7);
    /// ```
    pub fn with_accuracy(expected_insertions: u64, fpp: f64) -> Self {
        BloomFilterBuilder {
            sizing: Sizing::Accuracy {
                expected_insertions,
                fpp,
            },
            hasher: Murmur3Hash128::default(),
        }
    }

    /// Creates a builder for `expected_insertions` items at a 1% false positive probability.
    pub fn with_capacity(expected_insertions: u64) -> Self {
        Self::with_accuracy(expected_insertions, DEFAULT_FALSE_POSITIVE_PROBABILITY)
    }
}

impl<H> BloomFilterBuilder<H> {
    /// Replaces the sizing with an explicit bit count and hash count.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let filter = BloomFilter::builder().with_size(10_000, 7).build().unwrap();
    /// assert_eq!(filter.num_bits(), 10_000);
    /// ```
    pub fn with_size(mut self, num_bits: u64, num_hashes: u32) -> Self {
        self.sizing = Sizing::Size {
            num_bits,
            num_hashes,
        };
        self
    }

    /// Sets the 128-bit hash function used to place elements.
    ///
    /// **Important**: Filters built with different hash functions or seeds cannot be
    /// meaningfully merged or compared.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// # use bloomfilter::hash::Murmur3Hash128;
    /// let filter = BloomFilterBuilder::with_capacity(100)
    ///     .hasher(Murmur3Hash128::with_seed(9001))
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn hasher<T: Hash128>(self, hasher: T) -> BloomFilterBuilder<T> {
        BloomFilterBuilder {
            sizing: self.sizing,
            hasher,
        }
    }
}

impl<H: Hash128> BloomFilterBuilder<H> {
    /// Derives the filter parameters without allocating the filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// the sizing arguments are out of range.
    pub fn parameters(&self) -> Result<FilterParameters, Error> {
        match self.sizing {
            Sizing::Accuracy {
                expected_insertions,
                fpp,
            } => FilterParameters::new(expected_insertions, fpp),
            Sizing::Size {
                num_bits,
                num_hashes,
            } => FilterParameters::from_size(num_bits, num_hashes),
        }
    }

    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// the sizing arguments are out of range.
    pub fn build(self) -> Result<BloomFilter<H>, Error> {
        let params = self.parameters()?;
        Ok(BloomFilter::from_parameters(params, self.hasher))
    }
}
