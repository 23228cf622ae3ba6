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

//! Error types for bloom filter operations

use std::fmt;

/// ErrorKind is all kinds of Error of bloomfilter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The construction arguments (expected insertions, false positive probability or
    /// explicit sizes) are out of range.
    InvalidParameter,
    /// Two filters with different bit counts or hash counts were combined.
    IncompatibleFilter,
    /// Two bit arrays of different lengths were combined.
    IncompatibleArray,
    /// The serialized filter bytes are truncated, oversized or corrupt.
    MalformedEncoding,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::InvalidParameter => "InvalidParameter",
            ErrorKind::IncompatibleFilter => "IncompatibleFilter",
            ErrorKind::IncompatibleArray => "IncompatibleArray",
            ErrorKind::MalformedEncoding => "MalformedEncoding",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all bloomfilter functions.
///
/// # Examples
///
/// ```
/// # use bloomfilter::error::Error;
/// # use bloomfilter::error::ErrorKind;
/// let err = Error::new(ErrorKind::InvalidParameter, "bad input");
/// assert_eq!(err.kind(), ErrorKind::InvalidParameter);
/// assert_eq!(err.message(), "bad input");
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::default(),
            source: None,
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Panics
    ///
    /// Panics if the source has been set.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::error::Error as _;
    /// use bloomfilter::error::{Error, ErrorKind};
    ///
    /// let mut error = Error::new(ErrorKind::MalformedEncoding, "failed to deserialize filter");
    /// assert!(error.source().is_none());
    /// error = error.set_source(std::io::Error::new(std::io::ErrorKind::Other, "IO error"));
    /// assert!(error.source().is_some());
    /// ```
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

// Convenient constructors used within bloomfilter crate.
impl Error {
    pub(crate) fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, msg)
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedEncoding, msg)
    }

    pub(crate) fn insufficient_data(field: &'static str) -> Self {
        Self::malformed(format!("insufficient data: {field}"))
    }

    pub(crate) fn incompatible_filter(
        (num_bits, num_hashes): (u64, u32),
        (other_num_bits, other_num_hashes): (u64, u32),
    ) -> Self {
        Self::new(
            ErrorKind::IncompatibleFilter,
            "cannot combine bloom filters with different parameters",
        )
        .with_context("num_bits", num_bits)
        .with_context("num_hashes", num_hashes)
        .with_context("other_num_bits", other_num_bits)
        .with_context("other_num_hashes", other_num_hashes)
    }

    pub(crate) fn incompatible_array(num_bits: u64, other_num_bits: u64) -> Self {
        Self::new(
            ErrorKind::IncompatibleArray,
            format!("bit array lengths differ: {num_bits} != {other_num_bits}"),
        )
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f
                .debug_struct("Error")
                .field("kind", &self.kind)
                .field("message", &self.message)
                .field("context", &self.context)
                .field("source", &self.source)
                .finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f, "\nContext:")?;
            for (key, value) in &self.context {
                writeln!(f, "   {key}: {value}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f, "\nCaused by:")?;
            for (depth, cause) in source.chain().enumerate() {
                writeln!(f, "   {depth}: {cause}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(((key, value), rest)) = self.context.split_first() {
            write!(f, ", context: {{ {key}: {value}")?;
            for (key, value) in rest {
                write!(f, ", {key}: {value}")?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source = self.source.as_ref()?;
        Some(source.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_format_consistency() {
        let err = Error::new(ErrorKind::InvalidParameter, "expected insertions must be positive");
        assert_snapshot!(err, @"InvalidParameter => expected insertions must be positive");
    }

    #[test]
    fn test_format_incompatible_filter() {
        let err = Error::incompatible_filter((959, 7), (95_850_584, 7));
        assert_snapshot!(
            err,
            @"IncompatibleFilter, context: { num_bits: 959, num_hashes: 7, other_num_bits: 95850584, other_num_hashes: 7 } => cannot combine bloom filters with different parameters"
        );
    }

    #[test]
    fn test_format_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "failed to fill whole buffer");
        let err = Error::insufficient_data("num_bits").set_source(io);
        assert_eq!(err.kind(), ErrorKind::MalformedEncoding);
        assert_snapshot!(
            err,
            @"MalformedEncoding => insufficient data: num_bits, source: failed to fill whole buffer"
        );
    }

    #[test]
    fn test_debug_lists_context_and_causes() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "failed to fill whole buffer");
        let err = Error::malformed("bit array length does not match num_bits")
            .with_context("expected_bytes", 120)
            .with_context("actual_bytes", 119)
            .set_source(io);
        assert_snapshot!(format!("{err:?}"), @r"
        MalformedEncoding => bit array length does not match num_bits

        Context:
           expected_bytes: 120
           actual_bytes: 119

        Caused by:
           0: failed to fill whole buffer
        ");
    }

    #[test]
    fn test_source_is_exposed() {
        use std::error::Error as _;

        let err = Error::invalid_parameter("no source");
        assert!(err.source().is_none());

        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err = err.set_source(io);
        assert_eq!(err.source().map(|src| src.to_string()), Some("eof".to_string()));
    }
}
