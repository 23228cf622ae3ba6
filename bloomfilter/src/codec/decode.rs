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

use std::io;
use std::io::Cursor;
use std::io::Read;

use byteorder::LE;
use byteorder::ReadBytesExt;

/// A wrapper around a byte slice that provides methods for reading filter fields from it.
pub struct FilterSlice<'a> {
    slice: Cursor<&'a [u8]>,
}

impl FilterSlice<'_> {
    /// Creates a new `FilterSlice` from the given byte slice.
    pub fn new(slice: &[u8]) -> FilterSlice<'_> {
        FilterSlice {
            slice: Cursor::new(slice),
        }
    }

    /// Returns the number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        let len = self.slice.get_ref().len();
        let pos = usize::try_from(self.slice.position()).unwrap_or(len);
        len.saturating_sub(pos)
    }

    /// Reads exactly `buf.len()` bytes from the slice into `buf`.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.slice.read_exact(buf)
    }

    /// Reads a 32-bit unsigned integer from the slice in little-endian byte order.
    pub fn read_u32_le(&mut self) -> io::Result<u32> {
        self.slice.read_u32::<LE>()
    }

    /// Reads a 64-bit unsigned integer from the slice in little-endian byte order.
    pub fn read_u64_le(&mut self) -> io::Result<u64> {
        self.slice.read_u64::<LE>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_and_remaining() {
        let bytes = [8, 7, 6, 5, 4, 3, 2, 1, 0x0d, 0x0c, 0x0b, 0x0a, 0xff];
        let mut slice = FilterSlice::new(&bytes);
        assert_eq!(slice.remaining(), 13);
        assert_eq!(slice.read_u64_le().unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(slice.read_u32_le().unwrap(), 0x0a0b_0c0d);
        assert_eq!(slice.remaining(), 1);

        let err = slice.read_u32_le().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
