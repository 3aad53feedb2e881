//! Bit-level I/O: the channel that Huffman codes are written to and read from.
//!
//! Coders only ever see the [`BitSink`] and [`BitSource`] traits. Two families
//! of implementations are provided:
//! - [`BitWriter`] / [`BitReader`]: in-memory, over `Vec<u8>` / `&[u8]`
//! - [`BitOutputStream`] / [`BitInputStream`]: over any `Write` / `Read`
//!
//! All of them operate in MSB-first (most significant bit first) order.
//!
//! # Padding Rules
//! - Writers pad the final partial byte with zero bits when finished
//! - Readers cannot tell padding from data; the EOS symbol of the surrounding
//!   format marks where the meaningful bits stop
//!
//! # Example
//! ```
//! use huffman_core::bitio::{BitReader, BitSink, BitSource, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();  // Write 3 bits: 1, 0, 1
//! writer.write_bit(true).unwrap();       // Write 1 bit: 1
//! // Total: 1011 -> padded to 10110000
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b1011_0000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bit().unwrap(), Some(true));
//! ```

use std::io::{ErrorKind, Read, Write};

use crate::error::{BitIoError, Result};

/// Destination for single bits.
pub trait BitSink {
    /// Append one bit (`true` = 1).
    fn write_bit(&mut self, bit: bool) -> Result<()>;

    /// Append the lowest `count` bits of `value`, MSB-first.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }
}

/// Source of single bits.
pub trait BitSource {
    /// Read the next bit, or `None` once the channel is exhausted.
    fn read_bit(&mut self) -> Result<Option<bool>>;

    /// Read the next bit, treating exhaustion as an error.
    fn read_bit_no_eof(&mut self) -> Result<bool> {
        self.read_bit()?
            .ok_or_else(|| BitIoError::UnexpectedEof.into())
    }

    /// Read `count` bits MSB-first into the low bits of the result.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if the channel runs dry
    fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        let mut result = 0u64;
        for _ in 0..count {
            result = (result << 1) | self.read_bit_no_eof()? as u64;
        }
        Ok(result)
    }
}

impl<S: BitSink + ?Sized> BitSink for &mut S {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        (**self).write_bit(bit)
    }

    fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        (**self).write_bits(value, count)
    }
}

impl<S: BitSource + ?Sized> BitSource for &mut S {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        (**self).read_bit()
    }

    fn read_bits(&mut self, count: usize) -> Result<u64> {
        (**self).read_bits(count)
    }
}

/// Writes bits MSB-first into a byte buffer.
///
/// Accumulates bits in a buffer and flushes complete bytes to the output.
/// When finished, pads the final partial byte with zeros.
///
/// # Invariants
/// - `bit_buffer` contains up to 7 bits (never a full byte)
/// - `bit_count` is always < 8
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Write up to 64 bits to the output.
    ///
    /// Bits are written MSB-first. For example, writing value=0b101 with count=3
    /// writes bits 1, 0, 1 in that order.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            // How many bits fit into the current byte?
            let bits_to_write = remaining.min(8 - self.bit_count as usize);
            let shift = remaining - bits_to_write;
            let bits = ((value >> shift) & ((1u64 << bits_to_write) - 1)) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - bits_to_write);
            self.bit_count += bits_to_write as u8;

            if self.bit_count == 8 {
                self.bytes.push(self.bit_buffer);
                self.bit_buffer = 0;
                self.bit_count = 0;
            }
            remaining -= bits_to_write;
        }

        Ok(())
    }

    /// Finish writing and return the output bytes.
    ///
    /// If there are any remaining bits in the buffer, they are padded with
    /// trailing zeros to complete the final byte.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        self.bytes
    }

    /// Return the total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitSink for BitWriter {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        BitWriter::write_bits(self, bit as u64, 1)
    }

    fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        BitWriter::write_bits(self, value, count)
    }
}

/// Reads bits MSB-first from a byte buffer.
///
/// # Invariants
/// - `bit_position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader for the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    /// Read up to 64 bits from the input.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if not enough bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut result = 0u64;
        let mut remaining = count;

        while remaining > 0 {
            let byte_idx = self.bit_position / 8;
            let bit_offset = self.bit_position % 8;

            let bits_in_byte = 8 - bit_offset;
            let bits_to_read = remaining.min(bits_in_byte);

            let byte = self.data[byte_idx];
            let mask = ((1u16 << bits_to_read) - 1) as u8;
            let bits = (byte >> (bits_in_byte - bits_to_read)) & mask;

            result = (result << bits_to_read) | bits as u64;

            self.bit_position += bits_to_read;
            remaining -= bits_to_read;
        }

        Ok(result)
    }

    /// Return the number of bits remaining in the buffer.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Check if we're at the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.data.len() * 8
    }
}

impl BitSource for BitReader<'_> {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.is_empty() {
            return Ok(None);
        }
        Ok(Some(BitReader::read_bits(self, 1)? == 1))
    }

    fn read_bits(&mut self, count: usize) -> Result<u64> {
        BitReader::read_bits(self, count)
    }
}

/// Bit sink over any byte writer.
///
/// Each completed byte is handed to the writer immediately, so callers
/// should wrap unbuffered writers (files, sockets) in a `BufWriter`.
#[derive(Debug)]
pub struct BitOutputStream<W: Write> {
    output: W,
    current_byte: u8,
    /// Bits filled in current_byte (0-7)
    filled: u8,
}

impl<W: Write> BitOutputStream<W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            current_byte: 0,
            filled: 0,
        }
    }

    /// Pad the final partial byte with zeros, flush, and hand back the writer.
    pub fn finish(mut self) -> Result<W> {
        while self.filled != 0 {
            self.write_bit(false)?;
        }
        self.output.flush()?;
        Ok(self.output)
    }
}

impl<W: Write> BitSink for BitOutputStream<W> {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.current_byte = (self.current_byte << 1) | bit as u8;
        self.filled += 1;
        if self.filled == 8 {
            self.output.write_all(&[self.current_byte])?;
            self.current_byte = 0;
            self.filled = 0;
        }
        Ok(())
    }
}

/// Bit source over any byte reader.
#[derive(Debug)]
pub struct BitInputStream<R: Read> {
    input: R,
    current_byte: u8,
    /// Unread bits left in current_byte (0-8)
    remaining: u8,
    at_eof: bool,
}

impl<R: Read> BitInputStream<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            current_byte: 0,
            remaining: 0,
            at_eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.input
    }

    // Returns false at end of input.
    fn fill(&mut self) -> Result<bool> {
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => return Ok(false),
                Ok(_) => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.current_byte = byte[0];
        self.remaining = 8;
        Ok(true)
    }
}

impl<R: Read> BitSource for BitInputStream<R> {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.at_eof {
            return Ok(None);
        }
        if self.remaining == 0 && !self.fill()? {
            self.at_eof = true;
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some((self.current_byte >> self.remaining) & 1 == 1))
    }
}
