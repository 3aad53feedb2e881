//! Static (two-pass) compressed file format.
//!
//! The input is scanned once to count byte frequencies, an optimal code is
//! built and canonicalised, and the code is transmitted as a table of code
//! lengths ahead of the coded data.
//!
//! # Format
//!
//! ```text
//! +----------------------------+
//! | code length, symbol 0      |  8 bits, big-endian (0 = no code)
//! | code length, symbol 1      |
//! | ...                        |
//! | code length, symbol 256    |  257 entries = 257 bytes
//! +----------------------------+
//! | Huffman-coded input bytes  |  no byte realignment after the table
//! | code for EOS (256)         |
//! | zero padding               |  up to the next byte boundary
//! +----------------------------+
//! ```
//!
//! The EOS symbol always gets a count of one, so it always has a code.

use std::io::{BufReader, Read, Write};

use tracing::debug;

use crate::bitio::{BitInputStream, BitOutputStream, BitReader, BitSink, BitSource, BitWriter};
use crate::canonical::CanonicalCode;
use crate::coder::{HuffmanDecoder, HuffmanEncoder};
use crate::error::{Result, ValidationError};
use crate::frequency::FrequencyTable;
use crate::metrics::Metrics;
use crate::{EOS_SYMBOL, SYMBOL_LIMIT};

/// Largest code length the 8-bit table entry can hold.
pub const MAX_CODE_LENGTH: u32 = 255;

/// Count byte values in `data`, plus one occurrence of EOS.
pub fn byte_frequencies(data: &[u8]) -> Result<FrequencyTable> {
    let mut freqs = FrequencyTable::new(vec![0; SYMBOL_LIMIT])?;
    for &byte in data {
        freqs.increment(byte as usize)?;
    }
    freqs.increment(EOS_SYMBOL)?;
    Ok(freqs)
}

/// Build the canonical code that is optimal for `freqs`.
pub fn canonical_code_for(freqs: &FrequencyTable) -> Result<CanonicalCode> {
    let tree = freqs.build_code_tree()?;
    CanonicalCode::from_code_tree(&tree, freqs.symbol_limit())
}

/// Write one 8-bit big-endian code length per symbol.
///
/// # Errors
/// `ValidationError::CodeLengthTooLong` if any length exceeds 255. Nothing
/// is written in that case.
pub fn write_code_length_table<S: BitSink>(sink: &mut S, code: &CanonicalCode) -> Result<()> {
    if let Some((symbol, &length)) = code
        .code_lengths()
        .iter()
        .enumerate()
        .find(|(_, &length)| length > MAX_CODE_LENGTH)
    {
        return Err(ValidationError::CodeLengthTooLong { symbol, length }.into());
    }

    for &length in code.code_lengths() {
        sink.write_bits(length as u64, 8)?;
    }
    debug!(symbols = code.symbol_limit(), "wrote code length table");
    Ok(())
}

/// Read `symbol_limit` 8-bit code lengths and validate them.
///
/// # Errors
/// - `BitIoError::UnexpectedEof` if the table is truncated
/// - `StructureError::UnderFull` / `OverFull` if the lengths are not a complete code
pub fn read_code_length_table<S: BitSource>(
    source: &mut S,
    symbol_limit: usize,
) -> Result<CanonicalCode> {
    let mut lengths = Vec::with_capacity(symbol_limit);
    for _ in 0..symbol_limit {
        lengths.push(source.read_bits(8)? as u32);
    }
    let code = CanonicalCode::new(lengths)?;
    debug!(symbols = symbol_limit, "read code length table");
    Ok(code)
}

/// Compress `data` in the static format.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();
    encode(data, &mut writer, &mut Metrics::new())?;
    Ok(writer.finish())
}

/// Compress `data` in the static format, writing to `output`.
///
/// Returns the writer once the final byte has been padded and flushed.
pub fn compress_into<W: Write>(data: &[u8], output: W, metrics: &mut Metrics) -> Result<W> {
    let mut sink = BitOutputStream::new(output);
    encode(data, &mut sink, metrics)?;
    sink.finish()
}

fn encode<S: BitSink>(data: &[u8], sink: &mut S, metrics: &mut Metrics) -> Result<()> {
    let code = canonical_code_for(&byte_frequencies(data)?)?;
    // Encode with the tree rebuilt from the lengths, so it matches the decoder's
    let tree = code.to_code_tree()?;
    metrics.tree_rebuilds += 1;

    write_code_length_table(sink, &code)?;
    metrics.header_bytes += SYMBOL_LIMIT as u64;

    let mut encoder = HuffmanEncoder::with_code_tree(sink, tree);
    for &byte in data {
        encoder.write(byte as usize)?;
    }
    encoder.write(EOS_SYMBOL)?;

    metrics.raw_bytes += data.len() as u64;
    metrics.symbols_coded += data.len() as u64 + 1;
    Ok(())
}

/// Decompress a static-format buffer.
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decode(BitReader::new(compressed), &mut output, &mut Metrics::new())?;
    Ok(output)
}

/// Decompress a static-format stream from `input` into `output`.
pub fn decompress_into<R: Read, W: Write>(
    input: R,
    output: &mut W,
    metrics: &mut Metrics,
) -> Result<()> {
    decode(BitInputStream::new(BufReader::new(input)), output, metrics)?;
    output.flush()?;
    Ok(())
}

fn decode<S: BitSource, W: Write>(mut source: S, output: &mut W, metrics: &mut Metrics) -> Result<()> {
    let code = read_code_length_table(&mut source, SYMBOL_LIMIT)?;
    metrics.header_bytes += SYMBOL_LIMIT as u64;
    let tree = code.to_code_tree()?;
    metrics.tree_rebuilds += 1;

    let mut decoder = HuffmanDecoder::with_code_tree(source, tree);
    loop {
        let symbol = decoder.read()?;
        metrics.symbols_coded += 1;
        if symbol == EOS_SYMBOL {
            break;
        }
        output.write_all(&[symbol as u8])?;
        metrics.raw_bytes += 1;
    }
    Ok(())
}
