//! Adaptive (one-pass) compressed file format.
//!
//! No code table is transmitted. Encoder and decoder both start from a flat
//! frequency table and update it after every byte, rebuilding the code tree
//! on a fixed schedule. Because both sides see the same symbols in the same
//! order, they rebuild identical trees at identical byte counts.
//!
//! # Rebuild schedule
//!
//! After the `n`-th byte (counting from 1):
//! 1. the byte's frequency is incremented
//! 2. the tree is rebuilt if `n` is a power of two below [`BLOCK_SIZE`], or
//!    `n` is a multiple of [`BLOCK_SIZE`]
//! 3. the frequency table is reset to flat if `n` is a multiple of [`BLOCK_SIZE`]
//!
//! The schedule is part of the format; changing either condition breaks
//! compatibility with existing streams.
//!
//! # Format
//!
//! ```text
//! +----------------------------+
//! | Huffman-coded input bytes  |  codes change as the model adapts
//! | code for EOS (256)         |
//! | zero padding               |  up to the next byte boundary
//! +----------------------------+
//! ```

use std::io::{BufReader, Read, Write};

use tracing::{debug, trace};

use crate::bitio::{BitInputStream, BitOutputStream, BitReader, BitSink, BitSource, BitWriter};
use crate::coder::{HuffmanDecoder, HuffmanEncoder};
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::metrics::Metrics;
use crate::tree::CodeTree;
use crate::{EOS_SYMBOL, SYMBOL_LIMIT};

/// Bytes between frequency-table resets.
pub const BLOCK_SIZE: u64 = 262_144;

/// The shared statistics model that encoder and decoder each run locally.
#[derive(Debug, Clone)]
pub struct AdaptiveModel {
    frequencies: FrequencyTable,
    byte_count: u64,
    rebuilds: u64,
    resets: u64,
}

impl AdaptiveModel {
    /// Create a model with a count of 1 for each of `symbol_limit` symbols.
    pub fn new(symbol_limit: usize) -> Result<Self> {
        Ok(Self {
            frequencies: flat_table(symbol_limit)?,
            byte_count: 0,
            rebuilds: 0,
            resets: 0,
        })
    }

    /// The tree both sides start with.
    pub fn initial_tree(&self) -> Result<CodeTree> {
        self.frequencies.build_code_tree()
    }

    /// Account for one coded symbol.
    ///
    /// Returns the new code tree when the schedule calls for a rebuild; the
    /// caller installs it before coding the next symbol.
    pub fn update(&mut self, symbol: usize) -> Result<Option<CodeTree>> {
        self.frequencies.increment(symbol)?;
        self.byte_count += 1;
        let count = self.byte_count;

        let at_boundary = count % BLOCK_SIZE == 0;
        let tree = if at_boundary || (count < BLOCK_SIZE && count.is_power_of_two()) {
            trace!(byte_count = count, "rebuilding code tree");
            self.rebuilds += 1;
            Some(self.frequencies.build_code_tree()?)
        } else {
            None
        };

        if at_boundary {
            debug!(byte_count = count, "block boundary, resetting frequency table");
            self.frequencies = flat_table(self.frequencies.symbol_limit())?;
            self.resets += 1;
        }

        Ok(tree)
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// Symbols accounted for so far (EOS is never counted).
    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn resets(&self) -> u64 {
        self.resets
    }
}

fn flat_table(symbol_limit: usize) -> Result<FrequencyTable> {
    FrequencyTable::new(vec![1; symbol_limit])
}

/// Compress `data` in the adaptive format.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();
    encode(data.iter().map(|&b| Ok(b)), &mut writer, &mut Metrics::new())?;
    Ok(writer.finish())
}

/// Compress everything readable from `input` into `output` in one pass.
///
/// Returns the writer once the final byte has been padded and flushed.
pub fn compress_into<R: Read, W: Write>(input: R, output: W, metrics: &mut Metrics) -> Result<W> {
    let mut sink = BitOutputStream::new(output);
    encode(BufReader::new(input).bytes(), &mut sink, metrics)?;
    sink.finish()
}

fn encode<I, S>(bytes: I, sink: S, metrics: &mut Metrics) -> Result<()>
where
    I: Iterator<Item = std::io::Result<u8>>,
    S: BitSink,
{
    let mut model = AdaptiveModel::new(SYMBOL_LIMIT)?;
    let mut encoder = HuffmanEncoder::with_code_tree(sink, model.initial_tree()?);

    for byte in bytes {
        let symbol = byte? as usize;
        encoder.write(symbol)?;
        if let Some(tree) = model.update(symbol)? {
            encoder.set_code_tree(tree);
        }
    }
    encoder.write(EOS_SYMBOL)?;

    record(&model, metrics);
    Ok(())
}

/// Decompress an adaptive-format buffer.
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decode(BitReader::new(compressed), &mut output, &mut Metrics::new())?;
    Ok(output)
}

/// Decompress an adaptive-format stream from `input` into `output`.
pub fn decompress_into<R: Read, W: Write>(
    input: R,
    output: &mut W,
    metrics: &mut Metrics,
) -> Result<()> {
    decode(BitInputStream::new(BufReader::new(input)), output, metrics)?;
    output.flush()?;
    Ok(())
}

fn decode<S: BitSource, W: Write>(source: S, output: &mut W, metrics: &mut Metrics) -> Result<()> {
    let mut model = AdaptiveModel::new(SYMBOL_LIMIT)?;
    let mut decoder = HuffmanDecoder::with_code_tree(source, model.initial_tree()?);

    loop {
        let symbol = decoder.read()?;
        if symbol == EOS_SYMBOL {
            break;
        }
        output.write_all(&[symbol as u8])?;
        if let Some(tree) = model.update(symbol)? {
            decoder.set_code_tree(tree);
        }
    }

    record(&model, metrics);
    Ok(())
}

fn record(model: &AdaptiveModel, metrics: &mut Metrics) {
    metrics.raw_bytes += model.byte_count();
    metrics.symbols_coded += model.byte_count() + 1;
    // The initial tree counts as a build
    metrics.tree_rebuilds += model.rebuilds() + 1;
    metrics.table_resets += model.resets();
}
