//! Huffman encoder and decoder over a bit channel.
//!
//! Both hold the code tree to use for the *next* symbol. The tree may be
//! replaced between symbols, which is how adaptive coding works: as long as
//! encoder and decoder install the same tree at the same point of the
//! stream, they stay in step.

use crate::bitio::{BitSink, BitSource};
use crate::error::{Result, StateError};
use crate::tree::{CodeTree, Node};

/// Writes the code of each symbol to a [`BitSink`].
#[derive(Debug)]
pub struct HuffmanEncoder<S> {
    output: S,
    code_tree: Option<CodeTree>,
}

impl<S: BitSink> HuffmanEncoder<S> {
    /// Create an encoder with no code tree; install one before writing.
    pub fn new(output: S) -> Self {
        Self {
            output,
            code_tree: None,
        }
    }

    pub fn with_code_tree(output: S, code_tree: CodeTree) -> Self {
        Self {
            output,
            code_tree: Some(code_tree),
        }
    }

    /// Replace the tree used for subsequent symbols.
    pub fn set_code_tree(&mut self, code_tree: CodeTree) {
        self.code_tree = Some(code_tree);
    }

    pub fn code_tree(&self) -> Option<&CodeTree> {
        self.code_tree.as_ref()
    }

    /// Encode one symbol.
    ///
    /// # Errors
    /// - `StateError::MissingCodeTree` if no tree is installed
    /// - `ValidationError::NoCode` / `SymbolOutOfRange` if the tree cannot code `symbol`
    /// - Errors from the underlying sink
    pub fn write(&mut self, symbol: usize) -> Result<()> {
        let tree = self.code_tree.as_ref().ok_or(StateError::MissingCodeTree)?;
        for &bit in tree.code(symbol)? {
            self.output.write_bit(bit)?;
        }
        Ok(())
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.output
    }

    pub fn into_inner(self) -> S {
        self.output
    }
}

/// Reads symbols from a [`BitSource`] by walking the code tree.
#[derive(Debug)]
pub struct HuffmanDecoder<S> {
    input: S,
    code_tree: Option<CodeTree>,
}

impl<S: BitSource> HuffmanDecoder<S> {
    /// Create a decoder with no code tree; install one before reading.
    pub fn new(input: S) -> Self {
        Self {
            input,
            code_tree: None,
        }
    }

    pub fn with_code_tree(input: S, code_tree: CodeTree) -> Self {
        Self {
            input,
            code_tree: Some(code_tree),
        }
    }

    /// Replace the tree used for subsequent symbols.
    pub fn set_code_tree(&mut self, code_tree: CodeTree) {
        self.code_tree = Some(code_tree);
    }

    pub fn code_tree(&self) -> Option<&CodeTree> {
        self.code_tree.as_ref()
    }

    /// Decode the next symbol.
    ///
    /// Each call starts at the root and consumes bits until it reaches a leaf.
    ///
    /// # Errors
    /// - `StateError::MissingCodeTree` if no tree is installed
    /// - `BitIoError::UnexpectedEof` if the channel runs dry before a leaf;
    ///   this is always corruption or truncation, never a clean end
    pub fn read(&mut self) -> Result<usize> {
        let tree = self.code_tree.as_ref().ok_or(StateError::MissingCodeTree)?;
        let mut node = tree.root();
        loop {
            let bit = self.input.read_bit_no_eof()?;
            match node.child(bit) {
                Node::Leaf(symbol) => return Ok(*symbol),
                Node::Internal(next) => node = next,
            }
        }
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.input
    }

    pub fn into_inner(self) -> S {
        self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::{BitReader, BitWriter};
    use crate::error::{BitIoError, ValidationError};
    use crate::frequency::FrequencyTable;
    use crate::Error;

    fn tree() -> CodeTree {
        FrequencyTable::new(vec![1, 1, 2, 4, 0])
            .unwrap()
            .build_code_tree()
            .unwrap()
    }

    #[test]
    fn test_encode_decode_symbols() {
        let symbols = [3, 2, 0, 1, 3, 3, 2];

        let mut encoder = HuffmanEncoder::with_code_tree(BitWriter::new(), tree());
        for &s in &symbols {
            encoder.write(s).unwrap();
        }
        let bytes = encoder.into_inner().finish();

        let mut decoder = HuffmanDecoder::with_code_tree(BitReader::new(&bytes), tree());
        for &s in &symbols {
            assert_eq!(decoder.read().unwrap(), s);
        }
    }

    #[test]
    fn test_encoder_emits_tree_codes() {
        let tree = tree();
        let expected: Vec<bool> = tree.code(0).unwrap().to_vec();

        let mut encoder = HuffmanEncoder::with_code_tree(BitWriter::new(), tree);
        encoder.write(0).unwrap();
        assert_eq!(encoder.get_mut().bit_len(), expected.len());
    }

    #[test]
    fn test_missing_code_tree() {
        let mut encoder = HuffmanEncoder::new(BitWriter::new());
        assert!(matches!(
            encoder.write(0),
            Err(Error::State(StateError::MissingCodeTree))
        ));

        let data = [0u8];
        let mut decoder = HuffmanDecoder::new(BitReader::new(&data));
        assert!(matches!(
            decoder.read(),
            Err(Error::State(StateError::MissingCodeTree))
        ));
    }

    #[test]
    fn test_symbol_without_code() {
        let mut encoder = HuffmanEncoder::with_code_tree(BitWriter::new(), tree());
        assert!(matches!(
            encoder.write(4),
            Err(Error::Validation(ValidationError::NoCode { symbol: 4 }))
        ));
    }

    #[test]
    fn test_truncated_stream() {
        // Symbol 0 has a 3-bit code 000; two zero bits are not enough
        let tree = tree();
        assert_eq!(tree.code(0).unwrap(), &[false, false, false]);
        let mut writer = BitWriter::new();
        writer.write_bits(0, 2).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        reader.read_bits(6).unwrap();
        let mut decoder = HuffmanDecoder::with_code_tree(reader, tree);
        assert!(matches!(
            decoder.read(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_swapping_trees_between_symbols() {
        let first = tree();
        let second = FrequencyTable::new(vec![9, 1, 1, 1, 1])
            .unwrap()
            .build_code_tree()
            .unwrap();

        let mut encoder = HuffmanEncoder::with_code_tree(BitWriter::new(), first.clone());
        encoder.write(3).unwrap();
        encoder.set_code_tree(second.clone());
        encoder.write(4).unwrap();
        let bytes = encoder.into_inner().finish();

        let mut decoder = HuffmanDecoder::with_code_tree(BitReader::new(&bytes), first);
        assert_eq!(decoder.read().unwrap(), 3);
        decoder.set_code_tree(second);
        assert_eq!(decoder.read().unwrap(), 4);
    }
}
