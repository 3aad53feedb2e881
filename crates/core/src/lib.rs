//! huffman-core: canonical and adaptive Huffman coding
//!
//! This library provides:
//! - Optimal, deterministic code-tree construction from symbol frequencies
//! - Canonical codes: tree -> code lengths -> tree, with completeness checks
//! - Bit-level encoding and decoding driven by a code tree
//! - Two byte-stream formats built on top of those pieces
//!
//! # Architecture
//!
//! - `bitio`: bit channel traits and in-memory / stream implementations
//! - `frequency`: frequency tables and optimal tree construction
//! - `tree`: code trees and symbol -> code lookup
//! - `canonical`: canonical codes (length tables)
//! - `coder`: Huffman encoder and decoder
//! - `framing`: static format (code-length table + coded data)
//! - `adaptive`: adaptive format (no table, shared rebuild schedule)
//! - `metrics`: per-session counters
//!
//! # Example
//!
//! ```
//! let raw = b"abracadabra";
//!
//! let packed = huffman_core::framing::compress(raw).unwrap();
//! assert_eq!(huffman_core::framing::decompress(&packed).unwrap(), raw);
//!
//! let packed = huffman_core::adaptive::compress(raw).unwrap();
//! assert_eq!(huffman_core::adaptive::decompress(&packed).unwrap(), raw);
//! ```

pub mod adaptive;
pub mod bitio;
pub mod canonical;
pub mod coder;
pub mod error;
pub mod frequency;
pub mod framing;
pub mod metrics;
pub mod tree;

pub use canonical::CanonicalCode;
pub use coder::{HuffmanDecoder, HuffmanEncoder};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use tree::{CodeTree, InternalNode, Node};

/// Alphabet size of both file formats: 256 byte values plus EOS.
pub const SYMBOL_LIMIT: usize = 257;

/// The end-of-stream symbol of both file formats.
pub const EOS_SYMBOL: usize = 256;
