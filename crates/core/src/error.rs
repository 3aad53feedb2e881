//! Error types for the Huffman coding engine.
//!
//! All operations return structured errors rather than panicking.
//! Nothing is retried or patched up internally: the algorithms are
//! deterministic, so a failure is reported to the immediate caller as-is.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Validation: caller-correctable input, detected before any mutation
/// - State: an operation that the current object state does not allow
/// - Structure: a malformed code tree or code-length set
/// - Bit I/O: the bit channel ran dry mid-symbol (truncated data)
/// - I/O: the underlying byte sink or source failed
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-correctable argument problem
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Operation not allowed in the current state
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Corrupted or malformed tree / code-length input
    #[error("structural error: {0}")]
    Structure(#[from] StructureError),

    /// Bit I/O operation failed (e.g., reading past end of stream)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Underlying byte stream error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A table, tree or code needs at least two symbols
    #[error("at least 2 symbols needed, got {count}")]
    TooFewSymbols { count: usize },

    /// Symbol is outside `[0, limit)`
    #[error("symbol {symbol} out of range (limit {limit})")]
    SymbolOutOfRange { symbol: usize, limit: usize },

    /// The code tree has no leaf for this symbol
    #[error("no code for symbol {symbol}")]
    NoCode { symbol: usize },

    /// Code length does not fit the 8-bit header field
    #[error("code length {length} for symbol {symbol} exceeds maximum 255")]
    CodeLengthTooLong { symbol: usize, length: u32 },
}

/// State errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// Incrementing would exceed the counter width
    #[error("maximum frequency reached for symbol {symbol}")]
    FrequencyOverflow { symbol: usize },

    /// Encoder or decoder used before a code tree was installed
    #[error("no code tree set")]
    MissingCodeTree,
}

/// Structural errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    /// Code lengths leave unfilled leaf slots
    #[error("under-full Huffman code tree")]
    UnderFull,

    /// Code lengths need more leaves than a binary tree admits
    #[error("over-full Huffman code tree")]
    OverFull,

    /// Two leaves carry the same symbol
    #[error("symbol {symbol} has more than one code")]
    DuplicateSymbol { symbol: usize },

    /// A leaf symbol is not below the declared symbol limit
    #[error("symbol {symbol} exceeds symbol limit {limit}")]
    SymbolExceedsLimit { symbol: usize, limit: usize },

    /// Canonical reconstruction produced an odd or non-unit node count
    #[error("violation of canonical code invariants: {nodes} nodes at length {length}")]
    CanonicalInvariant { length: u32, nodes: usize },
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// The channel was exhausted before a symbol was complete
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
