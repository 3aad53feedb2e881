//! Symbol frequency tables and optimal code-tree construction.
//!
//! A frequency table is used in two steps:
//! 1. Collect the frequencies of the symbols in the data to be coded.
//! 2. Build a code tree that is optimal for those frequencies.
//!
//! # Determinism
//!
//! Tree construction breaks frequency ties by the lowest symbol contained in
//! each subtree, so a given frequency vector always yields the same tree
//! shape. Encoders and decoders that rebuild trees independently (adaptive
//! mode) rely on this.
//!
//! # Overflow
//!
//! Counts are `u32` and `increment` refuses to wrap. Subtree weights are
//! summed in `u64`, which cannot overflow for any legal table.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use crate::error::{Result, StateError, ValidationError};
use crate::tree::{CodeTree, InternalNode, Node};

/// Mutable table of per-symbol counts for symbols `0..symbol_limit`.
///
/// # Invariants
/// - At least 2 symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    frequencies: Vec<u32>,
}

impl FrequencyTable {
    /// Create a table from initial counts, one per symbol.
    ///
    /// # Errors
    /// Returns `ValidationError::TooFewSymbols` if fewer than 2 counts are given.
    pub fn new(frequencies: Vec<u32>) -> Result<Self> {
        if frequencies.len() < 2 {
            return Err(ValidationError::TooFewSymbols {
                count: frequencies.len(),
            }
            .into());
        }
        Ok(Self { frequencies })
    }

    /// Number of symbols covered by this table (always at least 2).
    pub fn symbol_limit(&self) -> usize {
        self.frequencies.len()
    }

    pub fn get(&self, symbol: usize) -> Result<u32> {
        self.check_symbol(symbol)?;
        Ok(self.frequencies[symbol])
    }

    pub fn set(&mut self, symbol: usize, freq: u32) -> Result<()> {
        self.check_symbol(symbol)?;
        self.frequencies[symbol] = freq;
        Ok(())
    }

    /// Increment the count of `symbol` by one.
    ///
    /// # Errors
    /// - `ValidationError::SymbolOutOfRange` if the symbol is out of range
    /// - `StateError::FrequencyOverflow` if the count is already `u32::MAX`;
    ///   the table is left unchanged
    pub fn increment(&mut self, symbol: usize) -> Result<()> {
        self.check_symbol(symbol)?;
        let freq = &mut self.frequencies[symbol];
        *freq = freq
            .checked_add(1)
            .ok_or(StateError::FrequencyOverflow { symbol })?;
        Ok(())
    }

    fn check_symbol(&self, symbol: usize) -> Result<()> {
        if symbol >= self.frequencies.len() {
            return Err(ValidationError::SymbolOutOfRange {
                symbol,
                limit: self.frequencies.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Build a code tree that is optimal for the current frequencies.
    ///
    /// Every symbol with a positive count gets a leaf. If fewer than two
    /// such symbols exist, the lowest-numbered zero-count symbols are added
    /// until there are two, so the tree never degenerates to a lone leaf.
    /// The two lightest subtrees are merged repeatedly; equal weights are
    /// ordered by the lowest symbol each subtree contains.
    pub fn build_code_tree(&self) -> Result<CodeTree> {
        let mut queue = BinaryHeap::new();

        for (symbol, &freq) in self.frequencies.iter().enumerate() {
            if freq > 0 {
                queue.push(WeightedNode::leaf(symbol, freq));
            }
        }

        for (symbol, &freq) in self.frequencies.iter().enumerate() {
            if queue.len() >= 2 {
                break;
            }
            if freq == 0 {
                queue.push(WeightedNode::leaf(symbol, 0));
            }
        }

        loop {
            let (Some(x), Some(y)) = (queue.pop(), queue.pop()) else {
                return Err(ValidationError::TooFewSymbols { count: queue.len() }.into());
            };
            let lowest_symbol = x.lowest_symbol.min(y.lowest_symbol);
            let weight = x.weight + y.weight;
            let merged = InternalNode::new(x.node, y.node);

            if queue.is_empty() {
                return CodeTree::new(merged, self.frequencies.len());
            }
            queue.push(WeightedNode {
                node: merged.into(),
                lowest_symbol,
                weight,
            });
        }
    }
}

/// Debug rendering, one `symbol<TAB>frequency` line per symbol.
impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, freq) in self.frequencies.iter().enumerate() {
            writeln!(f, "{}\t{}", symbol, freq)?;
        }
        Ok(())
    }
}

/// A subtree waiting in the construction queue.
#[derive(Debug)]
struct WeightedNode {
    node: Node,
    lowest_symbol: usize,
    weight: u64,
}

impl WeightedNode {
    fn leaf(symbol: usize, freq: u32) -> Self {
        Self {
            node: Node::Leaf(symbol),
            lowest_symbol: symbol,
            weight: freq as u64,
        }
    }
}

// Ordering for the heap (min-heap: lightest first, then lowest symbol)
impl PartialEq for WeightedNode {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.lowest_symbol == other.lowest_symbol
    }
}

impl Eq for WeightedNode {}

impl PartialOrd for WeightedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WeightedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.lowest_symbol.cmp(&self.lowest_symbol))
    }
}
