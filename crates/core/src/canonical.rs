//! Canonical Huffman codes: a code described only by per-symbol code lengths.
//!
//! The bit strings are recovered from the lengths alone. Shorter codes get
//! lexicographically lower bit strings, and among codes of equal length the
//! lower symbol gets the lower bit string:
//!
//! ```text
//!   Lengths:  A=1  B=3  C=0  D=2  E=3
//!   Sorted:   A=1  D=2  B=3  E=3   (C has no code)
//!   Codes:    A=0  D=10 B=110 E=111
//! ```
//!
//! This is what makes it possible to transmit a code as a table of lengths
//! instead of a tree shape.

use crate::error::{Result, StructureError, ValidationError};
use crate::tree::{CodeTree, InternalNode, Node};

/// An immutable, validated array of code lengths. Length 0 means "no code".
///
/// # Invariants
/// - At least 2 entries
/// - The positive lengths satisfy Kraft's equality (a complete binary tree)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCode {
    code_lengths: Vec<u32>,
}

impl CanonicalCode {
    /// Validate a code-length array.
    ///
    /// # Errors
    /// - `ValidationError::TooFewSymbols` if fewer than 2 lengths are given;
    ///   this includes `[1]`, which is reported here rather than as under-full
    /// - `StructureError::UnderFull` if the lengths leave unfilled leaf slots,
    ///   e.g. `[3, 0, 3]` or `[1, 2, 3]`
    /// - `StructureError::OverFull` if they need more leaves than fit,
    ///   e.g. `[1, 1, 1]` or `[1, 1, 2, 2, 3, 3, 3, 3]`
    pub fn new(code_lengths: Vec<u32>) -> Result<Self> {
        if code_lengths.len() < 2 {
            return Err(ValidationError::TooFewSymbols {
                count: code_lengths.len(),
            }
            .into());
        }
        check_complete(&code_lengths)?;
        Ok(Self { code_lengths })
    }

    /// Read the code lengths off a code tree: each leaf's depth.
    ///
    /// # Errors
    /// - `ValidationError::TooFewSymbols` if `symbol_limit < 2`
    /// - `StructureError::SymbolExceedsLimit` / `DuplicateSymbol` for a
    ///   leaf that does not fit into `symbol_limit` entries
    pub fn from_code_tree(tree: &CodeTree, symbol_limit: usize) -> Result<Self> {
        if symbol_limit < 2 {
            return Err(ValidationError::TooFewSymbols {
                count: symbol_limit,
            }
            .into());
        }
        let mut code_lengths = vec![0; symbol_limit];
        let root = tree.root();
        record_depths(&root.left, 1, &mut code_lengths)?;
        record_depths(&root.right, 1, &mut code_lengths)?;
        Ok(Self { code_lengths })
    }

    /// Number of symbols covered (always at least 2).
    pub fn symbol_limit(&self) -> usize {
        self.code_lengths.len()
    }

    /// Code length of `symbol`, 0 if it has no code.
    pub fn code_length(&self, symbol: usize) -> Result<u32> {
        self.code_lengths.get(symbol).copied().ok_or_else(|| {
            ValidationError::SymbolOutOfRange {
                symbol,
                limit: self.code_lengths.len(),
            }
            .into()
        })
    }

    pub fn code_lengths(&self) -> &[u32] {
        &self.code_lengths
    }

    /// Rebuild the canonical code tree for these lengths.
    ///
    /// Works upward from the deepest level. At each level, leaves for the
    /// symbols of that length are created in ascending symbol order, then
    /// the nodes carried up from the level below are paired off in order and
    /// appended behind them.
    ///
    /// # Errors
    /// `StructureError::CanonicalInvariant` if a level ends up with an odd
    /// number of nodes to pair, or anything other than a single root remains.
    pub fn to_code_tree(&self) -> Result<CodeTree> {
        let max_length = self.code_lengths.iter().copied().max().unwrap_or(0);

        let mut by_length: Vec<Vec<usize>> = vec![Vec::new(); max_length as usize + 1];
        for (symbol, &length) in self.code_lengths.iter().enumerate() {
            if length > 0 {
                by_length[length as usize].push(symbol);
            }
        }

        let mut nodes: Vec<Node> = Vec::new();
        for length in (0..=max_length).rev() {
            if nodes.len() % 2 != 0 {
                return Err(StructureError::CanonicalInvariant {
                    length,
                    nodes: nodes.len(),
                }
                .into());
            }

            let mut level: Vec<Node> = by_length[length as usize]
                .iter()
                .map(|&symbol| Node::Leaf(symbol))
                .collect();

            let mut deeper = nodes.into_iter();
            while let (Some(left), Some(right)) = (deeper.next(), deeper.next()) {
                level.push(InternalNode::new(left, right).into());
            }
            nodes = level;
        }

        let count = nodes.len();
        match nodes.pop() {
            Some(Node::Internal(root)) if count == 1 => CodeTree::new(root, self.code_lengths.len()),
            _ => Err(StructureError::CanonicalInvariant {
                length: 0,
                nodes: count,
            }
            .into()),
        }
    }
}

/// Check Kraft's equality with a level sweep over the sorted lengths.
///
/// `slots` counts the free positions at `level` in a tree being filled from
/// the top. Descending one level doubles them; each code takes one. Running
/// out of slots means over-full; slots left over at the end mean under-full.
/// Once free slots outnumber the codes still to place, the result is
/// already under-full, which also keeps the doubling loop short for huge
/// length gaps.
fn check_complete(code_lengths: &[u32]) -> Result<()> {
    let mut lengths: Vec<u32> = code_lengths.iter().copied().filter(|&l| l > 0).collect();
    lengths.sort_unstable();

    let total = lengths.len();
    let mut slots: usize = 1;
    let mut level: u32 = 0;

    for (placed, &length) in lengths.iter().enumerate() {
        let remaining = total - placed;
        while level < length {
            if slots > remaining {
                return Err(StructureError::UnderFull.into());
            }
            slots *= 2;
            level += 1;
        }
        if slots == 0 {
            return Err(StructureError::OverFull.into());
        }
        slots -= 1;
    }

    if slots > 0 {
        return Err(StructureError::UnderFull.into());
    }
    Ok(())
}

fn record_depths(node: &Node, depth: u32, code_lengths: &mut [u32]) -> Result<()> {
    match node {
        Node::Internal(internal) => {
            record_depths(&internal.left, depth + 1, code_lengths)?;
            record_depths(&internal.right, depth + 1, code_lengths)?;
        }
        Node::Leaf(symbol) => {
            let limit = code_lengths.len();
            let slot = code_lengths
                .get_mut(*symbol)
                .ok_or(StructureError::SymbolExceedsLimit {
                    symbol: *symbol,
                    limit,
                })?;
            if *slot != 0 {
                return Err(StructureError::DuplicateSymbol { symbol: *symbol }.into());
            }
            *slot = depth;
        }
    }
    Ok(())
}
