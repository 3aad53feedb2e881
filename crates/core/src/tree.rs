//! Code trees: the binary tree that maps symbols to bit strings.
//!
//! The path from the root to a leaf is that leaf's code: descending to the
//! left child appends a 0, descending to the right child appends a 1.
//!
//! ```text
//!   Codes:          Tree:
//!     0:   A            .
//!     10:  B           / \
//!     110: C          A   .
//!     111: D             / \
//!                       B   .
//!                          / \
//!                         C   D
//! ```
//!
//! # Invariants
//! - The root is always an internal node (enforced by the type)
//! - Every leaf symbol is below the tree's symbol limit
//! - No symbol appears in more than one leaf
//! - Not every symbol below the limit needs a leaf
//!
//! A tree is immutable once built. Rebuilding after a statistics change
//! produces a fresh `CodeTree`.

use std::fmt;

use crate::error::{Result, StructureError, ValidationError};

/// A node of a code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(usize),
    Internal(InternalNode),
}

/// A node with exactly two children, each exclusively owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalNode {
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl InternalNode {
    pub fn new(left: Node, right: Node) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Child selected by one code bit (`false` = left, `true` = right).
    pub fn child(&self, bit: bool) -> &Node {
        if bit {
            &self.right
        } else {
            &self.left
        }
    }
}

impl From<InternalNode> for Node {
    fn from(node: InternalNode) -> Self {
        Node::Internal(node)
    }
}

/// An immutable code tree plus the derived symbol -> code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    root: InternalNode,
    /// `codes[s]` is the bit string for symbol `s`, or `None` if it has no leaf.
    codes: Vec<Option<Vec<bool>>>,
}

impl CodeTree {
    /// Build a code tree over symbols `0..symbol_limit`.
    ///
    /// # Errors
    /// - `ValidationError::TooFewSymbols` if `symbol_limit < 2`
    /// - `StructureError::SymbolExceedsLimit` if a leaf symbol is `>= symbol_limit`
    /// - `StructureError::DuplicateSymbol` if a symbol appears in two leaves
    pub fn new(root: InternalNode, symbol_limit: usize) -> Result<Self> {
        if symbol_limit < 2 {
            return Err(ValidationError::TooFewSymbols {
                count: symbol_limit,
            }
            .into());
        }

        let mut codes = vec![None; symbol_limit];
        let mut prefix = Vec::new();
        collect_codes(&root.left, false, &mut prefix, &mut codes)?;
        collect_codes(&root.right, true, &mut prefix, &mut codes)?;

        Ok(Self { root, codes })
    }

    pub fn root(&self) -> &InternalNode {
        &self.root
    }

    pub fn symbol_limit(&self) -> usize {
        self.codes.len()
    }

    /// Return the code for `symbol`: a non-empty sequence of bits.
    ///
    /// # Errors
    /// - `ValidationError::SymbolOutOfRange` if `symbol >= symbol_limit`
    /// - `ValidationError::NoCode` if no leaf carries `symbol`
    pub fn code(&self, symbol: usize) -> Result<&[bool]> {
        match self.codes.get(symbol) {
            None => Err(ValidationError::SymbolOutOfRange {
                symbol,
                limit: self.codes.len(),
            }
            .into()),
            Some(None) => Err(ValidationError::NoCode { symbol }.into()),
            Some(Some(code)) => Ok(code),
        }
    }
}

fn collect_codes(
    node: &Node,
    bit: bool,
    prefix: &mut Vec<bool>,
    codes: &mut [Option<Vec<bool>>],
) -> Result<()> {
    prefix.push(bit);
    match node {
        Node::Internal(internal) => {
            collect_codes(&internal.left, false, prefix, codes)?;
            collect_codes(&internal.right, true, prefix, codes)?;
        }
        Node::Leaf(symbol) => {
            let limit = codes.len();
            let slot = codes
                .get_mut(*symbol)
                .ok_or(StructureError::SymbolExceedsLimit {
                    symbol: *symbol,
                    limit,
                })?;
            if slot.is_some() {
                return Err(StructureError::DuplicateSymbol { symbol: *symbol }.into());
            }
            *slot = Some(prefix.clone());
        }
    }
    prefix.pop();
    Ok(())
}

/// Debug rendering, one `Code <bits>: Symbol <n>` line per leaf in tree order.
impl fmt::Display for CodeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn walk(node: &Node, prefix: &mut String, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match node {
                Node::Internal(internal) => {
                    prefix.push('0');
                    walk(&internal.left, prefix, f)?;
                    prefix.pop();
                    prefix.push('1');
                    walk(&internal.right, prefix, f)?;
                    prefix.pop();
                    Ok(())
                }
                Node::Leaf(symbol) => writeln!(f, "Code {}: Symbol {}", prefix, symbol),
            }
        }

        walk(&self.root.left, &mut String::from("0"), f)?;
        walk(&self.root.right, &mut String::from("1"), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    // 0: A, 10: B, 110: C, 111: D  with A=0, B=1, C=2, D=3
    fn sample_tree() -> InternalNode {
        InternalNode::new(
            Node::Leaf(0),
            InternalNode::new(
                Node::Leaf(1),
                InternalNode::new(Node::Leaf(2), Node::Leaf(3)).into(),
            )
            .into(),
        )
    }

    #[test]
    fn test_codes_follow_paths() {
        let tree = CodeTree::new(sample_tree(), 4).unwrap();
        assert_eq!(tree.code(0).unwrap(), &[false]);
        assert_eq!(tree.code(1).unwrap(), &[true, false]);
        assert_eq!(tree.code(2).unwrap(), &[true, true, false]);
        assert_eq!(tree.code(3).unwrap(), &[true, true, true]);
    }

    #[test]
    fn test_symbol_without_leaf() {
        let tree = CodeTree::new(sample_tree(), 6).unwrap();
        assert!(matches!(
            tree.code(5),
            Err(Error::Validation(ValidationError::NoCode { symbol: 5 }))
        ));
        assert!(matches!(
            tree.code(6),
            Err(Error::Validation(ValidationError::SymbolOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_symbol_exceeds_limit() {
        let result = CodeTree::new(sample_tree(), 3);
        assert!(matches!(
            result,
            Err(Error::Structure(StructureError::SymbolExceedsLimit {
                symbol: 3,
                limit: 3
            }))
        ));
    }

    #[test]
    fn test_duplicate_symbol() {
        let root = InternalNode::new(
            Node::Leaf(1),
            InternalNode::new(Node::Leaf(0), Node::Leaf(1)).into(),
        );
        assert!(matches!(
            CodeTree::new(root, 4),
            Err(Error::Structure(StructureError::DuplicateSymbol { symbol: 1 }))
        ));
    }

    #[test]
    fn test_symbol_limit_too_small() {
        let root = InternalNode::new(Node::Leaf(0), Node::Leaf(0));
        assert!(matches!(
            CodeTree::new(root, 1),
            Err(Error::Validation(ValidationError::TooFewSymbols { count: 1 }))
        ));
    }

    #[test]
    fn test_display() {
        let tree = CodeTree::new(sample_tree(), 4).unwrap();
        assert_eq!(
            tree.to_string(),
            "Code 0: Symbol 0\nCode 10: Symbol 1\nCode 110: Symbol 2\nCode 111: Symbol 3\n"
        );
    }
}
