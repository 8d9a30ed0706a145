//! Read-only structural dumps of a tree.
//!
//! A [`TreeSnapshot`] captures everything a rendering layer needs: every
//! symbol leaf with its code and weight, the NYT code, and a pre-order walk
//! of all nodes with their positional codes. Its `Display` form is the
//! step-by-step trace printed by the driver.

use std::fmt;

use crate::bitio::BitString;
use crate::node::NodeId;
use crate::tree::AdaptiveTree;

/// A known symbol and its current code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SymbolEntry {
    pub symbol: u8,
    pub code: String,
    pub weight: u64,
}

/// What a node in the positional walk is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NodeKind {
    Nyt,
    Leaf(u8),
    Internal,
}

/// One node of the positional walk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeEntry {
    /// Path from the root; empty for the root itself
    pub code: String,
    pub weight: u64,
    pub rank: u32,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TreeSnapshot {
    /// Symbol leaves, ascending by symbol
    pub symbols: Vec<SymbolEntry>,
    pub nyt_code: String,
    /// All nodes in pre-order, left subtree first
    pub nodes: Vec<NodeEntry>,
}

impl TreeSnapshot {
    /// Entry for `symbol`, if it has been seen.
    pub fn symbol(&self, symbol: u8) -> Option<&SymbolEntry> {
        self.symbols.iter().find(|entry| entry.symbol == symbol)
    }
}

impl AdaptiveTree {
    /// Capture the current state for display or comparison.
    pub fn snapshot(&self) -> TreeSnapshot {
        let symbols = self
            .symbols()
            .filter_map(|symbol| {
                let leaf = self.leaf_for(symbol)?;
                Some(SymbolEntry {
                    symbol,
                    code: self.path_to(leaf).to_string(),
                    weight: self.node(leaf).weight(),
                })
            })
            .collect();

        let mut nodes = Vec::with_capacity(self.node_count());
        let mut stack: Vec<(NodeId, BitString)> = vec![(self.root(), BitString::new())];
        while let Some((id, code)) = stack.pop() {
            let node = self.node(id);
            let kind = match node.symbol() {
                _ if node.is_nyt() => NodeKind::Nyt,
                Some(symbol) => NodeKind::Leaf(symbol),
                None => NodeKind::Internal,
            };

            // Right pushed first so the left subtree is visited first.
            for (bit, child) in [(true, node.right()), (false, node.left())] {
                if let Some(child) = child {
                    let mut child_code = code.clone();
                    child_code.push(bit);
                    stack.push((child, child_code));
                }
            }

            nodes.push(NodeEntry {
                code: code.to_string(),
                weight: node.weight(),
                rank: node.rank(),
                kind,
            });
        }

        TreeSnapshot {
            symbols,
            nyt_code: self.nyt_code().to_string(),
            nodes,
        }
    }
}

/// Printable form of a symbol: the character itself when printable,
/// otherwise its hex value.
fn label(symbol: u8) -> String {
    let c = symbol as char;
    if c.is_ascii_graphic() || c == ' ' {
        format!("'{c}'")
    } else {
        format!("{symbol:#04x}")
    }
}

impl fmt::Display for TreeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.symbols {
            writeln!(
                f,
                "symbol {} with code {} and count {}",
                label(entry.symbol),
                entry.code,
                entry.weight
            )?;
        }
        writeln!(f, "NYT node with code {} and count 0", self.nyt_code)?;

        for entry in &self.nodes {
            let name = match entry.kind {
                NodeKind::Nyt => "NYT".to_string(),
                NodeKind::Leaf(symbol) => label(symbol),
                NodeKind::Internal => "*".to_string(),
            };
            writeln!(f, "{name}: {} (weight: {}, rank: {})", entry.code, entry.weight, entry.rank)?;
        }
        Ok(())
    }
}

impl fmt::Display for AdaptiveTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.snapshot().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_after(message: &[u8]) -> AdaptiveTree {
        let mut tree = AdaptiveTree::new();
        for &symbol in message {
            tree.update(symbol).unwrap();
        }
        tree
    }

    #[test]
    fn test_empty_tree_snapshot() {
        let snapshot = AdaptiveTree::new().snapshot();
        assert!(snapshot.symbols.is_empty());
        assert_eq!(snapshot.nyt_code, "");
        assert_eq!(
            snapshot.nodes,
            vec![NodeEntry {
                code: String::new(),
                weight: 0,
                rank: 512,
                kind: NodeKind::Nyt,
            }]
        );
    }

    #[test]
    fn test_preorder_walk() {
        let snapshot = tree_after(b"ab").snapshot();
        let walk: Vec<(&str, NodeKind)> = snapshot
            .nodes
            .iter()
            .map(|entry| (entry.code.as_str(), entry.kind))
            .collect();

        assert_eq!(
            walk,
            vec![
                ("", NodeKind::Internal),
                ("0", NodeKind::Internal),
                ("00", NodeKind::Nyt),
                ("01", NodeKind::Leaf(b'a')),
                ("1", NodeKind::Leaf(b'b')),
            ]
        );
    }

    #[test]
    fn test_symbol_lookup() {
        let snapshot = tree_after(b"aacbdad").snapshot();
        let d = snapshot.symbol(b'd').unwrap();
        assert_eq!(d.code, "11");
        assert_eq!(d.weight, 2);
        assert!(snapshot.symbol(b'z').is_none());
    }

    #[test]
    fn test_display() {
        let text = tree_after(b"aa").to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "symbol 'a' with code 1 and count 2",
                "NYT node with code 0 and count 0",
                "*:  (weight: 2, rank: 510)",
                "NYT: 0 (weight: 0, rank: 512)",
                "'a': 1 (weight: 2, rank: 511)",
            ]
        );
    }

    #[test]
    fn test_display_escapes_control_symbols() {
        let text = tree_after(b"\n").to_string();
        assert!(text.starts_with("symbol 0x0a with code 1 and count 1"));
    }
}
