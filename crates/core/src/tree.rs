//! The adaptive Huffman tree.
//!
//! Encoder and decoder each own one [`AdaptiveTree`]. Both start from a lone
//! NYT root and call [`AdaptiveTree::update`] once per symbol, in order, so
//! their trees evolve identically without any table being transmitted.
//!
//! # Update procedure
//!
//! - First occurrence: the NYT leaf is split into an internal node whose left
//!   child is the NYT and whose right child is a new leaf of weight 1. The
//!   climb starts at the new leaf: the leaf itself is only offered a swap,
//!   every node above it is incremented and then offered a swap.
//! - Repeat occurrence: the climb starts at the symbol's leaf and at every
//!   node offers a swap first, then increments.
//!
//! The two climbs are deliberately not the same; both sides run the same
//! procedure, which is all synchrony requires.
//!
//! # Swaps
//!
//! A non-root node is swapped with the highest-ranked non-NYT node of equal
//! weight when that node outranks it and neither is an ancestor of the other.
//! Positions and ranks are exchanged; weights and subtrees travel with the
//! nodes. The candidate scan is linear in the number of nodes.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::bitio::{BitCursor, BitString};
use crate::config::{TreeConfig, ALPHABET_SIZE};
use crate::error::{Error, InvariantViolation, Result};
use crate::node::{Node, NodeId};

/// An adaptive Huffman tree over the 8-bit alphabet.
///
/// Nodes are stored in an arena and linked by [`NodeId`]. The arena only
/// grows: two nodes per distinct symbol.
#[derive(Debug, Clone)]
pub struct AdaptiveTree {
    /// Arena; index = `NodeId`
    nodes: Vec<Node>,
    root: NodeId,
    nyt: NodeId,
    /// Leaf of every symbol seen so far
    leaves: [Option<NodeId>; ALPHABET_SIZE],
    /// Next rank to hand out; `None` once rank 0 is taken
    next_rank: Option<u32>,
    config: TreeConfig,
    swaps: u64,
}

impl AdaptiveTree {
    /// Create a tree with the default rank ceiling.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create a tree whose single NYT root carries `config.rank_ceiling`.
    pub fn with_config(config: TreeConfig) -> Self {
        let nyt = NodeId(0);
        Self {
            nodes: vec![Node::nyt(config.rank_ceiling)],
            root: nyt,
            nyt,
            leaves: [None; ALPHABET_SIZE],
            next_rank: config.rank_ceiling.checked_sub(1),
            config,
            swaps: 0,
        }
    }

    pub fn config(&self) -> TreeConfig {
        self.config
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The current NYT leaf.
    pub fn nyt(&self) -> NodeId {
        self.nyt
    }

    /// Look up a node.
    ///
    /// # Panics
    /// If `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Leaf holding `symbol`, or `None` if it has not been seen.
    pub fn leaf_for(&self, symbol: u8) -> Option<NodeId> {
        self.leaves[symbol as usize]
    }

    /// Symbols seen so far, ascending.
    pub fn symbols(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(|&s| self.leaves[s as usize].is_some())
    }

    pub fn distinct_symbols(&self) -> usize {
        (self.nodes.len() - 1) / 2
    }

    /// Number of swaps performed since creation.
    pub fn swap_count(&self) -> u64 {
        self.swaps
    }

    /// Number of edges between the root and `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Root-to-node path: `0` for a left edge, `1` for a right edge.
    pub fn path_to(&self, id: NodeId) -> BitString {
        let mut path = BitString::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            path.push(self.nodes[parent.0].right == Some(current));
            current = parent;
        }
        path.reverse();
        path
    }

    /// Current code of a known symbol.
    pub fn code_for(&self, symbol: u8) -> Option<BitString> {
        self.leaf_for(symbol).map(|leaf| self.path_to(leaf))
    }

    /// Current path to the NYT leaf.
    pub fn nyt_code(&self) -> BitString {
        self.path_to(self.nyt)
    }

    /// Code to transmit for `symbol` in the current state.
    ///
    /// A known symbol is sent as its leaf's path. An unseen symbol is sent as
    /// the NYT path followed by its 8-bit literal. Does not modify the tree.
    pub fn encode_path(&self, symbol: u8) -> BitString {
        match self.leaf_for(symbol) {
            Some(leaf) => self.path_to(leaf),
            None => {
                let mut code = self.nyt_code();
                code.push_literal(symbol);
                code
            }
        }
    }

    /// Walk from the root, one bit per edge, until a leaf is reached.
    ///
    /// Returns a non-leaf only when `bits` runs out mid-walk; the caller
    /// decides whether that is an error.
    pub fn decode_step(&self, bits: &mut BitCursor<'_>) -> NodeId {
        let mut current = self.root;
        loop {
            let node = &self.nodes[current.0];
            if node.is_leaf() {
                return current;
            }
            let Ok(bit) = bits.read_bit() else {
                return current;
            };
            current = match node.child(bit) {
                Some(child) => child,
                None => unreachable!("internal node {current:?} is missing a child"),
            };
        }
    }

    /// Record one occurrence of `symbol`.
    ///
    /// Must be called for every processed symbol, in order, by encoder and
    /// decoder alike.
    ///
    /// # Errors
    /// `Error::CapacityExhausted` if `symbol` is new and the rank counter
    /// cannot number two more nodes. The tree is unchanged in that case.
    pub fn update(&mut self, symbol: u8) -> Result<()> {
        match self.leaf_for(symbol) {
            Some(leaf) => self.climb_repeat(leaf),
            None => self.admit(symbol)?,
        }

        #[cfg(debug_assertions)]
        {
            if let Err(violation) = self.check_invariants() {
                panic!("{violation} after update({symbol:#04x})");
            }
        }

        Ok(())
    }

    /// Ranks still available to new nodes.
    fn remaining_ranks(&self) -> usize {
        self.next_rank.map_or(0, |rank| rank as usize + 1)
    }

    fn take_rank(&mut self) -> Result<u32> {
        let rank = self.next_rank.ok_or(Error::CapacityExhausted {
            capacity: self.config.rank_ceiling,
        })?;
        self.next_rank = rank.checked_sub(1);
        Ok(rank)
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Split the NYT leaf to make room for `symbol`, then climb.
    fn admit(&mut self, symbol: u8) -> Result<()> {
        if self.remaining_ranks() < 2 {
            return Err(Error::CapacityExhausted {
                capacity: self.config.rank_ceiling,
            });
        }

        let leaf_rank = self.take_rank()?;
        let internal_rank = self.take_rank()?;
        let leaf = self.push(Node::new(Some(symbol), 1, leaf_rank));
        let internal = self.push(Node::new(None, 0, internal_rank));
        let nyt = self.nyt;

        match self.nodes[nyt.0].parent {
            Some(parent) => {
                self.replace_child(parent, nyt, internal);
                self.nodes[internal.0].parent = Some(parent);
            }
            None => self.root = internal,
        }

        self.nodes[internal.0].left = Some(nyt);
        self.nodes[internal.0].right = Some(leaf);
        self.nodes[nyt.0].parent = Some(internal);
        self.nodes[leaf.0].parent = Some(internal);
        self.leaves[symbol as usize] = Some(leaf);

        debug!(symbol, leaf_rank, internal_rank, "admitted new symbol");

        let mut current = Some(leaf);
        while let Some(id) = current {
            if id != leaf {
                self.nodes[id.0].weight += 1;
            }
            self.attempt_swap(id);
            current = self.nodes[id.0].parent;
        }
        Ok(())
    }

    fn climb_repeat(&mut self, leaf: NodeId) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            self.attempt_swap(id);
            self.nodes[id.0].weight += 1;
            current = self.nodes[id.0].parent;
        }
    }

    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        let node = &mut self.nodes[parent.0];
        if node.left == Some(old) {
            node.left = Some(new);
        } else {
            node.right = Some(new);
        }
    }

    /// Highest-ranked non-NYT node with the given weight.
    fn leader_of_weight(&self, weight: u64) -> Option<NodeId> {
        self.nodes()
            .filter(|(_, node)| !node.nyt && node.weight == weight)
            .max_by_key(|(_, node)| node.rank)
            .map(|(id, _)| id)
    }

    /// True if `ancestor` lies strictly above `id`.
    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes[parent.0].parent;
        }
        false
    }

    fn attempt_swap(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }

        let Some(candidate) = self.leader_of_weight(self.nodes[id.0].weight) else {
            return;
        };

        if candidate == id
            || self.nodes[candidate.0].rank <= self.nodes[id.0].rank
            || self.is_ancestor(candidate, id)
            || self.is_ancestor(id, candidate)
        {
            return;
        }

        self.swap(id, candidate);
    }

    /// Exchange the positions and ranks of two unrelated non-root nodes.
    ///
    /// All links are read before any is written, so siblings swap correctly.
    fn swap(&mut self, a: NodeId, b: NodeId) {
        let (Some(a_parent), Some(b_parent)) = (self.nodes[a.0].parent, self.nodes[b.0].parent)
        else {
            unreachable!("swap partners {a:?} and {b:?} must both have parents");
        };
        let a_is_left = self.nodes[a_parent.0].left == Some(a);
        let b_is_left = self.nodes[b_parent.0].left == Some(b);

        self.set_child(a_parent, a_is_left, b);
        self.set_child(b_parent, b_is_left, a);
        self.nodes[a.0].parent = Some(b_parent);
        self.nodes[b.0].parent = Some(a_parent);

        let a_rank = self.nodes[a.0].rank;
        self.nodes[a.0].rank = self.nodes[b.0].rank;
        self.nodes[b.0].rank = a_rank;
        self.swaps += 1;

        trace!(
            node = a.0,
            candidate = b.0,
            weight = self.nodes[a.0].weight,
            "swapped nodes"
        );
    }

    fn set_child(&mut self, parent: NodeId, left: bool, child: NodeId) {
        let node = &mut self.nodes[parent.0];
        if left {
            node.left = Some(child);
        } else {
            node.right = Some(child);
        }
    }

    /// Verify the structural invariants of the tree.
    ///
    /// Checks strict binary shape, parent/child agreement, reachability of
    /// every node exactly once, rank uniqueness, the single NYT leaf, and the
    /// symbol-to-leaf map.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantViolation> {
        let fail = |msg: String| -> std::result::Result<(), InvariantViolation> {
            Err(InvariantViolation(msg))
        };

        if self.nodes[self.root.0].parent.is_some() {
            return fail(format!("root {:?} has a parent", self.root));
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut visited[id.0], true) {
                return fail(format!("node {id:?} reached twice"));
            }
            let node = &self.nodes[id.0];
            match (node.left, node.right) {
                (None, None) => {}
                (Some(left), Some(right)) => {
                    for child in [left, right] {
                        if self.nodes[child.0].parent != Some(id) {
                            return fail(format!("child {child:?} does not point back to {id:?}"));
                        }
                        stack.push(child);
                    }
                    if node.symbol.is_some() || node.nyt {
                        return fail(format!("internal node {id:?} carries a leaf marker"));
                    }
                }
                _ => return fail(format!("node {id:?} has exactly one child")),
            }
        }
        if let Some(orphan) = visited.iter().position(|seen| !seen) {
            return fail(format!("node {orphan} is unreachable from the root"));
        }

        let ranks: HashSet<u32> = self.nodes.iter().map(|node| node.rank).collect();
        if ranks.len() != self.nodes.len() {
            return fail("ranks are not unique".to_string());
        }

        let nyt_count = self.nodes.iter().filter(|node| node.nyt).count();
        let nyt = &self.nodes[self.nyt.0];
        if nyt_count != 1 || !nyt.nyt || !nyt.is_leaf() || nyt.weight != 0 || nyt.symbol.is_some() {
            return fail(format!("NYT {:?} is not the sole empty leaf", self.nyt));
        }

        for (id, node) in self.nodes() {
            if !node.is_leaf() || node.nyt {
                continue;
            }
            let Some(symbol) = node.symbol else {
                return fail(format!("leaf {id:?} has no symbol"));
            };
            if node.weight == 0 {
                return fail(format!("symbol leaf {id:?} has zero weight"));
            }
            if self.leaves[symbol as usize] != Some(id) {
                return fail(format!("symbol {symbol:#04x} does not map to leaf {id:?}"));
            }
        }
        if self.leaves.iter().flatten().count() != self.distinct_symbols() {
            return fail("symbol map and arena disagree".to_string());
        }

        Ok(())
    }
}

impl Default for AdaptiveTree {
    fn default() -> Self {
        Self::new()
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

    fn code(tree: &AdaptiveTree, symbol: u8) -> String {
        tree.code_for(symbol).unwrap().to_string()
    }

    #[test]
    fn test_new_tree_is_lone_nyt() {
        let tree = AdaptiveTree::new();
        assert_eq!(tree.root(), tree.nyt());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.node(tree.root()).rank(), 512);
        assert!(tree.nyt_code().is_empty());
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_first_symbol_is_bare_literal() {
        let tree = AdaptiveTree::new();
        assert_eq!(tree.encode_path(b'a').to_string(), "01100001");
    }

    #[test]
    fn test_encode_path_has_no_side_effects() {
        let tree = tree_after(b"ab");
        let before = tree.clone().snapshot();
        tree.encode_path(b'a');
        tree.encode_path(b'z');
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn test_first_split() {
        let tree = tree_after(b"a");
        let root = tree.node(tree.root());
        let leaf = tree.leaf_for(b'a').unwrap();

        assert_eq!(root.left(), Some(tree.nyt()));
        assert_eq!(root.right(), Some(leaf));
        assert_eq!(root.weight(), 1);
        assert_eq!(root.rank(), 510);
        assert_eq!(tree.node(leaf).rank(), 511);
        assert_eq!(tree.nyt_code().to_string(), "0");
        assert_eq!(code(&tree, b'a'), "1");
    }

    #[test]
    fn test_second_symbol_swaps_with_first() {
        let tree = tree_after(b"ab");
        let a = tree.node(tree.leaf_for(b'a').unwrap());
        let b = tree.node(tree.leaf_for(b'b').unwrap());

        assert_eq!(code(&tree, b'a'), "01");
        assert_eq!(code(&tree, b'b'), "1");
        assert_eq!(tree.nyt_code().to_string(), "00");
        assert_eq!((a.rank(), b.rank()), (509, 511));
        assert_eq!(tree.swap_count(), 1);

        // The climb continued from b's new parent, so the split node was
        // never incremented.
        let split = tree.node(tree.node(tree.nyt()).parent().unwrap());
        assert_eq!(split.weight(), 0);
        assert_eq!(tree.node(tree.root()).weight(), 2);
    }

    #[test]
    fn test_repeat_symbol_shortens_code() {
        let mut tree = tree_after(b"a");
        assert_eq!(tree.encode_path(b'a').to_string(), "1");
        tree.update(b'a').unwrap();
        assert_eq!(code(&tree, b'a'), "1");
        assert_eq!(tree.node(tree.leaf_for(b'a').unwrap()).weight(), 2);
    }

    #[test]
    fn test_single_symbol_run_keeps_one_bit_code() {
        let mut tree = tree_after(b"a");
        for _ in 0..7 {
            assert_eq!(tree.encode_path(b'a').len(), 1);
            tree.update(b'a').unwrap();
        }
        assert_eq!(tree.node(tree.leaf_for(b'a').unwrap()).weight(), 8);
        assert_eq!(tree.swap_count(), 0);
    }

    #[test]
    fn test_pinned_state_after_aacbdad() {
        let tree = tree_after(b"aacbdad");

        assert_eq!(code(&tree, b'a'), "0");
        assert_eq!(code(&tree, b'b'), "1001");
        assert_eq!(code(&tree, b'c'), "101");
        assert_eq!(code(&tree, b'd'), "11");
        assert_eq!(tree.nyt_code().to_string(), "1000");
        assert_eq!(tree.swap_count(), 3);
        assert_eq!(tree.node(tree.root()).weight(), 7);

        let weights: Vec<u64> = [b'a', b'b', b'c', b'd']
            .iter()
            .map(|&s| tree.node(tree.leaf_for(s).unwrap()).weight())
            .collect();
        assert_eq!(weights, vec![3, 1, 1, 2]);
    }

    #[test]
    fn test_unseen_symbol_cost_is_nyt_depth_plus_literal() {
        let tree = tree_after(b"hello");
        let depth = tree.depth(tree.nyt());
        assert_eq!(tree.encode_path(b'z').len(), depth + 8);
        assert_eq!(tree.nyt_code().len(), depth);
    }

    #[test]
    fn test_decode_step_stops_at_leaf() {
        let tree = tree_after(b"ab");
        let bits: BitString = "1001".parse().unwrap();
        let mut cursor = BitCursor::new(&bits);

        assert_eq!(tree.decode_step(&mut cursor), tree.leaf_for(b'b').unwrap());
        assert_eq!(tree.decode_step(&mut cursor), tree.nyt());
        assert_eq!(tree.decode_step(&mut cursor), tree.leaf_for(b'b').unwrap());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_decode_step_on_fresh_tree_consumes_nothing() {
        let tree = AdaptiveTree::new();
        let bits: BitString = "0110".parse().unwrap();
        let mut cursor = BitCursor::new(&bits);
        assert_eq!(tree.decode_step(&mut cursor), tree.nyt());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_decode_step_exhausted_mid_walk() {
        let tree = tree_after(b"abc");
        let bits: BitString = "0".parse().unwrap();
        let mut cursor = BitCursor::new(&bits);
        let reached = tree.decode_step(&mut cursor);
        assert!(!tree.node(reached).is_leaf());
    }

    #[test]
    fn test_capacity_exhausted_leaves_tree_untouched() {
        let mut tree = AdaptiveTree::with_config(TreeConfig::for_alphabet(2));
        tree.update(b'x').unwrap();
        tree.update(b'y').unwrap();
        let before = tree.snapshot();

        let err = tree.update(b'z').unwrap_err();
        assert!(matches!(err, Error::CapacityExhausted { capacity: 4 }));
        assert_eq!(tree.snapshot(), before);
        assert_eq!(tree.node_count(), 5);

        tree.update(b'x').unwrap();
        assert_eq!(tree.node(tree.leaf_for(b'x').unwrap()).weight(), 2);
    }

    #[test]
    fn test_full_alphabet_fits_default_ceiling() {
        let mut tree = AdaptiveTree::new();
        for symbol in 0..=u8::MAX {
            tree.update(symbol).unwrap();
        }
        assert_eq!(tree.node_count(), 513);
        assert_eq!(tree.distinct_symbols(), 256);
        assert_eq!(tree.symbols().count(), 256);
        assert!(tree.nodes().any(|(_, node)| node.rank() == 0));
    }

    #[test]
    fn test_no_ancestor_swap_on_long_text() {
        // Updating 'n' offers swaps with a non-parent ancestor; taking them
        // would detach a subtree into a cycle.
        let tree = tree_after(b"adaptive huffman coding");
        tree.check_invariants().unwrap();
        assert_eq!(tree.distinct_symbols(), 16);
        assert_eq!(code(&tree, b' '), "00");
        assert_eq!(code(&tree, b'a'), "01");
        assert_eq!(tree.nyt_code().to_string(), "1000000000000");
    }

    #[test]
    fn test_invariants_hold_after_every_update() {
        let mut tree = AdaptiveTree::new();
        for &symbol in b"mississippi river banks" {
            tree.update(symbol).unwrap();
            tree.check_invariants().unwrap();
        }
    }
}
