//! Tree vertices.
//!
//! Nodes live in an arena owned by [`AdaptiveTree`](crate::tree::AdaptiveTree)
//! and refer to each other by [`NodeId`]. Child links are owning in the
//! logical sense; `parent` is a back-reference used only to climb.

/// Stable handle to a node in its tree's arena.
///
/// Handles never move: nodes are appended and never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One vertex of the adaptive tree.
///
/// Fields are crate-private: only the tree mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) symbol: Option<u8>,
    pub(crate) weight: u64,
    pub(crate) rank: u32,
    pub(crate) nyt: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(symbol: Option<u8>, weight: u64, rank: u32) -> Self {
        Self {
            symbol,
            weight,
            rank,
            nyt: false,
            parent: None,
            left: None,
            right: None,
        }
    }

    pub(crate) fn nyt(rank: u32) -> Self {
        Self {
            nyt: true,
            ..Self::new(None, 0, rank)
        }
    }

    /// Symbol stored on a symbol leaf; `None` for NYT and internal nodes.
    pub fn symbol(&self) -> Option<u8> {
        self.symbol
    }

    /// Occurrence count.
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Order number. Swaps exchange ranks, so rank follows position.
    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn is_nyt(&self) -> bool {
        self.nyt
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Child on the side selected by `bit` (`false` = left).
    pub fn child(&self, bit: bool) -> Option<NodeId> {
        if bit {
            self.right
        } else {
            self.left
        }
    }
}
