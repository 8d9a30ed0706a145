//! Tree configuration.
//!
//! Nodes are numbered from a fixed ceiling downward, so the ceiling bounds
//! how many nodes one session can create. Encoder and decoder must agree on
//! it only in the sense that both need enough room for the message's
//! alphabet; ranks never appear on the wire.

/// Number of distinct symbols in the 8-bit alphabet.
pub const ALPHABET_SIZE: usize = 256;

/// Default rank ceiling. Ranks run 512 down to 0, which numbers the 513
/// nodes of a tree holding the full alphabet.
pub const DEFAULT_RANK_CEILING: u32 = 512;

/// Configuration for an [`AdaptiveTree`](crate::tree::AdaptiveTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Rank given to the initial NYT node; every later node takes the next
    /// lower rank.
    pub rank_ceiling: u32,
}

impl TreeConfig {
    pub fn new(rank_ceiling: u32) -> Self {
        Self { rank_ceiling }
    }

    /// Smallest ceiling that admits `symbols` distinct symbols.
    ///
    /// A tree with `n` symbols has `2n + 1` nodes, numbered `2n..=0`.
    pub fn for_alphabet(symbols: usize) -> Self {
        let symbols = symbols.min(ALPHABET_SIZE) as u32;
        Self {
            rank_ceiling: symbols * 2,
        }
    }

    /// How many distinct symbols this ceiling admits, capped at the alphabet.
    pub fn max_symbols(&self) -> usize {
        ((self.rank_ceiling / 2) as usize).min(ALPHABET_SIZE)
    }

    /// Maximum number of nodes a tree under this config can hold.
    pub fn node_capacity(&self) -> usize {
        self.rank_ceiling as usize + 1
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            rank_ceiling: DEFAULT_RANK_CEILING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_admits_full_alphabet() {
        let config = TreeConfig::default();
        assert_eq!(config.max_symbols(), ALPHABET_SIZE);
        assert_eq!(config.node_capacity(), 2 * ALPHABET_SIZE + 1);
    }

    #[test]
    fn test_for_alphabet() {
        assert_eq!(TreeConfig::for_alphabet(0).rank_ceiling, 0);
        assert_eq!(TreeConfig::for_alphabet(3).rank_ceiling, 6);
        assert_eq!(TreeConfig::for_alphabet(3).max_symbols(), 3);
        assert_eq!(TreeConfig::for_alphabet(10_000), TreeConfig::default());
    }

    #[test]
    fn test_odd_ceiling_rounds_down() {
        assert_eq!(TreeConfig::new(7).max_symbols(), 3);
    }
}
