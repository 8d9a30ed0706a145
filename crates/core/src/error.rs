//! Error types for the adaptive Huffman codec.
//!
//! Every user-facing failure is a structured error. Conditions that can only
//! arise from a broken tree (dangling links, a missing root) are internal
//! invariant failures and panic instead.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Alphabet: a symbol outside the 8-bit code unit range
/// - Wire format: a bit string containing something other than `0`/`1`
/// - Truncation: the bit stream ended inside a code or a literal escape
/// - Capacity: the rank counter cannot number another pair of nodes
/// - Bit I/O and file I/O
#[derive(Debug, Error)]
pub enum Error {
    /// Symbol is not representable as a single 8-bit code unit
    #[error("unsupported symbol U+{code_point:04X}: alphabet is limited to 8-bit code units")]
    UnsupportedSymbol { code_point: u32 },

    /// Wire-format character that is neither `0` nor `1`
    #[error("invalid bit symbol {found:?} at position {position}")]
    InvalidSymbol { position: usize, found: char },

    /// NYT was reached but fewer than 8 bits remain for the literal
    #[error("truncated literal escape at bit {position}: need 8 bits, {available} available")]
    TruncatedLiteral { position: usize, available: usize },

    /// Bit stream ended before the walk from the root reached a leaf
    #[error("bit stream ended inside a code at bit {position}")]
    TruncatedCode { position: usize },

    /// Rank counter exhausted: no room for another symbol
    #[error("node capacity exhausted: rank ceiling {capacity} admits no further symbols")]
    CapacityExhausted { capacity: u32 },

    /// Bit cursor operation failed
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit-level cursor errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the bit string
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Attempted to read more bits than available
    #[error("insufficient bits: requested {requested}, available {available}")]
    InsufficientBits { requested: usize, available: usize },
}

/// A broken structural invariant of the tree.
///
/// Never produced by correct code; reported by
/// [`AdaptiveTree::check_invariants`](crate::tree::AdaptiveTree::check_invariants).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("tree invariant violated: {0}")]
pub struct InvariantViolation(pub String);

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
