//! adaptive-huffman-core: one-pass adaptive Huffman coding
//!
//! Encoder and decoder build their code trees incrementally, symbol by
//! symbol, instead of transmitting a frequency table. Both sides start from
//! the same single-node tree and apply the same deterministic update after
//! every symbol, so their trees stay identical.
//!
//! # Architecture
//!
//! - `node`: tree vertices addressed by arena handles
//! - `tree`: the adaptive tree (admission, increment, rank-restoring swaps,
//!   bit-level encode/decode traversal)
//! - `codec`: encoder and decoder sessions around one tree each
//! - `bitio`: the `0`/`1` wire format and a read cursor over it
//! - `snapshot`: read-only structural dumps for display
//! - `stats`: per-session counts and ratios
//! - `config`: tree capacity
//!
//! # Wire format
//!
//! A bare bit sequence: no framing, no length prefix, no end marker. The
//! first occurrence of a symbol is sent as the path to the NYT leaf followed
//! by the symbol's 8-bit value, MSB-first.
//!
//! # Example
//! ```
//! use adaptive_huffman_core::{decode, encode};
//!
//! let bits = encode(b"aacbdad").unwrap();
//! assert_eq!(&bits.to_string()[..9], "011000011");
//! assert_eq!(decode(&bits).unwrap(), b"aacbdad");
//! ```

pub mod bitio;
pub mod codec;
pub mod config;
pub mod error;
pub mod node;
pub mod snapshot;
pub mod stats;
pub mod tree;

// Re-export commonly used types
pub use bitio::{BitCursor, BitString};
pub use codec::{decode, encode, Decoder, Encoder};
pub use config::TreeConfig;
pub use error::{Error, Result};
pub use node::{Node, NodeId};
pub use snapshot::TreeSnapshot;
pub use stats::CodecStats;
pub use tree::AdaptiveTree;
