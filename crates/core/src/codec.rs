//! Encoder and decoder sessions.
//!
//! Each session owns its own [`AdaptiveTree`]. The encoder emits the tree's
//! current code for a symbol and then updates; the decoder walks its tree to
//! a leaf, recovers the symbol (directly or from a literal escape) and then
//! performs the same update. Nothing is shared between the two.
//!
//! # Error policy
//!
//! - Non-binary characters in a textual bit string are rejected before
//!   decoding starts ([`Error::InvalidSymbol`]).
//! - A literal escape cut short fails the session with
//!   [`Error::TruncatedLiteral`]; no partial message is returned.
//! - A stream ending inside a code fails with [`Error::TruncatedCode`].
//! - Text containing a character above U+00FF is rejected before any symbol
//!   is encoded ([`Error::UnsupportedSymbol`]).
//!
//! A failed step leaves the tree in its last synchronized state.

use tracing::debug;

use crate::bitio::{BitCursor, BitString};
use crate::config::TreeConfig;
use crate::error::{Error, Result};
use crate::stats::CodecStats;
use crate::tree::AdaptiveTree;

/// Map a character to its 8-bit code unit.
///
/// # Errors
/// `Error::UnsupportedSymbol` for anything above U+00FF.
pub fn code_unit(c: char) -> Result<u8> {
    u8::try_from(c).map_err(|_| Error::UnsupportedSymbol {
        code_point: u32::from(c),
    })
}

/// Compresses symbol sequences.
#[derive(Debug, Clone)]
pub struct Encoder {
    tree: AdaptiveTree,
    output: BitString,
    stats: CodecStats,
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            tree: AdaptiveTree::with_config(config),
            output: BitString::new(),
            stats: CodecStats::new(),
        }
    }

    /// Start a fresh session with the same configuration.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.tree.config());
    }

    /// Encode a whole message in a fresh session.
    ///
    /// # Errors
    /// `Error::CapacityExhausted` if the message has more distinct symbols
    /// than the configured ceiling admits.
    pub fn encode(&mut self, message: &[u8]) -> Result<BitString> {
        self.reset();
        for &symbol in message {
            self.encode_symbol(symbol)?;
        }
        self.stats.complete();
        Ok(self.output.clone())
    }

    /// Encode text whose characters are all 8-bit code units.
    ///
    /// The whole text is validated before the tree is touched.
    pub fn encode_text(&mut self, text: &str) -> Result<BitString> {
        let message = text.chars().map(code_unit).collect::<Result<Vec<u8>>>()?;
        self.encode(&message)
    }

    /// Encode one symbol within the current session and return its code.
    ///
    /// The code is appended to [`output`](Self::output) only once the tree
    /// update has succeeded.
    pub fn encode_symbol(&mut self, symbol: u8) -> Result<BitString> {
        let literal = self.tree.leaf_for(symbol).is_none();
        let code = self.tree.encode_path(symbol);
        self.tree.update(symbol)?;

        self.output.append(&code);
        self.stats.record(code.len(), literal);
        self.stats.swaps = self.tree.swap_count();
        self.stats.distinct_symbols = self.tree.distinct_symbols() as u64;

        debug!(symbol, code = %code, literal, "encoded symbol");
        Ok(code)
    }

    /// Bits emitted so far in this session.
    pub fn output(&self) -> &BitString {
        &self.output
    }

    pub fn tree(&self) -> &AdaptiveTree {
        &self.tree
    }

    pub fn stats(&self) -> &CodecStats {
        &self.stats
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reconstructs symbol sequences from compressed bits.
#[derive(Debug, Clone)]
pub struct Decoder {
    tree: AdaptiveTree,
    output: Vec<u8>,
    stats: CodecStats,
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            tree: AdaptiveTree::with_config(config),
            output: Vec::new(),
            stats: CodecStats::new(),
        }
    }

    /// Start a fresh session with the same configuration.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.tree.config());
    }

    /// Decode a whole bit string in a fresh session.
    ///
    /// # Errors
    /// `TruncatedLiteral` or `TruncatedCode` on a cut-short stream.
    pub fn decode(&mut self, bits: &BitString) -> Result<Vec<u8>> {
        self.reset();
        let mut cursor = BitCursor::new(bits);
        while let Some(step) = self.decode_next(&mut cursor) {
            step?;
        }
        self.stats.complete();
        Ok(self.output.clone())
    }

    /// Parse a textual `0`/`1` stream, then decode it.
    pub fn decode_str(&mut self, bits: &str) -> Result<Vec<u8>> {
        let bits: BitString = bits.parse()?;
        self.decode(&bits)
    }

    /// Decode into text, one character per 8-bit code unit.
    pub fn decode_text(&mut self, bits: &BitString) -> Result<String> {
        Ok(self.decode(bits)?.into_iter().map(char::from).collect())
    }

    /// Decode the next symbol within the current session.
    ///
    /// Returns `None` once `cursor` is exhausted.
    pub fn decode_next(&mut self, cursor: &mut BitCursor<'_>) -> Option<Result<u8>> {
        if cursor.is_empty() {
            return None;
        }
        Some(self.step(cursor))
    }

    fn step(&mut self, cursor: &mut BitCursor<'_>) -> Result<u8> {
        let start = cursor.position();
        let reached = self.tree.decode_step(cursor);
        let node = self.tree.node(reached);

        let literal = node.is_nyt();
        let symbol = if literal {
            let position = cursor.position();
            let available = cursor.bits_remaining();
            cursor
                .read_literal()
                .map_err(|_| Error::TruncatedLiteral { position, available })?
        } else {
            node.symbol()
                .ok_or(Error::TruncatedCode { position: start })?
        };

        self.tree.update(symbol)?;
        self.output.push(symbol);
        self.stats.record(cursor.position() - start, literal);
        self.stats.swaps = self.tree.swap_count();
        self.stats.distinct_symbols = self.tree.distinct_symbols() as u64;

        debug!(symbol, literal, bits = cursor.position() - start, "decoded symbol");
        Ok(symbol)
    }

    /// Symbols recovered so far in this session.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn tree(&self) -> &AdaptiveTree {
        &self.tree
    }

    pub fn stats(&self) -> &CodecStats {
        &self.stats
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `message` with a fresh default encoder.
pub fn encode(message: &[u8]) -> Result<BitString> {
    Encoder::new().encode(message)
}

/// Decode `bits` with a fresh default decoder.
pub fn decode(bits: &BitString) -> Result<Vec<u8>> {
    Decoder::new().decode(bits)
}
