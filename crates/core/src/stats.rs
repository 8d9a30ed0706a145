//! Per-session codec statistics.
//!
//! Encoder and decoder each keep a [`CodecStats`] describing the session so
//! far:
//! - Symbol and bit counts, and the resulting compression ratio
//! - How many symbols went out as literal escapes
//! - Tree activity (swaps, distinct symbols)
//! - Timing
//!
//! # Thread Safety
//!
//! Like the codec itself, stats are single-session and not shared.

use std::time::{Duration, Instant};

/// Bits per uncompressed symbol.
const SYMBOL_BITS: f64 = 8.0;

#[derive(Debug, Clone)]
pub struct CodecStats {
    // === Timing ===
    /// When the session started
    pub started: Instant,

    /// When the session ended (set on completion)
    pub finished: Option<Instant>,

    // === Volume ===
    /// Symbols processed
    pub symbols: u64,

    /// Compressed bits produced or consumed
    pub bits: u64,

    /// Symbols sent as NYT path + 8-bit literal
    pub literals: u64,

    // === Tree ===
    /// Swaps performed by the session's tree
    pub swaps: u64,

    /// Distinct symbols seen
    pub distinct_symbols: u64,
}

impl CodecStats {
    /// Create new stats with start time set to now.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            finished: None,
            symbols: 0,
            bits: 0,
            literals: 0,
            swaps: 0,
            distinct_symbols: 0,
        }
    }

    /// Record one processed symbol and its code length.
    pub fn record(&mut self, code_bits: usize, literal: bool) {
        self.symbols += 1;
        self.bits += code_bits as u64;
        if literal {
            self.literals += 1;
        }
    }

    /// Mark the session as complete.
    pub fn complete(&mut self) {
        self.finished = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.finished {
            Some(end) => end.duration_since(self.started),
            None => self.started.elapsed(),
        }
    }

    /// Compressed bits over uncompressed bits.
    ///
    /// Returns 0.0 if nothing was processed.
    pub fn compression_ratio(&self) -> f64 {
        if self.symbols == 0 {
            0.0
        } else {
            self.bits as f64 / (self.symbols as f64 * SYMBOL_BITS)
        }
    }

    /// Average code length.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.symbols == 0 {
            0.0
        } else {
            self.bits as f64 / self.symbols as f64
        }
    }

    /// Human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Symbols: {}\n\
             Distinct symbols: {}\n\
             Literal escapes: {}\n\
             Compressed: {} bits ({:.3} bits/symbol)\n\
             Ratio: {:.1}%\n\
             Swaps: {}\n\
             Duration: {} us\n",
            self.symbols,
            self.distinct_symbols,
            self.literals,
            self.bits,
            self.bits_per_symbol(),
            self.compression_ratio() * 100.0,
            self.swaps,
            self.duration().as_micros(),
        )
    }

    /// Export as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "symbols={}\n\
             bits={}\n\
             literals={}\n\
             distinct_symbols={}\n\
             swaps={}\n\
             compression_ratio={:.4}\n",
            self.symbols,
            self.bits,
            self.literals,
            self.distinct_symbols,
            self.swaps,
            self.compression_ratio(),
        )
    }
}

impl Default for CodecStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = CodecStats::new();
        assert!(stats.finished.is_none());
        assert_eq!(stats.compression_ratio(), 0.0);
        assert_eq!(stats.bits_per_symbol(), 0.0);
    }

    #[test]
    fn test_record() {
        let mut stats = CodecStats::new();
        stats.record(8, true);
        stats.record(1, false);
        stats.record(1, false);
        stats.record(2, false);

        assert_eq!(stats.symbols, 4);
        assert_eq!(stats.bits, 12);
        assert_eq!(stats.literals, 1);
        assert_eq!(stats.bits_per_symbol(), 3.0);
        assert_eq!(stats.compression_ratio(), 0.375);
    }

    #[test]
    fn test_complete_freezes_duration() {
        let mut stats = CodecStats::new();
        stats.complete();
        let first = stats.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(stats.duration(), first);
    }

    #[test]
    fn test_export_text() {
        let mut stats = CodecStats::new();
        stats.record(8, true);
        stats.distinct_symbols = 1;

        let text = stats.export_text();
        assert!(text.contains("symbols=1\n"));
        assert!(text.contains("bits=8\n"));
        assert!(text.contains("compression_ratio=1.0000\n"));
    }
}
