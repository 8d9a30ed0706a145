//! Sample message generation.
//!
//! When `--sample` is given, we generate a message whose symbol statistics
//! drift over its length, which is where an adaptive code earns its keep:
//! - Runs of one byte (codes collapse to a single bit)
//! - Text drawn from a skewed lowercase alphabet
//! - Short repeating patterns
//! - Uniformly random bytes (every first occurrence costs a literal)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Letters weighted roughly by English frequency.
const SKEWED_TEXT: &[u8] = b"eeeeeeeeeeeettttttttaaaaaaaoooooooiiiiiiinnnnnnnsssssshhhhhhrrrrrrddddlllluuucccmmmwwffggyyppbbvk      ";

/// Generate a sample message of exactly `size_bytes` bytes.
///
/// The same seed always produces the same message.
pub fn generate_sample_message(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let segment = (size_bytes - data.len()).min(rng.gen_range(64..=1024));

        match rng.gen_range(0..10) {
            // 20% runs
            0..=1 => {
                let byte_value: u8 = rng.gen();
                data.extend(std::iter::repeat(byte_value).take(segment));
            }

            // 50% skewed text
            2..=6 => {
                for _ in 0..segment {
                    data.push(SKEWED_TEXT[rng.gen_range(0..SKEWED_TEXT.len())]);
                }
            }

            // 20% repeating patterns
            7..=8 => {
                let pattern = generate_pattern(&mut rng);
                data.extend(pattern.iter().copied().cycle().take(segment));
            }

            // 10% random bytes
            _ => {
                for _ in 0..segment {
                    data.push(rng.gen());
                }
            }
        }
    }

    data
}

/// Generate a small repeating pattern.
fn generate_pattern(rng: &mut ChaCha8Rng) -> Vec<u8> {
    let pattern_len = rng.gen_range(2..=16);
    (0..pattern_len).map(|_| rng.gen()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_size() {
        for size in [0, 1, 63, 100, 1000, 10_000] {
            assert_eq!(generate_sample_message(999, size).len(), size);
        }
    }

    #[test]
    fn test_determinism() {
        assert_eq!(
            generate_sample_message(12345, 5000),
            generate_sample_message(12345, 5000)
        );
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(
            generate_sample_message(1, 2000),
            generate_sample_message(2, 2000)
        );
    }

    #[test]
    fn test_samples_round_trip() {
        use adaptive_huffman_core::{decode, encode};

        for seed in 0..2 {
            let message = generate_sample_message(seed, 1000);
            let bits = encode(&message).unwrap();
            assert_eq!(decode(&bits).unwrap(), message);
        }
    }
}
