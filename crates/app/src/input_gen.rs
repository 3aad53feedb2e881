//! Sample input generation for round-trip runs.
//!
//! When no input file is given, data is generated from a seed. The sections
//! are chosen so both coders have something to show:
//! - Runs of one byte (a single dominant symbol)
//! - Text drawn from a small alphabet with skewed letter weights
//! - Geometrically distributed bytes (a smooth, steep distribution)
//! - Uniform random bytes (incompressible)
//!
//! Section kinds change every few KiB, so the adaptive coder sees its
//! statistics shift, and the whole stream is reproducible from the seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Bytes per generated section.
const SECTION_BYTES: usize = 8192;

/// Letters in rough English frequency order.
const TEXT_ALPHABET: &[u8] = b" etaoinshrdlucmfwypvbgkjqxz.,\n";

/// Generate `size_bytes` of sample data from `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let len = (size_bytes - data.len()).min(SECTION_BYTES);

        match rng.gen_range(0..10u8) {
            0..=1 => {
                let byte: u8 = rng.gen();
                data.extend(std::iter::repeat(byte).take(len));
            }
            2..=5 => {
                for _ in 0..len {
                    data.push(TEXT_ALPHABET[skewed_index(&mut rng, TEXT_ALPHABET.len())]);
                }
            }
            6..=7 => {
                let base: u8 = rng.gen();
                for _ in 0..len {
                    data.push(base.wrapping_add(geometric(&mut rng)));
                }
            }
            _ => {
                for _ in 0..len {
                    data.push(rng.gen());
                }
            }
        }
    }

    data
}

// Index in 0..len, lower indices more likely (minimum of two uniform draws).
fn skewed_index(rng: &mut ChaCha8Rng, len: usize) -> usize {
    rng.gen_range(0..len).min(rng.gen_range(0..len))
}

// Number of failed coin flips before the first success, capped at 255.
fn geometric(rng: &mut ChaCha8Rng) -> u8 {
    let mut n = 0u8;
    while n < u8::MAX && rng.gen_bool(0.5) {
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_sizes() {
        for size in [0, 1, 100, SECTION_BYTES, SECTION_BYTES + 1, 100_000] {
            assert_eq!(generate_sample_data(999, size).len(), size);
        }
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate_sample_data(12345, 50_000), generate_sample_data(12345, 50_000));
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(generate_sample_data(1, 50_000), generate_sample_data(2, 50_000));
    }

    #[test]
    fn test_skewed_index_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(skewed_index(&mut rng, 5) < 5);
        }
    }
}
