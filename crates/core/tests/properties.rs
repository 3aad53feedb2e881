//! Property tests for the code construction and both formats.

use huffman_core::{adaptive, framing, CanonicalCode, FrequencyTable};
use proptest::prelude::*;

/// Kraft sum scaled by 2^max_len, compared against 2^max_len.
fn kraft_is_one(lengths: &[u32]) -> bool {
    let max = lengths.iter().copied().max().unwrap_or(0);
    assert!(max < 128, "depth {} too large for the exact check", max);
    let sum: u128 = lengths
        .iter()
        .filter(|&&l| l > 0)
        .map(|&l| 1u128 << (max - l))
        .sum();
    sum == 1u128 << max
}

proptest! {
    #[test]
    fn static_round_trip(data in proptest::collection::vec(any::<u8>(), 0..2000)) {
        let packed = framing::compress(&data).unwrap();
        prop_assert_eq!(framing::decompress(&packed).unwrap(), data);
    }

    #[test]
    fn adaptive_round_trip(data in proptest::collection::vec(any::<u8>(), 0..2000)) {
        let packed = adaptive::compress(&data).unwrap();
        prop_assert_eq!(adaptive::decompress(&packed).unwrap(), data);
    }

    #[test]
    fn built_codes_are_complete(freqs in proptest::collection::vec(0u32..10_000, 2..300)) {
        let table = FrequencyTable::new(freqs.clone()).unwrap();
        let tree = table.build_code_tree().unwrap();
        let code = CanonicalCode::from_code_tree(&tree, freqs.len()).unwrap();

        prop_assert!(kraft_is_one(code.code_lengths()));
        // Every symbol that occurs has a code
        for (symbol, &freq) in freqs.iter().enumerate() {
            if freq > 0 {
                prop_assert!(code.code_length(symbol).unwrap() > 0);
            }
        }
        // And the lengths pass validation on their own
        prop_assert_eq!(CanonicalCode::new(code.code_lengths().to_vec()).unwrap(), code);
    }

    #[test]
    fn canonical_rebuild_is_deterministic(freqs in proptest::collection::vec(0u32..1000, 2..300)) {
        let table = FrequencyTable::new(freqs.clone()).unwrap();
        let code = framing::canonical_code_for(&table).unwrap();
        let again = framing::canonical_code_for(&table.clone()).unwrap();
        prop_assert_eq!(&code, &again);

        let tree = code.to_code_tree().unwrap();
        prop_assert_eq!(&tree, &again.to_code_tree().unwrap());
        prop_assert_eq!(CanonicalCode::from_code_tree(&tree, freqs.len()).unwrap(), code);
    }

    #[test]
    fn equal_length_codes_ascend_with_symbol(freqs in proptest::collection::vec(0u32..1000, 2..300)) {
        let table = FrequencyTable::new(freqs.clone()).unwrap();
        let code = framing::canonical_code_for(&table).unwrap();
        let tree = code.to_code_tree().unwrap();

        // Symbols with codes, in ascending symbol order
        let coded: Vec<&[bool]> = (0..freqs.len())
            .filter(|&s| code.code_length(s).unwrap() > 0)
            .map(|s| tree.code(s).unwrap())
            .collect();
        for (i, earlier) in coded.iter().enumerate() {
            for later in &coded[i + 1..] {
                if earlier.len() == later.len() {
                    prop_assert!(earlier < later);
                }
            }
        }
    }

    #[test]
    fn validation_agrees_with_kraft(lengths in proptest::collection::vec(0u32..6, 2..40)) {
        prop_assert_eq!(CanonicalCode::new(lengths.clone()).is_ok(), kraft_is_one(&lengths) && lengths.iter().any(|&l| l > 0));
    }
}
