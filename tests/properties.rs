//! Property tests for offset-stable application and rendering determinism.

use fixmerge::{DiffAggregator, Finding, Fix, ImportStatements, Replacement, ReplacementSet};
use proptest::prelude::*;

/// Disjoint replacements over a source of the given length, built from
/// (gap, span length, text) triples walked left to right.
fn disjoint_replacements(source_len: usize) -> impl Strategy<Value = Vec<Replacement>> {
    prop::collection::vec((0usize..8, 0usize..8, "[a-z]{0,6}"), 0..10).prop_map(
        move |pieces| {
            let mut replacements = Vec::new();
            let mut cursor = 0usize;
            for (gap, len, text) in pieces {
                // Leave at least one byte between spans so insertions can
                // never coincide with a neighbor's boundary ambiguity.
                let start = cursor + gap + 1;
                let end = start + len;
                if end > source_len {
                    break;
                }
                replacements.push(Replacement::new(start, end, text));
                cursor = end;
            }
            replacements
        },
    )
}

/// Reference model: splice ascending, tracking the offset drift explicitly.
fn model_apply(source: &str, replacements: &[Replacement]) -> String {
    let mut sorted: Vec<&Replacement> = replacements.iter().collect();
    sorted.sort_by_key(|r| (r.start(), r.end()));

    let mut result = source.to_string();
    let mut drift = 0isize;
    for r in sorted {
        let start = (r.start() as isize + drift) as usize;
        let end = (r.end() as isize + drift) as usize;
        result.replace_range(start..end, r.text());
        drift += r.text().len() as isize - (r.end() - r.start()) as isize;
    }
    result
}

proptest! {
    /// Descending-order application equals ascending application with
    /// explicit offset tracking, regardless of the order edits arrived in.
    #[test]
    fn apply_matches_offset_tracking_model(
        replacements in disjoint_replacements(64),
        shuffle_seed in any::<u64>(),
    ) {
        let source: String = "abcdefgh".repeat(8);
        let expected = model_apply(&source, &replacements);

        // Record in a seed-derived order to show order independence.
        let mut shuffled = replacements.clone();
        if !shuffled.is_empty() {
            let len = shuffled.len();
            for i in 0..len {
                let j = (shuffle_seed as usize)
                    .wrapping_mul(31)
                    .wrapping_add(i * 17)
                    % len;
                shuffled.swap(i, j);
            }
        }

        let mut diff = DiffAggregator::for_file(
            "a.java",
            ImportStatements::create(Vec::<String>::new(), 0..0),
        );
        for (i, r) in shuffled.iter().enumerate() {
            let fix = Fix::new().replace(r.start(), r.end(), r.text());
            diff.record(&Finding::new(format!("Check{i}")).with_fix(fix)).unwrap();
        }

        let applied = diff.apply_to_source(&source).unwrap();
        prop_assert_eq!(applied, expected);
    }

    /// A set built from disjoint replacements accepts them all, in any order,
    /// and `descending` yields strictly decreasing start offsets.
    #[test]
    fn disjoint_replacements_never_conflict(replacements in disjoint_replacements(64)) {
        let mut set = ReplacementSet::new();
        for r in replacements.iter().rev() {
            set.add(r.clone()).unwrap();
        }
        prop_assert_eq!(set.len(), replacements.len());

        let starts: Vec<usize> = set.descending().map(Replacement::start).collect();
        for pair in starts.windows(2) {
            prop_assert!(pair[0] > pair[1]);
        }
    }

    /// Adding the same replacement repeatedly never grows the set.
    #[test]
    fn duplicate_adds_are_idempotent(
        start in 0usize..32,
        len in 0usize..8,
        text in "[a-z]{0,6}",
        repeats in 1usize..5,
    ) {
        let r = Replacement::new(start, start + len, text);
        let mut set = ReplacementSet::new();
        for _ in 0..repeats {
            set.add(r.clone()).unwrap();
        }
        prop_assert_eq!(set.len(), 1);
    }

    /// Import rendering is a pure function of the (base, add, remove) triple.
    #[test]
    fn import_render_is_deterministic(
        base in prop::collection::btree_set("[a-c]\\.[a-z]{1,4}", 0..6),
        add in prop::collection::vec("[a-c]\\.[a-z]{1,4}", 0..6),
        remove in prop::collection::vec("[a-c]\\.[a-z]{1,4}", 0..6),
    ) {
        let mut forward = ImportStatements::create(base.iter().cloned(), 0..0);
        forward.add_all(add.iter().cloned());
        forward.remove_all(remove.iter().cloned());

        let mut reversed = ImportStatements::create(base.iter().cloned(), 0..0);
        reversed.add_all(add.iter().rev().cloned());
        reversed.remove_all(remove.iter().rev().cloned());

        prop_assert_eq!(forward.render(), reversed.render());
        // Idempotent: rendering twice yields byte-identical output.
        prop_assert_eq!(forward.render(), forward.render());
    }
}
