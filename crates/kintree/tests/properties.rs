//! Property-based tests for the layout pipeline

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use kintree::layout::ordering::{crossings, partial_weight_sort};
use kintree::layout::rank::assign_ranks;
use kintree::layout::TreeLayout;
use kintree::Link;

fn arb_link() -> impl Strategy<Value = Link> {
    (0..6usize, 0..6usize, any::<bool>()).prop_map(|(origin, target, partner)| {
        let origin = format!("p{}", origin);
        let target = format!("p{}", target);
        if partner {
            Link::partner(origin, target)
        } else {
            Link::child(origin, target)
        }
    })
}

fn referenced_ids(links: &[Link]) -> HashSet<String> {
    links
        .iter()
        .flat_map(|link| [link.origin.clone(), link.target.clone()])
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every person referenced by the links gets exactly one rank.
    #[test]
    fn prop_assign_ranks_is_complete(links in prop::collection::vec(arb_link(), 1..12)) {
        let focus = links[0].origin.clone();
        let ranks = assign_ranks(&focus, &links).unwrap();

        let mut seen = HashSet::new();
        for row in &ranks {
            for id in row {
                prop_assert!(seen.insert(id.clone()), "{} ranked twice", id);
            }
        }
        prop_assert_eq!(seen, referenced_ids(&links));
    }

    /// The full pipeline positions every referenced person.
    #[test]
    fn prop_layout_is_complete(links in prop::collection::vec(arb_link(), 1..10)) {
        let focus = links[0].origin.clone();
        let result = TreeLayout::new().layout(&focus, &links).unwrap();

        let keys: HashSet<String> = result.nodes.keys().cloned().collect();
        prop_assert_eq!(keys, referenced_ids(&links));
    }

    /// Unweighted items never move; weighted items end up in ascending order.
    #[test]
    fn prop_partial_weight_sort(
        ids in prop::collection::vec(0..10usize, 0..10),
        weighted in prop::collection::hash_map(0..10usize, 0..5u8, 0..10),
    ) {
        let items: Vec<String> = {
            let mut unique: Vec<usize> = ids;
            unique.sort();
            unique.dedup();
            unique.iter().map(|id| format!("p{}", id)).collect()
        };
        let weights: HashMap<&str, f64> = items
            .iter()
            .filter_map(|id| {
                let index: usize = id[1..].parse().unwrap();
                weighted.get(&index).map(|&w| (id.as_str(), w as f64))
            })
            .collect();

        let sorted = partial_weight_sort(&items, &weights, false);

        // Same people, just reordered.
        let mut a = items.clone();
        let mut b = sorted.clone();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);

        // Unweighted items keep their positions.
        for (index, id) in items.iter().enumerate() {
            if !weights.contains_key(id.as_str()) {
                prop_assert_eq!(&sorted[index], id, "unweighted item moved");
            }
        }

        // Weighted items are ascending.
        let ordered: Vec<f64> = sorted
            .iter()
            .filter_map(|id| weights.get(id.as_str()).copied())
            .collect();
        for pair in ordered.windows(2) {
            prop_assert!(pair[0] <= pair[1], "weights out of order: {:?}", ordered);
        }
    }

    /// Mirroring every row horizontally leaves the crossing count unchanged.
    #[test]
    fn prop_crossings_mirror_symmetry(links in prop::collection::vec(arb_link(), 1..10)) {
        let focus = links[0].origin.clone();
        let order = assign_ranks(&focus, &links).unwrap();

        let mirrored: Vec<Vec<String>> = order
            .iter()
            .map(|row| row.iter().rev().cloned().collect())
            .collect();
        prop_assert_eq!(crossings(&order, &links), crossings(&mirrored, &links));
    }
}
