use std::collections::BTreeMap;

use proptest::prelude::*;

use super::*;

#[test]
fn test_four_workers_stripe_twenty_moves() {
    for r in 0..4 {
        assert_eq!(
            assign(r, 4, 20),
            Assignment::Striped {
                key: r,
                indices: vec![r, r + 4, r + 8, r + 12, r + 16],
            }
        );
    }
}

#[test]
fn test_twenty_five_workers_share_twenty_moves() {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for r in 0..25 {
        let a = assign(r, 25, 20);
        assert_eq!(a, Assignment::Shared { key: r % 20, index: r % 20 });
        groups.entry(a.key()).or_default().push(r);
    }
    assert_eq!(groups.len(), 20);
    assert!(groups.values().all(|g| g.len() == 1 || g.len() == 2));
    assert_eq!(groups[&3], vec![3, 23]);
    assert_eq!(groups[&7], vec![7]);
}

#[test]
fn test_single_worker_takes_everything() {
    assert_eq!(
        assign(0, 1, 3),
        Assignment::Striped {
            key: 0,
            indices: vec![0, 1, 2],
        }
    );
}

#[test]
fn test_equal_counts_give_one_move_each() {
    for r in 0..6 {
        assert_eq!(assign(r, 6, 6).indices(), vec![r]);
    }
}

proptest! {
    #[test]
    fn test_every_move_is_covered(size in 1usize..64, branches in 1usize..64) {
        let mut covered = vec![0usize; branches];
        let mut searchers = vec![0usize; branches];
        for rank in 0..size {
            let a = assign(rank, size, branches);
            for i in a.indices() {
                searchers[i] += 1;
            }
            // A striped worker owns its moves; shared workers own theirs once
            // per sub-group, counted on the sub-group's lowest rank.
            if matches!(a, Assignment::Striped { .. }) || rank < branches {
                for i in a.indices() {
                    covered[i] += 1;
                }
            }
        }
        prop_assert!(covered.iter().all(|&c| c == 1));
        prop_assert!(searchers.iter().all(|&s| s >= 1));
    }

    #[test]
    fn test_sub_groups_agree_on_their_move(size in 1usize..64, branches in 1usize..64) {
        let mut by_key: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for rank in 0..size {
            let a = assign(rank, size, branches);
            by_key.entry(a.key()).or_default().extend(a.indices());
        }
        if size <= branches {
            prop_assert_eq!(by_key.len(), size);
        } else {
            prop_assert_eq!(by_key.len(), branches);
            for (key, indices) in by_key {
                prop_assert!(indices.iter().all(|&i| i == key));
            }
        }
    }
}
