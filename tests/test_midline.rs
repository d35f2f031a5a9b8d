use ndarray::{array, Array1};
use niio::{expand_labels, midline, remap_matching, NiioError, ReducedSpace};
use proptest::prelude::*;

/// A surface size and a midline subset of its vertices (possibly with duplicates).
fn surface() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1..200usize).prop_flat_map(|n| (Just(n), prop::collection::vec(0..n, 0..n)))
}

proptest! {
    #[test]
    fn reduced_space_size_and_order((n, mid) in surface()) {
        let space = ReducedSpace::new(n, &mid).unwrap();
        let mut unique = mid.clone();
        unique.sort_unstable();
        unique.dedup();

        prop_assert_eq!(n - unique.len(), space.len());
        prop_assert!(space.indices().windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(unique, space.midline());
    }

    #[test]
    fn reduced_full_reduced_is_identity((n, mid) in surface()) {
        let space = ReducedSpace::new(n, &mid).unwrap();
        for i in 0..space.len() {
            let full = space.to_full(i as i64).unwrap();
            prop_assert!(!mid.contains(&full));
            prop_assert_eq!(Some(i), space.to_reduced(full));
        }
    }

    #[test]
    fn scatter_then_gather_is_identity((n, mid) in surface(), seed in any::<i32>()) {
        let space = ReducedSpace::new(n, &mid).unwrap();
        let trimmed: Array1<i32> = (0..space.len() as i32).map(|v| v.wrapping_mul(31).wrapping_add(seed)).collect();
        let full = expand_labels(&mid, trimmed.view(), n).unwrap();
        prop_assert_eq!(trimmed, space.gather(full.view()).unwrap());
        for &m in &mid {
            prop_assert_eq!(-1, full[m]);
        }
    }

    #[test]
    fn empty_midline_makes_remapping_the_identity(perm in Just((0..50i64).collect::<Vec<_>>()).prop_shuffle()) {
        let matching = Array1::from(perm.clone());
        let full = remap_matching(matching.view(), 50, &[], 50, &[]).unwrap();
        prop_assert_eq!(matching, full);
        prop_assert_eq!(ReducedSpace::full(50), ReducedSpace::new(50, &[]).unwrap());
    }

    #[test]
    fn remapped_indices_avoid_the_target_midline((n, mid) in surface(), picks in prop::collection::vec(any::<prop::sample::Index>(), 1..50)) {
        let target = ReducedSpace::new(n, &mid).unwrap();
        prop_assume!(!target.is_empty());
        let matching: Array1<i64> = picks.iter().map(|p| p.index(target.len()) as i64).collect();
        let full = remap_matching(matching.view(), matching.len(), &[], n, &mid).unwrap();
        for &v in full.iter() {
            prop_assert!(v >= 0 && (v as usize) < n);
            prop_assert!(!mid.contains(&(v as usize)));
        }
    }

    #[test]
    fn out_of_range_matching_entries_fail((n, mid) in surface(), excess in 0..10i64) {
        let target = ReducedSpace::new(n, &mid).unwrap();
        let matching = array![target.len() as i64 + excess];
        let res = remap_matching(matching.view(), 1, &[], n, &mid);
        prop_assert!(matches!(res, Err(NiioError::IndexOutOfRange(_, _))));
    }
}

#[test]
fn the_six_vertex_scenario_is_remapped() {
    let space = ReducedSpace::new(6, &[2, 4]).unwrap();
    assert_eq!(&[0, 1, 3, 5], space.indices());

    let full = remap_matching(array![0, 2, 1, 3].view(), 6, &[2, 4], 6, &[2, 4]).unwrap();
    assert_eq!(array![0, 3, -1, 1, -1, 5], full);
}

#[test]
fn the_midline_scenario_is_detected() {
    assert_eq!(vec![1, 3], midline(array![1, 0, 3, 0, 5].view()));
}
