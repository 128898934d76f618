//! Property-based tests for the shape/stride engine
//!
//! Shapes, coordinates and slice specs are generated together so that every
//! case is valid, the properties then check the indexing invariants.

use proptest::prelude::*;

use super::*;

// ============================================================================
// Strategies
// ============================================================================

/// Rank 1 to 4, every dimension 1 to 5
fn dims_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=5, 1..=4)
}

fn tensor_strategy() -> impl Strategy<Value = Tensor<i64>> {
    dims_strategy().prop_flat_map(|dims| {
        let n: usize = dims.iter().product();
        prop::collection::vec(-100i64..100, n).prop_map(move |data| Tensor::from_vec(data, &dims).unwrap())
    })
}

fn entry_strategy(d: usize) -> impl Strategy<Value = SliceEntry> {
    prop_oneof![
        Just(SliceEntry::Full),
        (0..d).prop_map(|i| SliceEntry::Index(i as isize)),
        (0..d).prop_flat_map(move |lo| (Just(lo), lo..d)).prop_map(|(lo, hi)| SliceEntry::Range(lo as isize, hi as isize)),
    ]
}

fn tensor_and_slice() -> impl Strategy<Value = (Tensor<i64>, SliceSpec)> {
    tensor_strategy().prop_flat_map(|t| {
        let entries: Vec<_> = t.shape().iter().map(|&d| entry_strategy(d)).collect();
        (Just(t), entries.prop_map(SliceSpec::new))
    })
}

fn tensor_and_permutation() -> impl Strategy<Value = (Tensor<i64>, Vec<usize>)> {
    tensor_strategy().prop_flat_map(|t| {
        let perm = Just((0..t.rank()).collect::<Vec<_>>()).prop_shuffle();
        (Just(t), perm)
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: offsets are a bijection onto 0..numel, in row-major order
    #[test]
    fn prop_offset_bijection(dims in dims_strategy()) {
        let shape = Shape::new(&dims).unwrap();
        for (i, coords) in Coords::new(&dims).enumerate() {
            prop_assert_eq!(shape.offset(&coords).unwrap(), i);
            prop_assert_eq!(shape.unravel(i), coords);
        }
        prop_assert_eq!(Coords::new(&dims).count(), shape.numel());
    }

    /// Property: a slice agrees cell by cell with direct indexing
    #[test]
    fn prop_slice_matches_get((t, spec) in tensor_and_slice()) {
        let s = t.slice_with(&spec, true).unwrap();
        let bounds = spec.normalized(t.shape()).unwrap();
        for coords in Coords::new(s.shape()) {
            let src: Vec<usize> = coords.iter().zip(bounds.iter()).map(|(c, (lo, _))| c + lo).collect();
            prop_assert_eq!(s.get(&coords).unwrap(), t.get(&src).unwrap());
        }
    }

    /// Property: writing a slice back where it came from changes nothing,
    /// and writing a modified slice only touches the selected region
    #[test]
    fn prop_slice_assign_inverse((t, spec) in tensor_and_slice()) {
        let s = t.slice(&spec).unwrap();
        let mut u = t.clone();
        u.set_slice(&s, &spec).unwrap();
        prop_assert_eq!(&u, &t);

        let shifted = s.map(|x| x + 1000);
        u.set_slice(&shifted, &spec).unwrap();
        prop_assert_eq!(u.slice(&spec).unwrap(), shifted);
        prop_assert_eq!(u.sum() - t.sum(), 1000 * s.len() as i64);
    }

    /// Property: transposing by a permutation and then by its inverse is the identity
    #[test]
    fn prop_transpose_involution((t, perm) in tensor_and_permutation()) {
        let inv = inverse_permutation(&perm).unwrap();
        let back = t.transpose(Some(&perm)).unwrap().transpose(Some(&inv)).unwrap();
        prop_assert_eq!(back, t.clone());
        prop_assert_eq!(t.transpose(None).unwrap().transpose(None).unwrap(), t);
    }

    /// Property: nested form reproduces the tensor
    #[test]
    fn prop_nested_round_trip(t in tensor_strategy()) {
        let back = Tensor::from_nested(t.to_nested()).unwrap();
        prop_assert_eq!(back, t);
    }

    /// Property: the copying variants never touch the receiver
    #[test]
    fn prop_copy_isolation(t in tensor_strategy()) {
        let before = t.clone();
        let _ = t.add(&t).unwrap();
        let _ = t.reshape(&[t.len()]).unwrap();
        let _ = t.squeeze();
        let _ = t.add_dimension(0).unwrap();
        let _ = -&t;
        prop_assert_eq!(t, before);
    }

    /// Property: reducing over every axis equals the full reduction
    #[test]
    fn prop_axis_reduction_total(t in tensor_strategy()) {
        let mask = vec![true; t.rank()];
        let sums = t.sum_axes(mask.clone(), false).unwrap();
        let maxes = t.max_axes(mask, true).unwrap();
        prop_assert_eq!(sums.as_slice(), &[t.sum()]);
        prop_assert_eq!(maxes.as_slice(), &[t.max()]);
        let partial = t.sum_axes(0usize, false).unwrap();
        prop_assert_eq!(partial.sum(), t.sum());
    }

    /// Property: equal tensors hash equally
    #[test]
    fn prop_hash_consistent(t in tensor_strategy()) {
        prop_assert_eq!(t.hash_code(), t.clone().hash_code());
        prop_assert!(t.hash_code() < (1u64 << 62));
    }
}
