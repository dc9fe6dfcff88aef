use pasc_core::{is_permutation, roll, IntegerArray, Sequence};
use proptest::prelude::*;

// Property 1: rolling by s then by -s is the identity
proptest! {
    #[test]
    fn prop_roll_inverse(
        data in prop::collection::vec(any::<u32>(), 0..64),
        shift in -200isize..200
    ) {
        let back = roll(&roll(&data, shift), -shift);
        prop_assert_eq!(back, data);
    }
}

// Property 2: a rolled index list is still a permutation
proptest! {
    #[test]
    fn prop_rolled_identity_is_permutation(n in 0usize..300, shift in any::<i16>()) {
        let indices: Vec<usize> = (0..n).collect();
        let rolled = roll(&indices, shift as isize);
        prop_assert!(is_permutation(&rolled), "roll by {} broke the permutation", shift);
    }
}

// Property 3: gather then restore returns the original array
proptest! {
    #[test]
    fn prop_gather_restore(
        data in prop::collection::vec(any::<i64>(), 1..64),
        shift in any::<i16>()
    ) {
        let n = data.len();
        let array = IntegerArray::flat(data).unwrap();
        let indices = roll(&(0..n).collect::<Vec<_>>(), shift as isize);
        let seq = Sequence::gather(&array, indices).unwrap();
        prop_assert_eq!(seq.restore().unwrap(), array);
    }
}
