use pasc_bits::{left_pad, mask, BitReader, BitWriter, Direction, Fold, Mode, Select, Split};
use proptest::prelude::*;

// Property 1: any sequence of (value, width) fields reads back unchanged
proptest! {
    #[test]
    fn prop_fields_read_back(
        fields in prop::collection::vec((any::<u64>(), 1u32..=64), 0..200)
    ) {
        let total: usize = fields.iter().map(|&(_, w)| w as usize).sum();
        let mut writer = BitWriter::with_left_pad(total);
        for &(value, width) in &fields {
            writer.write_bits(value, width);
        }
        let out = writer.finish();

        prop_assert_eq!(out.pad, left_pad(total));
        prop_assert_eq!((out.bytes.len() * 8) - out.pad as usize, total);

        let mut reader = BitReader::new(&out.bytes, out.pad).unwrap();
        for (i, &(value, width)) in fields.iter().enumerate() {
            let got = reader.read_bits(width).unwrap();
            prop_assert_eq!(got, value & mask(width), "field {} mismatch", i);
        }
        prop_assert_eq!(reader.remaining(), 0);
    }
}

// Property 2: the pad bits are always zero
proptest! {
    #[test]
    fn prop_pad_bits_are_zero(value in any::<u64>(), width in 1u32..=64) {
        let mut writer = BitWriter::with_left_pad(width as usize);
        writer.write_bits(value, width);
        let out = writer.finish();
        let mut reader = BitReader::new(&out.bytes, 0).unwrap();
        prop_assert_eq!(reader.read_bits(out.pad as u32).unwrap(), 0);
    }
}

// Property 3: a split is lossless
proptest! {
    #[test]
    fn prop_split_recombines(value in any::<u32>(), count in 0u32..=32, left in any::<bool>()) {
        let direction = if left { Direction::Left } else { Direction::Right };
        let split = Split::new(Mode::new(direction, count, 32).unwrap());
        let (high, low) = split.apply(value as u64);
        let low_bits = if left { 32 - count } else { count };
        let joined = high.checked_shl(low_bits).unwrap_or(0) | low;
        prop_assert_eq!(joined, value as u64);
    }
}

// Property 4: folding never produces more bits than a chunk
proptest! {
    #[test]
    fn prop_fold_fits_chunk(value in any::<u64>(), count in 1u32..=64, left in any::<bool>()) {
        let direction = if left { Direction::Left } else { Direction::Right };
        let fold = Fold::new(Mode::new(direction, count, 64).unwrap()).unwrap();
        prop_assert!(fold.apply(value) <= mask(count));
    }
}

// Property 5: selecting the top n bits equals shifting down
proptest! {
    #[test]
    fn prop_select_left_is_shift(value in any::<u32>(), count in 1u32..=32) {
        let select = Select::new(Mode::left(count, 32).unwrap());
        prop_assert_eq!(select.apply(value as u64), (value as u64) >> (32 - count));
    }
}
