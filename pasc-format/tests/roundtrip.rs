use pasc_codec::LzcEncoder;
use pasc_core::{Coded, Encoder, ResidualArray};
use pasc_format::{from_bytes, read_from, to_bytes, write_to};
use proptest::prelude::*;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

fn encoded_with_shape(values: &[u64], shape: &[usize], wide: bool, start: usize) -> Coded {
    let residual = if wide {
        ResidualArray::from_vec(values.to_vec(), shape.to_vec())
    } else {
        ResidualArray::from_vec(values.iter().map(|&v| v as u32).collect(), shape.to_vec())
    }
    .unwrap();
    LzcEncoder.encode(&residual, start).unwrap()
}

fn encoded(values: Vec<u32>, start: usize) -> Coded {
    let n = values.len();
    let residual = ResidualArray::from_vec(values, vec![n / 4, 4]).unwrap();
    LzcEncoder.encode(&residual, start).unwrap()
}

#[test]
fn single_variable_roundtrip() {
    let coded = encoded((0..64).map(|i| i * 7919).collect(), 0);
    let bytes = to_bytes(&[coded.clone()]).unwrap();
    assert_eq!(from_bytes(&bytes).unwrap(), vec![coded]);
}

#[test]
fn multiple_variables_roundtrip() {
    let vars = vec![
        encoded(vec![0; 32], 0),
        encoded((0..32).map(|i| u32::MAX - i).collect(), 17),
        encoded((0..32).map(|i| 1 << (i % 32)).collect(), 31),
    ];
    let bytes = to_bytes(&vars).unwrap();
    let back = from_bytes(&bytes).unwrap();
    assert_eq!(back, vars);
    // byte-for-byte stable
    assert_eq!(to_bytes(&back).unwrap(), bytes);
}

#[test]
fn persist_through_file() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let vars = vec![encoded((0..16).collect(), 3), encoded(vec![9; 16], 0)];

    let mut writer = BufWriter::new(File::create(tmp.path()).unwrap());
    let written = write_to(&mut writer, &vars).unwrap();
    writer.flush().unwrap();
    drop(writer);
    assert_eq!(std::fs::metadata(tmp.path()).unwrap().len() as usize, written);

    let mut reader = BufReader::new(File::open(tmp.path()).unwrap());
    assert_eq!(read_from(&mut reader).unwrap(), vars);
}

proptest! {
    #[test]
    fn prop_wire_roundtrip(
        blocks in prop::collection::vec(any::<u32>(), 0..16),
        nvars in 1usize..5,
        start in any::<u16>()
    ) {
        let values: Vec<u32> = blocks.iter().flat_map(|&b| [b, b >> 3, 0, !b]).collect();
        let vars: Vec<Coded> = (0..nvars)
            .map(|k| {
                let shifted = values.iter().map(|&v| v.rotate_left(k as u32)).collect();
                encoded(shifted, start as usize * k)
            })
            .collect();
        let bytes = to_bytes(&vars).unwrap();
        prop_assert_eq!(from_bytes(&bytes).unwrap(), vars);
    }

    #[test]
    fn prop_wire_roundtrip_any_rank(
        dims in prop::collection::vec(1usize..5, 1..4),
        pool in prop::collection::vec(any::<u64>().prop_map(|v| v >> (v % 64)), 64),
        wide in any::<bool>(),
        nvars in 1usize..4,
        start in any::<u16>()
    ) {
        let n: usize = dims.iter().product();
        let vars: Vec<Coded> = (0..nvars)
            .map(|k| {
                let values: Vec<u64> = pool.iter().cycle().skip(k).take(n).copied().collect();
                encoded_with_shape(&values, &dims, wide, start as usize % n)
            })
            .collect();
        let bytes = to_bytes(&vars).unwrap();
        let back = from_bytes(&bytes).unwrap();
        prop_assert_eq!(back[0].bits(), if wide { 64 } else { 32 });
        prop_assert_eq!(back[0].shape(), &dims[..]);
        prop_assert_eq!(back, vars);
    }
}
