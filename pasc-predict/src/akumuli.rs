use pasc_core::{PascError, Predictor, Word};

/// Hash-addressed last-value cache.
///
/// The hash folds the high bits of each value into a running index:
/// `h = ((h << 5) ^ (value >> shift)) & (size - 1)`, with `shift = bits - 11`
/// for 32-bit words and `bits - 14` for 64-bit words.
#[derive(Debug, Clone)]
pub struct Akumuli<W: Word> {
    table: Vec<W>,
    mask: u64,
    last_hash: u64,
    context_shift: usize,
}

pub const DEFAULT_TABLE_SIZE: usize = 128;

impl<W: Word> Akumuli<W> {
    pub fn new(table_size: usize) -> Result<Self, PascError> {
        if !table_size.is_power_of_two() {
            return Err(PascError::InvalidParameter(format!(
                "Akumuli table size must be a power of two, got {}",
                table_size
            )));
        }
        let context_shift = match W::BITS {
            32 => 32 - 11,
            64 => 64 - 14,
            other => return Err(PascError::UnsupportedBitWidth(other)),
        };
        Ok(Self {
            table: vec![W::default(); table_size],
            mask: table_size as u64 - 1,
            last_hash: 0,
            context_shift,
        })
    }

    pub fn table_size(&self) -> usize {
        self.table.len()
    }

    fn next_hash(&self, value: W) -> u64 {
        let shifted = (self.last_hash << 5) & pasc_bits::mask(W::BITS);
        (shifted ^ (value >> self.context_shift).to_bits()) & self.mask
    }
}

impl<W: Word> Predictor<W> for Akumuli<W> {
    fn predict(&self) -> W {
        self.table[self.last_hash as usize]
    }

    fn update(&mut self, value: W) {
        self.table[self.last_hash as usize] = value;
        self.last_hash = self.next_hash(value);
    }

    fn reset(&mut self) {
        self.table.iter_mut().for_each(|slot| *slot = W::default());
        self.last_hash = 0;
    }

    fn name(&self) -> String {
        format!("Akumuli (table {})", self.table.len())
    }
}
