use pasc_bits::{ContextHash, Direction, Fold, HashStage, Mode, Select, Shift};
use pasc_core::{PascError, Predictor, Word};

/// Finite-context predictor: a last-value table addressed by a hash of the
/// preceding `order` values.
///
/// While the hash is undefined (short or zero-containing history) it falls
/// back to predicting the previous value.
#[derive(Debug, Clone)]
pub struct FiniteContext<W: Word> {
    hash: ContextHash,
    table: Vec<W>,
    history: Vec<u64>,
    prev: W,
}

/// Largest table the predictor will allocate, in address bits.
pub const MAX_TABLE_BITS: u32 = 24;

impl<W: Word> FiniteContext<W> {
    pub fn new(hash: ContextHash, table_size: usize) -> Result<Self, PascError> {
        if hash.width() != W::BITS {
            return Err(PascError::type_mismatch(
                "FiniteContext",
                format!("{}-bit context hash", W::BITS),
                format!("{}-bit context hash", hash.width()),
            ));
        }
        if !table_size.is_power_of_two() || table_size > 1 << MAX_TABLE_BITS {
            return Err(PascError::InvalidParameter(format!(
                "context table size must be a power of two up to 2^{}, got {}",
                MAX_TABLE_BITS, table_size
            )));
        }
        Ok(Self {
            table: vec![W::default(); table_size],
            history: Vec::with_capacity(hash.order()),
            hash,
            prev: W::default(),
        })
    }

    /// FCM-style hash over `order` values and a `2^table_bits` table: each
    /// value is folded into `table_bits`-wide chunks and shifted left by its
    /// age, so older values weigh on the higher address bits.
    pub fn folded(order: usize, table_bits: u32) -> Result<Self, PascError> {
        if order == 0 || table_bits == 0 || table_bits > MAX_TABLE_BITS {
            return Err(PascError::InvalidParameter(format!(
                "finite context needs order >= 1 and table bits in 1..={}, got {} and {}",
                MAX_TABLE_BITS, order, table_bits
            )));
        }
        let width = W::BITS;
        let stages = (0..order)
            .map(|i| -> Result<HashStage, PascError> {
                let age = (order - 1 - i) as u32;
                Ok(HashStage {
                    select: Select::identity(width)?,
                    fold: Fold::new(Mode::right(table_bits, width)?)?,
                    shift: Shift::new(Mode::new(Direction::Left, age.min(width), width)?),
                })
            })
            .collect::<Result<Vec<_>, PascError>>()?;
        let last = Select::new(Mode::right(table_bits, width)?);
        Self::new(ContextHash::new(stages, last)?, 1 << table_bits)
    }

    pub fn order(&self) -> usize {
        self.hash.order()
    }

    pub fn table_size(&self) -> usize {
        self.table.len()
    }

    fn slot(&self) -> Option<usize> {
        let key = self.hash.hash(&self.history)?;
        Some((key as usize) & (self.table.len() - 1))
    }
}

impl<W: Word> Predictor<W> for FiniteContext<W> {
    fn predict(&self) -> W {
        match self.slot() {
            Some(slot) => self.table[slot],
            None => self.prev,
        }
    }

    fn update(&mut self, value: W) {
        if let Some(slot) = self.slot() {
            self.table[slot] = value;
        }
        if self.history.len() == self.hash.order() {
            self.history.remove(0);
        }
        self.history.push(value.to_bits());
        self.prev = value;
    }

    fn reset(&mut self) {
        self.table.iter_mut().for_each(|slot| *slot = W::default());
        self.history.clear();
        self.prev = W::default();
    }

    fn name(&self) -> String {
        format!(
            "Finite Context (order {}, table {})",
            self.order(),
            self.table.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falls_back_to_last_value() {
        let mut pred = FiniteContext::<u32>::folded(2, 8).unwrap();
        assert_eq!(pred.predict(), 0);
        pred.update(17);
        // history too short for the hash
        assert_eq!(pred.predict(), 17);
        pred.update(0);
        // zero in the history
        assert_eq!(pred.predict(), 0);
    }

    #[test]
    fn test_learns_repeating_pattern() {
        let pattern = [3u64, 9, 4, 1, 7];
        let mut pred = FiniteContext::<u64>::folded(2, 12).unwrap();
        for &v in pattern.iter().cycle().take(pattern.len() * 2) {
            pred.update(v);
        }
        // second pass through the cycle: every context has been seen once
        for &v in &pattern {
            assert_eq!(pred.predict(), v);
            pred.update(v);
        }
    }

    #[test]
    fn test_validation() {
        assert!(FiniteContext::<u32>::folded(0, 8).is_err());
        assert!(FiniteContext::<u32>::folded(2, 0).is_err());
        assert!(FiniteContext::<u32>::folded(2, MAX_TABLE_BITS + 1).is_err());

        let hash = ContextHash::new(
            vec![HashStage::identity(64).unwrap()],
            Select::identity(64).unwrap(),
        )
        .unwrap();
        assert!(matches!(
            FiniteContext::<u32>::new(hash.clone(), 16),
            Err(PascError::TypeMismatch { .. })
        ));
        assert!(FiniteContext::<i64>::new(hash, 12).is_err());
    }

    #[test]
    fn test_reset_clears_history() {
        let mut pred = FiniteContext::<i32>::folded(1, 4).unwrap();
        pred.update(5);
        pred.update(6);
        pred.update(5);
        assert_eq!(pred.predict(), 6);
        pred.reset();
        assert_eq!(pred.predict(), 0);
        assert_eq!(pred.name(), "Finite Context (order 1, table 16)");
    }
}
