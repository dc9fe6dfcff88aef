//! Context-hash operators.
//!
//! Each operator is a pure function over a fixed-width unsigned word. A
//! [`Mode`] fixes the direction (`Left` = most significant side, `Right` =
//! least significant side), the bit count and the word width; it is validated
//! once at construction so the operators themselves never fail.

use crate::bitstream::{mask, BitError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which end of the word an operator works from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Most significant side (`<n`).
    Left,
    /// Least significant side (`>n`).
    Right,
}

/// Validated operator configuration: direction + bit count within a word width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode {
    direction: Direction,
    count: u32,
    width: u32,
}

impl Mode {
    pub fn new(direction: Direction, count: u32, width: u32) -> Result<Self, BitError> {
        if width == 0 || width > 64 || count > width {
            return Err(BitError::InvalidMode { count, width });
        }
        Ok(Self {
            direction,
            count,
            width,
        })
    }

    pub fn left(count: u32, width: u32) -> Result<Self, BitError> {
        Self::new(Direction::Left, count, width)
    }

    pub fn right(count: u32, width: u32) -> Result<Self, BitError> {
        Self::new(Direction::Right, count, width)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = match self.direction {
            Direction::Left => '<',
            Direction::Right => '>',
        };
        write!(f, "{}{}:{}", sym, self.count, self.width)
    }
}

/// Keep `count` bits from one end of the word.
///
/// `>6` keeps the six lowest bits, `<11` the eleven highest (shifted down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Select(Mode);

impl Select {
    pub fn new(mode: Mode) -> Self {
        Self(mode)
    }

    /// Pass-through: keep every bit.
    pub fn identity(width: u32) -> Result<Self, BitError> {
        Ok(Self(Mode::right(width, width)?))
    }

    pub fn mode(&self) -> Mode {
        self.0
    }

    pub fn apply(&self, value: u64) -> u64 {
        let Mode {
            direction,
            count,
            width,
        } = self.0;
        let value = value & mask(width);
        match direction {
            Direction::Right => value & mask(count),
            Direction::Left if count == 0 => 0,
            Direction::Left => value >> (width - count),
        }
    }
}

/// Cut the word into `count`-bit chunks and xor them together.
///
/// `Right` aligns chunks on the least significant bit, `Left` on the most
/// significant bit; the odd-sized remainder is xored in as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fold(Mode);

impl Fold {
    pub fn new(mode: Mode) -> Result<Self, BitError> {
        if mode.count == 0 {
            return Err(BitError::InvalidMode {
                count: 0,
                width: mode.width,
            });
        }
        Ok(Self(mode))
    }

    /// A single chunk spanning the whole word.
    pub fn identity(width: u32) -> Result<Self, BitError> {
        Self::new(Mode::right(width, width)?)
    }

    pub fn mode(&self) -> Mode {
        self.0
    }

    pub fn apply(&self, value: u64) -> u64 {
        let Mode {
            direction,
            count,
            width,
        } = self.0;
        let mut value = value & mask(width);
        let mut remaining = width;
        let mut acc = 0u64;
        match direction {
            Direction::Right => {
                while remaining > 0 {
                    acc ^= value & mask(count);
                    value = value.checked_shr(count).unwrap_or(0);
                    remaining = remaining.saturating_sub(count);
                }
            }
            Direction::Left => {
                while remaining > 0 {
                    let take = count.min(remaining);
                    acc ^= (value >> (remaining - take)) & mask(take);
                    remaining -= take;
                }
            }
        }
        acc
    }
}

/// Shift the word by `count` bits, truncated to the word width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift(Mode);

impl Shift {
    pub fn new(mode: Mode) -> Self {
        Self(mode)
    }

    /// Shift by zero.
    pub fn identity(width: u32) -> Result<Self, BitError> {
        Ok(Self(Mode::right(0, width)?))
    }

    pub fn mode(&self) -> Mode {
        self.0
    }

    pub fn apply(&self, value: u64) -> u64 {
        let Mode {
            direction,
            count,
            width,
        } = self.0;
        let value = value & mask(width);
        match direction {
            Direction::Left => value.checked_shl(count).unwrap_or(0) & mask(width),
            Direction::Right => value.checked_shr(count).unwrap_or(0),
        }
    }
}

/// Split the word into a `(high, low)` pair.
///
/// `>n` puts the lowest `n` bits in `low`; `<n` puts the highest `n` bits in `high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split(Mode);

impl Split {
    pub fn new(mode: Mode) -> Self {
        Self(mode)
    }

    pub fn mode(&self) -> Mode {
        self.0
    }

    pub fn apply(&self, value: u64) -> (u64, u64) {
        let Mode {
            direction,
            count,
            width,
        } = self.0;
        let value = value & mask(width);
        let low_bits = match direction {
            Direction::Right => count,
            Direction::Left => width - count,
        };
        (value.checked_shr(low_bits).unwrap_or(0), value & mask(low_bits))
    }
}

/// Xor every element together. Empty input yields zero.
pub fn xor_all(values: &[u64]) -> u64 {
    values.iter().fold(0, |acc, &v| acc ^ v)
}

/// One history slot of a [`ContextHash`]: select, then fold, then shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashStage {
    pub select: Select,
    pub fold: Fold,
    pub shift: Shift,
}

impl HashStage {
    pub fn identity(width: u32) -> Result<Self, BitError> {
        Ok(Self {
            select: Select::identity(width)?,
            fold: Fold::identity(width)?,
            shift: Shift::identity(width)?,
        })
    }

    pub fn apply(&self, value: u64) -> u64 {
        self.shift.apply(self.fold.apply(self.select.apply(value)))
    }
}

/// Composed hash over the last `order` values of a sequence.
///
/// Every history value runs through its own [`HashStage`]; the results are
/// xored and passed through a final [`Select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextHash {
    stages: Vec<HashStage>,
    last: Select,
}

impl ContextHash {
    pub fn new(stages: Vec<HashStage>, last: Select) -> Result<Self, BitError> {
        let width = last.mode().width();
        let consistent = stages.iter().all(|s| {
            s.select.mode().width() == width
                && s.fold.mode().width() == width
                && s.shift.mode().width() == width
        });
        if stages.is_empty() || !consistent {
            return Err(BitError::InvalidMode {
                count: stages.len() as u32,
                width,
            });
        }
        Ok(Self { stages, last })
    }

    pub fn order(&self) -> usize {
        self.stages.len()
    }

    pub fn width(&self) -> u32 {
        self.last.mode().width()
    }

    /// Hash of `history` (oldest first).
    ///
    /// `None` while the history is incomplete: wrong length or any zero entry.
    pub fn hash(&self, history: &[u64]) -> Option<u64> {
        if history.len() != self.stages.len() || history.iter().any(|&v| v == 0) {
            return None;
        }
        let mixed = self
            .stages
            .iter()
            .zip(history)
            .fold(0u64, |acc, (stage, &v)| acc ^ stage.apply(v));
        Some(self.last.apply(mixed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select() {
        let low6 = Select::new(Mode::right(6, 32).unwrap());
        assert_eq!(low6.apply(0b1110_1011), 0b10_1011);

        let top11 = Select::new(Mode::left(11, 32).unwrap());
        assert_eq!(top11.apply(0xFFE0_0000), 0x7FF);
        assert_eq!(top11.apply(10), 0);

        assert_eq!(Select::identity(64).unwrap().apply(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_fold_right_and_left() {
        // 8-bit word 1010_1001, 5-bit chunks from the right: 01001 ^ 101 = 01100
        let right = Fold::new(Mode::right(5, 8).unwrap()).unwrap();
        assert_eq!(right.apply(0b1010_1001), 0b01100);

        // from the left: 10101 ^ 001 = 10100
        let left = Fold::new(Mode::left(5, 8).unwrap()).unwrap();
        assert_eq!(left.apply(0b1010_1001), 0b10100);

        assert!(Fold::new(Mode::right(0, 8).unwrap()).is_err());
    }

    #[test]
    fn test_shift_truncates() {
        let left = Shift::new(Mode::left(4, 32).unwrap());
        assert_eq!(left.apply(0xF000_000F), 0x0000_00F0);
        let right = Shift::new(Mode::right(32, 32).unwrap());
        assert_eq!(right.apply(0xFFFF_FFFF), 0);
    }

    #[test]
    fn test_split() {
        let right = Split::new(Mode::right(4, 16).unwrap());
        assert_eq!(right.apply(0xABCD), (0xABC, 0xD));
        let left = Split::new(Mode::left(4, 16).unwrap());
        assert_eq!(left.apply(0xABCD), (0xA, 0xBCD));
    }

    #[test]
    fn test_mode_validation() {
        assert!(Mode::left(33, 32).is_err());
        assert!(Mode::right(0, 0).is_err());
        assert_eq!(Mode::left(11, 32).unwrap().to_string(), "<11:32");
    }

    #[test]
    fn test_context_hash() {
        let stage = HashStage {
            select: Select::identity(32).unwrap(),
            fold: Fold::identity(32).unwrap(),
            shift: Shift::new(Mode::left(1, 32).unwrap()),
        };
        let last = Select::new(Mode::right(4, 32).unwrap());
        let ctx = ContextHash::new(vec![HashStage::identity(32).unwrap(), stage], last).unwrap();

        assert_eq!(ctx.order(), 2);
        // 0b0011 ^ (0b0101 << 1) = 0b1001
        assert_eq!(ctx.hash(&[0b0011, 0b0101]), Some(0b1001));
        assert_eq!(ctx.hash(&[0, 5]), None);
        assert_eq!(ctx.hash(&[5]), None);
    }

    #[test]
    fn test_context_hash_rejects_mixed_widths() {
        let last = Select::identity(32).unwrap();
        assert!(ContextHash::new(vec![HashStage::identity(64).unwrap()], last).is_err());
        assert!(ContextHash::new(vec![], last).is_err());
    }

    #[test]
    fn test_xor_all() {
        assert_eq!(xor_all(&[]), 0);
        assert_eq!(xor_all(&[0b1100, 0b1010, 0b0001]), 0b0111);
    }
}
