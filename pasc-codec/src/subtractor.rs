use pasc_core::{Subtractor, Word};
use serde::{Deserialize, Serialize};

/// Bitwise xor of prediction and truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Xor;

impl Subtractor for Xor {
    fn name(&self) -> &'static str {
        "XOR"
    }

    fn combine<W: Word>(&self, prediction: W, value: W) -> W {
        prediction ^ value
    }
}

/// Wrapping difference `prediction - truth`.
///
/// Replay recovers the truth as `prediction - residual`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fpd;

impl Subtractor for Fpd {
    fn name(&self) -> &'static str {
        "FPD"
    }

    fn combine<W: Word>(&self, prediction: W, value: W) -> W {
        prediction.wrapping_sub(&value)
    }
}

/// Subtractor selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubtractorKind {
    #[default]
    Xor,
    Fpd,
}

impl SubtractorKind {
    pub const ALL: [SubtractorKind; 2] = [SubtractorKind::Xor, SubtractorKind::Fpd];
}

impl Subtractor for SubtractorKind {
    fn name(&self) -> &'static str {
        match self {
            SubtractorKind::Xor => Xor.name(),
            SubtractorKind::Fpd => Fpd.name(),
        }
    }

    fn combine<W: Word>(&self, prediction: W, value: W) -> W {
        match self {
            SubtractorKind::Xor => Xor.combine(prediction, value),
            SubtractorKind::Fpd => Fpd.combine(prediction, value),
        }
    }
}
