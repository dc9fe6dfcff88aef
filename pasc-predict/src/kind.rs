use crate::akumuli::{Akumuli, DEFAULT_TABLE_SIZE};
use crate::context::FiniteContext;
use crate::ensemble::{LastBest, MostRight};
use crate::stride::{LastValue, Stride, StrideConfidence, TwoStride};
use pasc_core::{PascError, Predictor, Word};
use serde::{Deserialize, Serialize};

/// Predictor selector.
///
/// The word width is only known once data arrives, so a kind is a recipe:
/// [`PredictorKind::build`] turns it into a fresh predictor for a given
/// [`Word`]. Ensembles nest further kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictorKind {
    LastValue,
    Stride,
    TwoStride,
    StrideConfidence {
        threshold: u32,
    },
    /// `table_size` must be a power of two.
    Akumuli {
        table_size: usize,
    },
    FiniteContext {
        order: usize,
        table_bits: u32,
    },
    LastBest(Vec<PredictorKind>),
    MostRight(Vec<PredictorKind>),
}

impl PredictorKind {
    /// StrideConfidence with the customary threshold of 7.
    pub fn stride_confidence7() -> Self {
        PredictorKind::StrideConfidence { threshold: 7 }
    }

    pub fn akumuli() -> Self {
        PredictorKind::Akumuli {
            table_size: DEFAULT_TABLE_SIZE,
        }
    }

    pub fn build<W: Word>(&self) -> Result<Box<dyn Predictor<W>>, PascError> {
        let predictor: Box<dyn Predictor<W>> = match self {
            PredictorKind::LastValue => Box::new(LastValue::<W>::new()),
            PredictorKind::Stride => Box::new(Stride::<W>::new()),
            PredictorKind::TwoStride => Box::new(TwoStride::<W>::new()),
            PredictorKind::StrideConfidence { threshold } => {
                Box::new(StrideConfidence::<W>::new(*threshold)?)
            }
            PredictorKind::Akumuli { table_size } => Box::new(Akumuli::<W>::new(*table_size)?),
            PredictorKind::FiniteContext { order, table_bits } => {
                Box::new(FiniteContext::<W>::folded(*order, *table_bits)?)
            }
            PredictorKind::LastBest(kinds) => Box::new(LastBest::new(Self::build_all(kinds)?)?),
            PredictorKind::MostRight(kinds) => Box::new(MostRight::new(Self::build_all(kinds)?)?),
        };
        Ok(predictor)
    }

    fn build_all<W: Word>(kinds: &[PredictorKind]) -> Result<Vec<Box<dyn Predictor<W>>>, PascError> {
        kinds.iter().map(|k| k.build::<W>()).collect()
    }

    /// Check the parameters without keeping the predictor.
    pub fn validate(&self) -> Result<(), PascError> {
        self.build::<u32>()?;
        self.build::<u64>()?;
        Ok(())
    }

    pub fn name(&self) -> String {
        match self.build::<u64>() {
            Ok(predictor) => predictor.name(),
            Err(_) => format!("{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_matches_direct() {
        let mut built = PredictorKind::Stride.build::<i32>().unwrap();
        let mut direct = Stride::<i32>::new();
        for v in [1, 4, 9, 16] {
            assert_eq!(built.predict(), direct.predict());
            built.update(v);
            direct.update(v);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        let bad = PredictorKind::Akumuli { table_size: 3 };
        assert!(matches!(bad.validate(), Err(PascError::InvalidParameter(_))));

        let nested = PredictorKind::MostRight(vec![PredictorKind::LastValue, bad]);
        assert!(nested.validate().is_err());
        assert!(PredictorKind::LastBest(vec![]).validate().is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(
            PredictorKind::stride_confidence7().name(),
            "Stride Conf. (threshold: 7)"
        );
        assert_eq!(PredictorKind::akumuli().name(), "Akumuli (table 128)");
        let ensemble = PredictorKind::LastBest(vec![PredictorKind::LastValue, PredictorKind::TwoStride]);
        assert_eq!(ensemble.name(), "LastBest [Last Value, Stride (2)]");
    }

    #[test]
    fn test_serde_roundtrip() {
        let kind = PredictorKind::MostRight(vec![
            PredictorKind::stride_confidence7(),
            PredictorKind::FiniteContext {
                order: 2,
                table_bits: 10,
            },
        ]);
        let json = serde_json::to_string(&kind).unwrap();
        let back: PredictorKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);

        let parsed: PredictorKind = serde_json::from_str(r#"{"Akumuli":{"table_size":64}}"#).unwrap();
        assert_eq!(parsed, PredictorKind::Akumuli { table_size: 64 });
    }
}
