use crate::feeder::Feeder;
use pasc_codec::{LinearSequencer, LzcEncoder, MapperKind, SubtractorKind, TraversalOrder};
use pasc_core::{
    with_word, Coded, DType, Element, Encoder, FloatArray, IntegerArray, Mapper, PascError,
    PredictionArray, Predictor, Sequence, Sequencer, Subtractor, Word,
};
use pasc_predict::PredictorKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::debug;

/// Serializable description of a [`Workflow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub mapper: MapperKind,
    #[serde(default)]
    pub order: TraversalOrder,
    pub predictor: PredictorKind,
    #[serde(default)]
    pub subtractor: SubtractorKind,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            mapper: MapperKind::default(),
            order: TraversalOrder::default(),
            predictor: PredictorKind::LastValue,
            subtractor: SubtractorKind::default(),
        }
    }
}

/// The five-stage pipeline: map, sequence, predict, subtract, encode.
///
/// `compress` and `decompress` are exact inverses for every combination of
/// stages; NaNs survive as NaN.
#[derive(Debug, Clone)]
pub struct Workflow<M = MapperKind, S = LinearSequencer, D = SubtractorKind, E = LzcEncoder> {
    mapper: M,
    sequencer: S,
    predictor: PredictorKind,
    subtractor: D,
    encoder: E,
}

impl Workflow {
    pub fn from_config(config: &WorkflowConfig) -> Result<Self, PascError> {
        config.predictor.validate()?;
        Ok(Self::new(
            config.mapper,
            LinearSequencer::new(config.order.clone()),
            config.predictor.clone(),
            config.subtractor,
            LzcEncoder,
        ))
    }

    pub fn from_json(json: &str) -> Result<Self, PascError> {
        let config: WorkflowConfig = serde_json::from_str(json)
            .map_err(|e| PascError::InvalidParameter(format!("workflow config: {}", e)))?;
        Self::from_config(&config)
    }

    pub fn config(&self) -> WorkflowConfig {
        WorkflowConfig {
            mapper: self.mapper,
            order: self.sequencer.order().clone(),
            predictor: self.predictor.clone(),
            subtractor: self.subtractor,
        }
    }
}

impl<M: Mapper, S: Sequencer, D: Subtractor, E: Encoder> Workflow<M, S, D, E> {
    pub fn new(mapper: M, sequencer: S, predictor: PredictorKind, subtractor: D, encoder: E) -> Self {
        Self {
            mapper,
            sequencer,
            predictor,
            subtractor,
            encoder,
        }
    }

    pub fn predictor(&self) -> &PredictorKind {
        &self.predictor
    }

    /// Compress `input`, starting the traversal at row-major index `start`.
    ///
    /// With `use_feeder` the predictor loop runs through a [`Feeder`]; both
    /// paths produce identical output.
    pub fn compress(
        &self,
        input: &FloatArray,
        start: usize,
        use_feeder: bool,
    ) -> Result<Coded, PascError> {
        let started = Instant::now();
        let integer = self.mapper.map(input)?;
        let sequence = self.sequencer.flatten(start, &integer)?;
        let prediction = with_word!(integer.dtype(), "Workflow", |W| {
            if use_feeder {
                Feeder::<W>::from_kind(&self.predictor)?
                    .feed(&sequence)
                    .map(|(_, p)| p)
            } else {
                self.predict_direct::<W>(&sequence)
            }
        })?;
        let residual = self.subtractor.subtract(&prediction, &integer)?;
        let coded = self.encoder.encode(&residual, start)?;
        debug!(
            workflow = %self,
            elements = input.len(),
            input_bytes = input.nbytes(),
            coded_bytes = coded.nbytes(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "compressed"
        );
        Ok(coded)
    }

    fn predict_direct<W: Word>(&self, sequence: &Sequence) -> Result<PredictionArray, PascError> {
        let mut predictor = self.predictor.build::<W>()?;
        let predictions: Vec<W> = sequence
            .values::<W>()?
            .iter()
            .map(|&value| {
                let p = predictor.predict();
                predictor.update(value);
                p
            })
            .collect();
        sequence.scatter(W::into_buffer(predictions))
    }

    /// Rebuild the float array from `coded`.
    pub fn decompress(&self, coded: &Coded) -> Result<FloatArray, PascError> {
        let started = Instant::now();
        let float = DType::float_of_width(coded.bits())?;
        let dtype = self.mapper.integer_dtype(float)?;
        let residual = self.encoder.decode(coded)?.into_buffer().cast_bits(dtype)?;
        let indices = self.sequencer.traversal(coded.shape(), coded.start())?;
        let ordered = residual.gather(&indices);

        let values = with_word!(dtype, "Workflow", |W| self.replay::<W>(&ordered))?;
        let integer: IntegerArray = Sequence::new(indices, coded.shape().to_vec(), values)?.restore()?;
        let output = self.mapper.revmap(&integer)?;
        debug!(
            workflow = %self,
            elements = output.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "decompressed"
        );
        Ok(output)
    }

    /// Undo the subtraction element by element, in traversal order.
    fn replay<W: Word>(&self, residuals: &pasc_core::Buffer) -> Result<pasc_core::Buffer, PascError> {
        let residuals = W::slice(residuals).ok_or_else(|| {
            PascError::type_mismatch("Workflow", W::DTYPE.to_string(), residuals.dtype())
        })?;
        let mut predictor = self.predictor.build::<W>()?;
        let values: Vec<W> = residuals
            .iter()
            .map(|&r| {
                let value = self.subtractor.combine(predictor.predict(), r);
                predictor.update(value);
                value
            })
            .collect();
        Ok(W::into_buffer(values))
    }

    /// Compressed size relative to the input size.
    pub fn compression_ratio(&self, input: &FloatArray, coded: &Coded) -> f64 {
        coded.compression_ratio(input.nbytes())
    }
}

impl<M: Mapper, S: Sequencer, D: Subtractor, E: Encoder> fmt::Display for Workflow<M, S, D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.mapper.name(),
            self.sequencer.name(),
            self.predictor.name(),
            self.subtractor.name(),
            self.encoder.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasc_codec::{Ordered, Xor};

    #[test]
    fn test_nan_scenario() {
        let input = FloatArray::flat(vec![1.0f32, -1.0, 0.0, f32::NAN]).unwrap();
        let wf = Workflow::new(
            Ordered,
            LinearSequencer::default(),
            PredictorKind::LastValue,
            Xor,
            LzcEncoder,
        );
        let coded = wf.compress(&input, 0, false).unwrap();
        let back = wf.decompress(&coded).unwrap();
        assert!(back.eq_nan_aware(&input));
        assert!(back.as_slice::<f32>().unwrap()[3].is_nan());
    }

    #[test]
    fn test_feeder_matches_direct() {
        let input = FloatArray::from_vec(
            (0..24).map(|i| (i as f64 * 0.3).sin()).collect::<Vec<_>>(),
            vec![2, 3, 4],
        )
        .unwrap();
        let wf = Workflow::from_config(&WorkflowConfig {
            predictor: PredictorKind::TwoStride,
            order: TraversalOrder::Axes(vec![2, 0, 1]),
            ..WorkflowConfig::default()
        })
        .unwrap();
        assert_eq!(
            wf.compress(&input, 7, true).unwrap(),
            wf.compress(&input, 7, false).unwrap()
        );
    }

    #[test]
    fn test_config_json() {
        let wf = Workflow::from_json(
            r#"{"mapper":"Lindstrom","predictor":{"StrideConfidence":{"threshold":7}},"subtractor":"Fpd"}"#,
        )
        .unwrap();
        assert_eq!(
            wf.to_string(),
            "Lindstrom, Linear, Stride Conf. (threshold: 7), FPD, LZC"
        );
        assert_eq!(wf.config().order, TraversalOrder::RowMajor);

        let err = Workflow::from_json(r#"{"predictor":{"Akumuli":{"table_size":100}}}"#);
        assert!(matches!(err, Err(PascError::InvalidParameter(_))));
        assert!(Workflow::from_json("{").is_err());
    }

    #[test]
    fn test_bad_start() {
        let input = FloatArray::flat(vec![1.0f32; 4]).unwrap();
        let wf = Workflow::from_config(&WorkflowConfig::default()).unwrap();
        assert!(matches!(
            wf.compress(&input, 4, false),
            Err(PascError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_compression_ratio() {
        let input = FloatArray::flat(vec![3.5f64; 1000]).unwrap();
        let wf = Workflow::from_config(&WorkflowConfig::default()).unwrap();
        let coded = wf.compress(&input, 0, false).unwrap();
        // constant input: every residual after the first is zero
        assert!(wf.compression_ratio(&input, &coded) < 0.15);
    }
}
