use pasc_core::{Element, PascError, PredictionArray, Predictor, Sequence, Word};
use pasc_predict::PredictorKind;

/// Drives a predictor over a [`Sequence`] and writes every prediction straight
/// to its original coordinate in a pre-allocated output.
pub struct Feeder<W: Word> {
    predictor: Box<dyn Predictor<W>>,
    steps: usize,
}

impl<W: Word> Feeder<W> {
    pub fn new(predictor: Box<dyn Predictor<W>>) -> Self {
        Self {
            predictor,
            steps: 0,
        }
    }

    pub fn from_kind(kind: &PredictorKind) -> Result<Self, PascError> {
        Ok(Self::new(kind.build::<W>()?))
    }

    /// Elements stepped through across all feeds.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Run a fresh predictor over `sequence`. Returns the predictor's name
    /// and the predictions in original coordinates.
    pub fn feed(&mut self, sequence: &Sequence) -> Result<(String, PredictionArray), PascError> {
        self.predictor.reset();
        let values = sequence.values::<W>()?;
        let mut output = vec![W::default(); values.len()];
        for (&index, &value) in sequence.indices().iter().zip(values) {
            output[index] = self.predictor.predict();
            self.predictor.update(value);
        }
        self.steps += values.len();
        let name = self.predictor.name();
        self.predictor.reset();
        let predictions = PredictionArray::new(W::into_buffer(output), sequence.shape().to_vec())?;
        Ok((name, predictions))
    }
}
