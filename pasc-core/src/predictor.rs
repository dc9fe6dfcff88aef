use crate::word::Word;

/// Causal predictor over a stream of fixed-width words.
///
/// For every position the caller invokes [`predict`](Predictor::predict)
/// first and then [`update`](Predictor::update) with the true value.
pub trait Predictor<W: Word>: Send {
    /// Prediction for the next value. Reads state only.
    fn predict(&self) -> W;

    /// Advance state with the observed value.
    fn update(&mut self, value: W);

    /// Return to the freshly constructed state.
    fn reset(&mut self);

    fn name(&self) -> String;
}

impl<W: Word> Predictor<W> for Box<dyn Predictor<W>> {
    fn predict(&self) -> W {
        (**self).predict()
    }

    fn update(&mut self, value: W) {
        (**self).update(value)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn name(&self) -> String {
        (**self).name()
    }
}
