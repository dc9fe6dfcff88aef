use crate::array::{IntegerArray, PredictionArray, ResidualArray};
use crate::error::PascError;
use crate::word::Word;

/// Forms residuals from predictions and true values.
///
/// `combine` must satisfy `combine(p, combine(p, v)) == v`, so the same
/// primitive turns a residual back into the true value during replay.
pub trait Subtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn combine<W: Word>(&self, prediction: W, value: W) -> W;

    fn subtract(
        &self,
        prediction: &PredictionArray,
        integer: &IntegerArray,
    ) -> Result<ResidualArray, PascError> {
        if prediction.shape() != integer.shape() {
            return Err(PascError::ShapeMismatch(format!(
                "{}: prediction shape {:?} vs integer shape {:?}",
                self.name(),
                prediction.shape(),
                integer.shape()
            )));
        }
        if prediction.dtype() != integer.dtype() {
            return Err(PascError::type_mismatch(
                self.name(),
                integer.dtype().to_string(),
                prediction.dtype(),
            ));
        }
        crate::with_word!(integer.dtype(), self.name(), |W| {
            let predicted = prediction.as_slice::<W>()?;
            let values = integer.as_slice::<W>()?;
            let residual: Vec<W> = predicted
                .iter()
                .zip(values)
                .map(|(&p, &v)| self.combine(p, v))
                .collect();
            ResidualArray::from_vec(residual, integer.shape().to_vec())
        })
    }
}
