use crate::array::IntegerArray;
use crate::error::PascError;
use crate::sequence::Sequence;

/// Deterministic traversal order over a shape.
pub trait Sequencer: Send + Sync {
    fn name(&self) -> String;

    /// Row-major flat indices in visiting order, beginning at `start`.
    ///
    /// Must be a permutation of `0..∏shape` and depend only on the arguments.
    fn traversal(&self, shape: &[usize], start: usize) -> Result<Vec<usize>, PascError>;

    fn flatten(&self, start: usize, input: &IntegerArray) -> Result<Sequence, PascError> {
        let indices = self.traversal(input.shape(), start)?;
        Sequence::gather(input, indices)
    }
}
