use pasc_core::{is_permutation, PascError, Sequencer};
use serde::{Deserialize, Serialize};

/// Axis order in which a grid is walked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraversalOrder {
    /// Last axis fastest (C order).
    #[default]
    RowMajor,
    /// First axis fastest (full transpose, Fortran order).
    ColumnMajor,
    /// Walk the grid transposed by this axis permutation.
    Axes(Vec<usize>),
}

impl TraversalOrder {
    fn permutation(&self, ndim: usize) -> Result<Vec<usize>, PascError> {
        match self {
            TraversalOrder::RowMajor => Ok((0..ndim).collect()),
            TraversalOrder::ColumnMajor => Ok((0..ndim).rev().collect()),
            TraversalOrder::Axes(axes) => {
                if axes.len() != ndim || !is_permutation(axes) {
                    return Err(PascError::ShapeMismatch(format!(
                        "axes {:?} are not a permutation of {} dimensions",
                        axes, ndim
                    )));
                }
                Ok(axes.clone())
            }
        }
    }
}

/// Visits the grid along straight lines in the configured axis order,
/// rotated so that the `start` element comes first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearSequencer {
    order: TraversalOrder,
}

impl LinearSequencer {
    pub fn new(order: TraversalOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &TraversalOrder {
        &self.order
    }
}

/// Row-major flat indices of the grid walked with axes in `perm` order.
fn transposed_indices(shape: &[usize], perm: &[usize]) -> Vec<usize> {
    let n: usize = shape.iter().product();
    let mut strides = vec![1usize; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    let dims: Vec<usize> = perm.iter().map(|&a| shape[a]).collect();
    let steps: Vec<usize> = perm.iter().map(|&a| strides[a]).collect();

    let mut indices = Vec::with_capacity(n);
    let mut counter = vec![0usize; dims.len()];
    let mut flat = 0usize;
    for _ in 0..n {
        indices.push(flat);
        // odometer increment, last transposed axis fastest
        for axis in (0..dims.len()).rev() {
            counter[axis] += 1;
            flat += steps[axis];
            if counter[axis] < dims[axis] {
                break;
            }
            flat -= steps[axis] * dims[axis];
            counter[axis] = 0;
        }
    }
    indices
}

impl Sequencer for LinearSequencer {
    fn name(&self) -> String {
        match &self.order {
            TraversalOrder::RowMajor => "Linear".to_string(),
            TraversalOrder::ColumnMajor => "Linear (F)".to_string(),
            TraversalOrder::Axes(axes) => format!("Linear {:?}", axes),
        }
    }

    fn traversal(&self, shape: &[usize], start: usize) -> Result<Vec<usize>, PascError> {
        let n: usize = shape.iter().product();
        let perm = self.order.permutation(shape.len())?;
        if n == 0 {
            if start != 0 {
                return Err(PascError::ShapeMismatch(format!(
                    "start {} in an empty grid",
                    start
                )));
            }
            return Ok(Vec::new());
        }
        if start >= n {
            return Err(PascError::ShapeMismatch(format!(
                "start {} outside shape {:?} ({} elements)",
                start, shape, n
            )));
        }
        let mut indices = transposed_indices(shape, &perm);
        let position = indices.iter().position(|&i| i == start).unwrap_or(0);
        indices.rotate_left(position);
        Ok(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasc_core::{roll, IntegerArray};

    #[test]
    fn test_row_major_rotation() {
        let seq = LinearSequencer::default();
        assert_eq!(seq.traversal(&[2, 3], 0).unwrap(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(seq.traversal(&[2, 3], 4).unwrap(), vec![4, 5, 0, 1, 2, 3]);
        // row-major traversal is exactly roll(-start)
        let base: Vec<usize> = (0..6).collect();
        assert_eq!(seq.traversal(&[6], 2).unwrap(), roll(&base, -2));
    }

    #[test]
    fn test_column_major() {
        let seq = LinearSequencer::new(TraversalOrder::ColumnMajor);
        assert_eq!(seq.traversal(&[2, 3], 0).unwrap(), vec![0, 3, 1, 4, 2, 5]);
        assert_eq!(seq.traversal(&[2, 3], 1).unwrap(), vec![1, 4, 2, 5, 0, 3]);
    }

    #[test]
    fn test_axis_permutation() {
        let seq = LinearSequencer::new(TraversalOrder::Axes(vec![1, 0, 2]));
        // shape (2, 2, 2): axis 1 outermost, then 0, then 2
        assert_eq!(
            seq.traversal(&[2, 2, 2], 0).unwrap(),
            vec![0, 1, 4, 5, 2, 3, 6, 7]
        );
        let bad = LinearSequencer::new(TraversalOrder::Axes(vec![0, 0, 2]));
        assert!(bad.traversal(&[2, 2, 2], 0).is_err());
    }

    #[test]
    fn test_start_out_of_range() {
        let seq = LinearSequencer::default();
        assert!(matches!(
            seq.traversal(&[2, 2], 4),
            Err(PascError::ShapeMismatch(_))
        ));
        assert!(seq.traversal(&[0], 0).unwrap().is_empty());
        assert!(seq.traversal(&[0], 1).is_err());
    }

    #[test]
    fn test_flatten_gathers_data() {
        let arr = IntegerArray::from_vec(vec![10u32, 11, 12, 13], vec![2, 2]).unwrap();
        let seq = LinearSequencer::new(TraversalOrder::ColumnMajor)
            .flatten(2, &arr)
            .unwrap();
        assert_eq!(seq.indices(), &[2, 1, 3, 0]);
        assert_eq!(seq.values::<u32>().unwrap(), &[12, 11, 13, 10]);
        assert_eq!(seq.restore().unwrap(), arr);
    }
}
