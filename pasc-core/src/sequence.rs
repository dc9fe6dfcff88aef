use crate::array::{element_count, Array, ArrayKind, IntegerArray};
use crate::buffer::{Buffer, Element};
use crate::error::PascError;

/// A traversal order over a shape together with the data visited in that order.
///
/// `indices[k]` is the row-major flat position of the `k`-th visited element and
/// `data[k]` its value. `indices` is always a permutation of `0..∏shape`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    indices: Vec<usize>,
    shape: Vec<usize>,
    data: Buffer,
}

impl Sequence {
    pub fn new(indices: Vec<usize>, shape: Vec<usize>, data: Buffer) -> Result<Self, PascError> {
        let n = element_count(&shape).ok_or_else(|| {
            PascError::ShapeMismatch(format!("sequence shape {:?} overflows usize", shape))
        })?;
        if indices.len() != n || data.len() != n {
            return Err(PascError::ShapeMismatch(format!(
                "sequence of {} indices and {} values over shape {:?} ({} elements)",
                indices.len(),
                data.len(),
                shape,
                n
            )));
        }
        if !is_permutation(&indices) {
            return Err(PascError::ShapeMismatch(
                "sequence indices are not a permutation".to_string(),
            ));
        }
        Ok(Self {
            indices,
            shape,
            data,
        })
    }

    /// Visit `array` in `indices` order.
    pub fn gather<K: ArrayKind>(array: &Array<K>, indices: Vec<usize>) -> Result<Self, PascError> {
        if indices.len() != array.len() || !is_permutation(&indices) {
            return Err(PascError::ShapeMismatch(format!(
                "traversal of {} indices does not cover shape {:?}",
                indices.len(),
                array.shape()
            )));
        }
        let data = array.buffer().gather(&indices);
        Ok(Self {
            indices,
            shape: array.shape().to_vec(),
            data,
        })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &Buffer {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn values<T: Element>(&self) -> Result<&[T], PascError> {
        T::slice(&self.data).ok_or_else(|| {
            PascError::type_mismatch("Sequence", T::DTYPE.to_string(), self.data.dtype())
        })
    }

    /// Put values listed in traversal order back at their original coordinates.
    pub fn scatter<K: ArrayKind>(&self, values: Buffer) -> Result<Array<K>, PascError> {
        if values.len() != self.len() {
            return Err(PascError::ShapeMismatch(format!(
                "{} values for a sequence of {}",
                values.len(),
                self.len()
            )));
        }
        Array::new(values.scatter(&self.indices), self.shape.clone())
    }

    /// The visited data back in original coordinates.
    pub fn restore(&self) -> Result<IntegerArray, PascError> {
        self.scatter(self.data.clone())
    }
}

/// Circular shift: element `i` moves to `(i + shift) mod n`.
pub fn roll<T: Clone>(data: &[T], shift: isize) -> Vec<T> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }
    let k = shift.rem_euclid(n as isize) as usize;
    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&data[n - k..]);
    out.extend_from_slice(&data[..n - k]);
    out
}

/// True if `indices` holds every value of `0..indices.len()` exactly once.
pub fn is_permutation(indices: &[usize]) -> bool {
    let mut seen = vec![false; indices.len()];
    for &i in indices {
        match seen.get_mut(i) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_numpy_semantics() {
        assert_eq!(roll(&[1, 2, 3, 4], 1), vec![4, 1, 2, 3]);
        assert_eq!(roll(&[1, 2, 3, 4], -1), vec![2, 3, 4, 1]);
        assert_eq!(roll(&[1, 2, 3, 4], 6), vec![3, 4, 1, 2]);
        assert!(roll::<u8>(&[], 3).is_empty());
    }

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[2, 0, 1]));
        assert!(is_permutation(&[]));
        assert!(!is_permutation(&[0, 0, 1]));
        assert!(!is_permutation(&[0, 3, 1]));
    }

    #[test]
    fn test_gather_then_restore() {
        let arr = IntegerArray::from_vec(vec![10i32, 11, 12, 13, 14, 15], vec![2, 3]).unwrap();
        let seq = Sequence::gather(&arr, vec![2, 3, 4, 5, 0, 1]).unwrap();
        assert_eq!(seq.values::<i32>().unwrap(), &[12, 13, 14, 15, 10, 11]);
        assert_eq!(seq.restore().unwrap(), arr);
    }

    #[test]
    fn test_rejects_bad_indices() {
        let arr = IntegerArray::flat(vec![1u32, 2, 3]).unwrap();
        assert!(Sequence::gather(&arr, vec![0, 1]).is_err());
        assert!(Sequence::gather(&arr, vec![0, 1, 1]).is_err());
        assert!(Sequence::new(vec![0, 1], vec![3], Buffer::U32(vec![1, 2])).is_err());
        assert!(matches!(
            Sequence::new(vec![], vec![usize::MAX, 3, 0], Buffer::U32(vec![])),
            Err(PascError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_scatter_length_checked() {
        let arr = IntegerArray::flat(vec![1u32, 2, 3]).unwrap();
        let seq = Sequence::gather(&arr, vec![1, 2, 0]).unwrap();
        let res: Result<IntegerArray, _> = seq.scatter(Buffer::U32(vec![1]));
        assert!(matches!(res, Err(PascError::ShapeMismatch(_))));
    }
}
