// THEORY:
// An `Interval` is the bounded domain of a pixel container: an inclusive box of
// integer coordinates, one `[min, max]` range per dimension. Containers without an
// interval are unbounded and can be read at any coordinate (`Scalar`, an
// unbounded `FunctionView`).
//
// Iteration order is fixed: the first dimension varies fastest. `ArrayImg` lays
// out its storage in the same order, so materializing a view is a single pass
// over `positions()`.

use crate::error::{PixelError, Result};

/// An inclusive, non-empty box of integer coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    min: Vec<i64>,
    max: Vec<i64>,
}

impl Interval {
    /// Creates an interval from inclusive corners.
    ///
    /// Fails if the corners differ in rank, any `min[d] > max[d]`, or the number
    /// of coordinates does not fit in `usize`.
    pub fn new(min: Vec<i64>, max: Vec<i64>) -> Result<Self> {
        let num_elements = if min.len() == max.len() {
            min.iter().zip(&max).try_fold(1usize, |count, (&lo, &hi)| {
                let extent = hi.checked_sub(lo).filter(|&e| e >= 0)?.checked_add(1)?;
                count.checked_mul(usize::try_from(extent).ok()?)
            })
        } else {
            None
        };
        if num_elements.is_none() {
            return Err(PixelError::InvalidInterval { min, max });
        }
        Ok(Self { min, max })
    }

    /// An interval with its origin at zero and the given extent per dimension.
    pub fn from_dimensions(dimensions: &[usize]) -> Result<Self> {
        let min = vec![0; dimensions.len()];
        let max = dimensions
            .iter()
            .map(|&d| i64::try_from(d).map(|d| d - 1))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| PixelError::InvalidInterval {
                min: min.clone(),
                max: Vec::new(),
            })?;
        Self::new(min, max)
    }

    pub fn num_dimensions(&self) -> usize {
        self.min.len()
    }

    pub fn min(&self) -> &[i64] {
        &self.min
    }

    pub fn max(&self) -> &[i64] {
        &self.max
    }

    pub fn dimension(&self, d: usize) -> usize {
        (self.max[d] - self.min[d] + 1) as usize
    }

    pub fn dimensions(&self) -> Vec<usize> {
        (0..self.num_dimensions()).map(|d| self.dimension(d)).collect()
    }

    /// Total number of coordinates. A zero-dimensional interval holds one.
    pub fn num_elements(&self) -> usize {
        self.dimensions().iter().product()
    }

    pub fn contains(&self, position: &[i64]) -> bool {
        position.len() == self.num_dimensions()
            && position
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(p, (lo, hi))| lo <= p && p <= hi)
    }

    /// The same box moved by `offset`.
    pub fn translate(&self, offset: &[i64]) -> Result<Self> {
        if offset.len() != self.num_dimensions() {
            return Err(PixelError::DimensionMismatch {
                expected: self.num_dimensions(),
                actual: offset.len(),
            });
        }
        let shift = |corner: &[i64]| -> Option<Vec<i64>> {
            corner.iter().zip(offset).map(|(c, o)| c.checked_add(*o)).collect()
        };
        match (shift(&self.min), shift(&self.max)) {
            (Some(min), Some(max)) => Ok(Self { min, max }),
            _ => Err(PixelError::InvalidInterval {
                min: self.min.clone(),
                max: self.max.clone(),
            }),
        }
    }

    /// Every coordinate in the interval, first dimension fastest.
    pub fn positions(&self) -> Positions<'_> {
        Positions {
            interval: self,
            next: Some(self.min.clone()),
        }
    }
}

/// Iterator over the coordinates of an `Interval`.
pub struct Positions<'a> {
    interval: &'a Interval,
    next: Option<Vec<i64>>,
}

impl Iterator for Positions<'_> {
    type Item = Vec<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        for d in 0..successor.len() {
            if successor[d] < self.interval.max[d] {
                successor[d] += 1;
                self.next = Some(successor);
                return Some(current);
            }
            successor[d] = self.interval.min[d];
        }
        Some(current)
    }
}
