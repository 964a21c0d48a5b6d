use faer::prelude::*;

/// Fixed-capacity circular buffer of six-component velocity samples.
///
/// Each push moves the write offset back by one slot, so the sample `lag`
/// steps old lives at slot `(lag + offset) mod capacity`. Nothing is copied
/// or reallocated; the oldest sample is overwritten after `capacity` pushes.
#[derive(Debug, Clone)]
pub struct VelocityHistory {
    /// Samples, one column per slot `[6][capacity]`
    samples: Mat<f64>,
    /// Slot of the newest sample
    offset: usize,
}

impl VelocityHistory {
    /// Creates a history of `capacity` zero samples.
    ///
    /// # Panics
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        Self::with_offset(capacity, 0)
    }

    /// Creates a history whose write offset starts at `offset mod capacity`.
    ///
    /// # Panics
    /// Panics if `capacity == 0`.
    pub fn with_offset(capacity: usize, offset: usize) -> Self {
        assert!(capacity > 0, "velocity history needs a non-zero capacity");
        Self {
            samples: Mat::zeros(6, capacity),
            offset: offset % capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.ncols()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Stores `sample` as the newest entry, shifting every other entry one lag older.
    pub fn push(&mut self, sample: ColRef<f64>) {
        self.offset = wrap(self.offset as isize - 1, self.capacity());
        self.samples.col_mut(self.offset).copy_from(sample);
    }

    /// Slot holding the sample `lag` steps old
    #[inline]
    pub fn slot(&self, lag: usize) -> usize {
        wrap((lag + self.offset) as isize, self.capacity())
    }

    /// Sample `lag` steps old, zero lag being the newest
    #[inline]
    pub fn get(&self, lag: usize) -> ColRef<f64> {
        self.samples.col(self.slot(lag))
    }

    /// Samples ordered from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = ColRef<'_, f64>> + '_ {
        (0..self.capacity()).map(move |lag| self.get(lag))
    }

    /// Resets every sample to zero, keeping the offset.
    pub fn clear(&mut self) {
        self.samples = Mat::zeros(6, self.capacity());
    }
}

/// Wraps a possibly negative index into `[0, n)`
#[inline]
fn wrap(i: isize, n: usize) -> usize {
    i.rem_euclid(n as isize) as usize
}

//------------------------------------------------------------------------------
// Testing
//------------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools;

    fn tagged(i: usize) -> Col<f64> {
        Col::from_fn(6, |j| (10 * i + j) as f64)
    }

    #[test]
    fn test_push_order() {
        let mut history = VelocityHistory::new(3);
        history.push(tagged(1).as_ref());
        assert_eq!(history.offset(), 2);
        assert_eq!(history.get(0), tagged(1).as_ref());
        assert_eq!(history.get(1), Col::<f64>::zeros(6).as_ref());

        history.push(tagged(2).as_ref());
        assert_eq!(history.get(0), tagged(2).as_ref());
        assert_eq!(history.get(1), tagged(1).as_ref());
    }

    #[test]
    fn test_full_cycle_any_offset() {
        let capacity = 7;
        for start in 0..capacity {
            let mut history = VelocityHistory::with_offset(capacity, start);
            (0..capacity + 3).for_each(|i| history.push(tagged(i).as_ref()));

            // Holds the last `capacity` samples, newest first
            let expected = (3..capacity + 3).rev().map(tagged).collect_vec();
            history
                .iter()
                .zip(expected.iter())
                .for_each(|(actual, expected)| assert_eq!(actual, expected.as_ref()));
        }
    }

    #[test]
    fn test_exactly_capacity_pushes_any_offset() {
        let capacity = 5;
        for start in 0..capacity {
            let mut history = VelocityHistory::with_offset(capacity, start);
            (0..capacity).for_each(|i| history.push(tagged(i).as_ref()));

            // Every initial zero sample has been overwritten, newest first
            assert_eq!(history.offset(), start);
            let expected = (0..capacity).rev().map(tagged).collect_vec();
            assert_eq!(history.iter().count(), capacity);
            history
                .iter()
                .zip(expected.iter())
                .for_each(|(actual, expected)| assert_eq!(actual, expected.as_ref()));
        }
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(-1, 5), 4);
        assert_eq!(wrap(-5, 5), 0);
        assert_eq!(wrap(-6, 5), 4);
        assert_eq!(wrap(7, 5), 2);
    }
}
