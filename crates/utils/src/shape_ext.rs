/// Extends array shapes with common element arithmetic
pub trait ShapeExt {
    /// Total number of elements described by the shape
    ///
    /// ```rust
    /// # use pltools_utils::ShapeExt;
    /// assert_eq!([4_usize, 3, 2].element_count(), 24);
    /// assert_eq!([4_usize, 0, 2].element_count(), 0);
    /// ```
    fn element_count(&self) -> usize;

    /// The same shape with the axis order reversed
    ///
    /// ```rust
    /// # use pltools_utils::ShapeExt;
    /// assert_eq!([4_usize, 3, 2].reversed(), vec![2, 3, 4]);
    /// assert_eq!([8_usize, 16].reversed(), vec![16, 8]);
    /// ```
    fn reversed(&self) -> Vec<usize>;
}

impl ShapeExt for [usize] {
    fn element_count(&self) -> usize {
        self.iter().product()
    }

    fn reversed(&self) -> Vec<usize> {
        self.iter().rev().copied().collect()
    }
}

impl<const N: usize> ShapeExt for [usize; N] {
    fn element_count(&self) -> usize {
        self.as_slice().element_count()
    }

    fn reversed(&self) -> Vec<usize> {
        self.as_slice().reversed()
    }
}

impl ShapeExt for Vec<usize> {
    fn element_count(&self) -> usize {
        self.as_slice().element_count()
    }

    fn reversed(&self) -> Vec<usize> {
        self.as_slice().reversed()
    }
}
