/// Extends collections of floats with a range over the usable values
pub trait RangeExt {
    /// Minimum and maximum of the finite values
    ///
    /// Any NAN or infinite values are skipped rather than poisoning the result,
    /// which is what is wanted when choosing a colour range for a field. Returns
    /// `None` when there are no finite values at all.
    ///
    /// ```rust
    /// # use pltools_utils::RangeExt;
    /// assert_eq!([1.1_f64, 0.5, 2.2].iter().finite_range(), Some((0.5, 2.2)));
    /// assert_eq!([1.1_f64, f64::NAN, f64::INFINITY].iter().finite_range(), Some((1.1, 1.1)));
    /// assert_eq!([f64::NAN].iter().finite_range(), None);
    /// assert_eq!(Vec::<f64>::new().iter().finite_range(), None);
    /// ```
    fn finite_range(self) -> Option<(f64, f64)>;
}

impl<'a, I> RangeExt for I
where
    I: IntoIterator<Item = &'a f64>,
{
    fn finite_range(self) -> Option<(f64, f64)> {
        self.into_iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
