use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Consistent scientific number formatting
    ///
    /// Rust's `{:e}` output drops the exponent sign and padding, which makes
    /// columns of simulation times and field values awkward to read. This
    /// always writes a signed exponent padded to `exp_pad` digits.
    ///
    /// ```rust
    /// # use pltools_utils::ValueExt;
    /// assert_eq!((-1.0_f64).sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((0.00125_f64).sci(3, 2), "1.250e-03".to_string());
    /// assert_eq!((6.02e23_f64).sci(2, 3), "6.02e+023".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let formatted = f!("{:.precision$e}", self);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                f!("{mantissa}e{sign}{digits:0>exp_pad$}")
            }
            // inf and NaN have no exponent to pad
            None => formatted,
        }
    }
}
