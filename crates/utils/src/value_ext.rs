use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// Rust prints `1e-5` and `1.0e19` rather than a fixed width, which makes
    /// columns of grid values unreadable. This pads the mantissa to a fixed
    /// `precision` and the exponent to `exp_pad` digits, always signed.
    ///
    /// ```rust
    /// # use lettools_utils::ValueExt;
    /// assert_eq!((2.5e19).sci(5, 2), "2.50000e+19".to_string());
    /// assert_eq!((-1.6e-19).sci(3, 3), "-1.600e-019".to_string());
    /// assert_eq!((0.0).sci(2, 2), "0.00e+00".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let formatted = f!("{:.precision$e}", &self, precision = precision);

        // LowerExp always writes an 'e', but avoid the unwrap anyway
        let Some((mantissa, exponent)) = formatted.split_once('e') else {
            return formatted;
        };

        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };

        f!("{mantissa}e{sign}{digits:0>exp_pad$}")
    }
}
