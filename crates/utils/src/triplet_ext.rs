use crate::f;

/// Compact display of `[x, y, z]` style values
///
/// Grid resolutions, half-sizes and positions are logged often enough that a
/// consistent `(x, y, z)` representation is worth having.
pub trait TripletExt {
    /// Format as `(x, y, z)`
    ///
    /// ```rust
    /// # use lettools_utils::TripletExt;
    /// assert_eq!([10, 20, 1].triplet(), "(10, 20, 1)");
    /// assert_eq!([0.5, 1.0, 2.25].triplet(), "(0.5, 1, 2.25)");
    /// ```
    fn triplet(&self) -> String;
}

impl<T: std::fmt::Display> TripletExt for [T; 3] {
    fn triplet(&self) -> String {
        f!("({}, {}, {})", self[0], self[1], self[2])
    }
}

impl<T: std::fmt::Display + nalgebra::Scalar> TripletExt for nalgebra::Vector3<T> {
    fn triplet(&self) -> String {
        f!("({}, {}, {})", self.x, self.y, self.z)
    }
}
