use super::ApproxEq;

macro_rules! float_impl {
    ($($t:ty),+) => {
        $(
            impl ApproxEq for $t {
                type Tolerance = Self;

                fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
                    if !self.is_finite() || !other.is_finite() {
                        // `inf == inf`, `-inf == -inf`, `inf != -inf`, `NaN != NaN`
                        return self == other;
                    }

                    let diff = (self - other).abs();
                    diff <= abs_tolerance
                }
            }
        )+
    };
}

float_impl!(f32, f64);

impl ApproxEq for i32 {
    type Tolerance = Self;

    fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
        // a negative tolerance admits nothing
        u32::try_from(abs_tolerance).map_or(false, |tol| self.abs_diff(*other) <= tol)
    }
}

impl<'a, T: ApproxEq<U> + ?Sized, U: ?Sized> ApproxEq<U> for &'a T {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &U, abs_tolerance: Self::Tolerance) -> bool {
        T::abs_diff_eq(self, other, abs_tolerance)
    }
}

impl<T: ApproxEq<U>, U> ApproxEq<[U]> for [T] {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &[U], abs_tolerance: Self::Tolerance) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| T::abs_diff_eq(a, b, abs_tolerance))
    }
}

impl<T: ApproxEq<U>, U, const N: usize> ApproxEq<[U; N]> for [T; N] {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &[U; N], abs_tolerance: Self::Tolerance) -> bool {
        self.as_slice().abs_diff_eq(other.as_slice(), abs_tolerance)
    }
}
