//! Approximate equality.
//!
//! The `==` operator of the generated float types already compares with a tiny fixed tolerance
//! (their `EPSILON`). This module is for comparisons that need a caller-chosen tolerance, such as
//! results that accumulated rounding error over several operations.

mod impls;

use std::{fmt, panic::Location};

/// Types that can be compared for *approximate equality*.
///
/// Compound types implementing this trait are considered *equal* if all of their components are.
pub trait ApproxEq<Rhs: ?Sized = Self> {
    /// Type of the tolerance, ie. the component type of the compared values.
    type Tolerance: DefaultTolerance + Copy;

    /// Performs an *absolute comparison* of `self` and `other`.
    ///
    /// If the absolute difference of the compared values is less than or equal to
    /// `abs_tolerance`, the values are considered to be equal. `NaN` is never equal to anything.
    fn abs_diff_eq(&self, other: &Rhs, abs_tolerance: Self::Tolerance) -> bool;
}

/// Supplies the tolerance used by [`assert_approx_eq!`][crate::assert_approx_eq] and
/// [`assert_approx_ne!`][crate::assert_approx_ne] when none is configured.
pub trait DefaultTolerance {
    const DEFAULT_ABS_TOLERANCE: Self;
}

impl DefaultTolerance for f32 {
    const DEFAULT_ABS_TOLERANCE: Self = Self::EPSILON;
}

impl DefaultTolerance for f64 {
    const DEFAULT_ABS_TOLERANCE: Self = Self::EPSILON;
}

impl DefaultTolerance for i32 {
    const DEFAULT_ABS_TOLERANCE: Self = 0;
}

/// Assertion guard returned by the [`assert_approx_eq!`][crate::assert_approx_eq]
/// and [`assert_approx_ne!`][crate::assert_approx_ne] macros.
///
/// The assertion is checked when the guard is dropped. Call [`Asserter::abs`] to set the tolerance
/// of the comparison; otherwise [`DEFAULT_ABS_TOLERANCE`] is used.
///
/// [`DEFAULT_ABS_TOLERANCE`]: DefaultTolerance::DEFAULT_ABS_TOLERANCE
pub struct Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    left: &'a T,
    right: &'a T,
    kind: AssertionKind,
    location: &'static Location<'static>,
    msg: Option<fmt::Arguments<'a>>,
    abs: Option<T::Tolerance>,
}

impl<'a, T> Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    #[doc(hidden)]
    #[track_caller]
    pub fn new(
        left: &'a T,
        right: &'a T,
        kind: AssertionKind,
        msg: Option<fmt::Arguments<'a>>,
    ) -> Self {
        Self {
            left,
            right,
            kind,
            location: Location::caller(),
            msg,
            abs: None,
        }
    }

    /// Compares the values with an absolute tolerance of `abs`.
    pub fn abs(&mut self, abs: T::Tolerance) -> &mut Self {
        self.abs = Some(abs);
        self
    }
}

impl<'a, T> Drop for Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    // `#[track_caller]` has no effect on destructors, so the location is captured in `new`.
    fn drop(&mut self) {
        let abs = self
            .abs
            .unwrap_or(<T::Tolerance as DefaultTolerance>::DEFAULT_ABS_TOLERANCE);
        let equal = T::abs_diff_eq(self.left, self.right, abs);
        if (!equal && self.kind == AssertionKind::Eq) || (equal && self.kind == AssertionKind::Ne) {
            assert_failed_inner(self.left, self.right, self.kind, self.location, self.msg);
        }
    }
}

fn assert_failed_inner(
    left: &dyn fmt::Debug,
    right: &dyn fmt::Debug,
    kind: AssertionKind,
    location: &Location<'_>,
    args: Option<fmt::Arguments<'_>>,
) -> ! {
    let op = match kind {
        AssertionKind::Eq => "==",
        AssertionKind::Ne => "!=",
    };
    match args {
        Some(args) => panic!(
            r#"assertion `left {op} right` failed at {location}: {args}
  left: {left:?}
 right: {right:?}"#
        ),
        None => panic!(
            r#"assertion `left {op} right` failed at {location}
  left: {left:?}
 right: {right:?}"#
        ),
    }
}

#[doc(hidden)]
#[derive(Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssertionKind {
    Eq,
    Ne,
}

/// Asserts that two expressions are approximately equal to each other (using [`ApproxEq`]).
///
/// Returns an [`Asserter`] that can be used to set the tolerance of the comparison.
///
/// # Examples
///
/// ```
/// # use game_linalg::*;
/// let a = fvec3(1.0, 2.0, 3.0);
/// assert_approx_eq!(a * 0.1 * 10.0, a).abs(1e-6);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(&$lhs, &$rhs, $crate::approx::AssertionKind::Eq, ::core::option::Option::None)
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(&$lhs, &$rhs, $crate::approx::AssertionKind::Eq, ::core::option::Option::Some(::core::format_args!($($arg)+)))
    };
}

/// Asserts that two expressions are *not* approximately equal to each other (using
/// [`ApproxEq`]).
///
/// ```
/// # use game_linalg::*;
/// assert_approx_ne!(ivec2(1, 2), ivec2(1, 3));
/// assert_approx_ne!(100.0, 99.0).abs(0.5);
/// ```
#[macro_export]
macro_rules! assert_approx_ne {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Ne,
            ::core::option::Option::None
        )
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Ne,
            ::core::option::Option::Some(::core::format_args!($($arg)+))
        )
    };
}

#[cfg(test)]
mod tests {
    #[test]
    #[should_panic(expected = "assertion `left != right` failed")]
    fn fail_ne() {
        assert_approx_ne!(1.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "assertion `left == right` failed")]
    fn fail_eq() {
        assert_approx_eq!(1.0, 2.0);
    }

    #[test]
    #[should_panic(expected = "my message")]
    fn assertion_message() {
        assert_approx_eq!(1.0, 2.0, "my message");
    }

    #[test]
    #[should_panic(expected = "ne message 7")]
    fn assertion_message_ne() {
        assert_approx_ne!(1.0, 1.0, "ne message {}", 7);
    }

    #[test]
    fn epsilon() {
        assert_approx_eq!(1.0f32, 1.0 + f32::EPSILON);
        assert_approx_ne!(1.0f32, 1.0 + 2.0 * f32::EPSILON);
        assert_approx_eq!(1.0f64, 1.0 + f64::EPSILON);
    }

    #[test]
    fn negative() {
        assert_approx_ne!(1.0, -1.0);
        assert_approx_ne!(1.0, -1.0).abs(1.0);
        assert_approx_eq!(1.0, -1.0).abs(2.0);
        assert_approx_eq!(-1.0, -1.0).abs(0.0);
    }

    #[test]
    fn integers() {
        assert_approx_eq!(3, 3);
        assert_approx_ne!(3, 4);
        assert_approx_eq!(3, 4).abs(1);
        assert_approx_eq!(-5, 5).abs(10);
        assert_approx_ne!(-5, 5).abs(9);
        assert_approx_ne!(i32::MIN, i32::MAX).abs(i32::MAX);
        assert_approx_ne!(3, 3).abs(-1);
    }

    #[test]
    fn nan() {
        assert_approx_ne!(f32::NAN, f32::NAN).abs(0.0);
        assert_approx_ne!(f32::NAN, f32::NAN).abs(1.0);
        assert_approx_ne!(f32::NAN, 0.0).abs(1.0);
        assert_approx_ne!(f64::NAN, f64::NAN).abs(f64::INFINITY);
    }

    #[test]
    fn inf() {
        assert_approx_eq!(f32::INFINITY, f32::INFINITY).abs(0.0);
        assert_approx_ne!(f32::INFINITY, f32::NEG_INFINITY).abs(f32::INFINITY);
        assert_approx_ne!(f32::INFINITY, f32::MAX).abs(10000.0);
        assert_approx_eq!(f64::INFINITY, f64::INFINITY).abs(0.0);
        assert_approx_ne!(f64::MAX, f64::INFINITY).abs(10000.0);
    }

    #[test]
    fn arrays() {
        assert_approx_eq!([1.0, 2.0], [1.0, 2.0 + 1e-7]).abs(1e-6);
        assert_approx_ne!([1.0, 2.0], [1.0, 2.1]).abs(1e-6);
        assert_approx_eq!([1, 2, 3], [1, 2, 3]);
    }
}
