//! Numeric channel traits.
//!
//! A [`Dual`](crate::Dual) stores its value and derivative in two
//! channels of the same type. For first derivatives the channel is a
//! plain float; for higher orders it is itself a dual number, so the
//! channel type must support the same in-place arithmetic and
//! elementary functions the reduction engine performs on floats.
//!
//! - [`Value`]: read the innermost primitive value out of any
//!   number-like type, however deeply it nests.
//! - [`Real`]: everything the reduction engine needs from a channel.
//!
//! Both are implemented here for `f32` and `f64`, delegating to
//! [`num_traits::Float`]; the recursive implementation for `Dual<T>`
//! lives next to the dual type.

use num_traits::{AsPrimitive, Float, FloatConst};
use std::fmt::Debug;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

/// Types that carry a primitive floating-point value.
///
/// # Examples
///
/// ```
/// use dualexpr::{Dual, Value};
///
/// let x: Dual<Dual<f64>> = Dual::from(2.5);
/// assert_eq!(x.value(), 2.5);
/// assert_eq!(4.0_f32.value(), 4.0);
/// ```
pub trait Value {
    /// The float found at the bottom of any nesting.
    type Primitive: Float + FloatConst + Debug;

    /// The innermost primitive value.
    fn value(&self) -> Self::Primitive;
}

/// The capability set of a dual number's value/derivative channel.
///
/// The reduction engine only ever updates channels in place
/// (`+=`, `-=`, `*=`, `/=`) or replaces them with the result of an
/// elementary function, so that is all this trait asks for. For
/// `Dual<T>` channels the compound operators themselves run the
/// reduction engine one level down.
pub trait Real:
    Value + Copy + Debug + PartialEq + PartialOrd + AddAssign + SubAssign + MulAssign + DivAssign
{
    /// Convert a literal. Derivative channels of the result are zero.
    fn from_f64(v: f64) -> Self;

    /// Additive identity.
    fn zero() -> Self {
        Self::from_f64(0.0)
    }

    /// Multiplicative identity.
    fn one() -> Self {
        Self::from_f64(1.0)
    }

    /// `ln(10)`.
    fn ln_10() -> Self;

    /// Negation.
    fn neg(self) -> Self;

    /// Sine.
    fn sin(self) -> Self;

    /// Cosine.
    fn cos(self) -> Self;

    /// Tangent.
    fn tan(self) -> Self;

    /// Arc sine.
    fn asin(self) -> Self;

    /// Arc cosine.
    fn acos(self) -> Self;

    /// Arc tangent.
    fn atan(self) -> Self;

    /// Exponential.
    fn exp(self) -> Self;

    /// Natural logarithm.
    fn ln(self) -> Self;

    /// Base-10 logarithm.
    fn log10(self) -> Self;

    /// Square root.
    fn sqrt(self) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// `self` raised to `exponent`.
    fn powf(self, exponent: Self) -> Self;

    /// `self` raised to a constant `exponent`. Derivative channels of
    /// `exponent` are ignored, so no logarithm of `self` is taken and
    /// negative bases stay finite.
    fn powf_const(self, exponent: Self) -> Self;

    /// Set the derivative channel found `depth` levels down the value
    /// channel to `value`.
    ///
    /// Returns `false` when there is no derivative channel at that
    /// depth (plain floats have none).
    fn seed(&mut self, depth: usize, value: f64) -> bool;
}

macro_rules! impl_real_for_float {
    ($($t:ty),*) => {$(
        impl Value for $t {
            type Primitive = $t;

            #[inline]
            fn value(&self) -> $t {
                *self
            }
        }

        impl Real for $t {
            #[inline]
            fn from_f64(v: f64) -> Self {
                AsPrimitive::<$t>::as_(v)
            }

            #[inline]
            fn ln_10() -> Self {
                <$t as FloatConst>::LN_10()
            }

            #[inline]
            fn neg(self) -> Self {
                -self
            }

            #[inline]
            fn sin(self) -> Self {
                Float::sin(self)
            }

            #[inline]
            fn cos(self) -> Self {
                Float::cos(self)
            }

            #[inline]
            fn tan(self) -> Self {
                Float::tan(self)
            }

            #[inline]
            fn asin(self) -> Self {
                Float::asin(self)
            }

            #[inline]
            fn acos(self) -> Self {
                Float::acos(self)
            }

            #[inline]
            fn atan(self) -> Self {
                Float::atan(self)
            }

            #[inline]
            fn exp(self) -> Self {
                Float::exp(self)
            }

            #[inline]
            fn ln(self) -> Self {
                Float::ln(self)
            }

            #[inline]
            fn log10(self) -> Self {
                Float::log10(self)
            }

            #[inline]
            fn sqrt(self) -> Self {
                Float::sqrt(self)
            }

            #[inline]
            fn abs(self) -> Self {
                Float::abs(self)
            }

            #[inline]
            fn powf(self, exponent: Self) -> Self {
                Float::powf(self, exponent)
            }

            #[inline]
            fn powf_const(self, exponent: Self) -> Self {
                Float::powf(self, exponent)
            }

            #[inline]
            fn seed(&mut self, _depth: usize, _value: f64) -> bool {
                false
            }
        }
    )*};
}

impl_real_for_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn float_channels_delegate_to_host_math() {
        assert_eq!(Real::sin(0.5_f64), 0.5_f64.sin());
        assert_eq!(Real::powf(2.0_f64, 10.0), 1024.0);
        assert_eq!(Real::powf_const(-2.0_f64, 3.0), -8.0);
        assert_relative_eq!(Real::log10(1000.0_f32), 3.0, epsilon = 1e-6);
        assert_eq!(<f64 as Real>::ln_10(), std::f64::consts::LN_10);
    }

    #[test]
    fn identities_come_from_literals() {
        assert_eq!(<f64 as Real>::zero(), 0.0);
        assert_eq!(<f32 as Real>::one(), 1.0);
        assert_eq!(<f32 as Real>::from_f64(0.25), 0.25_f32);
    }

    #[test]
    fn floats_have_no_derivative_channel() {
        let mut x = 3.0_f64;
        assert!(!x.seed(0, 1.0));
        assert_eq!(x, 3.0);
    }

    #[test]
    fn domain_errors_propagate_nan() {
        assert!(Real::ln(-1.0_f64).is_nan());
        assert!(Real::asin(2.0_f64).is_nan());
        assert_eq!(Real::ln(0.0_f64), f64::NEG_INFINITY);
    }
}
