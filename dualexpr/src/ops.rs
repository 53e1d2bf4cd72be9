//! Operator overloads and expression builders.
//!
//! Every arithmetic operator, comparison and elementary function on
//! [`Dual`] and [`Expr`] lives here. Arithmetic never computes a
//! derivative: it returns an [`Expr`] tree, simplified on the way by a
//! small set of algebraic rewrites.
//!
//! | Built                       | Becomes                        |
//! |-----------------------------|--------------------------------|
//! | `-(-e)`                     | `e`                            |
//! | `-(c * x)`                  | `(-c) * x`                     |
//! | `(-a) + (-b)`               | `-(a + b)`                     |
//! | `e + c`                     | `c + e`                        |
//! | `c * x`                     | fused scalar-dual product      |
//! | `c * (k * x)`               | `(c * k) * x`                  |
//! | `c * (-e)`                  | `(-c) * e`                     |
//! | `e * c`                     | `c * e`                        |
//! | `(-a) * (-b)`               | `a * b`                        |
//! | `inverse(a) * inverse(b)`   | `inverse(a * b)`               |
//! | `inverse(inverse(e))`       | `e`                            |
//! | `a - b`                     | `a + (-b)`                     |
//! | `a / b`                     | `a * inverse(b)`               |
//! | `e / c`                     | `(1/c) * e`                    |
//!
//! Here `c` and `k` are scalars, `x` is a dual and `e`, `a`, `b` are
//! any expression-like values.
//!
//! # Examples
//!
//! ```
//! use dualexpr::{Dual, Expr};
//!
//! let x = Dual::variable(2.0);
//! let e: Expr<f64> = -(3.0 * x);
//! assert!(e.is_number_dual_mul());
//!
//! let (c, _) = e.as_number_dual_mul().unwrap();
//! assert_eq!(c, -3.0);
//! ```

use crate::dual::Dual;
use crate::expr::{Expr, UnaryExpr};
use crate::op::{BinaryOp, UnaryOp};
use crate::real::Real;
use crate::traits::{ExprLike, Operable};
use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[inline]
fn times<T: Real>(mut a: T, b: T) -> T {
    a *= b;
    a
}

#[inline]
fn recip<T: Real>(a: T) -> T {
    let mut r = T::one();
    r /= a;
    r
}

/// `-e`
///
/// ```
/// use dualexpr::{ops, Dual, Expr};
///
/// let x: Expr<f64> = Dual::variable(1.0).into();
/// assert!(ops::negative(ops::negative(x)).is_dual());
/// assert_eq!(ops::negative(Expr::<f64>::Number(2.0)).as_number(), Some(-2.0));
/// ```
pub fn negative<T: Real>(e: Expr<T>) -> Expr<T> {
    match e {
        Expr::Number(c) => Expr::Number(c.neg()),
        Expr::Unary(UnaryExpr {
            op: UnaryOp::Neg,
            r,
        }) => *r,
        e => match e.as_number_dual_mul() {
            Some((c, d)) => Expr::number_dual_mul(c.neg(), d),
            None => Expr::unary(UnaryOp::Neg, e),
        },
    }
}

/// `1/e`
pub fn inverse<T: Real>(e: Expr<T>) -> Expr<T> {
    match e {
        Expr::Number(c) => Expr::Number(recip(c)),
        Expr::Unary(UnaryExpr {
            op: UnaryOp::Inv,
            r,
        }) => *r,
        e => Expr::unary(UnaryOp::Inv, e),
    }
}

/// `l + r`
pub fn sum<T: Real>(l: Expr<T>, r: Expr<T>) -> Expr<T> {
    match (l, r) {
        (Expr::Number(mut a), Expr::Number(b)) => {
            a += b;
            Expr::Number(a)
        }
        (c @ Expr::Number(_), e) | (e, c @ Expr::Number(_)) => {
            Expr::binary(BinaryOp::Add, c, e)
        }
        (
            Expr::Unary(UnaryExpr {
                op: UnaryOp::Neg,
                r: a,
            }),
            Expr::Unary(UnaryExpr {
                op: UnaryOp::Neg,
                r: b,
            }),
        ) => negative(sum(*a, *b)),
        (l, r) => Expr::binary(BinaryOp::Add, l, r),
    }
}

/// `l * r`
pub fn product<T: Real>(l: Expr<T>, r: Expr<T>) -> Expr<T> {
    match (l, r) {
        (Expr::Number(a), Expr::Number(b)) => Expr::Number(times(a, b)),
        (Expr::Number(c), e) => scaled(c, e),
        (e, c @ Expr::Number(_)) => Expr::binary(BinaryOp::Mul, c, e),
        (
            Expr::Unary(UnaryExpr {
                op: UnaryOp::Neg,
                r: a,
            }),
            Expr::Unary(UnaryExpr {
                op: UnaryOp::Neg,
                r: b,
            }),
        ) => product(*a, *b),
        (
            Expr::Unary(UnaryExpr {
                op: UnaryOp::Inv,
                r: a,
            }),
            Expr::Unary(UnaryExpr {
                op: UnaryOp::Inv,
                r: b,
            }),
        ) => inverse(product(*a, *b)),
        (l, r) => Expr::binary(BinaryOp::Mul, l, r),
    }
}

// Scalar on the left: the only place the fused node is produced.
fn scaled<T: Real>(c: T, e: Expr<T>) -> Expr<T> {
    match e {
        Expr::Dual(d) => Expr::number_dual_mul(c, d),
        Expr::Unary(UnaryExpr {
            op: UnaryOp::Neg,
            r,
        }) => product(Expr::Number(c.neg()), *r),
        e => match e.as_number_dual_mul() {
            Some((k, d)) => Expr::number_dual_mul(times(c, k), d),
            None => Expr::binary(BinaryOp::Mul, Expr::Number(c), e),
        },
    }
}

/// `l - r`, built as `l + (-r)`.
pub fn difference<T: Real>(l: Expr<T>, r: Expr<T>) -> Expr<T> {
    sum(l, negative(r))
}

/// `l / r`, built as `l * inverse(r)`.
pub fn quotient<T: Real>(l: Expr<T>, r: Expr<T>) -> Expr<T> {
    match (l, r) {
        (Expr::Number(mut a), Expr::Number(b)) => {
            a /= b;
            Expr::Number(a)
        }
        (e, Expr::Number(c)) => product(e, Expr::Number(recip(c))),
        (l, r) => product(l, inverse(r)),
    }
}

/// `l` raised to `r`.
pub fn power<T: Real>(l: Expr<T>, r: Expr<T>) -> Expr<T> {
    match (l, r) {
        (Expr::Number(a), Expr::Number(b)) => Expr::Number(a.powf_const(b)),
        (l, r) => Expr::binary(BinaryOp::Pow, l, r),
    }
}

macro_rules! impl_binary_ops {
    ($($Trait:ident, $method:ident, $builder:ident;)*) => {$(
        impl<T: Real, R: ExprLike<Value = T>> $Trait<R> for Dual<T> {
            type Output = Expr<T>;

            #[inline]
            fn $method(self, rhs: R) -> Expr<T> {
                $builder(self.into_expr(), rhs.into_expr())
            }
        }

        impl<T: Real, R: ExprLike<Value = T>> $Trait<R> for Expr<T> {
            type Output = Expr<T>;

            #[inline]
            fn $method(self, rhs: R) -> Expr<T> {
                $builder(self, rhs.into_expr())
            }
        }

        impl<T: Real> $Trait<f64> for Dual<T> {
            type Output = Expr<T>;

            #[inline]
            fn $method(self, rhs: f64) -> Expr<T> {
                $builder(self.into_expr(), Expr::from(rhs))
            }
        }

        impl<T: Real> $Trait<f64> for Expr<T> {
            type Output = Expr<T>;

            #[inline]
            fn $method(self, rhs: f64) -> Expr<T> {
                $builder(self, Expr::from(rhs))
            }
        }

        impl<T: Real> $Trait<Dual<T>> for f64 {
            type Output = Expr<T>;

            #[inline]
            fn $method(self, rhs: Dual<T>) -> Expr<T> {
                $builder(Expr::from(self), rhs.into_expr())
            }
        }

        impl<T: Real> $Trait<Expr<T>> for f64 {
            type Output = Expr<T>;

            #[inline]
            fn $method(self, rhs: Expr<T>) -> Expr<T> {
                $builder(Expr::from(self), rhs)
            }
        }
    )*};
}

impl_binary_ops! {
    Add, add, sum;
    Sub, sub, difference;
    Mul, mul, product;
    Div, div, quotient;
}

impl<T: Real> Neg for Dual<T> {
    type Output = Expr<T>;

    #[inline]
    fn neg(self) -> Expr<T> {
        negative(self.into_expr())
    }
}

impl<T: Real> Neg for Expr<T> {
    type Output = Expr<T>;

    #[inline]
    fn neg(self) -> Expr<T> {
        negative(self)
    }
}

// The value a comparison looks at.
trait ValueChannel<T> {
    fn channel(&self) -> T;
}

impl<T: Real> ValueChannel<T> for Dual<T> {
    fn channel(&self) -> T {
        self.val
    }
}

impl<T: Real> ValueChannel<T> for Expr<T> {
    fn channel(&self) -> T {
        self.value_channel()
    }
}

impl<T: Real> ValueChannel<T> for f64 {
    fn channel(&self) -> T {
        T::from_f64(*self)
    }
}

macro_rules! impl_comparison {
    ($($Lhs:ty => $Rhs:ty),* $(,)?) => {$(
        impl<T: Real> PartialEq<$Rhs> for $Lhs {
            #[inline]
            fn eq(&self, other: &$Rhs) -> bool {
                ValueChannel::<T>::channel(self) == ValueChannel::<T>::channel(other)
            }
        }

        impl<T: Real> PartialOrd<$Rhs> for $Lhs {
            #[inline]
            fn partial_cmp(&self, other: &$Rhs) -> Option<Ordering> {
                ValueChannel::<T>::channel(self).partial_cmp(&ValueChannel::<T>::channel(other))
            }
        }
    )*};
}

impl_comparison! {
    Dual<T> => Dual<T>,
    Dual<T> => Expr<T>,
    Dual<T> => f64,
    Expr<T> => Dual<T>,
    Expr<T> => Expr<T>,
    Expr<T> => f64,
    f64 => Dual<T>,
    f64 => Expr<T>,
}

macro_rules! unary_builders {
    ($($(#[$doc:meta])* $name:ident => $op:ident;)*) => {$(
        $(#[$doc])*
        #[inline]
        pub fn $name<E: ExprLike>(e: E) -> Expr<E::Value> {
            Expr::unary(UnaryOp::$op, e.into_expr())
        }
    )*};
}

unary_builders! {
    /// Sine.
    sin => Sin;
    /// Cosine.
    cos => Cos;
    /// Tangent.
    tan => Tan;
    /// Arc sine.
    asin => ArcSin;
    /// Arc cosine.
    acos => ArcCos;
    /// Arc tangent.
    atan => ArcTan;
    /// Exponential.
    ///
    /// ```
    /// use dualexpr::{exp, Dual};
    ///
    /// let y = Dual::from(exp(Dual::variable(0.0)));
    /// assert_eq!((y.val, y.grad), (1.0, 1.0));
    /// ```
    exp => Exp;
    /// Natural logarithm.
    log => Log;
    /// Base-10 logarithm.
    log10 => Log10;
    /// Square root.
    sqrt => Sqrt;
    /// Absolute value. The derivative is `sign(x)`; at zero it is NaN.
    abs => Abs;
}

/// `base` raised to `exponent`. Either side may be a plain `f64`, not
/// both.
pub fn pow<L, R>(base: L, exponent: R) -> Expr<<(L, R) as Operable>::Value>
where
    (L, R): Operable,
{
    let (l, r) = (base, exponent).into_operands();
    power(l, r)
}

/// `e * e`, through the multiplication rules.
pub fn abs2<E: ExprLike>(e: E) -> Expr<E::Value> {
    let e = e.into_expr();
    product(e.clone(), e)
}

/// Complex conjugate of a real expression: the expression itself.
pub fn conj<E: ExprLike>(e: E) -> Expr<E::Value> {
    e.into_expr()
}

/// Real part of a real expression: the expression itself.
pub fn real<E: ExprLike>(e: E) -> Expr<E::Value> {
    e.into_expr()
}

/// Imaginary part of a real expression: always zero.
pub fn imag<E: ExprLike>(_e: E) -> E::Value {
    <E::Value as Real>::zero()
}

/// Unary plus. Rust has no `+e` operator; this is the identity.
pub fn positive<E: ExprLike>(e: E) -> E {
    e
}
