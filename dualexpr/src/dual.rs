//! Dual numbers.
//!
//! A dual number has the form `a + a′·ε` where `ε² = 0`. Here `a` is
//! stored in [`Dual::val`] and `a′` in [`Dual::grad`].
//!
//! Unlike an eager dual type, arithmetic on `Dual` does not produce a
//! new `Dual`: it produces an [`Expr`] describing the computation. The
//! expression is reduced, value and derivative together, when it is
//! turned back into a dual:
//!
//! ```
//! use dualexpr::{Dual, Expr};
//!
//! // f(x) = x² + 2x at x=3
//! let x = Dual::variable(3.0);
//! let e: Expr<f64> = x * x + 2.0 * x;
//! let f = Dual::from(e);
//!
//! assert_eq!(f.val, 15.0);   // f(3) = 9 + 6
//! assert_eq!(f.grad, 8.0);   // f'(3) = 2*3 + 2
//! ```
//!
//! Compound assignment reduces straight into the target:
//!
//! ```
//! use dualexpr::{sin, Dual};
//!
//! let mut y = Dual::variable(0.0);
//! y += sin(y);
//! assert_eq!(y.val, 0.0);
//! assert_eq!(y.grad, 2.0);  // 1 + cos(0)
//! ```
//!
//! # Higher orders
//!
//! The channel type may itself be a dual. An order-N dual is a
//! `Dual<Dual<...<f64>>>` nested N times; see
//! [`HigherOrderDual`](crate::HigherOrderDual).

use crate::assign::{self, apply, evaluate};
use crate::expr::Expr;
use crate::op::UnaryOp;
use crate::real::{Real, Value};
use crate::traits::ExprLike;
use std::fmt;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

/// A value paired with its derivative.
///
/// # Examples
///
/// ```
/// use dualexpr::Dual;
///
/// let x = Dual::variable(5.0);
/// let y = Dual::from(x * x);
///
/// assert_eq!(y.val, 25.0);
/// assert_eq!(y.grad, 10.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Dual<T> {
    /// The primal value
    pub val: T,
    /// The derivative along the seeded direction
    pub grad: T,
}

impl<T> Dual<T> {
    /// Create a dual number with explicit value and derivative.
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let d = Dual::new(3.0, 1.0);
    /// assert_eq!(d.val, 3.0);
    /// assert_eq!(d.grad, 1.0);
    /// ```
    pub const fn new(val: T, grad: T) -> Self {
        Dual { val, grad }
    }
}

impl<T: Real> Dual<T> {
    /// Create a constant (derivative = 0).
    pub fn constant(val: T) -> Self {
        Dual {
            val,
            grad: T::zero(),
        }
    }

    /// Create a variable (derivative = 1).
    ///
    /// Use this for the single input a derivative is taken with
    /// respect to. For several inputs, or higher orders, leave the
    /// derivatives at zero and let [`derivative`](crate::derivative())
    /// seed them.
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let x = Dual::variable(3.0);
    /// assert_eq!(x.grad, 1.0);
    /// ```
    pub fn variable(val: T) -> Self {
        Dual {
            val,
            grad: T::one(),
        }
    }

    /// Replace this dual with the reduced value of `e`.
    ///
    /// This is plain assignment from an expression. `e` may mention
    /// `self`; the tree holds its own copy of every leaf.
    ///
    /// ```
    /// use dualexpr::{exp, Dual};
    ///
    /// let mut x = Dual::variable(0.0);
    /// x.set(exp(x) * 3.0);
    /// assert_eq!(x.val, 3.0);
    /// assert_eq!(x.grad, 3.0);
    ///
    /// x.set(1.0);
    /// assert_eq!(x.grad, 0.0);
    /// ```
    pub fn set(&mut self, e: impl Into<Expr<T>>) {
        assign::assign(self, &e.into());
    }

    /// Like [`Dual::set`] but reuses `scratch` for the one temporary
    /// the reduction may need. The result is bit-identical.
    pub fn set_with(&mut self, e: impl Into<Expr<T>>, scratch: &mut Dual<T>) {
        assign::assign_with(self, &e.into(), scratch);
    }
}

impl<T: Real> Default for Dual<T> {
    fn default() -> Self {
        Dual::constant(T::zero())
    }
}

impl<T: Real> From<f64> for Dual<T> {
    fn from(v: f64) -> Self {
        Dual::constant(T::from_f64(v))
    }
}

impl<T: Real> From<Expr<T>> for Dual<T> {
    fn from(e: Expr<T>) -> Self {
        evaluate(&e)
    }
}

/// Prints the value channel only.
///
/// ```
/// use dualexpr::Dual;
///
/// let x = Dual::new(1.375, 7.0);
/// assert_eq!(format!("{}", x), "1.375");
/// assert_eq!(format!("{:.1}", x), "1.4");
/// ```
impl<T: fmt::Display> fmt::Display for Dual<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.val, f)
    }
}

macro_rules! impl_compound_assign {
    ($Trait:ident, $method:ident, $engine:path) => {
        impl<T: Real, R: ExprLike<Value = T>> $Trait<R> for Dual<T> {
            #[inline]
            fn $method(&mut self, rhs: R) {
                $engine(self, &rhs.into_expr());
            }
        }

        impl<T: Real> $Trait<f64> for Dual<T> {
            #[inline]
            fn $method(&mut self, rhs: f64) {
                $engine(self, &Expr::from(rhs));
            }
        }
    };
}

impl_compound_assign!(AddAssign, add_assign, assign::assign_add);
impl_compound_assign!(SubAssign, sub_assign, assign::assign_sub);
impl_compound_assign!(MulAssign, mul_assign, assign::assign_mul);
impl_compound_assign!(DivAssign, div_assign, assign::assign_div);

impl<T: Real> Value for Dual<T> {
    type Primitive = T::Primitive;

    #[inline]
    fn value(&self) -> Self::Primitive {
        self.val.value()
    }
}

/// Dual numbers are valid channels themselves, which is what makes
/// `Dual<Dual<f64>>` a second-order dual. Every elementary function
/// runs the reduction engine one level down.
impl<T: Real> Real for Dual<T> {
    fn from_f64(v: f64) -> Self {
        Dual::constant(T::from_f64(v))
    }

    fn ln_10() -> Self {
        Dual::constant(T::ln_10())
    }

    fn neg(self) -> Self {
        self.applied(UnaryOp::Neg)
    }

    fn sin(self) -> Self {
        self.applied(UnaryOp::Sin)
    }

    fn cos(self) -> Self {
        self.applied(UnaryOp::Cos)
    }

    fn tan(self) -> Self {
        self.applied(UnaryOp::Tan)
    }

    fn asin(self) -> Self {
        self.applied(UnaryOp::ArcSin)
    }

    fn acos(self) -> Self {
        self.applied(UnaryOp::ArcCos)
    }

    fn atan(self) -> Self {
        self.applied(UnaryOp::ArcTan)
    }

    fn exp(self) -> Self {
        self.applied(UnaryOp::Exp)
    }

    fn ln(self) -> Self {
        self.applied(UnaryOp::Log)
    }

    fn log10(self) -> Self {
        self.applied(UnaryOp::Log10)
    }

    fn sqrt(self) -> Self {
        self.applied(UnaryOp::Sqrt)
    }

    fn abs(self) -> Self {
        self.applied(UnaryOp::Abs)
    }

    fn powf(mut self, exponent: Self) -> Self {
        assign::assign_pow(&mut self, &Expr::Dual(exponent));
        self
    }

    fn powf_const(mut self, exponent: Self) -> Self {
        assign::assign_pow(&mut self, &Expr::Number(exponent.val));
        self
    }

    fn seed(&mut self, depth: usize, value: f64) -> bool {
        if depth == 0 {
            self.grad = T::from_f64(value);
            true
        } else {
            self.val.seed(depth - 1, value)
        }
    }
}

impl<T: Real> Dual<T> {
    fn applied(mut self, op: UnaryOp) -> Self {
        apply(&mut self, op);
        self
    }
}
