//! Operand classification.
//!
//! Overloads accept any mix of [`Dual`], [`Expr`] and `f64`, as long as
//! at least one side is expression-like. That rule is expressed with
//! trait bounds rather than runtime checks: `f64 + f64` never reaches
//! this crate because nothing here implements it.

use crate::dual::Dual;
use crate::expr::Expr;
use crate::real::Real;

/// Types that can stand as a node of an expression tree.
///
/// Implemented for [`Dual`] and [`Expr`]. Plain scalars are *not*
/// expression-like; they only appear as the other operand of a
/// binary operation.
pub trait ExprLike: Sized {
    /// The channel type of the dual number the expression reduces to.
    type Value: Real;

    /// Move into a tree node.
    fn into_expr(self) -> Expr<Self::Value>;
}

/// The channel type an expression-like type reduces to.
pub type ValueType<E> = <E as ExprLike>::Value;

/// The derivative channel type. Value and derivative channels always
/// share a type here.
pub type GradType<E> = <E as ExprLike>::Value;

impl<T: Real> ExprLike for Dual<T> {
    type Value = T;

    #[inline]
    fn into_expr(self) -> Expr<T> {
        Expr::Dual(self)
    }
}

impl<T: Real> ExprLike for Expr<T> {
    type Value = T;

    #[inline]
    fn into_expr(self) -> Expr<T> {
        self
    }
}

/// Operand pairs a binary builder accepts.
///
/// # Examples
///
/// ```
/// use dualexpr::{pow, Dual};
///
/// let x = Dual::variable(2.0);
/// let a = Dual::from(pow(x, 3.0));
/// let b = Dual::from(pow(2.0, x));
/// let c = Dual::from(pow(x, x));
/// assert_eq!(a.val, 8.0);
/// assert_eq!(b.val, 4.0);
/// assert_eq!(c.val, 4.0);
/// ```
pub trait Operable {
    /// The channel type of both operands.
    type Value: Real;

    /// Split into left and right tree nodes.
    fn into_operands(self) -> (Expr<Self::Value>, Expr<Self::Value>);
}

impl<L, R> Operable for (L, R)
where
    L: ExprLike,
    R: ExprLike<Value = L::Value>,
{
    type Value = L::Value;

    fn into_operands(self) -> (Expr<L::Value>, Expr<L::Value>) {
        (self.0.into_expr(), self.1.into_expr())
    }
}

impl<L: ExprLike> Operable for (L, f64) {
    type Value = L::Value;

    fn into_operands(self) -> (Expr<L::Value>, Expr<L::Value>) {
        (self.0.into_expr(), Expr::from(self.1))
    }
}

impl<R: ExprLike> Operable for (f64, R) {
    type Value = R::Value;

    fn into_operands(self) -> (Expr<R::Value>, Expr<R::Value>) {
        (Expr::from(self.0), self.1.into_expr())
    }
}
