//! Expression trees.
//!
//! Arithmetic on tracked values does not compute anything; it builds
//! an [`Expr`], a small owned tree whose shape is the syntax of the
//! expression. The tree is reduced into a single [`Dual`] when it is
//! assigned to one (see [`crate::assign`]).
//!
//! Leaves are either scalar literals ([`Expr::Number`]) or copies of
//! dual numbers ([`Expr::Dual`]). Inner nodes come in three shapes,
//! tagged by the operators of [`crate::op`].
//!
//! ```
//! use dualexpr::{sin, Dual, Expr};
//!
//! let x = Dual::variable(2.0);
//! let e: Expr<f64> = sin(x * x);
//! assert!(e.is_unary());
//! assert_eq!(e.to_string(), "sin((x * x))");
//! ```

use crate::assign::evaluate;
use crate::dual::Dual;
use crate::op::{BinaryOp, TernaryOp, UnaryOp};
use crate::real::{Real, Value};
use std::fmt;

/// A node of an expression tree over value type `T`.
#[derive(Debug, Clone)]
pub enum Expr<T> {
    /// A scalar literal. Carries no derivative.
    Number(T),
    /// A tracked dual number.
    Dual(Dual<T>),
    /// An operator applied to one operand.
    Unary(UnaryExpr<T>),
    /// An operator applied to two operands.
    Binary(BinaryExpr<T>),
    /// An operator applied to three operands.
    Ternary(TernaryExpr<T>),
}

/// `op(r)`
#[derive(Debug, Clone)]
pub struct UnaryExpr<T> {
    /// Operator tag.
    pub op: UnaryOp,
    /// Operand.
    pub r: Box<Expr<T>>,
}

/// `l op r`
#[derive(Debug, Clone)]
pub struct BinaryExpr<T> {
    /// Operator tag.
    pub op: BinaryOp,
    /// Left operand.
    pub l: Box<Expr<T>>,
    /// Right operand.
    pub r: Box<Expr<T>>,
}

/// `op(l, c, r)`
#[derive(Debug, Clone)]
pub struct TernaryExpr<T> {
    /// Operator tag.
    pub op: TernaryOp,
    /// Left operand.
    pub l: Box<Expr<T>>,
    /// Center operand.
    pub c: Box<Expr<T>>,
    /// Right operand.
    pub r: Box<Expr<T>>,
}

impl<T> Expr<T> {
    /// Build `op(r)` without applying any rewrite rule.
    pub fn unary(op: UnaryOp, r: Expr<T>) -> Self {
        Expr::Unary(UnaryExpr { op, r: Box::new(r) })
    }

    /// Build `l op r` without applying any rewrite rule.
    pub fn binary(op: BinaryOp, l: Expr<T>, r: Expr<T>) -> Self {
        Expr::Binary(BinaryExpr {
            op,
            l: Box::new(l),
            r: Box::new(r),
        })
    }

    /// Build `op(l, c, r)`.
    pub fn ternary(op: TernaryOp, l: Expr<T>, c: Expr<T>, r: Expr<T>) -> Self {
        Expr::Ternary(TernaryExpr {
            op,
            l: Box::new(l),
            c: Box::new(c),
            r: Box::new(r),
        })
    }

    /// The fused `scalar * dual` node.
    pub fn number_dual_mul(scalar: T, dual: Dual<T>) -> Self {
        Expr::binary(BinaryOp::NumberDualMul, Expr::Number(scalar), Expr::Dual(dual))
    }

    /// Is this a scalar literal?
    pub fn is_number(&self) -> bool {
        matches!(self, Expr::Number(_))
    }

    /// Is this a dual leaf?
    pub fn is_dual(&self) -> bool {
        matches!(self, Expr::Dual(_))
    }

    /// Is this a unary node?
    pub fn is_unary(&self) -> bool {
        matches!(self, Expr::Unary(_))
    }

    /// Is this a binary node?
    pub fn is_binary(&self) -> bool {
        matches!(self, Expr::Binary(_))
    }

    /// Is this a ternary node?
    pub fn is_ternary(&self) -> bool {
        matches!(self, Expr::Ternary(_))
    }

    /// Is this a `-r` node?
    pub fn is_neg(&self) -> bool {
        self.unary_op() == Some(UnaryOp::Neg)
    }

    /// Is this a `1/r` node?
    pub fn is_inv(&self) -> bool {
        self.unary_op() == Some(UnaryOp::Inv)
    }

    /// Is this an `l + r` node?
    pub fn is_add(&self) -> bool {
        self.binary_op() == Some(BinaryOp::Add)
    }

    /// Is this an `l * r` node?
    pub fn is_mul(&self) -> bool {
        self.binary_op() == Some(BinaryOp::Mul)
    }

    /// Is this a `pow(l, r)` node?
    pub fn is_pow(&self) -> bool {
        self.binary_op() == Some(BinaryOp::Pow)
    }

    /// Is this a fused `scalar * dual` node?
    pub fn is_number_dual_mul(&self) -> bool {
        self.binary_op() == Some(BinaryOp::NumberDualMul)
    }

    /// Is this a `scalar * dual * dual` node?
    pub fn is_number_dual_dual_mul(&self) -> bool {
        matches!(
            self,
            Expr::Ternary(TernaryExpr {
                op: TernaryOp::NumberDualDualMul,
                ..
            })
        )
    }

    /// The operator of a unary node.
    pub fn unary_op(&self) -> Option<UnaryOp> {
        match self {
            Expr::Unary(u) => Some(u.op),
            _ => None,
        }
    }

    /// The operator of a binary node.
    pub fn binary_op(&self) -> Option<BinaryOp> {
        match self {
            Expr::Binary(b) => Some(b.op),
            _ => None,
        }
    }

    /// The dual leaf, if this is one.
    pub fn as_dual(&self) -> Option<&Dual<T>> {
        match self {
            Expr::Dual(d) => Some(d),
            _ => None,
        }
    }
}

impl<T: Copy> Expr<T> {
    /// The scalar literal, if this is one.
    pub fn as_number(&self) -> Option<T> {
        match self {
            Expr::Number(c) => Some(*c),
            _ => None,
        }
    }

    /// The `(scalar, dual)` operands of a well-formed fused
    /// `scalar * dual` node.
    pub fn as_number_dual_mul(&self) -> Option<(T, Dual<T>)> {
        match self {
            Expr::Binary(BinaryExpr {
                op: BinaryOp::NumberDualMul,
                l,
                r,
            }) => match (l.as_ref(), r.as_ref()) {
                (Expr::Number(c), Expr::Dual(d)) => Some((*c, *d)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl<T: Real> Expr<T> {
    /// Reduce a copy of this tree and return its value channel.
    pub fn value_channel(&self) -> T {
        evaluate(self).val
    }
}

impl<T: Real> From<Dual<T>> for Expr<T> {
    fn from(dual: Dual<T>) -> Self {
        Expr::Dual(dual)
    }
}

impl<T: Real> From<f64> for Expr<T> {
    fn from(scalar: f64) -> Self {
        Expr::Number(T::from_f64(scalar))
    }
}

impl<T: Real> Value for Expr<T> {
    type Primitive = T::Primitive;

    fn value(&self) -> Self::Primitive {
        evaluate(self).value()
    }
}

/// Infix rendering. Dual leaves print as `x`, literals print their
/// value.
impl<T: fmt::Display> fmt::Display for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(c) => write!(f, "{}", c),
            Expr::Dual(_) => write!(f, "x"),
            Expr::Unary(u) => match u.op {
                UnaryOp::Neg => write!(f, "-{}", u.r),
                UnaryOp::Inv => write!(f, "1/{}", u.r),
                op => write!(f, "{}({})", op.name(), u.r),
            },
            Expr::Binary(b) => match b.op {
                BinaryOp::Add => write!(f, "({} + {})", b.l, b.r),
                BinaryOp::Mul | BinaryOp::NumberDualMul => write!(f, "({} * {})", b.l, b.r),
                BinaryOp::Pow => write!(f, "pow({}, {})", b.l, b.r),
            },
            Expr::Ternary(t) => write!(f, "({} * {} * {})", t.l, t.c, t.r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_identify_node_kinds() {
        let x = Dual::variable(1.0);
        let neg: Expr<f64> = Expr::unary(UnaryOp::Neg, x.into());
        let inv: Expr<f64> = Expr::unary(UnaryOp::Inv, x.into());
        let add: Expr<f64> = Expr::binary(BinaryOp::Add, x.into(), Expr::Number(2.0));
        let ndm = Expr::number_dual_mul(3.0, x);

        assert!(neg.is_neg() && neg.is_unary() && !neg.is_inv());
        assert!(inv.is_inv() && !inv.is_neg());
        assert!(add.is_add() && add.is_binary() && !add.is_mul());
        assert!(ndm.is_number_dual_mul() && !ndm.is_mul());
        assert!(Expr::<f64>::Number(1.0).is_number());
        assert!(Expr::from(x).is_dual());
    }

    #[test]
    fn number_dual_mul_exposes_its_operands() {
        let x = Dual::new(2.0, 1.0);
        let (c, d) = Expr::number_dual_mul(4.0, x).as_number_dual_mul().unwrap();
        assert_eq!(c, 4.0);
        assert_eq!(d.val, 2.0);
        assert_eq!(d.grad, 1.0);

        // A hand-built node with the wrong operand kinds is not fused.
        let odd: Expr<f64> = Expr::binary(BinaryOp::NumberDualMul, x.into(), x.into());
        assert!(odd.as_number_dual_mul().is_none());
    }

    #[test]
    fn ternary_node_is_recognised() {
        let x = Dual::variable(1.0);
        let t: Expr<f64> = Expr::ternary(
            TernaryOp::NumberDualDualMul,
            Expr::Number(2.0),
            x.into(),
            x.into(),
        );
        assert!(t.is_ternary());
        assert!(t.is_number_dual_dual_mul());
    }

    #[test]
    fn scalars_convert_to_number_leaves() {
        let e: Expr<f32> = Expr::from(0.5);
        assert_eq!(e.as_number(), Some(0.5_f32));
    }

    #[test]
    fn display_renders_infix() {
        let x = Dual::variable(1.0);
        let e: Expr<f64> = Expr::binary(
            BinaryOp::Pow,
            Expr::unary(UnaryOp::Exp, x.into()),
            Expr::Number(2.0),
        );
        assert_eq!(e.to_string(), "pow(exp(x), 2)");
    }
}
