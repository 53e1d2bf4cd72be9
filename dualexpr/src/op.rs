//! Operator tags.
//!
//! Every node of an expression tree names the operation it performs
//! with one of these tags. Tags carry no data; the reduction engine
//! matches on them to pick the value/derivative rule.
//!
//! Subtraction and division have no tag: `a - b` is always built as
//! `a + (-b)` and `a / b` as `a * inverse(b)`.

/// Operations with one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `1/x`
    Inv,
    /// `sin x`
    Sin,
    /// `cos x`
    Cos,
    /// `tan x`
    Tan,
    /// `asin x`
    ArcSin,
    /// `acos x`
    ArcCos,
    /// `atan x`
    ArcTan,
    /// `exp x`
    Exp,
    /// `ln x`
    Log,
    /// `log10 x`
    Log10,
    /// `sqrt x`
    Sqrt,
    /// `|x|`
    Abs,
}

/// Operations with two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `l + r`
    Add,
    /// `l * r`
    Mul,
    /// `l` raised to `r`
    Pow,
    /// A scalar literal `l` times a dual leaf `r`, reduced in one fused
    /// pass.
    NumberDualMul,
}

/// Operations with three operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TernaryOp {
    /// A scalar times two duals. Reserved: no builder produces it.
    ///
    /// A hand-built `Ternary { l, c, r }` node is reduced as the plain
    /// product `l * c * r`, assigning `r` and then multiplying by `c`
    /// and `l`. No fused path exists for it.
    NumberDualDualMul,
}

impl UnaryOp {
    /// Short lowercase name, as the matching builder function is
    /// called.
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Inv => "inv",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::ArcSin => "asin",
            UnaryOp::ArcCos => "acos",
            UnaryOp::ArcTan => "atan",
            UnaryOp::Exp => "exp",
            UnaryOp::Log => "log",
            UnaryOp::Log10 => "log10",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Abs => "abs",
        }
    }
}
