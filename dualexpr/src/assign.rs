//! The reduction engine.
//!
//! Folds an [`Expr`] into a [`Dual`] in place. Every entry point has two
//! shapes:
//!
//! - `assign_*(this, other)` allocates whatever temporary dual it needs
//!   on the stack.
//! - `assign_*_with(this, other, tmp)` uses the caller's `tmp` for the
//!   one temporary threaded down the recursion, so a loop can reuse a
//!   single scratch dual.
//!
//! Both shapes perform the same floating-point operations in the same
//! order, so their results are bit-identical.
//!
//! Reduction order is part of the contract:
//!
//! - `l + r` assigns `r`, then accumulates `l`.
//! - `l * r` assigns `r`, then multiplies by `l`.
//! - accumulating `l + r` adds `l`, then `r`; multiplying by `l * r`
//!   multiplies by `l`, then `r`.
//! - `pow(l, r)` assigns `l`, then raises to `r`.
//!
//! ```
//! use dualexpr::{assign, Dual, Expr};
//!
//! let x = Dual::variable(2.0);
//! let e: Expr<f64> = x * x + 1.0;
//!
//! let mut y = Dual::default();
//! assign::assign(&mut y, &e);
//! assert_eq!((y.val, y.grad), (5.0, 4.0));
//!
//! let mut tmp = Dual::default();
//! assign::assign_add_with(&mut y, &e, &mut tmp);
//! assert_eq!((y.val, y.grad), (10.0, 8.0));
//! ```

use crate::dual::Dual;
use crate::expr::{BinaryExpr, Expr};
use crate::op::{BinaryOp, UnaryOp};
use crate::real::Real;

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

/// Reduce `other` into a fresh dual. A dual leaf is returned as is.
pub fn evaluate<T: Real>(other: &Expr<T>) -> Dual<T> {
    match other {
        Expr::Dual(d) => *d,
        _ => {
            let mut tmp = Dual::default();
            assign(&mut tmp, other);
            tmp
        }
    }
}

/// `this = other`
pub fn assign<T: Real>(this: &mut Dual<T>, other: &Expr<T>) {
    match other {
        Expr::Number(c) => {
            this.val = *c;
            this.grad = T::zero();
        }
        Expr::Dual(d) => *this = *d,
        Expr::Unary(u) => {
            assign(this, &u.r);
            apply(this, u.op);
        }
        Expr::Binary(b) => match b.op {
            BinaryOp::Add => {
                assign(this, &b.r);
                assign_add(this, &b.l);
            }
            BinaryOp::Mul | BinaryOp::NumberDualMul => {
                assign(this, &b.r);
                assign_mul(this, &b.l);
            }
            BinaryOp::Pow => {
                assign(this, &b.l);
                assign_pow(this, &b.r);
            }
        },
        Expr::Ternary(t) => {
            assign(this, &t.r);
            assign_mul(this, &t.c);
            assign_mul(this, &t.l);
        }
    }
}

/// `this = other`, using `tmp` as scratch.
pub fn assign_with<T: Real>(this: &mut Dual<T>, other: &Expr<T>, tmp: &mut Dual<T>) {
    match other {
        Expr::Unary(u) => {
            assign_with(this, &u.r, tmp);
            apply(this, u.op);
        }
        Expr::Binary(b) => match b.op {
            BinaryOp::Add => {
                assign_with(this, &b.r, tmp);
                assign_add_with(this, &b.l, tmp);
            }
            BinaryOp::Mul => {
                assign_with(this, &b.r, tmp);
                assign_mul_with(this, &b.l, tmp);
            }
            BinaryOp::Pow => {
                assign_with(this, &b.l, tmp);
                assign_pow_with(this, &b.r, tmp);
            }
            BinaryOp::NumberDualMul => assign(this, other),
        },
        Expr::Ternary(t) => {
            assign_with(this, &t.r, tmp);
            assign_mul_with(this, &t.c, tmp);
            assign_mul_with(this, &t.l, tmp);
        }
        Expr::Number(_) | Expr::Dual(_) => assign(this, other),
    }
}

fn add_dual<T: Real>(this: &mut Dual<T>, d: &Dual<T>) {
    this.val += d.val;
    this.grad += d.grad;
}

fn add_negative<T: Real>(this: &mut Dual<T>, t: &Dual<T>) {
    this.val -= t.val;
    this.grad -= t.grad;
}

fn add_inverse<T: Real>(this: &mut Dual<T>, t: &Dual<T>) {
    let aux = recip(t.val);
    this.val += aux;
    this.grad -= times(times(aux, aux), t.grad);
}

fn add_number_dual<T: Real>(this: &mut Dual<T>, c: T, d: &Dual<T>) {
    this.val += times(c, d.val);
    this.grad += times(c, d.grad);
}

/// `this += other`
pub fn assign_add<T: Real>(this: &mut Dual<T>, other: &Expr<T>) {
    if let Some((c, d)) = other.as_number_dual_mul() {
        add_number_dual(this, c, &d);
        return;
    }
    match other {
        Expr::Number(c) => this.val += *c,
        Expr::Dual(d) => add_dual(this, d),
        Expr::Unary(u) if u.op == UnaryOp::Neg => add_negative(this, &evaluate(&u.r)),
        Expr::Unary(u) if u.op == UnaryOp::Inv => add_inverse(this, &evaluate(&u.r)),
        Expr::Binary(BinaryExpr {
            op: BinaryOp::Add,
            l,
            r,
        }) => {
            assign_add(this, l);
            assign_add(this, r);
        }
        _ => {
            let mut tmp = Dual::default();
            assign_add_with(this, other, &mut tmp);
        }
    }
}

/// `this += other`, using `tmp` as scratch.
pub fn assign_add_with<T: Real>(this: &mut Dual<T>, other: &Expr<T>, tmp: &mut Dual<T>) {
    if other.is_number_dual_mul() {
        assign_add(this, other);
        return;
    }
    match other {
        Expr::Number(_) | Expr::Dual(_) => assign_add(this, other),
        Expr::Unary(u) if u.op == UnaryOp::Neg => {
            *tmp = evaluate(&u.r);
            add_negative(this, tmp);
        }
        Expr::Unary(u) if u.op == UnaryOp::Inv => {
            *tmp = evaluate(&u.r);
            add_inverse(this, tmp);
        }
        Expr::Binary(BinaryExpr {
            op: BinaryOp::Add,
            l,
            r,
        }) => {
            assign_add_with(this, l, tmp);
            assign_add_with(this, r, tmp);
        }
        _ => {
            assign(tmp, other);
            add_dual(this, tmp);
        }
    }
}

/// `this -= other`
pub fn assign_sub<T: Real>(this: &mut Dual<T>, other: &Expr<T>) {
    if let Some((c, d)) = other.as_number_dual_mul() {
        add_number_dual(this, c.neg(), &d);
        return;
    }
    match other {
        Expr::Number(c) => this.val -= *c,
        Expr::Dual(d) => add_negative(this, d),
        Expr::Unary(u) if u.op == UnaryOp::Neg => assign_add(this, &u.r),
        _ => add_negative(this, &evaluate(other)),
    }
}

/// `this -= other`, using `tmp` as scratch.
pub fn assign_sub_with<T: Real>(this: &mut Dual<T>, other: &Expr<T>, tmp: &mut Dual<T>) {
    if other.is_number_dual_mul() {
        assign_sub(this, other);
        return;
    }
    match other {
        Expr::Number(_) | Expr::Dual(_) => assign_sub(this, other),
        Expr::Unary(u) if u.op == UnaryOp::Neg => assign_add_with(this, &u.r, tmp),
        _ => {
            *tmp = evaluate(other);
            add_negative(this, tmp);
        }
    }
}

fn scale<T: Real>(this: &mut Dual<T>, c: T) {
    this.val *= c;
    this.grad *= c;
}

fn mul_dual<T: Real>(this: &mut Dual<T>, d: &Dual<T>) {
    this.grad *= d.val;
    this.grad += times(this.val, d.grad);
    this.val *= d.val;
}

fn negate<T: Real>(this: &mut Dual<T>) {
    this.val = this.val.neg();
    this.grad = this.grad.neg();
}

/// `this *= other`
pub fn assign_mul<T: Real>(this: &mut Dual<T>, other: &Expr<T>) {
    if let Some((c, d)) = other.as_number_dual_mul() {
        scale(this, c);
        mul_dual(this, &d);
        return;
    }
    match other {
        Expr::Number(c) => scale(this, *c),
        Expr::Dual(d) => mul_dual(this, d),
        Expr::Unary(u) if u.op == UnaryOp::Neg => {
            assign_mul(this, &u.r);
            negate(this);
        }
        Expr::Binary(BinaryExpr {
            op: BinaryOp::Mul,
            l,
            r,
        }) => {
            assign_mul(this, l);
            assign_mul(this, r);
        }
        _ => {
            let mut tmp = Dual::default();
            assign_mul_with(this, other, &mut tmp);
        }
    }
}

/// `this *= other`, using `tmp` as scratch.
pub fn assign_mul_with<T: Real>(this: &mut Dual<T>, other: &Expr<T>, tmp: &mut Dual<T>) {
    if other.is_number_dual_mul() {
        assign_mul(this, other);
        return;
    }
    match other {
        Expr::Number(_) | Expr::Dual(_) => assign_mul(this, other),
        Expr::Unary(u) if u.op == UnaryOp::Neg => {
            assign_mul_with(this, &u.r, tmp);
            negate(this);
        }
        Expr::Binary(BinaryExpr {
            op: BinaryOp::Mul,
            l,
            r,
        }) => {
            assign_mul_with(this, l, tmp);
            assign_mul_with(this, r, tmp);
        }
        _ => {
            assign(tmp, other);
            mul_dual(this, tmp);
        }
    }
}

fn div_dual<T: Real>(this: &mut Dual<T>, d: &Dual<T>) {
    let aux = recip(d.val);
    this.val *= aux;
    this.grad -= times(this.val, d.grad);
    this.grad *= aux;
}

/// `this /= other`
pub fn assign_div<T: Real>(this: &mut Dual<T>, other: &Expr<T>) {
    let mut tmp = Dual::default();
    assign_div_with(this, other, &mut tmp);
}

/// `this /= other`, using `tmp` as scratch.
pub fn assign_div_with<T: Real>(this: &mut Dual<T>, other: &Expr<T>, tmp: &mut Dual<T>) {
    match other {
        Expr::Number(c) => scale(this, recip(*c)),
        Expr::Dual(d) => div_dual(this, d),
        Expr::Unary(u) if u.op == UnaryOp::Inv => assign_mul_with(this, &u.r, tmp),
        _ => {
            assign(tmp, other);
            apply(tmp, UnaryOp::Inv);
            mul_dual(this, tmp);
        }
    }
}

fn pow_number<T: Real>(this: &mut Dual<T>, p: T) {
    let aux = this.val.powf_const(p);
    let mut f = p;
    f /= this.val;
    f *= aux;
    this.grad *= f;
    this.val = aux;
}

fn pow_dual<T: Real>(this: &mut Dual<T>, e: &Dual<T>) {
    let aux1 = this.val.powf(e.val);
    let aux2 = this.val.ln();
    let mut f = e.val;
    f /= this.val;
    this.grad *= f;
    this.grad += times(aux2, e.grad);
    this.grad *= aux1;
    this.val = aux1;
}

/// `this = pow(this, other)`
///
/// The exponent is fully reduced before `this` is touched. With a
/// non-constant exponent the derivative goes through `ln(this)`, so a
/// negative base yields NaN there.
pub fn assign_pow<T: Real>(this: &mut Dual<T>, other: &Expr<T>) {
    match other {
        Expr::Number(p) => pow_number(this, *p),
        Expr::Dual(e) => pow_dual(this, e),
        _ => pow_dual(this, &evaluate(other)),
    }
}

/// `this = pow(this, other)`, using `tmp` as scratch.
pub fn assign_pow_with<T: Real>(this: &mut Dual<T>, other: &Expr<T>, tmp: &mut Dual<T>) {
    match other {
        Expr::Number(_) | Expr::Dual(_) => assign_pow(this, other),
        _ => {
            assign(tmp, other);
            pow_dual(this, tmp);
        }
    }
}

/// Apply an elementary function to `this` in place: the value
/// channel becomes `f(val)` and the derivative channel is multiplied
/// by `f′(val)`.
pub fn apply<T: Real>(this: &mut Dual<T>, op: UnaryOp) {
    match op {
        UnaryOp::Neg => negate(this),
        UnaryOp::Inv => {
            this.val = recip(this.val);
            this.grad *= times(this.val.neg(), this.val);
        }
        UnaryOp::Sin => {
            this.grad *= this.val.cos();
            this.val = this.val.sin();
        }
        UnaryOp::Cos => {
            this.grad *= this.val.sin().neg();
            this.val = this.val.cos();
        }
        UnaryOp::Tan => {
            let aux = recip(this.val.cos());
            this.val = this.val.tan();
            this.grad *= times(aux, aux);
        }
        UnaryOp::ArcSin => {
            let aux = recip(one_minus_square(this.val).sqrt());
            this.val = this.val.asin();
            this.grad *= aux;
        }
        UnaryOp::ArcCos => {
            let aux = recip(one_minus_square(this.val).sqrt()).neg();
            this.val = this.val.acos();
            this.grad *= aux;
        }
        UnaryOp::ArcTan => {
            let mut d = T::one();
            d += times(this.val, this.val);
            let aux = recip(d);
            this.val = this.val.atan();
            this.grad *= aux;
        }
        UnaryOp::Exp => {
            this.val = this.val.exp();
            this.grad *= this.val;
        }
        UnaryOp::Log => {
            let aux = recip(this.val);
            this.val = this.val.ln();
            this.grad *= aux;
        }
        UnaryOp::Log10 => {
            let aux = recip(times(T::ln_10(), this.val));
            this.val = this.val.log10();
            this.grad *= aux;
        }
        UnaryOp::Sqrt => {
            this.val = this.val.sqrt();
            let mut f = T::from_f64(0.5);
            f /= this.val;
            this.grad *= f;
        }
        UnaryOp::Abs => {
            let mut f = this.val;
            this.val = this.val.abs();
            f /= this.val;
            this.grad *= f;
        }
    }
}

fn one_minus_square<T: Real>(v: T) -> T {
    let mut d = T::one();
    d -= times(v, v);
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::TernaryOp;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn x_at(v: f64) -> Dual<f64> {
        Dual::variable(v)
    }

    fn reduce(e: &Expr<f64>) -> Dual<f64> {
        let mut d = Dual::default();
        assign(&mut d, e);
        d
    }

    fn reduce_with(e: &Expr<f64>) -> Dual<f64> {
        let mut d = Dual::default();
        let mut tmp = Dual::default();
        assign_with(&mut d, e, &mut tmp);
        d
    }

    fn same_bits(a: Dual<f64>, b: Dual<f64>) -> bool {
        a.val.to_bits() == b.val.to_bits() && a.grad.to_bits() == b.grad.to_bits()
    }

    #[test]
    fn scalar_assignment_clears_derivative() {
        let mut d = Dual::new(3.0, 5.0);
        assign(&mut d, &Expr::Number(2.0));
        assert_eq!((d.val, d.grad), (2.0, 0.0));
    }

    #[test]
    fn sum_is_reduced_right_then_left() {
        let x = x_at(3.0);
        let e = Expr::binary(BinaryOp::Add, Expr::Number(1.0), Expr::Dual(x));
        let d = reduce(&e);
        assert_eq!((d.val, d.grad), (4.0, 1.0));
    }

    #[test]
    fn multiplication_implements_product_rule() {
        let x = x_at(3.0);
        let y = Dual::new(4.0, 0.0);
        let e = Expr::binary(BinaryOp::Mul, Expr::Dual(x), Expr::Dual(y));
        let d = reduce(&e);
        assert_eq!((d.val, d.grad), (12.0, 4.0));
    }

    #[test]
    fn number_dual_mul_is_fused_when_accumulated() {
        let mut acc = Dual::new(1.0, 1.0);
        assign_add(&mut acc, &Expr::number_dual_mul(3.0, x_at(2.0)));
        assert_eq!((acc.val, acc.grad), (7.0, 4.0));

        let mut acc = Dual::new(2.0, 1.0);
        assign_mul(&mut acc, &Expr::number_dual_mul(3.0, x_at(5.0)));
        // (2 + ε) · 3 · (5 + ε) = 30 + 21ε
        assert_eq!((acc.val, acc.grad), (30.0, 21.0));
    }

    #[test]
    fn ternary_node_reduces_as_product() {
        let x = x_at(2.0);
        let e = Expr::ternary(
            TernaryOp::NumberDualDualMul,
            Expr::Number(3.0),
            Expr::Dual(x),
            Expr::Dual(x),
        );
        let d = reduce(&e);
        assert_eq!((d.val, d.grad), (12.0, 12.0));
        assert!(same_bits(d, reduce_with(&e)));
    }

    #[test]
    fn negation_is_subtracted_field_by_field() {
        let mut acc = Dual::new(10.0, 2.0);
        let e = Expr::unary(UnaryOp::Neg, Expr::Dual(x_at(3.0)));
        assign_add(&mut acc, &e);
        assert_eq!((acc.val, acc.grad), (7.0, 1.0));

        // Subtracting a negation adds its operand.
        assign_sub(&mut acc, &e);
        assert_eq!((acc.val, acc.grad), (10.0, 2.0));
    }

    #[test]
    fn recip_implements_inverse_rule() {
        let e = Expr::unary(UnaryOp::Inv, Expr::Dual(x_at(2.0)));
        let d = reduce(&e);
        assert_eq!((d.val, d.grad), (0.5, -0.25));

        let mut acc = Dual::new(1.0, 0.0);
        assign_add(&mut acc, &e);
        assert_eq!((acc.val, acc.grad), (1.5, -0.25));
    }

    #[test]
    fn division_quotient_rule() {
        // x / y at x=6, y=3 with dx = 1, dy = 0
        let mut d = x_at(6.0);
        assign_div(&mut d, &Expr::Dual(Dual::new(3.0, 0.0)));
        assert_eq!(d.val, 2.0);
        assert_relative_eq!(d.grad, 1.0 / 3.0);

        // Dividing by an inversion multiplies by its operand.
        let mut d = x_at(6.0);
        let inv = Expr::unary(UnaryOp::Inv, Expr::Dual(Dual::new(3.0, 0.0)));
        assign_div(&mut d, &inv);
        assert_eq!((d.val, d.grad), (18.0, 3.0));

        let mut d = x_at(6.0);
        assign_div(&mut d, &Expr::Number(4.0));
        assert_eq!((d.val, d.grad), (1.5, 0.25));
    }

    #[test]
    fn power_rule_with_scalar_exponent() {
        let mut d = x_at(2.0);
        assign_pow(&mut d, &Expr::Number(3.0));
        assert_eq!((d.val, d.grad), (8.0, 12.0));
    }

    #[test]
    fn power_rule_with_dual_exponent() {
        // d/dx x^x = x^x (ln x + 1)
        let x = x_at(2.0);
        let mut d = x;
        assign_pow(&mut d, &Expr::Dual(x));
        assert_eq!(d.val, 4.0);
        assert_relative_eq!(d.grad, 4.0 * (2.0_f64.ln() + 1.0), epsilon = 1e-12);
    }

    #[test]
    fn negative_base_with_variable_exponent_is_nan() {
        let mut d: Dual<f64> = Dual::new(-2.0, 1.0);
        assign_pow(&mut d, &Expr::Dual(Dual::new(2.0, 1.0)));
        assert!(d.grad.is_nan());
    }

    #[test]
    fn apply_table_matches_closed_forms() {
        let cases: [(UnaryOp, f64, f64, f64); 12] = [
            (UnaryOp::Sin, 0.3, 0.3_f64.sin(), 0.3_f64.cos()),
            (UnaryOp::Cos, 0.3, 0.3_f64.cos(), -(0.3_f64.sin())),
            (UnaryOp::Tan, 0.3, 0.3_f64.tan(), 1.0 / (0.3_f64.cos() * 0.3_f64.cos())),
            (UnaryOp::ArcSin, 0.5, 0.5_f64.asin(), 1.0 / 0.75_f64.sqrt()),
            (UnaryOp::ArcCos, 0.5, 0.5_f64.acos(), -1.0 / 0.75_f64.sqrt()),
            (UnaryOp::ArcTan, 0.5, 0.5_f64.atan(), 1.0 / 1.25),
            (UnaryOp::Exp, 2.0, 2.0_f64.exp(), 2.0_f64.exp()),
            (UnaryOp::Log, 2.0, 2.0_f64.ln(), 0.5),
            (UnaryOp::Log10, 2.0, 2.0_f64.log10(), 1.0 / (2.0 * std::f64::consts::LN_10)),
            (UnaryOp::Sqrt, 4.0, 2.0, 0.25),
            (UnaryOp::Abs, -3.0, 3.0, -1.0),
            (UnaryOp::Neg, 3.0, -3.0, -1.0),
        ];
        for (op, x, val, grad) in cases {
            let mut d = x_at(x);
            apply(&mut d, op);
            assert_relative_eq!(d.val, val, epsilon = 1e-12);
            assert_relative_eq!(d.grad, grad, epsilon = 1e-12);
        }
    }

    #[test]
    fn domain_errors_propagate_through_both_channels() {
        let mut d = x_at(-1.0);
        apply(&mut d, UnaryOp::Log);
        assert!(d.val.is_nan());

        let mut d = x_at(0.0);
        apply(&mut d, UnaryOp::Inv);
        assert!(d.val.is_infinite());
        assert!(d.grad.is_infinite());
    }

    #[test]
    fn evaluate_passes_dual_leaves_through() {
        let x = Dual::new(1.0, 2.0);
        let d = evaluate(&Expr::Dual(x));
        assert_eq!((d.val, d.grad), (1.0, 2.0));
        let dd = evaluate(&Expr::Dual(d));
        assert_eq!((dd.val, dd.grad), (d.val, d.grad));
    }

    fn sample_trees(v: f64) -> Vec<Expr<f64>> {
        let x = x_at(v);
        let y = Dual::new(v * 0.5 + 1.0, 0.25);
        vec![
            crate::sin(x * x) + 1.0 / x,
            crate::exp(-x) * crate::cos(y) - y / (x * x + 2.0),
            crate::pow(crate::sqrt(x * x + 1.0), y) * 3.0,
            -(2.0 * x) + -(y * 4.0),
            crate::atan(x) / crate::log(y * y + 2.0) + crate::abs(x - y),
            crate::pow(x, 3.0) - 1.0 / (1.0 / (x + 1.5)),
        ]
    }

    proptest! {
        #[test]
        fn scratch_and_simple_shapes_agree_bitwise(v in -3.0f64..3.0) {
            for e in sample_trees(v) {
                prop_assert!(same_bits(reduce(&e), reduce_with(&e)));

                let mut a = Dual::new(0.75, -0.5);
                let mut b = a;
                let mut tmp = Dual::default();
                assign_add(&mut a, &e);
                assign_add_with(&mut b, &e, &mut tmp);
                prop_assert!(same_bits(a, b));

                assign_sub(&mut a, &e);
                assign_sub_with(&mut b, &e, &mut tmp);
                prop_assert!(same_bits(a, b));

                assign_mul(&mut a, &e);
                assign_mul_with(&mut b, &e, &mut tmp);
                prop_assert!(same_bits(a, b));

                assign_div(&mut a, &e);
                assign_div_with(&mut b, &e, &mut tmp);
                prop_assert!(same_bits(a, b));
            }
        }
    }
}
