//! Derivative extraction.
//!
//! A [`Dual`] carries one directional derivative. To differentiate a
//! function of several variables, or to higher order, the inputs are
//! *seeded*: the derivative channel of each selected variable is set
//! to one at the nesting depth matching its position in the selection,
//! the function is evaluated, and the seeds are cleared again.
//!
//! # Examples
//!
//! ## Partial derivatives
//!
//! ```
//! use dualexpr::{derivative, wrt, Dual};
//!
//! // f(x, y) = x² + x·y
//! let f = |[x, y]: [Dual<f64>; 2]| x * x + x * y;
//! let mut args = [Dual::from(3.0), Dual::from(4.0)];
//!
//! assert_eq!(derivative(f, wrt([0]), &mut args), 10.0); // 2x + y
//! assert_eq!(derivative(f, wrt([1]), &mut args), 3.0);  // x
//! ```
//!
//! ## Higher order
//!
//! ```
//! use dualexpr::{derivative, wrt, HigherOrderDual};
//!
//! type D3 = HigherOrderDual<3>;
//!
//! let f = |[x]: [D3; 1]| x * x * x * x;
//! let mut args = [D3::from(2.0)];
//!
//! assert_eq!(derivative(f, wrt([0]), &mut args).value(), 32.0);
//! assert_eq!(derivative(f, wrt([0, 0]), &mut args).value(), 48.0);
//! assert_eq!(derivative(f, wrt([0, 0, 0]), &mut args), 48.0);
//! # use dualexpr::Value;
//! ```

use crate::dual::Dual;
use crate::real::{Real, Value};
use crate::traits::ExprLike;

/// Reduce an expression-like value to a dual number. A dual is
/// returned unchanged.
///
/// ```
/// use dualexpr::{eval, Dual};
///
/// let x = Dual::variable(3.0);
/// let y = eval(x * x);
/// assert_eq!((y.val, y.grad), (9.0, 6.0));
/// assert_eq!(eval(y).grad, 6.0);
/// ```
pub fn eval<E: ExprLike>(e: E) -> Dual<E::Value> {
    Dual::from(e.into_expr())
}

/// The innermost primitive value of a float, dual or expression.
///
/// ```
/// use dualexpr::{val, Dual, HigherOrderDual};
///
/// let x: HigherOrderDual<3> = Dual::from(1.5);
/// assert_eq!(val(&x), 1.5);
/// assert_eq!(val(&(x * 2.0)), 3.0);
/// assert_eq!(val(&0.25), 0.25);
/// ```
pub fn val<V: Value>(x: &V) -> V::Primitive {
    x.value()
}

/// The variables to differentiate with respect to, as positions in
/// the argument array.
///
/// The k-th entry is seeded at nesting depth k, so the selection's
/// length is the derivative order. Positions may repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrt<const N: usize> {
    indices: [usize; N],
}

impl<const N: usize> Wrt<N> {
    /// The selected positions, in seeding order.
    pub fn indices(&self) -> &[usize; N] {
        &self.indices
    }
}

/// Select variables by position.
pub fn wrt<const N: usize>(indices: [usize; N]) -> Wrt<N> {
    Wrt { indices }
}

fn set_seeds<T: Real, const N: usize>(wrt: &Wrt<N>, vars: &mut [Dual<T>], value: f64) {
    for (depth, &i) in wrt.indices.iter().enumerate() {
        assert!(
            i < vars.len(),
            "Variable index {} out of bounds for {} variables",
            i,
            vars.len()
        );
        if !vars[i].seed(depth, value) {
            log::warn!(
                "variable {} has no derivative channel at depth {}; seed ignored",
                i,
                depth
            );
        }
    }
}

/// Seed the selected variables: the k-th selected variable gets a
/// unit derivative at nesting depth k.
///
/// # Panics
///
/// Panics if a selected position is out of bounds for `vars`.
///
/// # Examples
///
/// ```
/// use dualexpr::{seed, unseed, wrt, Dual};
///
/// let mut vars: [Dual<Dual<f64>>; 2] = [Dual::from(1.0), Dual::from(2.0)];
/// let w = wrt([1, 0]);
///
/// seed(&w, &mut vars);
/// assert_eq!(vars[1].grad.val, 1.0);
/// assert_eq!(vars[0].val.grad, 1.0);
///
/// unseed(&w, &mut vars);
/// assert_eq!(vars[1].grad.val, 0.0);
/// assert_eq!(vars[0].val.grad, 0.0);
/// ```
pub fn seed<T: Real, const N: usize>(wrt: &Wrt<N>, vars: &mut [Dual<T>]) {
    set_seeds(wrt, vars, 1.0);
}

/// Clear the seeds set by [`seed`].
///
/// # Panics
///
/// Panics if a selected position is out of bounds for `vars`.
pub fn unseed<T: Real, const N: usize>(wrt: &Wrt<N>, vars: &mut [Dual<T>]) {
    set_seeds(wrt, vars, 0.0);
}

/// Peeling an order-`ORDER` derivative out of a dual number.
///
/// Order 0 is the value, order 1 the derivative channel, and order N
/// the order-(N-1) derivative of the derivative channel. Asking for
/// more orders than a dual nests does not compile.
pub trait Derivative<const ORDER: usize> {
    /// What is left after peeling.
    type Output;

    /// The `ORDER`-th derivative.
    fn derivative(&self) -> Self::Output;
}

impl<T: Real> Derivative<0> for Dual<T> {
    type Output = T;

    fn derivative(&self) -> T {
        self.val
    }
}

impl<T: Real> Derivative<1> for Dual<T> {
    type Output = T;

    fn derivative(&self) -> T {
        self.grad
    }
}

macro_rules! impl_higher_derivative {
    ($($order:literal => $lower:literal),*) => {$(
        impl<T: Real + Derivative<$lower>> Derivative<$order> for Dual<T> {
            type Output = <T as Derivative<$lower>>::Output;

            fn derivative(&self) -> Self::Output {
                <T as Derivative<$lower>>::derivative(&self.grad)
            }
        }
    )*};
}

impl_higher_derivative!(2 => 1, 3 => 2, 4 => 3, 5 => 4, 6 => 5, 7 => 6, 8 => 7);

/// The `N`-th derivative stored in `d`.
///
/// ```
/// use dualexpr::{nth_derivative, Dual};
///
/// let d = Dual::new(Dual::new(1.0, 2.0), Dual::new(3.0, 4.0));
/// assert_eq!(nth_derivative::<0, _>(&d).val, 1.0);
/// assert_eq!(nth_derivative::<1, _>(&d).val, 3.0);
/// assert_eq!(nth_derivative::<2, _>(&d), 4.0);
/// ```
pub fn nth_derivative<const N: usize, D: Derivative<N>>(d: &D) -> D::Output {
    d.derivative()
}

/// Evaluate `f` at `args` and return the derivative selected by `wrt`.
///
/// The selected variables are seeded for the duration of the call and
/// left with cleared seeds afterwards; their values are not changed.
/// The derivative order is the length of the selection.
///
/// # Panics
///
/// Panics if a selected position is out of bounds for `args`.
pub fn derivative<T, F, E, const M: usize, const N: usize>(
    f: F,
    wrt: Wrt<N>,
    args: &mut [Dual<T>; M],
) -> <Dual<T> as Derivative<N>>::Output
where
    T: Real,
    F: FnOnce([Dual<T>; M]) -> E,
    E: ExprLike<Value = T>,
    Dual<T>: Derivative<N>,
{
    log::trace!("seeding {} of {} variables at {:?}", N, M, wrt.indices);
    seed(&wrt, args);
    let res = eval(f(*args));
    unseed(&wrt, args);
    nth_derivative::<N, _>(&res)
}

/// Turn `f` into a function computing its first derivative with
/// respect to one argument.
///
/// ```
/// use dualexpr::{grad, sin, Dual};
///
/// let df = grad(|[x, y]: [Dual<f64>; 2]| sin(x) * y);
/// let mut args = [Dual::from(0.0), Dual::from(2.0)];
///
/// assert_eq!(df(0, &mut args), 2.0);  // cos(x)·y
/// assert_eq!(df(1, &mut args), 0.0);  // sin(x)
/// ```
pub fn grad<T, F, E, const M: usize>(f: F) -> impl Fn(usize, &mut [Dual<T>; M]) -> T
where
    T: Real,
    F: Fn([Dual<T>; M]) -> E,
    E: ExprLike<Value = T>,
{
    move |i: usize, args: &mut [Dual<T>; M]| derivative(&f, wrt([i]), args)
}

/// Marker for an order; see [`HigherOrderDual`].
#[derive(Debug, Clone, Copy)]
pub struct Order<const N: usize>;

/// Maps an [`Order`] to its dual type.
pub trait HigherOrder {
    /// The order-N dual type.
    type Dual;
}

impl HigherOrder for Order<0> {
    type Dual = f64;
}

macro_rules! impl_higher_order {
    ($($n:literal => $lower:literal),*) => {$(
        impl HigherOrder for Order<$n> {
            type Dual = Dual<<Order<$lower> as HigherOrder>::Dual>;
        }
    )*};
}

impl_higher_order!(1 => 0, 2 => 1, 3 => 2, 4 => 3, 5 => 4, 6 => 5, 7 => 6, 8 => 7);

/// The dual type carrying derivatives up to order `N` (N ≤ 8):
/// `f64` for 0, `Dual<f64>` for 1, `Dual<Dual<f64>>` for 2, and so on.
pub type HigherOrderDual<const N: usize> = <Order<N> as HigherOrder>::Dual;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{asin, exp, pow, sin};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    type D1 = HigherOrderDual<1>;
    type D2 = HigherOrderDual<2>;

    #[test]
    fn exp_derivative_is_exp() {
        let mut args = [D1::from(2.0)];
        let d = derivative(|[x]: [D1; 1]| exp(x), wrt([0]), &mut args);
        assert_relative_eq!(d, 2.0_f64.exp());
    }

    #[test]
    fn asin_derivative_at_one_half() {
        let mut args = [D1::from(0.5)];
        let d = derivative(|[x]: [D1; 1]| asin(x), wrt([0]), &mut args);
        assert_relative_eq!(d, 1.0 / 0.75_f64.sqrt());
    }

    #[test]
    fn mixed_partial_of_product_is_one() {
        let mut args = [D2::from(3.0), D2::from(5.0)];
        let d = derivative(|[x, y]: [D2; 2]| x * y, wrt([0, 1]), &mut args);
        assert_eq!(d, 1.0);
    }

    #[test]
    fn second_derivative_of_cube() {
        let mut args = [D2::from(2.0)];
        let d = derivative(|[x]: [D2; 1]| x * x * x, wrt([0, 0]), &mut args);
        assert_eq!(d, 12.0);
    }

    #[test]
    fn constant_power_of_negative_base_at_second_order() {
        let f = |[x]: [D2; 1]| pow(x, 3.0);

        let mut args = [D2::from(-2.0)];
        let d = derivative(f, wrt([0, 0]), &mut args);
        assert_eq!(d, -12.0);

        let d = derivative(f, wrt([0]), &mut args);
        assert_eq!(d.val, 12.0);
        assert_eq!(d.grad, 0.0);
    }

    #[test]
    fn seeds_are_cleared_after_the_call() {
        let mut args = [D2::from(2.0), D2::from(1.0)];
        let _ = derivative(|[x, y]: [D2; 2]| x * y, wrt([0, 1]), &mut args);
        for a in &args {
            assert_eq!(a.grad.val, 0.0);
            assert_eq!(a.grad.grad, 0.0);
            assert_eq!(a.val.grad, 0.0);
        }
        assert_eq!(args[0].val.val, 2.0);
        assert_eq!(args[1].val.val, 1.0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn out_of_range_position_panics() {
        let mut args = [D1::from(1.0)];
        let _ = derivative(|[x]: [D1; 1]| x * x, wrt([1]), &mut args);
    }

    #[test]
    fn seeding_past_the_nesting_is_ignored() {
        let mut vars = [D1::from(1.0)];
        seed(&wrt([0, 0]), &mut vars);
        assert_eq!(vars[0].grad, 1.0);
        assert_eq!(vars[0].val, 1.0);
    }

    #[test]
    fn eval_is_idempotent() {
        let x: Dual<f64> = Dual::new(1.5, 0.5);
        let once = eval(x * x);
        let twice = eval(eval(x * x));
        assert_eq!(once.val.to_bits(), twice.val.to_bits());
        assert_eq!(once.grad.to_bits(), twice.grad.to_bits());
    }

    #[test]
    fn val_reads_through_every_nesting() {
        let x: HigherOrderDual<4> = Dual::from(0.125);
        assert_eq!(val(&x), 0.125);
        assert_eq!(val(&sin(x)), 0.125_f64.sin());
    }

    #[test]
    fn grad_closure_matches_derivative() {
        let f = |[x, y]: [D1; 2]| pow(x, 2.0) * y;
        let df = grad(f);
        let mut args = [D1::from(3.0), D1::from(2.0)];
        assert_relative_eq!(df(0, &mut args), 12.0, epsilon = 1e-12);
        assert_relative_eq!(df(1, &mut args), 9.0, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn scaled_variable_has_constant_derivative(c in -1e3f64..1e3, v in -1e3f64..1e3) {
            let mut args = [D1::from(v)];
            let d = derivative(|[x]: [D1; 1]| c * x, wrt([0]), &mut args);
            prop_assert_eq!(d, c);
        }

        #[test]
        fn square_derivative_is_twice_the_value(v in -1e3f64..1e3) {
            let mut args = [D1::from(v)];
            let d = derivative(|[x]: [D1; 1]| x * x, wrt([0]), &mut args);
            prop_assert_eq!(d, 2.0 * v);
        }

        #[test]
        fn chain_rule_through_sine(v in -3.0f64..3.0) {
            let mut args = [D1::from(v)];
            let d = derivative(|[x]: [D1; 1]| sin(x * x), wrt([0]), &mut args);
            let expected = 2.0 * v * (v * v).cos();
            prop_assert!((d - expected).abs() <= 1e-12 * (1.0 + expected.abs()));
        }

        #[test]
        fn reciprocal_derivative(v in prop_oneof![-1e2f64..-1e-2, 1e-2f64..1e2]) {
            let mut args = [D1::from(v)];
            let d = derivative(|[x]: [D1; 1]| 1.0 / x, wrt([0]), &mut args);
            let expected = -1.0 / (v * v);
            prop_assert!((d - expected).abs() <= 1e-12 * expected.abs());
        }

        #[test]
        fn cube_derivative(v in prop_oneof![-1e2f64..-1e-3, 1e-3f64..1e2]) {
            let mut args = [D1::from(v)];
            let d = derivative(|[x]: [D1; 1]| pow(x, 3.0), wrt([0]), &mut args);
            let expected = 3.0 * v * v;
            prop_assert!((d - expected).abs() <= 1e-12 * expected);
        }

        #[test]
        fn cube_second_derivative(v in prop_oneof![-1e2f64..-1e-3, 1e-3f64..1e2]) {
            let mut args = [D2::from(v)];
            let d = derivative(|[x]: [D2; 1]| pow(x, 3.0), wrt([0, 0]), &mut args);
            let expected = 6.0 * v;
            prop_assert!((d - expected).abs() <= 1e-12 * expected.abs());
        }

        #[test]
        fn derivatives_do_not_affect_equality(v in -1e3f64..1e3, g in -1e3f64..1e3) {
            prop_assert!(Dual::new(v, g) == Dual::new(v, 0.0));
            prop_assert!(!(Dual::new(v, g) < Dual::new(v, -g)));
        }
    }
}
