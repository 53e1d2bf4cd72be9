//! Forward-mode automatic differentiation over lazily reduced
//! dual-number expressions.
//!
//! Arithmetic on tracked values records a small expression tree
//! instead of computing eagerly. The tree is simplified as it is
//! built (redundant negations and inversions cancel, scalar factors
//! fold into a fused scalar-dual product) and reduced in one pass,
//! value and derivative together, when it is assigned to a [`Dual`].
//!
//! - [`Dual`]: a value and its derivative
//! - [`Expr`]: the unreduced expression tree
//! - [`derivative`](derivative()), [`grad`], [`nth_derivative`]:
//!   extraction, including partial and higher-order derivatives
//!
//! # Single-variable differentiation
//!
//! ```
//! use dualexpr::{sin, Dual};
//!
//! // f(x) = sin(x²) at x = 0
//! let x = Dual::variable(0.0);
//! let y = Dual::from(sin(x * x) + 3.0 * x);
//!
//! assert_eq!(y.val, 0.0);
//! assert_eq!(y.grad, 3.0);  // 2x·cos(x²) + 3
//! ```
//!
//! # Partial derivatives
//!
//! ```
//! use dualexpr::{derivative, exp, wrt, Dual};
//!
//! // f(x, y) = x·exp(y)
//! let f = |[x, y]: [Dual<f64>; 2]| x * exp(y);
//! let mut args = [Dual::from(3.0), Dual::from(0.0)];
//!
//! assert_eq!(derivative(f, wrt([0]), &mut args), 1.0);  // exp(y)
//! assert_eq!(derivative(f, wrt([1]), &mut args), 3.0);  // x·exp(y)
//! ```
//!
//! # Higher-order derivatives
//!
//! Nest duals to carry more orders. [`HigherOrderDual<N>`] names the
//! order-N type.
//!
//! ```
//! use dualexpr::{derivative, wrt, HigherOrderDual};
//!
//! type D2 = HigherOrderDual<2>;
//!
//! // f(x, y) = x³·y
//! let f = |[x, y]: [D2; 2]| x * x * x * y;
//! let mut args = [D2::from(2.0), D2::from(5.0)];
//!
//! assert_eq!(derivative(f, wrt([0, 0]), &mut args), 60.0);  // 6xy
//! assert_eq!(derivative(f, wrt([0, 1]), &mut args), 12.0);  // 3x²
//! ```
//!
//! # In-place updates
//!
//! Compound assignment reduces straight into the target, and the
//! target may appear on the right-hand side:
//!
//! ```
//! use dualexpr::Dual;
//!
//! let mut x = Dual::variable(2.0);
//! x += 1.0 / x;
//! assert_eq!(x.val, 2.5);
//! assert_eq!(x.grad, 0.75);  // 1 - 1/x²
//! ```

pub mod assign;
pub mod derivative;
pub mod dual;
pub mod expr;
pub mod op;
pub mod ops;
pub mod real;
pub mod traits;

pub use derivative::{
    derivative, eval, grad, nth_derivative, seed, unseed, val, wrt, Derivative, HigherOrder,
    HigherOrderDual, Order, Wrt,
};
pub use dual::Dual;
pub use expr::{BinaryExpr, Expr, TernaryExpr, UnaryExpr};
pub use op::{BinaryOp, TernaryOp, UnaryOp};
pub use ops::{
    abs, abs2, acos, asin, atan, conj, cos, exp, imag, log, log10, pow, positive, real, sin,
    sqrt, tan,
};
pub use real::{Real, Value};
pub use traits::{ExprLike, GradType, Operable, ValueType};
