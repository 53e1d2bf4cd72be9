//! Example demonstrating partial and higher-order derivatives.
//!
//! A `Dual` carries one derivative direction. `derivative` seeds the
//! selected arguments, evaluates the function and clears the seeds
//! again, so one function definition serves every partial derivative.
//! Nesting duals (`HigherOrderDual<N>`) carries derivatives up to
//! order N.
//!
//! Run with: `cargo run --example partial_derivatives`

use dualexpr::{derivative, exp, grad, log, sin, sqrt, wrt, Dual, HigherOrderDual};

type D2 = HigherOrderDual<2>;

fn main() {
    println!("=== Partial Derivatives ===\n");

    // Example 1: f(x, y) = x² + 2xy + y² at (3, 4)
    println!("Example 1: f(x, y) = x² + 2xy + y² at (3, 4)");
    let f = |[x, y]: [Dual<f64>; 2]| x * x + 2.0 * x * y + y * y;
    let mut args = [Dual::from(3.0), Dual::from(4.0)];
    println!("  ∂f/∂x = {} (expected: 2x + 2y = 14)", derivative(f, wrt([0]), &mut args));
    println!("  ∂f/∂y = {} (expected: 2x + 2y = 14)", derivative(f, wrt([1]), &mut args));
    println!();

    // Example 2: Rosenbrock f(x, y) = (1-x)² + 100(y-x²)²
    println!("Example 2: Rosenbrock f(x, y) = (1-x)² + 100(y-x²)²");
    let rosenbrock = |[x, y]: [Dual<f64>; 2]| {
        let a = Dual::from(1.0 - x);
        let b = Dual::from(y - x * x);
        a * a + 100.0 * b * b
    };
    let df = grad(rosenbrock);
    for point in [[1.0, 1.0], [0.0, 0.0]] {
        let mut args = point.map(Dual::from);
        println!(
            "  ∇f({}, {}) = [{}, {}]",
            point[0],
            point[1],
            df(0, &mut args),
            df(1, &mut args)
        );
    }
    println!();

    // Example 3: Euclidean norm at (3, 4, 0)
    println!("Example 3: ‖(x, y, z)‖ at (3, 4, 0)");
    let norm = |[x, y, z]: [Dual<f64>; 3]| sqrt(x * x + y * y + z * z);
    let dnorm = grad(norm);
    let mut args = [3.0, 4.0, 0.0].map(Dual::from);
    let g: Vec<f64> = (0..3).map(|i| dnorm(i, &mut args)).collect();
    println!("  ∇f = {:?} (expected: [0.6, 0.8, 0])", g);
    println!();

    // Example 4: f(x, y) = sin(x)·exp(y) + ln(x + y) at (1, 0)
    println!("Example 4: f(x, y) = sin(x)·exp(y) + ln(x + y) at (1, 0)");
    let f = |[x, y]: [Dual<f64>; 2]| sin(x) * exp(y) + log(x + y);
    let mut args = [Dual::from(1.0), Dual::from(0.0)];
    println!("  ∂f/∂x = {:.6}", derivative(f, wrt([0]), &mut args));
    println!("  ∂f/∂y = {:.6}", derivative(f, wrt([1]), &mut args));
    println!();

    println!("=== Higher Order ===\n");

    // Example 5: Hessian of f(x, y) = x³·y + y² at (2, 5)
    println!("Example 5: Hessian of f(x, y) = x³·y + y² at (2, 5)");
    let f = |[x, y]: [D2; 2]| x * x * x * y + y * y;
    let mut args = [D2::from(2.0), D2::from(5.0)];
    let h = [
        [
            derivative(f, wrt([0, 0]), &mut args),
            derivative(f, wrt([0, 1]), &mut args),
        ],
        [
            derivative(f, wrt([1, 0]), &mut args),
            derivative(f, wrt([1, 1]), &mut args),
        ],
    ];
    println!("  H = {:?}", h);
    println!("  (expected: [[6xy, 3x²], [3x², 2]] = [[60, 12], [12, 2]])");
    println!();

    // Example 6: value, slope and curvature from one evaluation
    println!("Example 6: f(x) = x·e^x at x=0, all orders at once");
    let mut x = D2::from(0.0);
    x.grad.val = 1.0;
    x.val.grad = 1.0;
    let y = Dual::from(x * exp(x));
    println!("  f   = {}", y.val.val);
    println!("  f'  = {} (expected: 1)", y.grad.val);
    println!("  f'' = {} (expected: 2)", y.grad.grad);
}
