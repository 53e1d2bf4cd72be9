//! Example demonstrating derivatives of transcendental expressions.
//!
//! Each expression below is built as a tree and reduced once, when it
//! is turned into a `Dual`. The chain rule is applied node by node
//! during that reduction.
//!
//! Run with: `cargo run --example dual_transcendentals`

use dualexpr::{asin, cos, exp, log, log10, pow, sin, sqrt, tan, Dual, Expr};
use std::f64::consts::PI;

fn show(label: &str, e: Expr<f64>, expected: &str) {
    let f = Dual::from(e);
    println!("{}", label);
    println!("  f = {:.6}", f);
    println!("  f' = {:.6} (expected: {})", f.grad, expected);
    println!();
}

fn main() {
    println!("=== Dual Expressions: Transcendental Functions ===\n");

    let x = Dual::variable(0.0);
    show("Example 1: f(x) = e^x at x=0", exp(x), "1.0");

    let x = Dual::variable(2.0);
    show("Example 2: f(x) = ln(x) at x=2", log(x), "0.5");

    let x = Dual::variable(100.0);
    show("Example 3: f(x) = log10(x) at x=100", log10(x), "1/(100·ln 10)");

    let x = Dual::variable(PI / 2.0);
    show("Example 4: f(x) = sin(x) at x=π/2", sin(x), "~0.0");

    let x = Dual::variable(PI);
    show("Example 5: f(x) = cos(x) at x=π", cos(x), "~0.0");

    let x = Dual::variable(PI / 4.0);
    show("Example 6: f(x) = tan(x) at x=π/4", tan(x), "2.0");

    let x = Dual::variable(0.5);
    show("Example 7: f(x) = asin(x) at x=0.5", asin(x), "1/√0.75");

    let x = Dual::variable(9.0);
    show("Example 8: f(x) = √x at x=9", sqrt(x), "1/6");

    // σ(x) = 1 / (1 + e^(-x))
    let x = Dual::variable(0.0);
    show(
        "Example 9: Sigmoid σ(x) = 1/(1 + e^(-x)) at x=0",
        1.0 / (1.0 + exp(-x)),
        "0.25",
    );

    let x = Dual::variable(2.0);
    show("Example 10: f(x) = x^x at x=2", pow(x, x), "4·(ln 2 + 1)");

    let x = Dual::variable(0.0);
    show(
        "Example 11: f(x) = ln(sin(e^x)) at x=0",
        log(sin(exp(x))),
        "cos(1)/sin(1)",
    );

    println!("=== Second derivative ===");
    // Outer and inner derivative channels both seeded: x = 1 + ε₁ + ε₂.
    let x: Dual<Dual<f64>> = Dual::new(Dual::new(1.0, 1.0), Dual::new(1.0, 0.0));
    let f = Dual::from(exp(x * x));
    println!("  f(x) = e^(x²) at x=1");
    println!("  f   = {:.6}", f.val.val);
    println!("  f'  = {:.6} (expected: 2e)", f.grad.val);
    println!("  f'' = {:.6} (expected: 6e)", f.grad.grad);
}
