/*!
 * # Usage of Graph and Var
 *
 * A `Graph` must be created before any `Var`s, since every Var is a handle into the graph it
 * was created on. Building expressions out of Vars has side effects, each operation appends
 * nodes to the graph, but this is abstracted away and Vars can mostly be treated like normal
 * numbers.
 *
 * For this example we use a function which takes two inputs, r and a, and returns two
 * outputs, x and y.
 *
 * ```
 * use easy_autodiff::differentiation::{Graph, Var};
 * use easy_autodiff::numeric::extra::{Cos, Sin};
 * // the lifetimes tell the rust compiler that our inputs and outputs
 * // can all live as long as the Graph
 * fn cartesian<'g>(r: Var<'g, f64>, angle: Var<'g, f64>) -> (Var<'g, f64>, Var<'g, f64>) {
 *     let x = r * angle.cos();
 *     let y = r * angle.sin();
 *     (x, y)
 * }
 * let graph = Graph::<f64>::new();
 * let r = graph.variable("r", 1.0);
 * let a = graph.variable("a", 2.0);
 * let (x, y) = cartesian(r, a);
 * // first find dx/dr and dx/da
 * let x_derivatives = x.differentiate().unwrap();
 * let dx_dr = x_derivatives[&r];
 * let dx_da = x_derivatives[&a];
 * assert_eq!(dx_dr, 2.0_f64.cos());
 * assert_eq!(dx_da, -2.0_f64.sin());
 * // now find dy/dr and dy/da
 * let y_derivatives = y.differentiate().unwrap();
 * let dy_dr = y_derivatives[&r];
 * let dy_da = y_derivatives[&a];
 * assert_eq!(dy_dr, 2.0_f64.sin());
 * assert_eq!(dy_da, 2.0_f64.cos());
 * ```
 *
 * ## Reusing an expression
 *
 * The graph does not need to be rebuilt when the inputs change. Setting a new value on a
 * variable updates every copy of it in every expression on the graph, and the next
 * evaluation or differentiation uses it. This makes optimisation loops straightforward, here
 * we minimise `(x - 3)^2` by gradient descent.
 *
 * ```
 * use easy_autodiff::differentiation::Graph;
 * let graph = Graph::<f64>::new();
 * let x = graph.variable("x", 0.0);
 * let error = (x - 3.0) * (x - 3.0);
 * let learning_rate = 0.1;
 * for _ in 0..100 {
 *     let gradient = error.differentiate().unwrap()[&x];
 *     let current = x.evaluate().unwrap();
 *     x.set_value(current - learning_rate * gradient).unwrap();
 * }
 * assert!((x.evaluate().unwrap() - 3.0).abs() < 1e-6);
 * ```
 *
 * Each call to `differentiate` starts from zeroed gradients, so calling it repeatedly
 * without changing any values gives the same gradients each time.
 *
 * ## Errors
 *
 * Division is only checked when evaluating, since the value of the denominator can change
 * after the expression is built. A failing evaluation leaves the gradients of the previous
 * successful pass untouched.
 *
 * ```
 * use easy_autodiff::differentiation::Graph;
 * use easy_autodiff::errors::Error;
 * let graph = Graph::<f64>::new();
 * let x = graph.variable("x", 1.0);
 * let y = graph.variable("y", 2.0);
 * let z = x / y;
 * assert_eq!(z.evaluate(), Ok(0.5));
 * y.set_value(0.0).unwrap();
 * assert_eq!(z.evaluate(), Err(Error::DivisionByZero));
 * ```
 *
 * ## Expressions from text
 *
 * The [parsing](crate::parsing) module builds the same graphs from infix text, taking the
 * starting values of the variables from a map.
 *
 * ```
 * use easy_autodiff::differentiation::Graph;
 * use easy_autodiff::parsing::{Expression, State};
 * let graph = Graph::<f64>::new();
 * let mut state = State::new();
 * state.insert("a".to_string(), 10.0);
 * state.insert("b".to_string(), 10.0);
 * let expression = Expression::parse(&graph, "(a + b) * (a + b)", &state).unwrap();
 * assert_eq!(expression.evaluate(), Ok(400.0));
 * expression.differentiate().unwrap();
 * assert_eq!(expression.gradient_of("a"), Ok(40.0));
 * ```
 *
 * ## Substitution
 *
 * Vars implement the same operator traits as `f32` and `f64`, so a function written against
 * those traits can be given either plain numbers or Vars.
 *
 * ```
 * use easy_autodiff::differentiation::Graph;
 * use easy_autodiff::numeric::extra::Sin;
 * use std::ops::Mul;
 * fn f<T>(x: T) -> <T as Mul>::Output
 * where
 *     T: Mul + Sin<Output = T> + Copy,
 * {
 *     x * x.sin()
 * }
 * let graph = Graph::<f64>::new();
 * let x = graph.variable("x", 0.5);
 * assert_eq!(f(x).evaluate().unwrap(), f(0.5_f64));
 * ```
 */
