/*!
 * Reverse mode automatic differentiation over expression graphs.
 *
 * Expressions are built as graphs of [Var](differentiation::Var)s on a
 * [Graph](differentiation::Graph), either directly with the normal arithmetic operators or
 * from infix text with the [parsing] module. A built expression can be evaluated and
 * differentiated with respect to every variable it uses, and evaluated and differentiated
 * again after changing the values of its variables, without being rebuilt.
 *
 * ```
 * use easy_autodiff::differentiation::Graph;
 * use easy_autodiff::numeric::extra::Exp;
 * let graph = Graph::<f64>::new();
 * let a = graph.variable("a", 2.0);
 * let y = (a * a).exp();
 * // d(e^(a^2))/da = 2a * e^(a^2)
 * assert_eq!(y.differentiate().unwrap()[&a], 4.0 * 4.0_f64.exp());
 * ```
 *
 * If this is your first time using this library you should check out the
 * [differentiation] module documentation and the [usage guide](differentiation::usage).
 */

pub mod differentiation;
pub mod errors;
pub mod numeric;
pub mod parsing;
pub mod token;
