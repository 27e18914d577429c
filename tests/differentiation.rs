extern crate easy_autodiff;

#[cfg(test)]
mod reverse_tests {
    use approx::assert_relative_eq;

    use easy_autodiff::differentiation::{Graph, Var};
    use easy_autodiff::errors::Error;
    use easy_autodiff::numeric::extra::{Cos, Exp, Ln, Log2, Pow, Sin};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn x_cubed<'g>(x: Var<'g, f32>) -> Var<'g, f32> {
        &(&x * &x) * &x
    }

    fn x_cubed_derivative(x: f32) -> f32 {
        // d (x^3) / dx == 3(x^2)
        3.0 * x * x
    }

    #[test]
    fn test_x_cubed() {
        // Test the differentiation of the function (x^3) with respect to x
        let graph = Graph::new();
        let x = graph.variable("x", 1.5);
        let y = x_cubed(x);
        let derivatives = y.differentiate().unwrap();
        let dx = derivatives[&x];
        let also_dx = x_cubed_derivative(1.5);
        assert_eq!(dx, also_dx);
    }

    #[test]
    fn test_aliasing_is_additive() {
        // x used twice in x * x contributes through both copies
        let graph = Graph::new();
        let v = 7.0;
        let x = graph.variable("x", v);
        let y = x * x;
        y.differentiate().unwrap();
        assert_eq!(x.gradient(), Ok(2.0 * v));
    }

    #[test]
    fn test_chain_rule_through_functions() {
        // d e^(x^2) / dx = 2x e^(x^2)
        let graph = Graph::new();
        let x = graph.variable("x", 2.0_f64);
        let y = (x * x).exp();
        let derivatives = y.differentiate().unwrap();
        assert_relative_eq!(derivatives[&x], 2.0 * 2.0 * 4.0_f64.exp());
        assert_relative_eq!(derivatives[&x], 218.3926, max_relative = 1e-6);
    }

    #[test]
    fn test_values_and_gradients_follow_mutation() {
        init_logging();
        let graph = Graph::new();
        let x = graph.variable("x", 10.0);
        let y = graph.variable("y", 12.0);
        let z = x * x + y * y;
        assert_eq!(z.evaluate(), Ok(244.0));
        graph.set_value(x.identity().unwrap(), 1.0).unwrap();
        graph.set_value(y.identity().unwrap(), 2.0).unwrap();
        assert_eq!(z.evaluate(), Ok(5.0));
        z.differentiate().unwrap();
        assert_eq!(graph.gradient_of(x.identity().unwrap()), Ok(2.0));
        assert_eq!(graph.gradient_of(y.identity().unwrap()), Ok(4.0));
    }

    #[test]
    fn test_division_by_zero_only_when_evaluated() {
        let graph = Graph::new();
        let x = graph.variable("x", 1.0);
        let y = graph.variable("y", 0.0);
        // building the division succeeds, it is only a problem once evaluated
        let z = x / y;
        assert_eq!(z.evaluate(), Err(Error::DivisionByZero));
        assert_eq!(z.differentiate().map(|_| ()), Err(Error::DivisionByZero));
        y.set_value(4.0).unwrap();
        assert_eq!(z.evaluate(), Ok(0.25));
    }

    #[test]
    fn test_subtraction_is_asymmetric() {
        let graph = Graph::new();
        let a = graph.variable("a", 3.0);
        let b = graph.variable("b", 5.0);
        let derivatives = (a - b).differentiate().unwrap();
        assert_eq!(derivatives[&a], 1.0);
        assert_eq!(derivatives[&b], -1.0);
    }

    #[test]
    fn test_differentiate_is_idempotent() {
        let graph = Graph::new();
        let a = graph.variable("a", 1.5);
        let b = graph.variable("b", -0.5);
        let s = a * b + a.sin();
        let z = s * s / (b + 3.0);
        let first = z.differentiate().unwrap();
        let first_a = a.gradient().unwrap();
        let second = z.differentiate().unwrap();
        assert_eq!(first[&a], second[&a]);
        assert_eq!(first[&b], second[&b]);
        assert_eq!(a.gradient(), Ok(first_a));
    }

    #[test]
    fn test_pow_partials() {
        let graph = Graph::new();
        let a = graph.variable("a", 3.0_f64);
        let b = graph.variable("b", 4.0_f64);
        let derivatives = a.pow(b).differentiate().unwrap();
        // b * a^(b - 1) and a^b * ln(a)
        assert_relative_eq!(derivatives[&a], 108.0, max_relative = 1e-12);
        assert_relative_eq!(derivatives[&b], 88.9876, max_relative = 1e-5);
    }

    #[test]
    fn test_variables_outside_the_expression() {
        let graph = Graph::new();
        let x = graph.variable("x", 1.0);
        let unused = graph.variable("unused", 1.0);
        let derivatives = (x * 2.0).differentiate().unwrap();
        // never composed into the expression so it makes no contribution
        assert_eq!(derivatives[&unused], 0.0);
        assert_eq!(derivatives.get(unused.identity().unwrap()), &0.0);
        assert_eq!(unused.gradient(), Ok(0.0));
    }

    #[test]
    fn test_gradients_table() {
        let graph = Graph::new();
        let x = graph.variable("x", 2.0);
        let y = graph.variable("y", 3.0);
        let derivatives = (x * y + 1.0).differentiate().unwrap();
        // x, y and the constant 1
        assert_eq!(derivatives.len(), 3);
        assert_eq!(derivatives.by_label("x"), Some(&3.0));
        assert_eq!(derivatives.by_label("y"), Some(&2.0));
        assert_eq!(derivatives.by_label("z"), None);
        let labels: Vec<Option<&str>> = derivatives.iter().map(|(_, label, _)| label).collect();
        assert_eq!(labels, vec![Some("x"), Some("y"), None]);
    }

    #[test]
    fn test_several_expressions_on_one_graph() {
        let graph = Graph::new();
        let x = graph.variable("x", 3.0);
        let square = x * x;
        let cube = square * x;
        assert_eq!(cube.differentiate().unwrap()[&x], 27.0);
        assert_eq!(square.differentiate().unwrap()[&x], 6.0);
        x.set_value(2.0).unwrap();
        assert_eq!(cube.differentiate().unwrap()[&x], 12.0);
        assert_eq!(square.differentiate().unwrap()[&x], 4.0);
    }

    #[test]
    fn test_set_value_resets_gradients() {
        let graph = Graph::new();
        let x = graph.variable("x", 3.0);
        let y = graph.variable("y", 5.0);
        let z = x * x + y;
        z.differentiate().unwrap();
        assert_eq!(x.gradient(), Ok(6.0));
        assert_eq!(y.gradient(), Ok(1.0));
        x.set_value(4.0).unwrap();
        assert_eq!(x.gradient(), Ok(0.0));
        assert_eq!(graph.gradient_of(x.identity().unwrap()), Ok(0.0));
        // only the variable that was set is reset
        assert_eq!(y.gradient(), Ok(1.0));
        z.differentiate().unwrap();
        assert_eq!(x.gradient(), Ok(8.0));
    }

    use easy_autodiff::numeric::Numeric;
    // f(x) = (x^5 + x^3 - 1/x) - x
    // df(x)/dx = 5x^4 + 3x^2 + (1/x^2) - 1
    fn f<T: Numeric + Copy>(x: T) -> T {
        ((x * x * x * x * x) + (x * x * x) - (T::one() / x)) - x
    }

    fn f_var<'g>(x: Var<'g, f64>) -> Var<'g, f64> {
        ((x * x * x * x * x) + (x * x * x) - (1.0 / x)) - x
    }

    #[test]
    fn test_same_function_on_numbers_and_vars() {
        let x = -0.75;
        let graph = Graph::new();
        let variable = graph.variable("x", x);
        let result = f_var(variable);
        assert_eq!(result.evaluate(), Ok(f(x)));
        let dx = result.differentiate().unwrap()[&variable];
        let also_dx = 5.0 * x * x * x * x + 3.0 * x * x + 1.0 / (x * x) - 1.0;
        assert_relative_eq!(dx, also_dx, max_relative = 1e-12);
    }

    mod reference_values {
        use super::*;

        #[test]
        fn test_shared_sum() {
            let graph = Graph::new();
            let c = graph.variable("c", 1.0);
            let d = graph.variable("d", 1.0);
            let derivatives = ((c + d) * d).differentiate().unwrap();
            assert_eq!(derivatives[&c], 1.0);
            assert_eq!(derivatives[&d], 3.0);
        }

        #[test]
        fn test_fourth_power() {
            let graph = Graph::new();
            let a = graph.variable("a", 10.0);
            let b = graph.variable("b", 10.0);
            let derivatives = (a * a * a * a + b).differentiate().unwrap();
            assert_eq!(derivatives[&a], 4000.0);
            assert_eq!(derivatives[&b], 1.0);
        }

        #[test]
        fn test_squared_sum_plus_product() {
            let graph = Graph::new();
            let a = graph.variable("a", 10.0);
            let b = graph.variable("b", 10.0);
            let c = graph.variable("c", 5.0);
            let z = (a + b) * (a + b) + c * a * b;
            let derivatives = z.differentiate().unwrap();
            assert_eq!(derivatives[&a], 90.0);
            assert_eq!(derivatives[&b], 90.0);
            assert_eq!(derivatives[&c], 100.0);
        }

        #[test]
        fn test_exp_of_product() {
            let graph = Graph::new();
            let a = graph.variable("a", 2.0_f64);
            let b = graph.variable("b", 3.0_f64);
            let derivatives = (a * b).exp().differentiate().unwrap();
            assert_relative_eq!(derivatives[&a], 1210.2864, max_relative = 1e-6);
            assert_relative_eq!(derivatives[&b], 806.8576, max_relative = 1e-6);
        }

        #[test]
        fn test_logistic_shape() {
            let graph = Graph::new();
            let x = graph.variable("x", 2.0_f64);
            let y = graph.variable("y", 1.0_f64);
            let z = y / (y + (-x).exp());
            let derivatives = z.differentiate().unwrap();
            assert_relative_eq!(derivatives[&x], 0.104994, max_relative = 1e-5);
        }

        #[test]
        fn test_trigonometry() {
            let graph = Graph::new();
            let a = graph.variable("a", 2.0_f64);
            let b = graph.variable("b", 1.0_f64);
            let sine = (a * a).sin().differentiate().unwrap();
            assert_relative_eq!(sine[&a], -2.61457, max_relative = 1e-5);
            let cosine = (a * a).cos().differentiate().unwrap();
            assert_relative_eq!(cosine[&a], 3.02721, max_relative = 1e-5);
            let cosine = b.cos().differentiate().unwrap();
            assert_relative_eq!(cosine[&b], -0.841471, max_relative = 1e-5);
        }

        #[test]
        fn test_logarithms() {
            let graph = Graph::new();
            let a = graph.variable("a", 2.0_f64);
            let natural = (a * a).ln().differentiate().unwrap();
            assert_relative_eq!(natural[&a], 1.0);
            let binary = (a * a).log2().differentiate().unwrap();
            assert_relative_eq!(binary[&a], 1.442695, max_relative = 1e-6);
        }

        #[test]
        fn test_powers() {
            let graph = Graph::new();
            let a = graph.variable("a", 2.0_f64);
            let b = graph.variable("b", 2.0_f64);
            let derivatives = a.pow(b).differentiate().unwrap();
            assert_relative_eq!(derivatives[&a], 4.0, max_relative = 1e-12);
            assert_relative_eq!(derivatives[&b], 2.772589, max_relative = 1e-6);
        }

        #[test]
        fn test_negation() {
            let graph = Graph::new();
            let a = graph.variable("a", 2.0);
            assert_eq!((-a).differentiate().unwrap()[&a], -1.0);
        }

        #[test]
        fn test_quotient() {
            let graph = Graph::new();
            let c = graph.variable("c", 1.0);
            let d = graph.variable("d", 10.0);
            let derivatives = (c / d).differentiate().unwrap();
            assert_relative_eq!(derivatives[&c], 0.1);
            assert_relative_eq!(derivatives[&d], -0.01);
        }
    }

    mod finite_differences {
        use super::*;

        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        const STEP: f64 = 1e-6;

        /**
         * Estimates the derivative of the expression with respect to the variable with
         * a central difference, moving the variable and re-evaluating the same graph.
         */
        fn central_difference(expression: &Var<f64>, variable: &Var<f64>) -> f64 {
            let original = variable.evaluate().unwrap();
            variable.set_value(original + STEP).unwrap();
            let above = expression.evaluate().unwrap();
            variable.set_value(original - STEP).unwrap();
            let below = expression.evaluate().unwrap();
            variable.set_value(original).unwrap();
            (above - below) / (2.0 * STEP)
        }

        #[test]
        fn test_gradients_match_finite_differences() {
            init_logging();
            // for reproducibility we use a fixed seed
            let mut random_generator = ChaCha8Rng::seed_from_u64(16);
            let graph = Graph::new();
            let x = graph.variable("x", 1.0);
            let y = graph.variable("y", 1.0);
            let shared = x * y;
            let z = shared.sin() + x.exp() / (y * y) - x.pow(y) + (shared * shared).ln();
            for _ in 0..20 {
                x.set_value(random_generator.random_range(0.5..2.0)).unwrap();
                y.set_value(random_generator.random_range(0.5..2.0)).unwrap();
                let derivatives = z.differentiate().unwrap();
                let also_dx = central_difference(&z, &x);
                let also_dy = central_difference(&z, &y);
                assert_relative_eq!(derivatives[&x], also_dx, epsilon = 1e-6, max_relative = 1e-5);
                assert_relative_eq!(derivatives[&y], also_dy, epsilon = 1e-6, max_relative = 1e-5);
            }
        }
    }
}
