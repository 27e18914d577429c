/*!
 * Operator implementations for Vars.
 *
 * These implementations are written here but Rust docs will display them on the
 * [Var](super::Var) struct page.
 *
 * Vars implement the standard library traits for addition, subtraction, multiplication,
 * division and negation, so you can use the normal `+ - * /` operators to build expressions.
 * Each operation appends a new node to the graph the Vars belong to. As a convenience, these
 * operations can also be used with a Var on one side and a plain number on the other, in
 * which case the number is first added to the graph as a constant.
 *
 * A number on the left hand side can be either an `f32` or an `f64`, so the compiler cannot
 * infer the type of the graph from an unsuffixed literal there. Name the number type on the
 * graph, or suffix the literal, when writing expressions like `1.0 - x`.
 *
 * ```
 * use easy_autodiff::differentiation::Graph;
 * let graph = Graph::<f64>::new();
 * let x = graph.variable("x", 2.0);
 * let y = 1.0 - (x * 3.0);
 * assert_eq!(y.evaluate().unwrap(), -5.0);
 * ```
 *
 * Vars also implement the [Exp], [Sin], [Cos], [Ln], [Log2] and [Pow] traits from the
 * [numeric](super::super::numeric::extra) module. Note that to use a method defined in a
 * trait you have to import the trait as well!
 *
 * ```
 * use easy_autodiff::differentiation::Graph;
 * use easy_autodiff::numeric::extra::{Exp, Pow};
 * let graph = Graph::<f64>::new();
 * let x = graph.variable("x", 2.0);
 * let y = (x * x).exp() + x.pow(3.0);
 * assert_eq!(y.evaluate().unwrap(), 4.0_f64.exp() + 8.0);
 * ```
 */

use crate::differentiation::functions::{BinaryOperation, UnaryOperation};
use crate::differentiation::{Primitive, Var};
use crate::numeric::extra::{Cos, Exp, Ln, Log2, Pow, Real, Sin};
use std::ops::{Add, Div, Mul, Neg, Sub};

/**
 * Checks that two Vars refer to the same Graph.
 */
pub(crate) fn same_graph<'g, T: Primitive>(a: &Var<'g, T>, b: &Var<'g, T>) -> bool {
    std::ptr::eq(a.graph, b.graph)
}

#[track_caller]
fn binary<'g, T>(left: &Var<'g, T>, right: &Var<'g, T>, operation: BinaryOperation) -> Var<'g, T>
where
    T: Real + Primitive,
{
    assert!(
        same_graph(left, right),
        "Vars must be using the same Graph"
    );
    Var {
        graph: left.graph,
        index: left.graph.append_binary(operation, left.index, right.index),
    }
}

fn unary<'g, T>(operand: &Var<'g, T>, operation: UnaryOperation) -> Var<'g, T>
where
    T: Real + Primitive,
{
    Var {
        graph: operand.graph,
        index: operand.graph.append_unary(operation, operand.index),
    }
}

macro_rules! var_operator_impl_reference_reference {
    (impl $op:tt for Var { fn $method:ident } with $operation:expr) => {
        /**
         * Operation for two referenced Vars using the same Graph.
         */
        impl<'g, 'l, 'r, T: Real + Primitive> $op<&'r Var<'g, T>> for &'l Var<'g, T> {
            type Output = Var<'g, T>;
            #[track_caller]
            #[inline]
            fn $method(self, rhs: &Var<'g, T>) -> Self::Output {
                binary(self, rhs, $operation)
            }
        }
    };
}

macro_rules! var_operator_impl_value_value {
    (impl $op:tt for Var { fn $method:ident }) => {
        /**
         * Operation for two Vars using the same Graph.
         */
        impl<'g, T: Real + Primitive> $op for Var<'g, T> {
            type Output = Var<'g, T>;
            #[track_caller]
            #[inline]
            fn $method(self, rhs: Var<'g, T>) -> Self::Output {
                (&self).$method(&rhs)
            }
        }
    };
}

macro_rules! var_operator_impl_value_reference {
    (impl $op:tt for Var { fn $method:ident }) => {
        /**
         * Operation for two Vars using the same Graph with the right referenced.
         */
        impl<'g, T: Real + Primitive> $op<&Var<'g, T>> for Var<'g, T> {
            type Output = Var<'g, T>;
            #[track_caller]
            #[inline]
            fn $method(self, rhs: &Var<'g, T>) -> Self::Output {
                (&self).$method(rhs)
            }
        }
    };
}

macro_rules! var_operator_impl_reference_value {
    (impl $op:tt for Var { fn $method:ident }) => {
        /**
         * Operation for two Vars using the same Graph with the left referenced.
         */
        impl<'g, T: Real + Primitive> $op<Var<'g, T>> for &Var<'g, T> {
            type Output = Var<'g, T>;
            #[track_caller]
            #[inline]
            fn $method(self, rhs: Var<'g, T>) -> Self::Output {
                self.$method(&rhs)
            }
        }
    };
}

macro_rules! var_number_operator_impl {
    (impl $op:tt for Var { fn $method:ident }) => {
        /**
         * Operation for a referenced Var and a constant, the constant is added to the
         * Var's graph.
         */
        impl<'g, T: Real + Primitive> $op<T> for &Var<'g, T> {
            type Output = Var<'g, T>;
            #[inline]
            fn $method(self, rhs: T) -> Self::Output {
                self.$method(&self.graph.constant(rhs))
            }
        }

        /**
         * Operation for a Var and a constant, the constant is added to the Var's graph.
         */
        impl<'g, T: Real + Primitive> $op<T> for Var<'g, T> {
            type Output = Var<'g, T>;
            #[inline]
            fn $method(self, rhs: T) -> Self::Output {
                (&self).$method(rhs)
            }
        }
    };
}

macro_rules! number_var_operator_impl {
    (impl $op:tt for $T:ty { fn $method:ident }) => {
        /**
         * Operation for a constant and a referenced Var, the constant is added to the
         * Var's graph.
         */
        impl<'g> $op<&Var<'g, $T>> for $T {
            type Output = Var<'g, $T>;
            #[inline]
            fn $method(self, rhs: &Var<'g, $T>) -> Self::Output {
                (&rhs.graph.constant(self)).$method(rhs)
            }
        }

        /**
         * Operation for a constant and a Var, the constant is added to the Var's graph.
         */
        impl<'g> $op<Var<'g, $T>> for $T {
            type Output = Var<'g, $T>;
            #[inline]
            fn $method(self, rhs: Var<'g, $T>) -> Self::Output {
                self.$method(&rhs)
            }
        }
    };
}

macro_rules! var_arithmetic {
    (impl $op:tt for Var { fn $method:ident } with $operation:expr) => {
        var_operator_impl_reference_reference!(impl $op for Var { fn $method } with $operation);
        var_operator_impl_value_value!(impl $op for Var { fn $method });
        var_operator_impl_value_reference!(impl $op for Var { fn $method });
        var_operator_impl_reference_value!(impl $op for Var { fn $method });
        var_number_operator_impl!(impl $op for Var { fn $method });
        number_var_operator_impl!(impl $op for f32 { fn $method });
        number_var_operator_impl!(impl $op for f64 { fn $method });
    };
}

var_arithmetic!(impl Add for Var { fn add } with BinaryOperation::Addition);
var_arithmetic!(impl Sub for Var { fn sub } with BinaryOperation::Subtraction);
var_arithmetic!(impl Mul for Var { fn mul } with BinaryOperation::Multiplication);
var_arithmetic!(impl Div for Var { fn div } with BinaryOperation::Division);

/**
 * Negation of a Var by reference.
 */
impl<'g, T: Real + Primitive> Neg for &Var<'g, T> {
    type Output = Var<'g, T>;
    #[inline]
    fn neg(self) -> Self::Output {
        unary(self, UnaryOperation::Negation)
    }
}

/**
 * Negation of a Var by value.
 */
impl<'g, T: Real + Primitive> Neg for Var<'g, T> {
    type Output = Var<'g, T>;
    #[inline]
    fn neg(self) -> Self::Output {
        -&self
    }
}

macro_rules! var_real_operator_impl {
    (impl $op:tt for Var { fn $method:ident } with $operation:expr) => {
        /**
         * Operation for a Var by reference.
         */
        impl<'g, T: Real + Primitive> $op for &Var<'g, T> {
            type Output = Var<'g, T>;
            #[inline]
            fn $method(self) -> Self::Output {
                unary(self, $operation)
            }
        }

        /**
         * Operation for a Var by value.
         */
        impl<'g, T: Real + Primitive> $op for Var<'g, T> {
            type Output = Var<'g, T>;
            #[inline]
            fn $method(self) -> Self::Output {
                (&self).$method()
            }
        }
    };
}

var_real_operator_impl!(impl Exp for Var { fn exp } with UnaryOperation::Exponential);
var_real_operator_impl!(impl Sin for Var { fn sin } with UnaryOperation::Sine);
var_real_operator_impl!(impl Cos for Var { fn cos } with UnaryOperation::Cosine);
var_real_operator_impl!(impl Ln for Var { fn ln } with UnaryOperation::NaturalLogarithm);
var_real_operator_impl!(impl Log2 for Var { fn log2 } with UnaryOperation::BinaryLogarithm);

/**
 * Power of one Var to another, ie self^rhs for two referenced Vars using the same Graph.
 */
impl<'g, 'l, 'r, T: Real + Primitive> Pow<&'r Var<'g, T>> for &'l Var<'g, T> {
    type Output = Var<'g, T>;
    #[track_caller]
    #[inline]
    fn pow(self, rhs: &Var<'g, T>) -> Self::Output {
        binary(self, rhs, BinaryOperation::Power)
    }
}

var_operator_impl_value_value!(impl Pow for Var { fn pow });
var_operator_impl_value_reference!(impl Pow for Var { fn pow });
var_operator_impl_reference_value!(impl Pow for Var { fn pow });
var_number_operator_impl!(impl Pow for Var { fn pow });

/**
 * Power of a constant to a referenced Var, the constant is added to the Var's graph.
 */
impl<'g, T: Real + Primitive> Pow<&Var<'g, T>> for T {
    type Output = Var<'g, T>;
    #[inline]
    fn pow(self, rhs: &Var<'g, T>) -> Self::Output {
        (&rhs.graph.constant(self)).pow(rhs)
    }
}

/**
 * Power of a constant to a Var, the constant is added to the Var's graph.
 */
impl<'g, T: Real + Primitive> Pow<Var<'g, T>> for T {
    type Output = Var<'g, T>;
    #[inline]
    fn pow(self, rhs: Var<'g, T>) -> Self::Output {
        // the Real bound's Pow<T> would be picked by method syntax
        <T as Pow<&Var<'g, T>>>::pow(self, &rhs)
    }
}

#[cfg(test)]
mod tests {
    use crate::differentiation::Graph;
    use crate::numeric::extra::Pow;

    #[test]
    fn test_all_reference_combinations() {
        let graph = Graph::new();
        let a = graph.variable("a", 2.0);
        let b = graph.variable("b", -1.0);
        let c = &a + &b;
        let d = &a + b;
        let e = a + &b;
        let f = a + b;
        for sum in [c, d, e, f] {
            assert_eq!(sum.evaluate(), Ok(1.0));
        }
    }

    #[test]
    fn test_constants_on_either_side() {
        let graph = Graph::<f64>::new();
        let x = graph.variable("x", 4.0);
        assert_eq!((x - 1.0).evaluate(), Ok(3.0));
        assert_eq!((1.0 - x).evaluate(), Ok(-3.0));
        assert_eq!((x / 2.0).evaluate(), Ok(2.0));
        assert_eq!((2.0 / x).evaluate(), Ok(0.5));
        assert_eq!(x.pow(0.5).evaluate(), Ok(2.0));
        assert_eq!(2.0_f64.pow(x).evaluate(), Ok(16.0));
        assert_eq!(2.0_f64.pow(&x).evaluate(), Ok(16.0));
    }

    #[test]
    fn test_constant_raised_to_owned_var() {
        let graph = Graph::<f64>::new();
        let x = graph.variable("x", 3.0);
        let y = 2.0_f64.pow(x);
        assert_eq!(y.evaluate(), Ok(8.0));
        let derivatives = y.differentiate().unwrap();
        // d(2^x)/dx = 2^x * ln(2)
        assert!((derivatives[&x] - 8.0 * 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_f32_graphs() {
        let graph = Graph::<f32>::new();
        let x = graph.variable("x", 3.0);
        let y = 2.0 * x * x;
        assert_eq!(y.evaluate(), Ok(18.0));
        assert_eq!(y.differentiate().unwrap()[&x], 12.0);
    }

    #[test]
    #[should_panic]
    fn test_mixing_graphs_panics() {
        let first = Graph::new();
        let second = Graph::new();
        let x = first.variable("x", 1.0);
        let y = second.variable("y", 1.0);
        let _ = x + y;
    }
}
