/*!
 * The operations graph nodes can apply, along with their local derivatives.
 *
 * The derivative of each operation is only ever taken with respect to its own operands, the
 * gradient pass multiplies these by the gradient flowing into the node to apply the chain rule.
 */

use crate::differentiation::Primitive;
use crate::numeric::extra::Real;

use std::marker::PhantomData;

/**
 * The value and the partial derivatives of a function of two arguments.
 */
pub trait FunctionDerivative<T> {
    fn function(x: T, y: T) -> T;
    fn d_function_dx(x: T, y: T) -> T;
    fn d_function_dy(x: T, y: T) -> T;
}

/**
 * The value and the derivative of a function of one argument.
 */
pub trait UnaryFunctionDerivative<T> {
    fn function(x: T) -> T;
    fn d_function_dx(x: T) -> T;
}

macro_rules! function_type {
    ($name:ident) => {
        pub struct $name<T> {
            _type: PhantomData<T>,
        }
    };
}

function_type!(Addition);
function_type!(Subtraction);
function_type!(Multiplication);
function_type!(Division);
function_type!(Power);
function_type!(Negation);
function_type!(Exponential);
function_type!(Sine);
function_type!(Cosine);
function_type!(NaturalLogarithm);
function_type!(BinaryLogarithm);

impl<T> FunctionDerivative<T> for Addition<T>
where
    T: Real + Primitive,
{
    /// `x + y`
    fn function(x: T, y: T) -> T {
        x + y
    }

    /// `d(x + y) / dx = 1`
    fn d_function_dx(_x: T, _y: T) -> T {
        T::one()
    }

    /// `d(x + y) / dy = 1`
    fn d_function_dy(_x: T, _y: T) -> T {
        T::one()
    }
}

impl<T> FunctionDerivative<T> for Subtraction<T>
where
    T: Real + Primitive,
{
    /// `x - y`
    fn function(x: T, y: T) -> T {
        x - y
    }

    /// `d(x - y) / dx = 1`
    fn d_function_dx(_x: T, _y: T) -> T {
        T::one()
    }

    /// `d(x - y) / dy = -1`
    fn d_function_dy(_x: T, _y: T) -> T {
        -T::one()
    }
}

impl<T> FunctionDerivative<T> for Multiplication<T>
where
    T: Real + Primitive,
{
    /// `x * y`
    fn function(x: T, y: T) -> T {
        x * y
    }

    /// `d(x * y) / dx = y`
    fn d_function_dx(_x: T, y: T) -> T {
        y
    }

    /// `d(x * y) / dy = x`
    fn d_function_dy(x: T, _y: T) -> T {
        x
    }
}

impl<T> FunctionDerivative<T> for Division<T>
where
    T: Real + Primitive,
{
    /// `x / y`
    fn function(x: T, y: T) -> T {
        x / y
    }

    /// `d(x / y) / dx = 1 / y`
    fn d_function_dx(_x: T, y: T) -> T {
        T::one() / y
    }

    /// `d(x / y) / dy = -x / (y^2)`
    fn d_function_dy(x: T, y: T) -> T {
        -x / (y.clone() * y)
    }
}

impl<T> FunctionDerivative<T> for Power<T>
where
    T: Real + Primitive,
{
    /// `x^y`
    fn function(x: T, y: T) -> T {
        x.pow(y)
    }

    /// `d(x^y) / dx = y * x^(y - 1)`
    fn d_function_dx(x: T, y: T) -> T {
        y.clone() * x.pow(y - T::one())
    }

    /// `d(x^y) / dy = x^y * ln(x)`
    fn d_function_dy(x: T, y: T) -> T {
        x.clone().pow(y) * x.ln()
    }
}

impl<T> UnaryFunctionDerivative<T> for Negation<T>
where
    T: Real + Primitive,
{
    /// `-x`
    fn function(x: T) -> T {
        -x
    }

    /// `d(-x) / dx = -1`
    fn d_function_dx(_x: T) -> T {
        -T::one()
    }
}

impl<T> UnaryFunctionDerivative<T> for Exponential<T>
where
    T: Real + Primitive,
{
    /// `e^x`
    fn function(x: T) -> T {
        x.exp()
    }

    /// `d(e^x) / dx = e^x`
    fn d_function_dx(x: T) -> T {
        x.exp()
    }
}

impl<T> UnaryFunctionDerivative<T> for Sine<T>
where
    T: Real + Primitive,
{
    /// `sin(x)`
    fn function(x: T) -> T {
        x.sin()
    }

    /// `d(sin(x)) / dx = cos(x)`
    fn d_function_dx(x: T) -> T {
        x.cos()
    }
}

impl<T> UnaryFunctionDerivative<T> for Cosine<T>
where
    T: Real + Primitive,
{
    /// `cos(x)`
    fn function(x: T) -> T {
        x.cos()
    }

    /// `d(cos(x)) / dx = -sin(x)`
    fn d_function_dx(x: T) -> T {
        -x.sin()
    }
}

impl<T> UnaryFunctionDerivative<T> for NaturalLogarithm<T>
where
    T: Real + Primitive,
{
    /// `ln(x)`
    fn function(x: T) -> T {
        x.ln()
    }

    /// `d(ln(x)) / dx = 1 / x`
    fn d_function_dx(x: T) -> T {
        T::one() / x
    }
}

impl<T> UnaryFunctionDerivative<T> for BinaryLogarithm<T>
where
    T: Real + Primitive,
{
    /// `log2(x)`
    fn function(x: T) -> T {
        x.log2()
    }

    /// `d(log2(x)) / dx = 1 / (x * ln(2))`
    fn d_function_dx(x: T) -> T {
        T::one() / (x * T::ln_2())
    }
}

/**
 * The operators with two operands a graph node can apply.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Power,
}

/**
 * The functions with one operand a graph node can apply.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOperation {
    Negation,
    Exponential,
    Sine,
    Cosine,
    NaturalLogarithm,
    BinaryLogarithm,
}

impl BinaryOperation {
    /**
     * The text of the token tagging nodes of this operation.
     */
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperation::Addition => "+",
            BinaryOperation::Subtraction => "-",
            BinaryOperation::Multiplication => "*",
            BinaryOperation::Division => "/",
            BinaryOperation::Power => "pow",
        }
    }

    pub fn function<T: Real + Primitive>(self, x: T, y: T) -> T {
        match self {
            BinaryOperation::Addition => Addition::<T>::function(x, y),
            BinaryOperation::Subtraction => Subtraction::<T>::function(x, y),
            BinaryOperation::Multiplication => Multiplication::<T>::function(x, y),
            BinaryOperation::Division => Division::<T>::function(x, y),
            BinaryOperation::Power => Power::<T>::function(x, y),
        }
    }

    pub fn d_function_dx<T: Real + Primitive>(self, x: T, y: T) -> T {
        match self {
            BinaryOperation::Addition => Addition::<T>::d_function_dx(x, y),
            BinaryOperation::Subtraction => Subtraction::<T>::d_function_dx(x, y),
            BinaryOperation::Multiplication => Multiplication::<T>::d_function_dx(x, y),
            BinaryOperation::Division => Division::<T>::d_function_dx(x, y),
            BinaryOperation::Power => Power::<T>::d_function_dx(x, y),
        }
    }

    pub fn d_function_dy<T: Real + Primitive>(self, x: T, y: T) -> T {
        match self {
            BinaryOperation::Addition => Addition::<T>::d_function_dy(x, y),
            BinaryOperation::Subtraction => Subtraction::<T>::d_function_dy(x, y),
            BinaryOperation::Multiplication => Multiplication::<T>::d_function_dy(x, y),
            BinaryOperation::Division => Division::<T>::d_function_dy(x, y),
            BinaryOperation::Power => Power::<T>::d_function_dy(x, y),
        }
    }
}

impl UnaryOperation {
    /**
     * The text of the token tagging nodes of this function.
     */
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperation::Negation => "neg",
            UnaryOperation::Exponential => "exp",
            UnaryOperation::Sine => "sin",
            UnaryOperation::Cosine => "cos",
            UnaryOperation::NaturalLogarithm => "ln",
            UnaryOperation::BinaryLogarithm => "log",
        }
    }

    pub fn function<T: Real + Primitive>(self, x: T) -> T {
        match self {
            UnaryOperation::Negation => Negation::<T>::function(x),
            UnaryOperation::Exponential => Exponential::<T>::function(x),
            UnaryOperation::Sine => Sine::<T>::function(x),
            UnaryOperation::Cosine => Cosine::<T>::function(x),
            UnaryOperation::NaturalLogarithm => NaturalLogarithm::<T>::function(x),
            UnaryOperation::BinaryLogarithm => BinaryLogarithm::<T>::function(x),
        }
    }

    pub fn d_function_dx<T: Real + Primitive>(self, x: T) -> T {
        match self {
            UnaryOperation::Negation => Negation::<T>::d_function_dx(x),
            UnaryOperation::Exponential => Exponential::<T>::d_function_dx(x),
            UnaryOperation::Sine => Sine::<T>::d_function_dx(x),
            UnaryOperation::Cosine => Cosine::<T>::d_function_dx(x),
            UnaryOperation::NaturalLogarithm => NaturalLogarithm::<T>::d_function_dx(x),
            UnaryOperation::BinaryLogarithm => BinaryLogarithm::<T>::d_function_dx(x),
        }
    }
}
