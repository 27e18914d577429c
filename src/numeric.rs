/*!
 * Numerical type definitions.
 *
 * The expression graph is generic over the number type it stores. Any type implementing
 * [Numeric] can be added, subtracted, multiplied, divided and negated, and any type
 * implementing [Real](extra::Real) additionally supports the transcendental functions
 * the graph can differentiate through.
 *
 * These traits are implemented for `f32` and `f64`.
 */

use std::cmp::PartialOrd;
use std::ops::{Add, Div, Mul, Neg, Sub};

/**
 * A general purpose numeric trait that defines all the behaviour graph nodes need
 * their values to support for the basic arithmetic operations.
 */
pub trait Numeric
where
    Self: Add<Output = Self>
        + Sub<Output = Self>
        + Mul<Output = Self>
        + Div<Output = Self>
        + Neg<Output = Self>
        + PartialOrd
        + Sized
        + Clone
        + ZeroOne,
{
}

/**
 * Anything which implements all the super traits will automatically implement this trait too.
 */
impl<T> Numeric for T where
    T: Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
        + Neg<Output = T>
        + PartialOrd
        + Sized
        + Clone
        + ZeroOne
{
}

/**
 * A trait defining how to obtain 0 and 1 for every implementing type.
 */
pub trait ZeroOne: Sized {
    fn zero() -> Self;
    fn one() -> Self;
}

macro_rules! zero_one_float {
    ($T:ty) => {
        impl ZeroOne for $T {
            #[inline]
            fn zero() -> $T {
                0.0
            }
            #[inline]
            fn one() -> $T {
                1.0
            }
        }
    };
}

zero_one_float!(f32);
zero_one_float!(f64);

/**
 * Additional traits for more complex numerical operations.
 */
pub mod extra {
    use crate::numeric::Numeric;
    use std::fmt::Display;
    use std::str::FromStr;

    /**
     * A type which can compute e^self.
     */
    pub trait Exp {
        type Output;
        fn exp(self) -> Self::Output;
    }

    /**
     * A type which can compute the natural logarithm of self.
     */
    pub trait Ln {
        type Output;
        fn ln(self) -> Self::Output;
    }

    /**
     * A type which can compute the base 2 logarithm of self.
     */
    pub trait Log2 {
        type Output;
        fn log2(self) -> Self::Output;
    }

    /**
     * A type which can compute the sine of self.
     */
    pub trait Sin {
        type Output;
        fn sin(self) -> Self::Output;
    }

    /**
     * A type which can compute the cosine of self.
     */
    pub trait Cos {
        type Output;
        fn cos(self) -> Self::Output;
    }

    /**
     * A type which can compute self^rhs.
     */
    pub trait Pow<Rhs = Self> {
        type Output;
        fn pow(self, rhs: Rhs) -> Self::Output;
    }

    /**
     * The constant ln(2), needed for the derivative of a base 2 logarithm.
     */
    pub trait Ln2 {
        fn ln_2() -> Self;
    }

    macro_rules! real_float {
        ($T:ident) => {
            impl Exp for $T {
                type Output = $T;
                #[inline]
                fn exp(self) -> Self::Output {
                    $T::exp(self)
                }
            }

            impl Ln for $T {
                type Output = $T;
                #[inline]
                fn ln(self) -> Self::Output {
                    $T::ln(self)
                }
            }

            impl Log2 for $T {
                type Output = $T;
                #[inline]
                fn log2(self) -> Self::Output {
                    $T::log2(self)
                }
            }

            impl Sin for $T {
                type Output = $T;
                #[inline]
                fn sin(self) -> Self::Output {
                    $T::sin(self)
                }
            }

            impl Cos for $T {
                type Output = $T;
                #[inline]
                fn cos(self) -> Self::Output {
                    $T::cos(self)
                }
            }

            impl Pow<$T> for $T {
                type Output = $T;
                #[inline]
                fn pow(self, rhs: $T) -> Self::Output {
                    self.powf(rhs)
                }
            }

            impl Ln2 for $T {
                #[inline]
                fn ln_2() -> $T {
                    std::$T::consts::LN_2
                }
            }
        };
    }

    real_float!(f32);
    real_float!(f64);

    /**
     * A general purpose trait for the real numbers the expression graph can
     * differentiate every supported function through.
     *
     * `FromStr` and `Display` are required so constants can be converted to and from
     * the text of their tokens.
     */
    pub trait Real
    where
        Self: Numeric
            + Exp<Output = Self>
            + Ln<Output = Self>
            + Log2<Output = Self>
            + Sin<Output = Self>
            + Cos<Output = Self>
            + Pow<Self, Output = Self>
            + Ln2
            + FromStr
            + Display,
    {
    }

    impl<T> Real for T where
        T: Numeric
            + Exp<Output = T>
            + Ln<Output = T>
            + Log2<Output = T>
            + Sin<Output = T>
            + Cos<Output = T>
            + Pow<T, Output = T>
            + Ln2
            + FromStr
            + Display
    {
    }
}
