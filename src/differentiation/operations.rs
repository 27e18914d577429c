/*!
 * Other trait implementations for the differentiation module
 *
 * These implementations are written here but Rust docs will display them on their implemented
 * types.
 */

use crate::differentiation::Primitive;

macro_rules! impl_primitive {
    ($T:tt) => {
        impl Primitive for $T {}
    };
}

impl_primitive!(f32);
impl_primitive!(f64);
