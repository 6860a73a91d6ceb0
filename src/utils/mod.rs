use ndarray::ScalarOperand;
use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Scalar bound used throughout the crate. Satisfied by `f32` and `f64`.
pub trait FloatOps:
    Float
    + FromPrimitive
    + ToPrimitive
    + NumAssign
    + Sum
    + ScalarOperand
    + Debug
    + Display
    + Send
    + Sync
    + 'static
{
}

impl<T> FloatOps for T where
    T: Float
        + FromPrimitive
        + ToPrimitive
        + NumAssign
        + Sum
        + ScalarOperand
        + Debug
        + Display
        + Send
        + Sync
        + 'static
{
}
