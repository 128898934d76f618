use std::fmt::{Debug, Display};
use std::ops::Neg;

use num::{Float, Num, NumCast, ToPrimitive};

use crate::error::{Result, TensorError};

/// A scalar whose element type is only known at runtime, used when a value
/// reaches an array through the dynamic `assign` entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
        }
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Int(x)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Int(x as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x as f64)
    }
}

/// The numeric cell type of a tensor or matrix. Integer and floating point
/// kinds share all the indexing machinery, only the arithmetic below differs.
pub trait Element:
    Copy + Debug + Display + Default + PartialOrd + Num + NumCast + Neg<Output = Self> + Send + Sync + 'static
{
    const NAME: &'static str;

    /// Seed for max reductions, -inf for floats
    fn lowest() -> Self;
    /// Seed for min reductions, +inf for floats
    fn highest() -> Self;

    /// Integer overflow wraps around in two's complement, the same way
    /// `power` does. Floats use the plain IEEE operations.
    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;
    fn wrapping_neg(self) -> Self;

    /// Truncating division for integers, `None` on a zero divisor
    fn checked_quot(self, rhs: Self) -> Option<Self>;
    /// Remainder with the sign of the dividend (fmod for floats)
    fn checked_remainder(self, rhs: Self) -> Option<Self>;
    fn power(self, exp: Self) -> Self;

    fn floor_i64(self) -> i64;
    fn as_f64(self) -> f64;
    fn from_value(value: Value) -> Result<Self>;

    /// Relative comparison, `tolerance` doubles as the absolute floor near zero
    fn close_to(self, other: Self, tolerance: f64) -> bool {
        if self == other {
            return true;
        }
        let (a, b) = (self.as_f64(), other.as_f64());
        let scale = a.abs().max(b.abs()).max(1.0);
        (a - b).abs() <= tolerance * scale
    }
}

/// Integer element kinds, the only ones binomial sampling can produce
pub trait IntElement: Element + Ord {}

/// Floating point element kinds, needed by rounding, normal sampling and QR
pub trait FloatElement: Element + Float {
    fn from_f64(x: f64) -> Self;
}

macro_rules! impl_int_element {
    ($($t:ty),*) => {$(
        impl Element for $t {
            const NAME: &'static str = stringify!($t);

            #[inline]
            fn lowest() -> Self { <$t>::MIN }
            #[inline]
            fn highest() -> Self { <$t>::MAX }

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self { <$t>::wrapping_add(self, rhs) }
            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self { <$t>::wrapping_sub(self, rhs) }
            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self { <$t>::wrapping_mul(self, rhs) }
            #[inline]
            fn wrapping_neg(self) -> Self { <$t>::wrapping_neg(self) }

            #[inline]
            fn checked_quot(self, rhs: Self) -> Option<Self> {
                if rhs == 0 { None } else { Some(self.wrapping_div(rhs)) }
            }

            #[inline]
            fn checked_remainder(self, rhs: Self) -> Option<Self> {
                if rhs == 0 { None } else { Some(self.wrapping_rem(rhs)) }
            }

            fn power(self, exp: Self) -> Self {
                if exp >= 0 {
                    let exp = u32::try_from(exp).unwrap_or(u32::MAX);
                    return self.wrapping_pow(exp);
                }
                // negative exponents truncate towards zero
                match self {
                    1 => 1,
                    -1 => if exp % 2 == 0 { 1 } else { -1 },
                    _ => 0,
                }
            }

            #[inline]
            fn floor_i64(self) -> i64 { self as i64 }
            #[inline]
            fn as_f64(self) -> f64 { self as f64 }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Int(x) => <$t as NumCast>::from(x).ok_or(TensorError::TypeMismatch {
                        expected: stringify!($t),
                        found: "out of range integer",
                    }),
                    Value::Float(_) => Err(TensorError::TypeMismatch {
                        expected: stringify!($t),
                        found: value.kind(),
                    }),
                }
            }
        }

        impl IntElement for $t {}
    )*};
}

macro_rules! impl_float_element {
    ($($t:ty),*) => {$(
        impl Element for $t {
            const NAME: &'static str = stringify!($t);

            #[inline]
            fn lowest() -> Self { <$t>::NEG_INFINITY }
            #[inline]
            fn highest() -> Self { <$t>::INFINITY }

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self { self + rhs }
            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self { self - rhs }
            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self { self * rhs }
            #[inline]
            fn wrapping_neg(self) -> Self { -self }

            #[inline]
            fn checked_quot(self, rhs: Self) -> Option<Self> { Some(self / rhs) }
            #[inline]
            fn checked_remainder(self, rhs: Self) -> Option<Self> { Some(self % rhs) }
            #[inline]
            fn power(self, exp: Self) -> Self { self.powf(exp) }

            #[inline]
            fn floor_i64(self) -> i64 {
                ToPrimitive::to_i64(&Float::floor(self)).unwrap_or(if self < 0.0 { i64::MIN } else { i64::MAX })
            }
            #[inline]
            fn as_f64(self) -> f64 { self as f64 }

            fn from_value(value: Value) -> Result<Self> {
                Ok(match value {
                    Value::Int(x) => x as $t,
                    Value::Float(x) => x as $t,
                })
            }
        }

        impl FloatElement for $t {
            #[inline]
            fn from_f64(x: f64) -> Self { x as $t }
        }
    )*};
}

impl_int_element!(i32, i64);
impl_float_element!(f32, f64);
