//! Element-wise arithmetic shared by `Tensor` and `Matrix`. Both operands
//! must have identical shapes, there is no broadcasting. Every op comes as a
//! copying `op` and an in-place `op_assign`.

use std::ops::Neg;

use super::tensor::Tensor;
use crate::element::{Element, FloatElement};
use crate::error::{Result, TensorError};
use crate::matrix::Matrix;

macro_rules! check_same_shape {
    ($lhs:expr, $rhs:expr, $name:ident) => {
        if $lhs.shape() != $rhs.shape() {
            return Err(TensorError::mismatch(format!(
                "cannot {} arrays of shape {:?} and {:?}",
                stringify!($name),
                $lhs.shape(),
                $rhs.shape()
            )));
        }
    };
}

/// Integer overflow wraps, see `Element::wrapping_add`
macro_rules! derive_binop {
    ($arr:ident, $name:ident, $name_assign:ident, .$method:ident) => {
        impl<T: Element> $arr<T> {
            pub fn $name(&self, other: &$arr<T>) -> Result<$arr<T>> {
                let mut out = self.clone();
                out.$name_assign(other)?;
                Ok(out)
            }

            pub fn $name_assign(&mut self, other: &$arr<T>) -> Result<&mut Self> {
                check_same_shape!(self, other, $name);
                self.data.iter_mut().zip(other.data.iter()).for_each(|(a, &b)| *a = T::$method(*a, b));
                Ok(self)
            }
        }
    };
}

/// Division-like ops, a zero divisor in an integer array is reported
/// before any cell is touched
macro_rules! derive_checked_binop {
    ($arr:ident, $name:ident, $name_assign:ident, $checked:ident) => {
        impl<T: Element> $arr<T> {
            pub fn $name(&self, other: &$arr<T>) -> Result<$arr<T>> {
                let mut out = self.clone();
                out.$name_assign(other)?;
                Ok(out)
            }

            pub fn $name_assign(&mut self, other: &$arr<T>) -> Result<&mut Self> {
                check_same_shape!(self, other, $name);
                if other.data.iter().any(|&b| T::$checked(T::one(), b).is_none()) {
                    return Err(TensorError::DivisionByZero);
                }
                self.data
                    .iter_mut()
                    .zip(other.data.iter())
                    .for_each(|(a, &b)| *a = T::$checked(*a, b).unwrap_or(*a));
                Ok(self)
            }
        }
    };
}

macro_rules! derive_rounding {
    ($arr:ident, $name:ident, $name_assign:ident, $name_int:ident) => {
        impl<T: FloatElement> $arr<T> {
            pub fn $name(&self) -> $arr<T> {
                let mut out = self.clone();
                out.$name_assign();
                out
            }

            pub fn $name_assign(&mut self) -> &mut Self {
                self.data.iter_mut().for_each(|x| *x = T::$name(*x));
                self
            }

            pub fn $name_int(&self) -> $arr<i64> {
                self.with_data(self.data.iter().map(|&x| T::$name(x).floor_i64()).collect())
            }
        }
    };
}

macro_rules! impl_elementwise {
    ($($arr:ident),*) => {$(
        derive_binop!($arr, add, add_assign, .wrapping_add);
        derive_binop!($arr, sub, sub_assign, .wrapping_sub);
        derive_binop!($arr, mul, mul_assign, .wrapping_mul);
        derive_binop!($arr, pow, pow_assign, .power);
        derive_checked_binop!($arr, div, div_assign, checked_quot);
        derive_checked_binop!($arr, rem, rem_assign, checked_remainder);

        derive_rounding!($arr, round, round_assign, round_to_int);
        derive_rounding!($arr, ceil, ceil_assign, ceil_to_int);
        derive_rounding!($arr, floor, floor_assign, floor_to_int);

        impl<T: Element> $arr<T> {
            pub fn neg_assign(&mut self) -> &mut Self {
                self.data.iter_mut().for_each(|x| *x = T::wrapping_neg(*x));
                self
            }
        }

        impl<T: Element> Neg for $arr<T> {
            type Output = $arr<T>;
            fn neg(mut self) -> $arr<T> {
                self.neg_assign();
                self
            }
        }

        impl<'a, T: Element> Neg for &'a $arr<T> {
            type Output = $arr<T>;
            fn neg(self) -> $arr<T> {
                -self.clone()
            }
        }
    )*};
}

impl_elementwise!(Tensor, Matrix);

#[cfg(test)]
mod tests {
    use super::*;

    fn t<T: Element>(data: Vec<T>, dims: &[usize]) -> Tensor<T> {
        Tensor::from_vec(data, dims).unwrap()
    }

    #[test]
    fn float_ops() {
        let a = t(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
        let b = t(vec![0.5, 0.5, 2.0, 8.0], &[2, 2]);
        assert_eq!(a.add(&b).unwrap().as_slice(), &[1.5, 2.5, 5.0, 12.0]);
        assert_eq!(a.sub(&b).unwrap().as_slice(), &[0.5, 1.5, 1.0, -4.0]);
        assert_eq!(a.mul(&b).unwrap().as_slice(), &[0.5, 1.0, 6.0, 32.0]);
        assert_eq!(a.div(&b).unwrap().as_slice(), &[2.0, 4.0, 1.5, 0.5]);
        assert_eq!(a.rem(&b).unwrap().as_slice(), &[0.0, 0.0, 1.0, 4.0]);
        assert_eq!(a.pow(&t(vec![2.0, 3.0, 0.0, -1.0], &[2, 2])).unwrap().as_slice(), &[1.0, 8.0, 1.0, 0.25]);

        let zero = t(vec![0.0f64; 4], &[2, 2]);
        assert!(a.div(&zero).unwrap().iter().all(|x: &f64| x.is_infinite()));
    }

    #[test]
    fn in_place_leaves_operand() {
        let mut a = t(vec![1i64, 2, 3], &[3]);
        let b = t(vec![10i64, 20, 30], &[3]);
        let copy = a.add(&b).unwrap();
        assert_eq!(a.as_slice(), &[1, 2, 3]);
        a.add_assign(&b).unwrap().mul_assign(&b).unwrap();
        assert_eq!(a.as_slice(), &[110, 440, 990]);
        assert_eq!(copy.as_slice(), &[11, 22, 33]);
        assert_eq!(b.as_slice(), &[10, 20, 30]);
    }

    #[test]
    fn shape_mismatch() {
        let a = t(vec![1i64, 2, 3, 4], &[2, 2]);
        let b = t(vec![1i64, 2, 3, 4], &[4]);
        assert!(matches!(a.add(&b), Err(TensorError::ShapeMismatch { .. })));
    }

    #[test]
    fn integer_division() {
        let mut a = t(vec![7i64, -7, 9], &[3]);
        let b = t(vec![2i64, 2, 4], &[3]);
        assert_eq!(a.div(&b).unwrap().as_slice(), &[3, -3, 2]);
        assert_eq!(a.rem(&b).unwrap().as_slice(), &[1, -1, 1]);

        let z = t(vec![1i64, 0, 1], &[3]);
        assert_eq!(a.div_assign(&z).err(), Some(TensorError::DivisionByZero));
        assert_eq!(a.rem(&z).err(), Some(TensorError::DivisionByZero));
        assert_eq!(a.as_slice(), &[7, -7, 9]);
    }

    #[test]
    fn integer_overflow_wraps() {
        let max = t(vec![i32::MAX, i32::MIN, 3], &[3]);
        let one = t(vec![1i32, 1, 1], &[3]);
        assert_eq!(max.add(&one).unwrap().as_slice(), &[i32::MIN, i32::MIN + 1, 4]);
        assert_eq!(max.sub(&one).unwrap().as_slice(), &[i32::MAX - 1, i32::MAX, 2]);
        assert_eq!(max.mul(&t(vec![2i32, 2, 2], &[3])).unwrap().as_slice(), &[-2, 0, 6]);
        assert_eq!((-&max).as_slice(), &[-i32::MAX, i32::MIN, -3]);
        assert_eq!(t(vec![2i32], &[1]).pow(&t(vec![40], &[1])).unwrap().as_slice(), &[0]);
    }

    #[test]
    fn integer_pow() {
        let a = t(vec![2i64, 3, -1, 5], &[4]);
        let e = t(vec![3i64, 0, -3, -1], &[4]);
        assert_eq!(a.pow(&e).unwrap().as_slice(), &[8, 1, -1, 0]);
    }

    #[test]
    fn negation() {
        let a = t(vec![1i64, -2], &[2]);
        assert_eq!((-&a).as_slice(), &[-1, 2]);
        assert_eq!((-a).as_slice(), &[-1, 2]);
    }

    #[test]
    fn rounding() {
        let a = t(vec![1.5, -1.5, 2.4, -2.6], &[4]);
        assert_eq!(a.round().as_slice(), &[2.0, -2.0, 2.0, -3.0]);
        assert_eq!(a.ceil().as_slice(), &[2.0, -1.0, 3.0, -2.0]);
        assert_eq!(a.floor().as_slice(), &[1.0, -2.0, 2.0, -3.0]);
        assert_eq!(a.round_to_int().as_slice(), &[2, -2, 2, -3]);
        assert_eq!(a.floor_to_int().shape(), &[4]);

        let mut b = a.clone();
        b.ceil_assign();
        assert_eq!(b.ceil_to_int().as_slice(), &[2, -1, 3, -2]);
    }

    #[test]
    fn matrix_ops() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::constant(2.0, 2, 2).unwrap();
        assert_eq!(a.mul(&b).unwrap().as_slice(), &[2.0, 4.0, 6.0, 8.0]);
        let c = Matrix::constant(2.0, 2, 3).unwrap();
        assert!(matches!(a.sub(&c), Err(TensorError::ShapeMismatch { .. })));
        assert_eq!((-a).round_to_int().as_slice(), &[-1, -2, -3, -4]);
    }
}
