pub mod copier;
pub mod nested;
pub mod shape;
pub mod slice;
pub mod walker;
#[allow(clippy::module_inception)]
pub mod tensor;

mod format;
mod ops;
mod random;
mod reduce;

#[cfg(test)]
mod property_tests;

pub(crate) use format::pretty_write;
pub(crate) use random::{box_muller, uniform};
pub(crate) use tensor::hash_cells;

pub use nested::{ArrayData, Nested};
pub use shape::Shape;
pub use slice::{SliceEntry, SliceSpec};
pub use tensor::{Assign, Selection, Tensor};
pub use walker::{inverse_permutation, Axes, Coords};
