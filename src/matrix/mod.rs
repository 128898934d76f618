mod linalg;
#[allow(clippy::module_inception)]
mod matrix;

pub use matrix::Matrix;
