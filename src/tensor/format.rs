use std::fmt::{self, Display};

use itertools::Itertools;

use super::walker::advance;

/// The enum to facilitate the logic for labeling indices for the pretty write function
enum BlockLabel {
    Plain,
    Tensor3D(usize),
    TensorND(Vec<usize>),
}

impl BlockLabel {
    fn new(ndim: usize) -> Self {
        if ndim > 3 {
            Self::TensorND(vec![0; ndim - 2])
        } else if ndim == 3 {
            Self::Tensor3D(0)
        } else {
            Self::Plain
        }
    }

    /// Move on to the next matrix block, carrying over the leading dimensions
    fn increment(&mut self, dims: &[usize]) {
        match self {
            Self::Tensor3D(i) => *i += 1,
            Self::TensorND(d) => {
                let n = d.len();
                advance(d, &dims[0..n]);
            }
            Self::Plain => {}
        }
    }

    fn show(&self) -> String {
        match self {
            Self::Tensor3D(i) => format!("({})\n", i),
            Self::TensorND(d) => format!("({})\n", d.iter().join(",")),
            Self::Plain => String::new(),
        }
    }
}

/// Writes the cells as matrix blocks with every column padded to the same width.
/// Higher order structure is labeled by the leading indices:
///
/// ```text
/// (0)
/// [x, x]
/// [x, x]
///
/// (1)
/// [x, x]
/// [x, x]
/// ```
///
/// Matrices and vectors do not get a label, a rank 0 array prints its only cell.
pub(crate) fn pretty_write<T: Display>(f: &mut fmt::Formatter<'_>, data: &[T], dims: &[usize]) -> fmt::Result {
    let ndim = dims.len();
    if ndim == 0 {
        return write!(f, "{}", data[0]);
    }
    let (m, n) = if ndim > 1 { (dims[ndim - 2], dims[ndim - 1]) } else { (1, dims[0]) };

    let cells = pad_cells(data);
    let mut label = BlockLabel::new(ndim);
    for (b, block) in cells.chunks(m * n).enumerate() {
        if b > 0 {
            writeln!(f)?;
        }
        write!(f, "{}", label.show())?;
        for row in block.chunks(n) {
            writeln!(f, "[{}]", row.join(", "))?;
        }
        label.increment(dims);
    }
    Ok(())
}

/// Pads each cell so that every string representation has the same length
fn pad_cells<T: Display>(data: &[T]) -> Vec<String> {
    let cells: Vec<String> = data.iter().map(|x| x.to_string()).collect();
    let width = cells.iter().map(|s| s.chars().count()).max().unwrap_or(0);
    cells.into_iter().map(|s| format!("{:>width$}", s, width = width)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Show<'a>(&'a [i64], &'a [usize]);

    impl<'a> Display for Show<'a> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            pretty_write(f, self.0, self.1)
        }
    }

    #[test]
    fn matrix_is_padded() {
        let s = Show(&[1, 20, 3, 4], &[2, 2]).to_string();
        assert_eq!(s, "[ 1, 20]\n[ 3,  4]\n");
    }

    #[test]
    fn rank3_blocks_are_labeled() {
        let s = Show(&[1, 2, 3, 4], &[2, 1, 2]).to_string();
        assert_eq!(s, "(0)\n[1, 2]\n\n(1)\n[3, 4]\n");
    }

    #[test]
    fn rank4_labels_carry() {
        let data: Vec<i64> = (0..8).collect();
        let s = Show(&data, &[2, 2, 1, 2]).to_string();
        assert!(s.contains("(0,1)\n[2, 3]"));
        assert!(s.contains("(1,0)\n[4, 5]"));
    }

    #[test]
    fn scalar_and_vector() {
        assert_eq!(Show(&[7], &[]).to_string(), "7");
        assert_eq!(Show(&[1, 2, 3], &[3]).to_string(), "[1, 2, 3]\n");
    }
}
