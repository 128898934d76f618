use std::fmt::{self, Display};
use std::ops::{RangeFull, RangeInclusive};

use crate::error::{Result, TensorError};

/// What a single dimension of a slice selects. Bounds are kept signed so
/// that a negative index survives until validation rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceEntry {
    /// The whole dimension
    Full,
    /// A single coordinate, the dimension collapses to size 1
    Index(isize),
    /// Inclusive `[lo, hi]`
    Range(isize, isize),
}

use SliceEntry::{Full, Index, Range};

impl Display for SliceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Full => write!(f, ".."),
            Index(i) => write!(f, "{}", i),
            Range(lo, hi) => write!(f, "{}..={}", lo, hi),
        }
    }
}

impl From<RangeFull> for SliceEntry {
    fn from(_: RangeFull) -> Self {
        Full
    }
}

impl From<Option<usize>> for SliceEntry {
    fn from(x: Option<usize>) -> Self {
        match x {
            Some(i) => Index(i as isize),
            None => Full,
        }
    }
}

macro_rules! entry_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for SliceEntry {
            fn from(i: $t) -> Self {
                Index(i as isize)
            }
        }

        impl From<RangeInclusive<$t>> for SliceEntry {
            fn from(r: RangeInclusive<$t>) -> Self {
                Range(*r.start() as isize, *r.end() as isize)
            }
        }

        impl From<($t, $t)> for SliceEntry {
            fn from((lo, hi): ($t, $t)) -> Self {
                Range(lo as isize, hi as isize)
            }
        }
    )*};
}

entry_from_int!(usize, isize, i32);

/// One entry per dimension. Built with the `slice!` macro:
///
/// ```
/// use sds_lib::slice;
/// let s = slice![.., 1, 0..=2];
/// assert_eq!(s.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SliceSpec {
    entries: Vec<SliceEntry>,
}

#[macro_export]
macro_rules! slice {
    ($($e:expr),* $(,)?) => {
        $crate::tensor::SliceSpec::new(vec![$($crate::tensor::SliceEntry::from($e)),*])
    };
}

impl SliceSpec {
    pub fn new(entries: Vec<SliceEntry>) -> SliceSpec {
        SliceSpec { entries }
    }

    /// A spec addressing exactly one cell
    pub fn point(coords: &[usize]) -> SliceSpec {
        SliceSpec::new(coords.iter().map(|&c| Index(c as isize)).collect())
    }

    pub fn entries(&self) -> &[SliceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every entry is a single index, i.e. the spec is a full coordinate
    pub fn is_point(&self) -> bool {
        self.entries.iter().all(|e| matches!(e, Index(_)))
    }

    /// The coordinate a point spec addresses. Negative indices yield `None`.
    pub fn point_coords(&self) -> Option<Vec<usize>> {
        self.entries
            .iter()
            .map(|e| match e {
                Index(i) => usize::try_from(*i).ok(),
                _ => None,
            })
            .collect()
    }

    pub fn validate(&self, dims: &[usize]) -> Result<()> {
        if self.entries.len() != dims.len() {
            return Err(TensorError::mismatch(format!(
                "slice {} has {} entries but the array has rank {}",
                self,
                self.entries.len(),
                dims.len()
            )));
        }
        for (e, &d) in self.entries.iter().zip(dims.iter()) {
            let d = d as isize;
            let ok = match *e {
                Full => true,
                Index(i) => 0 <= i && i < d,
                Range(lo, hi) => 0 <= lo && lo <= hi && hi < d,
            };
            if !ok {
                return Err(TensorError::mismatch(format!(
                    "slice entry {} does not fit into a dimension of size {}",
                    e, d
                )));
            }
        }
        Ok(())
    }

    /// Shape of the selected region. Single index entries become size 1
    /// dimensions when `keep_singletons` is set and are dropped otherwise.
    pub fn result_shape(&self, dims: &[usize], keep_singletons: bool) -> Result<Vec<usize>> {
        self.validate(dims)?;
        Ok(self
            .entries
            .iter()
            .zip(dims.iter())
            .filter_map(|(e, &d)| match *e {
                Full => Some(d),
                Range(lo, hi) => Some((hi - lo + 1) as usize),
                Index(_) if keep_singletons => Some(1),
                Index(_) => None,
            })
            .collect())
    }

    /// Concrete inclusive `[lo, hi]` bounds for every dimension
    pub fn normalized(&self, dims: &[usize]) -> Result<Vec<(usize, usize)>> {
        self.validate(dims)?;
        Ok(self
            .entries
            .iter()
            .zip(dims.iter())
            .map(|(e, &d)| match *e {
                Full => (0, d - 1),
                Index(i) => (i as usize, i as usize),
                Range(lo, hi) => (lo as usize, hi as usize),
            })
            .collect())
    }
}

impl Display for SliceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "]")
    }
}

impl From<Vec<SliceEntry>> for SliceSpec {
    fn from(entries: Vec<SliceEntry>) -> Self {
        SliceSpec::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_entries() {
        let s = slice![.., 1, 0..=2, (3, 4), None];
        assert_eq!(s.entries(), &[Full, Index(1), Range(0, 2), Range(3, 4), Full]);
        assert_eq!(format!("{}", s), "[.., 1, 0..=2, 3..=4, ..]");
    }

    #[test]
    fn result_shapes() {
        let dims = [4, 5, 6];
        let s = slice![.., 2, 1..=3];
        assert_eq!(s.result_shape(&dims, false).unwrap(), vec![4, 3]);
        assert_eq!(s.result_shape(&dims, true).unwrap(), vec![4, 1, 3]);
        assert_eq!(s.normalized(&dims).unwrap(), vec![(0, 3), (2, 2), (1, 3)]);
    }

    #[test]
    fn degenerate_ranges_allowed() {
        let s = slice![0, 2..=2];
        assert_eq!(s.result_shape(&[3, 3], true).unwrap(), vec![1, 1]);
    }

    #[test]
    fn rejects_bad_specs() {
        let dims = [3, 3];
        for s in [
            slice![..],
            slice![.., .., ..],
            slice![3, ..],
            slice![-1, ..],
            slice![.., 2..=1],
            slice![.., 0..=3],
            slice![(-1, 1), ..],
        ] {
            assert!(
                matches!(s.validate(&dims), Err(TensorError::ShapeMismatch { .. })),
                "{} should be rejected",
                s
            );
        }
    }

    #[test]
    fn points() {
        assert!(slice![1, 2].is_point());
        assert!(!slice![1, ..].is_point());
        assert_eq!(slice![1, 2].point_coords(), Some(vec![1, 2]));
        assert_eq!(slice![1, -2].point_coords(), None);
        assert_eq!(SliceSpec::point(&[0, 4]), slice![0, 4]);
    }
}
