//! Moves cells between a flat store and the region a `SliceSpec` selects.
//!
//! A slice of a row-major array is a sequence of contiguous runs of the flat
//! store. The runs are produced outer dimension first, so concatenating them
//! in order gives the slice's cells in row-major order; extraction and
//! assignment both rely on walking them in exactly that order.

use super::shape::Shape;
use super::slice::SliceSpec;
use crate::error::{Result, TensorError};

/// Inclusive `[start, end]` run of flat offsets
pub type Run = (usize, usize);

/// Splits the whole-array run dimension by dimension, keeping only the
/// sub-runs inside each dimension's normalized range.
pub fn runs(shape: &Shape, spec: &SliceSpec) -> Result<Vec<Run>> {
    let bounds = spec.normalized(shape.dims())?;
    let mut runs: Vec<Run> = vec![(0, shape.numel() - 1)];

    for (&(lo, hi), &stride) in bounds.iter().zip(shape.strides().iter()) {
        let mut next = Vec::with_capacity(runs.len() * (hi - lo + 1));
        for &(start, _) in runs.iter() {
            for j in lo..=hi {
                next.push((start + stride * j, start + stride * (j + 1) - 1));
            }
        }
        runs = next;
    }
    Ok(merge_adjacent(runs))
}

/// Joins runs that touch, `[0, 3]` followed by `[4, 7]` becomes `[0, 7]`
fn merge_adjacent(runs: Vec<Run>) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for (start, end) in runs {
        match merged.last_mut() {
            Some(last) if last.1 + 1 == start => last.1 = end,
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Number of cells covered by `runs`
pub fn run_len(runs: &[Run]) -> usize {
    runs.iter().map(|(s, e)| e - s + 1).sum()
}

/// Copies the selected region into a new flat store, returning it along
/// with the region's shape.
pub fn extract<T: Copy>(shape: &Shape, data: &[T], spec: &SliceSpec, keep_singletons: bool) -> Result<(Vec<usize>, Vec<T>)> {
    let out_dims = spec.result_shape(shape.dims(), keep_singletons)?;
    let runs = runs(shape, spec)?;
    let mut out = Vec::with_capacity(run_len(&runs));
    for &(start, end) in runs.iter() {
        out.extend_from_slice(&data[start..=end]);
    }
    Ok((out_dims, out))
}

/// Writes `src` into the selected region. `src_dims` must equal the region's
/// shape with its singleton dimensions kept.
pub fn scatter<T: Copy>(shape: &Shape, data: &mut [T], spec: &SliceSpec, src_dims: &[usize], src: &[T]) -> Result<()> {
    let target = spec.result_shape(shape.dims(), true)?;
    if target != src_dims {
        return Err(TensorError::mismatch(format!(
            "cannot assign an array of shape {:?} to the slice {} of shape {:?}",
            src_dims, spec, target
        )));
    }
    let runs = runs(shape, spec)?;
    write_runs(data, &runs, src);
    Ok(())
}

/// Writes an unshaped sequence into the selected region, only the cell count
/// has to agree.
pub fn scatter_flat<T: Copy>(shape: &Shape, data: &mut [T], spec: &SliceSpec, values: &[T]) -> Result<()> {
    let runs = runs(shape, spec)?;
    let n = run_len(&runs);
    if n != values.len() {
        return Err(TensorError::mismatch(format!(
            "the slice {} holds {} cells but {} values were given",
            spec,
            n,
            values.len()
        )));
    }
    write_runs(data, &runs, values);
    Ok(())
}

fn write_runs<T: Copy>(data: &mut [T], runs: &[Run], src: &[T]) {
    let mut idx = 0;
    for &(start, end) in runs {
        let n = end - start + 1;
        data[start..=end].copy_from_slice(&src[idx..idx + n]);
        idx += n;
    }
}
