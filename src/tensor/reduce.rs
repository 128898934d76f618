use super::shape::Shape;
use super::tensor::Tensor;
use super::walker::{collapse_dims, Axes, Coords};
use crate::element::Element;
use crate::error::Result;

impl<T: Element> Tensor<T> {
    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc.wrapping_add(x))
    }

    pub fn min(&self) -> T {
        self.data.iter().fold(T::highest(), |acc, &x| if x < acc { x } else { acc })
    }

    pub fn max(&self) -> T {
        self.data.iter().fold(T::lowest(), |acc, &x| if x > acc { x } else { acc })
    }

    pub fn mean(&self) -> f64 {
        self.data.iter().map(|x| x.as_f64()).sum::<f64>() / self.len() as f64
    }

    /// Sample variance with the `n - 1` divisor, NaN for a single cell
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        let ss: f64 = self.data.iter().map(|x| (x.as_f64() - mean).powi(2)).sum();
        ss / (self.len() as f64 - 1.0)
    }

    pub fn stddev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn sum_axes(&self, axes: impl Into<Axes>, keep_dims: bool) -> Result<Tensor<T>> {
        self.fold_axes(axes.into(), keep_dims, T::zero(), T::wrapping_add)
    }

    pub fn min_axes(&self, axes: impl Into<Axes>, keep_dims: bool) -> Result<Tensor<T>> {
        self.fold_axes(axes.into(), keep_dims, T::highest(), |acc, x| if x < acc { x } else { acc })
    }

    pub fn max_axes(&self, axes: impl Into<Axes>, keep_dims: bool) -> Result<Tensor<T>> {
        self.fold_axes(axes.into(), keep_dims, T::lowest(), |acc, x| if x > acc { x } else { acc })
    }

    pub fn mean_axes(&self, axes: impl Into<Axes>, keep_dims: bool) -> Result<Tensor<f64>> {
        let axes = axes.into();
        let n = self.collapsed_count(&axes)? as f64;
        let mut out = self.fold_axes(axes, keep_dims, 0.0, |acc, x| acc + x.as_f64())?;
        out.apply(|s| s / n);
        Ok(out)
    }

    /// Two passes: the per-group mean first, then the squared deviations
    /// from it, divided by `n - 1`
    pub fn variance_axes(&self, axes: impl Into<Axes>, keep_dims: bool) -> Result<Tensor<f64>> {
        let mask = axes.into().to_mask(self.rank())?;
        let n = self.collapsed_count(&Axes::Mask(mask.clone()))? as f64;
        let means = self.mean_axes(Axes::Mask(mask.clone()), true)?;

        let mut ss = vec![0.0; means.len()];
        for (coords, &x) in Coords::new(self.shape()).zip(self.data.iter()) {
            let o = means.shape.offset_unchecked(&collapse_dims(&coords, &mask, false));
            ss[o] += (x.as_f64() - means.data[o]).powi(2);
        }
        ss.iter_mut().for_each(|s| *s /= n - 1.0);

        let out = means.with_data(ss);
        Ok(if keep_dims { out } else { drop_collapsed(out, &mask) })
    }

    pub fn stddev_axes(&self, axes: impl Into<Axes>, keep_dims: bool) -> Result<Tensor<f64>> {
        let mut out = self.variance_axes(axes, keep_dims)?;
        out.apply(f64::sqrt);
        Ok(out)
    }

    fn collapsed_count(&self, axes: &Axes) -> Result<usize> {
        let mask = axes.to_mask(self.rank())?;
        Ok(self.shape().iter().zip(mask.iter()).filter(|(_, &c)| c).map(|(&d, _)| d).product())
    }

    /// Walks every coordinate, folding each cell into the slot its collapsed
    /// coordinate lands on
    fn fold_axes<U: Element, F: Fn(U, T) -> U>(&self, axes: Axes, keep_dims: bool, seed: U, f: F) -> Result<Tensor<U>> {
        let mask = axes.to_mask(self.rank())?;
        let shape = Shape::unchecked(&collapse_dims(self.shape(), &mask, true));
        let mut data = vec![seed; shape.numel()];
        for (coords, &x) in Coords::new(self.shape()).zip(self.data.iter()) {
            let o = shape.offset_unchecked(&collapse_dims(&coords, &mask, false));
            data[o] = f(data[o], x);
        }
        let out = Tensor { shape, data };
        Ok(if keep_dims { out } else { drop_collapsed(out, &mask) })
    }
}

fn drop_collapsed<U>(mut t: Tensor<U>, mask: &[bool]) -> Tensor<U> {
    let dims: Vec<usize> = t.shape.dims().iter().zip(mask.iter()).filter(|(_, &c)| !c).map(|(&d, _)| d).collect();
    t.shape = Shape::unchecked(&dims);
    t
}
