use std::f64::consts::PI;

use rand::distributions::uniform::SampleUniform;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_distr::Binomial;

use super::shape::Shape;
use super::tensor::Tensor;
use crate::element::{Element, FloatElement, IntElement};
use crate::error::{Result, TensorError};

impl<T: Element + SampleUniform> Tensor<T> {
    /// Cells drawn uniformly from `[low, high]`
    pub fn random_uniform(dims: &[usize], low: T, high: T) -> Result<Tensor<T>> {
        Tensor::random_uniform_with(&mut rand::thread_rng(), dims, low, high)
    }

    pub fn random_uniform_with<R: Rng + ?Sized>(rng: &mut R, dims: &[usize], low: T, high: T) -> Result<Tensor<T>> {
        let shape = Shape::new(dims)?;
        let dist = uniform(low, high)?;
        let data = (0..shape.numel()).map(|_| dist.sample(rng)).collect();
        Ok(Tensor { shape, data })
    }
}

pub(crate) fn uniform<T: Element + SampleUniform>(low: T, high: T) -> Result<Uniform<T>> {
    // also rejects NaN bounds
    if !(low <= high) || !low.as_f64().is_finite() || !high.as_f64().is_finite() {
        return Err(TensorError::InvalidArgument(format!("cannot sample uniformly from [{}, {}]", low, high)));
    }
    Ok(Uniform::new_inclusive(low, high))
}

impl<T: FloatElement> Tensor<T> {
    /// Normally distributed cells, `N(mu, sigma^2)`
    pub fn random_normal(dims: &[usize], mu: T, sigma: T) -> Result<Tensor<T>> {
        Tensor::random_normal_with(&mut rand::thread_rng(), dims, mu, sigma)
    }

    pub fn random_normal_with<R: Rng + ?Sized>(rng: &mut R, dims: &[usize], mu: T, sigma: T) -> Result<Tensor<T>> {
        let shape = Shape::new(dims)?;
        let data = box_muller(rng, shape.numel(), mu.as_f64(), sigma.as_f64())?
            .into_iter()
            .map(T::from_f64)
            .collect();
        Ok(Tensor { shape, data })
    }
}

/// Box-Muller transform. Every pair of uniform draws yields two independent
/// variates, the second one of the last pair is dropped when `n` is odd.
pub(crate) fn box_muller<R: Rng + ?Sized>(rng: &mut R, n: usize, mu: f64, sigma: f64) -> Result<Vec<f64>> {
    if !mu.is_finite() || !sigma.is_finite() || sigma < 0.0 {
        return Err(TensorError::InvalidArgument(format!("invalid normal distribution N({}, {}^2)", mu, sigma)));
    }
    let mut out = Vec::with_capacity(n + 1);
    while out.len() < n {
        // u1 in (0, 1] keeps the logarithm finite
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = rng.gen();
        let r = (-2.0 * u1.ln()).sqrt();
        out.push(mu + sigma * r * (2.0 * PI * u2).cos());
        out.push(mu + sigma * r * (2.0 * PI * u2).sin());
    }
    out.truncate(n);
    Ok(out)
}

impl<T: IntElement> Tensor<T> {
    /// Number of successes out of `trials` draws, each succeeding with `probability`
    pub fn random_binomial(dims: &[usize], trials: u64, probability: f64) -> Result<Tensor<T>> {
        Tensor::random_binomial_with(&mut rand::thread_rng(), dims, trials, probability)
    }

    pub fn random_binomial_with<R: Rng + ?Sized>(
        rng: &mut R,
        dims: &[usize],
        trials: u64,
        probability: f64,
    ) -> Result<Tensor<T>> {
        let shape = Shape::new(dims)?;
        let dist = binomial::<T>(trials, probability)?;
        let data = (0..shape.numel()).map(|_| cast_count(dist.sample(rng))).collect::<Option<Vec<T>>>();
        let data = data.ok_or_else(|| TensorError::InvalidArgument(format!("{} trials overflow {}", trials, T::NAME)))?;
        Ok(Tensor { shape, data })
    }
}

fn binomial<T: IntElement>(trials: u64, probability: f64) -> Result<Binomial> {
    if cast_count::<T>(trials).is_none() {
        return Err(TensorError::InvalidArgument(format!("{} trials overflow {}", trials, T::NAME)));
    }
    Binomial::new(trials, probability)
        .map_err(|e| TensorError::InvalidArgument(format!("binomial({}, {}): {}", trials, probability, e)))
}

fn cast_count<T: IntElement>(k: u64) -> Option<T> {
    <T as num::NumCast>::from(k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn uniform_bounds() {
        let t = Tensor::random_uniform(&[3, 3], -2i64, 5).unwrap();
        assert!(t.iter().all(|&x| (-2..=5).contains(&x)));
        let f = Tensor::random_uniform(&[50], 0.5f64, 1.5).unwrap();
        assert!(f.iter().all(|&x| (0.5..=1.5).contains(&x)));
        assert!(matches!(Tensor::random_uniform(&[2], 1.0f64, 0.0), Err(TensorError::InvalidArgument(_))));
        assert!(matches!(Tensor::random_uniform(&[2], f64::NAN, 1.0), Err(TensorError::InvalidArgument(_))));
        assert!(matches!(Tensor::random_uniform(&[0], 0i64, 1), Err(TensorError::InvalidShape { .. })));
    }

    #[test]
    fn seeded_is_reproducible() {
        let a = Tensor::random_uniform_with(&mut StdRng::seed_from_u64(7), &[4, 4], 0.0f64, 1.0).unwrap();
        let b = Tensor::random_uniform_with(&mut StdRng::seed_from_u64(7), &[4, 4], 0.0f64, 1.0).unwrap();
        assert_eq!(a, b);
        let c = Tensor::random_uniform_with(&mut StdRng::seed_from_u64(8), &[4, 4], 0.0f64, 1.0).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn normal_moments() {
        let mut rng = StdRng::seed_from_u64(42);
        let t = Tensor::random_normal_with(&mut rng, &[101, 99], 3.0f64, 2.0).unwrap();
        assert_eq!(t.len(), 101 * 99);
        assert!((t.mean() - 3.0).abs() < 0.1);
        assert!((t.variance() - 4.0).abs() < 0.3);
        assert!(t.iter().all(|x| x.is_finite()));

        let odd = Tensor::<f32>::random_normal_with(&mut rng, &[3], 0.0, 1.0).unwrap();
        assert_eq!(odd.len(), 3);
        assert!(Tensor::random_normal(&[2], 0.0f64, -1.0).is_err());
    }

    #[test]
    fn binomial_bounds() {
        let t = Tensor::<i64>::random_binomial(&[3, 3], 100, 0.5).unwrap();
        assert!(t.iter().all(|&x| (0..=100).contains(&x)));
        let none = Tensor::<i32>::random_binomial(&[4], 10, 0.0).unwrap();
        assert_eq!(none.sum(), 0);
        assert!(matches!(Tensor::<i32>::random_binomial(&[4], 10, 1.5), Err(TensorError::InvalidArgument(_))));
        assert!(matches!(Tensor::<i32>::random_binomial(&[4], u64::MAX, 0.5), Err(TensorError::InvalidArgument(_))));
    }

    #[test]
    fn binomial_randomness() {
        let a = Tensor::<i64>::random_binomial(&[3, 3], 1000, 0.5).unwrap();
        let b = Tensor::<i64>::random_binomial(&[3, 3], 1000, 0.5).unwrap();
        assert_ne!(a, b);
    }
}
