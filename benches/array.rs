#[macro_use]
extern crate bencher;

use bencher::Bencher;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sds_lib::{slice, Matrix, Tensor};

fn random_tensor(dims: &[usize]) -> Tensor<f64> {
    Tensor::random_uniform_with(&mut StdRng::seed_from_u64(0), dims, -1.0, 1.0).unwrap()
}

fn random_matrix(n: usize) -> Matrix<f64> {
    Matrix::random_normal_with(&mut StdRng::seed_from_u64(1), n, n, 0.0, 1.0).unwrap()
}

fn bench_slice_inner(bench: &mut Bencher) {
    let t = random_tensor(&[16, 32, 32]);
    let spec = slice![.., 4..=27, 8..=23];
    bench.iter(|| t.slice(&spec).unwrap());
}

fn bench_set_slice(bench: &mut Bencher) {
    let mut t = random_tensor(&[16, 32, 32]);
    let spec = slice![2..=13, .., 8];
    let src = t.slice(&spec).unwrap().map(|x| x * 2.0);
    bench.iter(|| t.set_slice(&src, &spec).unwrap());
}

fn bench_transpose(bench: &mut Bencher) {
    let t = random_tensor(&[16, 32, 32]);
    bench.iter(|| t.transpose(Some(&[2, 0, 1])).unwrap());
}

fn bench_sum_axes(bench: &mut Bencher) {
    let t = random_tensor(&[16, 32, 32]);
    bench.iter(|| t.sum_axes([true, false, true], false).unwrap());
}

fn bench_mat_mul(bench: &mut Bencher) {
    let a = random_matrix(64);
    let b = random_matrix(64);
    bench.iter(|| a.mat_mul(&b).unwrap());
}

fn bench_qr(bench: &mut Bencher) {
    let a = random_matrix(16);
    bench.iter(|| a.qr_decomposition().unwrap());
}

benchmark_group!(
    benches,
    bench_slice_inner,
    bench_set_slice,
    bench_transpose,
    bench_sum_axes,
    bench_mat_mul,
    bench_qr
);
benchmark_main!(benches);
