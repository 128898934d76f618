use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use sds_lib::{slice, Config, Matrix, RandomConfig, Tensor};

/// Settings for the demo run, read from a ron file:
///
/// ```text
/// (height: 5, width: 3, random: (seed: Some(7)), tolerance: 1e-8)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DemoConfig {
    height: usize,
    width: usize,
    random: RandomConfig,
    tolerance: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig { height: 4, width: 3, random: RandomConfig::seeded(0), tolerance: 1e-8 }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut config = DemoConfig::default();
    if let Some(path) = std::env::args().nth(1) {
        let text = std::fs::read_to_string(&path).context(format!("Failed to read config file {}", path))?;
        config.load_config(&text)?;
    }
    info!("running with {}", config.config());

    let mut rng = config.random.rng();
    let a = Matrix::<f64>::random_normal_with(&mut rng, config.height, config.width, 0.0, 1.0)?;
    println!("A =\n{}", a);

    let (q, r) = a.qr_decomposition()?;
    println!("Q =\n{}", q);
    println!("R =\n{}", r);

    let back = q.mat_mul(&r)?;
    ensure!(back.equals_within(&a, config.tolerance), "Q R does not reproduce A within {}", config.tolerance);
    info!("Q R reproduces A within {}", config.tolerance);

    let t: Tensor<f64> = a.into();
    let cols = t.mean_axes(0usize, false)?;
    println!("column means = {}", cols);
    println!("first column = {}", t.slice(&slice![.., 0])?);
    Ok(())
}
