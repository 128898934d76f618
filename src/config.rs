use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Anything serde can handle is a config, stored as ron text.
pub trait Config: Send + Sync {
    fn config(&self) -> String;
    fn load_config(&mut self, config: &str) -> Result<()>;
}

impl<T: Serialize + DeserializeOwned + Send + Sync> Config for T {
    fn config(&self) -> String {
        ron::to_string(self).unwrap_or_default()
    }
    fn load_config(&mut self, config: &str) -> Result<()> {
        *self = ron::from_str(config).context(format!("Failed to load config {}", config))?;
        tracing::debug!("loaded config {}", config);
        Ok(())
    }
}

/// Controls where the random factories draw from; a fixed seed makes
/// `random_uniform`/`random_normal`/`random_binomial` reproducible.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomConfig {
    pub seed: Option<u64>,
}

impl RandomConfig {
    pub fn seeded(seed: u64) -> Self {
        RandomConfig { seed: Some(seed) }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn config_roundtrip() {
        let c = RandomConfig::seeded(42);
        let text = c.config();
        let mut d = RandomConfig::default();
        d.load_config(&text).unwrap();
        assert_eq!(c, d);
    }

    #[test]
    fn bad_config() {
        let mut d = RandomConfig::default();
        assert!(d.load_config("(seed: \"nope\")").is_err());
        assert_eq!(d, RandomConfig::default());
    }

    #[test]
    fn seeded_rng_repeats() {
        let a: Vec<u32> = RandomConfig::seeded(7).rng().sample_iter(rand::distributions::Standard).take(4).collect();
        let b: Vec<u32> = RandomConfig::seeded(7).rng().sample_iter(rand::distributions::Standard).take(4).collect();
        assert_eq!(a, b);
    }
}
