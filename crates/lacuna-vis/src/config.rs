//! Shell configuration.

use std::net::SocketAddr;

use crate::error::{Error, Result};
use crate::timeline::DEFAULT_SEED;

/// Configuration for the `lacuna-vis` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    /// Seed array (may be empty here; the shell substitutes a default)
    pub seed: Vec<i64>,

    /// HTTP listen address
    pub addr: SocketAddr,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_vec(),
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl VisConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// - `LACUNA_SEED`: comma-separated integers, e.g. `4,3,2,7,8,2,3,1`
    /// - `LACUNA_ADDR`: listen address, default `0.0.0.0:3000`
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("LACUNA_SEED").ok().as_deref(),
            std::env::var("LACUNA_ADDR").ok().as_deref(),
        )
    }

    fn from_vars(seed: Option<&str>, addr: Option<&str>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = seed {
            config.seed = parse_seed(raw)?;
        }
        if let Some(raw) = addr {
            config.addr = raw
                .parse()
                .map_err(|e| Error::Config(format!("invalid LACUNA_ADDR {:?}: {}", raw, e)))?;
        }
        Ok(config)
    }
}

/// Parse a comma-separated integer list. Blank input yields an empty list.
pub fn parse_seed(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|e| Error::Config(format!("invalid seed value {:?}: {}", part, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_vars() {
        let config = VisConfig::from_vars(None, None).unwrap();
        assert_eq!(config, VisConfig::default());
        assert_eq!(config.seed, vec![4, 3, 2, 7, 8, 2, 3, 1]);
    }

    #[test]
    fn parses_seed_and_addr() {
        let config = VisConfig::from_vars(Some(" 1, 1 ,3"), Some("127.0.0.1:9000")).unwrap();
        assert_eq!(config.seed, vec![1, 1, 3]);
        assert_eq!(config.addr.port(), 9000);
    }

    #[test]
    fn blank_seed_is_empty() {
        assert_eq!(parse_seed("  ").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn bad_values_are_config_errors() {
        assert!(matches!(parse_seed("1,x"), Err(Error::Config(_))));
        assert!(matches!(
            VisConfig::from_vars(None, Some("nowhere")),
            Err(Error::Config(_))
        ));
    }
}
