//! Common types used throughout the tree engine.

mod node_id;

pub use node_id::NodeId;

use crate::error::{BTreeError, Result};
use serde::{Deserialize, Serialize};

/// Smallest usable minimum degree: a split must leave at least one key on
/// each side
pub const MIN_DEGREE: usize = 2;

/// Largest minimum degree whose node capacity `2t - 1` fits in a `usize`
pub const MAX_DEGREE: usize = usize::MAX / 2;

/// Default minimum degree (nodes of 2..=5 keys, small enough to read when printed)
pub const DEFAULT_DEGREE: usize = 3;

/// BTree configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BTreeConfig {
    /// Minimum degree `t`; fixed for the lifetime of a tree
    pub degree: usize,
}

impl Default for BTreeConfig {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
        }
    }
}

impl BTreeConfig {
    /// Create a config with the given minimum degree
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }

    /// Check that the degree can hold a B-tree
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DEGREE..=MAX_DEGREE).contains(&self.degree) {
            return Err(BTreeError::InvalidDegree {
                degree: self.degree,
                min: MIN_DEGREE,
                max: MAX_DEGREE,
            });
        }
        Ok(())
    }

    /// Maximum keys per node (2t - 1); the degree must have passed `validate`
    pub fn max_keys(&self) -> usize {
        2 * self.degree - 1
    }

    /// Minimum keys per non-root node (t - 1)
    pub fn min_keys(&self) -> usize {
        self.degree - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_limits() {
        let config = BTreeConfig::new(3);
        assert!(config.validate().is_ok());
        assert_eq!(config.max_keys(), 5);
        assert_eq!(config.min_keys(), 2);

        assert_eq!(BTreeConfig::default().degree, DEFAULT_DEGREE);
    }

    #[test]
    fn test_config_rejects_small_degree() {
        for degree in 0..MIN_DEGREE {
            match BTreeConfig::new(degree).validate() {
                Err(BTreeError::InvalidDegree { degree: d, min, .. }) => {
                    assert_eq!(d, degree);
                    assert_eq!(min, MIN_DEGREE);
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn test_config_rejects_huge_degree() {
        for degree in [MAX_DEGREE + 1, usize::MAX] {
            match BTreeConfig::new(degree).validate() {
                Err(BTreeError::InvalidDegree { degree: d, max, .. }) => {
                    assert_eq!(d, degree);
                    assert_eq!(max, MAX_DEGREE);
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }

        let config = BTreeConfig::new(MAX_DEGREE);
        assert!(config.validate().is_ok());
        assert_eq!(config.max_keys(), usize::MAX - 2);
    }

    #[test]
    fn test_config_serde() {
        let json = serde_json::to_string(&BTreeConfig::new(4)).unwrap();
        assert_eq!(json, r#"{"degree":4}"#);
        let back: BTreeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BTreeConfig::new(4));
    }
}
