//! Container configuration.
//!
//! Configuration can be built in code, read from environment variables or,
//! with the `config` feature, parsed from JSON.

use std::env;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::{DiError, DiResult};

/// Default environment variable prefix used by [`ContainerConfig::from_env`].
pub const ENV_PREFIX: &str = "FERROUS_CONTAINER";

/// Default maximum resolution depth.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// What happens when a capability is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum DuplicatePolicy {
    /// The last registration wins.
    #[default]
    Replace,
    /// The second registration fails with `DiError::DuplicateRegistration`.
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = DiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(DuplicatePolicy::Replace),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(DiError::InvalidConfiguration(format!(
                "unknown duplicate policy '{}', expected 'replace' or 'reject'",
                other
            ))),
        }
    }
}

/// Settings that shape how a `ServiceCollection` registers and how the
/// resulting provider resolves.
///
/// # Examples
///
/// ```
/// use ferrous_container::{ContainerConfig, DuplicatePolicy, ServiceCollection};
///
/// let config = ContainerConfig::default().with_duplicate_policy(DuplicatePolicy::Reject);
/// let mut services = ServiceCollection::with_config(config);
/// services.add_singleton(1u8);
/// services.add_singleton(2u8);
/// assert!(services.try_build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    pub duplicate_policy: DuplicatePolicy,
    pub max_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ContainerConfig {
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reads `FERROUS_CONTAINER_DUPLICATE_POLICY` and `FERROUS_CONTAINER_MAX_DEPTH`.
    ///
    /// Unset variables keep their defaults; malformed values are errors.
    pub fn from_env() -> DiResult<Self> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Like [`from_env`](Self::from_env) with a custom variable prefix.
    pub fn from_env_with_prefix(prefix: &str) -> DiResult<Self> {
        let prefix = prefix.to_uppercase();
        let mut config = Self::default();

        if let Some(value) = read_var(&prefix, "DUPLICATE_POLICY") {
            config.duplicate_policy = value.parse()?;
        }
        if let Some(value) = read_var(&prefix, "MAX_DEPTH") {
            config.max_depth = value.trim().parse().map_err(|_| {
                DiError::InvalidConfiguration(format!("{}_MAX_DEPTH must be a positive integer, got '{}'", prefix, value))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DiError::InvalidConfiguration(format!("invalid JSON configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DiResult<()> {
        if self.max_depth == 0 {
            return Err(DiError::InvalidConfiguration("max_depth must be greater than 0".to_string()));
        }
        Ok(())
    }
}

fn read_var(prefix: &str, name: &str) -> Option<String> {
    env::var(format!("{}_{}", prefix, name)).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_policy_parses_case_insensitively() {
        assert_eq!("Reject".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Reject);
        assert_eq!(" replace ".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Replace);
        assert!(matches!(
            "overwrite".parse::<DuplicatePolicy>(),
            Err(DiError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_depth_is_invalid() {
        let config = ContainerConfig::default().with_max_depth(0);
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_missing_fields_use_defaults() {
        let config = ContainerConfig::from_json_str(r#"{ "duplicate_policy": "reject" }"#).unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_rejects_unknown_policy() {
        assert!(ContainerConfig::from_json_str(r#"{ "duplicate_policy": "sometimes" }"#).is_err());
    }
}
