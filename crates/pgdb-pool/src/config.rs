//! Pool configuration.

/// Default number of pooled sessions.
pub const DEFAULT_CAPACITY: usize = 16;

/// Configuration for the session pool.
///
/// This struct is marked `#[non_exhaustive]` to allow adding new fields
/// in future minor versions without breaking changes. Use the builder
/// pattern methods or [`Default::default()`] to construct instances.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct PoolConfig {
    /// Number of sessions the pool opens at construction. The pool never
    /// resizes afterwards.
    pub capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl PoolConfig {
    /// Create a new pool configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of pooled sessions.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::error::PoolError> {
        if self.capacity == 0 {
            return Err(crate::error::PoolError::Configuration(
                "capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_config_builder() {
        let config = PoolConfig::new().capacity(4);
        assert_eq!(config.capacity, 4);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(PoolConfig::new().capacity(1).validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_capacity() {
        let result = PoolConfig::new().capacity(0).validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("capacity must be greater than 0")
        );
    }
}
