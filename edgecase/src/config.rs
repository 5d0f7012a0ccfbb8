//! Property configuration consumed by test drivers.

use std::fmt;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid number of tries (must be > 0)
    InvalidTries(u32),
    /// Invalid bounded shrinking budget (must be > 0)
    InvalidShrinkingBudget(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTries(tries) => {
                write!(f, "Invalid tries count: {} (must be > 0)", tries)
            }
            ConfigError::InvalidShrinkingBudget(budget) => {
                write!(f, "Invalid shrinking budget: {} (must be > 0)", budget)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// How hard a driver shrinks failing values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrinkingMode {
    /// Report the raw failing value
    Off,
    /// Take at most the given number of descents
    Bounded(usize),
    /// Shrink until no candidate fails
    Full,
}

/// Per-property configuration: tries, seed, and shrinking mode.
///
/// The gen size hint handed to arbitraries defaults to the number of tries;
/// [`PropertyConfig::with_gen_size`] pins it explicitly.
#[derive(Debug, Clone)]
pub struct PropertyConfig {
    /// Number of tries per property
    pub tries: u32,
    /// Seed for the run; `None` means derive one from entropy
    pub seed: Option<u64>,
    /// Shrinking behavior on failure
    pub shrinking: ShrinkingMode,
    gen_size: Option<u32>,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            tries: 1000,
            seed: None,
            shrinking: ShrinkingMode::Full,
            gen_size: None,
        }
    }
}

impl PropertyConfig {
    /// Create a validated configuration
    pub fn new(tries: u32, seed: Option<u64>, shrinking: ShrinkingMode) -> Result<Self, ConfigError> {
        let config = Self {
            tries,
            seed,
            shrinking,
            gen_size: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tries == 0 {
            return Err(ConfigError::InvalidTries(self.tries));
        }
        if let ShrinkingMode::Bounded(0) = self.shrinking {
            return Err(ConfigError::InvalidShrinkingBudget(0));
        }
        Ok(())
    }

    /// Pin the gen size hint independently of the tries count
    pub fn with_gen_size(mut self, gen_size: u32) -> Self {
        self.gen_size = Some(gen_size);
        self
    }

    /// The gen size hint handed to arbitraries
    pub fn gen_size(&self) -> u32 {
        self.gen_size.unwrap_or(self.tries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PropertyConfig::default();
        assert_eq!(config.tries, 1000);
        assert_eq!(config.seed, None);
        assert_eq!(config.shrinking, ShrinkingMode::Full);
        assert_eq!(config.gen_size(), 1000);
    }

    #[test]
    fn test_zero_tries_fails_at_configuration_time() {
        let result = PropertyConfig::new(0, None, ShrinkingMode::Full);
        assert_eq!(result.err(), Some(ConfigError::InvalidTries(0)));
    }

    #[test]
    fn test_zero_shrinking_budget_fails() {
        let result = PropertyConfig::new(100, None, ShrinkingMode::Bounded(0));
        assert_eq!(result.err(), Some(ConfigError::InvalidShrinkingBudget(0)));
    }

    #[test]
    fn test_gen_size_defaults_to_tries_and_can_be_pinned() {
        let config = PropertyConfig::new(500, Some(42), ShrinkingMode::Off).unwrap();
        assert_eq!(config.gen_size(), 500);
        assert_eq!(config.with_gen_size(64).gen_size(), 64);
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            format!("{}", ConfigError::InvalidTries(0)),
            "Invalid tries count: 0 (must be > 0)"
        );
        assert!(
            format!("{}", ConfigError::InvalidShrinkingBudget(0)).contains("shrinking budget")
        );
    }
}
