//! Runtime environment detection.
//!
//! Determines whether pushbell runs in test, development, or production mode
//! from the `PUSHBELL_ENV` environment variable.
//!
//! Set `PUSHBELL_ENV` to one of:
//! - `test` - Test mode (repo-local config directory)
//! - `development` or `dev` - Development mode (debug logging by default)
//! - (anything else or unset) - Production mode

/// Runtime environment for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment (default).
    Production,
    /// Development environment.
    Development,
    /// Test environment.
    Test,
}

impl Environment {
    /// Detect current environment from `PUSHBELL_ENV`.
    #[must_use]
    pub fn current() -> Self {
        Self::parse(std::env::var("PUSHBELL_ENV").ok().as_deref())
    }

    /// Maps a raw `PUSHBELL_ENV` value to an environment.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("test") => Self::Test,
            Some("development" | "dev") => Self::Development,
            _ => Self::Production,
        }
    }

    /// Returns `true` if this is the test environment.
    #[must_use]
    pub fn is_test(self) -> bool {
        self == Self::Test
    }

    /// Default `env_logger` filter for this environment.
    #[must_use]
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Self::Development | Self::Test => "debug",
            Self::Production => "info",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Convenience function to check if running in test mode.
#[must_use]
pub fn is_test_mode() -> bool {
    Environment::current().is_test()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse(Some("test")), Environment::Test);
        assert_eq!(Environment::parse(Some("dev")), Environment::Development);
        assert_eq!(Environment::parse(Some("development")), Environment::Development);
        assert_eq!(Environment::parse(Some("staging")), Environment::Production);
        assert_eq!(Environment::parse(None), Environment::Production);
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Production.to_string(), "production");
        assert_eq!(Environment::Development.to_string(), "development");
        assert_eq!(Environment::Test.to_string(), "test");
    }

    #[test]
    fn test_default_log_filter() {
        assert_eq!(Environment::Production.default_log_filter(), "info");
        assert_eq!(Environment::Development.default_log_filter(), "debug");
    }
}
