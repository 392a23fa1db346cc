//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::EngineConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_timing::load_config;
///
/// let config = load_config("engine.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let config: EngineConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use crate::motion::EaseShape;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_parse_plan_config() {
        let toml = r#"
mode = "plan"
steps_per_revolution = 200

[plan]
rotations = 6
shape = "symmetric_quadratic"
reverse_on_complete = false
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.mode, Mode::Plan);
        assert_eq!(config.plan.rotations, 6);
        assert_eq!(config.plan.shape, EaseShape::SymmetricQuadratic);
        assert!(!config.plan.reverse_on_complete);
    }

    #[test]
    fn test_parse_rejects_invalid_range() {
        let toml = r#"
min_rate_rps = 4
max_rate_rps = 2
"#;

        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::InvalidRateRange { min: 4, max: 2 }))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_config("/nonexistent/engine.toml"),
            Err(Error::Config(ConfigError::IoError(_)))
        ));
    }
}
