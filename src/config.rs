//! Environment-driven configuration

use std::time::Duration;

use crate::error::ConfigError;

/// Tunables for the submission pipeline.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Simulated network latency before the duplicate lookup runs.
    pub latency: Duration,
    /// Probability in `[0, 1]` that a non-duplicate submission succeeds.
    pub success_rate: f64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_secs(2),
            success_rate: 0.95,
        }
    }
}

impl IntakeConfig {
    /// Read overrides from `INTAKE_LATENCY_MS` and `INTAKE_SUCCESS_RATE`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("INTAKE_LATENCY_MS") {
            let millis: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                var: "INTAKE_LATENCY_MS".to_string(),
                reason: format!("'{raw}' is not a whole number of milliseconds"),
            })?;
            config.latency = Duration::from_millis(millis);
        }

        if let Ok(raw) = std::env::var("INTAKE_SUCCESS_RATE") {
            let rate: f64 = raw.parse().map_err(|_| ConfigError::Invalid {
                var: "INTAKE_SUCCESS_RATE".to_string(),
                reason: format!("'{raw}' is not a number"),
            })?;
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::Invalid {
                    var: "INTAKE_SUCCESS_RATE".to_string(),
                    reason: format!("{rate} is outside [0, 1]"),
                });
            }
            config.success_rate = rate;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_simulated_backend() {
        let config = IntakeConfig::default();
        assert_eq!(config.latency, Duration::from_secs(2));
        assert!((config.success_rate - 0.95).abs() < f64::EPSILON);
    }
}
