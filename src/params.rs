use std::{fs, path::Path};

use serde::Deserialize;

use crate::{Error, Result};

/// Search parameters, fixed for the lifetime of a run.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Base attractiveness.
    pub beta0: f64,
    /// Decay of attractiveness with the cost gap between two tours.
    pub gamma: f64,
    pub population_size: usize,
    pub generation_count: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            beta0: 1.0,
            gamma: 0.1,
            population_size: 10,
            generation_count: 1000,
        }
    }
}

impl Params {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// A `beta0` of zero is accepted and disables every move.
    pub fn validate(&self) -> Result<()> {
        if !self.beta0.is_finite() || self.beta0 < 0.0 {
            return Err(Error::invalid_params(format!(
                "beta0 must be finite and non-negative, got {}",
                self.beta0
            )));
        }
        if !self.gamma.is_finite() || self.gamma < 0.0 {
            return Err(Error::invalid_params(format!(
                "gamma must be finite and non-negative, got {}",
                self.gamma
            )));
        }
        if self.population_size < 2 {
            return Err(Error::invalid_params(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let p = Params::from_json_str(r#"{"beta0": 5.0, "population_size": 50}"#).unwrap();
        assert_eq!(p.beta0, 5.0);
        assert_eq!(p.population_size, 50);
        assert_eq!(p.gamma, 0.1);
        assert_eq!(p.generation_count, 1000);
    }

    #[test]
    fn test_validate_rejects() {
        let bad = [
            Params { beta0: -1.0, ..Params::default() },
            Params { beta0: f64::NAN, ..Params::default() },
            Params { gamma: -0.5, ..Params::default() },
            Params { gamma: f64::INFINITY, ..Params::default() },
            Params { population_size: 1, ..Params::default() },
        ];
        for p in bad {
            assert!(matches!(p.validate(), Err(Error::InvalidParams(_))), "{p:?}");
        }
        let zero = Params { beta0: 0.0, generation_count: 0, ..Params::default() };
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            Params::from_json_str(r#"{"population_size": 0}"#),
            Err(Error::InvalidParams(_))
        ));
        assert!(matches!(Params::from_json_str("{"), Err(Error::Json(_))));
    }
}
