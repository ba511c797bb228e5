//! Mining thresholds and limits

use std::time::Duration;

use crate::error::MiningError;

/// Default minimum support for frequent itemsets
pub const DEFAULT_MIN_SUPPORT: f64 = 0.05;

/// Default minimum confidence for association rules
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.10;

/// Thresholds controlling a mining run
#[derive(Debug, Clone, PartialEq)]
pub struct MiningConfig {
    /// Minimum fraction of transactions an itemset must appear in, in (0, 1]
    pub min_support: f64,
    /// Minimum rule confidence, in [0, 1]
    pub min_confidence: f64,
    /// Largest itemset size to search for
    pub max_len: Option<usize>,
    /// Wall-clock budget for the level-wise search
    pub time_budget: Option<Duration>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_len: None,
            time_budget: None,
        }
    }
}

impl MiningConfig {
    /// Create a config with the given thresholds and no size or time limit
    pub fn new(min_support: f64, min_confidence: f64) -> Self {
        Self {
            min_support,
            min_confidence,
            ..Self::default()
        }
    }

    /// Check every field, returning the first violation
    pub fn validate(&self) -> Result<(), MiningError> {
        validate_min_support(self.min_support)?;
        validate_min_confidence(self.min_confidence)?;
        if self.max_len == Some(0) {
            return Err(MiningError::InvalidConfig(
                "max_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_min_support(min_support: f64) -> Result<(), MiningError> {
    if !min_support.is_finite() || min_support <= 0.0 || min_support > 1.0 {
        return Err(MiningError::InvalidConfig(format!(
            "min_support must be within (0, 1], got {}",
            min_support
        )));
    }
    Ok(())
}

pub(crate) fn validate_min_confidence(min_confidence: f64) -> Result<(), MiningError> {
    if !min_confidence.is_finite() || !(0.0..=1.0).contains(&min_confidence) {
        return Err(MiningError::InvalidConfig(format!(
            "min_confidence must be within [0, 1], got {}",
            min_confidence
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MiningConfig::default();
        assert_eq!(config.min_support, 0.05);
        assert_eq!(config.min_confidence, 0.10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_boundaries_are_accepted() {
        assert!(MiningConfig::new(1.0, 0.0).validate().is_ok());
        assert!(MiningConfig::new(1e-6, 1.0).validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        for (support, confidence) in [
            (0.0, 0.5),
            (-0.1, 0.5),
            (1.5, 0.5),
            (f64::NAN, 0.5),
            (0.5, -0.01),
            (0.5, 1.01),
            (0.5, f64::INFINITY),
        ] {
            let result = MiningConfig::new(support, confidence).validate();
            assert!(
                matches!(result, Err(MiningError::InvalidConfig(_))),
                "expected rejection for support={} confidence={}",
                support,
                confidence
            );
        }
    }

    #[test]
    fn test_zero_max_len_is_rejected() {
        let config = MiningConfig {
            max_len: Some(0),
            ..MiningConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
