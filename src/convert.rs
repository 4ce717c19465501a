//! Pure conversion functions: TOML config and cache contents -> crate API types.

use anyhow::{Context, Result, bail};

use catdist_calibrate::{CalibrationConfig, TrainingSet};
use catdist_io::ProblemCache;
use catdist_metric::Variant;

use crate::config::CalibrationToml;

/// Parses a metric variant name into the corresponding enum variant.
pub fn parse_variant(s: &str) -> Result<Variant> {
    match s.to_lowercase().replace('-', "_").as_str() {
        "embedding" => Ok(Variant::Embedding),
        "one_hot" | "onehot" | "plain" => Ok(Variant::OneHot),
        other => bail!("unknown metric variant: {other:?}"),
    }
}

/// Builds a validated [`CalibrationConfig`] from the TOML calibration section.
pub fn build_calibration_config(cal: &CalibrationToml, seed: u64) -> Result<CalibrationConfig> {
    let config = CalibrationConfig::new(parse_variant(&cal.variant)?)
        .with_folds(cal.folds)
        .with_p(cal.p)
        .with_seed(seed)
        .with_budget_per_param(cal.budget_per_param)
        .with_lhs_fraction(cal.lhs_fraction)
        .with_fix_quantitative_weights(cal.fix_quantitative_weights);
    config.validate().context("invalid [calibration] settings")?;
    Ok(config)
}

/// Collects the successful evaluations of the cache into a training set.
pub fn training_set(cache: &ProblemCache) -> TrainingSet {
    cache
        .evaluations
        .iter()
        .map(|e| (e.point.clone(), e.objective))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_names() {
        assert_eq!(parse_variant("embedding").unwrap(), Variant::Embedding);
        assert_eq!(parse_variant("One-Hot").unwrap(), Variant::OneHot);
        assert_eq!(parse_variant("plain").unwrap(), Variant::OneHot);
        assert!(parse_variant("kriging").is_err());
    }

    #[test]
    fn defaults_build_valid_config() {
        let config = build_calibration_config(&CalibrationToml::default(), 3).unwrap();
        assert_eq!(config.seed(), 3);
        assert_eq!(config.folds(), 3);
        assert_eq!(config.variant(), Variant::Embedding);
    }

    #[test]
    fn invalid_settings_rejected() {
        let cal = CalibrationToml {
            folds: 1,
            ..CalibrationToml::default()
        };
        assert!(build_calibration_config(&cal, 0).is_err());
    }
}
