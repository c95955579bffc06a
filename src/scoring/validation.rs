use super::config::WeightConfig;

/// Allowed drift of the weight total from 1.0
pub const TOTAL_TOLERANCE: f64 = 1e-6;

/// Validate a weight configuration before it is saved or used.
/// Returns all validation errors at once (not just the first).
pub fn validate_weights(config: &WeightConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for criterion in config.missing() {
        errors.push(format!("weights.{}: missing", criterion));
    }

    for (criterion, weight, _) in config.entries() {
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            errors.push(format!(
                "weights.{}: must be between 0 and 1, got {}",
                criterion, weight
            ));
        }
    }

    let total = config.total();
    if (total - 1.0).abs() > TOTAL_TOLERANCE {
        errors.push(format!(
            "weights: total must be 100%, got {:.2}%",
            total * 100.0
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
