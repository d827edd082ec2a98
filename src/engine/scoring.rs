use serde::{Deserialize, Serialize};

pub const DEFAULT_WEIGHT_COEFFICIENT: f64 = 0.6;
pub const DEFAULT_URGENCY_COEFFICIENT: f64 = 0.4;

const COEFFICIENT_SUM_TOLERANCE: f64 = 1e-9;

/// Per-criterion inputs to the SAW sum, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub weight: f64,
    pub urgency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SawCoefficients {
    pub weight: f64,
    pub urgency: f64,
}

impl Default for SawCoefficients {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT_COEFFICIENT,
            urgency: DEFAULT_URGENCY_COEFFICIENT,
        }
    }
}

impl SawCoefficients {
    /// Coefficients must be non-negative and sum to one so that scores stay
    /// within [0, 1].
    pub fn validate(&self) -> Result<(), String> {
        if !self.weight.is_finite() || !self.urgency.is_finite() {
            return Err("coefficients must be finite".to_string());
        }
        if self.weight < 0.0 || self.urgency < 0.0 {
            return Err("coefficients must be >= 0".to_string());
        }

        let sum = self.weight + self.urgency;
        if (sum - 1.0).abs() > COEFFICIENT_SUM_TOLERANCE {
            return Err(format!("coefficients must sum to 1, got {sum}"));
        }

        Ok(())
    }
}

pub fn weighted_score(breakdown: &ScoreBreakdown, coefficients: &SawCoefficients) -> f64 {
    (breakdown.weight * coefficients.weight) + (breakdown.urgency * coefficients.urgency)
}
