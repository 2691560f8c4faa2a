//! Data-driven physics tuning
//!
//! Every randomized perturbation is bounded by these values, which is what keeps
//! ball speed from drifting without limit over many collisions.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected tuning values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("ball_speed must be positive, got {0}")]
    NonPositiveSpeed(f32),

    #[error("corner factor range [{min}, {max}] must be positive and ordered")]
    CornerRange { min: f32, max: f32 },

    #[error("angle_jitter must be in [0, π), got {0}")]
    JitterOutOfRange(f32),

    #[error("incident_guard must be in [0, π], got {0}")]
    GuardOutOfRange(f32),
}

/// Physics constants consumed by the collision resolvers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Speed every ball is reset to after a ball-ball collision
    pub ball_speed: f32,
    /// Lower bound of the corner-hit speed factor
    pub corner_factor_min: f32,
    /// Upper bound of the corner-hit speed factor
    pub corner_factor_max: f32,
    /// Perturbation angle is drawn uniformly from [-angle_jitter, angle_jitter]
    pub angle_jitter: f32,
    /// Minimum separation between a perturbed boundary reflection and the incident heading
    pub incident_guard: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            ball_speed: BALL_SPEED,
            corner_factor_min: CORNER_FACTOR_MIN,
            corner_factor_max: CORNER_FACTOR_MAX,
            angle_jitter: ANGLE_JITTER,
            incident_guard: INCIDENT_GUARD,
        }
    }
}

impl PhysicsTuning {
    /// Tuning with all randomness disabled (exact reflections, no speed change)
    pub fn exact() -> Self {
        Self {
            corner_factor_min: 1.0,
            corner_factor_max: 1.0,
            angle_jitter: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("ball_speed", self.ball_speed),
            ("corner_factor_min", self.corner_factor_min),
            ("corner_factor_max", self.corner_factor_max),
            ("angle_jitter", self.angle_jitter),
            ("incident_guard", self.incident_guard),
        ] {
            if !value.is_finite() {
                return Err(TuningError::NonFinite { field, value });
            }
        }

        if self.ball_speed <= 0.0 {
            return Err(TuningError::NonPositiveSpeed(self.ball_speed));
        }
        if self.corner_factor_min <= 0.0 || self.corner_factor_min > self.corner_factor_max {
            return Err(TuningError::CornerRange {
                min: self.corner_factor_min,
                max: self.corner_factor_max,
            });
        }
        if !(0.0..PI).contains(&self.angle_jitter) {
            return Err(TuningError::JitterOutOfRange(self.angle_jitter));
        }
        if !(0.0..=PI).contains(&self.incident_guard) {
            return Err(TuningError::GuardOutOfRange(self.incident_guard));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(PhysicsTuning::default().validate(), Ok(()));
        assert_eq!(PhysicsTuning::exact().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_values() {
        let t = PhysicsTuning {
            ball_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(TuningError::NonPositiveSpeed(_))));

        let t = PhysicsTuning {
            corner_factor_min: 1.5,
            corner_factor_max: 1.2,
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(TuningError::CornerRange { .. })));

        let t = PhysicsTuning {
            angle_jitter: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(TuningError::NonFinite {
                field: "angle_jitter",
                ..
            })
        ));

        let t = PhysicsTuning {
            angle_jitter: 4.0,
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(TuningError::JitterOutOfRange(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let t: PhysicsTuning = serde_json::from_str(r#"{ "ball_speed": 6.0 }"#).unwrap();
        assert_eq!(t.ball_speed, 6.0);
        assert_eq!(t.corner_factor_max, CORNER_FACTOR_MAX);
    }
}
