//! Scoring configuration.
//!
//! A flat set of numeric tunables passed explicitly into the scorer. Fields
//! omitted from a definition file take the values from [`ScoringConfig::default`].

use serde::{Deserialize, Serialize};

/// Tunables controlling point values, weights, distance falloff, and
/// separation curvature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Points for an exact match on a primary rule.
    pub primary_point_value: f64,
    /// Points for an exact match on a secondary rule.
    pub secondary_point_value: f64,
    /// Multiplier applied on top of the primary point value.
    pub primary_point_weight: f64,
    /// Multiplier applied on top of the secondary point value.
    pub secondary_point_weight: f64,
    /// Fraction of remaining points lost per unit of distance (primary).
    pub primary_distance_falloff: f64,
    /// Fraction of remaining points lost per unit of distance (secondary).
    pub secondary_distance_falloff: f64,
    /// Floor for a primary rule's contribution. May be negative.
    pub primary_min_points: f64,
    /// Floor for a secondary rule's contribution. May be negative.
    pub secondary_min_points: f64,
    /// Separation exponent used during normalization.
    pub beta: f64,
    /// Exponent applied to distance before falloff (1 = linear).
    pub distance_gamma: f64,
    /// Global multiplier on every contribution.
    pub score_multiplier: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            primary_point_value: 10.0,
            secondary_point_value: 5.0,
            primary_point_weight: 1.0,
            secondary_point_weight: 1.0,
            primary_distance_falloff: 0.1,
            secondary_distance_falloff: 0.2,
            primary_min_points: 0.0,
            secondary_min_points: 0.0,
            beta: 1.0,
            distance_gamma: 1.0,
            score_multiplier: 1.0,
        }
    }
}

/// The settings that apply to one importance tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierSettings {
    pub point_value: f64,
    pub weight: f64,
    pub falloff: f64,
    pub min_points: f64,
}

impl TierSettings {
    /// Contribution of an exact match, before the floor is applied.
    pub fn max_points(&self, score_multiplier: f64) -> f64 {
        self.point_value * self.weight * score_multiplier
    }
}

impl ScoringConfig {
    pub fn tier(&self, is_primary: bool) -> TierSettings {
        if is_primary {
            TierSettings {
                point_value: self.primary_point_value,
                weight: self.primary_point_weight,
                falloff: self.primary_distance_falloff,
                min_points: self.primary_min_points,
            }
        } else {
            TierSettings {
                point_value: self.secondary_point_value,
                weight: self.secondary_point_weight,
                falloff: self.secondary_distance_falloff,
                min_points: self.secondary_min_points,
            }
        }
    }

    /// All fields with their names, in declaration order.
    pub(crate) fn fields(&self) -> [(&'static str, f64); 11] {
        [
            ("primary_point_value", self.primary_point_value),
            ("secondary_point_value", self.secondary_point_value),
            ("primary_point_weight", self.primary_point_weight),
            ("secondary_point_weight", self.secondary_point_weight),
            ("primary_distance_falloff", self.primary_distance_falloff),
            ("secondary_distance_falloff", self.secondary_distance_falloff),
            ("primary_min_points", self.primary_min_points),
            ("secondary_min_points", self.secondary_min_points),
            ("beta", self.beta),
            ("distance_gamma", self.distance_gamma),
            ("score_multiplier", self.score_multiplier),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scoring_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.primary_point_value, 10.0);
        assert_eq!(config.secondary_point_value, 5.0);
        assert_eq!(config.beta, 1.0);
        assert_eq!(config.distance_gamma, 1.0);
        assert_eq!(config.score_multiplier, 1.0);
    }

    #[test]
    fn tier_selects_primary_or_secondary() {
        let config = ScoringConfig {
            primary_min_points: -2.0,
            secondary_min_points: -1.0,
            ..ScoringConfig::default()
        };
        let primary = config.tier(true);
        assert_eq!(primary.point_value, 10.0);
        assert_eq!(primary.falloff, 0.1);
        assert_eq!(primary.min_points, -2.0);

        let secondary = config.tier(false);
        assert_eq!(secondary.point_value, 5.0);
        assert_eq!(secondary.falloff, 0.2);
        assert_eq!(secondary.min_points, -1.0);
    }

    #[test]
    fn partial_toml_takes_defaults() {
        let config: ScoringConfig = toml::from_str("beta = 2.5\nprimary_point_value = 20").unwrap();
        assert_eq!(config.beta, 2.5);
        assert_eq!(config.primary_point_value, 20.0);
        assert_eq!(config.secondary_point_value, 5.0);
    }

    #[test]
    fn unknown_field_rejected() {
        let result: Result<ScoringConfig, _> = toml::from_str("betta = 2.0");
        assert!(result.is_err());
    }
}
