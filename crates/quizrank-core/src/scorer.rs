//! Raw per-ending scoring.
//!
//! Each rule awards points that decay with the distance between the given
//! answer and the nearest ideal answer:
//!
//! ```text
//! retain       = (1 - falloff) ^ (distance ^ distance_gamma)
//! contribution = max(min_points, point_value * weight * retain * score_multiplier)
//! ```
//!
//! Unanswered questions contribute nothing. Both functions here are pure:
//! identical inputs always produce bit-identical totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::model::{EndingId, EngineDefinition, QuestionId, QuestionRule, QuizResponse};

/// Compute the raw point total of every ending for a response.
pub fn score(engine: &EngineDefinition, response: &QuizResponse) -> BTreeMap<EndingId, f64> {
    engine
        .endings
        .iter()
        .map(|ending| {
            let total = ending
                .rules
                .iter()
                .map(|rule| rule_outcome(rule, response, &engine.config).contribution)
                .sum::<f64>();
            (ending.id.clone(), total)
        })
        .collect()
}

/// How a single rule scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleContribution {
    pub question_id: QuestionId,
    pub is_primary: bool,
    /// The given answer, or `None` if the question was unanswered.
    pub answer: Option<f64>,
    /// Distance to the nearest ideal answer.
    pub distance: Option<f64>,
    /// Fraction of the maximum points retained after falloff.
    pub retain: f64,
    pub contribution: f64,
}

/// Rule-by-rule scoring of one ending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndingBreakdown {
    pub ending_id: EndingId,
    pub total: f64,
    pub rules: Vec<RuleContribution>,
}

/// Score a response like [`score`], keeping every rule's contribution.
pub fn explain(engine: &EngineDefinition, response: &QuizResponse) -> Vec<EndingBreakdown> {
    engine
        .endings
        .iter()
        .map(|ending| {
            let rules: Vec<RuleContribution> = ending
                .rules
                .iter()
                .map(|rule| rule_outcome(rule, response, &engine.config))
                .collect();
            let total = rules.iter().map(|r| r.contribution).sum::<f64>();
            EndingBreakdown {
                ending_id: ending.id.clone(),
                total,
                rules,
            }
        })
        .collect()
}

fn rule_outcome(rule: &QuestionRule, response: &QuizResponse, config: &ScoringConfig) -> RuleContribution {
    let unscored = |answer: Option<f64>, distance: Option<f64>| RuleContribution {
        question_id: rule.question_id.clone(),
        is_primary: rule.is_primary,
        answer,
        distance,
        retain: 0.0,
        contribution: 0.0,
    };

    let Some(answer) = response.get(&rule.question_id) else {
        return unscored(None, None);
    };
    let Some(distance) = rule.distance(answer) else {
        return unscored(Some(answer), None);
    };

    let tier = config.tier(rule.is_primary);
    let retain = retained_fraction(distance, tier.falloff, config.distance_gamma);
    let contribution = (tier.max_points(config.score_multiplier) * retain).max(tier.min_points);

    RuleContribution {
        question_id: rule.question_id.clone(),
        is_primary: rule.is_primary,
        answer: Some(answer),
        distance: Some(distance),
        retain,
        contribution,
    }
}

/// Fraction of points kept at `distance` from the nearest ideal answer.
pub fn retained_fraction(distance: f64, falloff: f64, distance_gamma: f64) -> f64 {
    if distance == 0.0 {
        return 1.0;
    }
    (1.0 - falloff).powf(distance.powf(distance_gamma))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EndingDefinition;

    fn single_rule_engine(ideal: Vec<f64>, is_primary: bool, config: ScoringConfig) -> EngineDefinition {
        EngineDefinition {
            id: "e".into(),
            name: String::new(),
            version: 1,
            endings: vec![EndingDefinition {
                id: "a".into(),
                display_name: "A".into(),
                rules: vec![QuestionRule::new("q1", ideal, is_primary)],
            }],
            config,
        }
    }

    fn points(engine: &EngineDefinition, answer: f64) -> f64 {
        let response = QuizResponse::new().answer("q1", answer);
        score(engine, &response)[&EndingId::from("a")]
    }

    #[test]
    fn exact_match_scores_full_primary_value() {
        let config = ScoringConfig {
            primary_point_value: 7.0,
            primary_point_weight: 3.0,
            score_multiplier: 2.0,
            primary_distance_falloff: 1.0,
            ..ScoringConfig::default()
        };
        let engine = single_rule_engine(vec![4.0, 6.0], true, config);
        assert_eq!(points(&engine, 6.0), 7.0 * 3.0 * 2.0);
    }

    #[test]
    fn exact_match_scores_full_secondary_value() {
        let config = ScoringConfig {
            secondary_point_value: 4.0,
            secondary_point_weight: 0.5,
            ..ScoringConfig::default()
        };
        let engine = single_rule_engine(vec![3.0], false, config);
        assert_eq!(points(&engine, 3.0), 2.0);
    }

    #[test]
    fn falloff_is_monotonic_in_distance() {
        let engine = single_rule_engine(vec![1.0], true, ScoringConfig::default());
        let mut previous = f64::INFINITY;
        for answer in 1..=10 {
            let p = points(&engine, answer as f64);
            assert!(p <= previous, "points rose at answer {answer}: {p} > {previous}");
            previous = p;
        }
        assert!(points(&engine, 10.0) < points(&engine, 1.0));
    }

    #[test]
    fn floor_respected_at_max_distance() {
        let config = ScoringConfig {
            primary_distance_falloff: 1.0,
            primary_min_points: -3.0,
            ..ScoringConfig::default()
        };
        let engine = single_rule_engine(vec![1.0], true, config);
        assert_eq!(points(&engine, 10.0), -3.0);

        let config = ScoringConfig {
            primary_distance_falloff: 0.5,
            primary_min_points: 2.0,
            ..ScoringConfig::default()
        };
        let engine = single_rule_engine(vec![1.0], true, config);
        assert_eq!(points(&engine, 10.0), 2.0);
    }

    #[test]
    fn full_falloff_zeroes_any_miss() {
        let config = ScoringConfig {
            primary_distance_falloff: 1.0,
            ..ScoringConfig::default()
        };
        let engine = single_rule_engine(vec![5.0], true, config);
        assert_eq!(points(&engine, 5.0), 10.0);
        assert_eq!(points(&engine, 6.0), 0.0);
    }

    #[test]
    fn distance_gamma_bends_the_curve() {
        let linear = single_rule_engine(vec![1.0], true, ScoringConfig::default());
        let steep = single_rule_engine(
            vec![1.0],
            true,
            ScoringConfig {
                distance_gamma: 2.0,
                ..ScoringConfig::default()
            },
        );
        // distance 1 is unaffected by the exponent
        assert_eq!(points(&linear, 2.0), points(&steep, 2.0));
        // distance 3: 0.9^3 vs 0.9^9
        assert!((points(&linear, 4.0) - 10.0 * 0.9f64.powi(3)).abs() < 1e-12);
        assert!((points(&steep, 4.0) - 10.0 * 0.9f64.powi(9)).abs() < 1e-12);
    }

    #[test]
    fn unanswered_question_contributes_zero_not_floor() {
        let config = ScoringConfig {
            primary_min_points: -5.0,
            ..ScoringConfig::default()
        };
        let engine = single_rule_engine(vec![1.0], true, config);
        let scores = score(&engine, &QuizResponse::new());
        assert_eq!(scores[&EndingId::from("a")], 0.0);
    }

    #[test]
    fn two_ending_scenario_raw_points() {
        let config = ScoringConfig {
            primary_point_value: 10.0,
            primary_point_weight: 1.0,
            primary_distance_falloff: 0.1,
            ..ScoringConfig::default()
        };
        let engine = EngineDefinition {
            id: "e".into(),
            name: String::new(),
            version: 1,
            endings: vec![
                EndingDefinition {
                    id: "A".into(),
                    display_name: String::new(),
                    rules: vec![QuestionRule::new("Q1", vec![8.0], true)],
                },
                EndingDefinition {
                    id: "B".into(),
                    display_name: String::new(),
                    rules: vec![QuestionRule::new("Q1", vec![2.0], true)],
                },
            ],
            config,
        };
        let scores = score(&engine, &QuizResponse::new().answer("Q1", 8.0));
        assert_eq!(scores[&EndingId::from("A")], 10.0);
        assert!((scores[&EndingId::from("B")] - 5.31441).abs() < 1e-9);
    }

    #[test]
    fn explain_matches_score() {
        let engine = EngineDefinition {
            id: "e".into(),
            name: String::new(),
            version: 1,
            endings: vec![EndingDefinition {
                id: "a".into(),
                display_name: String::new(),
                rules: vec![
                    QuestionRule::new("q1", vec![3.0], true),
                    QuestionRule::new("q2", vec![7.0, 9.0], false),
                    QuestionRule::new("q3", vec![5.0], false),
                ],
            }],
            config: ScoringConfig::default(),
        };
        let response = QuizResponse::new().answer("q1", 5.0).answer("q2", 10.0);

        let scores = score(&engine, &response);
        let breakdown = explain(&engine, &response);
        assert_eq!(breakdown[0].total, scores[&EndingId::from("a")]);

        let rules = &breakdown[0].rules;
        assert_eq!(rules[0].distance, Some(2.0));
        assert_eq!(rules[1].distance, Some(1.0));
        assert_eq!(rules[2].answer, None);
        assert_eq!(rules[2].contribution, 0.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let engine = single_rule_engine(vec![2.0, 9.0], true, ScoringConfig::default());
        let response = QuizResponse::new().answer("q1", 5.5);
        let first = score(&engine, &response);
        let second = score(&engine, &response);
        assert_eq!(
            first[&EndingId::from("a")].to_bits(),
            second[&EndingId::from("a")].to_bits()
        );
    }

    #[test]
    fn retained_fraction_at_zero_distance_is_one() {
        assert_eq!(retained_fraction(0.0, 1.0, 1.0), 1.0);
        assert_eq!(retained_fraction(0.0, 0.5, 3.0), 1.0);
        assert_eq!(retained_fraction(2.0, 0.0, 1.0), 1.0);
    }
}
