use serde::{Deserialize, Serialize};

use super::skills::round2;

/// Weights applied to the three component scores. Loaded from config, which is
/// responsible for checking they sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub skill_match: f64,
    pub experience_match: f64,
    pub semantic_similarity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            skill_match: 0.35,
            experience_match: 0.25,
            semantic_similarity: 0.4,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.skill_match + self.experience_match + self.semantic_similarity
    }
}

/// overall = skill*w_skill + experience*w_experience + semantic*w_semantic, to 2 decimals.
pub fn aggregate_score(skill: f64, experience: f64, semantic: f64, weights: &ScoreWeights) -> f64 {
    round2(
        skill * weights.skill_match
            + experience * weights.experience_match
            + semantic * weights.semantic_similarity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((ScoreWeights::default().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_weighted_sum() {
        let w = ScoreWeights::default();
        // 80*0.35 + 60*0.25 + 90*0.4 = 28 + 15 + 36 = 79
        assert_eq!(aggregate_score(80.0, 60.0, 90.0, &w), 79.0);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let w = ScoreWeights {
            skill_match: 1.0 / 3.0,
            experience_match: 1.0 / 3.0,
            semantic_similarity: 1.0 / 3.0,
        };
        assert_eq!(aggregate_score(10.0, 10.0, 11.0, &w), 10.33);
    }

    #[test]
    fn test_unnormalized_weights_are_not_rescaled() {
        let w = ScoreWeights {
            skill_match: 1.0,
            experience_match: 1.0,
            semantic_similarity: 1.0,
        };
        assert_eq!(aggregate_score(50.0, 50.0, 50.0, &w), 150.0);
    }

    fn weights_summing_to_one() -> impl Strategy<Value = ScoreWeights> {
        (0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(a, b)| {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            ScoreWeights {
                skill_match: lo,
                experience_match: hi - lo,
                semantic_similarity: 1.0 - hi,
            }
        })
    }

    proptest! {
        #[test]
        fn prop_output_within_bounds(
            w in weights_summing_to_one(),
            skill in 0.0f64..=100.0,
            experience in 0.0f64..=100.0,
            semantic in 0.0f64..=100.0,
        ) {
            let score = aggregate_score(skill, experience, semantic, &w);
            prop_assert!((0.0..=100.0).contains(&score), "score {score} out of range");
        }

        #[test]
        fn prop_output_equals_weighted_sum(
            w in weights_summing_to_one(),
            skill in 0.0f64..=100.0,
            experience in 0.0f64..=100.0,
            semantic in 0.0f64..=100.0,
        ) {
            let exact = skill * w.skill_match
                + experience * w.experience_match
                + semantic * w.semantic_similarity;
            let score = aggregate_score(skill, experience, semantic, &w);
            prop_assert!((score - exact).abs() <= 0.005 + 1e-9);
        }
    }
}
