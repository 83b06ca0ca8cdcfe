//! Range fit between a candidate's years of experience and a job's requirement.

use serde::{Deserialize, Serialize};

use super::skills::round2;

/// Penalty coefficients for the experience fit. Under-qualification costs more
/// per year than over-qualification, and over-qualification has a floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperiencePolicy {
    /// Score when the candidate's years are unknown.
    pub unknown_score: f64,
    /// Score when the job does not state a minimum.
    pub not_specified_score: f64,
    /// Width assumed for the range when only a minimum is given.
    pub default_range_years: f64,
    pub under_penalty_per_year: f64,
    pub over_penalty_per_year: f64,
    pub over_floor: f64,
}

impl Default for ExperiencePolicy {
    fn default() -> Self {
        Self {
            unknown_score: 50.0,
            not_specified_score: 75.0,
            default_range_years: 5.0,
            under_penalty_per_year: 15.0,
            over_penalty_per_year: 5.0,
            over_floor: 70.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceStatus {
    Unknown,
    NotSpecified,
    Match,
    Under,
    Over,
}

impl ExperienceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceStatus::Unknown => "unknown",
            ExperienceStatus::NotSpecified => "not_specified",
            ExperienceStatus::Match => "match",
            ExperienceStatus::Under => "under",
            ExperienceStatus::Over => "over",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceMatch {
    pub score: f64,
    pub status: ExperienceStatus,
    pub message: String,
    /// (min, max) actually used, after inferring a missing max.
    pub required_range: Option<(f64, f64)>,
}

impl ExperienceMatch {
    pub fn range_label(&self) -> Option<String> {
        self.required_range
            .map(|(min, max)| format!("{min:.1}-{max:.1} years"))
    }
}

pub fn match_experience(
    candidate_years: Option<f64>,
    required_min: Option<f64>,
    required_max: Option<f64>,
    policy: &ExperiencePolicy,
) -> ExperienceMatch {
    let Some(years) = candidate_years else {
        return ExperienceMatch {
            score: policy.unknown_score,
            status: ExperienceStatus::Unknown,
            message: "Experience not specified in resume".to_string(),
            required_range: None,
        };
    };

    let Some(min) = required_min else {
        return ExperienceMatch {
            score: policy.not_specified_score,
            status: ExperienceStatus::NotSpecified,
            message: "Experience requirement not specified in job".to_string(),
            required_range: None,
        };
    };

    let max = required_max.unwrap_or(min + policy.default_range_years);

    let (score, status, message) = if years >= min && years <= max {
        (
            100.0,
            ExperienceStatus::Match,
            format!(
                "Experience ({years:.1} years) is within required range ({min:.1}-{max:.1} years)"
            ),
        )
    } else if years < min {
        let gap = min - years;
        (
            (100.0 - gap * policy.under_penalty_per_year).max(0.0),
            ExperienceStatus::Under,
            format!(
                "Experience ({years:.1} years) is {gap:.1} years below minimum ({min:.1} years)"
            ),
        )
    } else {
        let excess = years - max;
        (
            (100.0 - excess * policy.over_penalty_per_year).max(policy.over_floor),
            ExperienceStatus::Over,
            format!("Experience ({years:.1} years) exceeds range by {excess:.1} years"),
        )
    };

    ExperienceMatch {
        score: round2(score),
        status,
        message,
        required_range: Some((min, max)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(years: Option<f64>, min: Option<f64>, max: Option<f64>) -> ExperienceMatch {
        match_experience(years, min, max, &ExperiencePolicy::default())
    }

    #[test]
    fn test_within_range_is_full_score() {
        let result = check(Some(4.0), Some(3.0), Some(6.0));
        assert_eq!(result.score, 100.0);
        assert_eq!(result.status, ExperienceStatus::Match);
        assert_eq!(result.range_label().as_deref(), Some("3.0-6.0 years"));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert_eq!(check(Some(3.0), Some(3.0), Some(6.0)).score, 100.0);
        assert_eq!(check(Some(6.0), Some(3.0), Some(6.0)).score, 100.0);
    }

    #[test]
    fn test_under_qualified_with_inferred_max() {
        let result = check(Some(1.0), Some(5.0), None);
        assert_eq!(result.score, 40.0);
        assert_eq!(result.status, ExperienceStatus::Under);
        assert_eq!(result.required_range, Some((5.0, 10.0)));
    }

    #[test]
    fn test_under_qualified_floors_at_zero() {
        let result = check(Some(0.0), Some(10.0), Some(12.0));
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_over_qualified_hits_floor() {
        let result = check(Some(12.0), Some(3.0), Some(6.0));
        assert_eq!(result.score, 70.0);
        assert_eq!(result.status, ExperienceStatus::Over);
    }

    #[test]
    fn test_over_qualified_gentle_penalty() {
        // 2 years over the max: 100 - 2*5
        let result = check(Some(8.0), Some(3.0), Some(6.0));
        assert_eq!(result.score, 90.0);
        assert!(result.message.contains("exceeds range by 2.0 years"));
    }

    #[test]
    fn test_messages_use_one_decimal_place() {
        let within = check(Some(4.0), Some(3.0), Some(6.0));
        assert_eq!(
            within.message,
            "Experience (4.0 years) is within required range (3.0-6.0 years)"
        );

        let under = check(Some(1.3), Some(5.0), None);
        assert_eq!(
            under.message,
            "Experience (1.3 years) is 3.7 years below minimum (5.0 years)"
        );

        let over = check(Some(8.5), Some(3.0), Some(6.0));
        assert_eq!(over.message, "Experience (8.5 years) exceeds range by 2.5 years");
    }

    #[test]
    fn test_unknown_candidate_years_is_neutral() {
        let result = check(None, Some(3.0), Some(6.0));
        assert_eq!(result.score, 50.0);
        assert_eq!(result.status, ExperienceStatus::Unknown);
        assert!(result.required_range.is_none());
    }

    #[test]
    fn test_missing_minimum_is_mild_positive() {
        let result = check(Some(2.0), None, Some(6.0));
        assert_eq!(result.score, 75.0);
        assert_eq!(result.status.as_str(), "not_specified");
    }

    #[test]
    fn test_custom_policy_coefficients() {
        let policy = ExperiencePolicy {
            under_penalty_per_year: 10.0,
            over_penalty_per_year: 20.0,
            over_floor: 50.0,
            ..ExperiencePolicy::default()
        };
        assert_eq!(
            match_experience(Some(1.0), Some(3.0), Some(5.0), &policy).score,
            80.0
        );
        assert_eq!(
            match_experience(Some(9.0), Some(3.0), Some(5.0), &policy).score,
            50.0
        );
    }
}
