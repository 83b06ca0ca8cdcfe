//! Skill overlap between a candidate and a job's required/preferred skill sets.
//!
//! Membership is case-insensitive; every reported list keeps the first-seen
//! spelling from the list it came from, in input order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Share of the skill score carried by required skills.
pub const REQUIRED_WEIGHT: f64 = 70.0;
/// Share of the skill score carried by preferred skills.
pub const PREFERRED_WEIGHT: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    /// Weighted score, 0 – 100.
    pub score: f64,
    pub matched_required: Vec<String>,
    pub matched_preferred: Vec<String>,
    pub missing_required: Vec<String>,
    pub missing_preferred: Vec<String>,
    pub extra: Vec<String>,
    /// Unweighted share of JD skills the candidate has. Display only.
    pub match_percentage: f64,
}

/// Deduplicates case-insensitively, keeping the first spelling of each skill.
fn dedup_skills(skills: &[String]) -> Vec<(String, &str)> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            let key = s.to_lowercase();
            seen.insert(key.clone()).then_some((key, s))
        })
        .collect()
}

fn keys(skills: &[(String, &str)]) -> HashSet<String> {
    skills.iter().map(|(k, _)| k.clone()).collect()
}

fn select(skills: &[(String, &str)], keep: impl Fn(&str) -> bool) -> Vec<String> {
    skills
        .iter()
        .filter(|(k, _)| keep(k.as_str()))
        .map(|(_, original)| original.to_string())
        .collect()
}

pub fn match_skills(candidate: &[String], required: &[String], preferred: &[String]) -> SkillMatch {
    let candidate = dedup_skills(candidate);
    let required = dedup_skills(required);
    let preferred = dedup_skills(preferred);

    let candidate_keys = keys(&candidate);
    let required_keys = keys(&required);
    let preferred_keys = keys(&preferred);

    let matched_required = select(&required, |k| candidate_keys.contains(k));
    let missing_required = select(&required, |k| !candidate_keys.contains(k));
    let matched_preferred = select(&preferred, |k| candidate_keys.contains(k));
    let missing_preferred = select(&preferred, |k| !candidate_keys.contains(k));
    let extra = select(&candidate, |k| {
        !required_keys.contains(k) && !preferred_keys.contains(k)
    });

    let required_score = if required.is_empty() {
        0.0
    } else {
        matched_required.len() as f64 / required.len() as f64 * REQUIRED_WEIGHT
    };
    let preferred_score = if preferred.is_empty() {
        0.0
    } else {
        matched_preferred.len() as f64 / preferred.len() as f64 * PREFERRED_WEIGHT
    };

    let jd_skill_count = required_keys.union(&preferred_keys).count().max(1);
    let match_percentage =
        (matched_required.len() + matched_preferred.len()) as f64 / jd_skill_count as f64 * 100.0;

    SkillMatch {
        score: round2(required_score + preferred_score),
        matched_required,
        matched_preferred,
        missing_required,
        missing_preferred,
        extra,
        match_percentage: round2(match_percentage),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
