//! Deterministic scoring of a candidate against a job.
//!
//! skill overlap + experience fit + embedding similarity → one weighted score.
//! Pure functions only; the LLM judgment lives in `evaluation`.

pub mod aggregate;
pub mod experience;
pub mod semantic;
pub mod skills;

use serde::{Deserialize, Serialize};

use crate::models::candidate::Candidate;
use crate::models::job::JobContext;

pub use aggregate::{aggregate_score, ScoreWeights};
pub use experience::{match_experience, ExperienceMatch, ExperiencePolicy};
pub use semantic::semantic_similarity;
pub use skills::{match_skills, SkillMatch};

/// Everything the deterministic matchers produced for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub overall_score: f64,
    pub skill_match: SkillMatch,
    pub experience_match: ExperienceMatch,
    pub semantic_similarity: f64,
    pub weights_used: ScoreWeights,
}

/// Scoring configuration shared by every assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub experience: ExperiencePolicy,
}

pub fn score_candidate(
    candidate: &Candidate,
    job: &JobContext,
    candidate_embedding: Option<&[f32]>,
    job_embedding: Option<&[f32]>,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let skill_match = match_skills(
        &candidate.skills,
        &job.required_skills,
        &job.preferred_skills,
    );
    let experience_match = match_experience(
        candidate.total_experience_years,
        job.experience_min_years,
        job.experience_max_years,
        &config.experience,
    );
    let semantic = semantic_similarity(candidate_embedding, job_embedding);

    let overall_score = aggregate_score(
        skill_match.score,
        experience_match.score,
        semantic,
        &config.weights,
    );

    ScoreBreakdown {
        overall_score,
        skill_match,
        experience_match,
        semantic_similarity: semantic,
        weights_used: config.weights,
    }
}
