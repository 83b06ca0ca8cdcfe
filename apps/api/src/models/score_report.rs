use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Interview recommendation attached to every score report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Interview")]
    StrongInterview,
    Interview,
    Maybe,
    Reject,
}

impl Recommendation {
    /// Score bands: >=85 strong, >=70 interview, >=55 maybe, otherwise reject.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Recommendation::StrongInterview
        } else if score >= 70.0 {
            Recommendation::Interview
        } else if score >= 55.0 {
            Recommendation::Maybe
        } else {
            Recommendation::Reject
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongInterview => "Strong Interview",
            Recommendation::Interview => "Interview",
            Recommendation::Maybe => "Maybe",
            Recommendation::Reject => "Reject",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Strong Interview" => Ok(Recommendation::StrongInterview),
            "Interview" => Ok(Recommendation::Interview),
            "Maybe" => Ok(Recommendation::Maybe),
            "Reject" => Ok(Recommendation::Reject),
            other => Err(format!("unknown recommendation '{other}'")),
        }
    }
}

/// Outcome of assessing one candidate against one job.
/// At most one report is stored per (candidate_id, job_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub candidate_name: Option<String>,
    pub overall_score: f64,
    pub skill_match_score: f64,
    pub experience_match_score: f64,
    pub semantic_similarity_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub extra_skills: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub reasoning: String,
    pub recommendation: Recommendation,
    pub created_at: DateTime<Utc>,
}

impl ScoreReport {
    pub fn display_name(&self) -> String {
        self.candidate_name
            .clone()
            .unwrap_or_else(|| self.candidate_id.to_string())
    }
}

/// Ranked pool for one job. Assembled per request, never stored as a unit.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub job_id: Uuid,
    pub job_title: String,
    pub total_candidates: usize,
    pub rankings: Vec<ScoreReport>,
    pub top_candidates_summary: String,
}

/// Side-by-side comparison of an explicit set of candidates.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub job_id: Uuid,
    pub job_title: String,
    pub candidates_compared: usize,
    pub rankings: Vec<ScoreReport>,
    pub best_candidate: Option<String>,
    pub summary: String,
}
