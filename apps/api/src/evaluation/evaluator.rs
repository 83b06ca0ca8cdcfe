use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SCHEMA};
use crate::llm_client::{generate_structured, LlmService, StructuredOutput};
use crate::models::candidate::Candidate;
use crate::models::job::JobContext;
use crate::models::score_report::Recommendation;
use crate::scoring::ScoreBreakdown;

const EVALUATION_TEMPERATURE: f32 = 0.3;
/// Only the first skills are shown to the model; long lists add noise.
const PROMPT_SKILL_LIMIT: usize = 20;
const FALLBACK_NOTE: &str = "Analysis unavailable";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitativeEvaluation {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub reasoning: String,
    pub recommendation: Recommendation,
}

impl StructuredOutput for QualitativeEvaluation {
    const SCHEMA: &'static str = EVALUATION_SCHEMA;

    fn validate(&self) -> Result<(), String> {
        if self.strengths.iter().all(|s| s.trim().is_empty()) {
            return Err("strengths must not be empty".to_string());
        }
        if self.weaknesses.iter().all(|s| s.trim().is_empty()) {
            return Err("weaknesses must not be empty".to_string());
        }
        if self.reasoning.trim().is_empty() {
            return Err("reasoning must not be empty".to_string());
        }
        Ok(())
    }
}

impl QualitativeEvaluation {
    /// Deterministic evaluation used whenever the model cannot be consulted.
    pub fn fallback(overall_score: f64) -> Self {
        Self {
            strengths: vec![FALLBACK_NOTE.to_string()],
            weaknesses: vec![FALLBACK_NOTE.to_string()],
            reasoning: format!("Score-based recommendation: {overall_score:.1}/100"),
            recommendation: Recommendation::from_score(overall_score),
        }
    }
}

/// LLM-backed strengths/weaknesses/recommendation for one pair. Never fails:
/// any model error degrades to [`QualitativeEvaluation::fallback`].
#[derive(Clone)]
pub struct QualitativeEvaluator {
    llm: Arc<dyn LlmService>,
}

impl QualitativeEvaluator {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }

    pub async fn evaluate(
        &self,
        candidate: &Candidate,
        job: &JobContext,
        breakdown: &ScoreBreakdown,
    ) -> QualitativeEvaluation {
        let prompt = build_prompt(candidate, job, breakdown);

        match generate_structured::<QualitativeEvaluation>(
            self.llm.as_ref(),
            &prompt,
            EVALUATION_TEMPERATURE,
        )
        .await
        {
            Ok(evaluation) => {
                debug!(
                    "Evaluated candidate {} for job {}: {}",
                    candidate.id, job.id, evaluation.recommendation
                );
                evaluation
            }
            Err(e) => {
                warn!(
                    "Qualitative evaluation failed for candidate {} / job {}, using score bands: {}",
                    candidate.id, job.id, e
                );
                QualitativeEvaluation::fallback(breakdown.overall_score)
            }
        }
    }
}

fn build_prompt(candidate: &Candidate, job: &JobContext, breakdown: &ScoreBreakdown) -> String {
    let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".to_string());
    let list = |items: &[String]| {
        if items.is_empty() {
            "None".to_string()
        } else {
            items.join(", ")
        }
    };

    let candidate_skills: Vec<String> = candidate
        .skills
        .iter()
        .take(PROMPT_SKILL_LIMIT)
        .cloned()
        .collect();
    let experience_years = candidate
        .total_experience_years
        .map(|y| format!("{y} years"))
        .unwrap_or_else(|| "Unknown".to_string());

    EVALUATION_PROMPT_TEMPLATE
        .replace("{job_title}", &job.job_title)
        .replace("{seniority}", &or_na(&job.seniority))
        .replace("{required_skills}", &list(&job.required_skills))
        .replace("{preferred_skills}", &list(&job.preferred_skills))
        .replace(
            "{experience_required}",
            &or_na(
                &job.experience_required
                    .clone()
                    .or_else(|| breakdown.experience_match.range_label()),
            ),
        )
        .replace("{domain}", &or_na(&job.domain))
        .replace("{candidate_name}", &candidate.display_name())
        .replace("{headline}", &or_na(&candidate.headline))
        .replace("{experience_years}", &experience_years)
        .replace("{candidate_skills}", &list(&candidate_skills))
        .replace("{candidate_summary}", &or_na(&candidate.summary))
        .replace("{overall_score}", &format!("{:.1}", breakdown.overall_score))
        .replace("{skill_score}", &format!("{:.1}", breakdown.skill_match.score))
        .replace(
            "{experience_score}",
            &format!("{:.1}", breakdown.experience_match.score),
        )
        .replace(
            "{experience_status}",
            breakdown.experience_match.status.as_str(),
        )
        .replace("{experience_message}", &breakdown.experience_match.message)
        .replace(
            "{matched_required}",
            &list(&breakdown.skill_match.matched_required),
        )
        .replace(
            "{missing_required}",
            &list(&breakdown.skill_match.missing_required),
        )
}
