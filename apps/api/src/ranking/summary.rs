use std::sync::Arc;

use tracing::warn;

use super::prompts::{SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};
use crate::llm_client::{LlmService, TextRequest};
use crate::models::job::JobContext;
use crate::models::score_report::ScoreReport;

pub const EMPTY_POOL_SUMMARY: &str = "No candidates available for this position.";

const SUMMARY_TEMPERATURE: f32 = 0.4;
const SUMMARY_MAX_TOKENS: u32 = 250;
/// Number of leading reports shown to the model.
const SUMMARY_TOP_N: usize = 3;

/// Writes the pool-level narrative for a ranking. Never fails.
#[derive(Clone)]
pub struct PoolSummarizer {
    llm: Arc<dyn LlmService>,
}

impl PoolSummarizer {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }

    /// `rankings` must already be sorted best first.
    pub async fn summarize(&self, job: &JobContext, rankings: &[ScoreReport]) -> String {
        let Some(top) = rankings.first() else {
            return EMPTY_POOL_SUMMARY.to_string();
        };

        let prompt = build_prompt(job, rankings, top);
        let result = self
            .llm
            .generate_text(TextRequest {
                prompt: &prompt,
                system: SUMMARY_SYSTEM,
                temperature: SUMMARY_TEMPERATURE,
                max_tokens: Some(SUMMARY_MAX_TOKENS),
            })
            .await;

        match result {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Empty pool summary for job {}, using fallback", job.id);
                fallback_summary(top)
            }
            Err(e) => {
                warn!("Pool summary failed for job {}, using fallback: {}", job.id, e);
                fallback_summary(top)
            }
        }
    }
}

pub fn fallback_summary(top: &ScoreReport) -> String {
    format!(
        "Top candidate: {} with a score of {:.1}/100 ({}).",
        top.display_name(),
        top.overall_score,
        top.recommendation
    )
}

fn build_prompt(job: &JobContext, rankings: &[ScoreReport], top: &ScoreReport) -> String {
    let top_candidates = rankings
        .iter()
        .take(SUMMARY_TOP_N)
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. {}: {:.1}/100, {}",
                i + 1,
                r.display_name(),
                r.overall_score,
                r.recommendation
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let top_candidate_detail = format!(
        "Strengths: {}\nWeaknesses: {}",
        top.strengths.join("; "),
        top.weaknesses.join("; ")
    );

    SUMMARY_PROMPT_TEMPLATE
        .replace("{job_title}", &job.job_title)
        .replace("{top_candidates}", &top_candidates)
        .replace("{top_candidate_detail}", &top_candidate_detail)
}
