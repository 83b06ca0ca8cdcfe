// Prompt templates for pool-level ranking summaries.

pub const SUMMARY_SYSTEM: &str =
    "You are a hiring assistant writing brief notes for a hiring manager. \
    Respond with plain prose only: no headings, no lists, no markdown.";

/// Pool summary prompt. Replace `{job_title}`, `{top_candidates}` and
/// `{top_candidate_detail}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Summarize the top of the candidate pool for the position "{job_title}" in 2-3 sentences.

Top candidates:
{top_candidates}

Leading candidate detail:
{top_candidate_detail}

Mention who stands out and why, and any common gap worth probing in interviews."#;
