// Prompt templates for qualitative evaluation.

/// Candidate evaluation prompt. Replace every `{placeholder}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an experienced technical recruiter. Evaluate how well this candidate fits the job.

JOB
- Title: {job_title}
- Seniority: {seniority}
- Required skills: {required_skills}
- Preferred skills: {preferred_skills}
- Experience required: {experience_required}
- Domain: {domain}

CANDIDATE
- Name: {candidate_name}
- Headline: {headline}
- Total experience: {experience_years}
- Skills: {candidate_skills}
- Summary: {candidate_summary}

COMPUTED SCORES (0-100)
- Overall: {overall_score}
- Skill match: {skill_score}
- Experience match: {experience_score} [{experience_status}] ({experience_message})
- Matched required skills: {matched_required}
- Missing required skills: {missing_required}

Provide:
- 3 to 5 concrete strengths relevant to this job
- 2 to 4 concrete weaknesses or gaps
- a reasoning paragraph of 2-3 sentences
- a recommendation: "Strong Interview" (score >= 85), "Interview" (70-84), "Maybe" (55-69) or "Reject" (< 55). You may deviate by one band if the qualitative evidence is clear.
"#;

pub const EVALUATION_SCHEMA: &str = r#"{
  "strengths": ["string"],
  "weaknesses": ["string"],
  "reasoning": "string",
  "recommendation": "Strong Interview" | "Interview" | "Maybe" | "Reject"
}"#;
