use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job requirement profile. Created by upstream ingestion; read-only to scoring.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobContext {
    pub id: Uuid,
    pub job_title: String,
    pub seniority: Option<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    /// Free-text requirement as written in the JD, e.g. "3-5 years".
    pub experience_required: Option<String>,
    pub experience_min_years: Option<f64>,
    pub experience_max_years: Option<f64>,
    pub domain: Option<String>,
    pub job_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobContext {
    /// Text used to (re)generate the job embedding.
    pub fn profile_text(&self) -> String {
        let mut parts = vec![format!("Job title: {}", self.job_title)];
        if let Some(seniority) = &self.seniority {
            parts.push(format!("Seniority: {seniority}"));
        }
        if !self.required_skills.is_empty() {
            parts.push(format!("Required skills: {}", self.required_skills.join(", ")));
        }
        if !self.preferred_skills.is_empty() {
            parts.push(format!(
                "Preferred skills: {}",
                self.preferred_skills.join(", ")
            ));
        }
        if let Some(exp) = &self.experience_required {
            parts.push(format!("Experience: {exp}"));
        }
        if let Some(domain) = &self.domain {
            parts.push(format!("Domain: {domain}"));
        }
        if let Some(summary) = &self.job_summary {
            parts.push(summary.clone());
        }
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_text_skips_missing_fields() {
        let job = JobContext {
            id: Uuid::new_v4(),
            job_title: "Backend Engineer".to_string(),
            seniority: None,
            required_skills: vec!["Rust".to_string(), "SQL".to_string()],
            preferred_skills: vec![],
            experience_required: None,
            experience_min_years: None,
            experience_max_years: None,
            domain: Some("Fintech".to_string()),
            job_summary: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let text = job.profile_text();
        assert!(text.contains("Job title: Backend Engineer"));
        assert!(text.contains("Required skills: Rust, SQL"));
        assert!(text.contains("Domain: Fintech"));
        assert!(!text.contains("Preferred skills"));
        assert!(!text.contains("Seniority"));
    }
}
