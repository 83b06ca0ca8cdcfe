use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A candidate profile as extracted from a resume by upstream ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    pub total_experience_years: Option<f64>,
    pub summary: Option<String>,
    /// Job the candidate applied to at creation time. Other jobs are linked
    /// only through score reports.
    pub job_id: Option<Uuid>,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    /// Name for display; falls back to the id when the resume had no name.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }

    /// Text used to (re)generate the candidate embedding.
    pub fn profile_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(headline) = &self.headline {
            parts.push(headline.clone());
        }
        if !self.skills.is_empty() {
            parts.push(format!("Skills: {}", self.skills.join(", ")));
        }
        if let Some(years) = self.total_experience_years {
            parts.push(format!("Experience: {years} years"));
        }
        if let Some(summary) = &self.summary {
            parts.push(summary.clone());
        }
        parts.join("\n")
    }
}
