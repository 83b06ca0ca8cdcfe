use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::scoring::{ExperiencePolicy, ScoreWeights, ScoringConfig};

/// How far below 1.0 the weight sum may fall (rounded weights like 0.333 x 3).
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;
/// Float slack above 1.0. Anything larger could push overall scores past 100.
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub port: u16,
    pub rust_log: String,
    pub candidate_collection: String,
    pub job_collection: String,
    pub scoring: ScoringConfig,
    pub ranking_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let weights = ScoreWeights {
            skill_match: parse_env_or("WEIGHT_SKILL_MATCH", 0.35)?,
            experience_match: parse_env_or("WEIGHT_EXPERIENCE_MATCH", 0.25)?,
            semantic_similarity: parse_env_or("WEIGHT_SEMANTIC_SIMILARITY", 0.40)?,
        };
        validate_weights(&weights)?;

        let experience = ExperiencePolicy {
            under_penalty_per_year: parse_env_or("EXPERIENCE_UNDER_PENALTY", 15.0)?,
            over_penalty_per_year: parse_env_or("EXPERIENCE_OVER_PENALTY", 5.0)?,
            over_floor: parse_env_or("EXPERIENCE_OVER_FLOOR", 70.0)?,
            ..ExperiencePolicy::default()
        };

        let ranking_concurrency: usize = parse_env_or("RANKING_CONCURRENCY", 4)?;
        if ranking_concurrency == 0 {
            bail!("RANKING_CONCURRENCY must be at least 1");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            embedding_api_key: std::env::var("EMBEDDING_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "voyage-3".to_string()),
            port: parse_env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            candidate_collection: std::env::var("CANDIDATE_COLLECTION")
                .unwrap_or_else(|_| "candidates".to_string()),
            job_collection: std::env::var("JOB_COLLECTION")
                .unwrap_or_else(|_| "job_contexts".to_string()),
            scoring: ScoringConfig {
                weights,
                experience,
            },
            ranking_concurrency,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn validate_weights(weights: &ScoreWeights) -> Result<()> {
    let sum = weights.sum();
    if sum > 1.0 + WEIGHT_SUM_EPSILON || sum < 1.0 - WEIGHT_SUM_TOLERANCE {
        bail!("Score weights must sum to 1.0 (got {sum:.4})");
    }
    if weights.skill_match < 0.0 || weights.experience_match < 0.0 || weights.semantic_similarity < 0.0
    {
        bail!("Score weights must not be negative");
    }
    Ok(())
}
