//! Schema-constrained generation: request JSON matching a schema, then validate
//! it into a typed value. A response that fails either step is retried a fixed
//! number of times and then surfaced as `LlmError::MalformedResponse`.

use serde::de::DeserializeOwned;
use tracing::warn;

use super::prompts::{JSON_ONLY_SYSTEM, SCHEMA_INSTRUCTION_TEMPLATE};
use super::{strip_json_fences, LlmError, LlmService, TextRequest};

/// Attempts per structured call before giving up with `MalformedResponse`.
pub const MAX_STRUCTURED_ATTEMPTS: u32 = 3;

/// A typed model response. `SCHEMA` is shown to the model verbatim.
pub trait StructuredOutput: DeserializeOwned + Send {
    const SCHEMA: &'static str;

    /// Semantic checks beyond what deserialization enforces.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

pub async fn generate_structured<T: StructuredOutput>(
    llm: &dyn LlmService,
    prompt: &str,
    temperature: f32,
) -> Result<T, LlmError> {
    let full_prompt =
        format!("{prompt}{}", SCHEMA_INSTRUCTION_TEMPLATE.replace("{schema}", T::SCHEMA));

    let mut last_problem = String::new();

    for attempt in 1..=MAX_STRUCTURED_ATTEMPTS {
        let text = llm
            .generate_text(TextRequest {
                prompt: &full_prompt,
                system: JSON_ONLY_SYSTEM,
                temperature,
                max_tokens: None,
            })
            .await?;

        match parse_and_validate::<T>(&text) {
            Ok(value) => return Ok(value),
            Err(problem) => {
                warn!(
                    "Structured output attempt {}/{} rejected: {}",
                    attempt, MAX_STRUCTURED_ATTEMPTS, problem
                );
                last_problem = problem;
            }
        }
    }

    Err(LlmError::MalformedResponse {
        attempts: MAX_STRUCTURED_ATTEMPTS,
        message: last_problem,
    })
}

fn parse_and_validate<T: StructuredOutput>(text: &str) -> Result<T, String> {
    let value: T = serde_json::from_str(strip_json_fences(text)).map_err(|e| e.to_string())?;
    value.validate()?;
    Ok(value)
}
