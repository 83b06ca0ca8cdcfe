pub mod evaluator;
pub mod prompts;

pub use evaluator::{QualitativeEvaluation, QualitativeEvaluator};
