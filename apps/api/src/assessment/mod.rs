pub mod handlers;
pub mod locks;
pub mod orchestrator;

pub use orchestrator::AssessmentOrchestrator;
