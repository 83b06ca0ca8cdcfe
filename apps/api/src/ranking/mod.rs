pub mod handlers;
pub mod orchestrator;
pub mod pool;
pub mod prompts;
pub mod summary;

pub use orchestrator::RankingOrchestrator;
