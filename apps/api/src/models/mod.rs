pub mod candidate;
pub mod job;
pub mod score_report;
