pub mod ranking;
pub mod scoring;
pub mod urgency;
pub mod weight;
