pub mod aggregator;
pub mod error;
pub mod report;
pub mod resample;
pub mod retry;
