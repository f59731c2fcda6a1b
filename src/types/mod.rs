pub mod dataset;
pub mod date_range;
pub mod interval;
pub mod observation;
pub mod units;
