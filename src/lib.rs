pub mod dataset;
pub mod errors;
pub mod inequality;
pub mod report;
pub mod results;
pub mod retention;
pub mod sample_data;
pub mod standings;
