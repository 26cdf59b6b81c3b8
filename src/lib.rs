// hwcheck: Multi-dimensional similarity checking for homework reports
//
// This is the library root. Each module corresponds to a stage of the
// comparison pipeline, from reading reports to presenting results.

pub mod config;
pub mod corpus;
pub mod error;
pub mod features;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod similarity;
