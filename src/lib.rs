pub mod analyzers;
pub mod config;
pub mod dashboard;
pub mod output;
pub mod parser;
pub mod refresh;
pub mod stats;
pub mod store;
