pub mod chart;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod input;
pub mod report;
pub mod tables;
pub mod types;
pub mod ui;
