pub mod cli;
pub mod config;
pub mod date_selector;
pub mod error;
pub mod export;
pub mod report;
pub mod scanner;
