//! Core business logic module
//!
//! Models, configuration, dependency checking, and the extraction pipeline.

pub mod batch;
pub mod config;
pub mod dependency_checker;
pub mod extractor;
pub mod file_parser;
pub mod models;
pub mod report;

#[cfg(test)]
mod extraction_integration_tests;

// Re-export commonly used types
pub use config::AppConfig;
pub use extractor::AudioExtractor;
