pub mod analyzers;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod records;
pub mod services;
pub mod submit;
