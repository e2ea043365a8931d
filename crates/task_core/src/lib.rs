pub mod analyzer;
pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod report;
pub mod service;
pub mod stats;
pub mod storage;
pub mod validate;
