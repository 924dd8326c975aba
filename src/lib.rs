// Infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod storage;
pub mod telemetry;

// Domain
pub mod template;

// Application
pub mod state;
