pub mod scoring;
pub mod heart_check;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use heart_check::{HeartCheckServiceError, HeartCheckServiceTrait, create_default_heart_check_service, retention_cutoff};
pub use scoring::{evaluate, HeartHealthScorer};
