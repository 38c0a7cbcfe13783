// HeartCheck Domain
// This crate contains the scoring rules and business logic for the HeartCheck application

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the database module from heart_check_data for convenience
pub use heart_check_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
