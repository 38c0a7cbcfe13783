// HeartCheck Data
// This crate handles persistence of per-session analysis results

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
