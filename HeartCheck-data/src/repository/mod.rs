// Repository module structure
pub mod errors;
mod session;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use session::{SessionRepository, SessionRepositoryTrait};

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use session::tests;
