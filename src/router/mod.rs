//! Worker registration, readiness, and work matching.

pub mod error;
pub mod registration;
pub mod router;

pub use error::RouterError;
pub use registration::WorkerRegistration;
pub use router::RequestRouter;
