//! Port contracts for the board workflow engine.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod backend;

#[cfg(test)]
pub use backend::MockBoardBackend;
pub use backend::{BoardBackend, BoardBackendError, BoardBackendResult};
