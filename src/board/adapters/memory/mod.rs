//! In-memory adapters for tests and local demos.

mod backend;

pub use backend::InMemoryBoardBackend;
