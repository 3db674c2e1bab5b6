//! Agile board workflow engine.
//!
//! Stories and tasks move across the columns To Do, In Progress, Review, and
//! Done under a fixed transition table. Moves are applied to the local board
//! at once and committed to the backend afterwards; a failed commit restores
//! the board to how it looked before that move. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Engine settings in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
