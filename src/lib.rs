//! Sprintboard: the workflow engine behind an agile task board.
//!
//! This crate moves stories and tasks across board columns, keeps the board
//! responsive by applying moves before the backend confirms them, and rolls
//! back moves the backend refuses. It also builds the backlog view that
//! groups stories by epic.
//!
//! # Architecture
//!
//! Sprintboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure board logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the persistence collaborator
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`board`]: Transition table, board materialization, optimistic moves,
//!   drag handling, and the backlog hierarchy

pub mod board;
