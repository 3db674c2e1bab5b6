//! Step definitions for board move BDD scenarios.

pub mod then;
pub mod when;
pub mod world;
