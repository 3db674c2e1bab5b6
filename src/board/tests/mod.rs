//! Unit tests for the board workflow engine.

mod support;
