//! Unit tests for the directory module.

mod support;
