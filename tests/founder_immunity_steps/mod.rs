//! Step definitions for founder immunity scenarios.

pub mod world;
