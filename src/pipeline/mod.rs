//! Message pipeline orchestration.

pub mod coordinator;
