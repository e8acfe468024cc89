//! Core types and errors shared across the engine

pub mod error;
pub mod types;
