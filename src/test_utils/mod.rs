//! Consolidated test utilities and helpers for the GivTCP flow engine.
//!
//! This module provides fixture documents, test data builders and mock
//! fetchers/sinks used throughout the codebase.

#![cfg(test)]

pub mod builders;
pub mod fixtures;
pub mod mocks;
