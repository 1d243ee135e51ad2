//! Shared utilities

pub mod sql_normalization;
