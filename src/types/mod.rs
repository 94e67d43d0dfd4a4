//! Type definitions for the training core.

pub mod rubric;
pub mod transcript;
