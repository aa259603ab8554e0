//! Clustering traits and shared data types.

pub mod hierarchy;
pub mod types;
