//! Command implementations

pub mod explain;
pub mod plan;
