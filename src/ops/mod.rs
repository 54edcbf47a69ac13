//! High-level operations.
//!
//! This module contains the pipeline behind xcgen commands.

pub mod focus;
pub mod generate;
pub mod load;

pub use focus::{focus, FocusError};
pub use generate::{
    generate, load_targets, plan_universe, plan_with_logger, GenerateOptions, PlannedTarget,
    ProjectPlan,
};
pub use load::{discover, load_file, load_universe, parse_shard, LoadError};
