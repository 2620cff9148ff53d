//! Core domain model for taskflow
//!
//! This module defines the execution context (the shared blackboard of task
//! results), the binding and transformation machinery that moves values
//! between tasks, and the task/workflow abstractions the engine walks.

pub mod binding;
pub mod context;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod task;
pub mod workflow;

pub use binding::*;
pub use context::*;
pub use error::*;
pub use params::*;
pub use pipeline::*;
pub use task::*;
pub use workflow::*;
