//! Workflow execution engine

pub mod engine;

pub use engine::WorkflowEngine;
