//! taskflow - a lightweight imperative workflow engine
//!
//! Tasks are composed into a tree and executed depth-first. Each task's typed
//! parameters may be populated statically or bound to another task's output
//! through the shared execution context (a per-run blackboard of named
//! values). Bindings resolve lazily, right before a task executes, optionally
//! through a transformation pipeline. Failures are recorded into the context
//! and abort the run fail-fast; everything produced before the failure stays
//! queryable.

pub mod core;
pub mod execution;
pub mod tasks;

// Re-export commonly used types
pub use core::{
    BindingError, BindingRegistry, ExecutionContext, InputBinding, NamedResult, Pipeline,
    StepOutcome, Task, TaskError, TaskId, TaskParams, TaskScope, Workflow, WorkflowError,
    GLOBAL_TASK, RESULT_VARIABLE,
};
pub use execution::WorkflowEngine;
