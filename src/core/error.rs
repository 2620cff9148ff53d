//! Error types for binding resolution, task execution and workflow runs

use thiserror::Error;

/// Errors raised while resolving a binding against the execution context
#[derive(Debug, Error)]
pub enum BindingError {
    /// No binding was declared for the requested target variable
    #[error("binding for `{0}` does not exist")]
    Missing(String),

    /// A binding exists but has a blank source task or source variable
    #[error("binding for `{0}` is not configured")]
    Unconfigured(String),

    /// A blackboard value did not match the type a pipeline stage or typed
    /// accessor expected
    #[error("type mismatch while resolving `{variable}`: expected {expected}: {message}")]
    TypeMismatch {
        variable: String,
        expected: &'static str,
        message: String,
    },

    /// A transformed value could not be written back as a blackboard value
    #[error("failed to serialize transformed value for `{variable}`: {message}")]
    Serialize { variable: String, message: String },
}

/// Errors raised by a task's lifecycle (binding resolution or execution)
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// A task failed with a plain message
    #[error("{0}")]
    Failed(String),

    /// Any other error a leaf task surfaced
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskError {
    /// Shorthand for failing a task with a message
    pub fn failed(message: impl Into<String>) -> Self {
        TaskError::Failed(message.into())
    }
}

/// Error returned from a workflow run
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A task failed; the run was aborted, earlier results stay in the context
    #[error("task `{task}` failed: {source}")]
    TaskFailed {
        task: String,
        #[source]
        source: TaskError,
    },
}

impl WorkflowError {
    /// Name of the task that aborted the run
    pub fn task_name(&self) -> &str {
        match self {
            WorkflowError::TaskFailed { task, .. } => task,
        }
    }
}
