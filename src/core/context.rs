//! Execution context - the shared blackboard of task results

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::core::error::BindingError;

/// Variable name every task's primary output is stored under
pub const RESULT_VARIABLE: &str = "Result";

/// Task slot used as a free-form scratch namespace
pub const GLOBAL_TASK: &str = "Global";

/// One named output produced by a task
///
/// At most one entry exists per (task, variable) pair; the pair is compared
/// case-insensitively.
#[derive(Debug, Clone, Serialize)]
pub struct NamedResult {
    /// Name of the task that produced the value
    pub task: String,

    /// Variable name the value is stored under
    pub variable: String,

    /// The stored value
    pub value: Value,
}

/// Record of one task attempt
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    /// Name of the task that was attempted
    pub task: String,

    /// Whether the attempt succeeded
    pub succeeded: bool,

    /// Error message when the attempt failed
    pub error: Option<String>,

    /// When the outcome was recorded
    pub at: DateTime<Utc>,
}

/// Shared per-run store of every task's named outputs
///
/// Created once per workflow run and threaded through every task. Lookups are
/// case-insensitive on both the task and the variable name. The context keeps
/// an append-only list of [`StepOutcome`] records alongside the results, so a
/// caller can inspect what succeeded and what failed after a run - including
/// a run that was aborted by a failing task.
///
/// The context is mutated only by the single thread driving the engine; tasks
/// that fan out internally must serialize their own writes back into it.
#[derive(Debug)]
pub struct ExecutionContext {
    run_id: Uuid,
    results: Vec<NamedResult>,
    outcomes: Vec<StepOutcome>,
}

impl ExecutionContext {
    /// Create an empty context for a new run
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            results: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    /// Unique id of this run, for log correlation
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Get a task's variable, if any task has written it
    pub fn get_task_variable(&self, task: &str, variable: &str) -> Option<&Value> {
        self.results
            .iter()
            .find(|r| {
                r.task.eq_ignore_ascii_case(task) && r.variable.eq_ignore_ascii_case(variable)
            })
            .map(|r| &r.value)
    }

    /// Get a task's primary output (variable `"Result"`)
    pub fn get_task_result(&self, task: &str) -> Option<&Value> {
        self.get_task_variable(task, RESULT_VARIABLE)
    }

    /// Get a variable from the `"Global"` scratch namespace
    pub fn get_global_variable(&self, variable: &str) -> Option<&Value> {
        self.get_task_variable(GLOBAL_TASK, variable)
    }

    /// Typed read of a task's variable
    ///
    /// Returns `Ok(None)` when the variable is absent and a clear error when
    /// the stored value does not deserialize into `T`.
    pub fn get_task_variable_as<T: DeserializeOwned>(
        &self,
        task: &str,
        variable: &str,
    ) -> Result<Option<T>, BindingError> {
        match self.get_task_variable(task, variable) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| BindingError::TypeMismatch {
                    variable: format!("{task}.{variable}"),
                    expected: std::any::type_name::<T>(),
                    message: e.to_string(),
                }),
        }
    }

    /// Typed read of a task's primary output
    pub fn get_task_result_as<T: DeserializeOwned>(
        &self,
        task: &str,
    ) -> Result<Option<T>, BindingError> {
        self.get_task_variable_as(task, RESULT_VARIABLE)
    }

    /// Upsert a task's variable: overwrite the existing entry for the
    /// (task, variable) pair or append a new one
    pub fn set_task_variable(&mut self, task: &str, variable: &str, value: Value) {
        match self.results.iter_mut().find(|r| {
            r.task.eq_ignore_ascii_case(task) && r.variable.eq_ignore_ascii_case(variable)
        }) {
            Some(existing) => existing.value = value,
            None => self.results.push(NamedResult {
                task: task.to_string(),
                variable: variable.to_string(),
                value,
            }),
        }
    }

    /// Upsert a task's primary output
    pub fn set_task_result(&mut self, task: &str, value: Value) {
        self.set_task_variable(task, RESULT_VARIABLE, value);
    }

    /// Upsert a variable in the `"Global"` scratch namespace
    pub fn set_global_variable(&mut self, variable: &str, value: Value) {
        self.set_task_variable(GLOBAL_TASK, variable, value);
    }

    /// Record a successful task attempt
    pub fn record_success(&mut self, task: &str) {
        self.outcomes.push(StepOutcome {
            task: task.to_string(),
            succeeded: true,
            error: None,
            at: Utc::now(),
        });
    }

    /// Record a failed task attempt; never errors
    pub fn record_failure(&mut self, task: &str, error: &str) {
        self.outcomes.push(StepOutcome {
            task: task.to_string(),
            succeeded: false,
            error: Some(error.to_string()),
            at: Utc::now(),
        });
    }

    /// Whether any task attempt failed during the run
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.succeeded)
    }

    /// Whether every recorded attempt succeeded
    pub fn all_succeeded(&self) -> bool {
        !self.has_failures()
    }

    /// The last recorded failure, if any
    pub fn most_recent_failure(&self) -> Option<&StepOutcome> {
        self.outcomes.iter().rev().find(|o| !o.succeeded)
    }

    /// All named results written so far, in insertion order
    pub fn results(&self) -> &[NamedResult] {
        &self.results
    }

    /// All attempt outcomes recorded so far, in order
    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}
