//! Task abstraction - the unit of work the engine executes

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::core::context::ExecutionContext;
use crate::core::error::{BindingError, TaskError};
use crate::core::params::TaskParams;

/// A named unit of work in the execution tree
///
/// Concrete task types are the plugin point through which leaf capabilities
/// (SQL, file I/O, HTTP, rendering, ...) attach to the engine: implement
/// `execute`, optionally expose a [`TaskParams`] object whose bindings the
/// engine resolves before each run, and attach instances to a
/// [`Workflow`](crate::core::workflow::Workflow) via `add_task`.
#[async_trait]
pub trait Task: Send {
    /// Short name of the concrete task type, used in log lines
    fn kind(&self) -> &'static str;

    /// The task's parameters, if it has any
    ///
    /// The engine calls [`TaskParams::load_results`] on the returned object
    /// before every execution.
    fn params_mut(&mut self) -> Option<&mut dyn TaskParams> {
        None
    }

    /// Run the task against its resolved parameters
    ///
    /// Results are written back through the [`TaskScope`]; any error aborts
    /// the run after being logged and recorded.
    async fn execute(&mut self, scope: &mut TaskScope<'_>) -> Result<(), TaskError>;
}

/// The executing task's window onto the shared context
///
/// Carries the task's own name so the task can write results under it without
/// knowing where it sits in the tree.
pub struct TaskScope<'a> {
    name: &'a str,
    context: &'a mut ExecutionContext,
}

impl<'a> TaskScope<'a> {
    pub(crate) fn new(name: &'a str, context: &'a mut ExecutionContext) -> Self {
        Self { name, context }
    }

    /// Name of the executing task
    pub fn task_name(&self) -> &str {
        self.name
    }

    /// Store this task's primary output
    pub fn set_result<T: Serialize>(&mut self, value: T) -> Result<(), TaskError> {
        let value = to_blackboard_value(self.name, value)?;
        self.context.set_task_result(self.name, value);
        Ok(())
    }

    /// Store a named output on this task
    pub fn set_variable<T: Serialize>(&mut self, variable: &str, value: T) -> Result<(), TaskError> {
        let value = to_blackboard_value(self.name, value)?;
        self.context.set_task_variable(self.name, variable, value);
        Ok(())
    }

    /// Store a variable in the `"Global"` scratch namespace
    pub fn set_global_variable<T: Serialize>(
        &mut self,
        variable: &str,
        value: T,
    ) -> Result<(), TaskError> {
        let value = to_blackboard_value(self.name, value)?;
        self.context.set_global_variable(variable, value);
        Ok(())
    }

    /// Read another task's variable
    pub fn get_task_variable(&self, task: &str, variable: &str) -> Option<&Value> {
        self.context.get_task_variable(task, variable)
    }

    /// Read another task's primary output
    pub fn get_task_result(&self, task: &str) -> Option<&Value> {
        self.context.get_task_result(task)
    }

    /// Typed read of another task's primary output
    pub fn get_task_result_as<T: DeserializeOwned>(
        &self,
        task: &str,
    ) -> Result<Option<T>, BindingError> {
        self.context.get_task_result_as(task)
    }

    /// Read a variable from the `"Global"` scratch namespace
    pub fn get_global_variable(&self, variable: &str) -> Option<&Value> {
        self.context.get_global_variable(variable)
    }

    /// The whole shared context, for tasks that need more than the sugar above
    pub fn context(&mut self) -> &mut ExecutionContext {
        self.context
    }
}

fn to_blackboard_value<T: Serialize>(task: &str, value: T) -> Result<Value, TaskError> {
    serde_json::to_value(value)
        .map_err(|e| {
            BindingError::Serialize {
                variable: task.to_string(),
                message: e.to_string(),
            }
            .into()
        })
}

/// Task with an empty body; the workflow root
#[derive(Debug, Default)]
pub struct Noop;

#[async_trait]
impl Task for Noop {
    fn kind(&self) -> &'static str {
        "Noop"
    }

    async fn execute(&mut self, _scope: &mut TaskScope<'_>) -> Result<(), TaskError> {
        Ok(())
    }
}
