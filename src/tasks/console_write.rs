//! Leaf task that logs a message and stores it as its result

use async_trait::async_trait;
use tracing::info;

use crate::core::{
    truncate_for_log, BindingError, BindingRegistry, ExecutionContext, InputBinding, Task,
    TaskError, TaskParams, TaskScope,
};

/// Parameters for [`ConsoleWrite`]
///
/// Binding target: `Message`.
#[derive(Debug, Default)]
pub struct ConsoleWriteParams {
    /// The message to emit; may be replaced by a binding at execution time
    pub message: String,

    bindings: BindingRegistry,
}

impl ConsoleWriteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            bindings: BindingRegistry::new(),
        }
    }
}

impl TaskParams for ConsoleWriteParams {
    fn load_bindings(&mut self, bindings: Vec<InputBinding>) {
        self.bindings.load(bindings);
    }

    fn load_results(&mut self, ctx: &ExecutionContext) -> Result<(), BindingError> {
        if let Some(message) = self.bindings.resolve_as::<String>(ctx, "Message")? {
            self.message = message;
        }
        Ok(())
    }

    fn snapshot(&self) -> Vec<(String, String)> {
        vec![("Message".to_string(), truncate_for_log(&self.message))]
    }
}

/// Emits its message through the log and stores it as its result, so later
/// tasks can bind to what was written
pub struct ConsoleWrite {
    params: ConsoleWriteParams,
}

impl ConsoleWrite {
    pub fn new(params: ConsoleWriteParams) -> Self {
        Self { params }
    }
}

#[async_trait]
impl Task for ConsoleWrite {
    fn kind(&self) -> &'static str {
        "ConsoleWrite"
    }

    fn params_mut(&mut self) -> Option<&mut dyn TaskParams> {
        Some(&mut self.params)
    }

    async fn execute(&mut self, scope: &mut TaskScope<'_>) -> Result<(), TaskError> {
        info!("{}: {}", scope.task_name(), self.params.message);
        scope.set_result(self.params.message.clone())
    }
}
