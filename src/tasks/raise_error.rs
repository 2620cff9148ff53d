//! Leaf task that always fails, for exercising the failure path

use async_trait::async_trait;

use crate::core::{
    truncate_for_log, BindingError, BindingRegistry, ExecutionContext, InputBinding, Task,
    TaskError, TaskParams, TaskScope,
};

/// Parameters for [`RaiseError`]
///
/// Binding target: `Message`.
#[derive(Debug, Default)]
pub struct RaiseErrorParams {
    /// The error message the task fails with
    pub message: String,

    bindings: BindingRegistry,
}

impl RaiseErrorParams {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            bindings: BindingRegistry::new(),
        }
    }
}

impl TaskParams for RaiseErrorParams {
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

/// Fails with the configured message
///
/// Used to test failure recording and fail-fast propagation end to end.
pub struct RaiseError {
    params: RaiseErrorParams,
}

impl RaiseError {
    pub fn new(params: RaiseErrorParams) -> Self {
        Self { params }
    }
}

#[async_trait]
impl Task for RaiseError {
    fn kind(&self) -> &'static str {
        "RaiseError"
    }

    fn params_mut(&mut self) -> Option<&mut dyn TaskParams> {
        Some(&mut self.params)
    }

    async fn execute(&mut self, _scope: &mut TaskScope<'_>) -> Result<(), TaskError> {
        Err(TaskError::failed(self.params.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fails_with_configured_message() {
        let mut ctx = ExecutionContext::new();
        let mut task = RaiseError::new(RaiseErrorParams::new("This is a test exception"));

        let mut scope = TaskScope::new("thrower", &mut ctx);
        let err = task.execute(&mut scope).await.unwrap_err();

        assert_eq!(err.to_string(), "This is a test exception");
    }
}
