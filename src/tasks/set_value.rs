//! Leaf task that stores a static (or bound) value as its result

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{
    snapshot_field, BindingError, BindingRegistry, ExecutionContext, InputBinding, Task, TaskError,
    TaskParams, TaskScope,
};

/// Parameters for [`SetValue`]
///
/// Binding target: `Value`.
#[derive(Debug, Default)]
pub struct SetValueParams {
    /// The value to store; may be replaced by a binding at execution time
    pub value: Value,

    bindings: BindingRegistry,
}

impl SetValueParams {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            bindings: BindingRegistry::new(),
        }
    }
}

impl TaskParams for SetValueParams {
    fn load_bindings(&mut self, bindings: Vec<InputBinding>) {
        self.bindings.load(bindings);
    }

    fn load_results(&mut self, ctx: &ExecutionContext) -> Result<(), BindingError> {
        if let Some(value) = self.bindings.resolve(ctx, "Value")? {
            self.value = value;
        }
        Ok(())
    }

    fn snapshot(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        snapshot_field(&mut out, "Value", &self.value);
        out
    }
}

/// Writes a value into the context under its own name
///
/// Handy for seeding a run with literals and as the simplest example of the
/// task plugin contract.
pub struct SetValue {
    params: SetValueParams,
}

impl SetValue {
    pub fn new(params: SetValueParams) -> Self {
        Self { params }
    }
}

#[async_trait]
impl Task for SetValue {
    fn kind(&self) -> &'static str {
        "SetValue"
    }

    fn params_mut(&mut self) -> Option<&mut dyn TaskParams> {
        Some(&mut self.params)
    }

    async fn execute(&mut self, scope: &mut TaskScope<'_>) -> Result<(), TaskError> {
        scope.set_result(self.params.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_value_stores_result() {
        let mut ctx = ExecutionContext::new();
        let mut task = SetValue::new(SetValueParams::new(json!({"rows": 3})));

        let mut scope = TaskScope::new("seed", &mut ctx);
        task.execute(&mut scope).await.unwrap();

        assert_eq!(ctx.get_task_result("seed"), Some(&json!({"rows": 3})));
    }
}
