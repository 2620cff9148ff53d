//! Leaf task that renders a `{{ key }}` template against a value map

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::core::{
    snapshot_field, truncate_for_log, BindingError, BindingRegistry, ExecutionContext,
    InputBinding, Task, TaskError, TaskParams, TaskScope,
};

/// Parameters for [`RenderTemplate`]
///
/// Binding targets: `Template`, `Values`.
#[derive(Debug, Default)]
pub struct RenderTemplateParams {
    /// Template text with `{{ key }}` placeholders
    pub template: String,

    /// Values substituted into the template
    pub values: Map<String, Value>,

    bindings: BindingRegistry,
}

impl RenderTemplateParams {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            values: Map::new(),
            bindings: BindingRegistry::new(),
        }
    }

    pub fn with_values(mut self, values: Map<String, Value>) -> Self {
        self.values = values;
        self
    }
}

impl TaskParams for RenderTemplateParams {
    fn load_bindings(&mut self, bindings: Vec<InputBinding>) {
        self.bindings.load(bindings);
    }

    fn load_results(&mut self, ctx: &ExecutionContext) -> Result<(), BindingError> {
        if let Some(template) = self.bindings.resolve_as::<String>(ctx, "Template")? {
            self.template = template;
        }
        if let Some(values) = self.bindings.resolve_as::<Map<String, Value>>(ctx, "Values")? {
            self.values = values;
        }
        Ok(())
    }

    fn snapshot(&self) -> Vec<(String, String)> {
        let mut out = vec![("Template".to_string(), truncate_for_log(&self.template))];
        snapshot_field(&mut out, "Values", &Value::Object(self.values.clone()));
        out
    }
}

/// Substitutes `{{ key }}` placeholders in a template and stores the rendered
/// string as its result
pub struct RenderTemplate {
    params: RenderTemplateParams,
}

impl RenderTemplate {
    pub fn new(params: RenderTemplateParams) -> Self {
        Self { params }
    }

    fn render(&self) -> String {
        let mut rendered = self.params.template.clone();
        for (key, value) in &self.params.values {
            let placeholder = format!("{{{{ {} }}}}", key);
            let replacement = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            rendered = rendered.replace(&placeholder, &replacement);
        }
        rendered
    }
}

#[async_trait]
impl Task for RenderTemplate {
    fn kind(&self) -> &'static str {
        "RenderTemplate"
    }

    fn params_mut(&mut self) -> Option<&mut dyn TaskParams> {
        Some(&mut self.params)
    }

    async fn execute(&mut self, scope: &mut TaskScope<'_>) -> Result<(), TaskError> {
        scope.set_result(self.render())
    }
}
