//! Input bindings and the per-params binding registry

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::core::context::{ExecutionContext, RESULT_VARIABLE};
use crate::core::error::BindingError;
use crate::core::pipeline::Pipeline;

/// Declarative pointer from a target parameter to another task's named output
///
/// A binding is resolved lazily: the source value is fetched from the context
/// only when the owning task is about to execute, so the source task does not
/// need to have run (or even exist) when the binding is declared.
#[derive(Debug)]
pub struct InputBinding {
    /// Name of the parameter field this binding populates
    pub target_variable: String,

    /// Name of the task whose output is consumed
    pub source_task: String,

    /// Name of the variable on the source task
    pub source_variable: String,

    pipeline: Pipeline,
}

impl InputBinding {
    /// Bind a target variable to an arbitrary (task, variable) output
    pub fn new(
        target_variable: impl Into<String>,
        source_task: impl Into<String>,
        source_variable: impl Into<String>,
    ) -> Self {
        Self {
            target_variable: target_variable.into(),
            source_task: source_task.into(),
            source_variable: source_variable.into(),
            pipeline: Pipeline::new(),
        }
    }

    /// Bind a target variable to a task's primary output (`"Result"`)
    pub fn result(target_variable: impl Into<String>, source_task: impl Into<String>) -> Self {
        Self::new(target_variable, source_task, RESULT_VARIABLE)
    }

    /// Attach a transformation pipeline to run on the source value
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Attach a single typed transformation to run on the source value
    pub fn with_transform<I, O, F>(self, transform: F) -> Self
    where
        I: DeserializeOwned,
        O: Serialize,
        F: Fn(&ExecutionContext, I) -> O + Send + Sync + 'static,
    {
        let pipeline = Pipeline::new().then(transform);
        self.with_pipeline(pipeline)
    }

    /// Whether the binding names both a source task and a source variable
    pub fn is_configured(&self) -> bool {
        !self.source_task.trim().is_empty() && !self.source_variable.trim().is_empty()
    }

    /// Fetch the source value and run it through the pipeline
    ///
    /// Returns `Ok(None)` when the source task has not produced the value yet;
    /// the caller must leave the target's static default untouched in that
    /// case.
    pub fn resolve(&self, ctx: &ExecutionContext) -> Result<Option<Value>, BindingError> {
        let Some(source) = ctx.get_task_variable(&self.source_task, &self.source_variable) else {
            debug!(
                "binding {}: no value yet at {}.{}, keeping default",
                self.target_variable, self.source_task, self.source_variable
            );
            return Ok(None);
        };
        let transformed = self.pipeline.run(ctx, source.clone()).map_err(|e| match e {
            BindingError::TypeMismatch {
                expected, message, ..
            } => BindingError::TypeMismatch {
                variable: self.target_variable.clone(),
                expected,
                message,
            },
            BindingError::Serialize { message, .. } => BindingError::Serialize {
                variable: self.target_variable.clone(),
                message,
            },
            other => other,
        })?;
        Ok(Some(transformed))
    }
}

/// Collection of bindings owned by one params object, keyed by target variable
///
/// Target variable lookup is case-insensitive, matching the blackboard's
/// addressing rules.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: Vec<InputBinding>,
}

impl BindingRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Replace the registered set with a new collection
    ///
    /// Loading an empty collection is a no-op and preserves whatever was
    /// previously loaded.
    pub fn load(&mut self, bindings: Vec<InputBinding>) {
        if bindings.is_empty() {
            return;
        }
        self.bindings = bindings;
    }

    /// Find the binding declared for a target variable, if any
    pub fn find(&self, target_variable: &str) -> Option<&InputBinding> {
        self.bindings
            .iter()
            .find(|b| b.target_variable.eq_ignore_ascii_case(target_variable))
    }

    /// Find-or-insert a plain binding for a target variable
    pub fn bind(
        &mut self,
        target_variable: &str,
        source_task: &str,
        source_variable: &str,
    ) -> &InputBinding {
        let position = self
            .bindings
            .iter()
            .position(|b| b.target_variable.eq_ignore_ascii_case(target_variable));
        let index = match position {
            Some(i) => i,
            None => {
                self.bindings
                    .push(InputBinding::new(target_variable, source_task, source_variable));
                self.bindings.len() - 1
            }
        };
        &self.bindings[index]
    }

    /// Get a binding that must exist and be fully configured
    pub fn required(&self, target_variable: &str) -> Result<&InputBinding, BindingError> {
        let binding = self
            .find(target_variable)
            .ok_or_else(|| BindingError::Missing(target_variable.to_string()))?;
        if !binding.is_configured() {
            return Err(BindingError::Unconfigured(target_variable.to_string()));
        }
        Ok(binding)
    }

    /// Resolve a target variable against the context
    ///
    /// `Ok(None)` when no binding was declared for the variable or the source
    /// value is absent - the target keeps its static default either way.
    pub fn resolve(
        &self,
        ctx: &ExecutionContext,
        target_variable: &str,
    ) -> Result<Option<Value>, BindingError> {
        match self.find(target_variable) {
            Some(binding) => binding.resolve(ctx),
            None => Ok(None),
        }
    }

    /// Typed resolution of a target variable
    pub fn resolve_as<T: DeserializeOwned>(
        &self,
        ctx: &ExecutionContext,
        target_variable: &str,
    ) -> Result<Option<T>, BindingError> {
        match self.resolve(ctx, target_variable)? {
            None => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| BindingError::TypeMismatch {
                    variable: target_variable.to_string(),
                    expected: std::any::type_name::<T>(),
                    message: e.to_string(),
                }),
        }
    }

    /// Typed resolution through a binding that must exist and be configured
    ///
    /// Source-value absence is still tolerated (`Ok(None)`), only the binding
    /// declaration itself is mandatory.
    pub fn required_as<T: DeserializeOwned>(
        &self,
        ctx: &ExecutionContext,
        target_variable: &str,
    ) -> Result<Option<T>, BindingError> {
        let binding = self.required(target_variable)?;
        match binding.resolve(ctx)? {
            None => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| BindingError::TypeMismatch {
                    variable: target_variable.to_string(),
                    expected: std::any::type_name::<T>(),
                    message: e.to_string(),
                }),
        }
    }

    /// Number of declared bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no bindings are declared
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
