//! Transformation pipeline applied to a value during binding resolution

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::core::context::ExecutionContext;
use crate::core::error::BindingError;

type Stage = Box<dyn Fn(&ExecutionContext, Value) -> Result<Value, BindingError> + Send + Sync>;

/// Ordered chain of single-input/single-output transformations
///
/// Stages are applied strictly left to right; each stage's output becomes the
/// next stage's input. An empty pipeline is the identity function.
///
/// Stages are typed at the API surface: [`Pipeline::then`] takes a
/// `Fn(&ExecutionContext, I) -> O` and handles the conversion from and back to
/// the untyped blackboard value. A stage whose input does not deserialize into
/// its declared input type fails with a clear [`BindingError::TypeMismatch`]
/// rather than an unchecked cast.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Create an empty (identity) pipeline
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a typed transformation stage
    pub fn then<I, O, F>(mut self, transform: F) -> Self
    where
        I: DeserializeOwned,
        O: Serialize,
        F: Fn(&ExecutionContext, I) -> O + Send + Sync + 'static,
    {
        self.stages.push(Box::new(move |ctx, value| {
            let input: I =
                serde_json::from_value(value).map_err(|e| BindingError::TypeMismatch {
                    variable: String::from("<pipeline stage>"),
                    expected: std::any::type_name::<I>(),
                    message: e.to_string(),
                })?;
            serde_json::to_value(transform(ctx, input)).map_err(|e| BindingError::Serialize {
                variable: String::from("<pipeline stage>"),
                message: e.to_string(),
            })
        }));
        self
    }

    /// Run the whole chain over an initial value
    pub fn run(&self, ctx: &ExecutionContext, initial: Value) -> Result<Value, BindingError> {
        let mut value = initial;
        for stage in &self.stages {
            value = stage(ctx, value)?;
        }
        Ok(value)
    }

    /// Whether the pipeline has no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Number of stages in the chain
    pub fn len(&self) -> usize {
        self.stages.len()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}
