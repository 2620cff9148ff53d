//! Closure-backed leaf task for inline steps

use async_trait::async_trait;

use crate::core::{Task, TaskError, TaskScope};

/// Wraps a closure as a task
///
/// Useful in tests and for one-off steps that do not warrant a dedicated task
/// type:
///
/// ```
/// use taskflow::tasks::FnTask;
///
/// let seed = FnTask::new(|scope| scope.set_result(88888888));
/// ```
pub struct FnTask<F> {
    body: F,
}

impl<F> FnTask<F>
where
    F: FnMut(&mut TaskScope<'_>) -> Result<(), TaskError> + Send,
{
    pub fn new(body: F) -> Self {
        Self { body }
    }
}

#[async_trait]
impl<F> Task for FnTask<F>
where
    F: FnMut(&mut TaskScope<'_>) -> Result<(), TaskError> + Send,
{
    fn kind(&self) -> &'static str {
        "FnTask"
    }

    async fn execute(&mut self, scope: &mut TaskScope<'_>) -> Result<(), TaskError> {
        (self.body)(scope)
    }
}
