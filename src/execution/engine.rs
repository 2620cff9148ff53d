//! Workflow engine - walks the task tree and drives each task's lifecycle

use tracing::{debug, error, info};

use crate::core::error::{TaskError, WorkflowError};
use crate::core::task::TaskScope;
use crate::core::workflow::{TaskId, Workflow};

/// Executes a workflow's task tree
///
/// Traversal is pre-order depth-first in insertion order, strictly sequential:
/// task N+1 never starts before task N's lifecycle has fully completed. The
/// engine is fail-fast: a task failure is logged, recorded into the shared
/// context, and propagated, aborting the remaining traversal while leaving
/// every previously written result queryable on the context.
///
/// No retries, no timeouts, no cancellation, no cycle detection - the tree is
/// built acyclically by the caller and the engine trusts it.
#[derive(Debug, Default)]
pub struct WorkflowEngine;

impl WorkflowEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run every task in the workflow's tree
    pub async fn execute(&self, workflow: &mut Workflow) -> Result<(), WorkflowError> {
        info!(
            "Starting workflow run: {} ({})",
            workflow.name(),
            workflow.context().run_id()
        );
        for id in workflow.preorder() {
            self.run_task(workflow, id).await?;
        }
        info!("Workflow run finished: {}", workflow.name());
        Ok(())
    }

    /// One task's lifecycle: bind, log, execute, record
    async fn run_task(&self, workflow: &mut Workflow, id: TaskId) -> Result<(), WorkflowError> {
        let (node, ctx) = workflow.node_and_context(id);
        let name = node.name.clone();
        debug!("Starting task: {} ({})", name, node.task.kind());

        match node.task.params_mut() {
            Some(params) => {
                if let Err(e) = params.load_results(ctx) {
                    error!("Error binding params of task {}: {}", name, e);
                    ctx.record_failure(&name, &e.to_string());
                    return Err(WorkflowError::TaskFailed {
                        task: name,
                        source: TaskError::Binding(e),
                    });
                }
                for (field, value) in params.snapshot() {
                    debug!("Task {} param {}:{}", name, field, value);
                }
            }
            None => debug!("Task {} has no params", name),
        }

        let mut scope = TaskScope::new(&name, ctx);
        match node.task.execute(&mut scope).await {
            Ok(()) => {
                ctx.record_success(&name);
                debug!("Completed task: {}", name);
                Ok(())
            }
            Err(e) => {
                error!("Error at task {}: {:#}", name, e);
                ctx.record_failure(&name, &e.to_string());
                Err(WorkflowError::TaskFailed {
                    task: name,
                    source: e,
                })
            }
        }
    }
}
