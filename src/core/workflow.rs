//! Workflow - the root of the task tree, owner of the execution context

use serde_json::Value;
use tracing::warn;

use crate::core::binding::InputBinding;
use crate::core::context::{ExecutionContext, StepOutcome};
use crate::core::error::WorkflowError;
use crate::core::task::{Noop, Task};
use crate::execution::engine::WorkflowEngine;

/// Index of a task node within a workflow's tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub(crate) usize);

pub(crate) struct TaskNode {
    pub(crate) name: String,
    pub(crate) parent: Option<TaskId>,
    pub(crate) children: Vec<TaskId>,
    pub(crate) task: Box<dyn Task>,
}

/// The root task: owns the execution context and the task tree
///
/// The tree is an arena of nodes with index-based child lists: it is built
/// fully (via [`Workflow::add_task`] and friends) before [`Workflow::start`]
/// runs it, and is not mutated during traversal. The workflow itself has an
/// empty body and never appears as a binding source.
///
/// Task names are caller-supplied and address blackboard slots; they must be
/// unique within a run. The engine does not enforce uniqueness - duplicate
/// names silently alias the same slot.
pub struct Workflow {
    name: String,
    context: ExecutionContext,
    nodes: Vec<TaskNode>,
}

impl Workflow {
    /// Root node of every workflow
    pub const ROOT: TaskId = TaskId(0);

    /// Create a workflow with a fresh execution context
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let root = TaskNode {
            name: name.clone(),
            parent: None,
            children: Vec::new(),
            task: Box::new(Noop),
        };
        Self {
            name,
            context: ExecutionContext::new(),
            nodes: vec![root],
        }
    }

    /// Workflow name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a task as a child of the root
    pub fn add_task(&mut self, name: impl Into<String>, task: impl Task + 'static) -> TaskId {
        self.add_child(Self::ROOT, name, task)
    }

    /// Attach a task as a child of the root, loading bindings into its params
    pub fn add_task_with_bindings(
        &mut self,
        name: impl Into<String>,
        task: impl Task + 'static,
        bindings: Vec<InputBinding>,
    ) -> TaskId {
        self.add_child_with_bindings(Self::ROOT, name, task, bindings)
    }

    /// Attach a task under an existing parent
    ///
    /// Children execute in insertion order, each subtree fully before the next
    /// sibling.
    pub fn add_child(
        &mut self,
        parent: TaskId,
        name: impl Into<String>,
        task: impl Task + 'static,
    ) -> TaskId {
        let name = name.into();
        if self.nodes.iter().any(|n| n.name.eq_ignore_ascii_case(&name)) {
            warn!(
                "task name `{}` is already in use; results will alias the same context slot",
                name
            );
        }
        let id = TaskId(self.nodes.len());
        self.nodes.push(TaskNode {
            name,
            parent: Some(parent),
            children: Vec::new(),
            task: Box::new(task),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Attach a task under an existing parent, loading bindings into its params
    pub fn add_child_with_bindings(
        &mut self,
        parent: TaskId,
        name: impl Into<String>,
        mut task: impl Task + 'static,
        bindings: Vec<InputBinding>,
    ) -> TaskId {
        match task.params_mut() {
            Some(params) => params.load_bindings(bindings),
            None => warn!("bindings supplied for a task without params; ignored"),
        }
        self.add_child(parent, name, task)
    }

    /// Run the workflow
    ///
    /// Fail-fast: the first task failure aborts the run and is returned here;
    /// results written before the failure stay queryable on the workflow.
    pub async fn start(&mut self) -> Result<(), WorkflowError> {
        WorkflowEngine::new().execute(self).await
    }

    /// Whether any task failed during the run
    pub fn has_failures(&self) -> bool {
        self.context.has_failures()
    }

    /// Whether every executed task succeeded
    pub fn all_succeeded(&self) -> bool {
        self.context.all_succeeded()
    }

    /// The last recorded failure, if any
    pub fn most_recent_failure(&self) -> Option<&StepOutcome> {
        self.context.most_recent_failure()
    }

    /// A task's primary output, if it produced one
    pub fn task_result(&self, task: &str) -> Option<&Value> {
        self.context.get_task_result(task)
    }

    /// A task's named output, if it produced one
    pub fn task_variable(&self, task: &str, variable: &str) -> Option<&Value> {
        self.context.get_task_variable(task, variable)
    }

    /// A variable from the `"Global"` scratch namespace
    pub fn global_variable(&self, variable: &str) -> Option<&Value> {
        self.context.get_global_variable(variable)
    }

    /// The shared context, for inspection after a run
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Mutable context access, e.g. to seed global variables before a run
    pub fn context_mut(&mut self) -> &mut ExecutionContext {
        &mut self.context
    }

    /// Pre-order traversal of the tree, children in insertion order
    pub(crate) fn preorder(&self) -> Vec<TaskId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            for &child in self.nodes[id.0].children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Split-borrow one node and the shared context
    pub(crate) fn node_and_context(
        &mut self,
        id: TaskId,
    ) -> (&mut TaskNode, &mut ExecutionContext) {
        (&mut self.nodes[id.0], &mut self.context)
    }

    /// Name of a task node
    pub fn task_name(&self, id: TaskId) -> &str {
        &self.nodes[id.0].name
    }

    /// Parent of a task node; `None` for the root
    pub fn parent(&self, id: TaskId) -> Option<TaskId> {
        self.nodes[id.0].parent
    }

    /// Number of tasks added to the tree, the root noop excluded
    pub fn task_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether no tasks have been added yet
    pub fn is_empty(&self) -> bool {
        self.task_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preorder_follows_insertion_order() {
        let mut wf = Workflow::new("test");
        let a = wf.add_task("A", Noop);
        let b = wf.add_task("B", Noop);
        let a1 = wf.add_child(a, "A1", Noop);
        let a2 = wf.add_child(a, "A2", Noop);
        let b1 = wf.add_child(b, "B1", Noop);

        let order = wf.preorder();
        assert_eq!(order, vec![Workflow::ROOT, a, a1, a2, b, b1]);
    }

    #[test]
    fn test_parent_back_references() {
        let mut wf = Workflow::new("test");
        let a = wf.add_task("A", Noop);
        let a1 = wf.add_child(a, "A1", Noop);

        assert_eq!(wf.parent(Workflow::ROOT), None);
        assert_eq!(wf.parent(a), Some(Workflow::ROOT));
        assert_eq!(wf.parent(a1), Some(a));
        assert_eq!(wf.task_name(a1), "A1");
        assert_eq!(wf.task_count(), 2);
    }

    #[test]
    fn test_task_count_excludes_root() {
        let mut wf = Workflow::new("empty");
        assert!(wf.is_empty());
        assert_eq!(wf.task_count(), 0);

        wf.add_task("A", Noop);
        assert!(!wf.is_empty());
        assert_eq!(wf.task_count(), 1);
    }
}
