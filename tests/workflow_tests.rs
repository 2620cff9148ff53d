//! End-to-end workflow scenarios exercising the public API

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use async_trait::async_trait;
use taskflow::core::{
    BindingError, BindingRegistry, ExecutionContext, InputBinding, Task, TaskError, TaskParams,
    TaskScope, Workflow,
};
use taskflow::tasks::{ConsoleWrite, ConsoleWriteParams, FnTask, RaiseError, RaiseErrorParams};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Minimal custom task: stores its (bindable) numeric input as its result
struct EchoParams {
    input: i64,
    bindings: BindingRegistry,
}

impl EchoParams {
    fn new(input: i64) -> Self {
        Self {
            input,
            bindings: BindingRegistry::new(),
        }
    }
}

impl TaskParams for EchoParams {
    fn load_bindings(&mut self, bindings: Vec<InputBinding>) {
        self.bindings.load(bindings);
    }

    fn load_results(&mut self, ctx: &ExecutionContext) -> Result<(), BindingError> {
        if let Some(input) = self.bindings.resolve_as::<i64>(ctx, "Input")? {
            self.input = input;
        }
        Ok(())
    }

    fn snapshot(&self) -> Vec<(String, String)> {
        vec![("Input".to_string(), self.input.to_string())]
    }
}

struct Echo {
    params: EchoParams,
}

impl Echo {
    fn new(params: EchoParams) -> Self {
        Self { params }
    }
}

#[async_trait]
impl Task for Echo {
    fn kind(&self) -> &'static str {
        "Echo"
    }

    fn params_mut(&mut self) -> Option<&mut dyn TaskParams> {
        Some(&mut self.params)
    }

    async fn execute(&mut self, scope: &mut TaskScope<'_>) -> Result<(), TaskError> {
        scope.set_result(self.params.input)
    }
}

#[tokio::test]
async fn test_two_task_chain_passes_result_through_identity_binding() {
    init_tracing();
    let mut wf = Workflow::new("chain");
    wf.add_task("A", FnTask::new(|scope| scope.set_result(42)));
    wf.add_task_with_bindings(
        "B",
        Echo::new(EchoParams::new(0)),
        vec![InputBinding::result("Input", "A")],
    );

    wf.start().await.unwrap();

    assert!(wf.all_succeeded());
    assert_eq!(wf.task_result("A"), Some(&json!(42)));
    assert_eq!(wf.task_result("B"), Some(&json!(42)));
}

#[tokio::test]
async fn test_missing_binding_keeps_static_default() {
    init_tracing();
    let mut wf = Workflow::new("defaults");
    wf.add_task_with_bindings(
        "write1",
        ConsoleWrite::new(ConsoleWriteParams::with_message("hello")),
        vec![InputBinding::result("Message", "NeverScheduled")],
    );

    wf.start().await.unwrap();

    assert_eq!(wf.task_result("write1"), Some(&json!("hello")));
}

#[tokio::test]
async fn test_failure_propagation_preserves_partial_results() {
    init_tracing();
    let mut wf = Workflow::new("failing");
    wf.add_task("A", FnTask::new(|scope| scope.set_result("a done")));
    wf.add_task("B", RaiseError::new(RaiseErrorParams::new("boom")));
    wf.add_task("C", FnTask::new(|scope| scope.set_result("c done")));

    let err = wf.start().await.unwrap_err();
    assert_eq!(err.task_name(), "B");
    assert!(err.to_string().contains("boom"));

    assert!(wf.has_failures());
    assert!(!wf.all_succeeded());

    let failure = wf.most_recent_failure().unwrap();
    assert_eq!(failure.task, "B");
    assert_eq!(failure.error.as_deref(), Some("boom"));

    // A's result survives the aborted run
    assert_eq!(wf.task_result("A"), Some(&json!("a done")));
    // fail-fast: C never ran
    assert!(wf.task_result("C").is_none());
    assert!(!wf.context().outcomes().iter().any(|o| o.task == "C"));
}

#[tokio::test]
async fn test_binding_resolution_error_fails_the_owning_task() {
    init_tracing();
    let mut wf = Workflow::new("bad types");
    wf.add_task("A", FnTask::new(|scope| scope.set_result("not a number")));
    wf.add_task_with_bindings(
        "B",
        Echo::new(EchoParams::new(0)),
        vec![InputBinding::result("Input", "A")],
    );

    let err = wf.start().await.unwrap_err();
    assert_eq!(err.task_name(), "B");

    let failure = wf.most_recent_failure().unwrap();
    assert_eq!(failure.task, "B");
    assert!(failure.error.as_deref().unwrap().contains("type mismatch"));
}

#[tokio::test]
async fn test_children_run_depth_first_in_insertion_order() {
    init_tracing();
    let mut wf = Workflow::new("tree");
    let a = wf.add_task("A", FnTask::new(|scope| scope.set_result("a")));
    wf.add_child(a, "A1", FnTask::new(|scope| scope.set_result("a1")));
    wf.add_child(a, "A2", FnTask::new(|scope| scope.set_result("a2")));
    let b = wf.add_task("B", FnTask::new(|scope| scope.set_result("b")));
    wf.add_child(b, "B1", FnTask::new(|scope| scope.set_result("b1")));

    wf.start().await.unwrap();

    let order: Vec<&str> = wf
        .context()
        .outcomes()
        .iter()
        .map(|o| o.task.as_str())
        .collect();
    assert_eq!(order, vec!["tree", "A", "A1", "A2", "B", "B1"]);
}

#[tokio::test]
async fn test_binding_from_global_scratch_namespace() {
    init_tracing();
    let mut wf = Workflow::new("global");
    wf.context_mut().set_global_variable("greeting", json!("hello from global"));
    wf.add_task_with_bindings(
        "write1",
        ConsoleWrite::new(ConsoleWriteParams::new()),
        vec![InputBinding::new("Message", "Global", "greeting")],
    );

    wf.start().await.unwrap();

    assert_eq!(wf.task_result("write1"), Some(&json!("hello from global")));
}

// --- end-to-end literal scenario -------------------------------------------
//
// Task1 produces the scalar 88888888; Task2 receives it as a parameter map
// and produces a typed single row; Task3 turns the first row's Id into a
// string and reports it as its result.

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IdRow {
    #[serde(rename = "Id")]
    id: i64,
}

/// Stand-in for a SQL task: echoes the `Id` of its execution params back as a
/// single-row result set
struct StubQueryParams {
    execution_params: Map<String, Value>,
    bindings: BindingRegistry,
}

impl StubQueryParams {
    fn new() -> Self {
        Self {
            execution_params: Map::new(),
            bindings: BindingRegistry::new(),
        }
    }
}

impl TaskParams for StubQueryParams {
    fn load_bindings(&mut self, bindings: Vec<InputBinding>) {
        self.bindings.load(bindings);
    }

    fn load_results(&mut self, ctx: &ExecutionContext) -> Result<(), BindingError> {
        if let Some(params) = self
            .bindings
            .resolve_as::<Map<String, Value>>(ctx, "ExecutionParams")?
        {
            self.execution_params = params;
        }
        Ok(())
    }

    fn snapshot(&self) -> Vec<(String, String)> {
        self.execution_params
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

struct StubQuery {
    params: StubQueryParams,
}

impl StubQuery {
    fn new(params: StubQueryParams) -> Self {
        Self { params }
    }
}

#[async_trait]
impl Task for StubQuery {
    fn kind(&self) -> &'static str {
        "StubQuery"
    }

    fn params_mut(&mut self) -> Option<&mut dyn TaskParams> {
        Some(&mut self.params)
    }

    async fn execute(&mut self, scope: &mut TaskScope<'_>) -> Result<(), TaskError> {
        let id = self
            .params
            .execution_params
            .get("Id")
            .and_then(Value::as_i64)
            .ok_or_else(|| TaskError::failed("missing execution param `Id`"))?;
        scope.set_result(vec![IdRow { id }])
    }
}

#[tokio::test]
async fn test_scalar_result_flows_through_query_into_message() {
    init_tracing();
    let value: i64 = 88888888;

    let mut wf = Workflow::new("test");
    wf.add_task(
        "ExecSql1",
        FnTask::new(move |scope| scope.set_result(value)),
    );
    wf.add_task_with_bindings(
        "ExecSql2",
        StubQuery::new(StubQueryParams::new()),
        vec![
            InputBinding::result("ExecutionParams", "ExecSql1")
                .with_transform(|_, x: i64| json!({ "Id": x })),
        ],
    );
    wf.add_task_with_bindings(
        "write1",
        ConsoleWrite::new(ConsoleWriteParams::new()),
        vec![InputBinding::result("Message", "ExecSql2").with_transform(
            |_, rows: Vec<IdRow>| {
                rows.first()
                    .map(|row| row.id.to_string())
                    .unwrap_or_default()
            },
        )],
    );

    wf.start().await.unwrap();

    assert!(wf.all_succeeded());
    assert_eq!(wf.task_result("ExecSql1"), Some(&json!(value)));
    assert_eq!(wf.task_result("ExecSql2"), Some(&json!([{ "Id": value }])));
    assert_eq!(wf.task_result("write1"), Some(&json!("88888888")));
}
