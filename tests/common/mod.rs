//! Shared builders and a scripted in-memory backend for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use flowcanvas::api::{
    ExecutionHandle, ExecutionOverrides, ExecutionState, ExecutionStatus, StepResult,
    WorkflowBackend, WorkflowRecord,
};
use flowcanvas::config::CanvasSettings;
use flowcanvas::history::GraphHistoryStore;
use flowcanvas::mapper::WorkflowConfig;
use flowcanvas::workflow::{
    Edge, Node, NodeConfig, Position, SidePanelPayload, StaticCatalog, DEFAULT_EDGE_TYPE,
};
use flowcanvas::{BackendError, CanvasController, ExecutionTracker, Snapshot};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn payload(catalog_id: &str, config: NodeConfig) -> SidePanelPayload {
    SidePanelPayload::new(catalog_id, catalog_id, config)
}

pub fn node_with(id: &str, data: SidePanelPayload) -> Node {
    Node {
        id: id.to_string(),
        node_type: "command".to_string(),
        position: Position::new(0.0, 0.0),
        data,
        selected: false,
        dimensions: None,
    }
}

/// Agent node whose catalog id is "agent"
pub fn agent(id: &str) -> Node {
    node_with(
        id,
        payload(
            "agent",
            NodeConfig::Agent {
                agent_id: None,
                model: None,
                system_prompt: None,
            },
        ),
    )
}

/// Output node whose catalog id is "text_output"
pub fn output(id: &str) -> Node {
    node_with(id, payload("text_output", NodeConfig::Output { text: None }))
}

pub fn edge(id: &str, source: &str, target: &str) -> Edge {
    Edge {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
        source_handle: None,
        target_handle: None,
        data: None,
        edge_type: DEFAULT_EDGE_TYPE.to_string(),
        selected: false,
    }
}

pub fn status(state: ExecutionState, steps: &[(&str, Value)]) -> ExecutionStatus {
    ExecutionStatus {
        execution_id: Some("exec-1".to_string()),
        status: state,
        step_results: steps
            .iter()
            .map(|(id, data)| {
                (
                    id.to_string(),
                    StepResult {
                        status: Some("completed".to_string()),
                        output_data: json!({ "data": data }),
                        error: None,
                    },
                )
            })
            .collect::<HashMap<_, _>>(),
        error: None,
    }
}

/// What the fake backend does on each call
#[derive(Debug, Clone)]
pub enum PollScript {
    Status(ExecutionStatus),
    Fail,
}

#[derive(Debug, Default)]
pub struct Calls {
    pub saved: Vec<WorkflowConfig>,
    pub updated: Vec<(String, WorkflowConfig)>,
    pub executed: Vec<String>,
    pub polled: usize,
}

/// In-memory `WorkflowBackend` with scripted responses and failure switches
#[derive(Default)]
pub struct FakeBackend {
    pub calls: Mutex<Calls>,
    pub polls: Mutex<VecDeque<PollScript>>,
    pub records: Mutex<HashMap<String, WorkflowRecord>>,
    pub fail_save: bool,
    pub fail_execute: bool,
    pub save_without_id: bool,
    pub execute_without_id: bool,
    /// Cleared right after the next poll response is produced
    pub cancel_during_poll: Mutex<Option<ExecutionTracker>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_polls(self, polls: Vec<PollScript>) -> Self {
        *self.polls.lock().unwrap() = polls.into();
        self
    }

    pub fn with_record(self, record: WorkflowRecord) -> Self {
        let id = record.id.clone().unwrap_or_default();
        self.records.lock().unwrap().insert(id, record);
        self
    }

    fn failure(message: &str) -> BackendError {
        BackendError::Status {
            status: 500,
            body: message.to_string(),
        }
    }
}

#[async_trait]
impl WorkflowBackend for FakeBackend {
    async fn save(&self, config: &WorkflowConfig) -> Result<WorkflowRecord, BackendError> {
        if self.fail_save {
            return Err(Self::failure("save refused"));
        }
        self.calls.lock().unwrap().saved.push(config.clone());
        Ok(WorkflowRecord {
            id: if self.save_without_id {
                None
            } else {
                Some("wf-1".to_string())
            },
            name: Some(config.name.clone()),
            configuration: Some(config.clone()),
            created_at: None,
            updated_at: None,
        })
    }

    async fn update(
        &self,
        workflow_id: &str,
        config: &WorkflowConfig,
    ) -> Result<WorkflowRecord, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .updated
            .push((workflow_id.to_string(), config.clone()));
        Ok(WorkflowRecord {
            id: Some(workflow_id.to_string()),
            name: Some(config.name.clone()),
            configuration: Some(config.clone()),
            created_at: None,
            updated_at: None,
        })
    }

    async fn load(&self, workflow_id: &str) -> Result<WorkflowRecord, BackendError> {
        self.records
            .lock()
            .unwrap()
            .get(workflow_id)
            .cloned()
            .ok_or_else(|| BackendError::Status {
                status: 404,
                body: format!("workflow {} not found", workflow_id),
            })
    }

    async fn execute(
        &self,
        workflow_id: &str,
        _overrides: &ExecutionOverrides,
    ) -> Result<ExecutionHandle, BackendError> {
        if self.fail_execute {
            return Err(Self::failure("execute refused"));
        }
        self.calls.lock().unwrap().executed.push(workflow_id.to_string());
        Ok(ExecutionHandle {
            id: if self.execute_without_id {
                None
            } else {
                Some("exec-1".to_string())
            },
        })
    }

    async fn poll(&self, _execution_id: &str) -> Result<ExecutionStatus, BackendError> {
        self.calls.lock().unwrap().polled += 1;
        let next = self.polls.lock().unwrap().pop_front();
        let result = match next {
            Some(PollScript::Status(status)) => Ok(status),
            Some(PollScript::Fail) => Err(Self::failure("poll refused")),
            None => Ok(status(ExecutionState::Running, &[])),
        };
        if let Some(tracker) = self.cancel_during_poll.lock().unwrap().take() {
            tracker.clear();
        }
        result
    }
}

/// Controller over `snapshot` with a seeded rng and a fast poll interval
pub fn controller(snapshot: Snapshot, backend: Arc<FakeBackend>) -> CanvasController {
    controller_with(snapshot, backend, CanvasSettings::default())
}

/// Seeded controller with custom canvas settings
pub fn controller_with(
    snapshot: Snapshot,
    backend: Arc<FakeBackend>,
    settings: CanvasSettings,
) -> CanvasController {
    CanvasController::new(
        GraphHistoryStore::new(snapshot),
        backend,
        Arc::new(StaticCatalog::default()),
        settings,
    )
    .with_rng(StdRng::seed_from_u64(7))
    .with_poll_interval(Duration::from_millis(1))
}

/// A -> B -> Out, where Out is an output node
pub fn pipeline() -> Snapshot {
    Snapshot::new(
        vec![agent("A"), agent("B"), output("Out")],
        vec![edge("e1", "A", "B"), edge("e2", "B", "Out")],
    )
}
