//! Command surface for canvas graph mutation
//!
//! The controller is the only writer of the graph for one editing session. It
//! turns renderer changes and UI intents into history commits, derives view
//! state, and runs the save-execute-poll chain for previews.

use crate::api::{
    ExecutionOverrides, ExecutionState, ExecutionStatus, WorkflowBackend, WorkflowRecord,
};
use crate::canvas::changes::{partition, Connection, EdgeChange, NodeChange};
use crate::canvas::drop::DropCommand;
use crate::canvas::results::apply_results;
use crate::canvas::view::{NodeViewState, ViewIntent};
use crate::canvas::viewport::Viewport;
use crate::config::{CanvasSettings, Config};
use crate::error::{MappingError, SessionError};
use crate::history::{CommitOptions, GraphHistoryStore};
use crate::mapper::{
    from_workflow_config, snapshot_to_workflow_config, validate_graph, WorkflowMeta,
};
use crate::runtime::{ExecutionPhase, ExecutionPoller, ExecutionTracker, PollOutcome};
use crate::workflow::{
    Edge, EdgeData, Node, OutputCatalog, Position, SidePanelPayload, Snapshot, StaticCatalog,
    DEFAULT_EDGE_TYPE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Canvas command API over a `GraphHistoryStore`
pub struct CanvasController {
    history: GraphHistoryStore,
    backend: Arc<dyn WorkflowBackend>,
    catalog: Arc<dyn OutputCatalog>,
    settings: CanvasSettings,
    viewport: Viewport,
    selected_node_id: Option<String>,
    workflow_id: Option<String>,
    meta: WorkflowMeta,
    overrides: ExecutionOverrides,
    tracker: ExecutionTracker,
    phase: ExecutionPhase,
    poll_interval: Duration,
    rng: StdRng,
    edge_seq: u64,
}

impl std::fmt::Debug for CanvasController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasController")
            .field("nodes", &self.history.snapshot().nodes.len())
            .field("edges", &self.history.snapshot().edges.len())
            .field("selected_node_id", &self.selected_node_id)
            .field("workflow_id", &self.workflow_id)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl CanvasController {
    /// Create a controller over `history` with its collaborators
    pub fn new(
        history: GraphHistoryStore,
        backend: Arc<dyn WorkflowBackend>,
        catalog: Arc<dyn OutputCatalog>,
        settings: CanvasSettings,
    ) -> Self {
        let viewport = settings.default_viewport;
        Self {
            history,
            backend,
            catalog,
            settings,
            viewport,
            selected_node_id: None,
            workflow_id: None,
            meta: WorkflowMeta::default(),
            overrides: ExecutionOverrides::default(),
            tracker: ExecutionTracker::new(),
            phase: ExecutionPhase::Idle,
            poll_interval: Duration::from_millis(200),
            rng: StdRng::from_os_rng(),
            edge_seq: 0,
        }
    }

    /// Empty canvas wired from application config
    pub fn from_config(config: &Config, backend: Arc<dyn WorkflowBackend>) -> Self {
        let catalog = Arc::new(StaticCatalog::new(config.catalog.output_node_ids.iter().cloned()));
        Self::new(GraphHistoryStore::default(), backend, catalog, config.canvas.clone())
            .with_poll_interval(config.execution.poll_interval())
    }

    /// Use a specific random source for placement jitter
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Delay between status polls while following an execution
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    // ---- read accessors -------------------------------------------------

    /// Current graph snapshot
    pub fn snapshot(&self) -> &Arc<Snapshot> {
        self.history.snapshot()
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.history.snapshot().nodes
    }

    pub fn edges(&self) -> &[Arc<Edge>] {
        &self.history.snapshot().edges
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Node shown in the side panel
    ///
    /// Follows the graph's selection flags after every commit, undo and redo.
    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node_id.as_deref()
    }

    /// Aggregate expansion state, recomputed from the live nodes
    pub fn node_view_state(&self) -> NodeViewState {
        NodeViewState::of(self.history.snapshot())
    }

    pub fn workflow_id(&self) -> Option<&str> {
        self.workflow_id.as_deref()
    }

    pub fn meta(&self) -> &WorkflowMeta {
        &self.meta
    }

    /// Replace the name and description used on the next save
    pub fn set_meta(&mut self, meta: WorkflowMeta) {
        self.meta = meta;
    }

    /// Inputs and config overrides sent with the next execute request
    pub fn set_execution_overrides(&mut self, overrides: ExecutionOverrides) {
        self.overrides = overrides;
    }

    /// Viewport used to center new nodes placed without a position
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Execution id currently being followed, if any
    pub fn execution_id(&self) -> Option<String> {
        self.tracker.current()
    }

    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    /// Shared handle for cancelling polling from another task
    pub fn tracker(&self) -> ExecutionTracker {
        self.tracker.clone()
    }

    // ---- history --------------------------------------------------------

    /// Step back to the previous checkpoint; a no-op when there is none
    ///
    /// The selected node is re-derived from the restored snapshot.
    pub fn undo(&mut self) {
        self.history.undo();
        self.sync_selected_node();
    }

    /// Re-apply the most recently undone checkpoint, if any
    pub fn redo(&mut self) {
        self.history.redo();
        self.sync_selected_node();
    }

    fn commit_if_changed(&mut self, next: Option<Snapshot>, options: CommitOptions) -> bool {
        match next {
            Some(snapshot) => {
                self.history.commit(|_| snapshot, options);
                true
            }
            None => false,
        }
    }

    // ---- node changes ---------------------------------------------------

    /// Apply a batch of renderer node changes
    ///
    /// Structural changes are always recorded and land first, so a node added
    /// in a batch can be moved or selected by the same batch. Movement and
    /// selection are then committed according to the settings flags.
    pub fn apply_node_changes(&mut self, changes: Vec<NodeChange>) {
        let (movement, selection, structural) = partition(changes);

        if !structural.is_empty() {
            let next = apply_structural(self.history.snapshot(), structural);
            if self.commit_if_changed(next, CommitOptions::recorded()) {
                self.sync_selected_node();
            }
        }

        if !movement.is_empty() {
            let snap_grid = self.settings.snap_grid;
            let next = apply_movement(self.history.snapshot(), &movement, snap_grid);
            let options = CommitOptions::recording(self.settings.record_movement);
            self.commit_if_changed(next, options);
        }

        if !selection.is_empty() {
            let next = apply_node_selection(self.history.snapshot(), &selection);
            let options = CommitOptions::recording(self.settings.record_selection);
            if self.commit_if_changed(next, options) {
                self.sync_selected_node();
            }
        }
    }

    /// A single selected node becomes the panel node and no selection clears
    /// it. With several selected, the current id survives only if it is one
    /// of them.
    fn sync_selected_node(&mut self) {
        let selected: Vec<&Arc<Node>> = self.history.snapshot().selected_nodes().collect();
        self.selected_node_id = match selected.as_slice() {
            [] => None,
            [only] => Some(only.id.clone()),
            many => self
                .selected_node_id
                .take()
                .filter(|current| many.iter().any(|n| &n.id == current)),
        };
    }

    // ---- edge changes ---------------------------------------------------

    /// Apply a batch of renderer edge changes; adds and removes are recorded
    pub fn apply_edge_changes(&mut self, changes: Vec<EdgeChange>) {
        let (selection, structural): (Vec<_>, Vec<_>) = changes
            .into_iter()
            .partition(|change| matches!(change, EdgeChange::Select { .. }));

        if !structural.is_empty() {
            let next = apply_edge_structure(self.history.snapshot(), structural);
            self.commit_if_changed(next, CommitOptions::recorded());
        }

        if !selection.is_empty() {
            let next = apply_edge_selection(self.history.snapshot(), &selection);
            let options = CommitOptions::recording(self.settings.record_selection);
            self.commit_if_changed(next, options);
        }
    }

    /// Connect two nodes; returns the new edge id
    ///
    /// Connections to unknown nodes are ignored.
    pub fn connect(&mut self, connection: Connection) -> Option<String> {
        let snapshot = self.history.snapshot();
        let (source, target) = (&connection.source, &connection.target);
        if !snapshot.contains_node(source) || !snapshot.contains_node(target) {
            tracing::warn!(
                "Ignoring connection {} -> {}: unknown node",
                connection.source,
                connection.target
            );
            return None;
        }

        let id = self.next_edge_id(&connection.source, &connection.target);
        let data = if connection.label.is_some() || connection.action_type.is_some() {
            Some(EdgeData {
                label: connection.label,
                action_type: connection.action_type,
            })
        } else {
            None
        };
        let edge = Arc::new(Edge {
            id: id.clone(),
            source: connection.source,
            target: connection.target,
            source_handle: connection.source_handle,
            target_handle: connection.target_handle,
            data,
            edge_type: DEFAULT_EDGE_TYPE.to_string(),
            selected: false,
        });

        tracing::debug!("🔗 Connected {} -> {} as {}", edge.source, edge.target, id);
        self.history.commit(
            |prev| {
                let mut next = prev.clone();
                next.edges.push(edge);
                next
            },
            CommitOptions::recorded(),
        );
        Some(id)
    }

    /// Source, target, wall-clock millis and a per-session sequence number
    fn next_edge_id(&mut self, source: &str, target: &str) -> String {
        self.edge_seq += 1;
        format!(
            "e-{}-{}-{}-{}",
            source,
            target,
            chrono::Utc::now().timestamp_millis(),
            self.edge_seq
        )
    }

    // ---- node commands --------------------------------------------------

    /// Add a node at `position`, or near the viewport center when absent
    ///
    /// New nodes start expanded and flagged as new. Returns the node id.
    pub fn add_node_at_position(
        &mut self,
        mut payload: SidePanelPayload,
        position: Option<Position>,
    ) -> String {
        let position = match position {
            Some(explicit) => match self.settings.snap_grid {
                Some(grid) => explicit.snapped(grid),
                None => explicit,
            },
            None => self.jittered_center(),
        };

        payload.node_details.is_expanded = true;
        payload.node_details.is_new_item = true;

        let id = uuid::Uuid::new_v4().to_string();
        let node = Arc::new(Node {
            id: id.clone(),
            node_type: payload.category().traits().node_type.to_string(),
            position,
            data: payload,
            selected: false,
            dimensions: None,
        });

        tracing::debug!(
            "➕ Added node {} ({}) at ({:.1}, {:.1})",
            id,
            node.data.id,
            position.x,
            position.y
        );
        self.history.commit(
            |prev| {
                let mut next = prev.clone();
                next.nodes.push(node);
                next
            },
            CommitOptions::recorded(),
        );
        id
    }

    fn jittered_center(&mut self) -> Position {
        let center = self.viewport.center();
        let jitter = self.settings.placement_jitter.abs();
        Position::new(
            center.x + self.rng.random_range(-jitter..=jitter),
            center.y + self.rng.random_range(-jitter..=jitter),
        )
    }

    /// Create a node from a palette drop; malformed drops are discarded
    pub fn handle_drop(
        &mut self,
        command: DropCommand,
        position: Option<Position>,
    ) -> Option<String> {
        let payload = command.into_payload()?;
        Some(self.add_node_at_position(payload, position))
    }

    /// Replace one node's payload with `updater(current)`
    ///
    /// Returns false if the node is unknown.
    pub fn update_node_data<F>(&mut self, node_id: &str, updater: F) -> bool
    where
        F: FnOnce(&SidePanelPayload) -> SidePanelPayload,
    {
        let snapshot = self.history.snapshot();
        let Some(index) = snapshot.nodes.iter().position(|n| n.id == node_id) else {
            return false;
        };

        let mut updated = Node::clone(&snapshot.nodes[index]);
        updated.data = updater(&updated.data);
        let updated = Arc::new(updated);

        self.history.commit(
            |prev| {
                let mut next = prev.clone();
                next.nodes[index] = updated;
                next
            },
            CommitOptions::recorded(),
        );
        true
    }

    /// Remove a node and every edge touching it
    pub fn delete_node_by_id(&mut self, node_id: &str) -> bool {
        let Some(next) = without_nodes(self.history.snapshot(), &HashSet::from([node_id])) else {
            return false;
        };

        tracing::debug!("🗑️ Deleted node {}", node_id);
        self.history.commit(|_| next, CommitOptions::recorded());
        self.sync_selected_node();
        true
    }

    /// Expand, collapse or toggle one node (`Some(id)`) or every node (`None`)
    ///
    /// Toggling all nodes expands everything unless everything is already
    /// expanded. Returns the resulting aggregate view state.
    pub fn node_view_change(
        &mut self,
        node_id: Option<&str>,
        intent: Option<ViewIntent>,
    ) -> NodeViewState {
        let snapshot = self.history.snapshot();
        let target_for = |node: &Node| -> Option<bool> {
            match node_id {
                Some(id) if node.id != id => None,
                Some(_) => Some(ViewIntent::resolve(intent, node.data.node_details.is_expanded)),
                None => None,
            }
        };

        let all_target = match (node_id, intent) {
            (Some(_), _) => None,
            (None, Some(_)) => Some(ViewIntent::resolve(intent, false)),
            (None, None) => Some(NodeViewState::of(snapshot) != NodeViewState::Expanded),
        };

        let mut changed = false;
        let nodes: Vec<Arc<Node>> = snapshot
            .nodes
            .iter()
            .map(|node| {
                let target = all_target.or_else(|| target_for(node));
                match target {
                    Some(expanded) if expanded != node.data.node_details.is_expanded => {
                        changed = true;
                        let mut next = Node::clone(node);
                        next.data.node_details.is_expanded = expanded;
                        Arc::new(next)
                    }
                    _ => Arc::clone(node),
                }
            })
            .collect();

        if changed {
            let edges = snapshot.edges.clone();
            self.history
                .commit(|_| Snapshot { nodes, edges }, CommitOptions::recorded());
        }
        self.node_view_state()
    }

    // ---- lifecycle ------------------------------------------------------

    /// Replace the whole graph and make it the new history root
    ///
    /// Duplicate node ids keep their first occurrence and edges to unknown
    /// nodes are dropped.
    pub fn reset_canvas(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        let mut seen = HashSet::new();
        let nodes: Vec<Node> = nodes.into_iter().filter(|n| seen.insert(n.id.clone())).collect();
        let edges: Vec<Edge> = edges
            .into_iter()
            .filter(|e| {
                let ok = seen.contains(&e.source) && seen.contains(&e.target);
                if !ok {
                    tracing::warn!("Dropping edge {} with unknown endpoint on reset", e.id);
                }
                ok
            })
            .collect();

        tracing::info!("🧹 Canvas reset with {} nodes and {} edges", nodes.len(), edges.len());
        self.history.reset(Snapshot::new(nodes, edges));
        self.selected_node_id = None;
        self.sync_selected_node();
    }

    /// Empty the canvas
    pub fn clear_canvas(&mut self) {
        self.reset_canvas(Vec::new(), Vec::new());
    }

    /// Start a new, unsaved workflow
    pub fn new_workflow(&mut self, meta: WorkflowMeta) {
        self.cancel_execution();
        self.workflow_id = None;
        self.meta = meta;
        self.phase = ExecutionPhase::Idle;
        self.clear_canvas();
    }

    /// Replace the canvas with a saved workflow and bind its id
    pub fn load_workflow(&mut self, record: &WorkflowRecord) -> Result<(), MappingError> {
        let (nodes, edges, meta) = match &record.configuration {
            Some(config) => {
                let snapshot = from_workflow_config(config)?;
                let nodes = snapshot.nodes.iter().map(|n| Node::clone(n)).collect();
                let edges = snapshot.edges.iter().map(|e| Edge::clone(e)).collect();
                (nodes, edges, config.meta())
            }
            None => (Vec::new(), Vec::new(), WorkflowMeta::default()),
        };

        self.cancel_execution();
        self.phase = ExecutionPhase::Idle;
        self.meta = match &record.name {
            Some(name) => WorkflowMeta {
                name: name.clone(),
                ..meta
            },
            None => meta,
        };
        self.workflow_id = record.workflow_id().map(str::to_string);
        self.reset_canvas(nodes, edges);
        tracing::info!("📥 Loaded workflow {:?} ({})", self.workflow_id, self.meta.name);
        Ok(())
    }

    /// Fetch a saved workflow from the backend and load it
    pub async fn open_workflow(&mut self, workflow_id: &str) -> Result<(), SessionError> {
        let backend = Arc::clone(&self.backend);
        let mut record = backend
            .load(workflow_id)
            .await
            .map_err(|e| SessionError::backend("load", e))?;
        if record.workflow_id().is_none() {
            record.id = Some(workflow_id.to_string());
        }
        self.load_workflow(&record)?;
        Ok(())
    }

    // ---- execution ------------------------------------------------------

    /// Save (create or update) the current graph, start an execution and track it
    ///
    /// Returns the execution id. On failure the graph is untouched and no
    /// execution is tracked, so the call can simply be retried.
    pub async fn run_preview(&mut self) -> Result<String, SessionError> {
        self.tracker.clear();
        self.phase = ExecutionPhase::Submitted;

        match self.submit_preview().await {
            Ok(execution_id) => {
                self.tracker.track(execution_id.clone());
                tracing::info!("🚀 Preview execution {} submitted", execution_id);
                Ok(execution_id)
            }
            Err(e) => {
                tracing::error!("❌ Preview failed: {}", e);
                self.tracker.clear();
                self.phase = ExecutionPhase::Failed;
                Err(e)
            }
        }
    }

    async fn submit_preview(&mut self) -> Result<String, SessionError> {
        let snapshot = Arc::clone(self.history.snapshot());
        validate_graph(&snapshot)?;
        let config = snapshot_to_workflow_config(&snapshot, &self.meta);
        let backend = Arc::clone(&self.backend);

        let record = match self.workflow_id.clone() {
            Some(id) => backend
                .update(&id, &config)
                .await
                .map_err(|e| SessionError::backend("update", e))?,
            None => backend
                .save(&config)
                .await
                .map_err(|e| SessionError::backend("save", e))?,
        };

        let workflow_id = match record.workflow_id() {
            Some(id) => id.to_string(),
            None => self.workflow_id.clone().ok_or(SessionError::MissingWorkflowId)?,
        };
        if self.workflow_id.as_deref() != Some(workflow_id.as_str()) {
            tracing::info!("💾 Workflow saved as {}", workflow_id);
            self.workflow_id = Some(workflow_id.clone());
        }

        let handle = backend
            .execute(&workflow_id, &self.overrides)
            .await
            .map_err(|e| SessionError::backend("execute", e))?;
        handle
            .execution_id()
            .map(str::to_string)
            .ok_or(SessionError::MissingExecutionId)
    }

    /// Poller over this controller's backend and tracker
    pub fn poller(&self) -> ExecutionPoller {
        ExecutionPoller::new(Arc::clone(&self.backend), self.tracker.clone(), self.poll_interval)
    }

    /// Poll the tracked execution to its end and apply its results once
    pub async fn follow_execution(&mut self) -> Result<ExecutionPhase, SessionError> {
        let execution_id = self.tracker.current().ok_or(SessionError::NotTracking)?;
        self.phase = ExecutionPhase::Polling;

        match self.poller().run(&execution_id).await {
            Ok(PollOutcome::Terminal(status)) => {
                let updated = self.apply_execution_results(&status);
                self.phase = if status.status == ExecutionState::Completed {
                    ExecutionPhase::Completed
                } else {
                    ExecutionPhase::Failed
                };
                tracing::info!(
                    "🎉 Execution {} ended {:?}, {} output nodes updated",
                    execution_id,
                    self.phase,
                    updated
                );
                Ok(self.phase)
            }
            Ok(PollOutcome::Cancelled) => {
                self.phase = ExecutionPhase::Idle;
                Ok(self.phase)
            }
            Err(e) => {
                self.phase = ExecutionPhase::Failed;
                Err(e)
            }
        }
    }

    /// Stop following the current execution
    pub fn cancel_execution(&mut self) {
        if let Some(id) = self.tracker.current() {
            tracing::info!("⏹️ Cancelled tracking of execution {}", id);
        }
        self.tracker.clear();
        if self.phase.is_active() {
            self.phase = ExecutionPhase::Idle;
        }
    }

    /// Write step results into output nodes as one recorded commit
    ///
    /// Returns how many nodes were updated.
    pub fn apply_execution_results(&mut self, status: &ExecutionStatus) -> usize {
        match apply_results(self.history.snapshot(), status, self.catalog.as_ref()) {
            Some((next, updated)) => {
                self.history.commit(|_| next, CommitOptions::recorded());
                updated
            }
            None => 0,
        }
    }
}

// ---- pure snapshot transforms ---------------------------------------------

fn apply_movement(
    snapshot: &Snapshot,
    changes: &[NodeChange],
    snap_grid: Option<f64>,
) -> Option<Snapshot> {
    let mut changed = false;
    let mut nodes = snapshot.nodes.clone();

    for change in changes {
        let (id, position, dimensions) = match change {
            NodeChange::Position {
                id,
                position: Some(position),
                ..
            } => {
                let position = match snap_grid {
                    Some(grid) => position.snapped(grid),
                    None => *position,
                };
                (id, Some(position), None)
            }
            NodeChange::Dimensions { id, dimensions } => (id, None, Some(*dimensions)),
            _ => continue,
        };

        if let Some(slot) = nodes.iter_mut().find(|n| &n.id == id) {
            let mut next = Node::clone(slot);
            if let Some(position) = position {
                next.position = position;
            }
            if dimensions.is_some() {
                next.dimensions = dimensions;
            }
            if next != **slot {
                *slot = Arc::new(next);
                changed = true;
            }
        }
    }

    changed.then(|| Snapshot {
        nodes,
        edges: snapshot.edges.clone(),
    })
}

fn apply_node_selection(snapshot: &Snapshot, changes: &[NodeChange]) -> Option<Snapshot> {
    let mut changed = false;
    let mut nodes = snapshot.nodes.clone();

    for change in changes {
        let NodeChange::Select { id, selected } = change else { continue };
        if let Some(slot) = nodes.iter_mut().find(|n| &n.id == id) {
            if slot.selected != *selected {
                let mut next = Node::clone(slot);
                next.selected = *selected;
                *slot = Arc::new(next);
                changed = true;
            }
        }
    }

    changed.then(|| Snapshot {
        nodes,
        edges: snapshot.edges.clone(),
    })
}

fn apply_structural(snapshot: &Snapshot, changes: Vec<NodeChange>) -> Option<Snapshot> {
    let mut current = snapshot.clone();
    let mut changed = false;

    for change in changes {
        match change {
            NodeChange::Add { node } => {
                if node.id.is_empty() || current.contains_node(&node.id) {
                    tracing::warn!("Ignoring add of node with empty or duplicate id '{}'", node.id);
                    continue;
                }
                current.nodes.push(Arc::new(node));
                changed = true;
            }
            NodeChange::Replace { node } => {
                if let Some(slot) = current.nodes.iter_mut().find(|n| n.id == node.id) {
                    *slot = Arc::new(node);
                    changed = true;
                }
            }
            NodeChange::Remove { id } => {
                if let Some(next) = without_nodes(&current, &HashSet::from([id.as_str()])) {
                    current = next;
                    changed = true;
                }
            }
            _ => {}
        }
    }

    changed.then_some(current)
}

/// Snapshot without `ids` and without any edge touching them
fn without_nodes(snapshot: &Snapshot, ids: &HashSet<&str>) -> Option<Snapshot> {
    if !snapshot.nodes.iter().any(|n| ids.contains(n.id.as_str())) {
        return None;
    }

    let nodes = snapshot
        .nodes
        .iter()
        .filter(|n| !ids.contains(n.id.as_str()))
        .cloned()
        .collect();
    let before = snapshot.edges.len();
    let edges: Vec<Arc<Edge>> = snapshot
        .edges
        .iter()
        .filter(|e| !ids.contains(e.source.as_str()) && !ids.contains(e.target.as_str()))
        .cloned()
        .collect();
    tracing::debug!("Cascade removed {} edges", before - edges.len());

    Some(Snapshot { nodes, edges })
}

fn apply_edge_structure(snapshot: &Snapshot, changes: Vec<EdgeChange>) -> Option<Snapshot> {
    let mut current = snapshot.clone();
    let mut changed = false;

    for change in changes {
        match change {
            EdgeChange::Add { edge } => {
                let resolves =
                    current.contains_node(&edge.source) && current.contains_node(&edge.target);
                if !resolves || current.edge(&edge.id).is_some() {
                    tracing::warn!("Ignoring edge '{}': unknown endpoint or duplicate id", edge.id);
                    continue;
                }
                current.edges.push(Arc::new(edge));
                changed = true;
            }
            EdgeChange::Remove { id } => {
                let before = current.edges.len();
                current.edges.retain(|e| e.id != id);
                changed |= current.edges.len() != before;
            }
            EdgeChange::Select { .. } => {}
        }
    }

    changed.then_some(current)
}

fn apply_edge_selection(snapshot: &Snapshot, changes: &[EdgeChange]) -> Option<Snapshot> {
    let mut changed = false;
    let mut edges = snapshot.edges.clone();

    for change in changes {
        let EdgeChange::Select { id, selected } = change else { continue };
        if let Some(slot) = edges.iter_mut().find(|e| &e.id == id) {
            if slot.selected != *selected {
                let mut next = Edge::clone(slot);
                next.selected = *selected;
                *slot = Arc::new(next);
                changed = true;
            }
        }
    }

    changed.then(|| Snapshot {
        nodes: snapshot.nodes.clone(),
        edges,
    })
}
