use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::graph::{graph_for, GraphKind, Route};
use crate::state::{SessionPhase, StateEvent};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("route {route:?} is not reachable from the {graph:?} graph")]
    Unreachable { route: Route, graph: GraphKind },
}

/// The mounted graph. A fresh `mount_id` means nothing was carried over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveGraph {
    pub kind: GraphKind,
    pub mount_id: Uuid,
    stack: Vec<Route>,
}

impl ActiveGraph {
    fn mount(kind: GraphKind) -> Self {
        Self {
            kind,
            mount_id: Uuid::new_v4(),
            stack: vec![kind.initial_route()],
        }
    }

    pub fn current(&self) -> Route {
        self.stack
            .last()
            .copied()
            .unwrap_or_else(|| self.kind.initial_route())
    }

    pub fn stack(&self) -> &[Route] {
        &self.stack
    }
}

pub struct NavigationGate {
    active: ActiveGraph,
    mounts: usize,
}

impl Default for NavigationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationGate {
    pub fn new() -> Self {
        Self {
            active: ActiveGraph::mount(GraphKind::Loading),
            mounts: 1,
        }
    }

    pub fn active(&self) -> &ActiveGraph {
        &self.active
    }

    pub fn current(&self) -> Route {
        self.active.current()
    }

    /// Number of graphs mounted so far, the initial loading graph included.
    pub fn mounts(&self) -> usize {
        self.mounts
    }

    /// Apply a session phase. Returns true when the graph was rebuilt.
    pub fn sync(&mut self, phase: SessionPhase) -> bool {
        let kind = graph_for(phase);
        if kind == self.active.kind {
            return false;
        }
        tracing::debug!(
            target: "fitbuddy.navigation",
            stage = "navigation.remount",
            from = ?self.active.kind,
            to = ?kind
        );
        self.active = ActiveGraph::mount(kind);
        self.mounts += 1;
        true
    }

    pub fn navigate(&mut self, route: Route) -> Result<(), NavigationError> {
        if !self.active.kind.contains(route) {
            return Err(NavigationError::Unreachable {
                route,
                graph: self.active.kind,
            });
        }
        if self.active.current() != route {
            self.active.stack.push(route);
        }
        Ok(())
    }

    /// Pop one route; the initial route is never popped. Returns the route left.
    pub fn back(&mut self) -> Option<Route> {
        if self.active.stack.len() <= 1 {
            return None;
        }
        self.active.stack.pop()
    }

    /// Drain pending state events and apply the latest session phase.
    /// Returns true if any of them caused a remount.
    pub fn pump(&mut self, rx: &mut broadcast::Receiver<StateEvent>) -> bool {
        let mut remounted = false;
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    if let Some(phase) = event.session_phase() {
                        remounted |= self.sync(phase);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        target: "fitbuddy.navigation",
                        stage = "navigation.lagged",
                        skipped = skipped
                    );
                }
                Err(_) => break,
            }
        }
        remounted
    }

    /// Follow the event stream until it closes.
    pub async fn follow(&mut self, mut rx: broadcast::Receiver<StateEvent>) {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(phase) = event.session_phase() {
                        self.sync(phase);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        target: "fitbuddy.navigation",
                        stage = "navigation.lagged",
                        skipped = skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
