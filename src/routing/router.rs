//! Navigation state machine.
//!
//! # Responsibilities
//! - Own the route table and the navigation state
//! - Resolve navigation targets and activate component factories
//! - Drive history transitions (push / replace / back / forward)
//!
//! # States
//! ```text
//! Idle ──navigate──▶ Resolving ──match + factory ok──▶ Active(route)
//!                       │
//!                       └──no match / factory error──▶ previous state (error reported)
//! any ──teardown──▶ Terminated
//! ```
//!
//! # Design Decisions
//! - State and history are committed only after the component is built
//! - The target is stored exactly as navigated to; only the route match
//!   carries the decoded query
//! - A failed navigation never mutates state; the error goes to the caller

use thiserror::Error;

use crate::observability::metrics;
use crate::routing::history::{History, HistoryEntry, HistoryMode, MemoryHistory, NavigationType};
use crate::routing::table::{FactoryError, RouteMatch, RouteTable};

/// Errors reported to the caller of a navigation.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// No route matches the target path.
    #[error("no route matches `{path}`")]
    NotFound { path: String },

    /// The matched route's component factory failed.
    #[error("failed to activate route `{route}`: {source}")]
    Activation {
        route: String,
        #[source]
        source: FactoryError,
    },

    /// There is no history entry in the requested direction.
    #[error("no history entry to move to")]
    HistoryExhausted,

    /// The router has been torn down.
    #[error("router has been torn down")]
    Terminated,
}

impl NavigationError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationError::NotFound { .. })
    }
}

/// Observable navigation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    /// Navigation target of the active route, as given (query and fragment kept).
    pub current_path: Option<String>,
    /// The active route, if any.
    pub matched: Option<RouteMatch>,
    pub history_mode: HistoryMode,
}

impl NavigationState {
    fn new(history_mode: HistoryMode) -> Self {
        Self {
            current_path: None,
            matched: None,
            history_mode,
        }
    }
}

/// Phase of the router state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationPhase {
    Idle,
    Resolving { target: String },
    Active(RouteMatch),
    Terminated,
}

/// Outcome of a successful navigation.
#[derive(Debug)]
pub struct Activation<C> {
    pub route: RouteMatch,
    pub component: C,
    pub navigation: NavigationType,
}

/// Client-side router.
#[derive(Debug)]
pub struct Router<C, H = MemoryHistory> {
    table: RouteTable<C>,
    history: H,
    state: NavigationState,
    pending: Option<String>,
    terminated: bool,
}

impl<C: 'static> Router<C, MemoryHistory> {
    /// Create a router backed by an in-memory history stack.
    pub fn new(table: RouteTable<C>, history_mode: HistoryMode) -> Self {
        Self::with_history(table, history_mode, MemoryHistory::new())
    }
}

impl<C: 'static, H: History> Router<C, H> {
    /// Create a router driving the given history implementation.
    pub fn with_history(table: RouteTable<C>, history_mode: HistoryMode, history: H) -> Self {
        Self {
            table,
            history,
            state: NavigationState::new(history_mode),
            pending: None,
            terminated: false,
        }
    }

    /// Navigate to `path`, pushing a history entry.
    pub async fn navigate(&mut self, path: &str) -> Result<Activation<C>, NavigationError> {
        self.transition(path, NavigationType::Push).await
    }

    /// Navigate to `path`, replacing the current history entry.
    pub async fn replace(&mut self, path: &str) -> Result<Activation<C>, NavigationError> {
        self.transition(path, NavigationType::Replace).await
    }

    /// Re-activate the previous history entry.
    pub async fn back(&mut self) -> Result<Activation<C>, NavigationError> {
        self.step(-1).await
    }

    /// Re-activate the next history entry.
    pub async fn forward(&mut self) -> Result<Activation<C>, NavigationError> {
        self.step(1).await
    }

    /// Look up `path` without changing any state.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch, NavigationError> {
        self.table
            .resolve(path)
            .map(|(_, matched)| matched)
            .ok_or_else(|| NavigationError::NotFound {
                path: path.to_string(),
            })
    }

    /// Render `path` as a location href for the configured history mode.
    pub fn href(&self, path: &str) -> String {
        self.state.history_mode.href(path)
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn phase(&self) -> NavigationPhase {
        if self.terminated {
            return NavigationPhase::Terminated;
        }
        if let Some(target) = &self.pending {
            return NavigationPhase::Resolving {
                target: target.clone(),
            };
        }
        match &self.state.matched {
            Some(route) => NavigationPhase::Active(route.clone()),
            None => NavigationPhase::Idle,
        }
    }

    pub fn table(&self) -> &RouteTable<C> {
        &self.table
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Drop navigation state. Every later navigation fails.
    pub fn teardown(&mut self) {
        tracing::debug!("Router torn down");
        self.state.current_path = None;
        self.state.matched = None;
        self.pending = None;
        self.terminated = true;
    }

    async fn step(&mut self, offset: isize) -> Result<Activation<C>, NavigationError> {
        if self.terminated {
            return Err(NavigationError::Terminated);
        }
        let target = self
            .history
            .peek(offset)
            .map(|entry| entry.path.clone())
            .ok_or(NavigationError::HistoryExhausted)?;

        let activation = self.transition(&target, NavigationType::Pop).await?;
        self.history.go(offset);
        Ok(activation)
    }

    async fn transition(
        &mut self,
        target: &str,
        navigation: NavigationType,
    ) -> Result<Activation<C>, NavigationError> {
        if self.terminated {
            return Err(NavigationError::Terminated);
        }

        self.pending = Some(target.to_string());
        tracing::debug!(path = %target, ?navigation, "Resolving route");

        let result = self.load(target).await;
        self.pending = None;

        let (route, component) = match result {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(path = %target, error = %e, "Navigation failed");
                metrics::record_navigation(if e.is_not_found() { "not_found" } else { "failed" });
                return Err(e);
            }
        };

        let entry = HistoryEntry {
            href: self.state.history_mode.href(target),
            path: target.to_string(),
        };
        match navigation {
            NavigationType::Push => self.history.push(entry),
            NavigationType::Replace => self.history.replace(entry),
            NavigationType::Pop => {}
        }

        self.state.current_path = Some(target.to_string());
        self.state.matched = Some(route.clone());

        tracing::info!(route = %route.name, path = %route.path, "Route activated");
        metrics::record_navigation("activated");
        Ok(Activation {
            route,
            component,
            navigation,
        })
    }

    async fn load(&self, target: &str) -> Result<(RouteMatch, C), NavigationError> {
        let (record, route) = self
            .table
            .resolve(target)
            .ok_or_else(|| NavigationError::NotFound {
                path: target.to_string(),
            })?;

        let factory = record.component.clone();
        let component = factory
            .load()
            .await
            .map_err(|source| NavigationError::Activation {
                route: route.name.clone(),
                source,
            })?;
        Ok((route, component))
    }
}
