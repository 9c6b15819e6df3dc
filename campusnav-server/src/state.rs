use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use campusnav_core::{CampusGraph, NavigationConfig, NavigationSession};
use tracing::{debug, info};

use crate::worker::{Command, SessionHandle, spawn_session};

/// Shared by every handler
#[derive(Debug)]
pub struct AppState {
    graph: RwLock<Arc<CampusGraph>>,
    /// Running sessions; a worker removes its own entry when it ends
    sessions: Arc<Mutex<HashMap<u64, SessionHandle>>>,
    next_session: AtomicU64,
    pub navigation: NavigationConfig,
    pub poll_interval: Duration,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(graph: CampusGraph, navigation: NavigationConfig, poll_interval: Duration) -> Self {
        Self {
            graph: RwLock::new(Arc::new(graph)),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_session: AtomicU64::new(1),
            navigation,
            poll_interval,
        }
    }

    /// Graph currently served; sessions keep their own reference
    pub fn graph(&self) -> Arc<CampusGraph> {
        Arc::clone(&self.graph.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swaps in a new graph and hands it to every running session
    pub fn replace_graph(&self, graph: Arc<CampusGraph>) {
        {
            let mut current = self.graph.write().unwrap_or_else(PoisonError::into_inner);
            *current = Arc::clone(&graph);
        }
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        for handle in sessions.values() {
            handle.send(Command::ReplaceGraph(Arc::clone(&graph)));
        }
        info!(
            "Graph generation {} now served to {} sessions",
            graph.generation(),
            sessions.len()
        );
    }

    pub fn add_session(&self, session: NavigationSession) -> (u64, SessionHandle) {
        let id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let registry = Arc::clone(&self.sessions);
        // Held across the spawn so the worker cannot retire before it is registered
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = spawn_session(id, session, self.poll_interval, move || {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id);
            debug!(session = id, "Session retired");
        });
        sessions.insert(id, handle.clone());
        (id, handle)
    }

    /// Whether `id` was handed out, running or not
    pub fn was_issued(&self, id: u64) -> bool {
        id != 0 && id < self.next_session.load(Ordering::Relaxed)
    }

    pub fn session(&self, id: u64) -> Option<SessionHandle> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}
