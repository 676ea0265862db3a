//! Workspace module for dockable pane management
//!
//! Provides the core workspace types: PaneId, PaneKind, Workspace.
//! Uses egui_dock for drag-and-drop docking, tabs, and splits.
//! Every pane kind exists at most once.

pub mod default_layout;
pub mod tab_viewer;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::frontend::pane_registry::{self, PaneKindInfo};
use crate::frontend::pane_trait::Pane;

/// Unique identifier for a pane instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneId(pub u64);

static NEXT_PANE_ID: AtomicU64 = AtomicU64::new(1);

impl PaneId {
    pub fn next() -> Self {
        Self(NEXT_PANE_ID.fetch_add(1, Ordering::SeqCst))
    }
}

/// Kind of pane (used for dispatch and menu display)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneKind {
    ColumnPicker,
    Plot,
    Statistics,
    DataTable,
}

/// Metadata entry for a pane
pub struct PaneEntry {
    pub id: PaneId,
    pub kind: PaneKind,
    /// Translation key of the tab title
    pub title_key: &'static str,
}

/// The workspace holds all dock state, pane data, and the pane registry.
pub struct Workspace {
    pub dock_state: egui_dock::DockState<PaneId>,
    pub pane_states: HashMap<PaneId, Box<dyn Pane>>,
    pub pane_entries: HashMap<PaneId, PaneEntry>,
    registry: Vec<PaneKindInfo>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Create a new workspace with the pane registry.
    pub fn new() -> Self {
        Self {
            dock_state: egui_dock::DockState::new(vec![]),
            pane_states: HashMap::new(),
            pane_entries: HashMap::new(),
            registry: pane_registry::build_registry(),
        }
    }

    fn info(&self, kind: PaneKind) -> Option<&PaneKindInfo> {
        self.registry.iter().find(|info| info.kind == kind)
    }

    /// Register a new pane and return its ID.
    pub fn register_pane(&mut self, kind: PaneKind) -> Option<PaneId> {
        let (state, title_key) = self
            .info(kind)
            .map(|info| ((info.factory)(), info.title_key))?;
        let id = PaneId::next();
        self.pane_states.insert(id, state);
        self.pane_entries.insert(
            id,
            PaneEntry {
                id,
                kind,
                title_key,
            },
        );
        Some(id)
    }

    /// Translation key for the title of a pane kind.
    pub fn title_key(&self, kind: PaneKind) -> &'static str {
        self.info(kind).map(|info| info.title_key).unwrap_or("pane_unknown")
    }

    /// Iterate all pane kinds in menu order.
    pub fn registry(&self) -> impl Iterator<Item = &PaneKindInfo> {
        self.registry.iter()
    }

    /// Find the pane of the given kind, if it is open.
    pub fn find(&self, kind: PaneKind) -> Option<PaneId> {
        self.pane_entries
            .values()
            .find(|e| e.kind == kind)
            .map(|e| e.id)
    }

    /// Focus the pane of `kind`, or open it as a new tab.
    pub fn open_or_focus(&mut self, kind: PaneKind) {
        if let Some(id) = self.find(kind) {
            if let Some(location) = self.dock_state.find_tab(&id) {
                self.dock_state.set_active_tab(location);
                return;
            }
            // Tab was lost from the dock, drop the stale state and recreate
            self.remove_pane(id);
        }
        if let Some(id) = self.register_pane(kind) {
            self.dock_state.push_to_first_leaf(id);
        }
    }

    /// Remove a pane by ID.
    pub fn remove_pane(&mut self, id: PaneId) {
        self.pane_states.remove(&id);
        self.pane_entries.remove(&id);
    }

    /// Downcast the state of the pane of `kind`.
    pub fn pane_mut<T: 'static>(&mut self, kind: PaneKind) -> Option<&mut T> {
        let id = self.find(kind)?;
        self.pane_states
            .get_mut(&id)
            .and_then(|p| p.as_any_mut().downcast_mut::<T>())
    }
}
