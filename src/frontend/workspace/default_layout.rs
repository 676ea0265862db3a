//! Default workspace layout
//!
//! Builds the initial dock layout with the column picker on the left, the plot
//! in the center and the statistics and data tabs underneath it.

use egui_dock::{DockState, NodeIndex};

use super::{PaneId, PaneKind, Workspace};

/// Build the default dock layout and return the DockState.
///
/// Layout:
/// ```text
/// ┌──────────────┬────────────────────────────────┐
/// │  Columns     │ [Plot]                         │
/// │  (search,    │                                │
/// │   status,    │         Sensor plot            │
/// │   main/aux,  ├────────────────────────────────┤
/// │   AV)        │ [Statistics]  [Data]           │
/// └──────────────┴────────────────────────────────┘
/// ```
pub fn build_default_layout(workspace: &mut Workspace) -> DockState<PaneId> {
    let ids: Vec<PaneId> = [
        PaneKind::ColumnPicker,
        PaneKind::Plot,
        PaneKind::Statistics,
        PaneKind::DataTable,
    ]
    .into_iter()
    .filter_map(|kind| workspace.register_pane(kind))
    .collect();

    let [columns, plot, statistics, data] = ids[..] else {
        return DockState::new(ids);
    };

    let mut dock = DockState::new(vec![plot]);

    let [center, _left] = dock
        .main_surface_mut()
        .split_left(NodeIndex::root(), 0.25, vec![columns]);

    dock.main_surface_mut()
        .split_below(center, 0.7, vec![statistics, data]);

    dock
}
