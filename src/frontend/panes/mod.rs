//! Pane modules for the workspace
//!
//! Each pane provides a render function that takes its own state, SharedState, and &mut Ui.
//! Panes return Vec<AppAction> instead of mutating state directly.

pub mod column_picker;
pub mod data_table;
pub mod plot_view;
pub mod statistics;

pub use column_picker::ColumnPickerState;
pub use data_table::DataTableState;
pub use plot_view::PlotPaneState;
pub use statistics::StatisticsState;
