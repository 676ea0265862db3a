//! Core data types shared between the model and the UI
//!
//! # Main Types
//!
//! - [`Selection`] - Which columns the user picked for each plot role
//! - [`AxisRole`] - The role a checkbox toggles

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum number of points to render per line for performance
pub const MAX_RENDER_POINTS: usize = 4000;

/// The plot role of a selected column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisRole {
    /// Plotted on the main y axis in its own units
    Main,
    /// Mean-centered and rescaled onto the main range
    Aux,
    /// Two-bit AV status drawn as a step line
    Av,
}

/// The columns currently selected in the column panel
///
/// Sets are ordered so that persisted selections and exports are stable;
/// the plot draws columns in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Status column drawn as background bands (single select)
    pub status: Option<String>,
    /// Main-axis sensors
    pub main: BTreeSet<String>,
    /// Aux-axis sensors
    pub aux: BTreeSet<String>,
    /// AV overlays
    pub av: BTreeSet<String>,
}

impl Selection {
    /// Set of columns for a role
    pub fn set(&self, role: AxisRole) -> &BTreeSet<String> {
        match role {
            AxisRole::Main => &self.main,
            AxisRole::Aux => &self.aux,
            AxisRole::Av => &self.av,
        }
    }

    fn set_mut(&mut self, role: AxisRole) -> &mut BTreeSet<String> {
        match role {
            AxisRole::Main => &mut self.main,
            AxisRole::Aux => &mut self.aux,
            AxisRole::Av => &mut self.av,
        }
    }

    /// Whether a column is selected for a role
    pub fn contains(&self, role: AxisRole, name: &str) -> bool {
        self.set(role).contains(name)
    }

    /// Select or deselect a column for a role
    pub fn set_selected(&mut self, role: AxisRole, name: &str, selected: bool) {
        let set = self.set_mut(role);
        if selected {
            set.insert(name.to_string());
        } else {
            set.remove(name);
        }
    }

    /// Clear aux selections (done when no main sensor is left)
    pub fn clear_aux(&mut self) {
        self.aux.clear();
    }

    /// Whether nothing at all is selected
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.main.is_empty() && self.aux.is_empty() && self.av.is_empty()
    }

    /// Sorted union of main and aux sensors
    pub fn sensors(&self) -> BTreeSet<&str> {
        self.main
            .iter()
            .chain(self.aux.iter())
            .map(String::as_str)
            .collect()
    }

    /// Drop selections of columns that no longer exist
    pub fn retain_existing(&mut self, exists: impl Fn(&str) -> bool) {
        if self.status.as_deref().is_some_and(|s| !exists(s)) {
            self.status = None;
        }
        self.main.retain(|c| exists(c));
        self.aux.retain(|c| exists(c));
        self.av.retain(|c| exists(c));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_toggle() {
        let mut sel = Selection::default();
        assert!(sel.is_empty());

        sel.set_selected(AxisRole::Main, "t1", true);
        sel.set_selected(AxisRole::Aux, "t2", true);
        assert!(sel.contains(AxisRole::Main, "t1"));
        assert!(!sel.contains(AxisRole::Aux, "t1"));

        sel.set_selected(AxisRole::Main, "t1", false);
        assert!(sel.main.is_empty());
        assert!(!sel.is_empty());
    }

    #[test]
    fn test_sensors_union_is_sorted() {
        let mut sel = Selection::default();
        sel.set_selected(AxisRole::Main, "zeta", true);
        sel.set_selected(AxisRole::Aux, "alpha", true);
        sel.set_selected(AxisRole::Aux, "zeta", true);
        let sensors: Vec<_> = sel.sensors().into_iter().collect();
        assert_eq!(sensors, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_retain_existing() {
        let mut sel = Selection {
            status: Some("p-gone".to_string()),
            ..Default::default()
        };
        sel.set_selected(AxisRole::Main, "t1", true);
        sel.set_selected(AxisRole::Av, "av-gone", true);

        sel.retain_existing(|c| c == "t1");
        assert!(sel.status.is_none());
        assert!(sel.av.is_empty());
        assert!(sel.contains(AxisRole::Main, "t1"));
    }
}
