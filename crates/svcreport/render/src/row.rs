//! Display rows.

use serde::Serialize;
use svcreport_types::{
    AvailabilityClass, AvailabilityWindow, Percentage, ServiceNode, ServiceStatus, StatusBucket,
    NO_ACTIVE_INCIDENTS,
};

/// Whether a row is a top-level service or a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Root,
    Child,
}

/// One availability value with its SLA classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AvailabilityCell {
    pub window: AvailabilityWindow,
    pub value: Percentage,
    pub class: AvailabilityClass,
}

/// One flattened service row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub kind: RowKind,
    pub depth_level: u32,
    /// Empty indent cells before the name; always `depth_level - 1`.
    pub leading_empty_cells: u32,
    /// Columns spanned by the name cell.
    pub name_span: u32,
    pub name: String,
    pub status: ServiceStatus,
    pub status_bucket: StatusBucket,
    pub status_label: &'static str,
    /// Never empty.
    pub incidents: Vec<String>,
    /// Day, week and month cells, in that order.
    pub availability: [AvailabilityCell; 3],
    pub sla_target: Percentage,
    pub has_scheduled_times: bool,
}

impl DisplayRow {
    pub(crate) fn from_node(node: &ServiceNode, max_depth: u32) -> Self {
        let leading_empty_cells = node.depth_level.saturating_sub(1);
        let name_span = max_depth.saturating_sub(leading_empty_cells).max(1);

        let incidents = if node.incidents.is_empty() {
            vec![NO_ACTIVE_INCIDENTS.to_string()]
        } else {
            node.incidents.clone()
        };

        let availability = AvailabilityWindow::ALL.map(|window| {
            let value = node.availability(window);
            AvailabilityCell {
                window,
                value,
                class: value.classify(node.sla_target),
            }
        });

        Self {
            kind: if node.is_root() {
                RowKind::Root
            } else {
                RowKind::Child
            },
            depth_level: node.depth_level,
            leading_empty_cells,
            name_span,
            name: node.name.clone(),
            status: node.status,
            status_bucket: node.status.bucket(),
            status_label: node.status.label(),
            incidents,
            availability,
            sla_target: node.sla_target,
            has_scheduled_times: node.has_scheduled_times,
        }
    }

    pub fn availability(&self, window: AvailabilityWindow) -> &AvailabilityCell {
        match window {
            AvailabilityWindow::Day => &self.availability[0],
            AvailabilityWindow::Week => &self.availability[1],
            AvailabilityWindow::Month => &self.availability[2],
        }
    }

    /// Text of the scheduled-times cell.
    pub fn scheduled_times_label(&self) -> &'static str {
        if self.has_scheduled_times {
            "Yes"
        } else {
            "No"
        }
    }
}
