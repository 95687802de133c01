//! The complete report table: header columns plus flattened rows.

use serde::Serialize;
use svcreport_types::{AvailabilityWindow, ServiceNode};

use crate::flatten::flatten;
use crate::row::DisplayRow;

/// A header column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub title: &'static str,
    /// Number of table columns the header covers.
    pub span: u32,
}

impl Column {
    fn single(title: &'static str) -> Self {
        Self { title, span: 1 }
    }
}

/// Structural model of the report handed to presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    /// Number of service (indent + name) columns.
    pub max_depth: u32,
    pub show_service_times: bool,
    pub columns: Vec<Column>,
    pub rows: Vec<DisplayRow>,
}

impl ReportTable {
    pub fn new(forest: &[ServiceNode], max_depth: u32, show_service_times: bool) -> Self {
        let rows = flatten(forest, max_depth);

        let columns = if max_depth == 0 {
            Vec::new()
        } else {
            let mut columns = vec![
                Column {
                    title: "Service",
                    span: max_depth,
                },
                Column::single("Status"),
                Column::single("Current problems"),
            ];
            if show_service_times {
                columns.push(Column::single("Configured service times ?"));
            }
            columns.extend(
                AvailabilityWindow::ALL
                    .iter()
                    .map(|window| Column::single(window.heading())),
            );
            columns.push(Column::single("SLA (%)"));
            columns
        };

        Self {
            max_depth,
            show_service_times,
            columns,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of physical table columns.
    pub fn width(&self) -> usize {
        self.columns.iter().map(|c| c.span as usize).sum()
    }
}
