//! svcreport Render - Flattens resolved service trees into display rows
//!
//! A tree of any depth is shown as one flat table. Nesting is simulated by
//! leading empty cells: with `max_depth` service columns, a node at depth
//! `d` gets `d - 1` empty cells followed by a name cell spanning the
//! remaining `max_depth - (d - 1)` columns.
//!
//! The row model carries no markup. Presentation layers (the terminal
//! table, JSON output) read the classified values from [`DisplayRow`].

#![deny(unsafe_code)]

pub mod flatten;
pub mod row;
pub mod table;

pub use flatten::flatten;
pub use row::{AvailabilityCell, DisplayRow, RowKind};
pub use table::{Column, ReportTable};
