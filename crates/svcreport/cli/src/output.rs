//! Output formatting utilities

use colored::*;
use serde::Serialize;
use svcreport_render::{DisplayRow, ReportTable};
use svcreport_types::{AvailabilityClass, StatusBucket};
use tabled::builder::Builder;
use tabled::settings::object::Cell;
use tabled::settings::{Modify, Span, Style};

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Print the report in the specified format
pub fn print_report(report: &ReportTable, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            if report.is_empty() {
                println!("{}", "No services".dimmed());
            } else {
                println!("{}", render_table(report));
            }
        }
        OutputFormat::Json | OutputFormat::Yaml => print_single(report, format)?,
    }
    Ok(())
}

/// Print a single item in the specified format
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
    }
    Ok(())
}

/// Render the report as a terminal table. Service names are shifted right
/// by leading empty cells and span the remaining service columns.
pub fn render_table(report: &ReportTable) -> String {
    let mut builder = Builder::default();

    let mut header = Vec::with_capacity(report.width());
    for column in &report.columns {
        header.push(column.title.to_string());
        header.extend(std::iter::repeat(String::new()).take(column.span as usize - 1));
    }
    builder.push_record(header);

    for row in &report.rows {
        builder.push_record(row_cells(row, report));
    }

    let mut table = builder.build();
    table.with(Style::modern());

    if report.max_depth > 1 {
        table.with(Modify::new(Cell::new(0, 0)).with(Span::column(report.max_depth as usize)));
    }
    for (index, row) in report.rows.iter().enumerate() {
        if row.name_span > 1 {
            table.with(
                Modify::new(Cell::new(index + 1, row.leading_empty_cells as usize))
                    .with(Span::column(row.name_span as usize)),
            );
        }
    }

    table.to_string()
}

fn row_cells(row: &DisplayRow, report: &ReportTable) -> Vec<String> {
    let mut cells = Vec::with_capacity(report.width());

    cells.extend(std::iter::repeat(String::new()).take(row.leading_empty_cells as usize));
    cells.push(row.name.clone());
    cells.extend(std::iter::repeat(String::new()).take(row.name_span as usize - 1));

    cells.push(colorize_status(row).to_string());
    cells.push(row.incidents.join("\n"));
    if report.show_service_times {
        cells.push(row.scheduled_times_label().to_string());
    }
    for cell in &row.availability {
        let value = cell.value.to_string();
        let colored = match cell.class {
            AvailabilityClass::Healthy => value.green(),
            AvailabilityClass::Breached => value.red(),
        };
        cells.push(colored.to_string());
    }
    cells.push(row.sla_target.to_string());

    cells
}

fn colorize_status(row: &DisplayRow) -> ColoredString {
    match row.status_bucket {
        StatusBucket::Healthy => row.status_label.green(),
        StatusBucket::Degraded => row.status_label.yellow(),
        StatusBucket::Critical => row.status_label.red(),
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcreport_types::{Percentage, ServiceId, ServiceNode, ServiceStatus};

    fn node(name: &str, depth_level: u32, children: Vec<ServiceNode>) -> ServiceNode {
        let pct = Percentage::new(99.5).unwrap();
        ServiceNode {
            id: ServiceId::new(name),
            name: name.to_string(),
            status: ServiceStatus::new(2),
            incidents: vec!["disk full".into(), "replication lag".into()],
            availability_1d: pct,
            availability_1w: pct,
            availability_1m: pct,
            sla_target: Percentage::new(99.0).unwrap(),
            has_scheduled_times: false,
            depth_level,
            children,
        }
    }

    #[test]
    fn test_output_format_default() {
        let format = OutputFormat::default();
        assert!(matches!(format, OutputFormat::Table));
    }

    #[test]
    fn test_row_cells_shift_children() {
        colored::control::set_override(false);
        let forest = vec![node("Web", 1, vec![node("DB", 2, vec![])])];
        let report = ReportTable::new(&forest, 2, true);

        let root = row_cells(&report.rows[0], &report);
        let child = row_cells(&report.rows[1], &report);
        assert_eq!(root.len(), report.width());
        assert_eq!(child.len(), report.width());

        assert_eq!(root[0], "Web");
        assert_eq!(root[1], "");
        assert_eq!(child[0], "");
        assert_eq!(child[1], "DB");
        assert_eq!(child[2], "Warning");
        assert_eq!(child[3], "disk full\nreplication lag");
        assert_eq!(child[4], "No");
        assert_eq!(child[5], "99.50");
        assert_eq!(child[8], "99.00");
    }

    #[test]
    fn test_render_table_contains_rows() {
        colored::control::set_override(false);
        let forest = vec![node("Web", 1, vec![node("DB", 2, vec![])])];
        let report = ReportTable::new(&forest, 2, false);

        let rendered = render_table(&report);
        assert!(rendered.contains("Service"));
        assert!(rendered.contains("Web"));
        assert!(rendered.contains("DB"));
        assert!(rendered.contains("Availability (% 1 week)"));
        assert!(!rendered.contains("Configured service times"));
    }
}
