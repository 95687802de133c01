//! Report command

use std::sync::Arc;

use clap::Args;
use svcreport_render::ReportTable;
use svcreport_tree::{MonitoringBackend, ReportRunner};
use svcreport_types::{ReportOptions, TraversalMode};
use tracing::info;

use crate::config::ReportDefaults;
use crate::error::CliResult;
use crate::output::{print_report, OutputFormat};

/// Report arguments
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Comma-delimited list of root services to report (default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub services: Vec<String>,

    /// Search depth in the IT services tree (default: unlimited)
    #[arg(short, long, allow_negative_numbers = true)]
    pub depth: Option<i32>,

    /// Keep only the parent IT services
    #[arg(long)]
    pub parents_only: bool,

    /// Display whether service times have been configured
    #[arg(long)]
    pub service_times: bool,

    /// Resolve sibling services concurrently
    #[arg(long)]
    pub concurrent: bool,
}

impl ReportArgs {
    /// Merge with config defaults; flags win.
    pub fn into_options(self, defaults: &ReportDefaults) -> ReportOptions {
        let services = if self.services.is_empty() {
            defaults.services.clone()
        } else {
            self.services
        };
        let concurrent = self.concurrent || defaults.concurrent;

        ReportOptions {
            services,
            max_depth: self.depth.or(defaults.depth),
            parents_only: self.parents_only || defaults.parents_only,
            show_service_times: self.service_times || defaults.service_times,
            traversal: if concurrent {
                TraversalMode::Concurrent
            } else {
                TraversalMode::Sequential
            },
        }
    }
}

/// Resolve and print the report
pub async fn execute(
    options: &ReportOptions,
    backend: Arc<dyn MonitoringBackend>,
    format: OutputFormat,
) -> CliResult<()> {
    let runner = ReportRunner::new(backend);
    let forest = runner.run(options).await?;

    info!(
        roots = forest.roots.len(),
        max_depth = forest.max_observed_depth,
        "Rendering report"
    );
    let table = ReportTable::new(
        &forest.roots,
        forest.max_observed_depth,
        options.show_service_times,
    );
    print_report(&table, format)
}
