//! # svcreport Tree - Service dependency tree resolution
//!
//! Resolves a forest of monitored services into an in-memory tree, fetching
//! each service's availability and active problems on the way down.
//!
//! ## Key Components
//!
//! - [`MonitoringBackend`]: The calls the resolver needs from a backend
//! - [`MetricsResolver`]: Availability windows and incidents of one service
//! - [`TreeBuilder`]: Recursive dependency traversal with a depth ceiling
//! - [`ReportRunner`]: Root lookup followed by a full forest build
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use svcreport_tree::{InMemoryBackend, ReportRunner};
//! use svcreport_types::ReportOptions;
//!
//! # async fn example() {
//! let backend = Arc::new(InMemoryBackend::new());
//! let runner = ReportRunner::new(backend);
//!
//! let options = ReportOptions {
//!     services: vec!["Web".to_string()],
//!     max_depth: Some(2),
//!     ..Default::default()
//! };
//! let forest = runner.run(&options).await.unwrap();
//! println!("deepest level: {}", forest.max_observed_depth);
//! # }
//! ```
//!
//! ## Failure Policy
//!
//! Nothing is retried and nothing is partially returned: the first backend
//! failure anywhere in the forest aborts the run with an error naming the
//! service it was resolving.

pub mod backend;
pub mod builder;
pub mod context;
pub mod error;
pub mod resolver;
pub mod runner;

pub use backend::memory::{FailPoint, InMemoryBackend};
pub use backend::{BackendError, BackendResult, MonitoringBackend};
pub use builder::{ResolvedForest, Subtree, TreeBuilder};
pub use context::TreeResolutionContext;
pub use error::{QueryPhase, TreeError, TreeResult};
pub use resolver::{MetricsResolver, ServiceMetrics};
pub use runner::ReportRunner;
