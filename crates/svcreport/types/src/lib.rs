//! svcreport Types - Core types for the IT service availability report
//!
//! The report walks a hierarchy of monitored services, resolves each one's
//! availability over three trailing windows together with its active
//! problems, and flattens the result into a single table.
//!
//! ## Key Concepts
//!
//! - **ServiceDescriptor**: A service as the monitoring backend describes it
//! - **ServiceNode**: A resolved service with metrics and child services
//! - **Percentage**: Availability or SLA value fixed to two decimals
//! - **ServiceStatus**: Ordinal severity reported by the backend
//! - **ReportWindows**: The fixed day/week/month windows of one report run
//! - **ReportOptions**: What the caller asked the report to contain

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod ids;
pub mod node;
pub mod options;
pub mod percentage;
pub mod status;
pub mod window;

pub use error::{TypesError, TypesResult};
pub use ids::{ProblemId, ServiceId};
pub use node::{ServiceDescriptor, ServiceFilter, ServiceNode, NO_ACTIVE_INCIDENTS};
pub use options::{ReportOptions, TraversalMode};
pub use percentage::{AvailabilityClass, Percentage};
pub use status::{ServiceStatus, StatusBucket};
pub use window::{AvailabilityWindow, ReportWindows, TimeWindow};
