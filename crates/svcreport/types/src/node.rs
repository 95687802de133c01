//! Service descriptors from the backend and resolved service nodes.

use serde::{Deserialize, Serialize};

use crate::ids::ServiceId;
use crate::percentage::Percentage;
use crate::status::ServiceStatus;
use crate::window::AvailabilityWindow;

/// Incident entry shown when a service has no active problems.
pub const NO_ACTIVE_INCIDENTS: &str = "-";

/// A service as reported by the monitoring backend, before any metrics are
/// resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub id: ServiceId,
    pub name: String,
    pub status: ServiceStatus,
    pub sla_target: Percentage,
    /// Whether service time windows are configured.
    pub has_scheduled_times: bool,
    /// Declared dependencies, in backend order.
    pub dependencies: Vec<ServiceId>,
}

impl ServiceDescriptor {
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

/// Selection of services for a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceFilter {
    All,
    Names(Vec<String>),
    Ids(Vec<ServiceId>),
}

impl ServiceFilter {
    /// Filter on names; an empty list means every service.
    pub fn by_names(names: &[String]) -> Self {
        if names.is_empty() {
            Self::All
        } else {
            Self::Names(names.to_vec())
        }
    }

    pub fn by_id(id: ServiceId) -> Self {
        Self::Ids(vec![id])
    }
}

/// A resolved service and the subtree of services it depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceNode {
    pub id: ServiceId,
    pub name: String,
    pub status: ServiceStatus,
    /// Active problem descriptions; a single [`NO_ACTIVE_INCIDENTS`] entry
    /// when nothing is firing.
    pub incidents: Vec<String>,
    pub availability_1d: Percentage,
    pub availability_1w: Percentage,
    pub availability_1m: Percentage,
    pub sla_target: Percentage,
    pub has_scheduled_times: bool,
    /// 1-based depth in the tree; roots are 1.
    pub depth_level: u32,
    pub children: Vec<ServiceNode>,
}

impl ServiceNode {
    pub fn availability(&self, window: AvailabilityWindow) -> Percentage {
        match window {
            AvailabilityWindow::Day => self.availability_1d,
            AvailabilityWindow::Week => self.availability_1w,
            AvailabilityWindow::Month => self.availability_1m,
        }
    }

    pub fn is_root(&self) -> bool {
        self.depth_level == 1
    }

    /// Deepest `depth_level` in this subtree.
    pub fn max_depth(&self) -> u32 {
        self.children
            .iter()
            .map(ServiceNode::max_depth)
            .fold(self.depth_level, u32::max)
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ServiceNode::node_count).sum::<usize>()
    }

    /// Look up a node in this subtree by name (pre-order, first match).
    pub fn find(&self, name: &str) -> Option<&ServiceNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, depth_level: u32, children: Vec<ServiceNode>) -> ServiceNode {
        let pct = Percentage::new(100.0).unwrap();
        ServiceNode {
            id: ServiceId::new(name),
            name: name.to_string(),
            status: ServiceStatus::new(0),
            incidents: vec![NO_ACTIVE_INCIDENTS.to_string()],
            availability_1d: pct,
            availability_1w: pct,
            availability_1m: pct,
            sla_target: pct,
            has_scheduled_times: false,
            depth_level,
            children,
        }
    }

    #[test]
    fn test_max_depth_and_node_count() {
        let tree = node(
            "web",
            1,
            vec![node("db", 2, vec![node("disk", 3, vec![])]), node("cache", 2, vec![])],
        );
        assert_eq!(tree.max_depth(), 3);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.find("disk").map(|n| n.depth_level), Some(3));
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn test_filter_by_names() {
        assert_eq!(ServiceFilter::by_names(&[]), ServiceFilter::All);
        assert_eq!(
            ServiceFilter::by_names(&["Web".to_string()]),
            ServiceFilter::Names(vec!["Web".to_string()])
        );
    }
}
