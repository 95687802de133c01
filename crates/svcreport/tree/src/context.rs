//! Per-run resolution context.
//!
//! Built once at the start of a report run and shared read-only by every
//! resolver and builder call of that run.

use svcreport_types::{ReportOptions, ReportWindows, TraversalMode};

/// Immutable settings of one tree resolution.
#[derive(Debug, Clone)]
pub struct TreeResolutionContext {
    /// Depth ceiling; `None` is unbounded.
    pub max_requested_depth: Option<i32>,

    /// Drop dependencies that have no dependencies of their own.
    pub parents_only: bool,

    /// Fixed "now" and derived availability windows.
    pub windows: ReportWindows,

    /// Sequential or concurrent sibling resolution.
    pub traversal: TraversalMode,
}

impl TreeResolutionContext {
    pub fn new(windows: ReportWindows) -> Self {
        Self {
            max_requested_depth: None,
            parents_only: false,
            windows,
            traversal: TraversalMode::Sequential,
        }
    }

    pub fn from_options(options: &ReportOptions, windows: ReportWindows) -> Self {
        Self {
            max_requested_depth: options.max_depth,
            parents_only: options.parents_only,
            windows,
            traversal: options.traversal,
        }
    }

    pub fn with_max_depth(mut self, depth: i32) -> Self {
        self.max_requested_depth = Some(depth);
        self
    }

    pub fn with_parents_only(mut self, parents_only: bool) -> Self {
        self.parents_only = parents_only;
        self
    }

    pub fn with_traversal(mut self, traversal: TraversalMode) -> Self {
        self.traversal = traversal;
        self
    }

    /// Whether a node at `depth_level` may have children, i.e. whether
    /// `depth_level + 1` is still within the ceiling.
    pub fn allows_children(&self, depth_level: u32) -> bool {
        match self.max_requested_depth {
            Some(ceiling) => i64::from(depth_level) < i64::from(ceiling),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_depth() {
        let context = TreeResolutionContext::new(ReportWindows::now());
        assert!(context.allows_children(1));
        assert!(context.allows_children(1000));
    }

    #[test]
    fn test_depth_ceiling() {
        let context = TreeResolutionContext::new(ReportWindows::now()).with_max_depth(2);
        assert!(context.allows_children(1));
        assert!(!context.allows_children(2));
    }

    #[test]
    fn test_non_positive_ceiling_keeps_root_only() {
        for ceiling in [1, 0, -4] {
            let context = TreeResolutionContext::new(ReportWindows::now()).with_max_depth(ceiling);
            assert!(!context.allows_children(1));
        }
    }

    #[test]
    fn test_from_options() {
        let options = ReportOptions {
            max_depth: Some(3),
            parents_only: true,
            traversal: TraversalMode::Concurrent,
            ..Default::default()
        };
        let context = TreeResolutionContext::from_options(&options, ReportWindows::now());
        assert_eq!(context.max_requested_depth, Some(3));
        assert!(context.parents_only);
        assert_eq!(context.traversal, TraversalMode::Concurrent);
    }
}
