//! Recursive dependency tree builder.
//!
//! Starting from a root service, the builder resolves the service's own
//! metrics, then walks its declared dependencies in backend order while the
//! depth ceiling allows. Every recursive call returns the deepest level kept
//! in its subtree, and parents merge those values with `max`, so the
//! observed depth of a forest needs no shared counter.

use std::sync::Arc;

use futures::future::{try_join_all, BoxFuture, FutureExt};
use svcreport_types::{
    ReportWindows, ServiceDescriptor, ServiceFilter, ServiceId, ServiceNode, TraversalMode,
};
use tracing::{debug, info, instrument};

use crate::backend::MonitoringBackend;
use crate::context::TreeResolutionContext;
use crate::error::{QueryPhase, TreeError, TreeResult};
use crate::resolver::MetricsResolver;

/// A resolved subtree and the deepest level it contains.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtree {
    pub node: ServiceNode,
    pub max_depth: u32,
}

/// Every resolved root of a report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedForest {
    pub roots: Vec<ServiceNode>,
    /// Deepest level kept anywhere in the forest; 0 when there are no roots.
    pub max_observed_depth: u32,
    pub windows: ReportWindows,
}

impl ResolvedForest {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes across all roots.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(ServiceNode::node_count).sum()
    }
}

/// Builds service trees against a monitoring backend.
pub struct TreeBuilder {
    backend: Arc<dyn MonitoringBackend>,
    resolver: MetricsResolver,
    context: TreeResolutionContext,
}

impl TreeBuilder {
    pub fn new(backend: Arc<dyn MonitoringBackend>, context: TreeResolutionContext) -> Self {
        Self {
            resolver: MetricsResolver::new(backend.clone()),
            backend,
            context,
        }
    }

    pub fn context(&self) -> &TreeResolutionContext {
        &self.context
    }

    /// Build the tree rooted at `root`.
    #[instrument(skip(self, root), fields(root = %root.name))]
    pub async fn build(&self, root: ServiceDescriptor) -> TreeResult<Subtree> {
        self.build_node(root, 1, Vec::new()).await
    }

    /// Build every root, in the given order. Any failure aborts the forest.
    pub async fn build_forest(&self, roots: Vec<ServiceDescriptor>) -> TreeResult<ResolvedForest> {
        info!(
            roots = roots.len(),
            max_depth = ?self.context.max_requested_depth,
            parents_only = self.context.parents_only,
            traversal = ?self.context.traversal,
            "Resolving service forest"
        );

        let subtrees = match self.context.traversal {
            TraversalMode::Sequential => {
                let mut subtrees = Vec::with_capacity(roots.len());
                for root in roots {
                    subtrees.push(self.build(root).await?);
                }
                subtrees
            }
            TraversalMode::Concurrent => {
                try_join_all(roots.into_iter().map(|root| self.build(root))).await?
            }
        };

        let max_observed_depth = subtrees.iter().map(|s| s.max_depth).max().unwrap_or(0);
        let forest = ResolvedForest {
            roots: subtrees.into_iter().map(|s| s.node).collect(),
            max_observed_depth,
            windows: self.context.windows,
        };

        info!(
            services = forest.node_count(),
            max_observed_depth, "Resolved service forest"
        );
        Ok(forest)
    }

    fn build_node(
        &self,
        descriptor: ServiceDescriptor,
        depth_level: u32,
        mut path: Vec<ServiceId>,
    ) -> BoxFuture<'_, TreeResult<Subtree>> {
        async move {
            let metrics = self.resolver.resolve(&descriptor, &self.context).await?;
            let mut node = metrics.into_node(&descriptor, depth_level);
            let mut max_depth = depth_level;

            if self.context.allows_children(depth_level) && descriptor.has_dependencies() {
                path.push(descriptor.id.clone());
                let child_level = depth_level + 1;

                let children = match self.context.traversal {
                    TraversalMode::Sequential => {
                        let mut children = Vec::with_capacity(descriptor.dependencies.len());
                        for dependency in &descriptor.dependencies {
                            children.push(
                                self.build_dependency(&descriptor, dependency, child_level, &path)
                                    .await?,
                            );
                        }
                        children
                    }
                    TraversalMode::Concurrent => {
                        try_join_all(descriptor.dependencies.iter().map(|dependency| {
                            self.build_dependency(&descriptor, dependency, child_level, &path)
                        }))
                        .await?
                    }
                };

                for child in children.into_iter().flatten() {
                    max_depth = max_depth.max(child.max_depth);
                    node.children.push(child.node);
                }
            }

            debug!(
                service = %descriptor.name,
                depth_level,
                children = node.children.len(),
                max_depth,
                "Built service subtree"
            );
            Ok(Subtree { node, max_depth })
        }
        .boxed()
    }

    /// Look up and build one dependency. Returns `None` when the dependency
    /// is filtered out by `parents_only`.
    async fn build_dependency(
        &self,
        parent: &ServiceDescriptor,
        dependency: &ServiceId,
        depth_level: u32,
        path: &[ServiceId],
    ) -> TreeResult<Option<Subtree>> {
        if path.contains(dependency) {
            return Err(TreeError::CyclicDependency {
                service: parent.name.clone(),
                dependency: dependency.clone(),
                path: path.iter().map(ToString::to_string).collect(),
            });
        }

        let child = self.lookup(parent, dependency).await?;

        if self.context.parents_only && !child.has_dependencies() {
            // Still resolved so a failing leaf fails the run, but not kept
            self.resolver.resolve(&child, &self.context).await?;
            debug!(service = %child.name, "Leaf dependency excluded by parents-only filter");
            return Ok(None);
        }

        self.build_node(child, depth_level, path.to_vec())
            .await
            .map(Some)
    }

    async fn lookup(
        &self,
        parent: &ServiceDescriptor,
        dependency: &ServiceId,
    ) -> TreeResult<ServiceDescriptor> {
        self.backend
            .get_services(&ServiceFilter::by_id(dependency.clone()))
            .await
            .map_err(|e| TreeError::query(&parent.name, QueryPhase::Lookup, e))?
            .into_iter()
            .find(|s| &s.id == dependency)
            .ok_or_else(|| TreeError::DependencyNotFound {
                service: parent.name.clone(),
                dependency: dependency.clone(),
            })
    }
}
