use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::error::GraphError;

use super::{AdaptiveGrid, VertexId};

/// Options for [`PathTree::build`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PathTreeConfig {
    /// Vertices farther than this from every sink stay unreachable.
    pub max_distance: Option<f64>,
}

/// A reached vertex in the path tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeNode {
    /// Next vertex toward the nearest sink. `None` for the sinks themselves.
    pub trunk: Option<VertexId>,
}

/// Shortest-path forest rooted at a set of sink vertices.
///
/// Every reachable vertex points at the next vertex on its shortest route
/// to the closest sink. Unreachable vertices have no entry.
#[derive(Debug, Clone, Default)]
pub struct PathTree {
    nodes: HashMap<VertexId, TreeNode>,
}

impl PathTree {
    /// Builds the tree with Dijkstra's algorithm seeded from every sink.
    ///
    /// The search ends once every source is settled, or when the frontier
    /// is exhausted. With no sources the whole reachable grid is settled.
    ///
    /// # Errors
    ///
    /// Returns an error if a sink or a traversed vertex is missing from the grid.
    pub fn build(
        grid: &AdaptiveGrid,
        sources: &[VertexId],
        sinks: &[VertexId],
        config: &PathTreeConfig,
    ) -> Result<Self, GraphError> {
        let mut nodes: HashMap<VertexId, TreeNode> = HashMap::new();
        let mut best: HashMap<VertexId, (f64, Option<VertexId>)> = HashMap::new();
        let mut heap = BinaryHeap::new();
        let mut sequence = 0usize;

        for &sink in sinks {
            grid.vertex(sink)?;
            if best.insert(sink, (0.0, None)).is_none() {
                heap.push(QueueEntry::new(0.0, sequence, sink));
                sequence += 1;
            }
        }

        let mut pending: HashSet<VertexId> = sources.iter().copied().collect();

        while let Some(QueueEntry { distance, vertex, .. }) = heap.pop() {
            if nodes.contains_key(&vertex) {
                continue;
            }
            let trunk = best.get(&vertex).and_then(|&(_, t)| t);
            nodes.insert(vertex, TreeNode { trunk });
            pending.remove(&vertex);
            if !sources.is_empty() && pending.is_empty() {
                break;
            }

            let here = grid.point(vertex)?;
            for (_, next) in grid.neighbors(vertex) {
                if nodes.contains_key(&next) {
                    continue;
                }
                let candidate = distance + (grid.point(next)? - here).norm();
                if config.max_distance.is_some_and(|limit| candidate > limit) {
                    continue;
                }
                let improves = best.get(&next).is_none_or(|&(d, _)| candidate < d);
                if improves {
                    best.insert(next, (candidate, Some(vertex)));
                    heap.push(QueueEntry::new(candidate, sequence, next));
                    sequence += 1;
                }
            }
        }

        Ok(Self { nodes })
    }

    /// Returns the node for `v`, or `None` if `v` is unreachable.
    #[must_use]
    pub fn get(&self, v: VertexId) -> Option<&TreeNode> {
        self.nodes.get(&v)
    }

    #[must_use]
    pub fn contains(&self, v: VertexId) -> bool {
        self.nodes.contains_key(&v)
    }

    /// Next vertex toward a sink, if `v` is reached and is not a sink.
    #[must_use]
    pub fn trunk(&self, v: VertexId) -> Option<VertexId> {
        self.nodes.get(&v).and_then(|n| n.trunk)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts a node directly, bypassing the search.
    pub fn insert(&mut self, v: VertexId, node: TreeNode) {
        self.nodes.insert(v, node);
    }
}

/// Min-heap entry ordered by distance, then by insertion sequence.
#[derive(Debug)]
struct QueueEntry {
    distance: f64,
    sequence: usize,
    vertex: VertexId,
}

impl QueueEntry {
    fn new(distance: f64, sequence: usize, vertex: VertexId) -> Self {
        Self {
            distance,
            sequence,
            vertex,
        }
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that `BinaryHeap` pops the smallest distance first.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}
