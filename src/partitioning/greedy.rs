//! Native breadth-first graph-growing partitioner.
//!
//! Parts are grown one after another on the dual graph. Part `p` starts from
//! the lowest-numbered unassigned element and absorbs elements in BFS order
//! until it reaches its target size `n / n_parts` (the first `n % n_parts`
//! parts take one extra). When a front runs dry on a disconnected mesh the
//! next lowest unassigned element restarts it. No randomness is involved, so
//! equal inputs always give equal owners.

use std::collections::VecDeque;

use super::dual_graph::DualGraph;
use super::{ElementNodeCsr, GraphPartitioner, MeshPartition, PartitionError, PartitionId};

/// Deterministic BFS partitioner used when no external library is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyPartitioner;

const UNASSIGNED: PartitionId = PartitionId::MAX;

impl GreedyPartitioner {
    /// Grow `n_parts` parts on an already-built dual graph.
    pub fn grow(graph: &DualGraph, n_parts: usize) -> Result<Vec<PartitionId>, PartitionError> {
        let n = graph.n_vertices();
        if n_parts == 0 {
            return Err(PartitionError::InvalidInput("n_parts must be positive".into()));
        }
        if n_parts > n {
            return Err(PartitionError::InvalidInput(format!(
                "cannot split {n} elements into {n_parts} non-empty parts"
            )));
        }

        let mut part = vec![UNASSIGNED; n];
        let mut queue = VecDeque::new();
        let mut next_seed = 0usize;
        for p in 0..n_parts {
            let target = n / n_parts + usize::from(p < n % n_parts);
            let mut size = 0;
            queue.clear();
            while size < target {
                let v = match queue.pop_front() {
                    Some(v) => v,
                    None => {
                        while part[next_seed] != UNASSIGNED {
                            next_seed += 1;
                        }
                        next_seed
                    }
                };
                if part[v] != UNASSIGNED {
                    continue;
                }
                part[v] = p;
                size += 1;
                queue.extend(graph.neighbors(v).iter().filter(|&&u| part[u] == UNASSIGNED));
            }
        }
        Ok(part)
    }
}

impl GraphPartitioner for GreedyPartitioner {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn partition_mesh_dual(
        &self,
        mesh: &ElementNodeCsr,
        n_parts: usize,
    ) -> Result<MeshPartition, PartitionError> {
        let graph = DualGraph::from_element_nodes(mesh)?;
        let element_part = Self::grow(&graph, n_parts)?;
        log::debug!(
            "greedy partition of {} elements into {n_parts} parts, edge cut {}",
            graph.n_vertices(),
            super::edge_cut(&graph, &element_part)
        );
        Ok(MeshPartition {
            node_part: super::node_parts_from_elements(mesh, &element_part),
            element_part,
        })
    }
}
