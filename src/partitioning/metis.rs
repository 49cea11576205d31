//! METIS k-way partitioning of the element dual graph.
//!
//! Requires the `metis-support` feature and a system METIS library.

use super::dual_graph::DualGraph;
use super::{ElementNodeCsr, GraphPartitioner, MeshPartition, PartitionError, PartitionId};

/// Calls `METIS_PartGraphKway` on the dual graph built from `ncommon`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetisPartitioner;

impl From<metis::Error> for PartitionError {
    fn from(e: metis::Error) -> Self {
        match e {
            metis::Error::Input => PartitionError::InvalidInput("METIS rejected its input".into()),
            metis::Error::Memory => PartitionError::OutOfMemory,
            other => PartitionError::Failure(format!("{other:?}")),
        }
    }
}

impl GraphPartitioner for MetisPartitioner {
    fn name(&self) -> &'static str {
        "metis"
    }

    fn partition_mesh_dual(
        &self,
        mesh: &ElementNodeCsr,
        n_parts: usize,
    ) -> Result<MeshPartition, PartitionError> {
        if n_parts == 0 {
            return Err(PartitionError::InvalidInput("n_parts must be positive".into()));
        }
        let graph = DualGraph::from_element_nodes(mesh)?;
        let to_idx = |v: usize| {
            metis::Idx::try_from(v).map_err(|_| {
                PartitionError::InvalidInput(format!("{v} does not fit METIS index type"))
            })
        };
        let xadj = graph.xadj.iter().map(|&v| to_idx(v)).collect::<Result<Vec<_>, _>>()?;
        let adjncy = graph.adjncy.iter().map(|&v| to_idx(v)).collect::<Result<Vec<_>, _>>()?;
        let nparts = to_idx(n_parts)?;

        let mut part = vec![0 as metis::Idx; graph.n_vertices()];
        let handle = metis::Graph::new(1, nparts, &xadj, &adjncy)
            .map_err(|e| PartitionError::InvalidInput(format!("{e:?}")))?;
        let objval = handle.part_kway(&mut part)?;

        let element_part: Vec<PartitionId> = part.into_iter().map(|p| p as PartitionId).collect();
        log::debug!(
            "metis partition of {} elements into {n_parts} parts, edge cut {objval}",
            graph.n_vertices()
        );
        Ok(MeshPartition {
            node_part: super::node_parts_from_elements(mesh, &element_part),
            element_part,
        })
    }
}
