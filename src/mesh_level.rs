//! One partitioned mesh level: the setup pipeline and its products.
//!
//! [`MeshLevel::build`] takes the raw output of a mesh reader and runs
//!
//! 1. topology validation,
//! 2. canonical node renumbering (vertex, then mid, then bubble nodes),
//! 3. vertex and face adjacency,
//! 4. dual-graph partitioning into `N` subdomains (skipped for `N = 1`),
//! 5. DOF index construction for every space,
//! 6. coordinate reordering into the partitioned full-node numbering.
//!
//! Every stage is deterministic and local, so all processes agree on the
//! result without communicating.

use serde::{Deserialize, Serialize};

use crate::config::PartitionConfig;
use crate::data::coordinates::Coordinates;
use crate::dofmap::{DofSpace, PartitionIndex};
use crate::mesh_error::MeshPartitionError;
use crate::partitioning::{
    DualGraph, ElementNodeCsr, GraphPartitioner, default_ncommon, edge_cut, load_imbalance,
};
use crate::smoother::{BlockPolicy, SmootherBlocks};
use crate::topology::adjacency::ElementAdjacency;
use crate::topology::canonical::{NodeClassCounts, NodeRenumbering};
use crate::topology::element::{Element, MeshTopology};
use crate::topology::element_type::NodeLevel;

/// What a mesh reader hands over.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMesh {
    pub elements: Vec<Element>,
    pub n_nodes: usize,
    /// Node coordinates in reader numbering, if geometry is known.
    pub coordinates: Option<Coordinates>,
    /// Per element, per face boundary flags known to the reader.
    pub boundary_seeds: Option<Vec<Vec<Option<i32>>>>,
}

/// Sizes logged once a level is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshSummary {
    pub n_elements: usize,
    pub n_nodes: usize,
    pub dimension: u8,
    pub node_classes: NodeClassCounts,
    pub n_subdomains: usize,
    /// Global size per space, in [`DofSpace::ALL`] order.
    pub dof_totals: [usize; 5],
    pub boundary_faces: usize,
    pub edge_cut: usize,
    pub load_imbalance: f64,
}

/// A mesh level after partitioning.
#[derive(Clone, Debug)]
pub struct MeshLevel {
    topology: MeshTopology,
    renumbering: NodeRenumbering,
    adjacency: ElementAdjacency,
    index: PartitionIndex,
    coordinates: Option<Coordinates>,
    summary: MeshSummary,
}

impl MeshLevel {
    /// Run the pipeline with the partitioner named in `config`.
    pub fn build(raw: RawMesh, config: &PartitionConfig) -> Result<Self, MeshPartitionError> {
        let partitioner = config.partitioner.instantiate()?;
        Self::build_with(raw, config, partitioner.as_ref())
    }

    /// Run the pipeline with an explicit partitioner.
    pub fn build_with(
        raw: RawMesh,
        config: &PartitionConfig,
        partitioner: &dyn GraphPartitioner,
    ) -> Result<Self, MeshPartitionError> {
        let n_subdomains = config.n_subdomains;
        if n_subdomains == 0 {
            return Err(MeshPartitionError::ZeroSubdomains);
        }
        let RawMesh {
            elements,
            n_nodes,
            coordinates,
            boundary_seeds,
        } = raw;

        let mut topology = MeshTopology::new(elements, n_nodes)?;
        if let Some(coords) = &coordinates {
            if coords.len() != n_nodes {
                return Err(MeshPartitionError::CoordinateLengthMismatch {
                    expected: n_nodes * coords.dimension(),
                    got: coords.values().len(),
                });
            }
        }
        log::debug!(
            "validated mesh: {} elements, {} nodes, dimension {}",
            topology.n_elements(),
            n_nodes,
            topology.dimension()
        );

        let renumbering = NodeRenumbering::compute(&topology)?;
        renumbering.apply(&mut topology);
        let coordinates = coordinates
            .map(|c| renumbering.permute_coordinates(&c))
            .transpose()?;

        let adjacency = ElementAdjacency::build(&topology, boundary_seeds.as_deref())?;
        log::debug!("adjacency: {} boundary faces", adjacency.boundary_faces().count());

        let n_elem = topology.n_elements();
        let (element_owner, cut, imbalance) = if n_subdomains == 1 {
            (vec![0; n_elem], 0, 1.0)
        } else {
            if n_subdomains > n_elem {
                log::warn!("{n_subdomains} subdomains requested for {n_elem} elements");
            }
            let ncommon = config.ncommon.unwrap_or_else(|| default_ncommon(&topology));
            let csr = ElementNodeCsr::from_mesh(&topology, NodeLevel::Full, ncommon);
            let parts = partitioner.partition_mesh_dual(&csr, n_subdomains)?;
            let graph = DualGraph::from_element_nodes(&csr)?;
            let cut = edge_cut(&graph, &parts.element_part);
            let imbalance = load_imbalance(&parts.element_part, n_subdomains);
            log::debug!(
                "{} partitioner: {n_subdomains} parts, ncommon {ncommon}",
                partitioner.name()
            );
            (parts.element_part, cut, imbalance)
        };

        let index = PartitionIndex::build(&topology, renumbering.counts(), &element_owner, n_subdomains)?;
        let coordinates = coordinates
            .map(|c| c.permuted(index.space(DofSpace::Biquadratic).global_to_partitioned()))
            .transpose()?;

        let summary = MeshSummary {
            n_elements: n_elem,
            n_nodes,
            dimension: topology.dimension(),
            node_classes: renumbering.counts(),
            n_subdomains,
            dof_totals: DofSpace::ALL.map(|space| index.dof_count(space)),
            boundary_faces: adjacency.boundary_faces().count(),
            edge_cut: cut,
            load_imbalance: imbalance,
        };
        log::info!(
            "mesh level: {} elements, {} nodes ({} vertex, {} mid, {} bubble), {} subdomains, dofs {:?}, edge cut {}, imbalance {:.3}",
            summary.n_elements,
            summary.n_nodes,
            summary.node_classes.vertex,
            summary.node_classes.mid,
            summary.node_classes.bubble,
            summary.n_subdomains,
            summary.dof_totals,
            summary.edge_cut,
            summary.load_imbalance
        );

        Ok(Self {
            topology,
            renumbering,
            adjacency,
            index,
            coordinates,
            summary,
        })
    }

    /// Canonically numbered topology.
    pub fn topology(&self) -> &MeshTopology {
        &self.topology
    }

    /// Reader numbering to canonical numbering.
    pub fn renumbering(&self) -> &NodeRenumbering {
        &self.renumbering
    }

    pub fn adjacency(&self) -> &ElementAdjacency {
        &self.adjacency
    }

    pub fn index(&self) -> &PartitionIndex {
        &self.index
    }

    /// Coordinates in partitioned full-node numbering.
    pub fn coordinates(&self) -> Option<&Coordinates> {
        self.coordinates.as_ref()
    }

    pub fn summary(&self) -> &MeshSummary {
        &self.summary
    }

    /// Smoother blocks of one subdomain.
    pub fn smoother_blocks(
        &self,
        subdomain: usize,
        policy: &BlockPolicy,
        partitioner: &dyn GraphPartitioner,
    ) -> Result<SmootherBlocks, MeshPartitionError> {
        SmootherBlocks::build(&self.topology, &self.index, subdomain, policy, partitioner)
    }
}
