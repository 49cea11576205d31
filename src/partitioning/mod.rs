//! Entry-point for dual-graph mesh partitioning.
//!
//! A [`GraphPartitioner`] receives the element→node connectivity in CSR form
//! and a target part count, and returns an element owner array. Three
//! implementations are provided:
//!
//! * [`GreedyPartitioner`]: native breadth-first graph growing on the dual
//!   graph (default, deterministic, no external library);
//! * [`PrescribedPartitioner`]: hands back an owner array chosen by the caller;
//! * `MetisPartitioner`: METIS k-way on the dual graph (`metis-support`).
//!
//! Only the element owner array is authoritative. The node owner array is
//! returned for completeness and is recomputed downstream.

pub mod dual_graph;
pub mod error;
pub mod greedy;
#[cfg(feature = "metis-support")]
pub mod metis;
pub mod metrics;

pub use self::dual_graph::DualGraph;
pub use self::error::PartitionError;
pub use self::greedy::GreedyPartitioner;
#[cfg(feature = "metis-support")]
pub use self::metis::MetisPartitioner;
pub use self::metrics::{edge_cut, load_imbalance};

use crate::topology::element::MeshTopology;
use crate::topology::element_type::NodeLevel;

pub type PartitionId = usize;

/// CSR element→node connectivity handed to a partitioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNodeCsr {
    /// Number of nodes referenced by `eind`.
    pub n_nodes: usize,
    /// `eptr[e]..eptr[e+1]` indexes the nodes of element `e`.
    pub eptr: Vec<usize>,
    pub eind: Vec<usize>,
    /// Shared nodes required for two elements to be dual-graph neighbours.
    pub ncommon: usize,
}

impl ElementNodeCsr {
    /// Flatten the connectivity of `mesh` at `level`, keeping global node ids.
    pub fn from_mesh(mesh: &MeshTopology, level: NodeLevel, ncommon: usize) -> Self {
        let mut eptr = Vec::with_capacity(mesh.n_elements() + 1);
        let mut eind = Vec::new();
        eptr.push(0);
        for element in mesh.elements() {
            eind.extend_from_slice(element.nodes_at(level));
            eptr.push(eind.len());
        }
        Self {
            n_nodes: mesh.n_nodes(),
            eptr,
            eind,
            ncommon,
        }
    }

    /// Flatten the connectivity of a subset of elements, renumbering nodes
    /// locally in first-touch order.
    pub fn from_elements(
        mesh: &MeshTopology,
        elements: impl IntoIterator<Item = usize>,
        level: NodeLevel,
        ncommon: usize,
    ) -> Self {
        let mut local: hashbrown::HashMap<usize, usize> = hashbrown::HashMap::new();
        let mut eptr = vec![0];
        let mut eind = Vec::new();
        for e in elements {
            for &node in mesh.element(e).nodes_at(level) {
                let next = local.len();
                eind.push(*local.entry(node).or_insert(next));
            }
            eptr.push(eind.len());
        }
        Self {
            n_nodes: local.len(),
            eptr,
            eind,
            ncommon,
        }
    }

    pub fn n_elements(&self) -> usize {
        self.eptr.len().saturating_sub(1)
    }

    pub fn element_nodes(&self, e: usize) -> &[usize] {
        &self.eind[self.eptr[e]..self.eptr[e + 1]]
    }

    /// Check the CSR shape before handing it to a partitioner.
    pub fn validate(&self) -> Result<(), PartitionError> {
        if self.eptr.first() != Some(&0) {
            return Err(PartitionError::InvalidInput("eptr must start at 0".into()));
        }
        if self.eptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(PartitionError::InvalidInput("eptr must be non-decreasing".into()));
        }
        if self.eptr.last() != Some(&self.eind.len()) {
            return Err(PartitionError::InvalidInput(format!(
                "eptr ends at {:?} but eind has {} entries",
                self.eptr.last(),
                self.eind.len()
            )));
        }
        if let Some(&bad) = self.eind.iter().find(|&&n| n >= self.n_nodes) {
            return Err(PartitionError::InvalidInput(format!(
                "node {bad} out of range (n_nodes = {})",
                self.n_nodes
            )));
        }
        Ok(())
    }
}

/// Result of a dual-graph partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshPartition {
    /// Owner of every element, in `[0, n_parts)`.
    pub element_part: Vec<PartitionId>,
    /// Owner of every node (discarded by the index builder).
    pub node_part: Vec<PartitionId>,
}

/// A dual-graph mesh partitioner.
pub trait GraphPartitioner {
    /// Short name for log messages.
    fn name(&self) -> &'static str;

    /// Split the elements of `mesh` into `n_parts` parts.
    ///
    /// Implementations must be deterministic: equal inputs give equal owners.
    fn partition_mesh_dual(
        &self,
        mesh: &ElementNodeCsr,
        n_parts: usize,
    ) -> Result<MeshPartition, PartitionError>;
}

impl<P: GraphPartitioner + ?Sized> GraphPartitioner for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn partition_mesh_dual(
        &self,
        mesh: &ElementNodeCsr,
        n_parts: usize,
    ) -> Result<MeshPartition, PartitionError> {
        (**self).partition_mesh_dual(mesh, n_parts)
    }
}

/// Returns an owner array fixed by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrescribedPartitioner {
    element_part: Vec<PartitionId>,
}

impl PrescribedPartitioner {
    pub fn new(element_part: Vec<PartitionId>) -> Self {
        Self { element_part }
    }
}

impl GraphPartitioner for PrescribedPartitioner {
    fn name(&self) -> &'static str {
        "prescribed"
    }

    fn partition_mesh_dual(
        &self,
        mesh: &ElementNodeCsr,
        n_parts: usize,
    ) -> Result<MeshPartition, PartitionError> {
        mesh.validate()?;
        if self.element_part.len() != mesh.n_elements() {
            return Err(PartitionError::InvalidInput(format!(
                "prescribed owners cover {} elements, mesh has {}",
                self.element_part.len(),
                mesh.n_elements()
            )));
        }
        if let Some(&bad) = self.element_part.iter().find(|&&p| p >= n_parts) {
            return Err(PartitionError::InvalidInput(format!(
                "prescribed owner {bad} out of range (n_parts = {n_parts})"
            )));
        }
        Ok(MeshPartition {
            node_part: node_parts_from_elements(mesh, &self.element_part),
            element_part: self.element_part.clone(),
        })
    }
}

/// Shared-node threshold for face adjacency: `dimension + 1`, capped by the
/// smallest face of the element types present.
pub fn default_ncommon(mesh: &MeshTopology) -> usize {
    (usize::from(mesh.dimension()) + 1)
        .min(mesh.min_face_node_count())
        .max(1)
}

/// Node owners as the minimum owner among incident elements.
pub fn node_parts_from_elements(mesh: &ElementNodeCsr, element_part: &[PartitionId]) -> Vec<PartitionId> {
    let mut node_part = vec![PartitionId::MAX; mesh.n_nodes];
    for (e, &p) in element_part.iter().enumerate() {
        for &node in mesh.element_nodes(e) {
            node_part[node] = node_part[node].min(p);
        }
    }
    node_part
}
