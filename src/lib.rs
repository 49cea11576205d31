#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-partition
//!
//! mesh-partition splits an unstructured finite-element mesh across a fixed
//! number of subdomains and builds, for every DOF space a mixed finite-element
//! solver uses, a subdomain-contiguous numbering with owned ranges and ghost
//! lists. It also groups a subdomain's elements into blocks for Vanka-type
//! local smoothers.
//!
//! ## Features
//! - Validated element topology for lines, triangles, quadrilaterals,
//!   tetrahedra, wedges and hexahedra at linear, quadratic and full node sets
//! - Canonical node ordering: vertex nodes, then mid nodes, then bubbles
//! - Vertex→element and face-neighbour adjacency with boundary detection
//! - Pluggable dual-graph partitioners (native greedy, prescribed, METIS)
//! - Partition indices for linear, quadratic, biquadratic, piecewise-constant
//!   and discontinuous-linear spaces
//! - Fixed, material-split and connectivity-aware smoother blocks
//!
//! ## Determinism
//!
//! Every stage is deterministic and needs no communication: all processes
//! compute identical tables from identical inputs.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! mesh-partition = "0.3"
//! # Optional features:
//! # features = ["metis-support", "check-invariants"]
//! ```
//!
//! ```
//! use mesh_partition::prelude::*;
//!
//! let raw = mesh_partition::mesh_generation::quad_grid(4, 4, 9)?;
//! let level = MeshLevel::build(raw, &PartitionConfig::with_subdomains(2))?;
//! assert_eq!(level.index().dof_count(DofSpace::Linear), 25);
//! # Ok::<(), MeshPartitionError>(())
//! ```

pub mod config;
pub mod data;
pub mod debug_invariants;
pub mod dofmap;
pub mod mesh_error;
pub mod mesh_generation;
pub mod mesh_level;
pub mod partitioning;
pub mod smoother;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::config::{PartitionConfig, PartitionerKind};
    pub use crate::data::coordinates::Coordinates;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::dofmap::{DofSpace, GhostList, PartitionIndex};
    pub use crate::mesh_error::MeshPartitionError;
    pub use crate::mesh_level::{MeshLevel, MeshSummary, RawMesh};
    pub use crate::partitioning::{
        ElementNodeCsr, GraphPartitioner, GreedyPartitioner, MeshPartition, PartitionError,
        PrescribedPartitioner,
    };
    #[cfg(feature = "metis-support")]
    pub use crate::partitioning::MetisPartitioner;
    pub use crate::smoother::{BlockPolicy, MaterialGroup, SmootherBlocks};
    pub use crate::topology::adjacency::{ElementAdjacency, FaceNeighbor};
    pub use crate::topology::canonical::{NodeClassCounts, NodeRenumbering};
    pub use crate::topology::element::{Element, MaterialTag, MeshTopology};
    pub use crate::topology::element_type::{ElementType, NodeClass, NodeLevel};
}

// Built tables are shared read-only across solver threads.
static_assertions::assert_impl_all!(dofmap::PartitionIndex: Send, Sync);
static_assertions::assert_impl_all!(mesh_level::MeshLevel: Send, Sync);
static_assertions::assert_impl_all!(smoother::SmootherBlocks: Send, Sync);
static_assertions::assert_impl_all!(partitioning::GreedyPartitioner: Send, Sync);
