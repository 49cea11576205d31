//! MeshPartitionError: Unified error type for mesh-partition public APIs
//!
//! Every stage of the pipeline (topology validation, canonicalization,
//! adjacency, partitioning, index construction, smoother blocking) reports
//! failures through this type instead of panicking. Malformed topology and
//! contract violations are fatal to mesh setup; nothing here is retried.

use thiserror::Error;

use crate::partitioning::error::PartitionError;
use crate::topology::element::MaterialTag;
use crate::topology::element_type::ElementType;

/// Unified error type for mesh-partition operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshPartitionError {
    /// The mesh has no elements.
    #[error("Topology error: mesh has no elements")]
    EmptyMesh,
    /// An element carries a node count its type does not support.
    #[error("Topology error: element {element} of type {kind:?} has {nodes} nodes (unsupported)")]
    UnsupportedNodeCount {
        element: usize,
        kind: ElementType,
        nodes: usize,
    },
    /// An element references a node index outside `[0, n_nodes)`.
    #[error("Topology error: element {element} references node {node} but the mesh has {n_nodes} nodes")]
    NodeOutOfRange {
        element: usize,
        node: usize,
        n_nodes: usize,
    },
    /// A node is not referenced by any element.
    #[error("Topology error: node {0} is not referenced by any element")]
    OrphanNode(usize),
    /// Element types of different topological dimension were mixed.
    #[error("Topology error: element {element} has dimension {found}, mesh dimension is {expected}")]
    MixedDimension {
        element: usize,
        expected: u8,
        found: u8,
    },
    /// A node is used as a vertex by one element and as a mid/bubble node by another.
    #[error("Topology error: node {node} is classified inconsistently across elements")]
    InconsistentNodeClass { node: usize },
    /// A face is shared by more than two elements.
    #[error("Topology error: face {face} of element {element} matches {matches} other faces")]
    NonManifoldFace {
        element: usize,
        face: usize,
        matches: usize,
    },
    /// A subdomain count of zero was requested.
    #[error("Contract violation: at least one subdomain is required")]
    ZeroSubdomains,
    /// A smoother block size of zero was requested.
    #[error("Contract violation: smoother block size must be positive")]
    InvalidBlockSize,
    /// A subdomain id outside `[0, n_subdomains)` was requested.
    #[error("Contract violation: subdomain {subdomain} out of range (n_subdomains = {n_subdomains})")]
    InvalidSubdomain {
        subdomain: usize,
        n_subdomains: usize,
    },
    /// An owned element has a material tag that no smoother group lists.
    #[error("Contract violation: element {element} has material {material:?} not listed in any block group")]
    UnlistedMaterial {
        element: usize,
        material: MaterialTag,
    },
    /// A material is listed by more than one smoother block group.
    #[error("Contract violation: material {material:?} is listed by more than one block group")]
    DuplicateMaterial { material: MaterialTag },
    /// The element owner array does not match the element count.
    #[error("Partition error: owner array has {got} entries, mesh has {expected} elements")]
    OwnerLengthMismatch { expected: usize, got: usize },
    /// An element was assigned to a subdomain outside `[0, n_subdomains)`.
    #[error("Partition error: element {element} assigned to subdomain {owner} (n_subdomains = {n_subdomains})")]
    InvalidOwner {
        element: usize,
        owner: usize,
        n_subdomains: usize,
    },
    /// A coordinate array does not match the node count.
    #[error("Geometry error: expected {expected} coordinate values, got {got}")]
    CoordinateLengthMismatch { expected: usize, got: usize },
    /// A structural invariant does not hold.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    /// The graph partitioner failed.
    #[error(transparent)]
    Partitioner(#[from] PartitionError),
}
