//! Mesh topology: element types, validated connectivity, canonical node
//! ordering and adjacency.

pub mod adjacency;
pub mod canonical;
pub mod element;
pub mod element_type;

pub use adjacency::{ElementAdjacency, FaceNeighbor};
pub use canonical::{NodeClassCounts, NodeRenumbering};
pub use element::{Element, MaterialTag, MeshTopology};
pub use element_type::{ElementType, NodeClass, NodeLevel};
