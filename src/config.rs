//! Partitioning configuration.
//!
//! Plain serde structs so a driver can read them from JSON or TOML next to
//! the rest of its run configuration.

use serde::{Deserialize, Serialize};

use crate::partitioning::{GraphPartitioner, GreedyPartitioner, PartitionError};

/// Which dual-graph partitioner splits the mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionerKind {
    /// Native breadth-first graph growing.
    #[default]
    Greedy,
    /// METIS k-way (needs the `metis-support` feature).
    Metis,
}

impl PartitionerKind {
    /// Instantiate the partitioner, failing if it was not compiled in.
    pub fn instantiate(self) -> Result<Box<dyn GraphPartitioner>, PartitionError> {
        match self {
            PartitionerKind::Greedy => Ok(Box::new(GreedyPartitioner)),
            #[cfg(feature = "metis-support")]
            PartitionerKind::Metis => Ok(Box::new(crate::partitioning::MetisPartitioner)),
            #[cfg(not(feature = "metis-support"))]
            PartitionerKind::Metis => Err(PartitionError::Unavailable("metis-support")),
        }
    }
}

/// Settings for partitioning one mesh level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Number of subdomains `N`; `1` skips the partitioner.
    pub n_subdomains: usize,
    pub partitioner: PartitionerKind,
    /// Shared nodes making two elements dual-graph neighbours. `None` uses
    /// `dimension + 1` capped by the smallest face.
    pub ncommon: Option<usize>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            n_subdomains: 1,
            partitioner: PartitionerKind::Greedy,
            ncommon: None,
        }
    }
}

impl PartitionConfig {
    /// Configuration for `n_subdomains` parts with default settings otherwise.
    pub fn with_subdomains(n_subdomains: usize) -> Self {
        Self {
            n_subdomains,
            ..Self::default()
        }
    }
}
