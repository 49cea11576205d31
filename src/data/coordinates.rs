//! Geometry/coordinates storage for mesh nodes.
//!
//! Coordinates are stored interleaved, `dimension` values per node. The
//! partitioning core never reads the values; it only reorders them whenever
//! node indices are renumbered.

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshPartitionError;

/// Interleaved node coordinates with an attached spatial dimension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    dimension: usize,
    values: Vec<f64>,
}

impl Coordinates {
    /// Wrap interleaved values, validating that they divide evenly into nodes.
    pub fn try_new(dimension: usize, values: Vec<f64>) -> Result<Self, MeshPartitionError> {
        if dimension == 0 || values.len() % dimension != 0 {
            return Err(MeshPartitionError::CoordinateLengthMismatch {
                expected: values.len().next_multiple_of(dimension.max(1)),
                got: values.len(),
            });
        }
        Ok(Self { dimension, values })
    }

    /// Returns the spatial dimension per node.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of nodes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len() / self.dimension
    }

    /// True when no node is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Coordinates of `node`.
    #[inline]
    pub fn node(&self, node: usize) -> &[f64] {
        let start = node * self.dimension;
        &self.values[start..start + self.dimension]
    }

    /// Raw interleaved values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Return a copy where node `i` moves to position `old_to_new[i]`.
    pub fn permuted(&self, old_to_new: &[usize]) -> Result<Self, MeshPartitionError> {
        if old_to_new.len() != self.len() {
            return Err(MeshPartitionError::CoordinateLengthMismatch {
                expected: old_to_new.len() * self.dimension,
                got: self.values.len(),
            });
        }
        let mut values = vec![0.0; self.values.len()];
        for (old, &new) in old_to_new.iter().enumerate() {
            let d = self.dimension;
            values[new * d..(new + 1) * d].copy_from_slice(self.node(old));
        }
        Ok(Self {
            dimension: self.dimension,
            values,
        })
    }
}
