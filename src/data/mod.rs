//! Data module: node geometry carried alongside the topology
#![warn(missing_docs)]

pub mod coordinates;

/// Interleaved node coordinates with an attached dimension.
pub use coordinates::Coordinates;
