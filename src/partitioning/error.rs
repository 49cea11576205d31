//! Partitioning errors for mesh-partition

use thiserror::Error;

/// Errors reported by a [`GraphPartitioner`](super::GraphPartitioner).
///
/// Each kind carries its own message so a bad mesh can be told apart from a
/// resource limit. All of them abort mesh setup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// The partitioner rejected its input (bad CSR arrays, part count, ...).
    #[error("Partitioner input error: {0}")]
    InvalidInput(String),
    /// The partitioner ran out of memory.
    #[error("Partitioner memory error: allocation failed")]
    OutOfMemory,
    /// Any other partitioner failure.
    #[error("Partitioner error: {0}")]
    Failure(String),
    /// The requested partitioner was not compiled in.
    #[error("Partitioner unavailable: enable the `{0}` feature")]
    Unavailable(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds_have_distinct_messages() {
        let input = PartitionError::InvalidInput("bad xadj".into()).to_string();
        let memory = PartitionError::OutOfMemory.to_string();
        let other = PartitionError::Failure("bad xadj".into()).to_string();
        assert_eq!(input, "Partitioner input error: bad xadj");
        assert_eq!(memory, "Partitioner memory error: allocation failed");
        assert_eq!(other, "Partitioner error: bad xadj");
        assert_ne!(input, other);
    }
}
