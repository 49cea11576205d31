//! Partition quality metrics.
//!
//! Cheap diagnostics over a dual graph and an element owner array. They are
//! logged after partitioning and used by tests; nothing downstream depends on
//! their values.

use super::PartitionId;
use super::dual_graph::DualGraph;

/// Number of dual-graph edges whose endpoints land in different parts (O(E)).
pub fn edge_cut(graph: &DualGraph, element_part: &[PartitionId]) -> usize {
    graph
        .edges()
        .filter(|&(u, v)| element_part[u] != element_part[v])
        .count()
}

/// Largest part size divided by the mean part size.
///
/// `1.0` is perfectly balanced. Returns `0.0` when there is nothing to
/// measure.
pub fn load_imbalance(element_part: &[PartitionId], n_parts: usize) -> f64 {
    if n_parts == 0 || element_part.is_empty() {
        return 0.0;
    }
    let mut sizes = vec![0usize; n_parts];
    for &p in element_part {
        if let Some(size) = sizes.get_mut(p) {
            *size += 1;
        }
    }
    let max = sizes.iter().copied().max().unwrap_or(0);
    let mean = element_part.len() as f64 / n_parts as f64;
    max as f64 / mean
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> DualGraph {
        let mut xadj = vec![0];
        let mut adjncy = Vec::new();
        for v in 0..n {
            if v > 0 {
                adjncy.push(v - 1);
            }
            if v + 1 < n {
                adjncy.push(v + 1);
            }
            xadj.push(adjncy.len());
        }
        DualGraph {
            xadj,
            adjncy,
            vwgt: vec![1; n],
        }
    }

    #[test]
    fn edge_cut_counts_crossing_edges_once() {
        let g = path(4);
        assert_eq!(edge_cut(&g, &[0, 0, 1, 1]), 1);
        assert_eq!(edge_cut(&g, &[0, 1, 0, 1]), 3);
        assert_eq!(edge_cut(&g, &[0; 4]), 0);
    }

    #[test]
    fn imbalance_of_uneven_split() {
        assert_eq!(load_imbalance(&[0, 0, 1, 1], 2), 1.0);
        assert_eq!(load_imbalance(&[0, 0, 0, 1], 2), 1.5);
        assert_eq!(load_imbalance(&[], 2), 0.0);
    }
}
