//! Build a CSR (compressed-sparse-row) *dual graph* of a mesh.
//
// Each *element* is a graph vertex; an undirected edge joins two elements
// that share at least `ncommon` nodes. With `ncommon` equal to the node count
// of a face this is face adjacency.
//
// Returned in METIS-ready CSR triples:
//
// * `xadj[i] .. xadj[i+1]`   = neighbour list of element *i* (ascending)
// * `adjncy`                 = concatenated neighbour elements
// * `vwgt[i]`                = vertex weight, default = 1
//
// The dual graph is **symmetrised** (i↔j appear in both lists) and
// **self-free** (no loops).

use crate::partitioning::ElementNodeCsr;
use crate::partitioning::error::PartitionError;

/// CSR triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualGraph {
    pub xadj: Vec<usize>,
    pub adjncy: Vec<usize>,
    pub vwgt: Vec<i32>,
}

impl DualGraph {
    /// Build the dual graph of an element→node CSR.
    pub fn from_element_nodes(mesh: &ElementNodeCsr) -> Result<Self, PartitionError> {
        mesh.validate()?;
        let n = mesh.n_elements();
        let ncommon = mesh.ncommon.max(1);

        // node -> elements, CSR
        let mut nptr = vec![0usize; mesh.n_nodes + 1];
        for &node in &mesh.eind {
            nptr[node + 1] += 1;
        }
        for i in 0..mesh.n_nodes {
            nptr[i + 1] += nptr[i];
        }
        let mut cursor = nptr.clone();
        let mut nind = vec![0usize; mesh.eind.len()];
        for e in 0..n {
            for &node in mesh.element_nodes(e) {
                nind[cursor[node]] = e;
                cursor[node] += 1;
            }
        }

        let mut shared = vec![0usize; n];
        let mut touched = Vec::new();
        let mut xadj = Vec::with_capacity(n + 1);
        let mut adjncy = Vec::new();
        xadj.push(0);
        for e in 0..n {
            for &node in mesh.element_nodes(e) {
                for &other in &nind[nptr[node]..nptr[node + 1]] {
                    if other == e {
                        continue;
                    }
                    if shared[other] == 0 {
                        touched.push(other);
                    }
                    shared[other] += 1;
                }
            }
            touched.sort_unstable();
            for &other in &touched {
                if shared[other] >= ncommon {
                    adjncy.push(other);
                }
                shared[other] = 0;
            }
            touched.clear();
            xadj.push(adjncy.len());
        }

        Ok(Self {
            xadj,
            adjncy,
            vwgt: vec![1; n],
        })
    }

    pub fn n_vertices(&self) -> usize {
        self.xadj.len().saturating_sub(1)
    }

    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.adjncy[self.xadj[v]..self.xadj[v + 1]]
    }

    /// Undirected edges `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n_vertices()).flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .copied()
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }
}
