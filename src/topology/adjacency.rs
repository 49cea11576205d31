//! Vertex→element and face-neighbour adjacency.
//!
//! Face neighbours are found topologically: a face only looks for partners
//! among the elements incident to its first vertex, so the search is local
//! instead of all-pairs. A face with no partner is a boundary face; a face
//! with more than one partner means the connectivity is non-manifold and
//! mesh setup aborts.

use serde::{Deserialize, Serialize};

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshPartitionError;
use crate::topology::element::MeshTopology;

/// What lies across one face of an element.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FaceNeighbor {
    /// An interior face shared with this element.
    Element(usize),
    /// A boundary face, with the flag seeded by the mesh reader if any.
    Boundary(Option<i32>),
}

impl FaceNeighbor {
    pub fn element(self) -> Option<usize> {
        match self {
            FaceNeighbor::Element(e) => Some(e),
            FaceNeighbor::Boundary(_) => None,
        }
    }

    pub fn is_boundary(self) -> bool {
        matches!(self, FaceNeighbor::Boundary(_))
    }
}

/// Adjacency tables of one mesh level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementAdjacency {
    /// CSR offsets into `vertex_elements`, one row per node.
    vertex_offsets: Vec<usize>,
    vertex_elements: Vec<usize>,
    face_neighbors: Vec<Vec<FaceNeighbor>>,
}

impl ElementAdjacency {
    /// Build both adjacency tables.
    ///
    /// `seeds`, when given, holds one entry per element face with a boundary
    /// flag the reader already knows. A seeded face that finds a partner is
    /// still linked; the flag only survives on true boundary faces.
    pub fn build(
        mesh: &MeshTopology,
        seeds: Option<&[Vec<Option<i32>>]>,
    ) -> Result<Self, MeshPartitionError> {
        let (vertex_offsets, vertex_elements) = build_vertex_elements(mesh);

        let mut face_neighbors: Vec<Vec<FaceNeighbor>> = mesh
            .elements()
            .iter()
            .enumerate()
            .map(|(e, element)| {
                (0..element.kind().face_count())
                    .map(|f| {
                        let seed = seeds
                            .and_then(|s| s.get(e))
                            .and_then(|faces| faces.get(f))
                            .copied()
                            .flatten();
                        FaceNeighbor::Boundary(seed)
                    })
                    .collect()
            })
            .collect();

        let mut key = Vec::with_capacity(4);
        let mut other = Vec::with_capacity(4);
        for (e, element) in mesh.elements().iter().enumerate() {
            for f in 0..element.kind().face_count() {
                if face_neighbors[e][f].element().is_some() {
                    continue;
                }
                key.clear();
                key.extend(element.face_vertices(f));
                key.sort_unstable();

                let candidates = &vertex_elements[vertex_offsets[key[0]]..vertex_offsets[key[0] + 1]];
                let mut found: Option<(usize, usize)> = None;
                let mut matches = 0;
                for &c in candidates.iter().filter(|&&c| c != e) {
                    let candidate = mesh.element(c);
                    for cf in 0..candidate.kind().face_count() {
                        if candidate.kind().faces()[cf].len() != key.len() {
                            continue;
                        }
                        other.clear();
                        other.extend(candidate.face_vertices(cf));
                        other.sort_unstable();
                        if other == key {
                            matches += 1;
                            found = Some((c, cf));
                        }
                    }
                }

                match (matches, found) {
                    (0, _) => {}
                    (1, Some((c, cf))) => {
                        face_neighbors[e][f] = FaceNeighbor::Element(c);
                        face_neighbors[c][cf] = FaceNeighbor::Element(e);
                    }
                    _ => {
                        return Err(MeshPartitionError::NonManifoldFace {
                            element: e,
                            face: f,
                            matches,
                        });
                    }
                }
            }
        }

        let adjacency = Self {
            vertex_offsets,
            vertex_elements,
            face_neighbors,
        };
        crate::debug_invariants!(adjacency.validate_invariants(), "element adjacency");
        Ok(adjacency)
    }

    /// Elements incident to vertex node `node` (empty for non-vertex nodes).
    pub fn vertex_elements(&self, node: usize) -> &[usize] {
        &self.vertex_elements[self.vertex_offsets[node]..self.vertex_offsets[node + 1]]
    }

    /// Neighbours across every face of `element`.
    pub fn face_neighbors(&self, element: usize) -> &[FaceNeighbor] {
        &self.face_neighbors[element]
    }

    /// Neighbour across face `face` of `element`.
    pub fn neighbor(&self, element: usize, face: usize) -> FaceNeighbor {
        self.face_neighbors[element][face]
    }

    pub fn is_boundary(&self, element: usize, face: usize) -> bool {
        self.neighbor(element, face).is_boundary()
    }

    /// Every `(element, face)` pair on the mesh boundary, in element order.
    pub fn boundary_faces(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.face_neighbors.iter().enumerate().flat_map(|(e, faces)| {
            faces
                .iter()
                .enumerate()
                .filter(|(_, n)| n.is_boundary())
                .map(move |(f, _)| (e, f))
        })
    }

    pub fn n_elements(&self) -> usize {
        self.face_neighbors.len()
    }
}

fn build_vertex_elements(mesh: &MeshTopology) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = vec![0usize; mesh.n_nodes() + 1];
    for element in mesh.elements() {
        for &v in element.vertices() {
            offsets[v + 1] += 1;
        }
    }
    for i in 0..mesh.n_nodes() {
        offsets[i + 1] += offsets[i];
    }
    let mut cursor = offsets.clone();
    let mut elements = vec![0usize; offsets[mesh.n_nodes()]];
    for (e, element) in mesh.elements().iter().enumerate() {
        for &v in element.vertices() {
            elements[cursor[v]] = e;
            cursor[v] += 1;
        }
    }
    (offsets, elements)
}

impl DebugInvariants for ElementAdjacency {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "element adjacency");
    }

    /// Every interior face is recorded on both sides, exactly once each.
    fn validate_invariants(&self) -> Result<(), MeshPartitionError> {
        for (e, faces) in self.face_neighbors.iter().enumerate() {
            for (f, n) in faces.iter().enumerate() {
                let Some(other) = n.element() else { continue };
                if other == e {
                    return Err(MeshPartitionError::InvariantViolation(format!(
                        "face {f} of element {e} links to itself"
                    )));
                }
                let back = self
                    .face_neighbors
                    .get(other)
                    .map(|fs| fs.iter().filter(|m| m.element() == Some(e)).count())
                    .unwrap_or(0);
                let forward = faces.iter().filter(|m| m.element() == Some(other)).count();
                if back != forward {
                    return Err(MeshPartitionError::InvariantViolation(format!(
                        "asymmetric face link {e} -> {other}: {forward} forward, {back} back"
                    )));
                }
            }
        }
        Ok(())
    }
}
