//! Element type metadata: node counts per level and face tables.
//!
//! Local node numbering follows the usual Lagrange layout: vertex slots come
//! first, then one mid node per edge, then face centres and the cell centre
//! (the "bubble" slots). Only the vertex slots take part in face matching.

use serde::{Deserialize, Serialize};

/// Geometric element types.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    /// 3D hexahedron (8/20/27 nodes).
    Hexahedron,
    /// 3D tetrahedron (4/10 nodes).
    Tetrahedron,
    /// 3D wedge/prism (6/15/18 nodes).
    Wedge,
    /// 2D quadrilateral (4/8/9 nodes).
    Quadrilateral,
    /// 2D triangle (3/6 nodes).
    Triangle,
    /// 1D segment (2/3 nodes).
    Line,
}

/// Which node slots an element carries.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeLevel {
    /// Vertex nodes only.
    Vertex,
    /// Vertex and mid-edge nodes.
    Quadratic,
    /// Every node, including face and cell centres.
    Full,
}

/// Classification of a node slot inside an element.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeClass {
    Vertex,
    Mid,
    Bubble,
}

const HEX_FACES: [&[usize]; 6] = [
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
    &[0, 3, 2, 1],
    &[4, 5, 6, 7],
];
const TET_FACES: [&[usize]; 4] = [&[0, 2, 1], &[0, 1, 3], &[1, 2, 3], &[2, 0, 3]];
const WEDGE_FACES: [&[usize]; 5] = [
    &[0, 1, 4, 3],
    &[1, 2, 5, 4],
    &[2, 0, 3, 5],
    &[0, 2, 1],
    &[3, 4, 5],
];
const QUAD_FACES: [&[usize]; 4] = [&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const TRI_FACES: [&[usize]; 3] = [&[0, 1], &[1, 2], &[2, 0]];
const LINE_FACES: [&[usize]; 2] = [&[0], &[1]];

impl ElementType {
    /// All supported element types.
    pub const ALL: [ElementType; 6] = [
        ElementType::Hexahedron,
        ElementType::Tetrahedron,
        ElementType::Wedge,
        ElementType::Quadrilateral,
        ElementType::Triangle,
        ElementType::Line,
    ];

    /// Topological dimension of the element.
    pub fn dimension(self) -> u8 {
        match self {
            ElementType::Hexahedron | ElementType::Tetrahedron | ElementType::Wedge => 3,
            ElementType::Quadrilateral | ElementType::Triangle => 2,
            ElementType::Line => 1,
        }
    }

    /// Number of vertex nodes.
    pub fn vertex_count(self) -> usize {
        match self {
            ElementType::Hexahedron => 8,
            ElementType::Tetrahedron => 4,
            ElementType::Wedge => 6,
            ElementType::Quadrilateral => 4,
            ElementType::Triangle => 3,
            ElementType::Line => 2,
        }
    }

    /// Number of vertex plus mid-edge nodes.
    pub fn quadratic_count(self) -> usize {
        match self {
            ElementType::Hexahedron => 20,
            ElementType::Tetrahedron => 10,
            ElementType::Wedge => 15,
            ElementType::Quadrilateral => 8,
            ElementType::Triangle => 6,
            ElementType::Line => 3,
        }
    }

    /// Number of nodes of the complete (bi/triquadratic) element.
    pub fn full_count(self) -> usize {
        match self {
            ElementType::Hexahedron => 27,
            ElementType::Tetrahedron => 10,
            ElementType::Wedge => 18,
            ElementType::Quadrilateral => 9,
            ElementType::Triangle => 6,
            ElementType::Line => 3,
        }
    }

    /// Node count carried at `level`.
    pub fn node_count(self, level: NodeLevel) -> usize {
        match level {
            NodeLevel::Vertex => self.vertex_count(),
            NodeLevel::Quadratic => self.quadratic_count(),
            NodeLevel::Full => self.full_count(),
        }
    }

    /// Infer the node level from an element's node count.
    ///
    /// Types whose quadratic and full layouts coincide (tet, triangle, line)
    /// report [`NodeLevel::Full`].
    pub fn level_for(self, nodes: usize) -> Option<NodeLevel> {
        if nodes == self.full_count() {
            Some(NodeLevel::Full)
        } else if nodes == self.quadratic_count() {
            Some(NodeLevel::Quadratic)
        } else if nodes == self.vertex_count() {
            Some(NodeLevel::Vertex)
        } else {
            None
        }
    }

    /// Class of local node slot `slot`.
    pub fn slot_class(self, slot: usize) -> NodeClass {
        if slot < self.vertex_count() {
            NodeClass::Vertex
        } else if slot < self.quadratic_count() {
            NodeClass::Mid
        } else {
            NodeClass::Bubble
        }
    }

    /// Faces as lists of local vertex slots.
    pub fn faces(self) -> &'static [&'static [usize]] {
        match self {
            ElementType::Hexahedron => &HEX_FACES,
            ElementType::Tetrahedron => &TET_FACES,
            ElementType::Wedge => &WEDGE_FACES,
            ElementType::Quadrilateral => &QUAD_FACES,
            ElementType::Triangle => &TRI_FACES,
            ElementType::Line => &LINE_FACES,
        }
    }

    /// Number of faces.
    pub fn face_count(self) -> usize {
        self.faces().len()
    }

    /// Number of nodes lying on `face` when the element carries `level` nodes.
    ///
    /// A face of `k` vertices has `k` edges in 3D (one in 2D, none in 1D);
    /// quadrilateral faces of 3D elements also own a centre node at full level.
    pub fn face_node_count(self, face: usize, level: NodeLevel) -> usize {
        let vertices = self.faces()[face].len();
        let edges = match self.dimension() {
            3 => vertices,
            2 => 1,
            _ => 0,
        };
        let centre = usize::from(self.dimension() == 3 && vertices == 4);
        match level {
            NodeLevel::Vertex => vertices,
            NodeLevel::Quadratic => vertices + edges,
            NodeLevel::Full => vertices + edges + centre,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_non_decreasing() {
        for ty in ElementType::ALL {
            assert!(ty.vertex_count() <= ty.quadratic_count());
            assert!(ty.quadratic_count() <= ty.full_count());
        }
    }

    #[test]
    fn level_inference() {
        assert_eq!(ElementType::Hexahedron.level_for(8), Some(NodeLevel::Vertex));
        assert_eq!(ElementType::Hexahedron.level_for(20), Some(NodeLevel::Quadratic));
        assert_eq!(ElementType::Hexahedron.level_for(27), Some(NodeLevel::Full));
        assert_eq!(ElementType::Tetrahedron.level_for(10), Some(NodeLevel::Full));
        assert_eq!(ElementType::Quadrilateral.level_for(7), None);
    }

    #[test]
    fn face_vertices_are_vertex_slots() {
        for ty in ElementType::ALL {
            for face in ty.faces() {
                assert!(face.iter().all(|&v| v < ty.vertex_count()));
            }
        }
    }

    #[test]
    fn face_node_counts() {
        assert_eq!(ElementType::Quadrilateral.face_node_count(0, NodeLevel::Full), 3);
        assert_eq!(ElementType::Hexahedron.face_node_count(0, NodeLevel::Full), 9);
        assert_eq!(ElementType::Hexahedron.face_node_count(0, NodeLevel::Vertex), 4);
        assert_eq!(ElementType::Tetrahedron.face_node_count(0, NodeLevel::Full), 6);
        assert_eq!(ElementType::Wedge.face_node_count(3, NodeLevel::Full), 6);
        assert_eq!(ElementType::Line.face_node_count(1, NodeLevel::Full), 1);
    }
}
