//! Canonical node ordering: vertex nodes, then mid nodes, then bubble nodes.
//!
//! Every element lists its vertex slots before its mid-edge slots before its
//! centre slots. [`NodeRenumbering`] lifts that local ordering to the whole
//! mesh so that global indices `[0, nv)` are vertices, `[nv, nv + nm)` are
//! mid nodes and the rest are bubbles. The three counts are the size
//! boundaries of the node-based DOF spaces.
//!
//! The new order is a sort by `(class, old index)`. It is linear in
//! the connectivity size (plus a sort) and leaves an already canonical
//! numbering untouched.

use serde::{Deserialize, Serialize};

use crate::data::coordinates::Coordinates;
use crate::mesh_error::MeshPartitionError;
use crate::topology::element::MeshTopology;
use crate::topology::element_type::NodeClass;

/// Node counts per class after canonicalization.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct NodeClassCounts {
    pub vertex: usize,
    pub mid: usize,
    pub bubble: usize,
}

impl NodeClassCounts {
    /// Size of the vertex-linear space.
    pub fn linear(&self) -> usize {
        self.vertex
    }

    /// Size of the vertex+edge quadratic space.
    pub fn quadratic(&self) -> usize {
        self.vertex + self.mid
    }

    /// Total node count.
    pub fn total(&self) -> usize {
        self.vertex + self.mid + self.bubble
    }

    /// Class of a canonically numbered node.
    pub fn class_of(&self, node: usize) -> NodeClass {
        if node < self.linear() {
            NodeClass::Vertex
        } else if node < self.quadratic() {
            NodeClass::Mid
        } else {
            NodeClass::Bubble
        }
    }
}

/// Permutation taking raw node indices to canonical ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRenumbering {
    old_to_new: Vec<usize>,
    new_to_old: Vec<usize>,
    counts: NodeClassCounts,
}

impl NodeRenumbering {
    /// Compute the canonical ordering of `mesh`'s nodes.
    pub fn compute(mesh: &MeshTopology) -> Result<Self, MeshPartitionError> {
        let n_nodes = mesh.n_nodes();
        let mut class: Vec<Option<NodeClass>> = vec![None; n_nodes];

        for element in mesh.elements() {
            for (slot_class, node) in element.classified_nodes() {
                match class[node] {
                    None => class[node] = Some(slot_class),
                    Some(existing) if existing == slot_class => {}
                    Some(_) => return Err(MeshPartitionError::InconsistentNodeClass { node }),
                }
            }
        }

        let mut counts = NodeClassCounts::default();
        let mut keyed = Vec::with_capacity(n_nodes);
        for (node, c) in class.into_iter().enumerate() {
            let c = c.ok_or(MeshPartitionError::OrphanNode(node))?;
            match c {
                NodeClass::Vertex => counts.vertex += 1,
                NodeClass::Mid => counts.mid += 1,
                NodeClass::Bubble => counts.bubble += 1,
            }
            keyed.push((c, node));
        }
        keyed.sort_unstable();

        let new_to_old: Vec<usize> = keyed.into_iter().map(|(_, node)| node).collect();
        let mut old_to_new = vec![0; n_nodes];
        for (new, &old) in new_to_old.iter().enumerate() {
            old_to_new[old] = new;
        }

        log::debug!(
            "canonical node order: {} vertex, {} mid, {} bubble",
            counts.vertex,
            counts.mid,
            counts.bubble
        );

        Ok(Self {
            old_to_new,
            new_to_old,
            counts,
        })
    }

    pub fn old_to_new(&self) -> &[usize] {
        &self.old_to_new
    }

    pub fn new_to_old(&self) -> &[usize] {
        &self.new_to_old
    }

    pub fn counts(&self) -> NodeClassCounts {
        self.counts
    }

    /// True when no node moves.
    pub fn is_identity(&self) -> bool {
        self.old_to_new.iter().enumerate().all(|(i, &n)| i == n)
    }

    /// Rewrite every element's node references.
    pub fn apply(&self, mesh: &mut MeshTopology) {
        mesh.renumber_nodes(&self.old_to_new);
    }

    /// Reorder a coordinate store to follow the canonical numbering.
    pub fn permute_coordinates(
        &self,
        coords: &Coordinates,
    ) -> Result<Coordinates, MeshPartitionError> {
        coords.permuted(&self.old_to_new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::element::Element;
    use crate::topology::element_type::ElementType;

    // Two 9-node quads sharing the edge 2-7-12, numbered row by row on the
    // 5x3 node lattice so every class is interleaved.
    fn shuffled_pair() -> MeshTopology {
        let e0 = Element::new(ElementType::Quadrilateral, vec![0, 2, 12, 10, 1, 7, 11, 5, 6]);
        let e1 = Element::new(ElementType::Quadrilateral, vec![2, 4, 14, 12, 3, 9, 13, 7, 8]);
        MeshTopology::new(vec![e0, e1], 15).unwrap()
    }

    #[test]
    fn separates_classes() {
        let mut mesh = shuffled_pair();
        let ren = NodeRenumbering::compute(&mesh).unwrap();
        assert_eq!(
            ren.counts(),
            NodeClassCounts {
                vertex: 6,
                mid: 7,
                bubble: 2
            }
        );
        ren.apply(&mut mesh);
        let counts = ren.counts();
        for element in mesh.elements() {
            for (class, node) in element.classified_nodes() {
                assert_eq!(counts.class_of(node), class);
            }
        }
    }

    #[test]
    fn idempotent_on_canonical_mesh() {
        let mut mesh = shuffled_pair();
        NodeRenumbering::compute(&mesh).unwrap().apply(&mut mesh);
        let again = NodeRenumbering::compute(&mesh).unwrap();
        assert!(again.is_identity());
    }

    #[test]
    fn rejects_vertex_used_as_mid_node() {
        let e0 = Element::new(ElementType::Line, vec![0, 1, 2]);
        let e1 = Element::new(ElementType::Line, vec![2, 3, 1]);
        let mesh = MeshTopology::new(vec![e0, e1], 4).unwrap();
        assert_eq!(
            NodeRenumbering::compute(&mesh),
            Err(MeshPartitionError::InconsistentNodeClass { node: 2 })
        );
    }
}
