//! Elements and the validated mesh topology they form.

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshPartitionError;
use crate::topology::element_type::{ElementType, NodeClass, NodeLevel};

/// Material/group tag of an element (e.g. fluid vs. solid).
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MaterialTag(pub u16);

impl MaterialTag {
    /// Fluid elements in fluid–structure problems.
    pub const FLUID: MaterialTag = MaterialTag(2);
    /// Solid (structure) elements in fluid–structure problems.
    pub const SOLID: MaterialTag = MaterialTag(4);
}

/// One finite element: type, ordered global node indices and material tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    kind: ElementType,
    nodes: Vec<usize>,
    material: MaterialTag,
}

impl Element {
    /// Create an element with the default material tag.
    pub fn new(kind: ElementType, nodes: Vec<usize>) -> Self {
        Self {
            kind,
            nodes,
            material: MaterialTag::default(),
        }
    }

    /// Builder-style material assignment.
    pub fn with_material(mut self, material: MaterialTag) -> Self {
        self.material = material;
        self
    }

    pub fn kind(&self) -> ElementType {
        self.kind
    }

    /// All node indices, vertex slots first.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn material(&self) -> MaterialTag {
        self.material
    }

    /// Node level implied by the node count, if supported.
    pub fn level(&self) -> Option<NodeLevel> {
        self.kind.level_for(self.nodes.len())
    }

    /// The vertex nodes.
    pub fn vertices(&self) -> &[usize] {
        &self.nodes[..self.kind.vertex_count().min(self.nodes.len())]
    }

    /// Nodes carried at `level`, truncated to what the element has.
    pub fn nodes_at(&self, level: NodeLevel) -> &[usize] {
        &self.nodes[..self.kind.node_count(level).min(self.nodes.len())]
    }

    /// Iterate `(class, node)` over every slot in local order.
    pub fn classified_nodes(&self) -> impl Iterator<Item = (NodeClass, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(slot, &node)| (self.kind.slot_class(slot), node))
    }

    /// Global vertex nodes of local face `face`.
    pub fn face_vertices(&self, face: usize) -> impl Iterator<Item = usize> + '_ {
        self.kind.faces()[face].iter().map(|&slot| self.nodes[slot])
    }

    pub(crate) fn renumber(&mut self, old_to_new: &[usize]) {
        for node in &mut self.nodes {
            *node = old_to_new[*node];
        }
    }
}

/// Validated element→node connectivity of one mesh level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshTopology {
    elements: Vec<Element>,
    n_nodes: usize,
    dimension: u8,
}

impl MeshTopology {
    /// Validate raw connectivity.
    ///
    /// Rejects empty meshes, mixed dimensions, unsupported node counts,
    /// out-of-range node indices and nodes no element references.
    pub fn new(elements: Vec<Element>, n_nodes: usize) -> Result<Self, MeshPartitionError> {
        let first = elements.first().ok_or(MeshPartitionError::EmptyMesh)?;
        let dimension = first.kind().dimension();
        let mut referenced = vec![false; n_nodes];

        for (idx, element) in elements.iter().enumerate() {
            let found = element.kind().dimension();
            if found != dimension {
                return Err(MeshPartitionError::MixedDimension {
                    element: idx,
                    expected: dimension,
                    found,
                });
            }
            if element.level().is_none() {
                return Err(MeshPartitionError::UnsupportedNodeCount {
                    element: idx,
                    kind: element.kind(),
                    nodes: element.nodes().len(),
                });
            }
            for &node in element.nodes() {
                let slot = referenced.get_mut(node).ok_or(MeshPartitionError::NodeOutOfRange {
                    element: idx,
                    node,
                    n_nodes,
                })?;
                *slot = true;
            }
        }

        if let Some(orphan) = referenced.iter().position(|&r| !r) {
            return Err(MeshPartitionError::OrphanNode(orphan));
        }

        Ok(Self {
            elements,
            n_nodes,
            dimension,
        })
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, idx: usize) -> &Element {
        &self.elements[idx]
    }

    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Topological dimension shared by every element.
    pub fn dimension(&self) -> u8 {
        self.dimension
    }

    /// Mark the nodes touched by elements carrying `material`.
    pub fn material_nodes(&self, material: MaterialTag) -> Vec<bool> {
        let mut marked = vec![false; self.n_nodes];
        for element in self.elements.iter().filter(|e| e.material() == material) {
            for &node in element.nodes() {
                marked[node] = true;
            }
        }
        marked
    }

    /// Smallest number of nodes on any face of any element, at the element's own level.
    pub fn min_face_node_count(&self) -> usize {
        self.elements
            .iter()
            .filter_map(|e| {
                let level = e.level()?;
                (0..e.kind().face_count())
                    .map(|f| e.kind().face_node_count(f, level))
                    .min()
            })
            .min()
            .unwrap_or(1)
    }

    pub(crate) fn renumber_nodes(&mut self, old_to_new: &[usize]) {
        for element in &mut self.elements {
            element.renumber(old_to_new);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(nodes: [usize; 4]) -> Element {
        Element::new(ElementType::Quadrilateral, nodes.to_vec())
    }

    #[test]
    fn rejects_orphans_and_out_of_range() {
        let err = MeshTopology::new(vec![quad([0, 1, 2, 3])], 5).unwrap_err();
        assert_eq!(err, MeshPartitionError::OrphanNode(4));

        let err = MeshTopology::new(vec![quad([0, 1, 2, 7])], 4).unwrap_err();
        assert!(matches!(err, MeshPartitionError::NodeOutOfRange { node: 7, .. }));
    }

    #[test]
    fn rejects_unsupported_counts_and_mixed_dimension() {
        let bad = Element::new(ElementType::Quadrilateral, vec![0, 1, 2, 3, 4]);
        assert!(matches!(
            MeshTopology::new(vec![bad], 5),
            Err(MeshPartitionError::UnsupportedNodeCount { nodes: 5, .. })
        ));

        let line = Element::new(ElementType::Line, vec![3, 4]);
        assert!(matches!(
            MeshTopology::new(vec![quad([0, 1, 2, 3]), line], 5),
            Err(MeshPartitionError::MixedDimension { element: 1, .. })
        ));

        assert_eq!(
            MeshTopology::new(Vec::new(), 0),
            Err(MeshPartitionError::EmptyMesh)
        );
    }

    #[test]
    fn material_nodes_marks_touched_nodes() {
        let solid = quad([1, 4, 5, 2]).with_material(MaterialTag::SOLID);
        let fluid = quad([0, 1, 2, 3]).with_material(MaterialTag::FLUID);
        let mesh = MeshTopology::new(vec![fluid, solid], 6).unwrap();
        assert_eq!(
            mesh.material_nodes(MaterialTag::SOLID),
            vec![false, true, true, false, true, true]
        );
    }
}
