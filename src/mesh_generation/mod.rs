//! Structured box meshes on the unit interval, square and cube.
//!
//! Nodes are numbered lexicographically on a lattice (x fastest), so vertex,
//! mid and bubble nodes interleave the way they do in files written by most
//! mesh generators. Lattice points no element uses (the centres of 8-node
//! quads) are compacted away. Boundary faces are seeded with the side of the
//! box they lie on.

use crate::data::coordinates::Coordinates;
use crate::mesh_error::MeshPartitionError;
use crate::mesh_level::RawMesh;
use crate::topology::element::Element;
use crate::topology::element_type::{ElementType, NodeLevel};

/// Boundary flag of the minimum-x side.
pub const BOUNDARY_X_MIN: i32 = 1;
/// Boundary flag of the maximum-x side.
pub const BOUNDARY_X_MAX: i32 = 2;
/// Boundary flag of the minimum-y side.
pub const BOUNDARY_Y_MIN: i32 = 3;
/// Boundary flag of the maximum-y side.
pub const BOUNDARY_Y_MAX: i32 = 4;
/// Boundary flag of the minimum-z side.
pub const BOUNDARY_Z_MIN: i32 = 5;
/// Boundary flag of the maximum-z side.
pub const BOUNDARY_Z_MAX: i32 = 6;

/// Lattice with `dims[d]` points per direction and spacing `1 / cells[d]`
/// lattice steps.
struct Lattice {
    dims: [usize; 3],
    steps: [usize; 3],
    dimension: usize,
}

impl Lattice {
    fn new(dimension: usize, cells: [usize; 3], step: usize) -> Self {
        let mut dims = [1; 3];
        let mut steps = [1; 3];
        for d in 0..dimension {
            dims[d] = step * cells[d] + 1;
            steps[d] = step * cells[d];
        }
        Self {
            dims,
            steps,
            dimension,
        }
    }

    fn id(&self, i: usize, j: usize, k: usize) -> usize {
        (k * self.dims[1] + j) * self.dims[0] + i
    }

    fn len(&self) -> usize {
        self.dims.iter().product()
    }

    fn point(&self, id: usize) -> [f64; 3] {
        let i = id % self.dims[0];
        let j = (id / self.dims[0]) % self.dims[1];
        let k = id / (self.dims[0] * self.dims[1]);
        [
            i as f64 / self.steps[0] as f64,
            j as f64 / self.steps[1] as f64,
            k as f64 / self.steps[2] as f64,
        ]
    }

    /// Drop unused lattice points and build the mesh.
    fn finish(
        &self,
        mut elements: Vec<Element>,
        seeds: Vec<Vec<Option<i32>>>,
    ) -> Result<RawMesh, MeshPartitionError> {
        let mut compact = vec![usize::MAX; self.len()];
        for element in &elements {
            for &node in element.nodes() {
                compact[node] = 0;
            }
        }
        let mut values = Vec::new();
        let mut n_nodes = 0;
        for (id, slot) in compact.iter_mut().enumerate() {
            if *slot == usize::MAX {
                continue;
            }
            *slot = n_nodes;
            n_nodes += 1;
            values.extend_from_slice(&self.point(id)[..self.dimension]);
        }
        for element in &mut elements {
            element.renumber(&compact);
        }
        Ok(RawMesh {
            elements,
            n_nodes,
            coordinates: Some(Coordinates::try_new(self.dimension, values)?),
            boundary_seeds: Some(seeds),
        })
    }
}

fn side(on: bool, flag: i32) -> Option<i32> {
    on.then_some(flag)
}

fn lattice_step(kind: ElementType, nodes: usize) -> Result<usize, MeshPartitionError> {
    match kind.level_for(nodes) {
        Some(level) if level != NodeLevel::Vertex => Ok(2),
        Some(_) => Ok(1),
        None => Err(MeshPartitionError::UnsupportedNodeCount {
            element: 0,
            kind,
            nodes,
        }),
    }
}

/// `n` line elements of 2 or 3 nodes on `[0, 1]`.
pub fn line_grid(n: usize, nodes_per_element: usize) -> Result<RawMesh, MeshPartitionError> {
    if n == 0 {
        return Err(MeshPartitionError::EmptyMesh);
    }
    let step = lattice_step(ElementType::Line, nodes_per_element)?;
    let lattice = Lattice::new(1, [n, 1, 1], step);
    let mut elements = Vec::with_capacity(n);
    let mut seeds = Vec::with_capacity(n);
    for e in 0..n {
        let i0 = step * e;
        let mut nodes = vec![i0, i0 + step];
        if step == 2 {
            nodes.push(i0 + 1);
        }
        elements.push(Element::new(ElementType::Line, nodes));
        seeds.push(vec![side(e == 0, BOUNDARY_X_MIN), side(e + 1 == n, BOUNDARY_X_MAX)]);
    }
    lattice.finish(elements, seeds)
}

/// `nx × ny` quadrilaterals of 4, 8 or 9 nodes on the unit square.
pub fn quad_grid(nx: usize, ny: usize, nodes_per_element: usize) -> Result<RawMesh, MeshPartitionError> {
    if nx == 0 || ny == 0 {
        return Err(MeshPartitionError::EmptyMesh);
    }
    let step = lattice_step(ElementType::Quadrilateral, nodes_per_element)?;
    let lattice = Lattice::new(2, [nx, ny, 1], step);
    let mut elements = Vec::with_capacity(nx * ny);
    let mut seeds = Vec::with_capacity(nx * ny);
    for ey in 0..ny {
        for ex in 0..nx {
            let (i0, j0) = (step * ex, step * ey);
            let at = |di: usize, dj: usize| lattice.id(i0 + di, j0 + dj, 0);
            let s = step;
            let mut nodes = vec![at(0, 0), at(s, 0), at(s, s), at(0, s)];
            if step == 2 {
                nodes.extend([at(1, 0), at(2, 1), at(1, 2), at(0, 1)]);
                if nodes_per_element == 9 {
                    nodes.push(at(1, 1));
                }
            }
            elements.push(Element::new(ElementType::Quadrilateral, nodes));
            seeds.push(vec![
                side(ey == 0, BOUNDARY_Y_MIN),
                side(ex + 1 == nx, BOUNDARY_X_MAX),
                side(ey + 1 == ny, BOUNDARY_Y_MAX),
                side(ex == 0, BOUNDARY_X_MIN),
            ]);
        }
    }
    lattice.finish(elements, seeds)
}

/// `nx × ny × nz` 8-node hexahedra on the unit cube.
pub fn hex_grid(nx: usize, ny: usize, nz: usize) -> Result<RawMesh, MeshPartitionError> {
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(MeshPartitionError::EmptyMesh);
    }
    let lattice = Lattice::new(3, [nx, ny, nz], 1);
    let n = nx * ny * nz;
    let mut elements = Vec::with_capacity(n);
    let mut seeds = Vec::with_capacity(n);
    for ez in 0..nz {
        for ey in 0..ny {
            for ex in 0..nx {
                let at = |di: usize, dj: usize, dk: usize| lattice.id(ex + di, ey + dj, ez + dk);
                let nodes = vec![
                    at(0, 0, 0),
                    at(1, 0, 0),
                    at(1, 1, 0),
                    at(0, 1, 0),
                    at(0, 0, 1),
                    at(1, 0, 1),
                    at(1, 1, 1),
                    at(0, 1, 1),
                ];
                elements.push(Element::new(ElementType::Hexahedron, nodes));
                seeds.push(vec![
                    side(ey == 0, BOUNDARY_Y_MIN),
                    side(ex + 1 == nx, BOUNDARY_X_MAX),
                    side(ey + 1 == ny, BOUNDARY_Y_MAX),
                    side(ex == 0, BOUNDARY_X_MIN),
                    side(ez == 0, BOUNDARY_Z_MIN),
                    side(ez + 1 == nz, BOUNDARY_Z_MAX),
                ]);
            }
        }
    }
    lattice.finish(elements, seeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::element::MeshTopology;

    #[test]
    fn quad9_pair_uses_full_lattice() {
        let raw = quad_grid(2, 1, 9).unwrap();
        assert_eq!(raw.n_nodes, 15);
        assert_eq!(raw.elements[0].nodes(), &[0, 2, 12, 10, 1, 7, 11, 5, 6]);
        assert_eq!(raw.elements[1].nodes(), &[2, 4, 14, 12, 3, 9, 13, 7, 8]);
        let coords = raw.coordinates.as_ref().unwrap();
        assert_eq!(coords.node(14), &[1.0, 1.0]);
        assert_eq!(coords.node(7), &[0.5, 0.5]);
    }

    #[test]
    fn quad8_drops_centres() {
        let raw = quad_grid(2, 2, 8).unwrap();
        assert_eq!(raw.n_nodes, 25 - 4);
        assert!(MeshTopology::new(raw.elements, raw.n_nodes).is_ok());
    }

    #[test]
    fn boundary_seeds_mark_box_sides() {
        let raw = hex_grid(2, 1, 1).unwrap();
        let seeds = raw.boundary_seeds.unwrap();
        assert_eq!(seeds[0][1], None);
        assert_eq!(seeds[0][3], Some(BOUNDARY_X_MIN));
        assert_eq!(seeds[1][1], Some(BOUNDARY_X_MAX));
        assert_eq!(raw.n_nodes, 12);
    }

    #[test]
    fn line_grid_orders() {
        let raw = line_grid(3, 3).unwrap();
        assert_eq!(raw.n_nodes, 7);
        assert_eq!(raw.elements[1].nodes(), &[2, 4, 3]);
        assert!(matches!(
            line_grid(3, 4),
            Err(MeshPartitionError::UnsupportedNodeCount { nodes: 4, .. })
        ));
        assert!(matches!(line_grid(0, 2), Err(MeshPartitionError::EmptyMesh)));
    }
}
