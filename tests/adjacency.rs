use mesh_partition::mesh_generation::{BOUNDARY_X_MAX, hex_grid, line_grid, quad_grid};
use mesh_partition::prelude::*;

fn topology(raw: &RawMesh) -> MeshTopology {
    MeshTopology::new(raw.elements.clone(), raw.n_nodes).unwrap()
}

#[test]
fn hex_grid_faces_are_symmetric() {
    let raw = hex_grid(2, 2, 2).unwrap();
    let mesh = topology(&raw);
    let adj = ElementAdjacency::build(&mesh, raw.boundary_seeds.as_deref()).unwrap();
    adj.validate_invariants().unwrap();

    // 6 box sides of 4 faces each
    assert_eq!(adj.boundary_faces().count(), 24);
    for e in 0..adj.n_elements() {
        for (f, n) in adj.face_neighbors(e).iter().enumerate() {
            match *n {
                FaceNeighbor::Element(other) => {
                    assert!(adj.face_neighbors(other).contains(&FaceNeighbor::Element(e)));
                }
                FaceNeighbor::Boundary(flag) => {
                    assert!(flag.is_some(), "generated boundary face {e}/{f} lost its flag");
                }
            }
        }
    }
}

#[test]
fn quad_grid_vertex_elements() {
    let raw = quad_grid(2, 2, 9).unwrap();
    let mesh = topology(&raw);
    let adj = ElementAdjacency::build(&mesh, None).unwrap();
    // centre vertex of the 5x5 lattice touches all four quads
    assert_eq!(adj.vertex_elements(12), &[0, 1, 2, 3]);
    // mid and bubble nodes carry no vertex adjacency
    assert!(adj.vertex_elements(6).is_empty());
    assert_eq!(adj.boundary_faces().count(), 8);
}

#[test]
fn tetrahedra_share_a_triangle() {
    let tets = vec![
        Element::new(ElementType::Tetrahedron, vec![0, 1, 2, 3]),
        Element::new(ElementType::Tetrahedron, vec![1, 2, 3, 4]),
    ];
    let mesh = MeshTopology::new(tets, 5).unwrap();
    let adj = ElementAdjacency::build(&mesh, None).unwrap();
    assert_eq!(adj.neighbor(0, 2), FaceNeighbor::Element(1));
    assert_eq!(adj.neighbor(1, 0), FaceNeighbor::Element(0));
    assert_eq!(adj.boundary_faces().count(), 6);
}

#[test]
fn wedge_stack_links_triangular_caps() {
    let wedges = vec![
        Element::new(ElementType::Wedge, vec![0, 1, 2, 3, 4, 5]),
        Element::new(ElementType::Wedge, vec![3, 4, 5, 6, 7, 8]),
    ];
    let mesh = MeshTopology::new(wedges, 9).unwrap();
    let adj = ElementAdjacency::build(&mesh, None).unwrap();
    assert_eq!(adj.neighbor(0, 4), FaceNeighbor::Element(1));
    assert_eq!(adj.neighbor(1, 3), FaceNeighbor::Element(0));
}

#[test]
fn line_ends_keep_seeds() {
    let raw = line_grid(3, 2).unwrap();
    let mesh = topology(&raw);
    let adj = ElementAdjacency::build(&mesh, raw.boundary_seeds.as_deref()).unwrap();
    assert_eq!(adj.neighbor(2, 1), FaceNeighbor::Boundary(Some(BOUNDARY_X_MAX)));
    assert_eq!(adj.neighbor(1, 0), FaceNeighbor::Element(0));
    assert!(adj.is_boundary(0, 0));
}
