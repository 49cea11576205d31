use std::collections::BTreeSet;

use mesh_partition::mesh_generation::quad_grid;
use mesh_partition::prelude::*;

fn tag(raw: &mut RawMesh, material: impl Fn(usize) -> MaterialTag) {
    raw.elements = raw
        .elements
        .iter()
        .enumerate()
        .map(|(e, el)| el.clone().with_material(material(e)))
        .collect();
}

/// Blocks of `s` cover its partitioned element range exactly once.
fn assert_covers(level: &MeshLevel, s: usize, blocks: &SmootherBlocks) {
    let all: Vec<usize> = blocks.blocks().iter().flatten().copied().collect();
    let unique: BTreeSet<usize> = all.iter().copied().collect();
    assert_eq!(all.len(), unique.len());
    let range = level.index().owned_range(DofSpace::PiecewiseConstant, s);
    assert_eq!(unique, range.collect::<BTreeSet<_>>());
}

#[test]
fn fluid_and_solid_split_into_two_groups() {
    let mut raw = quad_grid(2, 1, 9).unwrap();
    tag(&mut raw, |e| if e == 0 { MaterialTag::FLUID } else { MaterialTag::SOLID });
    let level = MeshLevel::build(raw, &PartitionConfig::default()).unwrap();

    let policy = BlockPolicy::MaterialSplit { primary: MaterialTag::FLUID };
    let blocks = level.smoother_blocks(0, &policy, &GreedyPartitioner).unwrap();
    assert_eq!(blocks.n_groups(), 2);
    assert_eq!(blocks.group(0), &[vec![0]]);
    assert_eq!(blocks.group(1), &[vec![1]]);
}

#[test]
fn solid_then_fluid_groups_on_each_subdomain() {
    let mut raw = quad_grid(4, 4, 9).unwrap();
    // left half solid
    tag(&mut raw, |e| if e % 4 < 2 { MaterialTag::SOLID } else { MaterialTag::FLUID });
    let level = MeshLevel::build(raw, &PartitionConfig::with_subdomains(2)).unwrap();
    let policy = BlockPolicy::MaterialGroups {
        groups: vec![
            MaterialGroup { material: MaterialTag::SOLID, block_size: 3 },
            MaterialGroup { material: MaterialTag::FLUID, block_size: 3 },
        ],
    };
    for s in 0..2 {
        let blocks = level.smoother_blocks(s, &policy, &GreedyPartitioner).unwrap();
        assert_eq!(blocks.n_groups(), 2);
        assert!(blocks.blocks().iter().all(|b| !b.is_empty() && b.len() <= 3));
        for (g, material) in [MaterialTag::SOLID, MaterialTag::FLUID].into_iter().enumerate() {
            for block in blocks.group(g) {
                for &p in block {
                    let e = level.index().global_element(p).unwrap();
                    assert_eq!(level.topology().element(e).material(), material);
                }
            }
        }
        assert_covers(&level, s, &blocks);
    }
}

#[test]
fn connectivity_blocks_on_a_subdomain() {
    let level =
        MeshLevel::build(quad_grid(6, 4, 4).unwrap(), &PartitionConfig::with_subdomains(2)).unwrap();
    let policy = BlockPolicy::Connectivity { block_size: 4, ncommon: None };
    for s in 0..2 {
        let blocks = level.smoother_blocks(s, &policy, &GreedyPartitioner).unwrap();
        assert_eq!(blocks.type_ends(), &[blocks.n_blocks()]);
        assert_eq!(blocks.n_blocks(), level.index().owned_elements(s).len() / 4);
        assert_covers(&level, s, &blocks);
    }
}

#[test]
fn fixed_blocks_on_every_subdomain() {
    let level =
        MeshLevel::build(quad_grid(5, 3, 8).unwrap(), &PartitionConfig::with_subdomains(3)).unwrap();
    for s in 0..3 {
        let blocks = level
            .smoother_blocks(s, &BlockPolicy::default(), &GreedyPartitioner)
            .unwrap();
        assert_eq!(blocks.n_blocks(), 5);
        assert_covers(&level, s, &blocks);
    }
}
