//! Element blocks for local (Vanka-type) smoothers.
//!
//! A subdomain's owned elements are grouped into blocks that a block smoother
//! solves one at a time. Blocks may further be organised into material
//! groups (fluid first, then solid, say); `type_ends[g]` is the exclusive end
//! block index of group `g`.
//!
//! Blocks hold *partitioned* element indices, i.e. indices into the
//! subdomain-contiguous element numbering of [`PartitionIndex`].

use serde::{Deserialize, Serialize};

use crate::dofmap::{DofSpace, PartitionIndex};
use crate::mesh_error::MeshPartitionError;
use crate::partitioning::{ElementNodeCsr, GraphPartitioner, PartitionError, default_ncommon};
use crate::topology::element::{MaterialTag, MeshTopology};
use crate::topology::element_type::NodeLevel;

/// Size bound of the blocks of one material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialGroup {
    pub material: MaterialTag,
    pub block_size: usize,
}

fn fluid() -> MaterialTag {
    MaterialTag::FLUID
}

/// How owned elements are grouped into smoother blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockPolicy {
    /// Consecutive runs of `block_size` elements; one group.
    Fixed { block_size: usize },
    /// Elements tagged `primary`, then the rest; one unbounded block each.
    MaterialSplit {
        #[serde(default = "fluid")]
        primary: MaterialTag,
    },
    /// One group per listed material, in list order, each chunked.
    MaterialGroups { groups: Vec<MaterialGroup> },
    /// Connectivity-aware blocks of about `block_size` elements from a dual
    /// graph partition of the subdomain.
    ///
    /// Two elements are dual-graph neighbours when they share `ncommon`
    /// nodes; `None` uses [`default_ncommon`] of the mesh, not the mesh-level
    /// `PartitionConfig::ncommon`.
    Connectivity {
        block_size: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ncommon: Option<usize>,
    },
}

impl Default for BlockPolicy {
    fn default() -> Self {
        BlockPolicy::Fixed { block_size: 1 }
    }
}

/// Ordered element blocks of one subdomain, with material group boundaries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmootherBlocks {
    blocks: Vec<Vec<usize>>,
    type_ends: Vec<usize>,
}

impl SmootherBlocks {
    /// Block the elements `subdomain` owns according to `policy`.
    ///
    /// `partitioner` is only consulted by [`BlockPolicy::Connectivity`].
    pub fn build(
        mesh: &MeshTopology,
        index: &PartitionIndex,
        subdomain: usize,
        policy: &BlockPolicy,
        partitioner: &dyn GraphPartitioner,
    ) -> Result<Self, MeshPartitionError> {
        if subdomain >= index.n_subdomains() {
            return Err(MeshPartitionError::InvalidSubdomain {
                subdomain,
                n_subdomains: index.n_subdomains(),
            });
        }
        let owned = index.owned_elements(subdomain);
        let first = index.offsets(DofSpace::PiecewiseConstant)[subdomain];
        // owned[i] has partitioned index first + i
        let partitioned = |i: usize| first + i;

        let mut out = Self::default();
        match policy {
            BlockPolicy::Fixed { block_size } => {
                let size = positive(*block_size)?;
                out.push_chunked((0..owned.len()).map(partitioned), size);
                out.end_group();
            }
            BlockPolicy::MaterialSplit { primary } => {
                let (inside, outside): (Vec<usize>, Vec<usize>) = (0..owned.len())
                    .partition(|&i| mesh.element(owned[i]).material() == *primary);
                for group in [inside, outside] {
                    out.push_chunked(group.into_iter().map(partitioned), usize::MAX);
                    out.end_group();
                }
            }
            BlockPolicy::MaterialGroups { groups } => {
                for (g, group) in groups.iter().enumerate() {
                    positive(group.block_size)?;
                    if groups[..g].iter().any(|prev| prev.material == group.material) {
                        return Err(MeshPartitionError::DuplicateMaterial {
                            material: group.material,
                        });
                    }
                }
                if let Some(&e) = owned
                    .iter()
                    .find(|&&e| !groups.iter().any(|g| g.material == mesh.element(e).material()))
                {
                    return Err(MeshPartitionError::UnlistedMaterial {
                        element: e,
                        material: mesh.element(e).material(),
                    });
                }
                for group in groups {
                    let members = (0..owned.len())
                        .filter(|&i| mesh.element(owned[i]).material() == group.material)
                        .map(partitioned);
                    out.push_chunked(members, group.block_size);
                    out.end_group();
                }
            }
            BlockPolicy::Connectivity { block_size, ncommon } => {
                let size = positive(*block_size)?;
                let n_parts = owned.len() / size;
                if n_parts <= 1 {
                    if !owned.is_empty() {
                        log::warn!(
                            "subdomain {subdomain}: {} elements with block size {size}, using one block",
                            owned.len()
                        );
                    }
                    out.push_chunked((0..owned.len()).map(partitioned), usize::MAX);
                } else {
                    let csr = ElementNodeCsr::from_elements(
                        mesh,
                        owned.iter().copied(),
                        NodeLevel::Full,
                        ncommon.unwrap_or_else(|| default_ncommon(mesh)),
                    );
                    let parts = partitioner.partition_mesh_dual(&csr, n_parts)?;
                    if parts.element_part.len() != owned.len() {
                        return Err(MeshPartitionError::OwnerLengthMismatch {
                            expected: owned.len(),
                            got: parts.element_part.len(),
                        });
                    }
                    let mut buckets = vec![Vec::new(); n_parts];
                    for (i, &p) in parts.element_part.iter().enumerate() {
                        let bucket = buckets.get_mut(p).ok_or_else(|| {
                            PartitionError::InvalidInput(format!(
                                "{} returned part {p} for element {} (n_parts = {n_parts})",
                                partitioner.name(),
                                owned[i]
                            ))
                        })?;
                        bucket.push(partitioned(i));
                    }
                    out.blocks.extend(buckets.into_iter().filter(|b| !b.is_empty()));
                }
                out.end_group();
            }
        }

        log::debug!(
            "subdomain {subdomain}: {} smoother blocks in {} groups",
            out.blocks.len(),
            out.type_ends.len()
        );
        Ok(out)
    }

    fn push_chunked(&mut self, members: impl Iterator<Item = usize>, size: usize) {
        let mut block = Vec::new();
        for m in members {
            block.push(m);
            if block.len() == size {
                self.blocks.push(std::mem::take(&mut block));
            }
        }
        if !block.is_empty() {
            self.blocks.push(block);
        }
    }

    fn end_group(&mut self) {
        self.type_ends.push(self.blocks.len());
    }

    /// All blocks in group order.
    pub fn blocks(&self) -> &[Vec<usize>] {
        &self.blocks
    }

    /// Exclusive end block index of each group.
    pub fn type_ends(&self) -> &[usize] {
        &self.type_ends
    }

    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn n_groups(&self) -> usize {
        self.type_ends.len()
    }

    /// Blocks of group `g`.
    pub fn group(&self, g: usize) -> &[Vec<usize>] {
        let start = if g == 0 { 0 } else { self.type_ends[g - 1] };
        &self.blocks[start..self.type_ends[g]]
    }
}

fn positive(block_size: usize) -> Result<usize, MeshPartitionError> {
    if block_size == 0 {
        Err(MeshPartitionError::InvalidBlockSize)
    } else {
        Ok(block_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioning::GreedyPartitioner;
    use crate::topology::canonical::NodeRenumbering;
    use crate::topology::element::Element;
    use crate::topology::element_type::ElementType;

    // `n` linear quads in a row, materials alternating fluid/solid.
    fn row(n: usize) -> (MeshTopology, PartitionIndex) {
        let elements = (0..n)
            .map(|e| {
                let tag = if e % 2 == 0 { MaterialTag::FLUID } else { MaterialTag::SOLID };
                Element::new(ElementType::Quadrilateral, vec![e, e + 1, n + 2 + e, n + 1 + e])
                    .with_material(tag)
            })
            .collect();
        let mesh = MeshTopology::new(elements, 2 * (n + 1)).unwrap();
        let counts = NodeRenumbering::compute(&mesh).unwrap().counts();
        let index = PartitionIndex::build(&mesh, counts, &vec![0; n], 1).unwrap();
        (mesh, index)
    }

    #[test]
    fn fixed_blocks_keep_remainder() {
        let (mesh, index) = row(5);
        let policy = BlockPolicy::Fixed { block_size: 2 };
        let b = SmootherBlocks::build(&mesh, &index, 0, &policy, &GreedyPartitioner).unwrap();
        assert_eq!(b.blocks(), &[vec![0, 1], vec![2, 3], vec![4]]);
        assert_eq!(b.type_ends(), &[3]);
    }

    #[test]
    fn material_split_puts_primary_first() {
        let (mesh, index) = row(4);
        let policy = BlockPolicy::MaterialSplit { primary: MaterialTag::FLUID };
        let b = SmootherBlocks::build(&mesh, &index, 0, &policy, &GreedyPartitioner).unwrap();
        assert_eq!(b.blocks(), &[vec![0, 2], vec![1, 3]]);
        assert_eq!(b.type_ends(), &[1, 2]);
        assert_eq!(b.group(1), &[vec![1, 3]]);
    }

    #[test]
    fn material_split_collapses_empty_group() {
        let (mesh, index) = row(4);
        let policy = BlockPolicy::MaterialSplit { primary: MaterialTag(7) };
        let b = SmootherBlocks::build(&mesh, &index, 0, &policy, &GreedyPartitioner).unwrap();
        assert_eq!(b.type_ends(), &[0, 1]);
        assert!(b.group(0).is_empty());
    }

    #[test]
    fn material_groups_are_bounded_and_complete() {
        let (mesh, index) = row(6);
        let policy = BlockPolicy::MaterialGroups {
            groups: vec![
                MaterialGroup { material: MaterialTag::SOLID, block_size: 2 },
                MaterialGroup { material: MaterialTag::FLUID, block_size: 4 },
            ],
        };
        let b = SmootherBlocks::build(&mesh, &index, 0, &policy, &GreedyPartitioner).unwrap();
        assert_eq!(b.blocks(), &[vec![1, 3], vec![5], vec![0, 2, 4]]);
        assert_eq!(b.type_ends(), &[2, 3]);

        let missing = BlockPolicy::MaterialGroups {
            groups: vec![MaterialGroup { material: MaterialTag::FLUID, block_size: 4 }],
        };
        assert_eq!(
            SmootherBlocks::build(&mesh, &index, 0, &missing, &GreedyPartitioner),
            Err(MeshPartitionError::UnlistedMaterial { element: 1, material: MaterialTag::SOLID })
        );

        let twice = BlockPolicy::MaterialGroups {
            groups: vec![
                MaterialGroup { material: MaterialTag::FLUID, block_size: 1 },
                MaterialGroup { material: MaterialTag::SOLID, block_size: 2 },
                MaterialGroup { material: MaterialTag::FLUID, block_size: 3 },
            ],
        };
        assert_eq!(
            SmootherBlocks::build(&mesh, &index, 0, &twice, &GreedyPartitioner),
            Err(MeshPartitionError::DuplicateMaterial { material: MaterialTag::FLUID })
        );
    }

    #[test]
    fn connectivity_blocks_cover_subdomain() {
        let (mesh, index) = row(8);
        let policy = BlockPolicy::Connectivity { block_size: 4, ncommon: None };
        let b = SmootherBlocks::build(&mesh, &index, 0, &policy, &GreedyPartitioner).unwrap();
        assert_eq!(b.blocks(), &[vec![0, 1, 2, 3], vec![4, 5, 6, 7]]);
        assert_eq!(b.type_ends(), &[2]);

        let single = BlockPolicy::Connectivity { block_size: 6, ncommon: None };
        let b = SmootherBlocks::build(&mesh, &index, 0, &single, &GreedyPartitioner).unwrap();
        assert_eq!(b.n_blocks(), 1);
        assert_eq!(b.blocks()[0].len(), 8);
    }

    /// Greedy partitioning that insists on a given `ncommon`.
    struct ExpectNcommon(usize);

    impl GraphPartitioner for ExpectNcommon {
        fn name(&self) -> &'static str {
            "expect-ncommon"
        }

        fn partition_mesh_dual(
            &self,
            mesh: &ElementNodeCsr,
            n_parts: usize,
        ) -> Result<crate::partitioning::MeshPartition, PartitionError> {
            if mesh.ncommon != self.0 {
                return Err(PartitionError::Failure(format!("ncommon {}", mesh.ncommon)));
            }
            GreedyPartitioner.partition_mesh_dual(mesh, n_parts)
        }
    }

    #[test]
    fn connectivity_ncommon_defaults_to_mesh_value() {
        let (mesh, index) = row(6);
        let default = BlockPolicy::Connectivity { block_size: 2, ncommon: None };
        let b = SmootherBlocks::build(&mesh, &index, 0, &default, &ExpectNcommon(2)).unwrap();
        assert_eq!(b.blocks(), &[vec![0, 1], vec![2, 3], vec![4, 5]]);

        let explicit = BlockPolicy::Connectivity { block_size: 2, ncommon: Some(1) };
        assert!(SmootherBlocks::build(&mesh, &index, 0, &explicit, &ExpectNcommon(1)).is_ok());
        assert_eq!(
            SmootherBlocks::build(&mesh, &index, 0, &explicit, &ExpectNcommon(2)),
            Err(MeshPartitionError::Partitioner(PartitionError::Failure("ncommon 1".into())))
        );
    }

    /// Returns a fixed owner array without checking it.
    struct Unchecked(Vec<usize>);

    impl GraphPartitioner for Unchecked {
        fn name(&self) -> &'static str {
            "unchecked"
        }

        fn partition_mesh_dual(
            &self,
            _mesh: &ElementNodeCsr,
            _n_parts: usize,
        ) -> Result<crate::partitioning::MeshPartition, PartitionError> {
            Ok(crate::partitioning::MeshPartition {
                element_part: self.0.clone(),
                node_part: Vec::new(),
            })
        }
    }

    #[test]
    fn connectivity_rejects_bad_partitioner_output() {
        let (mesh, index) = row(8);
        let policy = BlockPolicy::Connectivity { block_size: 2, ncommon: None };

        let short = Unchecked(vec![0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(
            SmootherBlocks::build(&mesh, &index, 0, &policy, &short),
            Err(MeshPartitionError::OwnerLengthMismatch { expected: 8, got: 7 })
        );

        let out_of_range = Unchecked(vec![7, 0, 1, 1, 2, 2, 3, 3]);
        assert!(matches!(
            SmootherBlocks::build(&mesh, &index, 0, &policy, &out_of_range),
            Err(MeshPartitionError::Partitioner(PartitionError::InvalidInput(_)))
        ));
    }

    #[test]
    fn contract_violations() {
        let (mesh, index) = row(2);
        let zero = BlockPolicy::Fixed { block_size: 0 };
        assert_eq!(
            SmootherBlocks::build(&mesh, &index, 0, &zero, &GreedyPartitioner),
            Err(MeshPartitionError::InvalidBlockSize)
        );
        assert_eq!(
            SmootherBlocks::build(&mesh, &index, 1, &BlockPolicy::default(), &GreedyPartitioner),
            Err(MeshPartitionError::InvalidSubdomain { subdomain: 1, n_subdomains: 1 })
        );
    }
}
