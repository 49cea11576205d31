//! Subdomain-contiguous DOF numbering for every discretization space.
//!
//! Given a canonically numbered mesh and an element owner array,
//! [`PartitionIndex::build`] renumbers each space so that subdomain `s` owns
//! the contiguous partitioned range `offsets[s]..offsets[s+1]`, and lists for
//! every subdomain the entries its elements touch but another subdomain owns.
//!
//! Node ownership is first-owner-wins: subdomains are swept in ascending
//! order and each owned element claims its still unclaimed nodes in local
//! slot order. A node shared by several subdomains therefore belongs to the
//! smallest of them.
//!
//! The whole computation is deterministic and local: every process building
//! from the same inputs gets the same tables.

pub mod space;

pub use space::{DofSpace, DofSpaceIndex, GhostList};

use itertools::Itertools;
use space::UNASSIGNED;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshPartitionError;
use crate::topology::canonical::NodeClassCounts;
use crate::topology::element::MeshTopology;

/// Numbering tables of one partitioned mesh level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionIndex {
    n_subdomains: usize,
    dimension: u8,
    element_owner: Vec<usize>,
    /// Owned elements of each subdomain, ascending.
    owned_elements: Vec<Vec<usize>>,
    spaces: [DofSpaceIndex; 5],
}

impl PartitionIndex {
    /// Build the tables of all five spaces.
    ///
    /// `mesh` must be canonically numbered with class boundaries `counts`.
    pub fn build(
        mesh: &MeshTopology,
        counts: NodeClassCounts,
        element_owner: &[usize],
        n_subdomains: usize,
    ) -> Result<Self, MeshPartitionError> {
        if n_subdomains == 0 {
            return Err(MeshPartitionError::ZeroSubdomains);
        }
        let n_elem = mesh.n_elements();
        if element_owner.len() != n_elem {
            return Err(MeshPartitionError::OwnerLengthMismatch {
                expected: n_elem,
                got: element_owner.len(),
            });
        }
        if counts.total() != mesh.n_nodes() {
            return Err(MeshPartitionError::InvariantViolation(format!(
                "class counts cover {} nodes, mesh has {}",
                counts.total(),
                mesh.n_nodes()
            )));
        }

        let mut owned_elements = vec![Vec::new(); n_subdomains];
        for (e, &owner) in element_owner.iter().enumerate() {
            owned_elements
                .get_mut(owner)
                .ok_or(MeshPartitionError::InvalidOwner {
                    element: e,
                    owner,
                    n_subdomains,
                })?
                .push(e);
        }

        let dimension = mesh.dimension();
        let mut spaces = [
            DofSpaceIndex::new(counts.linear(), n_subdomains),
            DofSpaceIndex::new(counts.quadratic(), n_subdomains),
            DofSpaceIndex::new(counts.total(), n_subdomains),
            DofSpaceIndex::new(n_elem, n_subdomains),
            DofSpaceIndex::new(n_elem * (usize::from(dimension) + 1), n_subdomains),
        ];

        // owned nodes, first owner wins
        let mut node_owner = vec![UNASSIGNED; mesh.n_nodes()];
        let mut next = [0usize; 3];
        for (s, elements) in owned_elements.iter().enumerate() {
            for &e in elements {
                for (class, node) in mesh.element(e).classified_nodes() {
                    if counts.class_of(node) != class {
                        return Err(MeshPartitionError::InconsistentNodeClass { node });
                    }
                    if node_owner[node] != UNASSIGNED {
                        continue;
                    }
                    node_owner[node] = s;
                    for space in DofSpace::NODAL.into_iter().filter(|sp| sp.carries(class)) {
                        let table = &mut spaces[space.slot()];
                        table.assign(node, next[space.slot()]);
                        next[space.slot()] += 1;
                    }
                }
            }
            for space in DofSpace::NODAL {
                spaces[space.slot()].offsets[s + 1] = next[space.slot()];
            }
        }

        // element spaces: subdomain, then k, then element
        let mut p_const = 0;
        let mut p_disc = 0;
        for (s, elements) in owned_elements.iter().enumerate() {
            for &e in elements {
                spaces[DofSpace::PiecewiseConstant.slot()].assign(e, p_const);
                p_const += 1;
            }
            for k in 0..=usize::from(dimension) {
                for &e in elements {
                    spaces[DofSpace::DiscontinuousLinear.slot()].assign(e + k * n_elem, p_disc);
                    p_disc += 1;
                }
            }
            spaces[DofSpace::PiecewiseConstant.slot()].offsets[s + 1] = p_const;
            spaces[DofSpace::DiscontinuousLinear.slot()].offsets[s + 1] = p_disc;
        }

        // ghosts
        let mut last_visit = vec![UNASSIGNED; mesh.n_nodes()];
        for (s, elements) in owned_elements.iter().enumerate() {
            for &e in elements {
                for (class, node) in mesh.element(e).classified_nodes() {
                    if last_visit[node] == s {
                        continue;
                    }
                    last_visit[node] = s;
                    if node_owner[node] == s {
                        continue;
                    }
                    for space in DofSpace::NODAL.into_iter().filter(|sp| sp.carries(class)) {
                        let table = &mut spaces[space.slot()];
                        let p = table.global_to_partitioned[node];
                        table.ghosts[s].push(node, p);
                    }
                }
            }
        }

        let index = Self {
            n_subdomains,
            dimension,
            element_owner: element_owner.to_vec(),
            owned_elements,
            spaces,
        };
        crate::debug_invariants!(index.validate_invariants(), "partition index");

        for space in DofSpace::NODAL {
            let table = index.space(space);
            log::debug!(
                "{space:?}: {} entries, owned {:?}, ghosts {:?}",
                table.total(),
                (0..n_subdomains).map(|s| table.owned_count(s)).collect::<Vec<_>>(),
                table.ghosts.iter().map(GhostList::len).collect::<Vec<_>>()
            );
        }
        Ok(index)
    }

    pub fn n_subdomains(&self) -> usize {
        self.n_subdomains
    }

    pub fn dimension(&self) -> u8 {
        self.dimension
    }

    /// Numbering table of `space`.
    pub fn space(&self, space: DofSpace) -> &DofSpaceIndex {
        &self.spaces[space.slot()]
    }

    /// Global size of `space`.
    pub fn dof_count(&self, space: DofSpace) -> usize {
        self.space(space).total()
    }

    pub fn total(&self, space: DofSpace) -> usize {
        self.dof_count(space)
    }

    pub fn offsets(&self, space: DofSpace) -> &[usize] {
        self.space(space).offsets()
    }

    pub fn owned_range(&self, space: DofSpace, subdomain: usize) -> std::ops::Range<usize> {
        self.space(space).owned_range(subdomain)
    }

    pub fn owned_count(&self, space: DofSpace, subdomain: usize) -> usize {
        self.space(space).owned_count(subdomain)
    }

    pub fn ghosts(&self, space: DofSpace, subdomain: usize) -> &GhostList {
        self.space(space).ghosts(subdomain)
    }

    pub fn partitioned_index(&self, space: DofSpace, global: usize) -> Option<usize> {
        self.space(space).partitioned_index(global)
    }

    pub fn global_index(&self, space: DofSpace, partitioned: usize) -> Option<usize> {
        self.space(space).global_index(partitioned)
    }

    pub fn local_index(&self, space: DofSpace, subdomain: usize, global: usize) -> Option<usize> {
        self.space(space).local_index(subdomain, global)
    }

    pub fn owner_of(&self, space: DofSpace, global: usize) -> Option<usize> {
        self.space(space).owner_of(global)
    }

    /// Owning subdomain of every element.
    pub fn element_owner(&self) -> &[usize] {
        &self.element_owner
    }

    /// Elements owned by `subdomain`, ascending.
    pub fn owned_elements(&self, subdomain: usize) -> &[usize] {
        &self.owned_elements[subdomain]
    }

    /// Partitioned index of element `element`.
    pub fn partitioned_element(&self, element: usize) -> Option<usize> {
        self.partitioned_index(DofSpace::PiecewiseConstant, element)
    }

    /// Element at partitioned index `partitioned`.
    pub fn global_element(&self, partitioned: usize) -> Option<usize> {
        self.global_index(DofSpace::PiecewiseConstant, partitioned)
    }
}

impl DebugInvariants for PartitionIndex {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "partition index");
    }

    /// Owned ranges tile every space, lookups are inverse bijections, ghosts
    /// are foreign and unique, and nodal ghost sets are nested.
    fn validate_invariants(&self) -> Result<(), MeshPartitionError> {
        let violation = |msg: String| Err(MeshPartitionError::InvariantViolation(msg));
        for space in DofSpace::ALL {
            let table = self.space(space);
            let offsets = table.offsets();
            if offsets.first() != Some(&0) || offsets.last() != Some(&table.total()) {
                return violation(format!("{space:?}: offsets {offsets:?} do not span {}", table.total()));
            }
            if offsets.windows(2).any(|w| w[0] > w[1]) {
                return violation(format!("{space:?}: offsets {offsets:?} decrease"));
            }
            for g in 0..table.total() {
                let Some(p) = table.partitioned_index(g) else {
                    return violation(format!("{space:?}: entry {g} unassigned"));
                };
                if table.global_index(p) != Some(g) {
                    return violation(format!("{space:?}: entry {g} does not round-trip"));
                }
            }
            for s in 0..self.n_subdomains {
                let ghosts = table.ghosts(s);
                if space.is_element_space() && !ghosts.is_empty() {
                    return violation(format!("{space:?}: element space has ghosts"));
                }
                let mut seen = hashbrown::HashSet::with_capacity(ghosts.len());
                for (g, p) in ghosts.iter() {
                    if !seen.insert(g) {
                        return violation(format!("{space:?}: ghost {g} repeated on {s}"));
                    }
                    if table.partitioned_index(g) != Some(p) || table.owned_range(s).contains(&p) {
                        return violation(format!("{space:?}: ghost {g} of {s} is not foreign"));
                    }
                }
            }
        }
        for s in 0..self.n_subdomains {
            for (inner, outer) in DofSpace::NODAL.into_iter().tuple_windows() {
                let wider: hashbrown::HashSet<usize> =
                    self.ghosts(outer, s).global.iter().copied().collect();
                if let Some(g) = self.ghosts(inner, s).global.iter().find(|g| !wider.contains(*g)) {
                    return violation(format!("{inner:?} ghost {g} of {s} missing from {outer:?}"));
                }
            }
        }
        Ok(())
    }
}
