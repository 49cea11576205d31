//! DOF spaces and their per-space numbering tables.

use serde::{Deserialize, Serialize};

use crate::topology::element_type::NodeClass;

/// Out-of-range marker for entries no subdomain claimed.
pub(crate) const UNASSIGNED: usize = usize::MAX;

/// The five discretization spaces the solver numbers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DofSpace {
    /// One DOF per vertex node.
    Linear,
    /// One DOF per vertex or mid node.
    Quadratic,
    /// One DOF per node.
    Biquadratic,
    /// One DOF per element.
    PiecewiseConstant,
    /// `dimension + 1` DOFs per element.
    DiscontinuousLinear,
}

impl DofSpace {
    pub const ALL: [DofSpace; 5] = [
        DofSpace::Linear,
        DofSpace::Quadratic,
        DofSpace::Biquadratic,
        DofSpace::PiecewiseConstant,
        DofSpace::DiscontinuousLinear,
    ];

    /// Node-based spaces, coarsest first.
    pub const NODAL: [DofSpace; 3] = [DofSpace::Linear, DofSpace::Quadratic, DofSpace::Biquadratic];

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self as usize
    }

    /// True for the spaces carried by elements rather than nodes.
    pub fn is_element_space(self) -> bool {
        matches!(self, DofSpace::PiecewiseConstant | DofSpace::DiscontinuousLinear)
    }

    /// Whether a node of class `class` carries a DOF of this space.
    pub fn carries(self, class: NodeClass) -> bool {
        match self {
            DofSpace::Linear => class == NodeClass::Vertex,
            DofSpace::Quadratic => class != NodeClass::Bubble,
            DofSpace::Biquadratic => true,
            DofSpace::PiecewiseConstant | DofSpace::DiscontinuousLinear => false,
        }
    }
}

/// Entries of one subdomain that are owned by another.
///
/// `global[i]` is the entry's global index, `partitioned[i]` its index in the
/// owner's partitioned range. Entries appear in first-reference order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostList {
    pub global: Vec<usize>,
    pub partitioned: Vec<usize>,
}

impl GhostList {
    pub fn len(&self) -> usize {
        self.global.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }

    pub(crate) fn push(&mut self, global: usize, partitioned: usize) {
        self.global.push(global);
        self.partitioned.push(partitioned);
    }

    /// `(global, partitioned)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.global.iter().copied().zip(self.partitioned.iter().copied())
    }
}

/// Global↔partitioned numbering of one space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DofSpaceIndex {
    pub(crate) global_to_partitioned: Vec<usize>,
    pub(crate) partitioned_to_global: Vec<usize>,
    pub(crate) offsets: Vec<usize>,
    pub(crate) ghosts: Vec<GhostList>,
}

impl DofSpaceIndex {
    pub(crate) fn new(size: usize, n_subdomains: usize) -> Self {
        Self {
            global_to_partitioned: vec![UNASSIGNED; size],
            partitioned_to_global: vec![UNASSIGNED; size],
            offsets: vec![0; n_subdomains + 1],
            ghosts: vec![GhostList::default(); n_subdomains],
        }
    }

    /// Record that global entry `global` takes partitioned slot `partitioned`.
    pub(crate) fn assign(&mut self, global: usize, partitioned: usize) {
        self.global_to_partitioned[global] = partitioned;
        self.partitioned_to_global[partitioned] = global;
    }

    /// Global size of the space.
    pub fn total(&self) -> usize {
        self.global_to_partitioned.len()
    }

    /// `offsets[s]..offsets[s+1]` is the partitioned range owned by `s`.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn n_subdomains(&self) -> usize {
        self.ghosts.len()
    }

    pub fn owned_range(&self, subdomain: usize) -> std::ops::Range<usize> {
        self.offsets[subdomain]..self.offsets[subdomain + 1]
    }

    pub fn owned_count(&self, subdomain: usize) -> usize {
        self.offsets[subdomain + 1] - self.offsets[subdomain]
    }

    pub fn ghosts(&self, subdomain: usize) -> &GhostList {
        &self.ghosts[subdomain]
    }

    /// Partitioned index of every global entry.
    pub fn global_to_partitioned(&self) -> &[usize] {
        &self.global_to_partitioned
    }

    /// Global index of every partitioned entry.
    pub fn partitioned_to_global(&self) -> &[usize] {
        &self.partitioned_to_global
    }

    /// Partitioned index of global entry `global`.
    pub fn partitioned_index(&self, global: usize) -> Option<usize> {
        self.global_to_partitioned
            .get(global)
            .copied()
            .filter(|&p| p != UNASSIGNED)
    }

    /// Global index of partitioned entry `partitioned`.
    pub fn global_index(&self, partitioned: usize) -> Option<usize> {
        self.partitioned_to_global
            .get(partitioned)
            .copied()
            .filter(|&g| g != UNASSIGNED)
    }

    /// Subdomain owning global entry `global`.
    pub fn owner_of(&self, global: usize) -> Option<usize> {
        let p = self.partitioned_index(global)?;
        Some(self.offsets.partition_point(|&o| o <= p) - 1)
    }

    /// Position of `global` in subdomain `subdomain`'s local vector: owned
    /// entries first, in partitioned order, then ghosts in list order.
    pub fn local_index(&self, subdomain: usize, global: usize) -> Option<usize> {
        let p = self.partitioned_index(global)?;
        let range = self.owned_range(subdomain);
        if range.contains(&p) {
            return Some(p - range.start);
        }
        self.ghosts[subdomain]
            .global
            .iter()
            .position(|&g| g == global)
            .map(|i| range.len() + i)
    }
}
