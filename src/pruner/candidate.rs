//! Contraction candidates and their ordering.

use std::cmp::Ordering;

use crate::policy::PruningPolicy;
use crate::tree::{NodeId, Side, TreeEdgeId};

use super::working::WorkingTree;

/// One direction of a live tree edge, offered for removal.
///
/// The subtree on `side` is the one that would be cut away; its endpoint
/// is the anchor of the removal, the opposite endpoint stays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Tree edge.
    pub edge: TreeEdgeId,
    /// Side that loses.
    pub side: Side,
    /// `score / cost` of that side.
    pub ratio: f64,
    /// Cost of that side.
    pub cost: f64,
    /// Initial degree of the losing endpoint.
    pub anchor_degree: usize,
}

impl Candidate {
    /// Candidate for `side` of `edge`, or `None` when that side's cost is
    /// not above `cost_floor` (the ratio would be undefined or meaningless).
    pub fn new(working: &WorkingTree, edge: TreeEdgeId, side: Side, cost_floor: f64) -> Option<Self> {
        let tree_edge = working.edge(edge);
        let score = tree_edge.score_on(side)?;
        let cost = tree_edge.cost_on(side)?;
        if cost <= cost_floor {
            return None;
        }
        let ratio = score / cost;
        if !ratio.is_finite() {
            return None;
        }
        Some(Self {
            edge,
            side,
            ratio,
            cost,
            anchor_degree: working.initial_degree(tree_edge.end(side)),
        })
    }

    /// Endpoint whose subtree is removed.
    pub fn anchor(&self, working: &WorkingTree) -> NodeId {
        working.edge(self.edge).end(self.side)
    }

    /// Endpoint that stays.
    pub fn safe(&self, working: &WorkingTree) -> NodeId {
        working.edge(self.edge).end(self.side.opposite())
    }

    /// Ordering for the minimum search: `Less` means `self` is removed first.
    ///
    /// Ratios closer than the policy tolerance tie. Ties go to the
    /// candidate whose anchor had the smaller initial degree, then to the
    /// lower edge id, then to side A.
    pub fn compare(&self, other: &Candidate, policy: &PruningPolicy) -> Ordering {
        if policy.ratio_below(self.ratio, other.ratio) {
            return Ordering::Less;
        }
        if !policy.ratios_tie(self.ratio, other.ratio) {
            return Ordering::Greater;
        }
        match self.anchor_degree.cmp(&other.anchor_degree) {
            Ordering::Equal => match self.edge.cmp(&other.edge) {
                Ordering::Equal => self.side.index().cmp(&other.side.index()),
                ord => ord,
            },
            ord => ord,
        }
    }
}

/// Best candidate over every live edge and both of its sides.
pub fn select(working: &WorkingTree, policy: &PruningPolicy, cost_floor: f64) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for edge in working.live_edges() {
        for side in Side::BOTH {
            let Some(candidate) = Candidate::new(working, edge, side, cost_floor) else {
                continue;
            };
            let better = match &best {
                Some(current) => candidate.compare(current, policy) == Ordering::Less,
                None => true,
            };
            if better {
                best = Some(candidate);
            }
        }
    }
    best
}
