//! Search state representation.
//!
//! Actor groups are stored as bitsets over roster indices, so a physical
//! configuration is three words and hashes cheaply for the visited
//! registry.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::problem::{ActorId, Problem};

/// A set of actors, one bit per roster index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActorSet(u64);

impl ActorSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The first `count` actors of the roster
    pub fn full(count: usize) -> Self {
        if count >= 64 {
            Self(u64::MAX)
        } else {
            Self((1u64 << count) - 1)
        }
    }

    pub fn contains(self, id: ActorId) -> bool {
        self.0 & Self::bit(id) != 0
    }

    pub fn with(self, id: ActorId) -> Self {
        Self(self.0 | Self::bit(id))
    }

    pub fn without(self, id: ActorId) -> Self {
        Self(self.0 & !Self::bit(id))
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn is_disjoint(self, other: Self) -> bool {
        self.0 & other.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in ascending roster order
    pub fn iter(self) -> impl Iterator<Item = ActorId> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros();
            bits &= bits - 1;
            Some(ActorId(index as u8))
        })
    }

    fn bit(id: ActorId) -> u64 {
        1u64 << id.0
    }
}

impl FromIterator<ActorId> for ActorSet {
    fn from_iter<I: IntoIterator<Item = ActorId>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), ActorSet::with)
    }
}

/// Bank of the crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Near,
    Far,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Near => Side::Far,
            Side::Far => Side::Near,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Near => f.write_str("near"),
            Side::Far => f.write_str("far"),
        }
    }
}

/// Direction of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Cross,
    Return,
}

impl MoveKind {
    /// Side the flashlight is carried to
    pub fn destination(self) -> Side {
        match self {
            MoveKind::Cross => Side::Far,
            MoveKind::Return => Side::Near,
        }
    }

    pub fn origin(self) -> Side {
        self.destination().opposite()
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveKind::Cross => f.write_str("cross"),
            MoveKind::Return => f.write_str("return"),
        }
    }
}

/// One crossing of the bridge with the flashlight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub kind: MoveKind,
    pub actors: SmallVec<[ActorId; 2]>,
    pub duration: f64,
}

impl Move {
    /// Two actors cross together at the slower one's pace
    pub fn cross(a: ActorId, b: ActorId, problem: &Problem) -> Self {
        Self {
            kind: MoveKind::Cross,
            actors: smallvec![a, b],
            duration: problem.duration(a).max(problem.duration(b)),
        }
    }

    /// The last actor on the near side crosses alone
    pub fn solo_cross(a: ActorId, problem: &Problem) -> Self {
        Self {
            kind: MoveKind::Cross,
            actors: smallvec![a],
            duration: problem.duration(a),
        }
    }

    pub fn return_with(a: ActorId, problem: &Problem) -> Self {
        Self {
            kind: MoveKind::Return,
            actors: smallvec![a],
            duration: problem.duration(a),
        }
    }

    pub fn actor_set(&self) -> ActorSet {
        self.actors.iter().copied().collect()
    }
}

/// Physical configuration, ignoring how it was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigKey {
    pub near: ActorSet,
    pub far: ActorSet,
    pub device: Side,
}

/// A node of the search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub near: ActorSet,
    pub far: ActorSet,
    pub device: Side,
    pub elapsed_time: f64,
    pub path: Vec<Move>,
    pub depth: usize,
    pub sequence: u64,
}

impl SearchState {
    /// Everyone on the near side with the flashlight, no time spent
    pub fn initial(problem: &Problem, sequence: u64) -> Self {
        Self {
            near: problem.everyone(),
            far: ActorSet::empty(),
            device: Side::Near,
            elapsed_time: 0.0,
            path: Vec::new(),
            depth: 0,
            sequence,
        }
    }

    /// The candidate produced by applying `mv` to this state.
    ///
    /// The movers leave the move's origin side for its destination and
    /// the flashlight goes with them. No rule is checked here.
    pub fn apply(&self, mv: Move, sequence: u64) -> Self {
        let movers = mv.actor_set();
        let (near, far) = match mv.kind {
            MoveKind::Cross => (self.near.difference(movers), self.far.union(movers)),
            MoveKind::Return => (self.near.union(movers), self.far.difference(movers)),
        };
        let elapsed_time = self.elapsed_time + mv.duration;
        let device = mv.kind.destination();

        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(mv);

        Self {
            near,
            far,
            device,
            elapsed_time,
            depth: path.len(),
            path,
            sequence,
        }
    }

    pub fn key(&self) -> ConfigKey {
        ConfigKey {
            near: self.near,
            far: self.far,
            device: self.device,
        }
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.path.last()
    }

    pub fn occupants(&self, side: Side) -> ActorSet {
        match side {
            Side::Near => self.near,
            Side::Far => self.far,
        }
    }

    /// True when `near` and `far` split `everyone` without overlap
    pub fn partitions(&self, everyone: ActorSet) -> bool {
        self.near.is_disjoint(self.far) && self.near.union(self.far) == everyone
    }
}
