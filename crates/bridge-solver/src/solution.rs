//! Goal detection, solution bookkeeping and narration.

use std::collections::HashSet;

use smallvec::SmallVec;

use crate::problem::{ActorId, Problem};
use crate::state::{Move, MoveKind, SearchState, Side};

/// A complete crossing plan within budget
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub solution_number: usize,
    pub moves: Vec<Move>,
    pub total_time: f64,
}

impl Solution {
    pub fn signature(&self) -> Signature {
        signature_of(&self.moves)
    }
}

/// Ordered `(kind, actors, duration bits)` per step
pub type Signature = Vec<(MoveKind, SmallVec<[ActorId; 2]>, u64)>;

pub fn signature_of(moves: &[Move]) -> Signature {
    moves
        .iter()
        .map(|mv| (mv.kind, mv.actors.clone(), mv.duration.to_bits()))
        .collect()
}

/// Everyone across, flashlight with them, within budget
pub fn is_goal(state: &SearchState, problem: &Problem) -> bool {
    state.near.is_empty()
        && state.far == problem.everyone()
        && state.device == Side::Far
        && state.elapsed_time <= problem.max_time()
}

/// Distinct solutions in discovery order
#[derive(Debug, Default)]
pub struct SolutionCollector {
    solutions: Vec<Solution>,
    seen: HashSet<Signature>,
}

impl SolutionCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the path of a goal state unless an identical move sequence
    /// was already recorded. Returns the new solution.
    pub fn record(&mut self, state: &SearchState) -> Option<&Solution> {
        if !self.seen.insert(signature_of(&state.path)) {
            return None;
        }
        self.solutions.push(Solution {
            solution_number: self.solutions.len() + 1,
            moves: state.path.clone(),
            total_time: state.elapsed_time,
        });
        self.solutions.last()
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn into_solutions(self) -> Vec<Solution> {
        self.solutions
    }
}

/// One line of narration for a move
pub fn describe_move(mv: &Move, problem: &Problem) -> String {
    let names: Vec<&str> = mv.actors.iter().map(|&id| problem.name(id)).collect();
    match (mv.kind, names.as_slice()) {
        (MoveKind::Cross, [a, b]) => format!("{a} and {b} cross → {} min", mv.duration),
        (MoveKind::Cross, [a]) => format!("{a} crosses alone → {} min", mv.duration),
        (MoveKind::Cross, all) => format!("{} cross together → {} min", all.join(", "), mv.duration),
        (MoveKind::Return, [a]) => {
            format!("{a} returns with the flashlight → {} min", mv.duration)
        }
        (MoveKind::Return, all) => format!("{} return → {} min", all.join(", "), mv.duration),
    }
}

/// Numbered narration of a whole solution
pub fn narrate(solution: &Solution, problem: &Problem) -> Vec<String> {
    solution
        .moves
        .iter()
        .enumerate()
        .map(|(i, mv)| format!("Step {}: {}", i + 1, describe_move(mv, problem)))
        .collect()
}
