//! Successor generation.
//!
//! Produces every syntactically possible next state. Nothing here checks
//! the budget or the visited registry; candidates go through
//! [`crate::pruning`] before they become live.

use crate::problem::Problem;
use crate::state::{Move, SearchState, Side};

/// Hands out creation sequence numbers
#[derive(Debug, Default)]
pub struct Sequencer {
    last: u64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    pub fn issued(&self) -> u64 {
        self.last
    }
}

/// The moves available from `state`, in roster order
pub fn candidate_moves(state: &SearchState, problem: &Problem) -> Vec<Move> {
    match state.device {
        Side::Near => {
            let near: Vec<_> = state.near.iter().collect();
            match near.len() {
                0 => Vec::new(),
                1 => vec![Move::solo_cross(near[0], problem)],
                n => {
                    let mut moves = Vec::with_capacity(n * (n - 1) / 2);
                    for i in 0..n {
                        for j in (i + 1)..n {
                            moves.push(Move::cross(near[i], near[j], problem));
                        }
                    }
                    moves
                }
            }
        }
        // Returning is pointless once the near side is empty
        Side::Far if state.near.is_empty() => Vec::new(),
        Side::Far => state
            .far
            .iter()
            .map(|actor| Move::return_with(actor, problem))
            .collect(),
    }
}

/// Candidate successor states of `state`
pub fn successors(
    state: &SearchState,
    problem: &Problem,
    sequencer: &mut Sequencer,
) -> Vec<SearchState> {
    candidate_moves(state, problem)
        .into_iter()
        .map(|mv| state.apply(mv, sequencer.issue()))
        .collect()
}
