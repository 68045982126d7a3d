//! Bridge and torch puzzle solver.
//!
//! A group of people must cross a narrow bridge at night with a single
//! flashlight. At most two cross at once, a pair walks at the slower
//! person's pace, and the flashlight has to go along on every crossing.
//! This crate enumerates every distinct plan that gets everyone across
//! within a time budget, using either depth-first or breadth-first
//! exploration over deduplicated states.

pub mod frontier;
pub mod problem;
pub mod pruning;
pub mod registry;
pub mod solution;
pub mod solver;
pub mod state;
pub mod successors;

// Re-export main types
pub use problem::{Actor, ActorId, Problem, ProblemConfig, ProblemError};
pub use pruning::{Admission, Violation, ViolationKind};
pub use solution::{describe_move, narrate, Solution};
pub use solver::{
    solve, solve_with_observer, SearchObserver, SearchStats, SolverConfig, SolverResult, Strategy,
};
pub use state::{ActorSet, Move, MoveKind, SearchState, Side};
