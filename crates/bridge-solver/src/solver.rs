//! Exhaustive bounded search over crossing plans.
//!
//! Each call to [`solve`] builds a fresh [`SearchRun`] owning its own
//! visited registry and solution collector, so runs never share state.
//! Every candidate goes through the same pipeline regardless of the
//! discipline: generate, validate and prune, admit, goal-check, schedule.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::frontier::{DepthFirstFrontier, LevelQueue};
use crate::problem::Problem;
use crate::pruning::{admit, check_superseded, Admission, Violation, ViolationKind};
use crate::registry::VisitedRegistry;
use crate::solution::{is_goal, Solution, SolutionCollector};
use crate::state::SearchState;
use crate::successors::{successors, Sequencer};

/// Exploration discipline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Bfs,
    Dfs,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Bfs => f.write_str("bfs"),
            Strategy::Dfs => f.write_str("dfs"),
        }
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// Stop as soon as the first solution is recorded
    pub stop_at_first: bool,
    /// Keep a copy of every admitted state in [`SolverResult::tree`]
    pub record_tree: bool,
}

impl SolverConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}

/// Counters collected during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub candidates_generated: usize,
    pub states_admitted: usize,
    pub states_expanded: usize,
    pub tied_arrivals: usize,
    /// Queued BFS states dropped at dequeue because their configuration was
    /// since reached more cheaply. Counted under `DUPLICATE_STATE` as well,
    /// but never as a generated candidate.
    pub stale_discards: usize,
    pub solutions_found: usize,
    pub configurations_visited: usize,
    pub max_depth: usize,
    pub violations: BTreeMap<ViolationKind, usize>,
    pub time_elapsed_ms: u64,
}

impl SearchStats {
    pub fn violations_of(&self, kind: ViolationKind) -> usize {
        self.violations.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_violations(&self) -> usize {
        self.violations.values().sum()
    }
}

/// Result of the solver search
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub strategy: Strategy,
    /// Solutions in discovery order
    pub solutions: Vec<Solution>,
    /// Whether the whole frontier was explored
    pub search_exhausted: bool,
    pub stats: SearchStats,
    /// Admitted states in admission order, when recording was requested
    pub tree: Vec<SearchState>,
}

impl SolverResult {
    pub fn found(&self) -> bool {
        !self.solutions.is_empty()
    }
}

/// Hooks into the search event stream. Every method defaults to a no-op.
pub trait SearchObserver {
    fn on_admitted(&mut self, _state: &SearchState, _admission: Admission) {}

    fn on_violation(&mut self, _state: &SearchState, _violation: &Violation) {}

    fn on_expanded(&mut self, _state: &SearchState) {}

    fn on_level_advance(&mut self, _depth: usize) {}

    fn on_solution(&mut self, _solution: &Solution) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Enumerate every admissible crossing plan within the problem's budget
pub fn solve(problem: &Problem, config: &SolverConfig) -> SolverResult {
    solve_with_observer(problem, config, &mut NoopObserver)
}

pub fn solve_with_observer<O: SearchObserver>(
    problem: &Problem,
    config: &SolverConfig,
    observer: &mut O,
) -> SolverResult {
    SearchRun::new(problem, config, observer).run()
}

/// State owned by a single search run
struct SearchRun<'a, O> {
    problem: &'a Problem,
    config: &'a SolverConfig,
    observer: &'a mut O,
    registry: VisitedRegistry,
    collector: SolutionCollector,
    sequencer: Sequencer,
    stats: SearchStats,
    tree: Vec<SearchState>,
    halted: bool,
}

impl<'a, O: SearchObserver> SearchRun<'a, O> {
    fn new(problem: &'a Problem, config: &'a SolverConfig, observer: &'a mut O) -> Self {
        Self {
            problem,
            config,
            observer,
            registry: VisitedRegistry::new(),
            collector: SolutionCollector::new(),
            sequencer: Sequencer::new(),
            stats: SearchStats::default(),
            tree: Vec::new(),
            halted: false,
        }
    }

    fn run(mut self) -> SolverResult {
        let start_time = Instant::now();
        info!(
            strategy = %self.config.strategy,
            actors = self.problem.len(),
            max_time = self.problem.max_time(),
            "starting search"
        );

        match self.config.strategy {
            Strategy::Dfs => self.run_depth_first(),
            Strategy::Bfs => self.run_breadth_first(),
        }

        self.stats.solutions_found = self.collector.len();
        self.stats.configurations_visited = self.registry.len();
        self.stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(
            solutions = self.stats.solutions_found,
            admitted = self.stats.states_admitted,
            pruned = self.stats.total_violations(),
            exhausted = !self.halted,
            "search finished"
        );

        SolverResult {
            strategy: self.config.strategy,
            solutions: self.collector.into_solutions(),
            search_exhausted: !self.halted,
            stats: self.stats,
            tree: self.tree,
        }
    }

    fn run_depth_first(&mut self) {
        let mut frontier = DepthFirstFrontier::new();
        let initial = SearchState::initial(self.problem, self.sequencer.issue());
        frontier.push_siblings(vec![initial]);

        while let Some(candidate) = frontier.next_candidate() {
            let Some((state, admission)) = self.consider(candidate) else {
                continue;
            };
            if self.check_goal(&state) {
                if self.halted {
                    return;
                }
                continue;
            }
            if admission == Admission::Tied {
                continue;
            }
            let children = self.expand(&state);
            frontier.push_siblings(children);
        }
    }

    fn run_breadth_first(&mut self) {
        let mut queue = LevelQueue::new();
        let initial = SearchState::initial(self.problem, self.sequencer.issue());
        if let Some((state, _)) = self.consider(initial) {
            if self.check_goal(&state) {
                return;
            }
            queue.push(state);
        }

        loop {
            if queue.level_complete() {
                match queue.advance() {
                    Some(depth) => {
                        debug!(depth, pending = queue.pending_at(depth), "advancing BFS level");
                        self.observer.on_level_advance(depth);
                        continue;
                    }
                    None => break,
                }
            }
            let Some(state) = queue.pop() else {
                break;
            };
            let depth = state.depth;

            // A cheaper route may have reached this configuration since it
            // was queued
            if let Err(violation) = check_superseded(&state, &self.registry) {
                self.stats.stale_discards += 1;
                self.reject(&state, violation);
                queue.mark_processed(depth);
                continue;
            }

            for candidate in self.expand(&state) {
                let Some((child, admission)) = self.consider(candidate) else {
                    continue;
                };
                if self.check_goal(&child) {
                    if self.halted {
                        return;
                    }
                    continue;
                }
                if admission == Admission::Improved {
                    queue.push(child);
                }
            }
            queue.mark_processed(depth);
        }
    }

    /// Validate a candidate and admit it, or record why it was dropped
    fn consider(&mut self, candidate: SearchState) -> Option<(SearchState, Admission)> {
        self.stats.candidates_generated += 1;
        match admit(&candidate, &mut self.registry, self.problem.max_time()) {
            Ok(admission) => {
                self.stats.states_admitted += 1;
                self.stats.max_depth = self.stats.max_depth.max(candidate.depth);
                if admission == Admission::Tied {
                    self.stats.tied_arrivals += 1;
                }
                trace!(
                    depth = candidate.depth,
                    sequence = candidate.sequence,
                    elapsed = candidate.elapsed_time,
                    near = ?self.problem.names(candidate.near),
                    far = ?self.problem.names(candidate.far),
                    flashlight = %candidate.device,
                    ?admission,
                    "admitted state"
                );
                self.observer.on_admitted(&candidate, admission);
                if self.config.record_tree {
                    self.tree.push(candidate.clone());
                }
                Some((candidate, admission))
            }
            Err(violation) => {
                self.reject(&candidate, violation);
                None
            }
        }
    }

    fn reject(&mut self, state: &SearchState, violation: Violation) {
        let kind = violation.kind();
        *self.stats.violations.entry(kind).or_insert(0) += 1;
        debug!(
            violation = %kind,
            sequence = state.sequence,
            depth = state.depth,
            "constraint violation: {violation}"
        );
        self.observer.on_violation(state, &violation);
    }

    /// Record a goal state's plan. Returns whether the state is a goal.
    fn check_goal(&mut self, state: &SearchState) -> bool {
        if !is_goal(state, self.problem) {
            return false;
        }
        if let Some(solution) = self.collector.record(state) {
            info!(
                solution = solution.solution_number,
                total_time = solution.total_time,
                moves = solution.moves.len(),
                "solution found"
            );
            self.observer.on_solution(solution);
            if self.config.stop_at_first {
                self.halted = true;
            }
        }
        true
    }

    fn expand(&mut self, state: &SearchState) -> Vec<SearchState> {
        self.stats.states_expanded += 1;
        self.observer.on_expanded(state);
        successors(state, self.problem, &mut self.sequencer)
    }
}
