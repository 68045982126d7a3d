//! Expansion order for the two search disciplines.
//!
//! Depth-first keeps a stack of sibling lists and hands candidates out one
//! at a time, so a state's whole subtree is explored before its next
//! sibling is even validated. Breadth-first keeps admitted states in
//! strict depth layers behind a level barrier.

use std::collections::VecDeque;
use std::vec;

use crate::state::SearchState;

/// Stack of unvisited sibling candidates
#[derive(Debug, Default)]
pub struct DepthFirstFrontier {
    frames: Vec<vec::IntoIter<SearchState>>,
}

impl DepthFirstFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the children of the state just expanded
    pub fn push_siblings(&mut self, candidates: Vec<SearchState>) {
        if !candidates.is_empty() {
            self.frames.push(candidates.into_iter());
        }
    }

    /// Next candidate from the deepest unfinished sibling list
    pub fn next_candidate(&mut self) -> Option<SearchState> {
        while let Some(frame) = self.frames.last_mut() {
            if let Some(candidate) = frame.next() {
                return Some(candidate);
            }
            self.frames.pop();
        }
        None
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.iter().all(|frame| frame.len() == 0)
    }
}

/// FIFO of admitted states with a per-depth barrier.
///
/// `pending[d]` counts live states at depth `d` that have not been
/// processed yet. `processing_depth` only moves on once that count for the
/// current layer reaches zero.
#[derive(Debug, Default)]
pub struct LevelQueue {
    queue: VecDeque<SearchState>,
    pending: Vec<usize>,
    processing_depth: usize,
    current_depth: usize,
}

impl LevelQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: SearchState) {
        let depth = state.depth;
        debug_assert!(
            depth >= self.processing_depth,
            "state at depth {depth} queued while processing {}",
            self.processing_depth
        );
        if self.pending.len() <= depth {
            self.pending.resize(depth + 1, 0);
        }
        self.pending[depth] += 1;
        self.current_depth = self.current_depth.max(depth);
        self.queue.push_back(state);
    }

    /// Next state of the layer being processed.
    ///
    /// Only states at `processing_depth` are handed out; deeper states wait
    /// behind the barrier even while the current layer is still in flight.
    pub fn pop(&mut self) -> Option<SearchState> {
        if self.level_complete() || self.queue.front()?.depth != self.processing_depth {
            return None;
        }
        self.queue.pop_front()
    }

    /// Must be called exactly once for every popped state, whether it was
    /// expanded or discarded
    pub fn mark_processed(&mut self, depth: usize) {
        if let Some(count) = self.pending.get_mut(depth) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn level_complete(&self) -> bool {
        self.pending_at(self.processing_depth) == 0
    }

    /// Move the barrier one layer down once the current layer is done.
    ///
    /// Returns the new processing depth, or `None` when no deeper layer has
    /// been reached.
    pub fn advance(&mut self) -> Option<usize> {
        if !self.level_complete() || self.processing_depth >= self.current_depth {
            return None;
        }
        self.processing_depth += 1;
        Some(self.processing_depth)
    }

    pub fn pending_at(&self, depth: usize) -> usize {
        self.pending.get(depth).copied().unwrap_or(0)
    }

    pub fn processing_depth(&self) -> usize {
        self.processing_depth
    }

    pub fn current_depth(&self) -> usize {
        self.current_depth
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ActorId, Problem, ProblemConfig};
    use crate::state::Move;

    fn sample() -> Problem {
        ProblemConfig::sample().validate().unwrap()
    }

    fn at_depth(problem: &Problem, depth: usize, sequence: u64) -> SearchState {
        let mut state = SearchState::initial(problem, sequence);
        for step in 0..depth {
            let mv = if step % 2 == 0 {
                Move::cross(ActorId(0), ActorId(1), problem)
            } else {
                Move::return_with(ActorId(0), problem)
            };
            state = state.apply(mv, sequence);
        }
        state
    }

    #[test]
    fn test_depth_first_finishes_subtree_before_sibling() {
        let problem = sample();
        let mut frontier = DepthFirstFrontier::new();
        frontier.push_siblings(vec![at_depth(&problem, 1, 1), at_depth(&problem, 1, 2)]);

        let first = frontier.next_candidate().unwrap();
        assert_eq!(first.sequence, 1);

        frontier.push_siblings(vec![at_depth(&problem, 2, 3), at_depth(&problem, 2, 4)]);
        assert_eq!(frontier.depth(), 2);

        let order: Vec<u64> = std::iter::from_fn(|| frontier.next_candidate())
            .map(|s| s.sequence)
            .collect();
        assert_eq!(order, vec![3, 4, 2]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_depth_first_ignores_empty_sibling_lists() {
        let mut frontier = DepthFirstFrontier::new();
        frontier.push_siblings(Vec::new());
        assert_eq!(frontier.depth(), 0);
        assert!(frontier.next_candidate().is_none());
    }

    #[test]
    fn test_level_barrier_holds_until_layer_done() {
        let problem = sample();
        let mut queue = LevelQueue::new();
        queue.push(at_depth(&problem, 0, 1));

        let root = queue.pop().unwrap();
        queue.push(at_depth(&problem, 1, 2));
        queue.push(at_depth(&problem, 1, 3));

        // root not yet marked processed: layer 1 is locked
        assert!(queue.pop().is_none());
        assert_eq!(queue.advance(), None);

        queue.mark_processed(root.depth);
        assert!(queue.level_complete());
        assert_eq!(queue.advance(), Some(1));
        assert_eq!(queue.processing_depth(), 1);
        assert_eq!(queue.pending_at(1), 2);

        let a = queue.pop().unwrap();
        queue.push(at_depth(&problem, 2, 4));
        queue.mark_processed(a.depth);
        assert_eq!(queue.advance(), None);

        let b = queue.pop().unwrap();
        assert_eq!(b.sequence, 3);
        queue.mark_processed(b.depth);
        assert_eq!(queue.advance(), Some(2));
        assert_eq!(queue.current_depth(), 2);
    }

    #[test]
    fn test_deeper_state_waits_for_layer_in_flight() {
        let problem = sample();
        let mut queue = LevelQueue::new();
        queue.push(at_depth(&problem, 0, 1));
        queue.push(at_depth(&problem, 0, 2));

        let first = queue.pop().unwrap();
        queue.push(at_depth(&problem, 1, 3));
        queue.mark_processed(first.depth);

        // one depth-0 state is still pending, so its sibling comes next
        let second = queue.pop().unwrap();
        assert_eq!(second.sequence, 2);
        queue.push(at_depth(&problem, 1, 4));

        // second is popped but not processed: depth 1 stays locked
        assert!(queue.pop().is_none());
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pending_at(1), 2);

        queue.mark_processed(second.depth);
        assert_eq!(queue.advance(), Some(1));
        assert_eq!(queue.pop().unwrap().sequence, 3);
    }

    #[test]
    fn test_level_queue_drains() {
        let problem = sample();
        let mut queue = LevelQueue::new();
        queue.push(at_depth(&problem, 0, 1));
        let root = queue.pop().unwrap();
        queue.mark_processed(root.depth);

        assert!(queue.is_empty());
        assert!(queue.level_complete());
        assert_eq!(queue.advance(), None);
        assert!(queue.pop().is_none());
    }
}
