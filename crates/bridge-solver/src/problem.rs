//! Problem instance types that match the JSON instance format.
//!
//! A [`ProblemConfig`] deserializes directly from an instance file and is
//! validated into an immutable [`Problem`] before the search sees it. The
//! search assumes a well-formed instance, so every precondition is checked
//! here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::ActorSet;

/// Largest roster the search supports (actor sets are 64-bit masks)
pub const MAX_ACTORS: usize = 64;

/// Budget used when an instance does not name one
pub const DEFAULT_MAX_TIME: f64 = 17.0;

/// Errors raised while loading or validating a problem instance
#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("roster is empty")]
    EmptyRoster,

    #[error("actor {0:?} appears more than once")]
    DuplicateActor(String),

    #[error("actor {name:?} has invalid duration {duration}")]
    InvalidDuration { name: String, duration: f64 },

    #[error("invalid time budget {0}")]
    InvalidBudget(f64),

    #[error("roster has {count} actors, at most {max} are supported")]
    TooManyActors { count: usize, max: usize },

    #[error("malformed instance JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read instance: {0}")]
    Io(#[from] std::io::Error),
}

/// Index of an actor in the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u8);

impl ActorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named actor with its individual crossing duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub duration: f64,
}

impl Actor {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

fn default_max_time() -> f64 {
    DEFAULT_MAX_TIME
}

/// Unvalidated instance as it appears on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemConfig {
    pub actors: Vec<Actor>,
    #[serde(default = "default_max_time")]
    pub max_time: f64,
}

impl ProblemConfig {
    /// The classic four-person instance
    pub fn sample() -> Self {
        Self {
            actors: vec![
                Actor::new("You", 1.0),
                Actor::new("Lab Assistant", 2.0),
                Actor::new("Worker", 5.0),
                Actor::new("Scientist", 10.0),
            ],
            max_time: DEFAULT_MAX_TIME,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ProblemError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every precondition the search relies on
    pub fn validate(self) -> Result<Problem, ProblemError> {
        if self.actors.is_empty() {
            return Err(ProblemError::EmptyRoster);
        }
        if self.actors.len() > MAX_ACTORS {
            return Err(ProblemError::TooManyActors {
                count: self.actors.len(),
                max: MAX_ACTORS,
            });
        }
        validate_budget(self.max_time)?;

        let mut names = HashSet::new();
        for actor in &self.actors {
            if !actor.duration.is_finite() || actor.duration < 0.0 {
                return Err(ProblemError::InvalidDuration {
                    name: actor.name.clone(),
                    duration: actor.duration,
                });
            }
            if !names.insert(actor.name.as_str()) {
                return Err(ProblemError::DuplicateActor(actor.name.clone()));
            }
        }

        Ok(Problem {
            actors: self.actors,
            max_time: self.max_time,
        })
    }
}

fn validate_budget(max_time: f64) -> Result<(), ProblemError> {
    if max_time.is_finite() && max_time >= 0.0 {
        Ok(())
    } else {
        Err(ProblemError::InvalidBudget(max_time))
    }
}

/// A validated, immutable problem instance
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    actors: Vec<Actor>,
    max_time: f64,
}

impl Problem {
    /// Build and validate an instance from `(name, duration)` pairs
    pub fn new<N: Into<String>>(
        roster: impl IntoIterator<Item = (N, f64)>,
        max_time: f64,
    ) -> Result<Self, ProblemError> {
        ProblemConfig {
            actors: roster
                .into_iter()
                .map(|(name, duration)| Actor::new(name, duration))
                .collect(),
            max_time,
        }
        .validate()
    }

    /// Same roster under a different budget
    pub fn with_max_time(mut self, max_time: f64) -> Result<Self, ProblemError> {
        validate_budget(max_time)?;
        self.max_time = max_time;
        Ok(self)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn duration(&self, id: ActorId) -> f64 {
        self.actors[id.index()].duration
    }

    pub fn name(&self, id: ActorId) -> &str {
        &self.actors[id.index()].name
    }

    /// Every actor in the roster
    pub fn everyone(&self) -> ActorSet {
        ActorSet::full(self.actors.len())
    }

    /// Names of the actors in `set`, in roster order
    pub fn names(&self, set: ActorSet) -> Vec<String> {
        set.iter().map(|id| self.name(id).to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_valid() {
        let problem = ProblemConfig::sample().validate().unwrap();
        assert_eq!(problem.len(), 4);
        assert_eq!(problem.max_time(), 17.0);
        assert_eq!(problem.name(ActorId(3)), "Scientist");
        assert_eq!(problem.duration(ActorId(2)), 5.0);
        assert_eq!(problem.everyone().len(), 4);
    }

    #[test]
    fn test_from_json_defaults_budget() {
        let config = ProblemConfig::from_json(
            r#"{"actors": [{"name": "A", "duration": 1}, {"name": "B", "duration": 3}]}"#,
        )
        .unwrap();
        assert_eq!(config.max_time, DEFAULT_MAX_TIME);

        let problem = config.validate().unwrap();
        assert_eq!(problem.duration(ActorId(1)), 3.0);
    }

    #[test]
    fn test_from_json_reads_budget() {
        let config = ProblemConfig::from_json(
            r#"{"actors": [{"name": "A", "duration": 2.5}], "maxTime": 4}"#,
        )
        .unwrap();
        assert_eq!(config.max_time, 4.0);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = ProblemConfig::from_json(r#"{"actors": 3}"#).unwrap_err();
        assert!(matches!(err, ProblemError::Json(_)));
    }

    #[test]
    fn test_empty_roster_rejected() {
        let err = Problem::new(Vec::<(&str, f64)>::new(), 10.0).unwrap_err();
        assert!(matches!(err, ProblemError::EmptyRoster));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = Problem::new([("A", 1.0), ("B", -2.0)], 10.0).unwrap_err();
        match err {
            ProblemError::InvalidDuration { name, duration } => {
                assert_eq!(name, "B");
                assert_eq!(duration, -2.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nan_duration_rejected() {
        let err = Problem::new([("A", f64::NAN)], 10.0).unwrap_err();
        assert!(matches!(err, ProblemError::InvalidDuration { .. }));
    }

    #[test]
    fn test_duplicate_actor_rejected() {
        let err = Problem::new([("A", 1.0), ("A", 2.0)], 10.0).unwrap_err();
        assert!(matches!(err, ProblemError::DuplicateActor(name) if name == "A"));
    }

    #[test]
    fn test_bad_budget_rejected() {
        assert!(matches!(
            Problem::new([("A", 1.0)], -1.0),
            Err(ProblemError::InvalidBudget(_))
        ));
        let problem = Problem::new([("A", 1.0)], 1.0).unwrap();
        assert!(problem.with_max_time(f64::INFINITY).is_err());
    }

    #[test]
    fn test_too_many_actors_rejected() {
        let roster: Vec<(String, f64)> = (0..=MAX_ACTORS).map(|i| (format!("p{i}"), 1.0)).collect();
        let err = Problem::new(roster, 10.0).unwrap_err();
        assert!(matches!(err, ProblemError::TooManyActors { count: 65, max: 64 }));
    }

    #[test]
    fn test_with_max_time_keeps_roster() {
        let problem = ProblemConfig::sample().validate().unwrap();
        let tighter = problem.clone().with_max_time(16.0).unwrap();
        assert_eq!(tighter.max_time(), 16.0);
        assert_eq!(tighter.actors(), problem.actors());
    }
}
