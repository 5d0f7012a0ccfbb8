//! The action-sequence runner.

use std::fmt;
use std::fmt::Debug;

use edgecase::{Arbitrary, RandomSource};

use crate::action::{Action, ActionGenerator};
use crate::invariant::Invariant;

/// Where a sequence is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotRun,
    Running,
    Succeeded,
    Failed,
}

/// Failures of a sequence run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// The generator produced no actions at all
    EmptySequence,

    /// An invariant stopped holding after an action
    InvariantFailed { invariant: String, report: String },

    /// An action itself failed, with its original message preserved
    ActionFailed { action: String, message: String },
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceError::EmptySequence => {
                write!(f, "action sequence produced no actions")
            }
            SequenceError::InvariantFailed { invariant, report } => {
                write!(f, "invariant '{}' failed\n{}", invariant, report)
            }
            SequenceError::ActionFailed { action, message } => {
                write!(f, "action {} failed: {}", action, message)
            }
        }
    }
}

impl std::error::Error for SequenceError {}

/// A runner executing a generated sequence of actions against a model.
///
/// The sequence pulls up to its intended number of actions from the
/// generator, applies each to the current model, and evaluates every
/// registered invariant after each step. Once terminal, [`run`] replays the
/// stored outcome without executing anything again.
///
/// [`run`]: ActionSequence::run
pub struct ActionSequence<A, M> {
    intended_size: usize,
    generator: ActionGenerator<A>,
    actions: Vec<A>,
    invariants: Vec<Invariant<M>>,
    state: RunState,
    outcome: Option<Result<M, SequenceError>>,
}

impl<A, M> ActionSequence<A, M>
where
    A: Action<M> + 'static,
    M: Clone + Debug,
{
    /// Create a sequence of the intended size drawing from the given
    /// arbitrary.
    ///
    /// # Panics
    ///
    /// Panics when `intended_size` is zero.
    pub fn new(
        actions: &Arbitrary<A>,
        intended_size: usize,
        gen_size: u32,
        source: RandomSource,
    ) -> Self {
        assert!(intended_size >= 1, "intended size must be at least 1");
        Self {
            intended_size,
            generator: ActionGenerator::new(actions, gen_size, source),
            actions: Vec::new(),
            invariants: Vec::new(),
            state: RunState::NotRun,
            outcome: None,
        }
    }

    /// Register an invariant checked after every action
    pub fn with_invariant(
        mut self,
        name: impl Into<String>,
        check: impl Fn(&M) -> bool + 'static,
    ) -> Self {
        self.invariants.push(Invariant::new(name, check));
        self
    }

    /// Run the sequence against the initial model.
    ///
    /// Idempotent once terminal: later calls return the stored outcome.
    pub fn run(&mut self, initial: M) -> Result<M, SequenceError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        self.state = RunState::Running;
        let outcome = self.execute(initial);
        self.state = if outcome.is_ok() {
            RunState::Succeeded
        } else {
            RunState::Failed
        };
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn execute(&mut self, initial: M) -> Result<M, SequenceError> {
        let mut current = initial;
        for _ in 0..self.intended_size {
            let Some(action) = self.generator.next_action(&current) else {
                break;
            };
            self.actions.push(action.clone());
            current = match action.run(current) {
                Ok(next) => next,
                Err(message) => {
                    return Err(SequenceError::ActionFailed {
                        action: action.description(),
                        message,
                    });
                }
            };
            for invariant in &self.invariants {
                if !invariant.holds(&current) {
                    return Err(SequenceError::InvariantFailed {
                        invariant: invariant.name().to_string(),
                        report: self.compose_report(&current),
                    });
                }
            }
        }
        if self.actions.is_empty() {
            return Err(SequenceError::EmptySequence);
        }
        Ok(current)
    }

    /// Every action executed so far plus the final model, for reports
    fn compose_report(&self, model: &M) -> String {
        let mut report = String::from("actions:\n");
        for action in &self.actions {
            report.push_str(&format!("  {}\n", action.description()));
        }
        report.push_str(&format!("final model: {:?}", model));
        report
    }

    /// The actions executed by [`run`](ActionSequence::run)
    pub fn run_actions(&self) -> &[A] {
        &self.actions
    }

    /// The final model of a successful run
    pub fn final_model(&self) -> Option<&M> {
        match &self.outcome {
            Some(Ok(model)) => Some(model),
            _ => None,
        }
    }

    /// Where the sequence is in its lifecycle
    pub fn run_state(&self) -> RunState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgecase::{of, samples};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Clone)]
    enum CounterAction {
        Increment,
        Decrement,
        Reset,
        Explode,
    }

    impl Action<i32> for CounterAction {
        fn run(&self, model: i32) -> Result<i32, String> {
            match self {
                CounterAction::Increment => Ok(model + 1),
                CounterAction::Decrement => Ok(model - 1),
                CounterAction::Reset => Ok(0),
                CounterAction::Explode => Err("the counter exploded".to_string()),
            }
        }

        fn precondition(&self, model: &i32) -> bool {
            match self {
                CounterAction::Decrement => *model > 0,
                _ => true,
            }
        }
    }

    fn sequence_of(
        actions: Vec<CounterAction>,
        intended_size: usize,
        seed: u64,
    ) -> ActionSequence<CounterAction, i32> {
        ActionSequence::new(&of(actions), intended_size, 100, RandomSource::new(seed))
    }

    #[test]
    fn test_run_executes_the_intended_number_of_actions() {
        let mut sequence = sequence_of(vec![CounterAction::Increment], 5, 42);
        let final_model = sequence.run(0).unwrap();

        assert_eq!(final_model, 5);
        assert_eq!(sequence.run_actions().len(), 5);
        assert_eq!(sequence.run_state(), RunState::Succeeded);
        assert_eq!(sequence.final_model(), Some(&5));
    }

    #[test]
    fn test_preconditions_keep_the_model_valid() {
        let mut sequence = sequence_of(
            vec![CounterAction::Increment, CounterAction::Decrement],
            50,
            7,
        )
        .with_invariant("non_negative", |model: &i32| *model >= 0);
        let final_model = sequence.run(0).unwrap();
        assert!(final_model >= 0);
    }

    #[test]
    fn test_run_is_idempotent_once_terminal() {
        let mut sequence = sequence_of(vec![CounterAction::Increment], 3, 11);
        let first = sequence.run(0);
        let second = sequence.run(100);

        assert_eq!(first, second);
        assert_eq!(sequence.run_actions().len(), 3);
    }

    #[test]
    fn test_failed_runs_replay_their_outcome_too() {
        let mut sequence = sequence_of(vec![CounterAction::Explode], 3, 13);
        let first = sequence.run(0);
        let second = sequence.run(0);

        assert!(first.is_err());
        assert_eq!(first, second);
        assert_eq!(sequence.run_state(), RunState::Failed);
        assert_eq!(sequence.final_model(), None);
    }

    #[test]
    fn test_invariant_failure_reports_actions_and_model() {
        let mut sequence = sequence_of(vec![CounterAction::Increment], 5, 17)
            .with_invariant("small", |model: &i32| *model < 3);
        let error = sequence.run(0).unwrap_err();

        match &error {
            SequenceError::InvariantFailed { invariant, report } => {
                assert_eq!(invariant, "small");
                assert!(report.contains("Increment"));
                assert!(report.contains("final model: 3"));
            }
            other => panic!("expected invariant failure, got {:?}", other),
        }
        assert_eq!(sequence.run_state(), RunState::Failed);
    }

    #[test]
    fn test_action_failure_preserves_the_message() {
        let mut sequence = sequence_of(vec![CounterAction::Explode], 2, 19);
        let error = sequence.run(0).unwrap_err();

        match error {
            SequenceError::ActionFailed { action, message } => {
                assert_eq!(action, "Explode");
                assert_eq!(message, "the counter exploded");
            }
            other => panic!("expected action failure, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_actions_is_an_empty_sequence_error() {
        // Decrement's precondition rejects at zero, so nothing is drawn.
        let mut sequence = sequence_of(vec![CounterAction::Decrement], 5, 23);
        assert_eq!(sequence.run(0), Err(SequenceError::EmptySequence));
        assert_eq!(sequence.run_state(), RunState::Failed);
    }

    #[test]
    fn test_invariants_are_checked_after_every_action() {
        let checked = Rc::new(Cell::new(0usize));
        let counter = checked.clone();
        let mut sequence = sequence_of(vec![CounterAction::Increment], 4, 29)
            .with_invariant("count_checks", move |_model: &i32| {
                counter.set(counter.get() + 1);
                true
            });
        sequence.run(0).unwrap();
        assert_eq!(checked.get(), 4);
    }

    #[test]
    fn test_generator_drying_up_ends_the_sequence_early() {
        // Decrement rejects at zero: from 2 only two actions can be drawn,
        // then the run ends with fewer actions than intended.
        let mut sequence = sequence_of(vec![CounterAction::Decrement], 5, 31);
        let final_model = sequence.run(2).unwrap();

        assert_eq!(final_model, 0);
        assert_eq!(sequence.run_actions().len(), 2);
        assert_eq!(sequence.run_state(), RunState::Succeeded);
    }

    #[test]
    fn test_samples_drive_a_deterministic_sequence() {
        let actions = samples(vec![CounterAction::Increment, CounterAction::Reset]);
        let mut sequence: ActionSequence<CounterAction, i32> =
            ActionSequence::new(&actions, 3, 100, RandomSource::new(31));
        // Increment, Reset, Increment.
        assert_eq!(sequence.run(0).unwrap(), 1);
    }

    #[test]
    #[should_panic(expected = "intended size must be at least 1")]
    fn test_zero_intended_size_panics_at_construction() {
        sequence_of(vec![CounterAction::Increment], 0, 1);
    }

    #[test]
    fn test_not_run_before_first_run() {
        let sequence = sequence_of(vec![CounterAction::Increment], 1, 37);
        assert_eq!(sequence.run_state(), RunState::NotRun);
        assert!(sequence.run_actions().is_empty());
        assert_eq!(sequence.final_model(), None);
    }
}
