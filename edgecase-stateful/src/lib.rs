//! # Edgecase Stateful
//!
//! Stateful testing on top of the edgecase generators: generate sequences of
//! actions, run them against a model, and check invariants after every step.
//! Failing sequences minimise through the same shrinking machinery the value
//! generators use.
//!
//! ## Quick Example
//!
//! ```rust
//! use edgecase::{RandomSource, of};
//! use edgecase_stateful::prelude::*;
//!
//! #[derive(Debug, Clone)]
//! enum CounterAction {
//!     Increment,
//!     Reset,
//! }
//!
//! impl Action<i32> for CounterAction {
//!     fn run(&self, model: i32) -> Result<i32, String> {
//!         match self {
//!             CounterAction::Increment => Ok(model + 1),
//!             CounterAction::Reset => Ok(0),
//!         }
//!     }
//! }
//!
//! let actions = of(vec![CounterAction::Increment, CounterAction::Reset]);
//! let mut sequence = ActionSequence::new(&actions, 10, 100, RandomSource::new(42))
//!     .with_invariant("non_negative", |model: &i32| *model >= 0);
//!
//! let final_model = sequence.run(0).unwrap();
//! assert!(final_model >= 0);
//! assert_eq!(sequence.run_state(), RunState::Succeeded);
//! ```

pub mod action;
pub mod invariant;
pub mod sequence;

/// Re-exports for convenient imports
pub mod prelude {
    pub use crate::action::*;
    pub use crate::invariant::*;
    pub use crate::sequence::*;
}

pub use action::{Action, ActionGenerator, MAX_PRECONDITION_ATTEMPTS};
pub use invariant::Invariant;
pub use sequence::{ActionSequence, RunState, SequenceError};
