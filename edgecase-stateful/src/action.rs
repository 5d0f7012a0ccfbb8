//! Actions and the generator that draws them during a run.

use std::fmt::Debug;

use edgecase::{Arbitrary, RandomGenerator, RandomSource, Shrinkable, shrinkable_list};

/// How many draws are retried when preconditions keep rejecting
pub const MAX_PRECONDITION_ATTEMPTS: usize = 100;

/// A single state transition applied to a model
pub trait Action<M>: Debug + Clone {
    /// Apply this action, turning the current model into the next one.
    ///
    /// A returned error fails the whole sequence and carries this message.
    fn run(&self, model: M) -> Result<M, String>;

    /// Whether this action makes sense in the current model state
    fn precondition(&self, _model: &M) -> bool {
        true
    }

    /// A human-readable label for failure reports
    fn description(&self) -> String {
        format!("{:?}", self)
    }
}

/// Draws actions for a running sequence from an arbitrary.
///
/// Drawn shrinkables are kept so a failing sequence can be handed to the
/// shrinking machinery as one collection.
pub struct ActionGenerator<A> {
    generator: RandomGenerator<A>,
    source: RandomSource,
    drawn: Vec<Shrinkable<A>>,
}

impl<A: Clone + 'static> ActionGenerator<A> {
    /// Create a generator drawing from the given action arbitrary
    pub fn new(actions: &Arbitrary<A>, gen_size: u32, source: RandomSource) -> Self {
        Self {
            generator: actions.generator(gen_size),
            source,
            drawn: Vec::new(),
        }
    }

    /// Draw the next action whose precondition accepts the model.
    ///
    /// Returns `None` when the underlying generator is exhausted or no
    /// acceptable action turns up within [`MAX_PRECONDITION_ATTEMPTS`].
    pub fn next_action<M>(&mut self, model: &M) -> Option<A>
    where
        A: Action<M>,
    {
        for _ in 0..MAX_PRECONDITION_ATTEMPTS {
            let candidate = match self.generator.next(&mut self.source) {
                Ok(candidate) => candidate,
                Err(_) => return None,
            };
            if candidate.value().precondition(model) {
                let action = candidate.value().clone();
                self.drawn.push(candidate);
                return Some(action);
            }
        }
        None
    }

    /// The actions drawn so far, as one shrinkable collection.
    ///
    /// Minimisation walks the usual container order: dropping actions first,
    /// then shrinking individual actions. A sequence never shrinks below one
    /// action.
    pub fn shrinkable_actions(&self) -> Shrinkable<Vec<A>> {
        shrinkable_list(self.drawn.clone(), 1)
    }
}
