//! The value-minimisation loop.

use crate::shrinkable::Shrinkable;

/// Outcome of a minimisation run
#[derive(Debug, Clone)]
pub struct ShrinkResult<T> {
    /// The failing value the search started from
    pub original: T,
    /// The locally minimal value that still fails
    pub minimal: T,
    /// How many descents were taken
    pub steps: usize,
}

/// Walks a failing shrinkable's tree down to a locally minimal failing
/// value.
///
/// At every node the first candidate that still fails is taken; ties are
/// broken by candidate order, not by any metric. The well-founded order of
/// shrink trees guarantees termination, and the step cap bounds pathological
/// trees on top of that.
pub struct Shrinker {
    max_steps: usize,
}

impl Shrinker {
    /// A shrinker with the default step cap
    pub fn new() -> Self {
        crate::env_logger_init();
        Self { max_steps: 1000 }
    }

    /// A shrinker taking at most `max_steps` descents
    pub fn with_max_steps(max_steps: usize) -> Self {
        crate::env_logger_init();
        Self { max_steps }
    }

    /// Minimise a failing value.
    ///
    /// `still_fails` is the falsified predicate, phrased positively: it
    /// returns `true` when its argument keeps failing the property. The
    /// result's `minimal` value fails, and none of its candidates do.
    pub fn minimize<T: Clone + 'static>(
        &self,
        failing: &Shrinkable<T>,
        still_fails: impl Fn(&T) -> bool,
    ) -> ShrinkResult<T> {
        let original = failing.value().clone();
        let mut current = failing.clone();
        let mut steps = 0;
        while steps < self.max_steps {
            let smaller = current
                .shrinks()
                .into_iter()
                .find(|candidate| still_fails(candidate.value()));
            match smaller {
                Some(next) => {
                    steps += 1;
                    debug!("shrink step {}: found a smaller failing value", steps);
                    current = next;
                }
                None => break,
            }
        }
        info!("shrinking finished after {} steps", steps);
        ShrinkResult {
            original,
            minimal: current.into_value(),
            steps,
        }
    }
}

impl Default for Shrinker {
    fn default() -> Self {
        Self::new()
    }
}
