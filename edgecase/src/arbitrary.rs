//! The declarative value-space description and its combinators.

use std::hash::Hash;
use std::rc::Rc;

use crate::container::{ArrayArbitrary, IteratorArbitrary, ListArbitrary, SetArbitrary};
use crate::error::{GenResult, GenerateError};
use crate::exhaustive::ExhaustiveGenerator;
use crate::generator::RandomGenerator;
use crate::shrinkable::Shrinkable;

/// Probability of the absent value in [`Arbitrary::optional`]
pub const ABSENT_PROBABILITY: f64 = 0.05;

/// A declarative description of a value space.
///
/// An arbitrary is immutable after construction and cheap to clone; every
/// combinator returns a new instance. It produces a [`RandomGenerator`] on
/// demand (always) and an [`ExhaustiveGenerator`] when the space is finite
/// and enumerable.
pub struct Arbitrary<T> {
    random: Rc<dyn Fn(u32) -> RandomGenerator<T>>,
    exhaustive: Rc<dyn Fn() -> Option<ExhaustiveGenerator<T>>>,
}

impl<T: Clone + 'static> Arbitrary<T> {
    /// Build an arbitrary from generator factories.
    ///
    /// `gen_size` is a generation hint, typically the configured number of
    /// tries; arbitraries use it to scale practical magnitudes and sizes.
    pub fn from_parts(
        random: impl Fn(u32) -> RandomGenerator<T> + 'static,
        exhaustive: impl Fn() -> Option<ExhaustiveGenerator<T>> + 'static,
    ) -> Self {
        Self {
            random: Rc::new(random),
            exhaustive: Rc::new(exhaustive),
        }
    }

    /// Build an arbitrary that can only be sampled, never enumerated
    pub fn random_only(random: impl Fn(u32) -> RandomGenerator<T> + 'static) -> Self {
        Self::from_parts(random, || None)
    }

    /// The random generator for this value space
    pub fn generator(&self, gen_size: u32) -> RandomGenerator<T> {
        (self.random)(gen_size)
    }

    /// The exhaustive generator, if the space is finite and enumerable
    pub fn exhaustive(&self) -> GenResult<ExhaustiveGenerator<T>> {
        (self.exhaustive)().ok_or(GenerateError::ExhaustiveNotAvailable)
    }

    pub(crate) fn exhaustive_opt(&self) -> Option<ExhaustiveGenerator<T>> {
        (self.exhaustive)()
    }

    /// Map the value space; sizes are preserved
    pub fn map<U: Clone + 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Arbitrary<U> {
        let f = Rc::new(f);
        let random = self.random.clone();
        let exhaustive = self.exhaustive.clone();
        let f_random = f.clone();
        Arbitrary {
            random: Rc::new(move |gen_size| {
                let f = f_random.clone();
                random(gen_size).map(move |value| f(value))
            }),
            exhaustive: Rc::new(move || {
                let f = f.clone();
                exhaustive().map(|generator| generator.map(move |value| f(value)))
            }),
        }
    }

    /// Restrict the value space to values satisfying the predicate
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Arbitrary<T> {
        let predicate = Rc::new(predicate);
        let random = self.random.clone();
        let exhaustive = self.exhaustive.clone();
        let predicate_random = predicate.clone();
        Arbitrary {
            random: Rc::new(move |gen_size| {
                let predicate = predicate_random.clone();
                random(gen_size).filter(move |value| predicate(value))
            }),
            exhaustive: Rc::new(move || {
                let predicate = predicate.clone();
                exhaustive().map(|generator| generator.filter(move |value| predicate(value)))
            }),
        }
    }

    /// Substitute a dependent value space for every value
    pub fn flat_map<U: Clone + 'static>(
        &self,
        f: impl Fn(&T) -> Arbitrary<U> + 'static,
    ) -> Arbitrary<U> {
        let f: Rc<dyn Fn(&T) -> Arbitrary<U>> = Rc::new(f);
        let random = self.random.clone();
        let exhaustive = self.exhaustive.clone();
        let f_random = f.clone();
        Arbitrary {
            random: Rc::new(move |gen_size| {
                let f = f_random.clone();
                random(gen_size).flat_map(move |value| f(value), gen_size)
            }),
            exhaustive: Rc::new(move || {
                let f = f.clone();
                exhaustive()
                    .and_then(|outer| outer.flat_map(move |value| f(value).exhaustive_opt()))
            }),
        }
    }

    /// Mix in the absent value with the given probability.
    ///
    /// `None` is an unshrinkable corner case: present values never shrink
    /// toward it. See [`Arbitrary::optional`] for the opposite choice.
    pub fn inject_none(&self, probability: f64) -> Arbitrary<Option<T>> {
        let random = self.random.clone();
        let exhaustive = self.exhaustive.clone();
        Arbitrary {
            random: Rc::new(move |gen_size| random(gen_size).inject_none(probability)),
            exhaustive: Rc::new(move || exhaustive().map(|generator| generator.inject_none())),
        }
    }

    /// The optional value space: absent 5% of the time, and present values
    /// shrink toward absence first.
    pub fn optional(&self) -> Arbitrary<Option<T>> {
        let random = self.random.clone();
        let exhaustive = self.exhaustive.clone();
        Arbitrary {
            random: Rc::new(move |gen_size| {
                let base = random(gen_size);
                RandomGenerator::new(move |source| {
                    if source.next_bool(ABSENT_PROBABILITY) {
                        Ok(Shrinkable::unshrinkable(None))
                    } else {
                        Ok(toward_absence(base.next(source)?))
                    }
                })
            }),
            exhaustive: Rc::new(move || exhaustive().map(|generator| generator.inject_none())),
        }
    }

    /// Never produce the same value twice from one generator instance
    pub fn unique(&self) -> Arbitrary<T>
    where
        T: Eq + Hash,
    {
        let random = self.random.clone();
        let exhaustive = self.exhaustive.clone();
        Arbitrary {
            random: Rc::new(move |gen_size| random(gen_size).unique()),
            exhaustive: Rc::new(move || exhaustive()),
        }
    }

    /// The first draws return the given samples, in order
    pub fn with_samples(&self, samples: Vec<T>) -> Arbitrary<T> {
        let random = self.random.clone();
        let exhaustive = self.exhaustive.clone();
        let samples_random = samples.clone();
        Arbitrary {
            random: Rc::new(move |gen_size| {
                random(gen_size).with_samples(samples_random.clone())
            }),
            exhaustive: Rc::new(move || {
                let samples = samples.clone();
                exhaustive().map(|generator| generator.with_samples(samples))
            }),
        }
    }

    /// Ignore the driver's gen size hint and always use the given one
    pub fn fix_gen_size(&self, gen_size: u32) -> Arbitrary<T> {
        let random = self.random.clone();
        let exhaustive = self.exhaustive.clone();
        Arbitrary {
            random: Rc::new(move |_| random(gen_size)),
            exhaustive: Rc::new(move || exhaustive()),
        }
    }

    /// Lists of this value space
    pub fn list(&self) -> ListArbitrary<T> {
        ListArbitrary::new(self.clone())
    }

    /// Sets of this value space
    pub fn set(&self) -> SetArbitrary<T>
    where
        T: Eq + Hash,
    {
        SetArbitrary::new(self.clone())
    }

    /// Boxed slices of this value space
    pub fn array(&self) -> ArrayArbitrary<T> {
        ArrayArbitrary::new(self.clone())
    }

    /// Owned iterators over drawn values of this value space
    pub fn iterator(&self) -> IteratorArbitrary<T> {
        IteratorArbitrary::new(self.clone())
    }
}

impl<T> Clone for Arbitrary<T> {
    fn clone(&self) -> Self {
        Self {
            random: self.random.clone(),
            exhaustive: self.exhaustive.clone(),
        }
    }
}

/// Wrap a present shrinkable so that `None` is its first shrink candidate.
fn toward_absence<T: Clone + 'static>(present: Shrinkable<T>) -> Shrinkable<Option<T>> {
    let value = Some(present.value().clone());
    Shrinkable::new(value, move || {
        let mut candidates = vec![Shrinkable::unshrinkable(None)];
        candidates.extend(present.shrinks().into_iter().map(toward_absence));
        candidates
    })
}
