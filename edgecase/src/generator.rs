//! Random generators: draw functions producing shrinkables from a source.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use crate::arbitrary::Arbitrary;
use crate::error::{GenResult, GenerateError};
use crate::rng::RandomSource;
use crate::shrinkable::Shrinkable;

/// How often a filtered generator retries before giving up on a draw
pub const MAX_FILTER_MISSES: usize = 10_000;

/// How often a unique generator re-draws after collisions before giving up
pub const MAX_UNIQUE_MISSES: usize = 10_000;

/// A draw function from [`RandomSource`] to [`Shrinkable`] values.
///
/// Generators are cheap to clone and stateless with respect to the produced
/// type except through the source; the transformers below each wrap the base
/// generator and return a new one.
pub struct RandomGenerator<T> {
    draw: Rc<dyn Fn(&mut RandomSource) -> GenResult<Shrinkable<T>>>,
}

impl<T: Clone + 'static> RandomGenerator<T> {
    /// Create a generator from a draw function
    pub fn new(draw: impl Fn(&mut RandomSource) -> GenResult<Shrinkable<T>> + 'static) -> Self {
        Self { draw: Rc::new(draw) }
    }

    /// Draw the next shrinkable value
    pub fn next(&self, source: &mut RandomSource) -> GenResult<Shrinkable<T>> {
        (self.draw)(source)
    }

    /// An infinite stream of draws from the given source
    pub fn stream(&self, source: RandomSource) -> GeneratorStream<T> {
        GeneratorStream {
            generator: self.clone(),
            source,
        }
    }

    /// Map every drawn value (and its whole shrink tree)
    pub fn map<U: Clone + 'static>(&self, f: impl Fn(&T) -> U + 'static) -> RandomGenerator<U> {
        let base = self.clone();
        let f = Rc::new(f);
        RandomGenerator::new(move |source| {
            let f = f.clone();
            Ok(base.next(source)?.map(move |value| f(value)))
        })
    }

    /// Re-draw until the predicate holds, up to [`MAX_FILTER_MISSES`] times
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> RandomGenerator<T> {
        let base = self.clone();
        let predicate = Rc::new(predicate);
        RandomGenerator::new(move |source| {
            for _ in 0..MAX_FILTER_MISSES {
                let candidate = base.next(source)?;
                let predicate = predicate.clone();
                if let Some(kept) = candidate.filter(move |value| predicate(value)) {
                    return Ok(kept);
                }
            }
            Err(GenerateError::too_many_filter_misses(MAX_FILTER_MISSES))
        })
    }

    /// Draw a value, then draw from the arbitrary it selects.
    ///
    /// The seed of the dependent draw is recorded so that shrinking the
    /// outer value can re-run the dependent draw deterministically: the
    /// result's shrink tree contains both re-flat-mapped outer shrinks and
    /// direct shrinks of the inner value.
    pub fn flat_map<U: Clone + 'static>(
        &self,
        f: impl Fn(&T) -> Arbitrary<U> + 'static,
        gen_size: u32,
    ) -> RandomGenerator<U> {
        let base = self.clone();
        let f: Rc<dyn Fn(&T) -> Arbitrary<U>> = Rc::new(f);
        RandomGenerator::new(move |source| {
            let outer = base.next(source)?;
            let seed = source.next_u64();
            flat_mapped(outer, f.clone(), gen_size, seed)
        })
    }

    /// With the given probability produce `None`, otherwise delegate.
    ///
    /// The absent value does not shrink, and a present value never shrinks
    /// to `None`: absence is a corner case here, not the shrink target. Use
    /// [`Arbitrary::optional`] for the toward-absence semantic.
    pub fn inject_none(&self, probability: f64) -> RandomGenerator<Option<T>> {
        let base = self.clone();
        RandomGenerator::new(move |source| {
            if source.next_bool(probability) {
                Ok(Shrinkable::unshrinkable(None))
            } else {
                Ok(base.next(source)?.map(|value| Some(value.clone())))
            }
        })
    }

    /// Remember produced values and re-draw on collision.
    ///
    /// The memory belongs to the returned generator instance. After
    /// [`MAX_UNIQUE_MISSES`] consecutive collisions a draw fails.
    pub fn unique(&self) -> RandomGenerator<T>
    where
        T: Eq + Hash,
    {
        let base = self.clone();
        let seen: Rc<RefCell<HashSet<T>>> = Rc::new(RefCell::new(HashSet::new()));
        RandomGenerator::new(move |source| {
            for _ in 0..MAX_UNIQUE_MISSES {
                let candidate = base.next(source)?;
                if seen.borrow_mut().insert(candidate.value().clone()) {
                    return Ok(candidate);
                }
            }
            Err(GenerateError::too_many_unique_misses(MAX_UNIQUE_MISSES))
        })
    }

    /// The first draws return the samples in order, as unshrinkable values
    pub fn with_samples(&self, samples: Vec<T>) -> RandomGenerator<T> {
        self.with_prefix(samples.into_iter().map(Shrinkable::unshrinkable).collect())
    }

    /// Prepend already-built shrinkables to the draw sequence.
    ///
    /// The numeric arbitraries use this to emit their edge cases, which keep
    /// real shrink trees, before random draws start.
    pub(crate) fn with_prefix(&self, prefix: Vec<Shrinkable<T>>) -> RandomGenerator<T> {
        let base = self.clone();
        let cursor = Cell::new(0usize);
        RandomGenerator::new(move |source| {
            let at = cursor.get();
            if at < prefix.len() {
                cursor.set(at + 1);
                Ok(prefix[at].clone())
            } else {
                base.next(source)
            }
        })
    }
}

impl<T> Clone for RandomGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            draw: self.draw.clone(),
        }
    }
}

fn flat_mapped<T, U>(
    outer: Shrinkable<T>,
    f: Rc<dyn Fn(&T) -> Arbitrary<U>>,
    gen_size: u32,
    seed: u64,
) -> GenResult<Shrinkable<U>>
where
    T: Clone + 'static,
    U: Clone + 'static,
{
    let mut dependent = RandomSource::new(seed);
    let inner = f(outer.value()).generator(gen_size).next(&mut dependent)?;
    Ok(flat_mapped_shrinkable(outer, inner, f, gen_size, seed))
}

fn flat_mapped_shrinkable<T, U>(
    outer: Shrinkable<T>,
    inner: Shrinkable<U>,
    f: Rc<dyn Fn(&T) -> Arbitrary<U>>,
    gen_size: u32,
    seed: u64,
) -> Shrinkable<U>
where
    T: Clone + 'static,
    U: Clone + 'static,
{
    let value = inner.value().clone();
    Shrinkable::new(value, move || {
        let mut candidates = Vec::new();
        // Shrink the outer value and replay the dependent draw.
        for smaller_outer in outer.shrinks() {
            if let Ok(replayed) = flat_mapped(smaller_outer, f.clone(), gen_size, seed) {
                candidates.push(replayed);
            }
        }
        // Shrink the inner value with the outer fixed.
        for smaller_inner in inner.shrinks() {
            candidates.push(flat_mapped_shrinkable(
                outer.clone(),
                smaller_inner,
                f.clone(),
                gen_size,
                seed,
            ));
        }
        candidates
    })
}

/// Infinite iterator over draws from one generator and one source
pub struct GeneratorStream<T> {
    generator: RandomGenerator<T>,
    source: RandomSource,
}

impl<T: Clone + 'static> Iterator for GeneratorStream<T> {
    type Item = GenResult<Shrinkable<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.next(&mut self.source))
    }
}
