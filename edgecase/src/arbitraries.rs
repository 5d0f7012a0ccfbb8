//! Factory functions for the built-in arbitraries.
//!
//! Numeric, container, and string builders live in their own modules
//! ([`crate::numeric`], [`crate::container`], [`crate::string`]); this module
//! covers choices, samples, constants, weighted selection, permutations, and
//! the structural combinators `lazy` and `recursive`.

use std::cell::Cell;
use std::rc::Rc;

use crate::arbitrary::Arbitrary;
use crate::exhaustive::ExhaustiveGenerator;
use crate::generator::RandomGenerator;
use crate::rng::RandomSource;
use crate::shrinkable::Shrinkable;

/// Uniform choice over the given values; exhaustive.
///
/// Values listed earlier are considered smaller: a drawn value shrinks
/// toward the front of the list.
///
/// # Panics
///
/// Panics when `values` is empty.
pub fn of<T: Clone + 'static>(values: Vec<T>) -> Arbitrary<T> {
    assert!(!values.is_empty(), "of requires at least one value");
    let values = Rc::new(values);
    let values_random = values.clone();
    Arbitrary::from_parts(
        move |_gen_size| {
            let values = values_random.clone();
            RandomGenerator::new(move |source| {
                let index = source.next_below(values.len() as u64) as usize;
                Ok(indexed_shrinkable(values.clone(), index))
            })
        },
        move || Some(ExhaustiveGenerator::from_values((*values).clone())),
    )
}

/// Deterministic round-robin over the given values, cycling forever in
/// insertion order. Not random, and not exhaustive; values do not shrink.
///
/// The cursor belongs to the generator instance, so every call to
/// [`Arbitrary::generator`] restarts the cycle.
///
/// # Panics
///
/// Panics when `values` is empty.
pub fn samples<T: Clone + 'static>(values: Vec<T>) -> Arbitrary<T> {
    assert!(!values.is_empty(), "samples requires at least one value");
    let values = Rc::new(values);
    Arbitrary::random_only(move |_gen_size| {
        let values = values.clone();
        let cursor = Cell::new(0usize);
        RandomGenerator::new(move |_source| {
            let at = cursor.get();
            cursor.set((at + 1) % values.len());
            Ok(Shrinkable::unshrinkable(values[at].clone()))
        })
    })
}

/// Fresh independent random sources, split off the draw source
pub fn randoms() -> Arbitrary<RandomSource> {
    Arbitrary::random_only(|_gen_size| {
        RandomGenerator::new(|source| Ok(Shrinkable::unshrinkable(source.split())))
    })
}

/// The single given value; unshrinkable, exhaustive
pub fn constant<T: Clone + 'static>(value: T) -> Arbitrary<T> {
    let value_random = value.clone();
    Arbitrary::from_parts(
        move |_gen_size| {
            let value = value_random.clone();
            RandomGenerator::new(move |_source| Ok(Shrinkable::unshrinkable(value.clone())))
        },
        move || Some(ExhaustiveGenerator::from_values(vec![value.clone()])),
    )
}

/// A value built by the supplier on every draw; unshrinkable
pub fn create<T: Clone + 'static>(supplier: impl Fn() -> T + 'static) -> Arbitrary<T> {
    let supplier = Rc::new(supplier);
    Arbitrary::random_only(move |_gen_size| {
        let supplier = supplier.clone();
        RandomGenerator::new(move |_source| Ok(Shrinkable::unshrinkable(supplier())))
    })
}

/// Escape hatch: draw plain values straight from the source; unshrinkable
pub fn random_value<T: Clone + 'static>(
    f: impl Fn(&mut RandomSource) -> T + 'static,
) -> Arbitrary<T> {
    let f = Rc::new(f);
    Arbitrary::random_only(move |_gen_size| {
        let f = f.clone();
        RandomGenerator::new(move |source| Ok(Shrinkable::unshrinkable(f(source))))
    })
}

/// Escape hatch: draw fully custom shrinkables straight from the source
pub fn from_generator<T: Clone + 'static>(
    f: impl Fn(&mut RandomSource) -> Shrinkable<T> + 'static,
) -> Arbitrary<T> {
    let f = Rc::new(f);
    Arbitrary::random_only(move |_gen_size| {
        let f = f.clone();
        RandomGenerator::new(move |source| Ok(f(source)))
    })
}

/// Uniform choice among the supplied arbitraries.
///
/// Drawn values shrink first toward re-draws from earlier-listed
/// arbitraries, then through their own shrink tree. Exhaustive when every
/// choice is.
///
/// # Panics
///
/// Panics when `choices` is empty.
pub fn one_of<T: Clone + 'static>(choices: Vec<Arbitrary<T>>) -> Arbitrary<T> {
    assert!(!choices.is_empty(), "one_of requires at least one arbitrary");
    frequency_of(choices.into_iter().map(|choice| (1, choice)).collect())
}

/// Weighted choice of values: weight w is chosen with probability w/Σw.
/// Zero-weight entries are never drawn. Exhaustive over the drawable values.
///
/// # Panics
///
/// Panics when no entry has a positive weight.
pub fn frequency<T: Clone + 'static>(entries: Vec<(u32, T)>) -> Arbitrary<T> {
    let drawable: Vec<(u32, T)> = entries.into_iter().filter(|(w, _)| *w > 0).collect();
    assert!(
        !drawable.is_empty(),
        "frequency requires at least one positive weight"
    );
    let values: Rc<Vec<T>> = Rc::new(drawable.iter().map(|(_, v)| v.clone()).collect());
    let weights: Vec<u32> = drawable.iter().map(|(w, _)| *w).collect();
    let values_random = values.clone();
    Arbitrary::from_parts(
        move |_gen_size| {
            let values = values_random.clone();
            let weights = weights.clone();
            RandomGenerator::new(move |source| {
                let index = pick_weighted(&weights, source);
                Ok(indexed_shrinkable(values.clone(), index))
            })
        },
        move || Some(ExhaustiveGenerator::from_values((*values).clone())),
    )
}

/// Weighted choice among arbitraries, then a draw from the chosen one.
///
/// # Panics
///
/// Panics when no entry has a positive weight.
pub fn frequency_of<T: Clone + 'static>(entries: Vec<(u32, Arbitrary<T>)>) -> Arbitrary<T> {
    let drawable: Vec<(u32, Arbitrary<T>)> =
        entries.into_iter().filter(|(w, _)| *w > 0).collect();
    assert!(
        !drawable.is_empty(),
        "frequency requires at least one positive weight"
    );
    let choices: Rc<Vec<Arbitrary<T>>> =
        Rc::new(drawable.iter().map(|(_, choice)| choice.clone()).collect());
    let weights: Vec<u32> = drawable.iter().map(|(w, _)| *w).collect();
    let choices_random = choices.clone();
    Arbitrary::from_parts(
        move |gen_size| {
            let choices = choices_random.clone();
            let weights = weights.clone();
            // One generator per choice, so per-instance state (edge-case
            // prefixes, unique memory) advances across draws.
            let generators: Vec<RandomGenerator<T>> = choices
                .iter()
                .map(|choice| choice.generator(gen_size))
                .collect();
            RandomGenerator::new(move |source| {
                let index = pick_weighted(&weights, source);
                let seed = source.next_u64();
                let drawn = generators[index].next(source)?;
                Ok(chosen_shrinkable(choices.clone(), index, gen_size, seed, drawn))
            })
        },
        move || {
            let mut total: u64 = 0;
            let mut generators = Vec::new();
            for choice in choices.iter() {
                let generator = choice.exhaustive_opt()?;
                total = total.checked_add(generator.max_count())?;
                generators.push(generator);
            }
            Some(ExhaustiveGenerator::new(total, move || {
                Box::new(
                    generators
                        .clone()
                        .into_iter()
                        .flat_map(|generator| generator.iter()),
                )
            }))
        },
    )
}

/// Random permutations of the given values; every one of the n! orders is
/// reachable. Permutations shrink toward the original insertion order.
pub fn shuffle<T: Clone + PartialEq + 'static>(values: Vec<T>) -> Arbitrary<Vec<T>> {
    let original = Rc::new(values);
    Arbitrary::random_only(move |_gen_size| {
        let original = original.clone();
        RandomGenerator::new(move |source| {
            let mut permuted = (*original).clone();
            // Fisher-Yates
            for i in (1..permuted.len()).rev() {
                let j = source.next_below(i as u64 + 1) as usize;
                permuted.swap(i, j);
            }
            Ok(shuffle_shrinkable(original.clone(), permuted))
        })
    })
}

/// Defer construction of an arbitrary, breaking definition cycles.
///
/// The supplier runs again on every [`Arbitrary::generator`] call, so state
/// inside the supplied arbitrary (a `samples` round-robin, say) restarts.
pub fn lazy<T: Clone + 'static>(supplier: impl Fn() -> Arbitrary<T> + 'static) -> Arbitrary<T> {
    let supplier = Rc::new(supplier);
    let supplier_random = supplier.clone();
    Arbitrary::from_parts(
        move |gen_size| supplier_random().generator(gen_size),
        move || supplier().exhaustive_opt(),
    )
}

/// Apply `step` to `base` exactly `depth` times
pub fn recursive<T: Clone + 'static>(
    base: Arbitrary<T>,
    step: impl Fn(Arbitrary<T>) -> Arbitrary<T>,
    depth: u32,
) -> Arbitrary<T> {
    let mut current = base;
    for _ in 0..depth {
        current = step(current);
    }
    current
}

/// Value at `index`, shrinking toward earlier indices (front first)
fn indexed_shrinkable<T: Clone + 'static>(values: Rc<Vec<T>>, index: usize) -> Shrinkable<T> {
    let value = values[index].clone();
    Shrinkable::new(value, move || {
        (0..index)
            .map(|earlier| indexed_shrinkable(values.clone(), earlier))
            .collect()
    })
}

/// Weighted index selection; weights are all positive
fn pick_weighted(weights: &[u32], source: &mut RandomSource) -> usize {
    let total: u64 = weights.iter().map(|w| u64::from(*w)).sum();
    let mut roll = source.next_below(total);
    for (index, weight) in weights.iter().enumerate() {
        let weight = u64::from(*weight);
        if roll < weight {
            return index;
        }
        roll -= weight;
    }
    weights.len() - 1
}

/// A permutation shrinking toward the original order: the original itself
/// first, then the permutation with the first out-of-place position fixed
fn shuffle_shrinkable<T: Clone + PartialEq + 'static>(
    original: Rc<Vec<T>>,
    current: Vec<T>,
) -> Shrinkable<Vec<T>> {
    let value = current.clone();
    Shrinkable::new(value, move || {
        if current == *original {
            return Vec::new();
        }
        let mut candidates = vec![shuffle_shrinkable(original.clone(), (*original).clone())];
        if let Some(at) = (0..current.len()).find(|&i| current[i] != original[i]) {
            if let Some(from) = (at + 1..current.len()).find(|&j| current[j] == original[at]) {
                let mut repaired = current.clone();
                repaired.swap(at, from);
                if repaired != *original {
                    candidates.push(shuffle_shrinkable(original.clone(), repaired));
                }
            }
        }
        candidates
    })
}

/// A draw from choice `index`, shrinking first toward re-draws from earlier
/// choices (replayed on the recorded seed), then through its own tree
fn chosen_shrinkable<T: Clone + 'static>(
    choices: Rc<Vec<Arbitrary<T>>>,
    index: usize,
    gen_size: u32,
    seed: u64,
    drawn: Shrinkable<T>,
) -> Shrinkable<T> {
    let value = drawn.value().clone();
    Shrinkable::new(value, move || {
        let mut candidates = Vec::new();
        for earlier in 0..index {
            let mut replay = RandomSource::new(seed);
            if let Ok(candidate) = choices[earlier].generator(gen_size).next(&mut replay) {
                candidates.push(candidate);
            }
        }
        candidates.extend(drawn.shrinks());
        candidates
    })
}
