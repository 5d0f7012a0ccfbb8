//! Container arbitraries: lists, sets, arrays, and iterators with size
//! bounds.
//!
//! Size bounds are validated when the builder is configured. Generators draw
//! a size in `[min, max]`, but the empty collection (when the bounds allow
//! it) and a single-element instance appear among the first draws.
//!
//! Shrinking order: the empty collection first, then dropping one element at
//! a time, then shrinking elements in place. Shorter collections are always
//! smaller than longer ones; equal lengths compare elementwise.

use std::cell::Cell;
use std::collections::HashSet;
use std::hash::Hash;

use crate::arbitrary::Arbitrary;
use crate::error::{GenResult, GenerateError};
use crate::exhaustive::ExhaustiveGenerator;
use crate::generator::RandomGenerator;
use crate::shrinkable::Shrinkable;

/// Default upper size bound for containers
pub const DEFAULT_MAX_SIZE: usize = 100;

/// How many duplicate element draws a set tolerates before giving up
pub(crate) const MAX_SET_MISSES: usize = 10_000;

/// Build a collection shrinkable from element shrinkables.
///
/// This is the shared minimisation machinery for lists, sets, arrays,
/// strings, and action sequences.
pub fn shrinkable_list<T: Clone + 'static>(
    elements: Vec<Shrinkable<T>>,
    min_size: usize,
) -> Shrinkable<Vec<T>> {
    let value: Vec<T> = elements.iter().map(|element| element.value().clone()).collect();
    Shrinkable::new(value, move || {
        let mut candidates = Vec::new();
        if min_size == 0 && elements.len() > 1 {
            candidates.push(shrinkable_list(Vec::new(), min_size));
        }
        if elements.len() > min_size {
            for at in 0..elements.len() {
                let mut fewer = elements.clone();
                fewer.remove(at);
                candidates.push(shrinkable_list(fewer, min_size));
            }
        }
        for at in 0..elements.len() {
            for candidate in elements[at].shrinks() {
                let mut replaced = elements.clone();
                replaced[at] = candidate;
                candidates.push(shrinkable_list(replaced, min_size));
            }
        }
        candidates
    })
}

/// Lists of an element arbitrary with inclusive size bounds
pub struct ListArbitrary<T> {
    element: Arbitrary<T>,
    min_size: usize,
    max_size: usize,
}

impl<T: Clone + 'static> ListArbitrary<T> {
    pub(crate) fn new(element: Arbitrary<T>) -> Self {
        Self {
            element,
            min_size: 0,
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// Require at least `min_size` elements
    ///
    /// # Panics
    ///
    /// Panics when the bounds become inverted.
    pub fn of_min_size(mut self, min_size: usize) -> Self {
        assert!(min_size <= self.max_size, "min size must not exceed max size");
        self.min_size = min_size;
        self
    }

    /// Allow at most `max_size` elements
    ///
    /// # Panics
    ///
    /// Panics when the bounds become inverted.
    pub fn of_max_size(mut self, max_size: usize) -> Self {
        assert!(self.min_size <= max_size, "min size must not exceed max size");
        self.max_size = max_size;
        self
    }

    /// Require exactly `size` elements
    pub fn of_size(mut self, size: usize) -> Self {
        self.min_size = size;
        self.max_size = size;
        self
    }

    fn edge_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        if self.min_size == 0 {
            sizes.push(0);
        }
        if self.min_size <= 1 && 1 <= self.max_size {
            sizes.push(1);
        }
        sizes
    }

    /// The random generator: empty and single-element lists first, then
    /// sizes drawn in the configured bounds
    pub fn generator(&self, gen_size: u32) -> RandomGenerator<Vec<T>> {
        let element = self.element.generator(gen_size);
        let (min_size, max_size) = (self.min_size, self.max_size);
        let edge_sizes = self.edge_sizes();
        let cursor = Cell::new(0usize);
        RandomGenerator::new(move |source| {
            let at = cursor.get();
            let size = if at < edge_sizes.len() {
                cursor.set(at + 1);
                edge_sizes[at]
            } else {
                source.next_in(min_size, max_size)
            };
            let mut elements = Vec::with_capacity(size);
            for _ in 0..size {
                elements.push(element.next(source)?);
            }
            Ok(shrinkable_list(elements, min_size))
        })
    }

    /// Enumerate every list in the bounds, shortest first, when the element
    /// space is exhaustive and the total count fits
    pub fn exhaustive(&self) -> GenResult<ExhaustiveGenerator<Vec<T>>> {
        self.exhaustive_opt()
            .ok_or(GenerateError::ExhaustiveNotAvailable)
    }

    pub(crate) fn exhaustive_opt(&self) -> Option<ExhaustiveGenerator<Vec<T>>> {
        let element = self.element.exhaustive_opt()?;
        let mut total: u64 = 0;
        let mut by_size = Vec::new();
        for size in self.min_size..=self.max_size {
            let lists = lists_of_size(&element, size)?;
            total = total.checked_add(lists.max_count())?;
            by_size.push(lists);
        }
        Some(ExhaustiveGenerator::new(total, move || {
            Box::new(
                by_size
                    .clone()
                    .into_iter()
                    .flat_map(|generator| generator.iter()),
            )
        }))
    }

    /// This builder as a general [`Arbitrary`]
    pub fn into_arbitrary(&self) -> Arbitrary<Vec<T>> {
        let random = self.clone();
        let exhaustive = self.clone();
        Arbitrary::from_parts(
            move |gen_size| random.generator(gen_size),
            move || exhaustive.exhaustive_opt(),
        )
    }
}

impl<T> Clone for ListArbitrary<T> {
    fn clone(&self) -> Self {
        Self {
            element: self.element.clone(),
            min_size: self.min_size,
            max_size: self.max_size,
        }
    }
}

/// Every list of exactly `size` elements, head-major
fn lists_of_size<T: Clone + 'static>(
    element: &ExhaustiveGenerator<T>,
    size: usize,
) -> Option<ExhaustiveGenerator<Vec<T>>> {
    if size == 0 {
        return Some(ExhaustiveGenerator::from_values(vec![Vec::new()]));
    }
    let tail = lists_of_size(element, size - 1)?;
    let count = element.max_count().checked_pow(u32::try_from(size).ok()?)?;
    let element = element.clone();
    Some(ExhaustiveGenerator::new(count, move || {
        let tail = tail.clone();
        Box::new(element.iter().flat_map(move |head| {
            let head = head.clone();
            tail.iter().map(move |rest| {
                let mut list = Vec::with_capacity(rest.len() + 1);
                list.push(head.clone());
                list.extend(rest);
                list
            })
        }))
    }))
}

/// Sets of an element arbitrary with inclusive size bounds.
///
/// Element draws are retried on duplicates; a draw fails with
/// [`GenerateError::SetSizeUnreachable`] when the minimum size cannot be
/// reached.
pub struct SetArbitrary<T> {
    element: Arbitrary<T>,
    min_size: usize,
    max_size: usize,
}

impl<T: Clone + Eq + Hash + 'static> SetArbitrary<T> {
    pub(crate) fn new(element: Arbitrary<T>) -> Self {
        Self {
            element,
            min_size: 0,
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// Require at least `min_size` elements
    ///
    /// # Panics
    ///
    /// Panics when the bounds become inverted.
    pub fn of_min_size(mut self, min_size: usize) -> Self {
        assert!(min_size <= self.max_size, "min size must not exceed max size");
        self.min_size = min_size;
        self
    }

    /// Allow at most `max_size` elements
    ///
    /// # Panics
    ///
    /// Panics when the bounds become inverted.
    pub fn of_max_size(mut self, max_size: usize) -> Self {
        assert!(self.min_size <= max_size, "min size must not exceed max size");
        self.max_size = max_size;
        self
    }

    /// Require exactly `size` elements
    pub fn of_size(mut self, size: usize) -> Self {
        self.min_size = size;
        self.max_size = size;
        self
    }

    fn edge_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        if self.min_size == 0 {
            sizes.push(0);
        }
        if self.min_size <= 1 && 1 <= self.max_size {
            sizes.push(1);
        }
        sizes
    }

    /// The random generator, re-drawing duplicate elements up to a cap
    pub fn generator(&self, gen_size: u32) -> RandomGenerator<HashSet<T>> {
        let element = self.element.generator(gen_size);
        let (min_size, max_size) = (self.min_size, self.max_size);
        let edge_sizes = self.edge_sizes();
        let cursor = Cell::new(0usize);
        RandomGenerator::new(move |source| {
            let at = cursor.get();
            let size = if at < edge_sizes.len() {
                cursor.set(at + 1);
                edge_sizes[at]
            } else {
                source.next_in(min_size, max_size)
            };
            let mut elements: Vec<Shrinkable<T>> = Vec::new();
            let mut distinct: HashSet<T> = HashSet::new();
            let mut misses = 0;
            while elements.len() < size {
                let candidate = element.next(source)?;
                if distinct.insert(candidate.value().clone()) {
                    elements.push(candidate);
                } else {
                    misses += 1;
                    if misses >= MAX_SET_MISSES {
                        if elements.len() >= min_size {
                            break;
                        }
                        return Err(GenerateError::set_size_unreachable(min_size, misses));
                    }
                }
            }
            Ok(set_shrinkable(elements, min_size))
        })
    }

    /// This builder as a general [`Arbitrary`]
    pub fn into_arbitrary(&self) -> Arbitrary<HashSet<T>> {
        let random = self.clone();
        Arbitrary::random_only(move |gen_size| random.generator(gen_size))
    }
}

impl<T> Clone for SetArbitrary<T> {
    fn clone(&self) -> Self {
        Self {
            element: self.element.clone(),
            min_size: self.min_size,
            max_size: self.max_size,
        }
    }
}

/// Sets shrink through the list machinery; candidates whose elements
/// collapse below the minimum size are pruned.
fn set_shrinkable<T: Clone + Eq + Hash + 'static>(
    elements: Vec<Shrinkable<T>>,
    min_size: usize,
) -> Shrinkable<HashSet<T>> {
    let as_set = shrinkable_list(elements, min_size)
        .map(|list| list.iter().cloned().collect::<HashSet<T>>());
    let fallback = as_set.value().clone();
    as_set
        .filter(move |set| set.len() >= min_size)
        .unwrap_or_else(|| Shrinkable::unshrinkable(fallback))
}

/// Boxed slices; the value space is identical to lists
pub struct ArrayArbitrary<T> {
    list: ListArbitrary<T>,
}

impl<T: Clone + 'static> ArrayArbitrary<T> {
    pub(crate) fn new(element: Arbitrary<T>) -> Self {
        Self {
            list: ListArbitrary::new(element),
        }
    }

    /// Require at least `min_size` elements
    pub fn of_min_size(mut self, min_size: usize) -> Self {
        self.list = self.list.of_min_size(min_size);
        self
    }

    /// Allow at most `max_size` elements
    pub fn of_max_size(mut self, max_size: usize) -> Self {
        self.list = self.list.of_max_size(max_size);
        self
    }

    /// Require exactly `size` elements
    pub fn of_size(mut self, size: usize) -> Self {
        self.list = self.list.of_size(size);
        self
    }

    /// The random generator
    pub fn generator(&self, gen_size: u32) -> RandomGenerator<Box<[T]>> {
        self.list
            .generator(gen_size)
            .map(|list| list.clone().into_boxed_slice())
    }

    /// This builder as a general [`Arbitrary`]
    pub fn into_arbitrary(&self) -> Arbitrary<Box<[T]>> {
        self.list
            .into_arbitrary()
            .map(|list| list.clone().into_boxed_slice())
    }
}

/// Owned iterators over drawn values; the value space is identical to lists
pub struct IteratorArbitrary<T> {
    list: ListArbitrary<T>,
}

impl<T: Clone + 'static> IteratorArbitrary<T> {
    pub(crate) fn new(element: Arbitrary<T>) -> Self {
        Self {
            list: ListArbitrary::new(element),
        }
    }

    /// Require at least `min_size` elements
    pub fn of_min_size(mut self, min_size: usize) -> Self {
        self.list = self.list.of_min_size(min_size);
        self
    }

    /// Allow at most `max_size` elements
    pub fn of_max_size(mut self, max_size: usize) -> Self {
        self.list = self.list.of_max_size(max_size);
        self
    }

    /// The random generator
    pub fn generator(&self, gen_size: u32) -> RandomGenerator<std::vec::IntoIter<T>> {
        self.list.generator(gen_size).map(|list| list.clone().into_iter())
    }

    /// This builder as a general [`Arbitrary`]
    pub fn into_arbitrary(&self) -> Arbitrary<std::vec::IntoIter<T>> {
        self.list.into_arbitrary().map(|list| list.clone().into_iter())
    }
}
