//! Exhaustive generators: finite iteration over every value of an arbitrary.

use std::rc::Rc;

/// Finite enumeration of a value space with a known size estimate.
///
/// `max_count` lets a driver decide between enumerating and sampling before
/// any value is produced. It is exact for the factories in this crate and an
/// upper bound after [`filter`](ExhaustiveGenerator::filter).
pub struct ExhaustiveGenerator<T> {
    max_count: u64,
    iter: Rc<dyn Fn() -> Box<dyn Iterator<Item = T>>>,
}

impl<T: Clone + 'static> ExhaustiveGenerator<T> {
    /// Create an exhaustive generator from a size and an iterator factory
    pub fn new(max_count: u64, iter: impl Fn() -> Box<dyn Iterator<Item = T>> + 'static) -> Self {
        Self {
            max_count,
            iter: Rc::new(iter),
        }
    }

    /// Enumerate a fixed list of values in order
    pub fn from_values(values: Vec<T>) -> Self {
        let count = values.len() as u64;
        Self::new(count, move || Box::new(values.clone().into_iter()))
    }

    /// Upper bound on the number of values [`iter`](ExhaustiveGenerator::iter) yields
    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    /// Iterate over all values
    pub fn iter(&self) -> Box<dyn Iterator<Item = T>> {
        (self.iter)()
    }

    /// Map every value; the count is unchanged
    pub fn map<U: Clone + 'static>(&self, f: impl Fn(&T) -> U + 'static) -> ExhaustiveGenerator<U> {
        let base = self.clone();
        let f = Rc::new(f);
        ExhaustiveGenerator::new(self.max_count, move || {
            let f = f.clone();
            Box::new(base.iter().map(move |value| f(&value)))
        })
    }

    /// Drop values failing the predicate; `max_count` stays as an upper bound
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> ExhaustiveGenerator<T> {
        let base = self.clone();
        let predicate = Rc::new(predicate);
        ExhaustiveGenerator::new(self.max_count, move || {
            let predicate = predicate.clone();
            Box::new(base.iter().filter(move |value| predicate(value)))
        })
    }

    /// Cartesian product with dependent inner generators, outer-major.
    ///
    /// Available only when every inner generator is exhaustive and the total
    /// count fits; returns `None` otherwise.
    pub fn flat_map<U: Clone + 'static>(
        &self,
        f: impl Fn(&T) -> Option<ExhaustiveGenerator<U>> + 'static,
    ) -> Option<ExhaustiveGenerator<U>> {
        let f: Rc<dyn Fn(&T) -> Option<ExhaustiveGenerator<U>>> = Rc::new(f);

        let mut total: u64 = 0;
        for value in self.iter() {
            let inner = f(&value)?;
            total = total.checked_add(inner.max_count())?;
        }

        let base = self.clone();
        Some(ExhaustiveGenerator::new(total, move || {
            let f = f.clone();
            Box::new(base.iter().flat_map(move |value| {
                f(&value).map(|inner| inner.iter()).into_iter().flatten()
            }))
        }))
    }

    /// Add the absent value; it is enumerated first
    pub fn inject_none(&self) -> ExhaustiveGenerator<Option<T>> {
        let base = self.clone();
        ExhaustiveGenerator::new(self.max_count.saturating_add(1), move || {
            Box::new(std::iter::once(None).chain(base.iter().map(Some)))
        })
    }

    /// Prepend sample values to the enumeration
    pub fn with_samples(&self, samples: Vec<T>) -> ExhaustiveGenerator<T> {
        let base = self.clone();
        let count = self.max_count.saturating_add(samples.len() as u64);
        ExhaustiveGenerator::new(count, move || {
            Box::new(samples.clone().into_iter().chain(base.iter()))
        })
    }
}

impl<T> Clone for ExhaustiveGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            max_count: self.max_count,
            iter: self.iter.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_enumerates_in_order() {
        let generator = ExhaustiveGenerator::from_values(vec![1, 2, 3]);
        assert_eq!(generator.max_count(), 3);
        assert_eq!(generator.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_iter_can_be_repeated() {
        let generator = ExhaustiveGenerator::from_values(vec!["a", "b"]);
        assert_eq!(generator.iter().count(), 2);
        assert_eq!(generator.iter().count(), 2);
    }

    #[test]
    fn test_map_preserves_count() {
        let generator = ExhaustiveGenerator::from_values(vec![1, 2, 3]).map(|n| n * 10);
        assert_eq!(generator.max_count(), 3);
        assert_eq!(generator.iter().collect::<Vec<_>>(), vec![10, 20, 30]);
    }

    #[test]
    fn test_filter_keeps_count_as_upper_bound() {
        let generator =
            ExhaustiveGenerator::from_values(vec![1, 2, 3, 4]).filter(|n| n % 2 == 0);
        assert_eq!(generator.max_count(), 4);
        assert_eq!(generator.iter().collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn test_flat_map_is_outer_major() {
        let outer = ExhaustiveGenerator::from_values(vec![1u32, 2]);
        let product = outer
            .flat_map(|n| {
                let n = *n;
                Some(ExhaustiveGenerator::from_values(vec![(n, 'x'), (n, 'y')]))
            })
            .expect("both sides are exhaustive");

        assert_eq!(product.max_count(), 4);
        assert_eq!(
            product.iter().collect::<Vec<_>>(),
            vec![(1, 'x'), (1, 'y'), (2, 'x'), (2, 'y')]
        );
    }

    #[test]
    fn test_flat_map_fails_when_inner_is_not_exhaustive() {
        let outer = ExhaustiveGenerator::from_values(vec![1, 2]);
        let product: Option<ExhaustiveGenerator<i32>> = outer.flat_map(|_| None);
        assert!(product.is_none());
    }

    #[test]
    fn test_inject_none_adds_one_and_leads() {
        let generator = ExhaustiveGenerator::from_values(vec![5, 6]).inject_none();
        assert_eq!(generator.max_count(), 3);
        assert_eq!(
            generator.iter().collect::<Vec<_>>(),
            vec![None, Some(5), Some(6)]
        );
    }

    #[test]
    fn test_with_samples_prepends() {
        let generator = ExhaustiveGenerator::from_values(vec![3, 4]).with_samples(vec![1, 2]);
        assert_eq!(generator.max_count(), 4);
        assert_eq!(generator.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }
}
