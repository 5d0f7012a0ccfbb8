//! Registry of default arbitraries keyed by type.
//!
//! The registry is an explicit value handed over by the driver; there is no
//! process-wide registry. Registering several arbitraries for one type is
//! allowed, and a lookup merges them into a uniform choice.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::arbitraries::one_of;
use crate::arbitrary::Arbitrary;

/// Type-keyed store of default arbitraries
pub struct ProviderRegistry {
    providers: HashMap<TypeId, Vec<Box<dyn Any>>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a default arbitrary for `T`
    pub fn register<T: Clone + 'static>(&mut self, arbitrary: Arbitrary<T>) {
        self.providers
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Box::new(arbitrary));
    }

    /// The default arbitrary for `T`, merging multiple registrations into a
    /// uniform choice
    pub fn default_for<T: Clone + 'static>(&self) -> Option<Arbitrary<T>> {
        let hits = self.providers.get(&TypeId::of::<T>())?;
        let mut arbitraries: Vec<Arbitrary<T>> = hits
            .iter()
            .filter_map(|boxed| boxed.downcast_ref::<Arbitrary<T>>().cloned())
            .collect();
        match arbitraries.len() {
            0 => None,
            1 => arbitraries.pop(),
            _ => Some(one_of(arbitraries)),
        }
    }

    /// Whether a default is registered for `T`
    pub fn contains<T: 'static>(&self) -> bool {
        self.providers.contains_key(&TypeId::of::<T>())
    }

    /// Drop every registration for `T`
    pub fn remove<T: 'static>(&mut self) -> bool {
        self.providers.remove(&TypeId::of::<T>()).is_some()
    }

    /// The number of types with registered defaults
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitraries::constant;
    use crate::numeric::integers;
    use crate::rng::RandomSource;

    #[test]
    fn test_registry_basic_operations() {
        let mut registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains::<i32>());

        registry.register(integers().between(0, 9).into_arbitrary());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains::<i32>());
        assert!(!registry.contains::<String>());

        assert!(registry.remove::<i32>());
        assert!(!registry.remove::<i32>());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_returns_registered_arbitrary() {
        let mut registry = ProviderRegistry::new();
        registry.register(constant(42));

        let default = registry.default_for::<i32>().unwrap();
        let mut source = RandomSource::new(1);
        assert_eq!(
            default.generator(10).next(&mut source).unwrap().into_value(),
            42
        );
    }

    #[test]
    fn test_lookup_misses_unregistered_types() {
        let registry = ProviderRegistry::new();
        assert!(registry.default_for::<String>().is_none());
    }

    #[test]
    fn test_multiple_registrations_merge_into_a_choice() {
        let mut registry = ProviderRegistry::new();
        registry.register(constant(1));
        registry.register(constant(2));

        let merged = registry.default_for::<i32>().unwrap();
        let generator = merged.generator(10);
        let mut source = RandomSource::new(5);
        let drawn: Vec<i32> = (0..100)
            .map(|_| generator.next(&mut source).unwrap().into_value())
            .collect();
        assert!(drawn.contains(&1));
        assert!(drawn.contains(&2));
        assert!(drawn.iter().all(|v| *v == 1 || *v == 2));
    }

    #[test]
    fn test_registrations_are_type_separated() {
        let mut registry = ProviderRegistry::new();
        registry.register(constant(7i32));
        registry.register(constant("seven"));

        assert!(registry.default_for::<i32>().is_some());
        assert!(registry.default_for::<&str>().is_some());
        assert!(registry.default_for::<i64>().is_none());
    }
}
