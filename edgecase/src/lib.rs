//! # Edgecase - Arbitrary and Shrinkable Value Generation
//!
//! Edgecase is the value-generation core of a property-based testing engine:
//! declarative value spaces ([`Arbitrary`]) that can be sampled randomly with
//! a bias toward interesting edge cases, enumerated exhaustively when finite,
//! and minimised to locally minimal counterexamples through integrated
//! shrinking ([`Shrinkable`] trees walked by the [`Shrinker`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use edgecase::{RandomSource, Shrinker, integers};
//!
//! let numbers = integers().between(-10, 10);
//! let generator = numbers.generator(1000);
//! let mut source = RandomSource::new(42);
//!
//! let drawn = generator.next(&mut source).unwrap();
//! assert!((-10..=10).contains(drawn.value()));
//!
//! // Minimise against the failing predicate "v >= 5".
//! if *drawn.value() >= 5 {
//!     let result = Shrinker::new().minimize(&drawn, |v| *v >= 5);
//!     assert_eq!(result.minimal, 5);
//! }
//! ```

#[cfg(feature = "use_logging")]
fn env_logger_init() {
    // Ignore init failures, implying it has already been done.
    let _ = env_logger::try_init();
}

#[cfg(feature = "use_logging")]
macro_rules! info {
    ($($tt:tt)*) => {
        log::info!($($tt)*)
    };
}

#[cfg(feature = "use_logging")]
macro_rules! debug {
    ($($tt:tt)*) => {
        log::debug!($($tt)*)
    };
}

#[cfg(not(feature = "use_logging"))]
fn env_logger_init() {}

#[cfg(not(feature = "use_logging"))]
macro_rules! info {
    ($($tt:tt)*) => {};
}

#[cfg(not(feature = "use_logging"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

// Public modules
pub mod arbitraries;
pub mod arbitrary;
pub mod config;
pub mod container;
pub mod error;
pub mod exhaustive;
pub mod generator;
pub mod numeric;
pub mod provider;
pub mod rng;
pub mod shrinkable;
pub mod shrinker;
pub mod string;

// Re-export the main public API
pub use arbitraries::{
    constant, create, frequency, frequency_of, from_generator, lazy, of, one_of, random_value,
    randoms, recursive, samples, shuffle,
};
pub use arbitrary::{ABSENT_PROBABILITY, Arbitrary};
pub use config::{ConfigError, PropertyConfig, ShrinkingMode};
pub use container::{
    ArrayArbitrary, DEFAULT_MAX_SIZE, IteratorArbitrary, ListArbitrary, SetArbitrary,
    shrinkable_list,
};
pub use error::{GenResult, GenerateError};
pub use exhaustive::ExhaustiveGenerator;
pub use generator::{GeneratorStream, MAX_FILTER_MISSES, MAX_UNIQUE_MISSES, RandomGenerator};
pub use numeric::{
    BigIntegerArbitrary, ByteArbitrary, DoubleArbitrary, FloatArbitrary, IntegerArbitrary,
    LongArbitrary, ShortArbitrary, big_integers, bytes, doubles, floats, integers, longs, shorts,
};
pub use provider::ProviderRegistry;
pub use rng::RandomSource;
pub use shrinkable::Shrinkable;
pub use shrinker::{ShrinkResult, Shrinker};
pub use string::{CharacterArbitrary, StringArbitrary, chars, strings};
