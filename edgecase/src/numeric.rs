//! Numeric arbitraries: bounded and unbounded integers and decimals with
//! edge-case biasing and integrated shrinking.
//!
//! Every numeric generator emits its edge cases (bounds, zero, the values
//! next to zero) among the first draws, prepended the way samples are, and
//! each edge case carries a real shrink tree. Shrinking moves toward zero
//! when zero is in range, otherwise toward the bound nearest zero.

use num_traits::{PrimInt, Signed};

use crate::arbitrary::Arbitrary;
use crate::error::{GenResult, GenerateError};
use crate::exhaustive::ExhaustiveGenerator;
use crate::generator::RandomGenerator;
use crate::shrinkable::Shrinkable;

/// Practical magnitude of unbounded draws for a given gen size hint.
///
/// Declared bounds stay at the full type range; this only scales how far
/// random draws actually roam. The MIN/MAX edge cases are emitted anyway.
pub(crate) fn default_max_from_tries(gen_size: u32) -> i128 {
    i128::from(gen_size / 2).max(3)
}

/// Overflow-free midpoint rounding toward negative infinity
fn midpoint<T: PrimInt>(a: T, b: T) -> T {
    (a & b) + ((a ^ b) >> 1)
}

/// Shrink candidates of `value`, most aggressive first: the target, the
/// bisection points toward `value`, then the adjacent value. Every
/// candidate lies strictly between the target and the value, so recursion
/// over candidates is well-founded.
pub(crate) fn shrink_candidates<T>(value: T, target: T) -> Vec<T>
where
    T: PrimInt + Signed,
{
    if value == target {
        return Vec::new();
    }
    let mut out = vec![target];
    let mut cursor = midpoint(target, value);
    while cursor != value && !out.contains(&cursor) {
        out.push(cursor);
        cursor = midpoint(cursor, value);
    }
    let adjacent = if value > target {
        value - T::one()
    } else {
        value + T::one()
    };
    if !out.contains(&adjacent) {
        out.push(adjacent);
    }
    out
}

fn int_shrinkable<T>(value: T, target: T) -> Shrinkable<T>
where
    T: PrimInt + Signed + 'static,
{
    Shrinkable::new(value, move || {
        shrink_candidates(value, target)
            .into_iter()
            .map(|candidate| int_shrinkable(candidate, target))
            .collect()
    })
}

macro_rules! integer_arbitrary {
    ($ty:ty, $uty:ty, $factory:ident, $builder:ident, $edge_span:expr) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $builder {
            min: $ty,
            max: $ty,
        }

        /// Values of the full type range, biased toward edge cases
        pub fn $factory() -> $builder {
            $builder {
                min: <$ty>::MIN,
                max: <$ty>::MAX,
            }
        }

        impl $builder {
            /// Restrict to the inclusive range `[min, max]`
            ///
            /// # Panics
            ///
            /// Panics when `min > max`.
            pub fn between(mut self, min: $ty, max: $ty) -> Self {
                assert!(min <= max, "min must not exceed max");
                self.min = min;
                self.max = max;
                self
            }

            /// Raise the lower bound
            pub fn greater_or_equal(mut self, min: $ty) -> Self {
                assert!(min <= self.max, "min must not exceed max");
                self.min = min;
                self
            }

            /// Lower the upper bound
            pub fn less_or_equal(mut self, max: $ty) -> Self {
                assert!(self.min <= max, "min must not exceed max");
                self.max = max;
                self
            }

            fn shrink_target(&self) -> $ty {
                if self.min <= 0 && 0 <= self.max {
                    0
                } else if self.min > 0 {
                    self.min
                } else {
                    self.max
                }
            }

            fn is_unbounded(&self) -> bool {
                self.min == <$ty>::MIN && self.max == <$ty>::MAX
            }

            fn practical_bounds(&self, gen_size: u32) -> ($ty, $ty) {
                if !self.is_unbounded() {
                    return (self.min, self.max);
                }
                let magnitude = default_max_from_tries(gen_size);
                let lo = (-magnitude).max(<$ty>::MIN as i128) as $ty;
                let hi = magnitude.min(<$ty>::MAX as i128) as $ty;
                (lo, hi)
            }

            fn edge_values(&self) -> Vec<$ty> {
                let mut edges: Vec<$ty> = Vec::new();
                let keep = |edges: &mut Vec<$ty>, v: $ty| {
                    if v >= self.min && v <= self.max && !edges.contains(&v) {
                        edges.push(v);
                    }
                };
                keep(&mut edges, self.min);
                keep(&mut edges, self.max);
                keep(&mut edges, 0);
                for magnitude in 1..=$edge_span {
                    keep(&mut edges, magnitude as $ty);
                    keep(&mut edges, -(magnitude as $ty));
                }
                edges
            }

            /// The random generator: edge cases first, then uniform draws
            pub fn generator(&self, gen_size: u32) -> RandomGenerator<$ty> {
                let (lo, hi) = self.practical_bounds(gen_size);
                let target = self.shrink_target();
                let edges: Vec<Shrinkable<$ty>> = self
                    .edge_values()
                    .into_iter()
                    .map(|edge| int_shrinkable(edge, target))
                    .collect();
                RandomGenerator::new(move |source| {
                    let value = source.next_in(lo, hi);
                    Ok(int_shrinkable(value, target))
                })
                .with_prefix(edges)
            }

            /// Enumerate the whole range in ascending order, when it fits
            pub fn exhaustive(&self) -> GenResult<ExhaustiveGenerator<$ty>> {
                self.exhaustive_opt()
                    .ok_or(GenerateError::ExhaustiveNotAvailable)
            }

            pub(crate) fn exhaustive_opt(&self) -> Option<ExhaustiveGenerator<$ty>> {
                let span = self.max.wrapping_sub(self.min) as $uty as u128;
                let count = u64::try_from(span.checked_add(1)?).ok()?;
                let (min, max) = (self.min, self.max);
                Some(ExhaustiveGenerator::new(count, move || {
                    Box::new(min..=max)
                }))
            }

            /// This builder as a general [`Arbitrary`]
            pub fn into_arbitrary(self) -> Arbitrary<$ty> {
                let random = self;
                let exhaustive = self;
                Arbitrary::from_parts(
                    move |gen_size| random.generator(gen_size),
                    move || exhaustive.exhaustive_opt(),
                )
            }
        }

    };
}

integer_arbitrary!(i8, u8, bytes, ByteArbitrary, 2);
integer_arbitrary!(i16, u16, shorts, ShortArbitrary, 2);
integer_arbitrary!(i32, u32, integers, IntegerArbitrary, 2);
integer_arbitrary!(i64, u64, longs, LongArbitrary, 2);
integer_arbitrary!(i128, u128, big_integers, BigIntegerArbitrary, 10);

macro_rules! decimal_arbitrary {
    ($ty:ty, $factory:ident, $builder:ident, $float_candidates:ident, $float_shrinkable:ident, $grid_shrinkable:ident) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $builder {
            min: $ty,
            max: $ty,
            scale: Option<u32>,
        }

        /// Decimals of the full finite type range, biased toward edge cases
        pub fn $factory() -> $builder {
            $builder {
                min: <$ty>::MIN,
                max: <$ty>::MAX,
                scale: None,
            }
        }

        impl $builder {
            /// Restrict to the inclusive range `[min, max]`
            ///
            /// # Panics
            ///
            /// Panics when the bounds are not finite or `min > max`.
            pub fn between(mut self, min: $ty, max: $ty) -> Self {
                assert!(min.is_finite() && max.is_finite(), "bounds must be finite");
                assert!(min <= max, "min must not exceed max");
                self.min = min;
                self.max = max;
                self
            }

            /// Fix the number of decimal places.
            ///
            /// Every emitted value v then satisfies
            /// `round(v * 10^s) / 10^s == v`, unless the interval is
            /// narrower than one scale step, in which case the endpoints
            /// override the scale and values are drawn unrounded.
            ///
            /// # Panics
            ///
            /// Panics when `scale > 15`.
            pub fn of_scale(mut self, scale: u32) -> Self {
                assert!(scale <= 15, "scale must be at most 15 decimal places");
                self.scale = Some(scale);
                self
            }

            fn is_unbounded(&self) -> bool {
                self.min == <$ty>::MIN && self.max == <$ty>::MAX
            }

            fn practical_bounds(&self, gen_size: u32) -> ($ty, $ty) {
                if !self.is_unbounded() {
                    return (self.min, self.max);
                }
                let magnitude = default_max_from_tries(gen_size) as $ty;
                (-magnitude, magnitude)
            }

            fn shrink_target(&self) -> $ty {
                if self.min <= 0.0 && 0.0 <= self.max {
                    0.0
                } else if self.min > 0.0 {
                    self.min
                } else {
                    self.max
                }
            }

            fn factor(&self) -> Option<$ty> {
                self.scale.map(|scale| (10.0 as $ty).powi(scale as i32))
            }

            /// The interval is narrower than one scale step, so the
            /// endpoints win over the scale.
            fn narrower_than_step(&self) -> bool {
                match self.factor() {
                    Some(factor) => (self.max - self.min) < 1.0 / factor,
                    None => false,
                }
            }

            /// The grid of scaled values `[ceil(lo·f), floor(hi·f)]`,
            /// clamped to where the mantissa still represents the scaled
            /// integers exactly. `None` when the scale does not apply.
            fn grid(&self, lo: $ty, hi: $ty) -> Option<(i128, i128, $ty)> {
                let factor = self.factor()?;
                if self.narrower_than_step() {
                    return None;
                }
                let exact = (2.0 as $ty).powi(<$ty>::MANTISSA_DIGITS as i32) / factor;
                let lo = lo.max(-exact);
                let hi = hi.min(exact);
                let lo_k = (lo * factor).ceil() as i128;
                let hi_k = (hi * factor).floor() as i128;
                if lo_k > hi_k {
                    return None;
                }
                Some((lo_k, hi_k, factor))
            }

            fn on_grid(&self, value: $ty) -> bool {
                match self.factor() {
                    Some(factor) => ((value * factor).round() / factor) == value,
                    None => true,
                }
            }

            fn edge_values(&self) -> Vec<$ty> {
                let snapped = !self.narrower_than_step();
                let mut edges: Vec<$ty> = Vec::new();
                let keep = |edges: &mut Vec<$ty>, v: $ty| {
                    let fits_scale = !snapped || self.on_grid(v);
                    if v >= self.min && v <= self.max && fits_scale && !edges.contains(&v) {
                        edges.push(v);
                    }
                };
                keep(&mut edges, self.min);
                keep(&mut edges, self.max);
                keep(&mut edges, 0.0);
                keep(&mut edges, 0.01);
                keep(&mut edges, -0.01);
                edges
            }

            fn shrinkable_for(&self, value: $ty, lo: $ty, hi: $ty) -> Shrinkable<$ty> {
                let target = self.shrink_target().clamp(lo, hi);
                match self.grid(lo, hi) {
                    Some((lo_k, hi_k, factor)) => {
                        let k = (value * factor).round() as i128;
                        let k_target = ((target * factor).round() as i128).clamp(lo_k, hi_k);
                        $grid_shrinkable(k, k_target, factor)
                    }
                    None => $float_shrinkable(value, target),
                }
            }

            /// The random generator: edge cases first, then scale-respecting
            /// uniform draws
            pub fn generator(&self, gen_size: u32) -> RandomGenerator<$ty> {
                let builder = *self;
                let (lo, hi) = self.practical_bounds(gen_size);
                let edges: Vec<Shrinkable<$ty>> = self
                    .edge_values()
                    .into_iter()
                    .map(|edge| builder.shrinkable_for(edge, lo, hi))
                    .collect();
                RandomGenerator::new(move |source| {
                    let value = match builder.grid(lo, hi) {
                        Some((lo_k, hi_k, factor)) => {
                            source.next_in(lo_k, hi_k) as $ty / factor
                        }
                        None => source.next_in(lo, hi),
                    };
                    Ok(builder.shrinkable_for(value, lo, hi))
                })
                .with_prefix(edges)
            }

            /// Enumerate the scale grid in ascending order.
            ///
            /// Only scaled, bounded decimals are enumerable.
            pub fn exhaustive(&self) -> GenResult<ExhaustiveGenerator<$ty>> {
                self.exhaustive_opt()
                    .ok_or(GenerateError::ExhaustiveNotAvailable)
            }

            pub(crate) fn exhaustive_opt(&self) -> Option<ExhaustiveGenerator<$ty>> {
                if self.is_unbounded() {
                    return None;
                }
                let (lo_k, hi_k, factor) = self.grid(self.min, self.max)?;
                let count = u64::try_from(hi_k.checked_sub(lo_k)?.checked_add(1)?).ok()?;
                Some(ExhaustiveGenerator::new(count, move || {
                    Box::new((lo_k..=hi_k).map(move |k| k as $ty / factor))
                }))
            }

            /// This builder as a general [`Arbitrary`]
            pub fn into_arbitrary(self) -> Arbitrary<$ty> {
                let random = self;
                let exhaustive = self;
                Arbitrary::from_parts(
                    move |gen_size| random.generator(gen_size),
                    move || exhaustive.exhaustive_opt(),
                )
            }
        }

        /// Bisection candidates toward the target, unconstrained by a grid
        fn $float_candidates(value: $ty, target: $ty) -> Vec<$ty> {
            if !value.is_finite() || value == target {
                return Vec::new();
            }
            let mut out = vec![target];
            let mut cursor = target / 2.0 + value / 2.0;
            let mut depth = 0;
            while cursor != value && cursor != target && depth < 64 {
                out.push(cursor);
                cursor = cursor / 2.0 + value / 2.0;
                depth += 1;
            }
            out
        }

        fn $float_shrinkable(value: $ty, target: $ty) -> Shrinkable<$ty> {
            Shrinkable::new(value, move || {
                $float_candidates(value, target)
                    .into_iter()
                    .map(|candidate| $float_shrinkable(candidate, target))
                    .collect()
            })
        }

        /// A scaled decimal shrinking along its integer grid
        fn $grid_shrinkable(k: i128, k_target: i128, factor: $ty) -> Shrinkable<$ty> {
            let value = k as $ty / factor;
            Shrinkable::new(value, move || {
                shrink_candidates(k, k_target)
                    .into_iter()
                    .map(|candidate| $grid_shrinkable(candidate, k_target, factor))
                    .collect()
            })
        }
    };
}

decimal_arbitrary!(
    f32,
    floats,
    FloatArbitrary,
    float32_candidates,
    float32_shrinkable,
    float32_grid_shrinkable
);
decimal_arbitrary!(
    f64,
    doubles,
    DoubleArbitrary,
    float64_candidates,
    float64_shrinkable,
    float64_grid_shrinkable
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomSource;

    fn draw<T: Clone + 'static>(
        generator: &RandomGenerator<T>,
        source: &mut RandomSource,
    ) -> Shrinkable<T> {
        generator.next(source).unwrap()
    }

    #[test]
    fn test_bounded_integers_stay_in_range_and_hit_both_halves() {
        let generator = integers().between(-10, 10).generator(1000);
        let mut source = RandomSource::new(42);

        let drawn: Vec<i32> = (0..10).map(|_| draw(&generator, &mut source).into_value()).collect();
        assert!(drawn.iter().all(|v| (-10..=10).contains(v)));
        assert!(drawn.iter().any(|v| (-5..0).contains(v)));
        assert!(drawn.iter().any(|v| (1..5).contains(v)));
    }

    #[test]
    fn test_bounded_integers_emit_all_edge_cases_early() {
        let generator = integers().between(-10, 10).generator(1000);
        let mut source = RandomSource::new(1);

        let early: Vec<i32> = (0..10).map(|_| draw(&generator, &mut source).into_value()).collect();
        for edge in [-10, 10, 0, 1, -1, 2, -2] {
            assert!(early.contains(&edge), "edge {} missing from {:?}", edge, early);
        }
    }

    #[test]
    fn test_unbounded_integers_emit_type_extremes() {
        let generator = integers().generator(1000);
        let mut source = RandomSource::new(7);

        let early: Vec<i32> = (0..10).map(|_| draw(&generator, &mut source).into_value()).collect();
        assert!(early.contains(&i32::MIN));
        assert!(early.contains(&i32::MAX));
        assert!(early.contains(&0));
    }

    #[test]
    fn test_unbounded_longs_random_draws_track_gen_size() {
        let generator = longs().generator(100);
        let mut source = RandomSource::new(3);

        // Skip past the prepended edge cases.
        for _ in 0..7 {
            draw(&generator, &mut source);
        }
        for _ in 0..100 {
            let value = draw(&generator, &mut source).into_value();
            assert!(value.abs() <= 50, "practical magnitude exceeded: {}", value);
        }
    }

    #[test]
    fn test_big_integers_emit_the_full_edge_table() {
        let arbitrary = big_integers().between(i128::from(i32::MIN), i128::from(i32::MAX));
        let generator = arbitrary.generator(1000);
        let mut source = RandomSource::new(11);

        let drawn: Vec<i128> =
            (0..1000).map(|_| draw(&generator, &mut source).into_value()).collect();
        for edge in (-10..=10).map(i128::from) {
            assert!(drawn.contains(&edge), "edge {} missing", edge);
        }
        assert!(drawn.contains(&i128::from(i32::MIN)));
        assert!(drawn.contains(&i128::from(i32::MAX)));
    }

    #[test]
    fn test_integer_shrinks_toward_zero_when_in_range() {
        let generator = integers().between(-100, 100).generator(100);
        let mut source = RandomSource::new(5);

        for _ in 0..50 {
            let drawn = draw(&generator, &mut source);
            let value = *drawn.value();
            for candidate in drawn.shrinks() {
                assert!(
                    candidate.value().abs() < value.abs()
                        || (candidate.value().abs() == value.abs() && *candidate.value() != value),
                    "candidate {} is not closer to zero than {}",
                    candidate.value(),
                    value
                );
            }
        }
    }

    #[test]
    fn test_integer_shrink_candidates_are_ordered_and_bounded() {
        let candidates = shrink_candidates(100i32, 0);
        assert_eq!(candidates[0], 0, "the target leads");
        assert_eq!(candidates[1], 50, "then the halfway point");
        assert_eq!(*candidates.last().unwrap(), 99, "the adjacent value closes");
        assert!(candidates.iter().all(|c| (0..100).contains(c)));
    }

    #[test]
    fn test_integer_shrink_target_is_nearest_bound_outside_zero() {
        let positive = integers().between(5, 20);
        let generator = positive.generator(100);
        let mut source = RandomSource::new(9);

        for _ in 0..30 {
            let drawn = draw(&generator, &mut source);
            for candidate in drawn.shrinks() {
                assert!((5..=20).contains(candidate.value()));
            }
            if *drawn.value() != 5 {
                assert_eq!(*drawn.shrinks()[0].value(), 5);
            }
        }
    }

    #[test]
    fn test_integer_shrinking_never_leaves_declared_bounds() {
        fn assert_subtree_in_bounds(node: &Shrinkable<i32>, depth: usize) {
            if depth == 0 {
                return;
            }
            for candidate in node.shrinks() {
                assert!((-7..=13).contains(candidate.value()));
                assert_subtree_in_bounds(&candidate, depth - 1);
            }
        }
        let generator = integers().between(-7, 13).generator(50);
        let mut source = RandomSource::new(17);
        for _ in 0..20 {
            assert_subtree_in_bounds(&draw(&generator, &mut source), 3);
        }
    }

    #[test]
    fn test_minimum_has_no_shrinks_in_positive_range() {
        let candidates = shrink_candidates(5i32, 5);
        assert!(candidates.is_empty());
    }

    #[test]
    #[should_panic(expected = "min must not exceed max")]
    fn test_between_rejects_inverted_range() {
        integers().between(10, -10);
    }

    #[test]
    fn test_integer_exhaustive_enumerates_range() {
        let exhaustive = integers().between(-2, 2).exhaustive().unwrap();
        assert_eq!(exhaustive.max_count(), 5);
        assert_eq!(exhaustive.iter().collect::<Vec<_>>(), vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn test_big_integer_full_range_is_not_exhaustive() {
        assert!(big_integers().exhaustive().is_err());
    }

    #[test]
    fn test_doubles_respect_scale() {
        let generator = doubles().between(0.0, 100.0).of_scale(2).generator(1000);
        let mut source = RandomSource::new(13);

        for _ in 0..200 {
            let value = draw(&generator, &mut source).into_value();
            assert!((0.0..=100.0).contains(&value));
            assert_eq!((value * 100.0).round() / 100.0, value, "{} off grid", value);
        }
    }

    #[test]
    fn test_doubles_narrow_interval_overrides_scale() {
        // One scale-2 step is 0.01, wider than this interval.
        let generator = doubles().between(0.001, 0.002).of_scale(2).generator(1000);
        let mut source = RandomSource::new(19);

        for _ in 0..200 {
            let value = draw(&generator, &mut source).into_value();
            assert!((0.001..=0.002).contains(&value), "{} out of range", value);
        }
    }

    #[test]
    fn test_unbounded_doubles_emit_edge_table() {
        let generator = doubles().generator(1000);
        let mut source = RandomSource::new(23);

        let early: Vec<f64> = (0..10).map(|_| draw(&generator, &mut source).into_value()).collect();
        for edge in [f64::MIN, f64::MAX, 0.0, 0.01, -0.01] {
            assert!(early.contains(&edge), "edge {} missing from {:?}", edge, early);
        }
    }

    #[test]
    fn test_double_shrinks_preserve_scale() {
        let generator = doubles().between(0.0, 100.0).of_scale(1).generator(100);
        let mut source = RandomSource::new(29);

        for _ in 0..50 {
            let drawn = draw(&generator, &mut source);
            for candidate in drawn.shrinks() {
                let value = *candidate.value();
                assert_eq!((value * 10.0).round() / 10.0, value);
                assert!((0.0..=100.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_double_shrinks_toward_zero() {
        let drawn = doubles()
            .between(-50.0, 50.0)
            .of_scale(0)
            .generator(100);
        let mut source = RandomSource::new(31);

        for _ in 0..30 {
            let shrinkable = draw(&drawn, &mut source);
            if *shrinkable.value() != 0.0 {
                assert_eq!(*shrinkable.shrinks()[0].value(), 0.0);
            }
        }
    }

    #[test]
    fn test_scaled_bounded_doubles_are_exhaustive() {
        let exhaustive = doubles().between(0.0, 0.5).of_scale(1).exhaustive().unwrap();
        assert_eq!(exhaustive.max_count(), 6);
        assert_eq!(
            exhaustive.iter().collect::<Vec<_>>(),
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5]
        );
    }

    #[test]
    fn test_unscaled_doubles_are_not_exhaustive() {
        assert!(doubles().between(0.0, 1.0).exhaustive().is_err());
    }

    #[test]
    #[should_panic(expected = "at most 15")]
    fn test_of_scale_rejects_excessive_precision() {
        doubles().of_scale(16);
    }

    #[test]
    fn test_floats_between_stays_in_range() {
        let generator = floats().between(-1.0, 1.0).generator(100);
        let mut source = RandomSource::new(37);
        for _ in 0..100 {
            let value = draw(&generator, &mut source).into_value();
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_default_max_from_tries_grows_with_tries() {
        assert_eq!(default_max_from_tries(0), 3);
        assert_eq!(default_max_from_tries(100), 50);
        assert_eq!(default_max_from_tries(1000), 500);
    }
}
