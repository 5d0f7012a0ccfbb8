//! Character and string arbitraries.
//!
//! Characters are configured by ranges and explicit sets; the default class
//! is printable ASCII. Strings compose a character arbitrary with length
//! bounds the way lists do: shorter strings shrink first, then characters
//! shrink toward `'a'`.

use std::cell::Cell;
use std::rc::Rc;

use crate::arbitrary::Arbitrary;
use crate::container::{DEFAULT_MAX_SIZE, shrinkable_list};
use crate::error::GenResult;
use crate::exhaustive::ExhaustiveGenerator;
use crate::generator::RandomGenerator;
use crate::shrinkable::Shrinkable;

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_END: u32 = 0xDFFF;

/// Characters drawn from configured ranges and explicit sets
pub struct CharacterArbitrary {
    ranges: Vec<(u32, u32)>,
    defaulted: bool,
}

/// The printable-ASCII character class; configuration replaces the default
pub fn chars() -> CharacterArbitrary {
    CharacterArbitrary {
        ranges: vec![(' ' as u32, '~' as u32)],
        defaulted: true,
    }
}

impl CharacterArbitrary {
    fn configured(mut self) -> Self {
        if self.defaulted {
            self.ranges.clear();
            self.defaulted = false;
        }
        self
    }

    /// Add the inclusive character range `[from, to]`
    ///
    /// # Panics
    ///
    /// Panics when `from > to`.
    pub fn with_char_range(self, from: char, to: char) -> Self {
        assert!(from <= to, "char range must not be inverted");
        let mut this = self.configured();
        this.ranges.push((from as u32, to as u32));
        this
    }

    /// Add every character of the given set
    ///
    /// # Panics
    ///
    /// Panics when `set` is empty.
    pub fn with_chars(self, set: &str) -> Self {
        assert!(!set.is_empty(), "character set must not be empty");
        let mut this = self.configured();
        for c in set.chars() {
            this.ranges.push((c as u32, c as u32));
        }
        this
    }

    /// Add the ASCII letters
    pub fn alpha(self) -> Self {
        self.with_char_range('a', 'z').with_char_range('A', 'Z')
    }

    /// Add the ASCII digits
    pub fn numeric(self) -> Self {
        self.with_char_range('0', '9')
    }

    /// Add the common whitespace characters
    pub fn whitespace(self) -> Self {
        self.with_chars(" \t\n\r")
    }

    fn count(&self) -> u64 {
        self.ranges.iter().map(|(lo, hi)| range_len(*lo, *hi)).sum()
    }

    fn at(&self, mut index: u64) -> char {
        for (lo, hi) in &self.ranges {
            let len = range_len(*lo, *hi);
            if index < len {
                return char_in_range(*lo, index);
            }
            index -= len;
        }
        // index is always drawn below count()
        char_in_range(self.ranges[0].0, 0)
    }

    fn contains(&self, c: char) -> bool {
        let code = c as u32;
        self.ranges.iter().any(|(lo, hi)| *lo <= code && code <= *hi)
    }

    fn shrink_target(&self) -> char {
        if self.contains('a') {
            return 'a';
        }
        let smallest = self.ranges.iter().map(|(lo, _)| *lo).min().unwrap_or('a' as u32);
        char_in_range(smallest, 0)
    }

    /// The random generator, uniform over the configured class
    pub fn generator(&self, _gen_size: u32) -> RandomGenerator<char> {
        let class = Rc::new(self.clone());
        let total = self.count();
        RandomGenerator::new(move |source| {
            let drawn = class.at(source.next_below(total));
            Ok(char_shrinkable(class.clone(), drawn))
        })
    }

    /// Enumerate the whole class, range by range
    pub fn exhaustive(&self) -> GenResult<ExhaustiveGenerator<char>> {
        Ok(self.exhaustive_generator())
    }

    fn exhaustive_generator(&self) -> ExhaustiveGenerator<char> {
        let ranges = self.ranges.clone();
        ExhaustiveGenerator::new(self.count(), move || {
            let ranges = ranges.clone();
            Box::new(ranges.into_iter().flat_map(|(lo, hi)| {
                (0..range_len(lo, hi)).map(move |offset| char_in_range(lo, offset))
            }))
        })
    }

    /// This class as a general [`Arbitrary`]
    pub fn into_arbitrary(&self) -> Arbitrary<char> {
        let random = self.clone();
        let exhaustive = self.clone();
        Arbitrary::from_parts(
            move |gen_size| random.generator(gen_size),
            move || Some(exhaustive.exhaustive_generator()),
        )
    }
}

impl Clone for CharacterArbitrary {
    fn clone(&self) -> Self {
        Self {
            ranges: self.ranges.clone(),
            defaulted: self.defaulted,
        }
    }
}

/// Range length in scalar values, skipping the surrogate block
fn range_len(lo: u32, hi: u32) -> u64 {
    let total = u64::from(hi - lo) + 1;
    let overlap_lo = lo.max(SURROGATE_START);
    let overlap_hi = hi.min(SURROGATE_END);
    if overlap_lo <= overlap_hi {
        total - (u64::from(overlap_hi - overlap_lo) + 1)
    } else {
        total
    }
}

/// The `offset`-th scalar value of the range starting at `lo`
fn char_in_range(lo: u32, offset: u64) -> char {
    let mut code = u64::from(lo) + offset;
    if u64::from(lo) < u64::from(SURROGATE_START) && code >= u64::from(SURROGATE_START) {
        code += u64::from(SURROGATE_END - SURROGATE_START) + 1;
    }
    char::from_u32(code as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Bisection toward the class target, pruned to class members
fn char_candidates(class: &CharacterArbitrary, value: char, target: char) -> Vec<char> {
    crate::numeric::shrink_candidates(value as i64, target as i64)
        .into_iter()
        .filter_map(|code| char::from_u32(code as u32))
        .filter(|c| class.contains(*c))
        .collect()
}

fn char_shrinkable(class: Rc<CharacterArbitrary>, value: char) -> Shrinkable<char> {
    let target = class.shrink_target();
    Shrinkable::new(value, move || {
        char_candidates(&class, value, target)
            .into_iter()
            .map(|candidate| char_shrinkable(class.clone(), candidate))
            .collect()
    })
}

/// Strings composed from a character class and length bounds
pub struct StringArbitrary {
    chars: CharacterArbitrary,
    min_length: usize,
    max_length: usize,
}

/// Printable-ASCII strings of up to the default length
pub fn strings() -> StringArbitrary {
    StringArbitrary {
        chars: chars(),
        min_length: 0,
        max_length: DEFAULT_MAX_SIZE,
    }
}

impl StringArbitrary {
    /// Restrict characters to the inclusive range `[from, to]`
    pub fn with_char_range(mut self, from: char, to: char) -> Self {
        self.chars = self.chars.with_char_range(from, to);
        self
    }

    /// Restrict characters to the given set
    pub fn with_chars(mut self, set: &str) -> Self {
        self.chars = self.chars.with_chars(set);
        self
    }

    /// Allow the ASCII letters
    pub fn alpha(mut self) -> Self {
        self.chars = self.chars.alpha();
        self
    }

    /// Allow the ASCII digits
    pub fn numeric(mut self) -> Self {
        self.chars = self.chars.numeric();
        self
    }

    /// Allow the common whitespace characters
    pub fn whitespace(mut self) -> Self {
        self.chars = self.chars.whitespace();
        self
    }

    /// Require exactly `length` characters
    pub fn of_length(mut self, length: usize) -> Self {
        self.min_length = length;
        self.max_length = length;
        self
    }

    /// Require at least `min_length` characters
    ///
    /// # Panics
    ///
    /// Panics when the bounds become inverted.
    pub fn of_min_length(mut self, min_length: usize) -> Self {
        assert!(min_length <= self.max_length, "min length must not exceed max length");
        self.min_length = min_length;
        self
    }

    /// Allow at most `max_length` characters
    ///
    /// # Panics
    ///
    /// Panics when the bounds become inverted.
    pub fn of_max_length(mut self, max_length: usize) -> Self {
        assert!(self.min_length <= max_length, "min length must not exceed max length");
        self.max_length = max_length;
        self
    }

    fn edge_lengths(&self) -> Vec<usize> {
        let mut lengths = Vec::new();
        if self.min_length == 0 {
            lengths.push(0);
        }
        if self.min_length <= 1 && 1 <= self.max_length {
            lengths.push(1);
        }
        lengths
    }

    /// The random generator: empty and single-character strings first, then
    /// lengths drawn in the configured bounds
    pub fn generator(&self, gen_size: u32) -> RandomGenerator<String> {
        let character = self.chars.generator(gen_size);
        let (min_length, max_length) = (self.min_length, self.max_length);
        let edge_lengths = self.edge_lengths();
        let cursor = Cell::new(0usize);
        RandomGenerator::new(move |source| {
            let at = cursor.get();
            let length = if at < edge_lengths.len() {
                cursor.set(at + 1);
                edge_lengths[at]
            } else {
                source.next_in(min_length, max_length)
            };
            let mut drawn = Vec::with_capacity(length);
            for _ in 0..length {
                drawn.push(character.next(source)?);
            }
            Ok(shrinkable_list(drawn, min_length).map(|chars| chars.iter().collect::<String>()))
        })
    }

    /// This builder as a general [`Arbitrary`]
    pub fn into_arbitrary(&self) -> Arbitrary<String> {
        let random = self.clone();
        Arbitrary::random_only(move |gen_size| random.generator(gen_size))
    }
}

impl Clone for StringArbitrary {
    fn clone(&self) -> Self {
        Self {
            chars: self.chars.clone(),
            min_length: self.min_length,
            max_length: self.max_length,
        }
    }
}
