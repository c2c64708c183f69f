//! Locations in an NK search space and their integer encoding.
//!
//! A [`Location`] is a fixed-length sequence of digits in `[0, A)`. For graph
//! work every location is identified by its big-endian base-`A` code, which
//! turns the search space into the dense index range `[0, A^N)`.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A point in the search space: one digit per attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(Vec<u8>);

impl Location {
    /// Create a location from its digits.
    pub fn new(digits: Vec<u8>) -> Self {
        Self(digits)
    }

    /// All-zero location of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self(vec![0; n])
    }

    /// Number of attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The digits of this location.
    #[inline]
    pub fn digits(&self) -> &[u8] {
        &self.0
    }

    /// Copy of this location with `position` set to `digit`.
    pub fn with_digit(&self, position: usize, digit: u8) -> Self {
        let mut digits = self.0.clone();
        digits[position] = digit;
        Self(digits)
    }

    /// Big-endian base-`alleles` code of this location.
    ///
    /// The code is a bijection onto `[0, alleles^len)` as long as every digit
    /// is below `alleles` and that range fits in a `u64` (see [`space_size`]).
    /// Longer locations wrap modulo `2^64`.
    pub fn encode(&self, alleles: u8) -> u64 {
        let base = u64::from(alleles);
        self.0.iter().fold(0u64, |code, &digit| {
            code.wrapping_mul(base).wrapping_add(u64::from(digit))
        })
    }

    /// True if this location has `n` digits, each below `alleles`.
    pub fn is_valid(&self, n: usize, alleles: u8) -> bool {
        self.0.len() == n && self.0.iter().all(|&digit| digit < alleles)
    }

    /// Inverse of [`Location::encode`].
    pub fn decode(code: u64, n: usize, alleles: u8) -> Self {
        let base = u64::from(alleles);
        let mut digits = vec![0u8; n];
        let mut rest = code;
        for digit in digits.iter_mut().rev() {
            *digit = (rest % base) as u8;
            rest /= base;
        }
        Self(digits)
    }

    /// Number of positions at which the two locations differ.
    pub fn hamming_distance(&self, other: &Location) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a != b)
            .count()
            + self.0.len().abs_diff(other.0.len())
    }
}

impl From<Vec<u8>> for Location {
    fn from(digits: Vec<u8>) -> Self {
        Self(digits)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.0.iter().all(|&digit| digit < 10) {
            ""
        } else {
            "."
        };
        for (i, digit) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

/// Size of the search space `alleles^n`, or `None` if it overflows a `u64`.
pub fn space_size(n: usize, alleles: u8) -> Option<u64> {
    let exponent = u32::try_from(n).ok()?;
    u64::from(alleles).checked_pow(exponent)
}

/// Draw a uniformly random location of length `n`.
pub fn random_location<R: Rng + ?Sized>(rng: &mut R, n: usize, alleles: u8) -> Location {
    Location((0..n).map(|_| rng.gen_range(0..alleles)).collect())
}

/// Copy of `location` with `position` replaced by a different, uniformly
/// chosen digit. For binary locations this is the complementary bit.
pub fn mutate_position<R: Rng + ?Sized>(
    location: &Location,
    position: usize,
    alleles: u8,
    rng: &mut R,
) -> Location {
    let current = location.0[position];
    let replacement = if alleles == 2 {
        current ^ 1
    } else {
        // Skip over the current digit so every other digit is equally likely.
        let drawn = rng.gen_range(0..alleles - 1);
        if drawn >= current { drawn + 1 } else { drawn }
    };
    location.with_digit(position, replacement)
}

/// True if the two binary codes differ in exactly one bit.
#[inline]
pub fn binary_neighbors(a: u64, b: u64) -> bool {
    (a ^ b).is_power_of_two()
}

/// True if the two codes differ in exactly one base-`alleles` digit.
pub fn codes_adjacent(a: u64, b: u64, n: usize, alleles: u8) -> bool {
    if alleles == 2 {
        return binary_neighbors(a, b);
    }
    let base = u64::from(alleles);
    let (mut x, mut y) = (a, b);
    let mut differing = 0;
    for _ in 0..n {
        if x % base != y % base {
            differing += 1;
            if differing > 1 {
                return false;
            }
        }
        x /= base;
        y /= base;
    }
    differing == 1
}

/// Codes of every location one digit away from `code`.
pub fn neighbor_codes(code: u64, n: usize, alleles: u8) -> impl Iterator<Item = u64> {
    let base = u64::from(alleles);
    (0..n).flat_map(move |position| {
        // Weight of the digit at `position`, counted from the big end.
        let weight = base.pow((n - 1 - position) as u32);
        let current = (code / weight) % base;
        (0..base)
            .filter(move |&digit| digit != current)
            .map(move |digit| code - current * weight + digit * weight)
    })
}
