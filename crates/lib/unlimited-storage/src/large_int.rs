//! Unbounded nonnegative integer, the last exact rung of the counter ladder.
//!
//! A [`LargeInt`] is a low 64-bit word plus a growable list of further words in
//! ascending significance:
//!
//! ```text
//! value = low + high[0] * 2^64 + high[1] * 2^128 + ...
//! ```
//!
//! `high` never ends with a zero word, so equal values always share one layout
//! and a single-word value has an empty `high`.

use std::{cmp::Ordering, fmt, ops::AddAssign, str::FromStr};
use thiserror::Error;

const WORD_RADIX: f64 = 18_446_744_073_709_551_616.0;
// largest power of ten that fits in a word
const DECIMAL_CHUNK: u64 = 10_000_000_000_000_000_000;
const DECIMAL_CHUNK_DIGITS: usize = 19;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LargeInt {
    low: u64,
    high: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseLargeIntError {
    #[error("cannot parse an integer from an empty string")]
    Empty,
    #[error("invalid digit {0:?} in integer literal")]
    InvalidDigit(char),
}

impl LargeInt {
    pub const fn new() -> Self {
        Self {
            low: 0,
            high: Vec::new(),
        }
    }

    /// Build from little-endian words. Trailing zero words are dropped.
    pub fn from_words(words: &[u64]) -> Self {
        let mut res = match words.split_first() {
            Some((&low, high)) => Self {
                low,
                high: high.to_vec(),
            },
            None => Self::new(),
        };
        res.trim();
        res
    }

    /// Little-endian words, always at least one.
    pub fn words(&self) -> impl DoubleEndedIterator<Item = u64> + '_ {
        std::iter::once(self.low).chain(self.high.iter().copied())
    }

    pub fn word_count(&self) -> usize {
        1 + self.high.len()
    }

    pub fn is_zero(&self) -> bool {
        self.low == 0 && self.high.is_empty()
    }

    /// The value as a single word, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.high.is_empty().then_some(self.low)
    }

    /// Lossy conversion, rounds once the value exceeds 53 significant bits.
    pub fn to_f64(&self) -> f64 {
        self.words()
            .rev()
            .fold(0.0, |acc, word| acc * WORD_RADIX + word as f64)
    }

    pub fn increment(&mut self) {
        self.add_u64(1);
    }

    pub fn add_u64(&mut self, x: u64) {
        let (low, carry) = self.low.overflowing_add(x);
        self.low = low;
        if carry {
            self.carry_from(0);
        }
    }

    /// Ordering against a single word.
    pub fn cmp_u64(&self, x: u64) -> Ordering {
        if self.high.is_empty() {
            self.low.cmp(&x)
        } else {
            Ordering::Greater
        }
    }

    // adds one at high[start], growing by a word when the carry runs off the top
    fn carry_from(&mut self, start: usize) {
        for word in self.high[start..].iter_mut() {
            let (v, carry) = word.overflowing_add(1);
            *word = v;
            if !carry {
                return;
            }
        }
        self.high.push(1);
    }

    fn add_words(&mut self, rhs: &LargeInt) {
        let (low, mut carry) = self.low.overflowing_add(rhs.low);
        self.low = low;
        if self.high.len() < rhs.high.len() {
            self.high.resize(rhs.high.len(), 0);
        }
        for (i, word) in self.high.iter_mut().enumerate() {
            let r = rhs.high.get(i).copied();
            if r.is_none() && !carry {
                break;
            }
            let (s1, c1) = word.overflowing_add(r.unwrap_or(0));
            let (s2, c2) = s1.overflowing_add(carry as u64);
            *word = s2;
            carry = c1 || c2;
        }
        if carry {
            self.high.push(1);
        }
    }

    // self = self * mul + add, used by the decimal parser
    fn mul_add_small(&mut self, mul: u64, add: u64) {
        let mut carry = add as u128;
        for word in std::iter::once(&mut self.low).chain(self.high.iter_mut()) {
            let cur = (*word as u128) * (mul as u128) + carry;
            *word = cur as u64;
            carry = cur >> 64;
        }
        if carry != 0 {
            self.high.push(carry as u64);
        }
    }

    fn trim(&mut self) {
        while self.high.last() == Some(&0) {
            self.high.pop();
        }
    }
}

macro_rules! large_int_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for LargeInt {
            fn from(value: $t) -> Self {
                Self {
                    low: value as u64,
                    high: Vec::new(),
                }
            }
        }
    )*};
}
large_int_from_unsigned!(u8, u16, u32, u64, usize);

impl From<u128> for LargeInt {
    fn from(value: u128) -> Self {
        Self::from_words(&[value as u64, (value >> 64) as u64])
    }
}

impl From<&LargeInt> for f64 {
    fn from(value: &LargeInt) -> Self {
        value.to_f64()
    }
}

impl From<LargeInt> for f64 {
    fn from(value: LargeInt) -> Self {
        value.to_f64()
    }
}

impl AddAssign<&LargeInt> for LargeInt {
    fn add_assign(&mut self, rhs: &LargeInt) {
        self.add_words(rhs);
    }
}

impl AddAssign<LargeInt> for LargeInt {
    fn add_assign(&mut self, rhs: LargeInt) {
        self.add_words(&rhs);
    }
}

impl AddAssign<u64> for LargeInt {
    fn add_assign(&mut self, rhs: u64) {
        self.add_u64(rhs);
    }
}

impl Ord for LargeInt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.word_count()
            .cmp(&other.word_count())
            .then_with(|| self.words().rev().cmp(other.words().rev()))
    }
}

impl PartialOrd for LargeInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LargeInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.high.is_empty() {
            return fmt::Display::fmt(&self.low, f);
        }
        let mut words = self.words().collect::<Vec<_>>();
        let mut chunks = Vec::new();
        while !words.is_empty() {
            let mut rem = 0u128;
            for word in words.iter_mut().rev() {
                let cur = (rem << 64) | *word as u128;
                *word = (cur / DECIMAL_CHUNK as u128) as u64;
                rem = cur % DECIMAL_CHUNK as u128;
            }
            chunks.push(rem as u64);
            while words.last() == Some(&0) {
                words.pop();
            }
        }
        let mut digits = String::with_capacity(chunks.len() * DECIMAL_CHUNK_DIGITS);
        let mut chunks = chunks.into_iter().rev();
        if let Some(first) = chunks.next() {
            digits.push_str(&first.to_string());
        }
        for chunk in chunks {
            digits.push_str(&format!("{chunk:0width$}", width = DECIMAL_CHUNK_DIGITS));
        }
        f.pad_integral(true, "", &digits)
    }
}

impl FromStr for LargeInt {
    type Err = ParseLargeIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix('+').unwrap_or(s);
        if s.is_empty() {
            return Err(ParseLargeIntError::Empty);
        }
        let mut res = LargeInt::new();
        for c in s.chars() {
            let digit = c.to_digit(10).ok_or(ParseLargeIntError::InvalidDigit(c))?;
            res.mul_add_small(10, digit as u64);
        }
        Ok(res)
    }
}
