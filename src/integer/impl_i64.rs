use num_traits::{One, Zero};
use std::convert::TryFrom;
use std::num::ParseIntError;
use std::str::FromStr;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Int(i64);

impl Int {
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn to_u32(&self) -> Option<u32> {
        u32::try_from(self.0).ok()
    }

    pub fn checked_add(&self, other: &Int) -> Option<Int> {
        self.0.checked_add(other.0).map(Int)
    }

    pub fn checked_sub(&self, other: &Int) -> Option<Int> {
        self.0.checked_sub(other.0).map(Int)
    }

    pub fn checked_mul(&self, other: &Int) -> Option<Int> {
        self.0.checked_mul(other.0).map(Int)
    }

    pub fn checked_neg(&self) -> Option<Int> {
        self.0.checked_neg().map(Int)
    }

    pub fn checked_abs(&self) -> Option<Int> {
        self.0.checked_abs().map(Int)
    }

    /// Truncating division.
    pub fn checked_quotient(&self, other: &Int) -> Option<Int> {
        self.0.checked_div(other.0).map(Int)
    }

    pub fn checked_rem(&self, other: &Int) -> Option<Int> {
        self.0.checked_rem(other.0).map(Int)
    }

    pub fn checked_pow(&self, exp: u32) -> Option<Int> {
        self.0.checked_pow(exp).map(Int)
    }
}

impl Zero for Int {
    fn zero() -> Self {
        Int(i64::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Int {
    fn one() -> Self {
        Int(i64::one())
    }
}

// needed by `Zero`
impl std::ops::Add for Int {
    type Output = Int;
    fn add(self, other: Int) -> Int {
        Int(self.0 + other.0)
    }
}

// needed by `One`
impl std::ops::Mul for Int {
    type Output = Int;
    fn mul(self, other: Int) -> Int {
        Int(self.0 * other.0)
    }
}

impl From<i64> for Int {
    fn from(x: i64) -> Self {
        Int(x)
    }
}

impl FromStr for Int {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Int(i64::from_str(s)?))
    }
}

impl std::fmt::Display for Int {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for Int {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
