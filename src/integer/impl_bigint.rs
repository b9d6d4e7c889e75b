use num_bigint::{BigInt, ParseBigIntError, Sign};
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};
use std::str::FromStr;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Int(BigInt);

impl Int {
    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.0.to_u32()
    }

    pub fn checked_add(&self, other: &Int) -> Option<Int> {
        Some(Int(&self.0 + &other.0))
    }

    pub fn checked_sub(&self, other: &Int) -> Option<Int> {
        Some(Int(&self.0 - &other.0))
    }

    pub fn checked_mul(&self, other: &Int) -> Option<Int> {
        Some(Int(&self.0 * &other.0))
    }

    pub fn checked_neg(&self) -> Option<Int> {
        Some(Int(-&self.0))
    }

    pub fn checked_abs(&self) -> Option<Int> {
        Some(Int(self.0.abs()))
    }

    /// Truncating division.
    pub fn checked_quotient(&self, other: &Int) -> Option<Int> {
        if other.0.is_zero() {
            None
        } else {
            Some(Int(&self.0 / &other.0))
        }
    }

    pub fn checked_rem(&self, other: &Int) -> Option<Int> {
        if other.0.is_zero() {
            None
        } else {
            Some(Int(&self.0 % &other.0))
        }
    }

    pub fn checked_pow(&self, exp: u32) -> Option<Int> {
        Some(Int(Pow::pow(&self.0, exp)))
    }
}

impl Zero for Int {
    fn zero() -> Self {
        Int(BigInt::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Int {
    fn one() -> Self {
        Int(BigInt::one())
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
        Int(BigInt::from(x))
    }
}

impl FromStr for Int {
    type Err = ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Int(BigInt::from_str(s)?))
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
