#[cfg(feature = "bigint")]
mod impl_bigint;

#[cfg(not(feature = "bigint"))]
mod impl_i64;

#[cfg(feature = "bigint")]
pub use impl_bigint::Int;

#[cfg(not(feature = "bigint"))]
pub use impl_i64::Int;

use num_traits::Zero;

impl Int {
    /// Modulo with the sign of the divisor; `None` on division by zero.
    pub fn checked_modulo(&self, other: &Int) -> Option<Int> {
        let r = self.checked_rem(other)?;
        if !r.is_zero() && (r.is_negative() != other.is_negative()) {
            r.checked_add(other)
        } else {
            Some(r)
        }
    }
}
