//! L4 surface wrapper over [`crate::BigInteger`]: operator overloads, a
//! compile-time `P: ErrorPolicy` dispatch, `Display`/`FromStr` (spec.md §2
//! layering table names `BigInteger` at L1 and `Integer` at L4).

use core::marker::PhantomData;
use core::str::FromStr;

use unum_types::{BlockStore, ErrorPolicy, Error, Limb, Result, Signed, Throw};

use crate::big_integer::BigInteger;
use crate::policy::IntegerKind;

/// `Integer`/`Whole`/`Natural`'s thin surface: every fallible op panics
/// under `Throw` (the default — matching how `std` integer overflow
/// panics in debug builds) or logs and returns the all-zero value under
/// `Sentinel`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Integer<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy = Throw> {
    inner: BigInteger<N, NL, K, L>,
    _policy: PhantomData<P>,
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> core::fmt::Debug
    for Integer<N, NL, K, L, P>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Integer").field("inner", &self.inner).finish()
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> Default for Integer<N, NL, K, L, P> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> Integer<N, NL, K, L, P> {
    pub fn zero() -> Self {
        Self::from_inner(BigInteger::zero())
    }

    pub fn from_inner(inner: BigInteger<N, NL, K, L>) -> Self {
        Self { inner, _policy: PhantomData }
    }

    pub fn into_inner(self) -> BigInteger<N, NL, K, L> {
        self.inner
    }

    pub fn is_negative(&self) -> bool {
        self.inner.is_negative()
    }

    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }

    pub fn from_f64(value: f64) -> Self {
        Self::from_inner(BigInteger::from_f64(value))
    }

    pub fn to_f64(&self) -> f64 {
        self.inner.to_f64()
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.inner.checked_add(&other.inner).map(Self::from_inner)
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.inner.checked_sub(&other.inner).map(Self::from_inner)
    }

    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        self.inner.checked_mul(&other.inner).map(Self::from_inner)
    }

    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        self.inner.checked_div(&other.inner).map(Self::from_inner)
    }

    pub fn checked_rem(&self, other: &Self) -> Result<Self> {
        self.inner.checked_rem(&other.inner).map(Self::from_inner)
    }

    fn dispatch<F: FnOnce() -> Result<Self>>(f: F) -> Self {
        match f() {
            Ok(v) => v,
            Err(e) if P::RAISES => panic!("integer arithmetic failed: {e}"),
            Err(e) => {
                tracing::warn!(error = %e, "integer arithmetic failed; returning zero sentinel");
                Self::zero()
            }
        }
    }

    #[cfg(feature = "alloc")]
    pub fn to_decimal(&self) -> alloc::string::String {
        self.inner.to_decimal()
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> core::ops::Add for Integer<N, NL, K, L, P> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::dispatch(|| self.checked_add(&rhs))
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> core::ops::Sub for Integer<N, NL, K, L, P> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::dispatch(|| self.checked_sub(&rhs))
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> core::ops::Mul for Integer<N, NL, K, L, P> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::dispatch(|| self.checked_mul(&rhs))
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> core::ops::Div for Integer<N, NL, K, L, P> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::dispatch(|| self.checked_div(&rhs))
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> core::ops::Rem for Integer<N, NL, K, L, P> {
    type Output = Self;
    fn rem(self, rhs: Self) -> Self {
        Self::dispatch(|| self.checked_rem(&rhs))
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> core::ops::Neg for Integer<N, NL, K, L, P> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::dispatch(|| Self::zero().checked_sub(&self))
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> PartialOrd for Integer<N, NL, K, L, P> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> Ord for Integer<N, NL, K, L, P> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.inner.into_store().compare(&other.inner.into_store())
    }
}

#[cfg(feature = "std")]
impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> core::fmt::Display
    for Integer<N, NL, K, L, P>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb, P: ErrorPolicy> FromStr for Integer<N, NL, K, L, P> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BigInteger::parse(s).map(Self::from_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Integer as IntegerKindMarker;
    use unum_types::Sentinel;

    type I64 = Integer<64, 8, IntegerKindMarker, u8>;
    type I64Sentinel = Integer<64, 8, IntegerKindMarker, u8, Sentinel>;

    #[test]
    fn add_and_display_round_trip() {
        let a = I64::from_f64(40.0);
        let b = I64::from_f64(2.0);
        let sum = a + b;
        assert_eq!(sum.to_f64(), 42.0);
    }

    #[test]
    fn from_str_round_trips_through_display() {
        let value: I64 = "-12345".parse().unwrap();
        assert_eq!(value.to_f64(), -12345.0);
    }

    #[test]
    fn divide_by_zero_sentinel_yields_zero() {
        let a = I64Sentinel::from_f64(10.0);
        let zero = I64Sentinel::zero();
        let result = a / zero;
        assert!(result.is_zero());
    }

    #[test]
    #[should_panic]
    fn divide_by_zero_throw_panics() {
        let a = I64::from_f64(10.0);
        let zero = I64::zero();
        let _ = a / zero;
    }

    #[test]
    fn ordering_matches_signed_value() {
        let a = I64::from_f64(-5.0);
        let b = I64::from_f64(3.0);
        assert!(a < b);
    }
}
