//! Base-2 logarithmic numbers (spec.md §3 `LnsBase2`, §4.7).
//!
//! [`LnsBase2`] is the L3 arithmetic core: a sign bit plus a signed
//! fixed-point exponent, with multiply/divide done as integer add/sub in
//! log-space. [`Lns`] is the thin L4 surface wrapper adding operator
//! overloads and the `P: ErrorPolicy` dispatch for divide-by-zero
//! (spec.md §2's layering table names `Lns2b` at L3 and `Lns` at L4).

use core::cmp::Ordering;
use core::marker::PhantomData;

use unum_types::{BlockStore, ErrorPolicy, Error, Limb, Result, Signed, Throw};

use crate::policy::NumericPolicy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `value = (-1)^sign * 2^(exponent_raw / 2^F)`, stored as an `N`-bit
/// [`BlockStore`]: bit `N-1` is the represented number's sign, and bits
/// `0..N-1` are `exponent_raw` in `(N-1)`-bit two's complement (spec.md §3).
///
/// Reserved codes carve the most-negative `(N-1)`-bit exponent pattern out
/// of the usable range: with that exponent field, outer sign `0` means
/// `Zero` and outer sign `1` means `NaN` (spec.md §6 reserved patterns).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LnsBase2<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb> {
    store: BlockStore<N, NL, L, Signed>,
    _policy: PhantomData<Policy>,
}

impl<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb> core::fmt::Debug
    for LnsBase2<N, NL, F, Policy, L>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LnsBase2").field("store", &self.store).finish()
    }
}

impl<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb> LnsBase2<N, NL, F, Policy, L> {
    fn exponent_min() -> i64 {
        -(1i64 << (N - 2))
    }

    fn exponent_max() -> i64 {
        (1i64 << (N - 2)) - 1
    }

    fn sign_bit(&self) -> bool {
        self.store.get_bit(N - 1)
    }

    /// Sign-extend the `(N-1)`-bit exponent field from bit `N-2`.
    fn exponent_raw(&self) -> i64 {
        let mut value: i64 = 0;
        for i in 0..N - 1 {
            if self.store.get_bit(i) {
                value |= 1i64 << i;
            }
        }
        if self.store.get_bit(N - 2) {
            value -= 1i64 << (N - 1);
        }
        value
    }

    /// Build from parts, clamping (Saturating) or wrapping (Modulo) an
    /// out-of-range exponent into the `(N-1)`-bit field (spec.md §4.7).
    fn from_parts(sign: bool, exponent_raw: i64) -> Self {
        let clamped = if Policy::SATURATES {
            exponent_raw.clamp(Self::exponent_min() + 1, Self::exponent_max())
        } else {
            let span = 1i64 << (N - 1);
            let wrapped = ((exponent_raw - Self::exponent_min()).rem_euclid(span)) + Self::exponent_min();
            wrapped
        };
        let mut store = BlockStore::<N, NL, L, Signed>::new();
        let bits = clamped as u64 & ((1u64 << (N - 1)) - 1);
        store.set_bits(bits);
        store.set_bit(N - 1, sign);
        Self {
            store,
            _policy: PhantomData,
        }
    }

    /// Builds a reserved Zero/NaN code directly: sign bit plus the
    /// `(N-1)`-bit field's own most-negative pattern (`1·0…0`), bypassing
    /// [`Self::from_parts`]'s `Saturating` clamp (which excludes
    /// `exponent_min()` from the representable range and would silently
    /// round the reserved exponent field up to a non-reserved one).
    fn reserved(sign: bool) -> Self {
        let mut store = BlockStore::<N, NL, L, Signed>::new();
        let bits = Self::exponent_min() as u64 & ((1u64 << (N - 1)) - 1);
        store.set_bits(bits);
        store.set_bit(N - 1, sign);
        Self {
            store,
            _policy: PhantomData,
        }
    }

    pub fn zero() -> Self {
        Self::reserved(false)
    }

    pub fn nan() -> Self {
        Self::reserved(true)
    }

    pub fn is_zero(&self) -> bool {
        !self.sign_bit() && self.exponent_raw() == Self::exponent_min()
    }

    pub fn is_nan(&self) -> bool {
        self.sign_bit() && self.exponent_raw() == Self::exponent_min()
    }

    pub fn from_store(store: BlockStore<N, NL, L, Signed>) -> Self {
        Self {
            store,
            _policy: PhantomData,
        }
    }

    pub fn into_store(self) -> BlockStore<N, NL, L, Signed> {
        self.store
    }

    /// spec.md §4.7 "Multiply": exponents add, signs XOR.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        Self::from_parts(self.sign_bit() ^ other.sign_bit(), self.exponent_raw() + other.exponent_raw())
    }

    /// spec.md §4.7 "Divide": exponents subtract, signs XOR.
    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(Error::DivideByZero);
        }
        if self.is_nan() || other.is_nan() {
            return Ok(Self::nan());
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }
        Ok(Self::from_parts(self.sign_bit() ^ other.sign_bit(), self.exponent_raw() - other.exponent_raw()))
    }

    /// spec.md §4.7 "Add/Sub": deliberately deferred to a host-float
    /// round-trip (SPEC_FULL.md open-question resolution 4 keeps this as
    /// specified; a native log-domain formulation is a documented
    /// follow-up, not implemented here).
    pub fn add(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        Self::from_f64(self.to_f64() + other.to_f64())
    }

    pub fn sub(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        Self::from_f64(self.to_f64() - other.to_f64())
    }

    pub fn to_f64(&self) -> f64 {
        if self.is_nan() {
            return f64::NAN;
        }
        if self.is_zero() {
            return 0.0;
        }
        let exponent = self.exponent_raw() as f64 / (1i64 << F) as f64;
        let magnitude = 2f64.powf(exponent);
        if self.sign_bit() {
            -magnitude
        } else {
            magnitude
        }
    }

    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::nan();
        }
        if value == 0.0 {
            return Self::zero();
        }
        let sign = value < 0.0;
        let magnitude = value.abs();
        if magnitude.is_infinite() {
            return Self::nan();
        }
        let exponent_raw = (magnitude.log2() * (1i64 << F) as f64).round() as i64;
        Self::from_parts(sign, exponent_raw)
    }
}

#[cfg(feature = "serde")]
impl<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb + Serialize> serde::Serialize
    for LnsBase2<N, NL, F, Policy, L>
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        self.store.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb + Deserialize<'de>> serde::Deserialize<'de>
    for LnsBase2<N, NL, F, Policy, L>
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        BlockStore::deserialize(deserializer).map(Self::from_store)
    }
}

#[cfg(feature = "random")]
impl<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb>
    rand::distributions::Distribution<LnsBase2<N, NL, F, Policy, L>> for rand::distributions::Standard
{
    fn sample<Rn: rand::Rng + ?Sized>(&self, rng: &mut Rn) -> LnsBase2<N, NL, F, Policy, L> {
        let limbs = core::array::from_fn(|_| L::from_u64(rng.gen()));
        LnsBase2::from_store(BlockStore::from_limbs(limbs))
    }
}

/// L4 surface wrapper over [`LnsBase2`]; adds operator overloads with a
/// compile-time `P: ErrorPolicy` dispatch for `/`'s divide-by-zero
/// (spec.md §2 layering table, §7).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Lns<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy = Throw> {
    inner: LnsBase2<N, NL, F, Policy, L>,
    _policy: PhantomData<P>,
}

impl<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> core::fmt::Debug
    for Lns<N, NL, F, Policy, L, P>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lns").field("inner", &self.inner).finish()
    }
}

impl<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy>
    Lns<N, NL, F, Policy, L, P>
{
    pub fn zero() -> Self {
        Self {
            inner: LnsBase2::zero(),
            _policy: PhantomData,
        }
    }

    pub fn nan() -> Self {
        Self {
            inner: LnsBase2::nan(),
            _policy: PhantomData,
        }
    }

    pub fn from_inner(inner: LnsBase2<N, NL, F, Policy, L>) -> Self {
        Self {
            inner,
            _policy: PhantomData,
        }
    }

    pub fn into_inner(self) -> LnsBase2<N, NL, F, Policy, L> {
        self.inner
    }

    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }

    pub fn is_nan(&self) -> bool {
        self.inner.is_nan()
    }

    pub fn from_f64(value: f64) -> Self {
        Self::from_inner(LnsBase2::from_f64(value))
    }

    pub fn to_f64(&self) -> f64 {
        self.inner.to_f64()
    }

    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        self.inner.checked_div(&other.inner).map(Self::from_inner)
    }

    fn div_dispatch(&self, other: &Self) -> Self {
        match self.checked_div(other) {
            Ok(v) => v,
            Err(e) if P::RAISES => panic!("Lns division failed: {e}"),
            Err(e) => {
                tracing::warn!(error = %e, "Lns division failed; returning NaN sentinel");
                Self::nan()
            }
        }
    }
}

impl<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> core::ops::Mul
    for Lns<N, NL, F, Policy, L, P>
{
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::from_inner(self.inner.mul(&rhs.inner))
    }
}

impl<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> core::ops::Div
    for Lns<N, NL, F, Policy, L, P>
{
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        self.div_dispatch(&rhs)
    }
}

impl<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> core::ops::Add
    for Lns<N, NL, F, Policy, L, P>
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::from_inner(self.inner.add(&rhs.inner))
    }
}

impl<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> core::ops::Sub
    for Lns<N, NL, F, Policy, L, P>
{
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::from_inner(self.inner.sub(&rhs.inner))
    }
}

impl<const N: usize, const NL: usize, const F: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> PartialOrd
    for Lns<N, NL, F, Policy, L, P>
{
    /// Ordered by represented value; `None` if either side is `NaN`, the
    /// same contract as host-float `PartialOrd`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        self.to_f64().partial_cmp(&other.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Saturating;

    type L16 = Lns<16, 2, 8, Saturating, u8>;

    #[test]
    fn s8_multiply() {
        let a = L16::from_f64(2.0);
        let b = L16::from_f64(3.0);
        let product = a * b;
        assert!((product.to_f64() - 6.0).abs() < 1e-3);
    }

    #[test]
    fn divide_by_zero_errs() {
        let a = L16::from_f64(2.0);
        let zero = L16::zero();
        assert_eq!(a.checked_div(&zero), Err(Error::DivideByZero));
    }

    #[test]
    fn zero_and_nan_reserved_codes_round_trip() {
        assert!(L16::zero().is_zero());
        assert!(L16::nan().is_nan());
    }

    #[test]
    fn add_defers_to_float_round_trip() {
        let a = L16::from_f64(1.0);
        let b = L16::from_f64(1.0);
        let sum = a + b;
        assert!((sum.to_f64() - 2.0).abs() < 1e-2);
    }
}
