//! Tapered-precision posits, the L4 surface wrapper over `unum-codec`'s
//! [`PositCodec`]/[`Triple`] (spec.md §3 `Posit`, §4.5, §2 layering table).

use core::cmp::Ordering;
use core::marker::PhantomData;

use unum_codec::{PositBits, PositCodec};
use unum_types::{ErrorPolicy, Error, Limb, Result, Sentinel};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An `N`-bit, `E`-exponent-bit posit with a compile-time `P: ErrorPolicy`
/// governing whether a NaR operand or a zero divisor panics (`Throw`) or
/// silently yields NaR (`Sentinel`, the default — NaR is already posit's
/// natural sentinel value, unlike [`crate::Integer`] which defaults to
/// `Throw`).
///
/// `QBITS`/`QLIMBS` size the shared [`unum_codec::Triple`] staging buffer;
/// see that crate's module docs for the `QBITS >= N+3+E` / `QBITS <= 128`
/// constraints every named alias in [`crate::types`] is checked against.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Posit<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb, P: ErrorPolicy = Sentinel>
{
    bits: PositBits<N, NL, L>,
    _policy: PhantomData<P>,
}

impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb, P: ErrorPolicy>
    core::fmt::Debug for Posit<N, NL, E, QBITS, QLIMBS, L, P>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Posit").field("bits", &self.bits).finish()
    }
}

impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb, P: ErrorPolicy>
    Posit<N, NL, E, QBITS, QLIMBS, L, P>
{
    pub fn zero() -> Self {
        Self {
            bits: PositBits::<N, NL, L>::new(),
            _policy: PhantomData,
        }
    }

    /// The reserved "not a real" code: sign bit set, all else zero.
    pub fn nar() -> Self {
        let mut bits = PositBits::<N, NL, L>::new();
        bits.set_bit(N - 1, true);
        Self { bits, _policy: PhantomData }
    }

    pub fn from_bits(bits: PositBits<N, NL, L>) -> Self {
        Self { bits, _policy: PhantomData }
    }

    pub fn into_bits(self) -> PositBits<N, NL, L> {
        self.bits
    }

    pub fn is_zero(&self) -> bool {
        self.bits.is_zero()
    }

    pub fn is_nar(&self) -> bool {
        self.bits.get_bit(N - 1) && (0..N - 1).all(|i| !self.bits.get_bit(i))
    }

    pub fn from_f64(value: f64) -> Self {
        Self::from_bits(<Self as HasCodec>::Codec::from_float(value))
    }

    pub fn to_f64(&self) -> f64 {
        <Self as HasCodec>::Codec::to_f64(&self.bits)
    }

    /// spec.md §4.5 "Reciprocal of a posit".
    pub fn reciprocal(&self) -> Self {
        Self::from_bits(<Self as HasCodec>::Codec::reciprocal(&self.bits))
    }

    /// Raw two's-complement `+1`/`-1` on the backing bits, with no guard
    /// against crossing the Zero/NaR boundary (SPEC_FULL.md open-question
    /// resolution 2: intentional, matching the original's `operator++`;
    /// this is what lets an exhaustive round-trip test walk all `2^N`
    /// codes with a single loop).
    pub fn increment(&mut self) {
        self.bits.increment();
    }

    pub fn decrement(&mut self) {
        self.bits.decrement();
    }

    fn reject_nar(&self, other: &Self) -> Result<()> {
        if self.is_nar() || other.is_nar() {
            return Err(Error::OperandIsNaR);
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.reject_nar(other)?;
        let a = <Self as HasCodec>::Codec::decode(&self.bits);
        let b = <Self as HasCodec>::Codec::decode(&other.bits);
        Ok(Self::from_bits(<Self as HasCodec>::Codec::encode(&a.add(&b))))
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.checked_add(&other.neg())
    }

    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        self.reject_nar(other)?;
        let a = <Self as HasCodec>::Codec::decode(&self.bits);
        let b = <Self as HasCodec>::Codec::decode(&other.bits);
        Ok(Self::from_bits(<Self as HasCodec>::Codec::encode(&a.mul(&b))))
    }

    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        self.reject_nar(other)?;
        if other.is_zero() {
            return Err(Error::DivideByZero);
        }
        let a = <Self as HasCodec>::Codec::decode(&self.bits);
        let b = <Self as HasCodec>::Codec::decode(&other.bits);
        Ok(Self::from_bits(<Self as HasCodec>::Codec::encode(&a.div(&b))))
    }

    /// Short-circuits for Zero and NaR (returns `self`) before two's
    /// complementing, matching the original `posit::operator-` (SPEC_FULL.md
    /// §2 supplement).
    pub fn neg(&self) -> Self {
        if self.is_zero() || self.is_nar() {
            return *self;
        }
        let mut bits = self.bits;
        bits.twos_complement();
        Self::from_bits(bits)
    }

    fn dispatch<F: FnOnce() -> Result<Self>>(f: F) -> Self {
        match f() {
            Ok(v) => v,
            Err(e) if P::RAISES => panic!("posit arithmetic failed: {e}"),
            Err(e) => {
                tracing::warn!(error = %e, "posit arithmetic failed; returning NaR sentinel");
                Self::nar()
            }
        }
    }

    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        if self.is_nar() || other.is_nar() {
            return None;
        }
        Some(self.bits.compare(&other.bits))
    }
}

#[cfg(feature = "serde")]
impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb + Serialize, P: ErrorPolicy>
    serde::Serialize for Posit<N, NL, E, QBITS, QLIMBS, L, P>
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        self.bits.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb + Deserialize<'de>, P: ErrorPolicy>
    serde::Deserialize<'de> for Posit<N, NL, E, QBITS, QLIMBS, L, P>
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        PositBits::deserialize(deserializer).map(Self::from_bits)
    }
}

#[cfg(feature = "random")]
impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb, P: ErrorPolicy>
    rand::distributions::Distribution<Posit<N, NL, E, QBITS, QLIMBS, L, P>> for rand::distributions::Standard
{
    fn sample<Rn: rand::Rng + ?Sized>(&self, rng: &mut Rn) -> Posit<N, NL, E, QBITS, QLIMBS, L, P> {
        let limbs = core::array::from_fn(|_| L::from_u64(rng.gen()));
        Posit::from_bits(PositBits::from_limbs(limbs))
    }
}

/// Projection trait used only to name `PositCodec<...>` without repeating
/// every const-generic parameter at each call site inside the impl block
/// above.
trait HasCodec {
    type Codec;
}

impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb, P: ErrorPolicy> HasCodec
    for Posit<N, NL, E, QBITS, QLIMBS, L, P>
{
    type Codec = PositCodec<N, NL, E, QBITS, QLIMBS, L>;
}

impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb, P: ErrorPolicy> core::ops::Add
    for Posit<N, NL, E, QBITS, QLIMBS, L, P>
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::dispatch(|| self.checked_add(&rhs))
    }
}

impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb, P: ErrorPolicy> core::ops::Sub
    for Posit<N, NL, E, QBITS, QLIMBS, L, P>
{
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::dispatch(|| self.checked_sub(&rhs))
    }
}

impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb, P: ErrorPolicy> core::ops::Mul
    for Posit<N, NL, E, QBITS, QLIMBS, L, P>
{
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::dispatch(|| self.checked_mul(&rhs))
    }
}

impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb, P: ErrorPolicy> core::ops::Div
    for Posit<N, NL, E, QBITS, QLIMBS, L, P>
{
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::dispatch(|| self.checked_div(&rhs))
    }
}

impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb, P: ErrorPolicy> core::ops::Neg
    for Posit<N, NL, E, QBITS, QLIMBS, L, P>
{
    type Output = Self;
    fn neg(self) -> Self {
        Posit::neg(&self)
    }
}

impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb, P: ErrorPolicy> PartialOrd
    for Posit<N, NL, E, QBITS, QLIMBS, L, P>
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unum_types::Throw;

    type P8 = Posit<8, 1, 0, 32, 4, u8>;
    type P8Throw = Posit<8, 1, 0, 32, 4, u8, Throw>;

    #[test]
    fn s1_one_times_one() {
        let one = P8::from_f64(1.0);
        assert_eq!((one * one).to_f64(), 1.0);
    }

    #[test]
    fn s3_nar_propagates_under_sentinel() {
        let nar = P8::nar();
        let one = P8::from_f64(1.0);
        assert!((nar * one).is_nar());
        assert!((one + nar).is_nar());
    }

    #[test]
    #[should_panic]
    fn s3_nar_panics_under_throw() {
        let nar = P8Throw::nar();
        let one = P8Throw::from_f64(1.0);
        let _ = nar * one;
    }

    #[test]
    fn s4_sign_involution() {
        let p = P8::from_f64(1.5);
        assert_eq!(-(-p), p);
    }

    #[test]
    fn reciprocal_of_power_of_two_is_exact() {
        let two = P8::from_f64(2.0);
        let half = two.reciprocal();
        assert_eq!(half.to_f64(), 0.5);
    }

    #[test]
    fn increment_decrement_round_trip() {
        let mut p = P8::from_f64(1.0);
        p.increment();
        p.decrement();
        assert_eq!(p.to_f64(), 1.0);
    }

    #[test]
    fn divide_by_zero_is_classified() {
        let one = P8Throw::from_f64(1.0);
        assert_eq!(one.checked_div(&P8Throw::zero()), Err(Error::DivideByZero));
    }
}
