//! Binary fixed-point numbers with a configurable radix split
//! (spec.md §3 `FixedPoint`, §4.3).
//!
//! Unlike [`crate::BigInteger`] (L1 core) and [`crate::Integer`] (L4
//! wrapper), `FixedPoint` plays both roles itself: spec.md §2's layering
//! table names it once in the L1 row and again in the L4 "surface types"
//! row, so this single type carries both the rounding-aware arithmetic
//! core and the ergonomic operator surface.

use core::cmp::Ordering;
use core::marker::PhantomData;

use unum_types::{round_to_nearest_even, BlockStore, ErrorPolicy, Error, Limb, Result, RoundInput, Signed, Throw, Unsigned};

use crate::knuth::{self, Digits, MAX_DIGITS};
use crate::policy::NumericPolicy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An `N`-bit two's-complement [`BlockStore`] value interpreted as
/// `signed_integer / 2^R`, with a compile-time overflow `Policy`
/// (spec.md §3 `FixedPoint`) and a compile-time `P` error-reporting policy
/// for `checked_div`'s failure modes (spec.md §7).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy = Throw>
{
    store: BlockStore<N, NL, L, Signed>,
    _policy: PhantomData<(Policy, P)>,
}

impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> core::fmt::Debug
    for FixedPoint<N, R, NL, Policy, L, P>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FixedPoint").field("store", &self.store).finish()
    }
}

impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> Default
    for FixedPoint<N, R, NL, Policy, L, P>
{
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy>
    FixedPoint<N, R, NL, Policy, L, P>
{
    pub fn zero() -> Self {
        Self {
            store: BlockStore::new(),
            _policy: PhantomData,
        }
    }

    pub fn from_store(store: BlockStore<N, NL, L, Signed>) -> Self {
        Self { store, _policy: PhantomData }
    }

    pub fn into_store(self) -> BlockStore<N, NL, L, Signed> {
        self.store
    }

    pub fn is_negative(&self) -> bool {
        N > 0 && self.store.get_bit(N - 1)
    }

    pub fn is_zero(&self) -> bool {
        self.store.is_zero()
    }

    /// The largest representable value: `0111...1`.
    pub fn max_value() -> Self {
        let mut store = BlockStore::<N, NL, L, Signed>::new();
        for i in 0..N.saturating_sub(1) {
            store.set_bit(i, true);
        }
        Self::from_store(store)
    }

    /// The smallest (most negative) representable value: `1000...0`.
    pub fn min_value() -> Self {
        let mut store = BlockStore::<N, NL, L, Signed>::new();
        store.set_bit(N - 1, true);
        Self::from_store(store)
    }

    fn abs_unsigned(&self) -> BlockStore<N, NL, L, Unsigned> {
        let mut u = BlockStore::<N, NL, L, Unsigned>::from_limbs(self.store.into_limbs());
        if self.is_negative() {
            u.twos_complement();
        }
        u
    }

    fn from_unsigned_with_sign(magnitude: BlockStore<N, NL, L, Unsigned>, negative: bool) -> Self {
        let mut signed = BlockStore::<N, NL, L, Signed>::from_limbs(magnitude.into_limbs());
        if negative {
            signed.twos_complement();
        }
        Self::from_store(signed)
    }

    /// `self + other`. Wraps modulo `2^N` under [`crate::policy::Modulo`];
    /// clamps to [`Self::max_value`]/[`Self::min_value`] under
    /// [`crate::policy::Saturating`] on signed overflow (spec.md §8 S7).
    pub fn add(&self, other: &Self) -> Self {
        let a_neg = self.is_negative();
        let b_neg = other.is_negative();
        let mut sum_store = self.store;
        sum_store.add_assign(&other.store);
        let sum = Self::from_store(sum_store);
        if Policy::SATURATES && a_neg == b_neg && sum.is_negative() != a_neg {
            return if a_neg { Self::min_value() } else { Self::max_value() };
        }
        sum
    }

    pub fn sub(&self, other: &Self) -> Self {
        let mut negated = other.store;
        negated.twos_complement();
        self.add(&Self::from_store(negated))
    }

    /// spec.md §4.3 "Multiply": a `2N`-bit product, round-to-nearest-even
    /// at bit `R`, shift right by `R` to restore the implicit scale.
    pub fn mul(&self, other: &Self) -> Self {
        let a_neg = self.is_negative();
        let b_neg = other.is_negative();
        let da = to_digits::<N, NL, L>(&self.abs_unsigned());
        let db = to_digits::<N, NL, L>(&other.abs_unsigned());
        let product = knuth::multiply_digits(&da, &db);

        let guard = R > 0 && knuth::bit(&product, R - 1);
        let round = R > 1 && knuth::bit(&product, R - 2);
        let sticky = R > 2 && knuth::any_below(&product, R - 2);
        let shifted = knuth::shift_right(&product, R);
        let lsb = knuth::bit(&shifted, 0);
        let round_up = round_to_nearest_even(RoundInput { guard, round, sticky, lsb });

        let overflows = ((N - 1)..MAX_DIGITS * 64).any(|i| knuth::bit(&shifted, i));

        let mut magnitude = from_digits::<N, NL, L>(&shifted);
        if round_up {
            magnitude.increment();
        }
        let negative = a_neg ^ b_neg;
        if Policy::SATURATES && overflows {
            return if negative { Self::min_value() } else { Self::max_value() };
        }
        Self::from_unsigned_with_sign(magnitude, negative)
    }

    /// spec.md §4.3 "Divide": scale the dividend up by `R` bits before a
    /// plain (Knuth-D) integer divide, restoring the quotient's implicit
    /// scale. Under [`crate::policy::Saturating`] this is
    /// [`Error::UnsupportedFormat`] (SPEC_FULL.md open-question resolution
    /// 3: marked TBD in the source, left unimplemented here too).
    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        if Policy::SATURATES {
            return Err(Error::UnsupportedFormat);
        }
        if other.is_zero() {
            return Err(Error::DivideByZero);
        }
        let a_neg = self.is_negative();
        let b_neg = other.is_negative();
        let mut scaled_a = to_digits::<N, NL, L>(&self.abs_unsigned());
        scaled_a = knuth::shift_left_into(&scaled_a, R as u32);
        let db = to_digits::<N, NL, L>(&other.abs_unsigned());
        let (q, _r) = knuth::divmod(&scaled_a, &db);
        let magnitude = from_digits::<N, NL, L>(&q);
        Ok(Self::from_unsigned_with_sign(magnitude, a_neg ^ b_neg))
    }

    /// Operator-surface `/`: panics on `P = Throw` (the default), returns
    /// zero and logs via `tracing::warn!` on `P = Sentinel` (spec.md §7).
    fn div_dispatch(&self, other: &Self) -> Self {
        match self.checked_div(other) {
            Ok(v) => v,
            Err(e) if P::RAISES => panic!("FixedPoint division failed: {e}"),
            Err(e) => {
                tracing::warn!(error = %e, "FixedPoint division failed; returning zero sentinel");
                Self::zero()
            }
        }
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        self.store.compare(&other.store)
    }

    pub fn to_f64(&self) -> f64 {
        let negative = self.is_negative();
        let magnitude = self.abs_unsigned();
        let mut value = 0.0f64;
        for i in (0..N).rev() {
            value *= 2.0;
            if magnitude.get_bit(i) {
                value += 1.0;
            }
        }
        value /= 2f64.powi(R as i32);
        if negative {
            -value
        } else {
            value
        }
    }

    /// Converts from a host `f64` by scaling by `2^R` and rounding to the
    /// nearest integer, then storing the low `N` bits.
    pub fn from_f64(value: f64) -> Self {
        let scaled = (value * 2f64.powi(R as i32)).round();
        let negative = scaled < 0.0;
        let magnitude = scaled.abs() as u64;
        let mut store = BlockStore::<N, NL, L, Signed>::new();
        store.set_bits(magnitude);
        if negative {
            store.twos_complement();
        }
        Self::from_store(store)
    }

    /// spec.md §6 "Decimal": the integer part followed by exactly `R`
    /// base-10 fractional digits, computed exactly (no float round-off) by
    /// repeatedly multiplying the `R`-bit fraction by ten.
    #[cfg(feature = "alloc")]
    pub fn to_decimal(&self) -> alloc::string::String {
        use alloc::string::String;
        use core::fmt::Write;

        let negative = self.is_negative();
        let magnitude = self.abs_unsigned();
        let int_part: u128 = {
            let mut v: u128 = 0;
            for i in (R..N).rev() {
                v = (v << 1) | magnitude.get_bit(i) as u128;
            }
            v
        };
        let mut frac: u128 = 0;
        for i in (0..R.min(127)).rev() {
            frac = (frac << 1) | magnitude.get_bit(i) as u128;
        }

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        let _ = write!(out, "{int_part}");
        if R > 0 {
            out.push('.');
            for _ in 0..R {
                frac *= 10;
                let digit = frac >> R.min(127);
                frac &= (1u128 << R.min(127)) - 1;
                let _ = write!(out, "{digit}");
            }
        }
        out
    }
}

impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> core::ops::Add
    for FixedPoint<N, R, NL, Policy, L, P>
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        FixedPoint::add(&self, &rhs)
    }
}

impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> core::ops::Sub
    for FixedPoint<N, R, NL, Policy, L, P>
{
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        FixedPoint::sub(&self, &rhs)
    }
}

impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> core::ops::Mul
    for FixedPoint<N, R, NL, Policy, L, P>
{
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        FixedPoint::mul(&self, &rhs)
    }
}

impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> core::ops::Div
    for FixedPoint<N, R, NL, Policy, L, P>
{
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        self.div_dispatch(&rhs)
    }
}

impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> core::ops::Neg
    for FixedPoint<N, R, NL, Policy, L, P>
{
    type Output = Self;
    fn neg(self) -> Self {
        Self::zero().sub(&self)
    }
}

impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> PartialOrd
    for FixedPoint<N, R, NL, Policy, L, P>
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy> Ord
    for FixedPoint<N, R, NL, Policy, L, P>
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

#[cfg(feature = "serde")]
impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb + Serialize, P: ErrorPolicy> serde::Serialize
    for FixedPoint<N, R, NL, Policy, L, P>
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        self.store.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb + Deserialize<'de>, P: ErrorPolicy> serde::Deserialize<'de>
    for FixedPoint<N, R, NL, Policy, L, P>
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        BlockStore::deserialize(deserializer).map(Self::from_store)
    }
}

#[cfg(feature = "random")]
impl<const N: usize, const R: usize, const NL: usize, Policy: NumericPolicy, L: Limb, P: ErrorPolicy>
    rand::distributions::Distribution<FixedPoint<N, R, NL, Policy, L, P>> for rand::distributions::Standard
{
    fn sample<Rn: rand::Rng + ?Sized>(&self, rng: &mut Rn) -> FixedPoint<N, R, NL, Policy, L, P> {
        let limbs = core::array::from_fn(|_| L::from_u64(rng.gen()));
        FixedPoint::from_store(BlockStore::from_limbs(limbs))
    }
}

/// Pack an `Unsigned`-tagged store's bits into [`knuth`]'s u64
/// super-digits, independent of the caller's limb width. Identical in
/// shape to [`crate::big_integer`]'s private helper of the same name; kept
/// local since `FixedPoint` needs the same packing for its rounding-aware
/// multiply/divide but the two modules have no shared dependency edge.
fn to_digits<const N: usize, const NL: usize, L: Limb>(store: &BlockStore<N, NL, L, Unsigned>) -> Digits {
    let mut digits = [0u64; MAX_DIGITS];
    for i in 0..N {
        if store.get_bit(i) {
            let digit = i / 64;
            if digit < MAX_DIGITS {
                digits[digit] |= 1u64 << (i % 64);
            }
        }
    }
    digits
}

fn from_digits<const N: usize, const NL: usize, L: Limb>(digits: &Digits) -> BlockStore<N, NL, L, Unsigned> {
    let mut store = BlockStore::new();
    for i in 0..N {
        let digit = i / 64;
        if digit < MAX_DIGITS && (digits[digit] >> (i % 64)) & 1 == 1 {
            store.set_bit(i, true);
        }
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Modulo, Saturating};

    type Fx16_8 = FixedPoint<16, 8, 2, Modulo, u8>;
    type Fx8_4Sat = FixedPoint<8, 4, 1, Saturating, u8>;

    #[test]
    fn s6_multiply_exact() {
        let a = Fx16_8::from_f64(4.25);
        let b = Fx16_8::from_f64(2.00);
        let product = a.mul(&b);
        assert_eq!(product.to_f64(), 8.5);
    }

    #[test]
    fn s7_saturating_add_clamps() {
        let a = Fx8_4Sat::from_f64(7.9375); // maxpos for (8,4)
        let b = Fx8_4Sat::from_f64(0.0625);
        let sum = a.add(&b);
        assert_eq!(sum, Fx8_4Sat::max_value());
    }

    #[test]
    fn add_sub_round_trip() {
        let a = Fx16_8::from_f64(1.5);
        let b = Fx16_8::from_f64(0.25);
        let sum = a.add(&b);
        assert_eq!(sum.to_f64(), 1.75);
        let back = sum.sub(&b);
        assert_eq!(back.to_f64(), 1.5);
    }

    #[test]
    fn divide_recovers_quotient() {
        let a = Fx16_8::from_f64(9.0);
        let b = Fx16_8::from_f64(3.0);
        let q = a.checked_div(&b).unwrap();
        assert_eq!(q.to_f64(), 3.0);
    }

    #[test]
    fn saturating_divide_is_unsupported() {
        let a = Fx8_4Sat::from_f64(1.0);
        let b = Fx8_4Sat::from_f64(2.0);
        assert_eq!(a.checked_div(&b), Err(Error::UnsupportedFormat));
    }

    #[test]
    fn divide_by_zero_errs() {
        let a = Fx16_8::from_f64(1.0);
        let zero = Fx16_8::zero();
        assert_eq!(a.checked_div(&zero), Err(Error::DivideByZero));
    }
}
