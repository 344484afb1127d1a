//! Fixed-width signed integer built on [`BlockStore`] (spec.md §4.2).

use core::marker::PhantomData;

use unum_types::{BlockStore, Error, Limb, Result, Signed, Unsigned};

use crate::knuth::{self, Digits, MAX_DIGITS};
use crate::policy::IntegerKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An `N`-bit two's-complement integer with a value-range policy `K`
/// (spec.md §3 `BigInteger`).
///
/// `N` must fit within `knuth::MAX_DIGITS * 64` bits for division to be
/// sound; every named type alias in [`crate::types`] is checked against
/// that bound with `static_assertions`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BigInteger<const N: usize, const NL: usize, K: IntegerKind, L: Limb> {
    store: BlockStore<N, NL, L, Signed>,
    _kind: PhantomData<K>,
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb> core::fmt::Debug for BigInteger<N, NL, K, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BigInteger").field("store", &self.store).finish()
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb> Default for BigInteger<N, NL, K, L> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb> BigInteger<N, NL, K, L> {
    pub fn zero() -> Self {
        Self {
            store: BlockStore::new(),
            _kind: PhantomData,
        }
    }

    pub fn from_store(store: BlockStore<N, NL, L, Signed>) -> Self {
        Self { store, _kind: PhantomData }
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

    /// `|self|` as an `Unsigned`-tagged store of the same width. `N`'s
    /// most-negative value is its own absolute value modulo `2^N` (the same
    /// corner case spec.md §4.2 handles with an `N+1`-bit staging integer);
    /// since every operation here ultimately truncates to `N` bits anyway
    /// (`Integer`'s policy is explicitly modular), working mod `2^N`
    /// throughout needs no extra staging width.
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

    fn check_result_policy(&self, result_negative: bool, result_zero: bool) -> Result<()> {
        if K::FORBIDS_NEGATIVE && result_negative {
            return Err(Error::NegativeNotAllowed);
        }
        if K::FORBIDS_ZERO && result_zero {
            return Err(Error::NonRepresentableZero);
        }
        Ok(())
    }

    /// `Whole`/`Natural` gate only `sub`/`div` per spec.md §4.2's Contract
    /// (the data model's "every observable state" wording is about the
    /// type's constructors, not every arithmetic op); add is unchecked.
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        let mut store = self.store;
        store.add_assign(&other.store);
        Ok(Self::from_store(store))
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        let mut store = self.store;
        store.sub_assign(&other.store);
        let result = Self::from_store(store);
        result.check_result_policy(result.is_negative(), result.is_zero())?;
        Ok(result)
    }

    /// spec.md §4.2 "Multiply". Sign-aware, modular in `N` bits (`Integer`
    /// policy); `Whole`/`Natural` operands are never negative to begin
    /// with, so the sign-aware path degenerates to a plain unsigned
    /// multiply for them.
    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        let a_neg = self.is_negative();
        let b_neg = other.is_negative();
        let product = Self::unsigned_multiply(&self.abs_unsigned(), &other.abs_unsigned());
        Ok(Self::from_unsigned_with_sign(product, a_neg ^ b_neg))
    }

    /// Schoolbook multiply using [`Limb::widening_mul`] for each limb pair,
    /// accumulated via `BlockStore::add_assign` (which already carries and
    /// truncates to `N` bits correctly). This is the generic backend of
    /// spec.md §4.2's multiply contract; when `L = u64` the per-pair
    /// `widening_mul` is a single hardware 128-bit multiply (the "fast
    /// path"), and for narrower limbs it is the same "promote to the next
    /// width up and multiply" schoolbook step, so one implementation
    /// serves both backends the spec names.
    fn unsigned_multiply(
        a: &BlockStore<N, NL, L, Unsigned>,
        b: &BlockStore<N, NL, L, Unsigned>,
    ) -> BlockStore<N, NL, L, Unsigned> {
        let mut result = BlockStore::<N, NL, L, Unsigned>::new();
        for i in 0..NL {
            let ai = a.get_limb(i);
            if ai == L::ZERO {
                continue;
            }
            let mut partial = BlockStore::<N, NL, L, Unsigned>::new();
            let mut carry = L::ZERO;
            for j in 0..NL {
                let idx = i + j;
                if idx >= NL {
                    break;
                }
                let bj = b.get_limb(j);
                let (lo, hi) = ai.widening_mul(bj);
                let (lo_plus_carry, carry_bit) = lo.adc(carry, false);
                partial.set_limb(idx, lo_plus_carry);
                carry = hi.adc(L::ZERO, carry_bit).0;
            }
            result.add_assign(&partial);
        }
        result
    }

    /// spec.md §4.2 "Division (Knuth Algorithm D)". Returns `(quotient,
    /// remainder)` with `remainder`'s sign matching the dividend's, as
    /// required by spec.md §8 property 6.
    pub fn checked_div_rem(&self, other: &Self) -> Result<(Self, Self)> {
        if other.is_zero() {
            return Err(Error::DivideByZero);
        }
        let a_neg = self.is_negative();
        let b_neg = other.is_negative();
        let a_digits = to_digits(&self.abs_unsigned());
        let b_digits = to_digits(&other.abs_unsigned());
        let (q_digits, r_digits) = knuth::divmod(&a_digits, &b_digits);
        let quotient = Self::from_unsigned_with_sign(from_digits::<N, NL, L>(&q_digits), a_neg ^ b_neg);
        // Remainder sign matches the dividend's (spec.md §8 property 6),
        // except when it's exactly zero (no sign to carry).
        let remainder_negative = a_neg && !is_digits_zero(&r_digits);
        let remainder = Self::from_unsigned_with_sign(from_digits::<N, NL, L>(&r_digits), remainder_negative);
        quotient.check_result_policy(quotient.is_negative(), quotient.is_zero())?;
        Ok((quotient, remainder))
    }

    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        self.checked_div_rem(other).map(|(q, _)| q)
    }

    /// The original source gates `rem` the same way as `div` for
    /// `Whole`/`Natural` (SPEC_FULL.md §2); `div`'s policy check already
    /// covers the quotient, so this checks the remainder against the same
    /// policy.
    pub fn checked_rem(&self, other: &Self) -> Result<Self> {
        let (_, remainder) = self.checked_div_rem(other)?;
        remainder.check_result_policy(remainder.is_negative(), remainder.is_zero())?;
        Ok(remainder)
    }

    /// spec.md §4.2 "Float -> integer". Magnitudes beyond `±2^63` saturate
    /// to the `N`-bit type's max/min instead of delegating to an undefined
    /// host cast (SPEC_FULL.md open-question resolution 1).
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() || value == 0.0 {
            return Self::zero();
        }
        let negative = value < 0.0;
        let magnitude = value.abs();
        let max_i64_as_f64 = 9_223_372_036_854_775_808.0f64; // 2^63
        let mut store;
        if magnitude >= max_i64_as_f64 {
            store = Self::max_magnitude_store();
        } else {
            let truncated = magnitude as u64;
            store = BlockStore::<N, NL, L, Signed>::new();
            store.set_bits(truncated);
        }
        if negative {
            store.twos_complement();
        }
        Self::from_store(store)
    }

    fn max_magnitude_store() -> BlockStore<N, NL, L, Signed> {
        let mut store = BlockStore::<N, NL, L, Signed>::new();
        for i in 0..N.saturating_sub(1) {
            store.set_bit(i, true);
        }
        store
    }

    /// spec.md §4.2 "Integer -> float". Exact for magnitudes representable
    /// exactly in `f64` (up to 2^53); larger values round to the nearest
    /// representable `f64`, matching a normal integer-to-float widening.
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
        if negative {
            -value
        } else {
            value
        }
    }

    /// spec.md §4.2 "Textual parse". Dispatches on a `0x`/`0X` prefix
    /// (hex, apostrophe digit-group separators ignored), a `0`-then-octal
    /// prefix (recognised but [`Error::UnsupportedFormat`], per spec.md
    /// §4.2's explicit "currently accepted grammar but unimplemented"), or
    /// else plain decimal.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if rest.is_empty() {
            return Err(Error::ParseFailure);
        }

        if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
            return Self::parse_hex(hex, negative);
        }
        if rest.len() > 1 && rest.starts_with('0') && rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::UnsupportedFormat);
        }
        Self::parse_decimal(rest, negative)
    }

    fn parse_hex(digits: &str, negative: bool) -> Result<Self> {
        let mut store = BlockStore::<N, NL, L, Signed>::new();
        let mut any = false;
        let mut bit_pos = 0usize;
        for nibble_char in digits.chars().filter(|&c| c != '\'').rev() {
            let nibble = nibble_char.to_digit(16).ok_or(Error::ParseFailure)?;
            for b in 0..4 {
                if (nibble >> b) & 1 == 1 {
                    store.set_bit(bit_pos + b, true);
                }
            }
            bit_pos += 4;
            any = true;
        }
        if !any {
            return Err(Error::ParseFailure);
        }
        if negative {
            store.twos_complement();
        }
        Ok(Self::from_store(store))
    }

    fn parse_decimal(digits: &str, negative: bool) -> Result<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::ParseFailure);
        }
        let mut value = Self::zero();
        let ten = {
            let mut s = BlockStore::<N, NL, L, Signed>::new();
            s.set_bits(10);
            Self::from_store(s)
        };
        for ch in digits.chars() {
            let digit = ch.to_digit(10).ok_or(Error::ParseFailure)?;
            value = value.checked_mul(&ten).map_err(|_| Error::ParseFailure)?;
            let mut d = BlockStore::<N, NL, L, Signed>::new();
            d.set_bits(digit as u64);
            value = value.checked_add(&Self::from_store(d)).map_err(|_| Error::ParseFailure)?;
        }
        if negative {
            let mut store = value.into_store();
            store.twos_complement();
            value = Self::from_store(store);
        }
        Ok(value)
    }

    /// Render as decimal digits (with a leading `-` if negative), by
    /// repeated divide-by-ten in reverse of [`Self::parse_decimal`]. Exact,
    /// since every step is an integer division.
    #[cfg(feature = "alloc")]
    pub fn to_decimal(&self) -> alloc::string::String {
        use alloc::string::String;

        if self.is_zero() {
            return String::from("0");
        }
        let negative = self.is_negative();
        let mut magnitude = Self::from_store(BlockStore::<N, NL, L, Signed>::from_limbs(self.abs_unsigned().into_limbs()));
        let ten = {
            let mut s = BlockStore::<N, NL, L, Signed>::new();
            s.set_bits(10);
            Self::from_store(s)
        };
        let mut digits = alloc::vec::Vec::new();
        while !magnitude.is_zero() {
            let (q, r) = magnitude.checked_div_rem(&ten).expect("ten is never zero");
            let digit = r.to_f64() as u32;
            digits.push(core::char::from_digit(digit, 10).expect("digit is 0..10"));
            magnitude = q;
        }
        let mut out = String::with_capacity(digits.len() + negative as usize);
        if negative {
            out.push('-');
        }
        out.extend(digits.into_iter().rev());
        out
    }
}

/// Serializes/deserializes through the raw limb array, matching how
/// `unum_types::BlockStore` itself is encoded (spec.md's ambient serde
/// supplement; `fuel-types` gates the same way).
#[cfg(feature = "serde")]
impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb + Serialize> serde::Serialize for BigInteger<N, NL, K, L> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        self.store.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, const N: usize, const NL: usize, K: IntegerKind, L: Limb + Deserialize<'de>> serde::Deserialize<'de> for BigInteger<N, NL, K, L> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        BlockStore::deserialize(deserializer).map(Self::from_store)
    }
}

/// Uniform over the raw bit pattern, masked to canonical form by
/// [`BlockStore::from_limbs`] (spec.md's ambient randomness supplement).
#[cfg(feature = "random")]
impl<const N: usize, const NL: usize, K: IntegerKind, L: Limb> rand::distributions::Distribution<BigInteger<N, NL, K, L>>
    for rand::distributions::Standard
{
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> BigInteger<N, NL, K, L> {
        let limbs = core::array::from_fn(|_| L::from_u64(rng.gen()));
        BigInteger::from_store(BlockStore::from_limbs(limbs))
    }
}

/// Pack an `Unsigned`-tagged store's bits into Knuth-D's u64 super-digits,
/// independent of the caller's limb width.
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

fn is_digits_zero(digits: &Digits) -> bool {
    digits.iter().all(|d| *d == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Integer, Natural, Whole};

    type I128 = BigInteger<128, 2, Integer, u64>;
    type W64 = BigInteger<64, 8, Whole, u8>;
    type Nat32 = BigInteger<32, 4, Natural, u8>;

    fn from_i128(value: i128) -> I128 {
        let mut store = BlockStore::<128, 2, u64, Signed>::new();
        store.set_bits(value as u64);
        if value < 0 {
            // `set_bits` only streams the low 64 bits in; sign-extend the
            // upper limb by hand for this test helper.
            store.set_limb(1, u64::MAX);
        }
        I128::from_store(store)
    }

    #[test]
    fn add_sub_round_trip() {
        let a = from_i128(123_456);
        let b = from_i128(-42);
        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.to_f64(), 123_414.0);
        let back = sum.checked_sub(&b).unwrap();
        assert_eq!(back.to_f64(), 123_456.0);
    }

    #[test]
    fn multiply_small_values() {
        let a = from_i128(12345);
        let b = from_i128(-2);
        let product = a.checked_mul(&b).unwrap();
        assert_eq!(product.to_f64(), -24690.0);
    }

    #[test]
    fn s5_division_scenario() {
        let a = from_i128((1i128 << 120) - 1);
        let b = from_i128((1i128 << 40) + 3);
        let (q, r) = a.checked_div_rem(&b).unwrap();
        let qv = q.to_f64();
        let rv = r.to_f64();
        assert!((qv * b.to_f64() + rv - a.to_f64()).abs() < 1.0);
        assert!(rv >= 0.0 && rv < b.to_f64());
    }

    #[test]
    fn divide_by_zero_errs() {
        let a = from_i128(10);
        let zero = I128::zero();
        assert_eq!(a.checked_div_rem(&zero), Err(Error::DivideByZero));
    }

    #[test]
    fn whole_forbids_zero_subtraction() {
        let mut five = BlockStore::<64, 8, u8, Signed>::new();
        five.set_bits(5);
        let a = W64::from_store(five);
        let b = a;
        assert_eq!(a.checked_sub(&b), Err(Error::NonRepresentableZero));
    }

    #[test]
    fn natural_forbids_negative_result() {
        let mut three = BlockStore::<32, 4, u8, Signed>::new();
        three.set_bits(3);
        let mut five = BlockStore::<32, 4, u8, Signed>::new();
        five.set_bits(5);
        let a = Nat32::from_store(three);
        let b = Nat32::from_store(five);
        assert_eq!(a.checked_sub(&b), Err(Error::NegativeNotAllowed));
    }

    #[test]
    fn parse_s9_scenario() {
        let value = I128::parse("-0xFF'FF").unwrap();
        assert_eq!(value.to_f64(), -65535.0);
    }

    #[test]
    fn parse_decimal_round_trip() {
        let value = I128::parse("-987654321").unwrap();
        assert_eq!(value.to_f64(), -987654321.0);
    }

    #[test]
    fn octal_is_unsupported() {
        assert_eq!(I128::parse("0755"), Err(Error::UnsupportedFormat));
    }

    #[test]
    fn float_saturates_beyond_i64_range() {
        let value = I128::from_f64(1.0e30);
        assert!(value.to_f64() > 0.0);
        assert!(!value.is_negative());
    }
}
