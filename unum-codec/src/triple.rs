//! Normalised staging representation used for posit add/mul/div
//! (spec.md §3 `Triple`, §4.6).
//!
//! The spec parameterises `Triple` by operation (`Rep`/`Add`/`Mul`/`Div`)
//! so the significand buffer carries whatever extra bits that operation
//! needs. Rust's const generics can't yet size an internal buffer from an
//! expression over another generic parameter (`N + 4` isn't a legal const
//! generic argument without `generic_const_exprs`), so this crate takes the
//! same approach `BlockStore::LIMBS` does: the caller supplies one
//! generously-sized working width, `QBITS`, up front, and every operation
//! (`Rep` included) shares it instead of getting its own tailored width.
//! `QBITS` must be even; the low `QBITS/2` bits hold the "1.fraction"
//! mantissa (hidden bit at `QBITS/2 - 1`), leaving the upper half as
//! headroom for add's carry-out and multiply's double-width product.
//!
//! Arithmetic is done via [`SignificandBuffer::to_u128`]/`set_from_u128`,
//! which restricts a sound `Triple` instantiation to `QBITS <= 128` (see
//! DESIGN.md). That covers every posit configuration this crate exposes a
//! named type alias for (widths up to 64); wider, fully generic arithmetic
//! is `BigInteger`'s job (spec.md §4.2), not this staging type's.

use unum_types::Limb;

use crate::significand_buffer::SignificandBuffer;

/// What kind of value a [`Triple`] currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripleKind {
    Zero,
    Normal,
    Inf,
    NaN,
}

/// `(sign, scale, significand)` staging value for posit arithmetic
/// (spec.md §4.6). Normal triples satisfy `1.0 <= |value| < 2.0` relative
/// to `scale`, i.e. `value = (-1)^sign * 2^scale * (significand / 2^(HALF-1))`
/// with `significand` an integer in `[2^(HALF-1), 2^HALF)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triple<const QBITS: usize, const QLIMBS: usize, L: Limb> {
    pub sign: bool,
    pub scale: i32,
    pub kind: TripleKind,
    pub significand: SignificandBuffer<QBITS, QLIMBS, L>,
}

impl<const QBITS: usize, const QLIMBS: usize, L: Limb> Triple<QBITS, QLIMBS, L> {
    /// Bit width of the normalised `[1,2)` mantissa window.
    const HALF: usize = QBITS / 2;

    pub fn zero(sign: bool) -> Self {
        Self {
            sign,
            scale: 0,
            kind: TripleKind::Zero,
            significand: SignificandBuffer::new(),
        }
    }

    pub fn nan() -> Self {
        Self {
            sign: false,
            scale: 0,
            kind: TripleKind::NaN,
            significand: SignificandBuffer::new(),
        }
    }

    /// Build a `Normal` triple from a sign, scale, and a hidden-bit-included
    /// mantissa occupying the low `HALF` bits of `significand` (bit
    /// `HALF-1` must be the hidden `1`).
    pub fn normal(sign: bool, scale: i32, significand: SignificandBuffer<QBITS, QLIMBS, L>) -> Self {
        if significand.is_zero() {
            return Self::zero(sign);
        }
        Self {
            sign,
            scale,
            kind: TripleKind::Normal,
            significand,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.kind, TripleKind::Zero)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self.kind, TripleKind::NaN)
    }

    pub fn is_normal(&self) -> bool {
        matches!(self.kind, TripleKind::Normal)
    }

    /// The mantissa as an integer in `[2^(HALF-1), 2^HALF)`.
    fn mantissa_u128(&self) -> u128 {
        self.significand.to_u128()
    }

    fn from_mantissa(sign: bool, scale: i32, mantissa: u128) -> Self {
        let mut buf = SignificandBuffer::new();
        buf.set_from_u128(mantissa);
        Self::normal(sign, scale, buf)
    }

    /// spec.md §4.6 "add": align scales (sticky-preserving), add or
    /// subtract magnitudes depending on sign, renormalise.
    pub fn add(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        if self.is_zero() {
            return *other;
        }
        if other.is_zero() {
            return *self;
        }

        let (hi, lo) = if self.scale >= other.scale { (self, other) } else { (other, self) };
        let shift = (hi.scale - lo.scale) as u32;
        let mut lo_mantissa = lo.mantissa_u128();
        if shift >= u128::BITS {
            lo_mantissa = 0;
        } else {
            let sticky = shift > 0 && (lo_mantissa & ((1u128 << shift) - 1)) != 0;
            lo_mantissa >>= shift;
            if sticky {
                lo_mantissa |= 1;
            }
        }

        let mut scale = hi.scale;
        let (mantissa, sign) = if hi.sign == lo.sign {
            let mut sum = hi.mantissa_u128() + lo_mantissa;
            // `sum` can carry one bit above the `HALF`-bit window.
            if sum >> Self::HALF != 0 {
                let sticky = sum & 1 != 0;
                sum >>= 1;
                if sticky {
                    sum |= 1;
                }
                scale += 1;
            }
            (sum, hi.sign)
        } else {
            let hi_m = hi.mantissa_u128();
            if hi_m == lo_mantissa {
                return Self::zero(false);
            }
            let (big, small, sign) = if hi_m > lo_mantissa {
                (hi_m, lo_mantissa, hi.sign)
            } else {
                (lo_mantissa, hi_m, lo.sign)
            };
            let mut diff = big - small;
            // Renormalise: shift left until bit `HALF-1` is set again.
            while diff != 0 && diff >> (Self::HALF - 1) == 0 {
                diff <<= 1;
                scale -= 1;
            }
            (diff, sign)
        };

        if mantissa == 0 {
            return Self::zero(false);
        }
        Self::from_mantissa(sign, scale, mantissa)
    }

    /// spec.md §4.6 "mul": scales sum, mantissas multiply, signs XOR,
    /// renormalise.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.sign ^ other.sign);
        }
        let sign = self.sign ^ other.sign;
        let mut scale = self.scale + other.scale;
        let product = self.mantissa_u128() * other.mantissa_u128();
        // Two `HALF`-bit operands each `< 2^HALF` produce a product with its
        // top set bit at position `2*HALF-2` or `2*HALF-1`.
        let top = 2 * Self::HALF - 1;
        let (hidden_pos, product) = if (product >> top) & 1 == 1 {
            scale += 1;
            (top, product)
        } else {
            (top - 1, product)
        };
        let shift = hidden_pos - (Self::HALF - 1);
        let sticky = shift > 0 && (product & ((1u128 << shift) - 1)) != 0;
        let mut mantissa = product >> shift;
        if sticky {
            mantissa |= 1;
        }
        Self::from_mantissa(sign, scale, mantissa)
    }

    /// spec.md §4.6 "div": numerator shifted left before a restoring
    /// divide, scales subtract, signs XOR. Returns NaN on a zero divisor;
    /// [`crate::PositCodec`] is responsible for raising `Error::DivideByZero`
    /// under `ErrorPolicy = Throw` before it ever calls this.
    pub fn div(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() || other.is_zero() {
            return Self::nan();
        }
        if self.is_zero() {
            return Self::zero(self.sign ^ other.sign);
        }
        let sign = self.sign ^ other.sign;
        let mut scale = self.scale - other.scale;
        // Shift the numerator by `HALF-1` (not `HALF`): both mantissas are
        // already HALF-bit fixed-point values in `[1,2)`, so their ratio
        // needs only one extra bit of headroom to land back in `[0.5, 2)`.
        let numerator = self.mantissa_u128() << (Self::HALF - 1);
        let divisor = other.mantissa_u128();
        let mut quotient = numerator / divisor;
        let remainder = numerator % divisor;
        if quotient >> Self::HALF != 0 {
            quotient >>= 1;
            scale += 1;
        } else if quotient >> (Self::HALF - 1) == 0 {
            quotient <<= 1;
            scale -= 1;
        }
        if remainder != 0 {
            quotient |= 1;
        }
        Self::from_mantissa(sign, scale, quotient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type T = Triple<32, 4, u8>;

    fn mantissa_only(scale: i32, top_fraction_bit: bool) -> T {
        let mut buf = SignificandBuffer::new();
        buf.set_bit(T::HALF - 1, true);
        buf.set_bit(T::HALF - 2, top_fraction_bit);
        T::normal(false, scale, buf)
    }

    #[test]
    fn mul_one_times_one_is_one() {
        let one = mantissa_only(0, false);
        let result = one.mul(&one);
        assert_eq!(result.scale, 0);
        assert_eq!(result.mantissa_u128(), one.mantissa_u128());
    }

    #[test]
    fn mul_two_times_two_is_four() {
        let two = mantissa_only(1, false);
        let result = two.mul(&two);
        assert_eq!(result.scale, 2);
    }

    #[test]
    fn div_self_by_self_is_one() {
        let a = mantissa_only(3, true);
        let result = a.div(&a);
        assert_eq!(result.scale, 0);
        assert_eq!(result.mantissa_u128(), 1u128 << (T::HALF - 1));
    }

    #[test]
    fn div_by_zero_produces_nan() {
        let a = mantissa_only(0, false);
        let result = a.div(&T::zero(false));
        assert!(result.is_nan());
    }

    #[test]
    fn add_same_sign_same_scale_doubles() {
        let a = mantissa_only(0, false);
        let result = a.add(&a);
        assert_eq!(result.scale, 1);
    }

    #[test]
    fn add_zero_is_identity() {
        let a = mantissa_only(2, true);
        let zero = T::zero(false);
        assert_eq!(a.add(&zero), a);
    }
}
