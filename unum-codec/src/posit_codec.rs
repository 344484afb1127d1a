//! Bidirectional map between an `N`-bit two's-complement code and
//! `(sign, regime, exponent, fraction)` (spec.md §4.5) — the hardest
//! subsystem in the crate.

use core::marker::PhantomData;

use unum_types::{BlockStore, IeeeDecoder, Limb, Signed};

use crate::significand_buffer::SignificandBuffer;
use crate::triple::Triple;

/// The raw `N`-bit posit code: a two's-complement [`BlockStore`].
pub type PositBits<const N: usize, const NL: usize, L> = BlockStore<N, NL, L, Signed>;

/// Decodes and encodes `N`-bit, `E`-exponent-bit posit codes.
///
/// `QBITS`/`QLIMBS` size the [`Triple`] staging buffer shared by decode,
/// encode, and every `Triple` arithmetic operation (see `triple.rs`'s module
/// doc for why one width is reused instead of a tailored one per
/// operation). Correctness here requires `QBITS >= N + 3 + E` (so the
/// untruncated encode pattern of spec.md §4.5 step 2 fits) and
/// `QBITS <= 128` (so `Triple`'s `u128`-based arithmetic doesn't truncate
/// real precision); both are asserted with `static_assertions` wherever a
/// concrete posit width is named as a type alias (see `unum::types::posit`).
pub struct PositCodec<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb>
{
    _marker: PhantomData<L>,
}

impl<const N: usize, const NL: usize, const E: usize, const QBITS: usize, const QLIMBS: usize, L: Limb>
    PositCodec<N, NL, E, QBITS, QLIMBS, L>
{
    const QHALF: usize = QBITS / 2;
    /// Total width of the untruncated encode pattern (spec.md §4.5 step 2).
    const PATTERN_LEN: usize = N + 3 + E;
    const K_MAX: i64 = N as i64 - 2;
    const K_MIN: i64 = -(N as i64 - 2);

    fn is_sign_only(bits: &PositBits<N, NL, L>) -> bool {
        bits.get_bit(N - 1) && (0..N - 1).all(|i| !bits.get_bit(i))
    }

    /// spec.md §4.5 "Decode".
    pub fn decode(bits: &PositBits<N, NL, L>) -> Triple<QBITS, QLIMBS, L> {
        if bits.is_zero() {
            return Triple::zero(false);
        }
        if Self::is_sign_only(bits) {
            return Triple::nan();
        }

        let sign = bits.get_bit(N - 1);
        let working = if sign {
            let mut w = *bits;
            w.twos_complement();
            w
        } else {
            *bits
        };

        // `m` counts the repeated run only (the terminating opposite bit,
        // when there is one, is tracked separately in `regime_bit_count`);
        // this is the convention the concrete scenarios (spec.md §8 S1/S2)
        // are built against.
        let first = working.get_bit(N - 2);
        let mut m = 1usize;
        let mut idx = N as isize - 3;
        let mut terminated = false;
        while idx >= 0 {
            let b = working.get_bit(idx as usize);
            if b != first {
                terminated = true;
                break;
            }
            m += 1;
            idx -= 1;
        }
        let k: i64 = if first { m as i64 - 1 } else { -(m as i64) };
        let regime_bit_count = if terminated { m + 1 } else { m };

        let remaining = (N - 1).saturating_sub(regime_bit_count);
        let ebits = E.min(remaining);
        let fbits = remaining - ebits;

        let mut exponent_full: i64 = 0;
        for i in 0..ebits {
            let abs_idx = (N - 2 - regime_bit_count) - i;
            if working.get_bit(abs_idx) {
                exponent_full |= 1i64 << (E - 1 - i);
            }
        }

        let scale = k * (1i64 << E) + exponent_full;

        let mut mantissa = SignificandBuffer::new();
        mantissa.set_bit(Self::QHALF - 1, true);
        for i in 0..fbits {
            if working.get_bit(fbits - 1 - i) {
                mantissa.set_bit(Self::QHALF - 2 - i, true);
            }
        }

        Triple::normal(sign, scale as i32, mantissa)
    }

    fn min_magnitude_code(sign: bool) -> PositBits<N, NL, L> {
        let mut code = PositBits::<N, NL, L>::new();
        code.set_bit(0, true);
        if sign {
            code.twos_complement();
        }
        code
    }

    fn max_magnitude_code(sign: bool) -> PositBits<N, NL, L> {
        let mut code = PositBits::<N, NL, L>::new();
        for i in 0..N - 1 {
            code.set_bit(i, true);
        }
        if sign {
            code.twos_complement();
        }
        code
    }

    /// spec.md §4.5 "Encode", with inward-projection saturation.
    pub fn encode(triple: &Triple<QBITS, QLIMBS, L>) -> PositBits<N, NL, L> {
        if triple.is_nan() {
            let mut code = PositBits::<N, NL, L>::new();
            code.set_bit(N - 1, true);
            return code;
        }
        if triple.is_zero() {
            return PositBits::<N, NL, L>::new();
        }

        let scale = triple.scale as i64;
        if scale < Self::K_MIN * (1i64 << E) {
            return Self::min_magnitude_code(triple.sign);
        }
        if scale > Self::K_MAX * (1i64 << E) {
            return Self::max_magnitude_code(triple.sign);
        }

        let k = scale >> E;
        let exponent_value = (scale - (k << E)) as u64;
        let run_len = if k >= 0 { (k + 1) as usize } else { (-k) as usize };

        let len = Self::PATTERN_LEN;
        let mut pattern: SignificandBuffer<QBITS, QLIMBS, L> = SignificandBuffer::new();
        // Pattern bit `len-1` is left zero as the sign slot: after truncation
        // to `N` bits it lands on the code's bit `N-1`, which `decode` reads
        // as the sign (the regime itself starts at bit `N-2`, see `decode`
        // above). The magnitude fields below therefore start one bit lower,
        // at `len-2`.
        let mut cursor: isize = len as isize - 2;

        let regime_bit = k >= 0;
        for _ in 0..run_len {
            if cursor >= 0 {
                pattern.set_bit(cursor as usize, regime_bit);
            }
            cursor -= 1;
        }
        if cursor >= 0 {
            pattern.set_bit(cursor as usize, !regime_bit);
        }
        cursor -= 1;

        for i in (0..E).rev() {
            let bit = (exponent_value >> i) & 1 == 1;
            if cursor >= 0 {
                pattern.set_bit(cursor as usize, bit);
            }
            cursor -= 1;
        }

        let available = Self::QHALF - 1;
        let nf = (N as i64 + 1 - (2 + run_len as i64 + E as i64)).max(0) as usize;
        let place = nf.min(available);
        for i in 0..place {
            let bit = triple.significand.get_bit(Self::QHALF - 2 - i);
            if cursor >= 0 {
                pattern.set_bit(cursor as usize, bit);
            }
            cursor -= 1;
        }
        let sticky_extra = if nf < available {
            triple.significand.any_after(available - nf)
        } else {
            false
        };

        let blast = pattern.get_bit(len - N);
        let bafter = pattern.get_bit(len - N - 1);
        let bsticky = pattern.any_after(len - N - 1) || sticky_extra;
        let round_up =
            unum_types::round_to_nearest_even(unum_types::RoundInput { guard: bafter, round: false, sticky: bsticky, lsb: blast });

        let mut shifted = pattern;
        shifted.shift_right((len - N) as u32);
        if round_up {
            shifted.increment();
        }

        let mut code = PositBits::<N, NL, L>::new();
        for i in 0..N {
            code.set_bit(i, shifted.get_bit(i));
        }
        if triple.sign {
            code.twos_complement();
        }
        code
    }

    /// spec.md §4.5 "Reciprocal of a posit". The power-of-two fast path
    /// named in the spec is subsumed by the general division path below
    /// (it already returns the exact result for that case, see DESIGN.md),
    /// so this simply divides `1.0` by the decoded value.
    pub fn reciprocal(bits: &PositBits<N, NL, L>) -> PositBits<N, NL, L> {
        let mut one_buf = SignificandBuffer::new();
        one_buf.set_bit(Self::QHALF - 1, true);
        let one = Triple::normal(false, 0, one_buf);
        let value = Self::decode(bits);
        if value.is_nan() {
            return Self::encode(&Triple::nan());
        }
        Self::encode(&one.div(&value))
    }

    /// spec.md §4.5 "Conversion from host float". `f`'s NaN/Inf both map to
    /// NaR on entry, matching the spec's documented failure semantics.
    pub fn from_float<F: IeeeDecoder>(value: F) -> PositBits<N, NL, L> {
        use unum_types::Classification;
        let fields = value.extract_fields();
        let triple = match fields.classification {
            Classification::Zero => Triple::zero(false),
            Classification::Inf | Classification::QNan | Classification::SNan => Triple::nan(),
            Classification::Normal | Classification::Subnormal => {
                let mut frac = fields.raw_fraction;
                let mut scale = if fields.classification == Classification::Normal {
                    fields.unbiased_exponent(F::BIAS)
                } else {
                    1 - F::BIAS
                };
                while frac != 0 && (frac >> F::FRAC_BITS) & 1 == 0 {
                    frac <<= 1;
                    scale -= 1;
                }
                let mut mantissa = SignificandBuffer::new();
                mantissa.set_bit(Self::QHALF - 1, true);
                // `FRAC_BITS` (52 for f64) can exceed the working buffer's
                // `available` fraction slots for narrow posit widths; keep
                // only the top `available` bits and fold the rest into a
                // sticky bit rather than underflowing the bit index.
                let available = Self::QHALF - 1;
                let frac_bits = F::FRAC_BITS as usize;
                if frac_bits <= available {
                    for i in 0..frac_bits {
                        if (frac >> i) & 1 == 1 {
                            mantissa.set_bit(available - frac_bits + i, true);
                        }
                    }
                } else {
                    let drop = frac_bits - available;
                    let sticky = (frac & ((1u64 << drop) - 1)) != 0;
                    for i in 0..available {
                        if (frac >> (drop + i)) & 1 == 1 {
                            mantissa.set_bit(i, true);
                        }
                    }
                    if sticky {
                        mantissa.set_bit(0, true);
                    }
                }
                Triple::normal(fields.sign, scale as i32, mantissa)
            }
        };
        Self::encode(&triple)
    }

    /// spec.md §4.5 "Conversion to host float".
    pub fn to_f64(bits: &PositBits<N, NL, L>) -> f64 {
        let triple = Self::decode(bits);
        if triple.is_nan() {
            return f64::NAN;
        }
        if triple.is_zero() {
            return 0.0;
        }
        let mut mantissa_value = 1.0f64;
        let mut weight = 0.5f64;
        for i in (0..Self::QHALF - 1).rev() {
            if triple.significand.get_bit(i) {
                mantissa_value += weight;
            }
            weight /= 2.0;
            if weight == 0.0 {
                break;
            }
        }
        let magnitude = mantissa_value * 2f64.powi(triple.scale);
        if triple.sign {
            -magnitude
        } else {
            magnitude
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Posit(8,0): N=8, one u8 limb; QBITS=32 (QHALF=16) comfortably covers
    // PATTERN_LEN = 8+3+0 = 11 and stays within Triple's u128 budget.
    type Codec8 = PositCodec<8, 1, 0, 32, 4, u8>;
    type Bits8 = PositBits<8, 1, u8>;

    fn code(bits: u8) -> Bits8 {
        let mut b = Bits8::new();
        b.set_bits(bits as u64);
        b
    }

    #[test]
    fn zero_and_nar_round_trip() {
        assert!(Codec8::decode(&code(0x00)).is_zero());
        assert!(Codec8::decode(&code(0x80)).is_nan());
        assert_eq!(Codec8::encode(&Codec8::decode(&code(0x80))), code(0x80));
    }

    #[test]
    fn s1_multiply_one_times_one() {
        let one = Codec8::decode(&code(0x40));
        let product = one.mul(&one);
        assert_eq!(Codec8::encode(&product), code(0x40));
    }

    #[test]
    fn s2_maxpos_times_minpos_rounds_to_one() {
        let maxpos = Codec8::decode(&code(0x7F));
        let minpos = Codec8::decode(&code(0x01));
        let product = maxpos.mul(&minpos);
        assert_eq!(Codec8::encode(&product), code(0x40));
    }

    #[test]
    fn round_trip_every_non_nar_code() {
        for raw in 0u8..=255u8 {
            if raw == 0x80 {
                continue;
            }
            let c = code(raw);
            let decoded = Codec8::decode(&c);
            let encoded = Codec8::encode(&decoded);
            assert_eq!(encoded, c, "round trip failed for 0x{raw:02x}");
        }
    }

    #[test]
    fn monotonic_for_positive_codes() {
        let mut prev = f64::NEG_INFINITY;
        for raw in 0u8..=0x7F {
            let value = Codec8::to_f64(&code(raw));
            assert!(value >= prev, "0x{raw:02x} -> {value} not >= {prev}");
            prev = value;
        }
    }

    #[test]
    fn float_round_trip_one() {
        let bits = Codec8::from_float(1.0f64);
        assert_eq!(bits, code(0x40));
        assert_eq!(Codec8::to_f64(&bits), 1.0);
    }

    #[test]
    fn nan_and_inf_map_to_nar() {
        assert_eq!(Codec8::from_float(f64::NAN), code(0x80));
        assert_eq!(Codec8::from_float(f64::INFINITY), code(0x80));
    }
}
