//! Quantified invariants from spec.md §8, checked with `quickcheck` the
//! way this crate's dependency table is meant to be used for randomised
//! property testing.

use quickcheck_macros::quickcheck;
use unum::types::{Integer128, Posit8_0};
use unum::{FixedPoint, Saturating};

/// Property 2: every non-NaR 8-bit posit code round-trips through
/// decode/encode.
#[quickcheck]
fn posit_round_trip(raw: u8) -> bool {
    if raw == 0x80 {
        return true;
    }
    let mut bits = unum::PositBits::<8, 1, u8>::new();
    bits.set_bits(raw as u64);
    let posit = Posit8_0::from_bits(bits);
    let roundtrip = Posit8_0::from_f64(posit.to_f64());
    roundtrip.into_bits() == posit.into_bits()
}

/// Property 4: sign involution for non-zero, non-NaR posits.
#[quickcheck]
fn posit_sign_involution(raw: u8) -> bool {
    if raw == 0x80 || raw == 0x00 {
        return true;
    }
    let mut bits = unum::PositBits::<8, 1, u8>::new();
    bits.set_bits(raw as u64);
    let posit = Posit8_0::from_bits(bits);
    -(-posit) == posit
}

/// Property 5: integer round-trip through decimal text.
#[quickcheck]
fn integer_round_trip_through_decimal(value: i32) -> bool {
    let original = Integer128::from_f64(value as f64);
    let text = original.to_decimal();
    let parsed: Integer128 = text.parse().unwrap();
    parsed.to_f64() == original.to_f64()
}

/// Property 9: a Saturating FixedPoint's sum never leaves
/// `[min_value, max_value]`.
#[quickcheck]
fn fixed_point_saturating_add_stays_in_bounds(a: i16, b: i16) -> bool {
    type Fx = FixedPoint<16, 4, 2, Saturating, u8>;
    let x = Fx::from_f64(a as f64 / 16.0);
    let y = Fx::from_f64(b as f64 / 16.0);
    let sum = x.add(&y);
    sum <= Fx::max_value() && sum >= Fx::min_value()
}
