//! Black-box coverage of spec.md §8's concrete scenarios (S1-S10), run
//! against the public surface types the way `fuel-vm`'s `tests/` suite
//! drives its `Interpreter` end to end rather than its internal modules.

use unum::types::{Integer128, Posit16_1, Posit32_2, Posit8_0};
use unum::{FixedPoint, Lns, Saturating};

#[test]
fn s1_one_times_one_is_one() {
    let one = Posit8_0::from_f64(1.0);
    assert_eq!((one * one).to_f64(), 1.0);
}

#[test]
fn s2_maxpos_times_minpos_rounds_to_one() {
    // maxpos/minpos for Posit(8,0) are 64 and 1/64.
    let maxpos = Posit8_0::from_f64(64.0);
    let minpos = Posit8_0::from_f64(1.0 / 64.0);
    assert_eq!((maxpos * minpos).to_f64(), 1.0);
}

#[test]
fn s3_nar_poisons_every_arithmetic_op() {
    let nar = Posit8_0::nar();
    let one = Posit8_0::from_f64(1.0);
    assert!((nar * one).is_nar());
    assert!((nar + one).is_nar());
    assert!((nar - one).is_nar());
    assert!((nar / one).is_nar());
}

#[test]
fn s4_sticky_bit_is_preserved_through_encode() {
    let exact = Posit16_1::from_f64(1.0);
    let nudged = Posit16_1::from_f64(1.0 + 1e-6);
    assert_ne!(exact.into_bits(), nudged.into_bits());
}

#[test]
fn s5_wide_division_satisfies_the_division_contract() {
    let a = Integer128::from_f64((1u128 << 120) as f64 - 1.0);
    let b = Integer128::from_f64((1u128 << 40) as f64 + 3.0);
    let (q, r) = a.into_inner().checked_div_rem(&b.into_inner()).unwrap();
    assert!(r.to_f64() >= 0.0 && r.to_f64() < b.to_f64());
    assert!((q.to_f64() * b.to_f64() + r.to_f64() - a.to_f64()).abs() < 1.0);
}

#[test]
fn s6_fixed_point_multiply_is_exact() {
    type Fx = FixedPoint<16, 8, 2, Saturating, u8>;
    let a = Fx::from_f64(4.25);
    let b = Fx::from_f64(2.00);
    assert_eq!(a.mul(&b).to_f64(), 8.50);
}

#[test]
fn s7_fixed_point_add_saturates() {
    type Fx = FixedPoint<8, 4, 1, Saturating, u8>;
    let maxpos = Fx::max_value();
    let a = Fx::from_f64(7.9375);
    let b = Fx::from_f64(0.0625);
    assert_eq!(a.add(&b), maxpos);
}

#[test]
fn s8_lns_multiply() {
    type L = Lns<16, 2, 8, Saturating, u8>;
    let a = L::from_f64(2.0);
    let b = L::from_f64(3.0);
    assert!(((a * b).to_f64() - 6.0).abs() < 1e-3);
}

#[test]
fn s9_parse_hex_with_group_separators() {
    let value: Integer128 = "-0xFF'FF".parse().unwrap();
    assert_eq!(value.to_f64(), -65535.0);
}

#[test]
fn s10_posit_float_round_trip() {
    let pi_bits = Posit32_2::from_f64(core::f64::consts::PI);
    let roundtrip = Posit32_2::from_f64(pi_bits.to_f64());
    assert_eq!(pi_bits.into_bits(), roundtrip.into_bits());
}
