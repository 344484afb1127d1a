//! Named type aliases for common configurations (spec.md §3's worked
//! examples; §9 "Size Budget"). Each alias is checked at compile time with
//! [`static_assertions`], matching how `fuel-types` pins its wire-format
//! widths.

use static_assertions::const_assert;
use unum_types::limb_count;

use crate::knuth::MAX_DIGITS;
use crate::policy::{Integer as IntegerKind, Modulo, Natural, Saturating, Whole};
use crate::{BigInteger, FixedPoint, Integer, Lns, LnsBase2, Posit};

/// A 128-bit two's-complement integer over `u64` limbs.
pub type Integer128 = Integer<128, 2, IntegerKind, u64>;
/// A 64-bit zero-forbidding integer over `u8` limbs (spec.md §3's `Whole`
/// example).
pub type Whole64 = Integer<64, 8, Whole, u8>;
/// A 32-bit negative-and-zero-forbidding integer over `u8` limbs (spec.md
/// §3's `Natural` example).
pub type Natural32 = Integer<32, 4, Natural, u8>;

/// The bare `L1` integer core behind [`Integer128`], for callers that want
/// `Result`-returning arithmetic without the `P: ErrorPolicy` operator
/// dispatch.
pub type BigInteger128 = BigInteger<128, 2, IntegerKind, u64>;

/// A `Q16.16`-style signed fixed-point number: 8 whole bits, 8 fractional
/// bits, saturating on overflow (spec.md §3's `FixedPoint` example).
pub type FixedPoint8_8 = FixedPoint<16, 8, 2, Saturating, u8>;
/// A wider saturating fixed-point configuration: 24 whole bits, 8
/// fractional bits.
pub type FixedPoint24_8 = FixedPoint<32, 8, 4, Saturating, u8>;
/// A modulo-wrapping fixed-point configuration, for callers that want
/// `BlockStore`-style wraparound instead of clamping.
pub type FixedPointModulo16_8 = FixedPoint<16, 8, 2, Modulo, u8>;

/// An 8-bit, 0-exponent-bit posit (the smallest posit configuration named
/// in spec.md's worked examples, and the one exhaustively round-trip
/// tested in `unum-codec`).
pub type Posit8_0 = Posit<8, 1, 0, 32, 4, u8>;
/// A 16-bit, 1-exponent-bit posit, the configuration most of spec.md §8's
/// scenarios are phrased against.
pub type Posit16_1 = Posit<16, 2, 1, 64, 8, u8>;
/// A 32-bit, 2-exponent-bit posit.
pub type Posit32_2 = Posit<32, 1, 2, 96, 3, u32>;

/// A 16-bit base-2 logarithmic number with an 8-bit fractional exponent,
/// saturating on overflow.
pub type Lns16_8 = Lns<16, 2, 8, Saturating, u8>;
pub type LnsBase2_16_8 = LnsBase2<16, 2, 8, Saturating, u8>;

const_assert!(128 <= MAX_DIGITS * 64);
const_assert!(64 <= MAX_DIGITS * 64);
const_assert!(32 <= MAX_DIGITS * 64);
const_assert!(16 <= MAX_DIGITS * 64);
const_assert!(32 <= MAX_DIGITS * 64);

// Every `Triple` staging width must cover `N + 3 + E` bits (the widest
// posit pattern, spec.md §4.5) and stay within the `u128`-bounded 128-bit
// ceiling `unum_codec::Triple` documents.
const_assert!(32 >= 8 + 3 + 0);
const_assert!(64 >= 16 + 3 + 1);
const_assert!(96 >= 32 + 3 + 2);
const_assert!(32 <= 128);
const_assert!(64 <= 128);
const_assert!(96 <= 128);

// `NL`/`QLIMBS` must match `limb_count(BITS, L)` exactly: an oversized
// limb array leaves the padding limbs beyond `ceil(BITS/L::BITS)`
// unmasked by `BlockStore::apply_mask` (which only ever touches the true
// top limb), so a `flip()` leaves them as garbage non-zero words and
// `is_zero()`/`compare()` see that garbage as part of the value.
const_assert!(limb_count::<u8>(8) == 1);
const_assert!(limb_count::<u8>(16) == 2);
const_assert!(limb_count::<u32>(32) == 1);
const_assert!(limb_count::<u8>(32) == 4);
const_assert!(limb_count::<u64>(128) == 2);
const_assert!(limb_count::<u8>(64) == 8);

const_assert!(limb_count::<u8>(32) == 4); // Posit8_0's QBITS=32, L=u8
const_assert!(limb_count::<u8>(64) == 8); // Posit16_1's QBITS=64, L=u8
const_assert!(limb_count::<u32>(96) == 3); // Posit32_2's QBITS=96, L=u32
