//! The block-addressable binary backing store shared by every number type
//! (spec.md §3 `BlockStore`, §4.1).

use core::cmp::Ordering;
use core::marker::PhantomData;

use crate::kind::Kind;
use crate::limb::Limb;

/// Number of `L`-sized limbs needed to hold `bits` bits.
///
/// Callers pick `LIMBS` for a `BlockStore<BITS, LIMBS, L, K>` type alias by
/// evaluating this in a `const` item and checking it with
/// `static_assertions::const_assert_eq!`, mirroring how fixed-width
/// const-generic integer crates pin `LIMBS` without relying on
/// `generic_const_exprs`.
pub const fn limb_count<L: Limb>(bits: usize) -> usize {
    (bits + L::BITS as usize - 1) / L::BITS as usize
}

/// A little-endian array of `LIMBS` limbs of type `L`, representing an
/// `BITS`-bit string interpreted per `K` (spec.md §3).
///
/// Bit `i` lives in limb `i / L::BITS` at position `i % L::BITS`. The
/// surplus bits of the top limb (bits `BITS..LIMBS*L::BITS`) are always zero;
/// every mutator re-applies that mask before returning.
#[derive(Clone, Copy)]
pub struct BlockStore<const BITS: usize, const LIMBS: usize, L: Limb, K: Kind> {
    limbs: [L; LIMBS],
    _kind: PhantomData<K>,
}

impl<const BITS: usize, const LIMBS: usize, L: Limb, K: Kind> BlockStore<BITS, LIMBS, L, K> {
    /// The all-zero value.
    pub fn new() -> Self {
        Self {
            limbs: [L::ZERO; LIMBS],
            _kind: PhantomData,
        }
    }

    /// Build from a raw little-endian limb array, masking surplus bits.
    pub fn from_limbs(limbs: [L; LIMBS]) -> Self {
        let mut store = Self {
            limbs,
            _kind: PhantomData,
        };
        store.apply_mask();
        store
    }

    /// The raw little-endian limb array.
    pub fn into_limbs(self) -> [L; LIMBS] {
        self.limbs
    }

    /// Total addressable bit width.
    pub const fn bits() -> usize {
        BITS
    }

    /// Reset to all-zero in place.
    pub fn clear(&mut self) {
        self.limbs = [L::ZERO; LIMBS];
    }

    /// True iff every bit is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|limb| *limb == L::ZERO)
    }

    /// Bounds-safe bit read: `false` for `i >= BITS`.
    pub fn get_bit(&self, i: usize) -> bool {
        if i >= BITS {
            return false;
        }
        let limb_bits = L::BITS as usize;
        self.limbs[i / limb_bits].bit((i % limb_bits) as u32)
    }

    /// Bounds-safe bit write: a no-op for `i >= BITS`.
    pub fn set_bit(&mut self, i: usize, value: bool) {
        if i >= BITS {
            return;
        }
        self.set_bit_unchecked(i, value);
        self.apply_mask();
    }

    fn set_bit_unchecked(&mut self, i: usize, value: bool) {
        let limb_bits = L::BITS as usize;
        let idx = i / limb_bits;
        self.limbs[idx] = self.limbs[idx].set_bit((i % limb_bits) as u32, value);
    }

    /// Bounds-safe limb read: `L::ZERO` for `i >= LIMBS`.
    pub fn get_limb(&self, i: usize) -> L {
        self.limbs.get(i).copied().unwrap_or(L::ZERO)
    }

    /// Bounds-safe limb write; reapplies the surplus mask if the top limb
    /// was touched.
    pub fn set_limb(&mut self, i: usize, value: L) {
        if i >= LIMBS {
            return;
        }
        self.limbs[i] = value;
        self.apply_mask();
    }

    /// Set the low bits from a host `u64`, zeroing every limb above it
    /// (spec.md §4.1 `set_bits`).
    pub fn set_bits(&mut self, value: u64) {
        let limb_bits = L::BITS;
        for (j, limb) in self.limbs.iter_mut().enumerate() {
            let shift = j as u32 * limb_bits;
            *limb = if shift >= u64::BITS {
                L::ZERO
            } else {
                L::from_u64(value >> shift)
            };
        }
        self.apply_mask();
    }

    /// In-place one's complement.
    pub fn flip(&mut self) {
        for limb in self.limbs.iter_mut() {
            *limb = !*limb;
        }
        self.apply_mask();
    }

    /// In-place two's complement (`flip` then `+1`).
    pub fn twos_complement(&mut self) {
        self.flip();
        self.increment();
    }

    /// `self += 1`, wrapping. Returns the carry out of the top limb.
    pub fn increment(&mut self) -> bool {
        let mut carry = true;
        for limb in self.limbs.iter_mut() {
            let (sum, c) = limb.adc(L::ZERO, carry);
            *limb = sum;
            carry = c;
            if !carry {
                break;
            }
        }
        self.apply_mask();
        carry
    }

    /// `self -= 1`, wrapping. Returns the borrow out of the top limb.
    pub fn decrement(&mut self) -> bool {
        let mut borrow = true;
        for limb in self.limbs.iter_mut() {
            let (diff, b) = limb.sbb(L::ZERO, borrow);
            *limb = diff;
            borrow = b;
            if !borrow {
                break;
            }
        }
        self.apply_mask();
        borrow
    }

    /// `self += other`, wrapping modulo `2^BITS`. Returns the carry out of
    /// the limb array (not masked to `BITS`; callers needing an `N+1`-bit
    /// staging width should widen the store instead of relying on this).
    pub fn add_assign(&mut self, other: &Self) -> bool {
        let mut carry = false;
        for i in 0..LIMBS {
            let (sum, c) = self.limbs[i].adc(other.limbs[i], carry);
            self.limbs[i] = sum;
            carry = c;
        }
        self.apply_mask();
        carry
    }

    /// `self -= other`, wrapping modulo `2^BITS`. Returns the borrow out of
    /// the limb array.
    pub fn sub_assign(&mut self, other: &Self) -> bool {
        let mut borrow = false;
        for i in 0..LIMBS {
            let (diff, b) = self.limbs[i].sbb(other.limbs[i], borrow);
            self.limbs[i] = diff;
            borrow = b;
        }
        self.apply_mask();
        borrow
    }

    /// Shift left by `k` bits, zero-filling from the bottom. Clears entirely
    /// for `k >= BITS`.
    pub fn shift_left(&mut self, k: u32) {
        if k as usize >= BITS {
            self.clear();
            return;
        }
        let limb_bits = L::BITS;
        let q = (k / limb_bits) as usize;
        let r = k % limb_bits;
        if r == 0 {
            for i in (0..LIMBS).rev() {
                self.limbs[i] = if i >= q { self.limbs[i - q] } else { L::ZERO };
            }
        } else {
            for i in (0..LIMBS).rev() {
                let hi = if i >= q { self.limbs[i - q].shl(r) } else { L::ZERO };
                let lo = if i >= q + 1 {
                    self.limbs[i - q - 1].shr(limb_bits - r)
                } else {
                    L::ZERO
                };
                self.limbs[i] = hi | lo;
            }
        }
        self.apply_mask();
    }

    /// Shift right by `k` bits. Sign-extends for `K = Signed` (the sign bit
    /// is sampled *before* the shift), zero-extends for `K = Unsigned`
    /// (spec.md §4.1).
    pub fn shift_right_arith(&mut self, k: u32) {
        let sign = K::IS_SIGNED && self.get_bit(BITS - 1);
        self.shift_right_logical(k);
        if sign {
            let fill_from = BITS.saturating_sub(k as usize);
            for i in fill_from..BITS {
                self.set_bit_unchecked(i, true);
            }
            self.apply_mask();
        }
    }

    fn shift_right_logical(&mut self, k: u32) {
        if k as usize >= BITS {
            self.clear();
            return;
        }
        let limb_bits = L::BITS;
        let q = (k / limb_bits) as usize;
        let r = k % limb_bits;
        if r == 0 {
            for i in 0..LIMBS {
                self.limbs[i] = if i + q < LIMBS { self.limbs[i + q] } else { L::ZERO };
            }
        } else {
            for i in 0..LIMBS {
                let lo = if i + q < LIMBS { self.limbs[i + q].shr(r) } else { L::ZERO };
                let hi = if i + q + 1 < LIMBS {
                    self.limbs[i + q + 1].shl(limb_bits - r)
                } else {
                    L::ZERO
                };
                self.limbs[i] = lo | hi;
            }
        }
        self.apply_mask();
    }

    /// Three-way compare (spec.md §4.1 "Comparison"): lexicographic
    /// top-down for `Unsigned`; sign-aware (opposite signs decide, same
    /// sign falls back to a wrapping subtraction) for `Signed`.
    pub fn compare(&self, other: &Self) -> Ordering {
        if K::IS_SIGNED && BITS > 0 {
            let a_neg = self.get_bit(BITS - 1);
            let b_neg = other.get_bit(BITS - 1);
            if a_neg != b_neg {
                return if a_neg { Ordering::Less } else { Ordering::Greater };
            }
            let mut diff = *self;
            diff.sub_assign(other);
            if diff.is_zero() {
                Ordering::Equal
            } else if diff.get_bit(BITS - 1) {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        } else {
            for i in (0..LIMBS).rev() {
                match self.limbs[i].cmp(&other.limbs[i]) {
                    Ordering::Equal => continue,
                    ord => return ord,
                }
            }
            Ordering::Equal
        }
    }

    const fn top_limb_mask() -> L {
        let limb_bits = L::BITS as usize;
        let rem = BITS % limb_bits;
        if rem == 0 {
            L::ALL_ONES
        } else {
            // Build a `rem`-bit low mask without shifting by `limb_bits`
            // (shifting a `$t` by its own width is UB for the primitive
            // shift operators, so this walks bit-by-bit instead).
            let mut mask = L::ZERO;
            let mut i = 0;
            while i < rem {
                mask = mask.set_bit(i as u32, true);
                i += 1;
            }
            mask
        }
    }

    fn apply_mask(&mut self) {
        if LIMBS == 0 {
            return;
        }
        self.limbs[LIMBS - 1] = self.limbs[LIMBS - 1] & Self::top_limb_mask();
    }
}

impl<const BITS: usize, const LIMBS: usize, L: Limb, K: Kind> Default for BlockStore<BITS, LIMBS, L, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const BITS: usize, const LIMBS: usize, L: Limb, K: Kind> PartialEq for BlockStore<BITS, LIMBS, L, K> {
    fn eq(&self, other: &Self) -> bool {
        self.limbs == other.limbs
    }
}

impl<const BITS: usize, const LIMBS: usize, L: Limb, K: Kind> Eq for BlockStore<BITS, LIMBS, L, K> {}

impl<const BITS: usize, const LIMBS: usize, L: Limb, K: Kind> core::fmt::Debug for BlockStore<BITS, LIMBS, L, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockStore")
            .field("bits", &BITS)
            .field("limbs", &self.limbs)
            .finish()
    }
}

#[cfg(feature = "serde")]
impl<const BITS: usize, const LIMBS: usize, L: Limb + serde::Serialize, K: Kind> serde::Serialize
    for BlockStore<BITS, LIMBS, L, K>
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut tup = serializer.serialize_tuple(LIMBS)?;
        for limb in &self.limbs {
            tup.serialize_element(limb)?;
        }
        tup.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, const BITS: usize, const LIMBS: usize, L, K> serde::Deserialize<'de> for BlockStore<BITS, LIMBS, L, K>
where
    L: Limb + serde::Deserialize<'de>,
    K: Kind,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor<const BITS: usize, const LIMBS: usize, L, K>(PhantomData<(L, K)>);

        impl<'de, const BITS: usize, const LIMBS: usize, L, K> serde::de::Visitor<'de> for Visitor<BITS, LIMBS, L, K>
        where
            L: Limb + serde::Deserialize<'de>,
            K: Kind,
        {
            type Value = BlockStore<BITS, LIMBS, L, K>;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "a tuple of {LIMBS} limbs")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut limbs = [L::ZERO; LIMBS];
                for (i, limb) in limbs.iter_mut().enumerate() {
                    *limb = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
                }
                Ok(BlockStore::from_limbs(limbs))
            }
        }

        deserializer.deserialize_tuple(LIMBS, Visitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{Signed, Unsigned};

    type U8x1 = BlockStore<8, 1, u8, Unsigned>;
    type S12x2 = BlockStore<12, 2, u8, Signed>;

    #[test]
    fn surplus_bits_stay_zero() {
        let mut v = S12x2::new();
        v.set_limb(1, 0xFF);
        assert_eq!(v.get_limb(1), 0x0F, "top nibble of the MSU must be masked");
    }

    #[test]
    fn set_bit_out_of_range_is_noop() {
        let mut v = U8x1::new();
        v.set_bit(100, true);
        assert!(v.is_zero());
        assert!(!v.get_bit(100));
    }

    #[test]
    fn shift_left_crosses_limb_boundary() {
        let mut v = S12x2::new();
        v.set_bits(1);
        v.shift_left(9);
        assert!(v.get_bit(9));
        assert!(!v.get_bit(8));
        assert!(!v.get_bit(10));
    }

    #[test]
    fn shift_right_arith_sign_extends() {
        let mut v = S12x2::new();
        v.set_bits(0xFFF); // all 12 bits set: -1 in two's complement
        v.shift_right_arith(4);
        assert_eq!(v.get_limb(0), 0xFF);
        assert_eq!(v.get_limb(1), 0x0F);
    }

    #[test]
    fn shift_right_logical_zero_extends_for_unsigned() {
        let mut v: BlockStore<12, 2, u8, Unsigned> = BlockStore::new();
        v.set_bits(0xFFF);
        v.shift_right_arith(4);
        assert_eq!(v.get_limb(1), 0x00);
    }

    #[test]
    fn twos_complement_round_trips() {
        let mut v = S12x2::new();
        v.set_bits(5);
        v.twos_complement();
        v.twos_complement();
        assert_eq!(v.get_limb(0), 5);
    }

    #[test]
    fn compare_signed_opposite_signs() {
        let mut neg = S12x2::new();
        neg.set_bits(1);
        neg.twos_complement(); // -1
        let mut pos = S12x2::new();
        pos.set_bits(1); // +1
        assert_eq!(neg.compare(&pos), Ordering::Less);
        assert_eq!(pos.compare(&neg), Ordering::Greater);
    }

    #[test]
    fn add_sub_wrap_modularly() {
        let mut a = U8x1::new();
        a.set_bits(250);
        let mut b = U8x1::new();
        b.set_bits(10);
        a.add_assign(&b);
        assert_eq!(a.get_limb(0), 4);
        a.sub_assign(&b);
        assert_eq!(a.get_limb(0), 250);
    }
}
