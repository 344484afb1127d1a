//! Compile-time policy tags for [`crate::BigInteger`], [`crate::FixedPoint`],
//! and [`crate::LnsBase2`] (spec.md §3, §6).
//!
//! These are distinct from [`unum_types::Kind`], which tags a raw
//! [`unum_types::BlockStore`] as signed or unsigned storage. The policies
//! here tag the *number system* built on top of that storage.

mod private {
    pub trait Sealed {}
}

/// `BigInteger`'s value-range policy (spec.md §3 `BigInteger`).
pub trait IntegerKind: private::Sealed + Copy + Clone + core::fmt::Debug + 'static {
    /// Forbids negative results.
    const FORBIDS_NEGATIVE: bool;
    /// Forbids a subtraction or division result of exactly zero.
    const FORBIDS_ZERO: bool;
}

/// Ordinary two's-complement signed integer; no restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integer;

/// Forbids zero: subtraction or division that would produce `0` fails with
/// [`unum_types::Error::NonRepresentableZero`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Whole;

/// Forbids zero *and* negative results
/// ([`unum_types::Error::NegativeNotAllowed`] takes priority when both would
/// apply, since a negative result is never zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl private::Sealed for Integer {}
impl private::Sealed for Whole {}
impl private::Sealed for Natural {}

impl IntegerKind for Integer {
    const FORBIDS_NEGATIVE: bool = false;
    const FORBIDS_ZERO: bool = false;
}

impl IntegerKind for Whole {
    const FORBIDS_NEGATIVE: bool = false;
    const FORBIDS_ZERO: bool = true;
}

impl IntegerKind for Natural {
    const FORBIDS_NEGATIVE: bool = true;
    const FORBIDS_ZERO: bool = true;
}

/// `FixedPoint` / `LnsBase2`'s overflow policy (spec.md §3, §6).
pub trait NumericPolicy: private::Sealed + Copy + Clone + core::fmt::Debug + 'static {
    /// True for [`Saturating`].
    const SATURATES: bool;
}

/// Out-of-range results wrap modulo `2^N`, identical to `BlockStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulo;

/// Out-of-range results clamp to the type's representable maximum/minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Saturating;

impl private::Sealed for Modulo {}
impl private::Sealed for Saturating {}

impl NumericPolicy for Modulo {
    const SATURATES: bool = false;
}

impl NumericPolicy for Saturating {
    const SATURATES: bool = true;
}
