#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::wrong_self_convention)]

//! Arbitrary-configuration fixed-size numeric types.
//!
//! Four families, each a compile-time-configured type with no heap
//! allocation and no dynamic dispatch in its arithmetic core:
//!
//! - [`Integer`] / [`BigInteger`] — signed two's-complement integers, with
//!   `Whole`/`Natural` policy variants that forbid zero and/or negative
//!   results.
//! - [`FixedPoint`] — binary fixed-point, with `Modulo`/`Saturating`
//!   overflow policies.
//! - [`Posit`] — tapered-precision posits (re-exported from `unum-codec`'s
//!   [`PositCodec`]/[`Triple`] layer).
//! - [`Lns`] / [`LnsBase2`] — base-2 logarithmic numbers.
//!
//! Every family shares the same [`unum_types::BlockStore`] backing storage
//! and the same [`unum_types::Error`] taxonomy, and every fallible surface
//! operation is generic over a compile-time `P: `[`ErrorPolicy`] that picks
//! between panicking (`Throw`) and a logged sentinel value (`Sentinel`).

#[cfg(feature = "alloc")]
extern crate alloc;

mod big_integer;
mod fixed_point;
mod integer;
mod knuth;
mod lns;
mod policy;
mod posit;
pub mod types;

pub use big_integer::BigInteger;
pub use fixed_point::FixedPoint;
pub use integer::Integer;
pub use lns::{Lns, LnsBase2};
pub use policy::{IntegerKind, Modulo, Natural, NumericPolicy, Saturating, Whole};
pub use policy::Integer as IntegerPolicy;
pub use posit::Posit;

pub use unum_codec::{PositBits, PositCodec, SignificandBuffer, Triple, TripleKind};
pub use unum_types::{
    round_to_nearest_even, BlockStore, Classification, Error, ErrorPolicy, IeeeDecoder, IeeeFields, Kind, Limb,
    Result, RoundInput, Sentinel, Signed, Throw, Unsigned,
};

/// Commonly paired imports; mirrors how downstream crates in this
/// ecosystem glob-import a single `prelude` module instead of naming every
/// type individually.
pub mod prelude {
    pub use crate::policy::{Integer as IntegerPolicy, Modulo, Natural, Saturating, Whole};
    pub use crate::{BigInteger, FixedPoint, Integer, Lns, LnsBase2, Posit};
    pub use unum_types::{Error, ErrorPolicy, Kind, Limb, Result, Sentinel, Signed, Throw, Unsigned};
}
