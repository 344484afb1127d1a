#![cfg_attr(not(feature = "std"), no_std)]

//! Posit codec and its staging types, built on `unum-types`' `BlockStore`.
//!
//! Layering: [`SignificandBuffer`] is the raw unsigned bit staging area,
//! [`Triple`] is the normalised `(sign, scale, mantissa)` value arithmetic
//! runs on, and [`PositCodec`] is the bidirectional map between an `N`-bit
//! posit code and a `Triple`.

mod posit_codec;
mod significand_buffer;
mod triple;

pub use posit_codec::{PositBits, PositCodec};
pub use significand_buffer::SignificandBuffer;
pub use triple::{Triple, TripleKind};
