#![cfg_attr(not(feature = "std"), no_std)]

//! Shared storage layer for the `unum` number types.
//!
//! Everything in this crate is a leaf: the block-addressable [`BlockStore`],
//! the [`Limb`] abstraction over the storage unit, the IEEE-754 decoder, and
//! the error taxonomy shared by every arithmetic core built on top of it.

mod block_store;
mod error;
mod ieee;
mod kind;
mod limb;
mod policy;
mod rounding;

pub use block_store::{limb_count, BlockStore};
pub use error::{Error, Result};
pub use ieee::{Classification, IeeeDecoder, IeeeFields};
pub use kind::{Kind, Signed, Unsigned};
pub use limb::Limb;
pub use policy::{ErrorPolicy, Sentinel, Throw};
pub use rounding::{round_to_nearest_even, RoundInput};
