//! Erasure coding engine
//!
//! This module provides the GF(2^8) arithmetic and the RAID-6 coder that
//! computes P/Q parity shards and reconstructs missing shards from the
//! survivors.

pub mod coder;
pub mod gf;

#[cfg(test)]
mod proptest;

pub use coder::Coder;
pub use gf::GfTables;
