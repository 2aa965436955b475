//! Shared building blocks for the staking vault contracts.
//!
//! This crate provides:
//! - [`fixed_point`]: WAD-scaled floor arithmetic used by every ledger
//!   computation.
//! - [`access`]: the tiered administrator registry that gates campaign
//!   management.

#![no_std]

pub mod access;
pub mod fixed_point;

pub use access::AdminTier;
pub use fixed_point::{SECONDS_PER_YEAR, WAD};
