//! Core business logic for SplitLedger.
//!
//! This crate contains pure business logic with ZERO I/O or storage dependencies.
//! It turns a total amount and a split request into per-participant shares
//! whose sum is exactly the total.
//!
//! # Modules
//!
//! - `split` - Allocation engine (equal, exact, percentage) and validation

pub mod split;
