//! Expense splitting.
//!
//! This module implements the allocation engine:
//! - Request and result types (`AllocationRequest`, `Allocation`)
//! - Equal, exact, and percentage strategies with lexical remainder distribution
//! - Zero-leakage validation of computed or stored allocations
//! - Split service dispatching tagged requests
//! - Error types for rejected requests

pub mod allocation;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod props;

pub use allocation::SplitEngine;
pub use error::{AllocationError, ErrorKind};
pub use service::SplitService;
pub use types::{Allocation, AllocationRequest, SplitMethod, SplitRequest};
pub use validation::{ensure_balanced, validate_allocation};
