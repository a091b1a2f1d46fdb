//! Split service: single entry point for tagged allocation requests.

use tracing::warn;

use super::allocation::SplitEngine;
use super::error::AllocationError;
use super::types::{Allocation, AllocationRequest, SplitRequest};

/// Dispatches an [`AllocationRequest`] to its strategy.
pub struct SplitService;

impl SplitService {
    /// Allocate the request's total with the strategy it names.
    ///
    /// # Example
    ///
    /// ```
    /// use splitledger_core::split::{AllocationRequest, SplitService};
    /// use splitledger_shared::Money;
    ///
    /// let request = AllocationRequest::equal(Money::from_subunits(10_000), ["a", "b", "c", "d"]);
    /// let allocation = SplitService::allocate(&request).unwrap();
    /// assert!(allocation.iter().all(|(_, share)| share == Money::from_subunits(2_500)));
    /// ```
    pub fn allocate(request: &AllocationRequest) -> Result<Allocation, AllocationError> {
        let result = match &request.split {
            SplitRequest::Equal { participants } => {
                SplitEngine::equal(request.total, participants)
            }
            SplitRequest::Exact { shares } => SplitEngine::exact(request.total, shares.clone()),
            SplitRequest::Percentage { weights } => {
                SplitEngine::percentage(request.total, weights)
            }
        };

        if let Err(err) = &result {
            warn!(
                method = %request.method(),
                code = err.error_code(),
                error = %err,
                "Allocation request rejected"
            );
        }
        result
    }
}
