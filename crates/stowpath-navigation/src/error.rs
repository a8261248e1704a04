//! This module defines the error types used by the `stowpath-navigation` crate.

#![warn(missing_docs)]

use thiserror::Error;

/// Error type for pathfinding requests.
///
/// Only [`PlannerError::InvalidRequest`] ever reaches a caller as an `Err`;
/// the service boundary turns every other variant into a failed
/// [`PathResult`](crate::result::PathResult) carrying the error's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    /// The request failed validation before any geometry was loaded.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// The geometry source has no warehouse with this id.
    #[error("Warehouse {0} not found")]
    WarehouseNotFound(i64),
    /// The warehouse snapshot has no placement for this pallet.
    #[error("Pallet {0} not found")]
    PalletNotFound(i64),
    /// The stored layout is inconsistent and cannot be planned on.
    #[error("Invalid warehouse layout: {0}")]
    InvalidLayout(String),
    /// The geometry source failed to produce a layout.
    #[error("Geometry source failure: {0}")]
    Source(String),
    /// The search task stopped without producing a result.
    #[error("Internal planner failure: {0}")]
    Internal(String),
}
