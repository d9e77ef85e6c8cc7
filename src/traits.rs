//! Core traits for the route optimizer.
//!
//! Applications implement [`Stop`] for their own appointment records; the
//! optimizer only reads the id, location and service duration and never looks
//! at anything else.

use std::hash::Hash;

use crate::coordinate::Coordinate;
use crate::error::DistanceProviderError;
use crate::matrix::{DistanceMatrix, PairwiseMatrix};

/// Unique identifier for stops.
pub trait Id: Clone + Eq + Hash {}

impl<T> Id for T where T: Clone + Eq + Hash {}

/// One appointment to visit.
pub trait Stop {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    fn location(&self) -> Coordinate;

    /// Time spent on site, in minutes.
    fn service_duration_minutes(&self) -> u32;
}

/// Precise, fallible distance service queried in batches.
///
/// Implementations convert service-native units to miles and minutes.
pub trait PairwiseDistanceProvider: Send + Sync {
    fn pairwise(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<PairwiseMatrix, DistanceProviderError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Infallible distance capability consumed by the optimizer.
///
/// The returned matrix is `origins.len() x destinations.len()` with every cell
/// a finite, non-negative mileage.
pub trait DistanceSource: Send + Sync {
    fn matrix(&self, origins: &[Coordinate], destinations: &[Coordinate]) -> DistanceMatrix;
}
