//! Test fixtures for route-optimizer.
//!
//! Provides:
//! - A `TestStop` builder implementing `Stop`
//! - Mock pairwise providers (failing, flaky, fixed, call-counting)
//! - A realistic day of service appointments around Henderson, NV

#![allow(dead_code)]

pub mod service_day;

use std::sync::atomic::{AtomicUsize, Ordering};

use route_optimizer::coordinate::Coordinate;
use route_optimizer::error::{DistanceProviderError, PartialDistanceError};
use route_optimizer::matrix::{Leg, PairwiseCell, PairwiseMatrix};
use route_optimizer::traits::{PairwiseDistanceProvider, Stop};

// ============================================================================
// Stops
// ============================================================================

/// Builder for test stops with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestStop {
    pub id: String,
    pub location: Coordinate,
    pub duration_min: u32,
}

impl TestStop {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            location: Coordinate::new(0.0, 0.0),
            duration_min: 30,
        }
    }

    pub fn location(mut self, lat: f64, lng: f64) -> Self {
        self.location = Coordinate::new(lat, lng);
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration_min = minutes;
        self
    }
}

impl Stop for TestStop {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn location(&self) -> Coordinate {
        self.location
    }

    fn service_duration_minutes(&self) -> u32 {
        self.duration_min
    }
}

// ============================================================================
// Providers
// ============================================================================

/// Always fails the whole call and counts how often it was asked.
#[derive(Default)]
pub struct FailingProvider {
    pub calls: AtomicUsize,
}

impl FailingProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PairwiseDistanceProvider for FailingProvider {
    fn pairwise(
        &self,
        _origins: &[Coordinate],
        _destinations: &[Coordinate],
    ) -> Result<PairwiseMatrix, DistanceProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DistanceProviderError::Service {
            code: "NoSegment".to_string(),
            message: "service unavailable".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Serves a fixed table, failing the listed cells.
pub struct FixedProvider {
    pub miles: Vec<Vec<f64>>,
    pub failures: Vec<(usize, usize)>,
    pub calls: AtomicUsize,
}

impl FixedProvider {
    pub fn new(miles: Vec<Vec<f64>>) -> Self {
        Self {
            miles,
            failures: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_cell(mut self, origin: usize, destination: usize) -> Self {
        self.failures.push((origin, destination));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PairwiseDistanceProvider for FixedProvider {
    fn pairwise(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<PairwiseMatrix, DistanceProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let cells: Vec<Vec<PairwiseCell>> = (0..origins.len())
            .map(|i| {
                (0..destinations.len())
                    .map(|j| {
                        if self.failures.contains(&(i, j)) {
                            Err(PartialDistanceError::new(i, j, "no route found"))
                        } else {
                            Ok(Leg {
                                distance_miles: self.miles[i][j],
                                duration_minutes: self.miles[i][j] * 2.0,
                            })
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(PairwiseMatrix::new(cells))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn ids<I: Clone>(route: &[route_optimizer::ScheduledStop<I>]) -> Vec<I> {
    route.iter().map(|stop| stop.id.clone()).collect()
}

/// Sorted copy, for permutation checks.
pub fn sorted(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values
}
