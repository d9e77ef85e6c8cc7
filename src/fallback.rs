//! Precise distance source with geometric patching.
//!
//! [`FallbackSource`] wraps a [`PairwiseDistanceProvider`] and always yields a
//! complete matrix: a whole-call failure is replaced by a haversine matrix,
//! and individual failed cells are replaced by the haversine estimate for
//! that pair while the precise cells are kept.

use tracing::warn;

use crate::coordinate::Coordinate;
use crate::haversine::{HaversineSource, haversine_miles};
use crate::matrix::{DistanceMatrix, MatrixSource, PairwiseMatrix};
use crate::traits::{DistanceSource, PairwiseDistanceProvider};

#[derive(Debug, Clone)]
pub struct FallbackSource<P> {
    provider: P,
}

impl<P: PairwiseDistanceProvider> FallbackSource<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn patch(
        &self,
        precise: PairwiseMatrix,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> DistanceMatrix {
        let square = origins == destinations;
        let mut patched = 0;

        let miles: Vec<Vec<f64>> = precise
            .cells
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, cell)| {
                        if square && i == j {
                            return 0.0;
                        }
                        match cell {
                            Ok(leg) if is_valid_distance(leg.distance_miles) => leg.distance_miles,
                            _ => {
                                patched += 1;
                                haversine_miles(origins[i], destinations[j])
                            }
                        }
                    })
                    .collect()
            })
            .collect();

        let source = if patched == 0 {
            MatrixSource::Precise
        } else {
            warn!(
                provider = self.provider.name(),
                cells = patched,
                "patched failed distance cells with haversine estimates"
            );
            MatrixSource::Patched { cells: patched }
        };

        DistanceMatrix::new(miles, source)
    }
}

fn is_valid_distance(miles: f64) -> bool {
    miles.is_finite() && miles >= 0.0
}

impl<P: PairwiseDistanceProvider> DistanceSource for FallbackSource<P> {
    fn matrix(&self, origins: &[Coordinate], destinations: &[Coordinate]) -> DistanceMatrix {
        match self.provider.pairwise(origins, destinations) {
            Ok(precise)
                if precise.rows() == origins.len()
                    && precise.cells.iter().all(|row| row.len() == destinations.len()) =>
            {
                self.patch(precise, origins, destinations)
            }
            Ok(precise) => {
                warn!(
                    provider = self.provider.name(),
                    rows = precise.rows(),
                    cols = precise.cols(),
                    "distance provider returned a malformed matrix, using haversine"
                );
                HaversineSource.matrix(origins, destinations)
            }
            Err(err) => {
                warn!(
                    provider = self.provider.name(),
                    error = %err,
                    "distance provider failed, using haversine"
                );
                HaversineSource.matrix(origins, destinations)
            }
        }
    }
}
