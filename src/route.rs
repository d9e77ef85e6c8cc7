//! Route construction heuristics.
//!
//! Both builders are greedy nearest-neighbor constructions over a
//! [`DistanceMatrix`]. They are deterministic for a fixed matrix and input
//! order: among equally near candidates the earliest stop in input order wins.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use crate::error::OptimizeError;
use crate::matrix::DistanceMatrix;
use crate::traits::Stop;

/// Matrix positions for one optimization call.
///
/// The origin, when present, is matrix index 0 and stop `k` (input order) is
/// index `k + 1`; without an origin stop `k` is index `k`. Stop ids must be
/// unique.
#[derive(Debug, Clone)]
pub struct MatrixIndex {
    origin: Option<usize>,
    stops: Vec<usize>,
}

impl MatrixIndex {
    pub fn new<S: Stop>(stops: &[S], has_origin: bool) -> Result<Self, OptimizeError> {
        let offset = usize::from(has_origin);
        let mut seen = HashSet::with_capacity(stops.len());
        let mut indices = Vec::with_capacity(stops.len());

        for (position, stop) in stops.iter().enumerate() {
            if !seen.insert(stop.id().clone()) {
                return Err(OptimizeError::DuplicateStopId { position });
            }
            indices.push(position + offset);
        }

        Ok(Self {
            origin: has_origin.then_some(0),
            stops: indices,
        })
    }

    pub fn origin(&self) -> Option<usize> {
        self.origin
    }

    /// Matrix index of each stop, in input order.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

}

/// A visiting order over the input stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Positions into the input stop list.
    pub order: Vec<usize>,
    pub distance_miles: f64,
    /// Whether `distance_miles` includes the leg back to the start.
    pub closed: bool,
}

impl Route {
    fn empty(closed: bool) -> Self {
        Self {
            order: Vec::new(),
            distance_miles: 0.0,
            closed,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RouteBuilder<'a> {
    matrix: &'a DistanceMatrix,
    origin: Option<usize>,
    stops: &'a [usize],
}

impl<'a> RouteBuilder<'a> {
    /// `stops` holds the matrix index of each stop in input order.
    pub fn new(matrix: &'a DistanceMatrix, origin: Option<usize>, stops: &'a [usize]) -> Self {
        Self {
            matrix,
            origin,
            stops,
        }
    }

    pub fn from_index(matrix: &'a DistanceMatrix, index: &'a MatrixIndex) -> Self {
        Self::new(matrix, index.origin(), index.stops())
    }

    /// Where a closed loop starts and ends: the origin, else the first stop.
    fn anchor(&self) -> Option<usize> {
        self.origin.or_else(|| self.stops.first().copied())
    }

    /// Open path by nearest neighbor.
    ///
    /// Starts at the origin, or at the first stop when there is none. The
    /// distance excludes any return leg.
    pub fn nearest_neighbor(&self) -> Route {
        if self.stops.is_empty() {
            return Route::empty(false);
        }

        let mut visited = vec![false; self.stops.len()];
        let mut order = Vec::with_capacity(self.stops.len());
        let current = self.start(&mut visited, &mut order);
        self.extend_greedy(current, &mut visited, &mut order);

        let distance_miles = self.distance(&order, false);
        Route {
            order,
            distance_miles,
            closed: false,
        }
    }

    /// Closed loop by exhaustive forced-final nearest neighbor.
    ///
    /// Every stop (other than the first stop when it is the anchor) is tried
    /// as the last stop before returning; the shortest loop wins, ties going
    /// to the earliest candidate in input order.
    pub fn round_trip(&self) -> Route {
        let n = self.stops.len();
        if n == 0 {
            return Route::empty(true);
        }

        let first_candidate = usize::from(self.origin.is_none());
        if first_candidate >= n {
            // Lone stop serving as its own anchor.
            return Route {
                order: vec![0],
                distance_miles: 0.0,
                closed: true,
            };
        }

        let candidates: Vec<Route> = (first_candidate..n)
            .into_par_iter()
            .map(|last| self.forced_final(last))
            .collect();

        let route = candidates
            .into_iter()
            .reduce(|best, candidate| {
                if candidate.distance_miles < best.distance_miles {
                    candidate
                } else {
                    best
                }
            })
            .unwrap_or_else(|| Route::empty(true));
        debug!(
            stops = n,
            candidates = n - first_candidate,
            miles = route.distance_miles,
            "round-trip candidate search finished"
        );
        route
    }

    /// Nearest-neighbor loop that holds `last` back until every other stop
    /// has been visited.
    pub fn forced_final(&self, last: usize) -> Route {
        let mut visited = vec![false; self.stops.len()];
        let mut order = Vec::with_capacity(self.stops.len());
        let current = self.start(&mut visited, &mut order);

        let held_back = !visited[last];
        visited[last] = true;
        self.extend_greedy(current, &mut visited, &mut order);
        if held_back {
            order.push(last);
        }

        let distance_miles = self.distance(&order, true);
        Route {
            order,
            distance_miles,
            closed: true,
        }
    }

    /// Total distance of `order`, starting at the origin when present.
    ///
    /// With `closed`, adds the leg from the last stop back to the anchor.
    pub fn distance(&self, order: &[usize], closed: bool) -> f64 {
        let mut total = 0.0;
        let mut previous = self.origin;

        for &position in order {
            let index = self.stops[position];
            if let Some(from) = previous {
                total += self.matrix.get(from, index);
            }
            previous = Some(index);
        }

        if closed && !order.is_empty() {
            if let (Some(last), Some(home)) = (previous, self.anchor()) {
                total += self.matrix.get(last, home);
            }
        }

        total
    }

    /// Matrix distance of the leg ending at `order[step]`; zero for the
    /// first stop when there is no origin.
    pub fn leg_distance(&self, order: &[usize], step: usize) -> f64 {
        let to = self.stops[order[step]];
        let from = if step == 0 {
            self.origin
        } else {
            Some(self.stops[order[step - 1]])
        };
        from.map_or(0.0, |from| self.matrix.get(from, to))
    }

    /// Matrix distance from the last stop of `order` back to the anchor.
    pub fn return_distance(&self, order: &[usize]) -> Option<f64> {
        let last = self.stops[*order.last()?];
        let home = self.anchor()?;
        Some(self.matrix.get(last, home))
    }

    /// Place the starting point and return its matrix index.
    fn start(&self, visited: &mut [bool], order: &mut Vec<usize>) -> usize {
        match self.origin {
            Some(origin) => origin,
            None => {
                visited[0] = true;
                order.push(0);
                self.stops[0]
            }
        }
    }

    /// Greedily append unvisited stops starting from matrix index `current`.
    fn extend_greedy(&self, mut current: usize, visited: &mut [bool], order: &mut Vec<usize>) {
        while let Some(next) = self.nearest_unvisited(current, visited) {
            visited[next] = true;
            order.push(next);
            current = self.stops[next];
        }
    }

    fn nearest_unvisited(&self, from: usize, visited: &[bool]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (position, &index) in self.stops.iter().enumerate() {
            if visited[position] {
                continue;
            }
            let distance = self.matrix.get(from, index);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((position, distance)),
            }
        }
        best.map(|(position, _)| position)
    }
}
