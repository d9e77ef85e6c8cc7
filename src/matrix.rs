//! Distance matrices exchanged between distance sources and the route builder.

use serde::Serialize;

use crate::error::PartialDistanceError;

/// Where the distances in a [`DistanceMatrix`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum MatrixSource {
    /// Every cell is a precise provider value.
    Precise,
    /// Precise values with `cells` entries replaced by geometric estimates.
    Patched { cells: usize },
    /// Every cell is a geometric estimate.
    Geometric,
}

/// Rectangular table of distances in miles, indexed `[origin][destination]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    miles: Vec<Vec<f64>>,
    source: MatrixSource,
}

impl DistanceMatrix {
    pub fn new(miles: Vec<Vec<f64>>, source: MatrixSource) -> Self {
        Self { miles, source }
    }

    /// Build a full matrix by evaluating `distance` for every pair.
    pub fn from_fn<F>(rows: usize, cols: usize, source: MatrixSource, mut distance: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let miles: Vec<Vec<f64>> = (0..rows)
            .map(|i| (0..cols).map(|j| distance(i, j)).collect())
            .collect();
        Self { miles, source }
    }

    pub fn get(&self, origin: usize, destination: usize) -> f64 {
        self.miles[origin][destination]
    }

    pub fn rows(&self) -> usize {
        self.miles.len()
    }

    pub fn cols(&self) -> usize {
        self.miles.first().map_or(0, Vec::len)
    }

    pub fn source(&self) -> MatrixSource {
        self.source
    }
}

/// One precise answer from a pairwise provider, already converted to miles/minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub distance_miles: f64,
    pub duration_minutes: f64,
}

/// Raw provider answer; each cell either succeeded or failed on its own.
pub type PairwiseCell = Result<Leg, PartialDistanceError>;

/// Provider response for `origins x destinations`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMatrix {
    pub cells: Vec<Vec<PairwiseCell>>,
}

impl PairwiseMatrix {
    pub fn new(cells: Vec<Vec<PairwiseCell>>) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Number of cells that failed.
    pub fn failed_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_err())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_fills_every_cell() {
        let matrix =
            DistanceMatrix::from_fn(2, 3, MatrixSource::Geometric, |i, j| (i * 10 + j) as f64);
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 3);
        assert_eq!(matrix.get(1, 2), 12.0);
    }

    #[test]
    fn counts_failed_cells() {
        let ok = Ok(Leg {
            distance_miles: 1.0,
            duration_minutes: 2.0,
        });
        let matrix = PairwiseMatrix::new(vec![
            vec![ok.clone(), Err(PartialDistanceError::new(0, 1, "no route"))],
            vec![ok.clone(), ok],
        ]);
        assert_eq!(matrix.failed_cells(), 1);
    }
}
