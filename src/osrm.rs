//! OSRM HTTP adapter for pairwise distance matrices.
//!
//! Uses the `table` service with distance and duration annotations. OSRM
//! reports unroutable pairs as `null`, which become per-cell failures.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::coordinate::Coordinate;
use crate::error::{DistanceProviderError, PartialDistanceError};
use crate::matrix::{Leg, PairwiseCell, PairwiseMatrix};
use crate::traits::PairwiseDistanceProvider;

const METERS_PER_MILE: f64 = 1609.344;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    /// Read `OSRM_BASE_URL`, `OSRM_PROFILE` and `OSRM_TIMEOUT_SECS`.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OSRM_BASE_URL").unwrap_or(defaults.base_url),
            profile: std::env::var("OSRM_PROFILE").unwrap_or(defaults.profile),
            timeout_secs: std::env::var("OSRM_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Build the `table` request URL.
    ///
    /// Identical origin and destination lists are sent once; otherwise the
    /// two lists are concatenated and selected with `sources`/`destinations`.
    pub fn table_url(&self, origins: &[Coordinate], destinations: &[Coordinate]) -> String {
        let same = origins == destinations;
        let locations: Vec<&Coordinate> = if same {
            origins.iter().collect()
        } else {
            origins.iter().chain(destinations).collect()
        };

        let coords = locations
            .iter()
            .map(|c| format!("{:.6},{:.6}", c.longitude, c.latitude))
            .collect::<Vec<_>>()
            .join(";");

        let mut url = format!(
            "{}/table/v1/{}/{}?annotations=distance,duration",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        );

        if !same {
            let sources = join_indices(0..origins.len());
            let targets = join_indices(origins.len()..origins.len() + destinations.len());
            url.push_str(&format!("&sources={}&destinations={}", sources, targets));
        }

        url
    }
}

impl PairwiseDistanceProvider for OsrmClient {
    fn pairwise(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<PairwiseMatrix, DistanceProviderError> {
        if origins.is_empty() || destinations.is_empty() {
            return Ok(PairwiseMatrix::new(vec![Vec::new(); origins.len()]));
        }

        let url = self.table_url(origins, destinations);
        debug!(
            origins = origins.len(),
            destinations = destinations.len(),
            "requesting OSRM table"
        );

        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.json::<OsrmTableResponse>()?;
        debug!(%status, code = %body.code, "OSRM table responded");

        body.into_matrix(origins.len(), destinations.len())
    }

    fn name(&self) -> &str {
        "osrm"
    }
}

fn join_indices(range: std::ops::Range<usize>) -> String {
    range.map(|i| i.to_string()).collect::<Vec<_>>().join(";")
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,
    distances: Option<Vec<Vec<Option<f64>>>>,
    durations: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmTableResponse {
    fn into_matrix(
        self,
        rows: usize,
        cols: usize,
    ) -> Result<PairwiseMatrix, DistanceProviderError> {
        if self.code != "Ok" {
            return Err(DistanceProviderError::Service {
                code: self.code,
                message: self.message.unwrap_or_default(),
            });
        }

        let distances = self
            .distances
            .ok_or(DistanceProviderError::MissingAnnotation("distances"))?;
        let durations = self
            .durations
            .ok_or(DistanceProviderError::MissingAnnotation("durations"))?;

        check_shape(&distances, rows, cols)?;
        check_shape(&durations, rows, cols)?;

        let cells: Vec<Vec<PairwiseCell>> = distances
            .into_iter()
            .zip(durations)
            .enumerate()
            .map(|(i, (distance_row, duration_row))| {
                distance_row
                    .into_iter()
                    .zip(duration_row)
                    .enumerate()
                    .map(|(j, pair)| convert_cell(i, j, pair))
                    .collect()
            })
            .collect();

        Ok(PairwiseMatrix::new(cells))
    }
}

fn check_shape(
    table: &[Vec<Option<f64>>],
    rows: usize,
    cols: usize,
) -> Result<(), DistanceProviderError> {
    let actual_cols = table.first().map_or(0, Vec::len);
    if table.len() != rows || table.iter().any(|row| row.len() != cols) {
        return Err(DistanceProviderError::ShapeMismatch {
            expected_rows: rows,
            expected_cols: cols,
            rows: table.len(),
            cols: actual_cols,
        });
    }
    Ok(())
}

fn convert_cell(
    origin: usize,
    destination: usize,
    pair: (Option<f64>, Option<f64>),
) -> PairwiseCell {
    match pair {
        (Some(meters), Some(seconds)) => Ok(Leg {
            distance_miles: meters / METERS_PER_MILE,
            duration_minutes: seconds / 60.0,
        }),
        _ => Err(PartialDistanceError::new(origin, destination, "no route found")),
    }
}
