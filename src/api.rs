//! Request/response shapes for the HTTP layer that embeds the optimizer.
//!
//! Input validation happens here, before the optimizer runs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coordinate::Coordinate;
use crate::error::OptimizeError;
use crate::matrix::MatrixSource;
use crate::optimizer::{OptimizationResult, OptimizeOptions, Optimizer};
use crate::schedule::{DEFAULT_MINUTES_PER_MILE, parse_clock};
use crate::traits::{DistanceSource, Stop};

/// Longest accepted visit: one full day.
pub const MAX_SERVICE_MINUTES: u32 = 24 * 60;

/// One appointment as supplied by the caller.
///
/// Fields other than id, coordinates and duration are kept untouched in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopInput {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stop for StopInput {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn location(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    fn service_duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginInput {
    pub latitude: f64,
    pub longitude: f64,
}

fn default_round_trip() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub stops: Vec<StopInput>,
    #[serde(default)]
    pub origin: Option<OriginInput>,
    /// `"HH:MM"`.
    pub start_time: String,
    #[serde(default)]
    pub minutes_per_mile: Option<f64>,
    #[serde(default = "default_round_trip")]
    pub round_trip: bool,
}

impl OptimizeRequest {
    /// Validate coordinates, service durations, start time and speed.
    pub fn validate(&self) -> Result<(Option<Coordinate>, OptimizeOptions), OptimizeError> {
        let origin = self
            .origin
            .map(|o| Coordinate::try_new(o.latitude, o.longitude))
            .transpose()?;
        for (position, stop) in self.stops.iter().enumerate() {
            stop.location().validate()?;
            if stop.duration_minutes > MAX_SERVICE_MINUTES {
                return Err(OptimizeError::InvalidServiceDuration {
                    position,
                    minutes: stop.duration_minutes,
                    max: MAX_SERVICE_MINUTES,
                });
            }
        }

        let minutes_per_mile = self.minutes_per_mile.unwrap_or(DEFAULT_MINUTES_PER_MILE);
        if !minutes_per_mile.is_finite() || minutes_per_mile <= 0.0 {
            return Err(OptimizeError::InvalidMinutesPerMile(minutes_per_mile));
        }

        let options = OptimizeOptions {
            start_time: parse_clock(&self.start_time)?,
            minutes_per_mile,
            round_trip: self.round_trip,
        };

        Ok((origin, options))
    }

    /// Validate and run the request.
    pub fn run<D: DistanceSource>(
        &self,
        optimizer: &Optimizer<D>,
    ) -> Result<OptimizeResponse, OptimizeError> {
        let (origin, options) = self.validate()?;
        let result = optimizer.optimize(&self.stops, origin, &options)?;
        Ok(OptimizeResponse::from(result))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledStopOutput {
    pub id: String,
    /// `"HH:MM"`, with a `+Nd` suffix past midnight.
    pub arrival_time: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub order: Vec<ScheduledStopOutput>,
    pub total_distance_miles: f64,
    pub total_travel_minutes: u32,
    pub total_service_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_time: Option<String>,
    pub distance_source: MatrixSource,
}

impl From<OptimizationResult<String>> for OptimizeResponse {
    fn from(result: OptimizationResult<String>) -> Self {
        let order = result
            .route
            .into_iter()
            .map(|stop| ScheduledStopOutput {
                id: stop.id,
                arrival_time: stop.arrival.to_string(),
                position: stop.position,
            })
            .collect();

        Self {
            order,
            total_distance_miles: result.total_distance_miles,
            total_travel_minutes: result.total_travel_minutes,
            total_service_minutes: result.total_service_minutes,
            return_time: result.return_time.map(|time| time.to_string()),
            distance_source: result.distance_source,
        }
    }
}
